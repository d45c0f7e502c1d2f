use std::collections::HashMap;
use std::sync::Arc;

use capsule_core::{sanitize_name, Blueprint};
use capsule_persist::{BlueprintStore, PersistError};

/// Loaded blueprints keyed by sanitized name, so repeated placements of the
/// same structure share one decoded copy.
#[derive(Debug, Default)]
pub struct BlueprintCache {
    entries: HashMap<String, Arc<Blueprint>>,
}

impl BlueprintCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached blueprint for `name`, loading it from `store` on a miss.
    pub fn get_or_load(
        &mut self,
        store: &BlueprintStore,
        name: &str,
    ) -> Result<Arc<Blueprint>, PersistError> {
        let key = sanitize_name(name);
        if let Some(blueprint) = self.entries.get(&key) {
            return Ok(Arc::clone(blueprint));
        }

        let blueprint = Arc::new(store.load(name)?);
        self.entries.insert(key, Arc::clone(&blueprint));
        Ok(blueprint)
    }

    /// Replace the entry for `blueprint`'s key, e.g. right after saving it.
    pub fn insert(&mut self, blueprint: Blueprint) -> Arc<Blueprint> {
        let blueprint = Arc::new(blueprint);
        self.entries
            .insert(sanitize_name(&blueprint.name), Arc::clone(&blueprint));
        blueprint
    }

    /// Drop the entry for `name`. Returns whether one was cached.
    pub fn invalidate(&mut self, name: &str) -> bool {
        self.entries.remove(&sanitize_name(name)).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
