use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use capsule_core::constants::BLUEPRINT_EXTENSION;
use capsule_core::{sanitize_name, validate_name, Blueprint};

use crate::atomic_write::atomic_write;
use crate::error::PersistError;
use crate::format::HEADER_SIZE;
use crate::load::{self, BlueprintSummary};
use crate::save;

/// Directory-backed blueprint storage. One file per sanitized name.
///
/// Distinct names that sanitize to the same key share a file; the later
/// save silently replaces the earlier one.
#[derive(Debug, Clone)]
pub struct BlueprintStore {
    root: PathBuf,
}

impl BlueprintStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path a blueprint named `name` is stored at.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root
            .join(format!("{}.{BLUEPRINT_EXTENSION}", sanitize_name(name)))
    }

    /// Encode and write `blueprint`, replacing any file under the same key.
    pub fn save(&self, blueprint: &Blueprint) -> Result<PathBuf, PersistError> {
        validate_name(&blueprint.name)?;

        let bytes = save::encode(blueprint)?;
        let path = self.path_for(&blueprint.name);
        atomic_write(&path, &bytes).map_err(|e| {
            log::error!(
                "failed to write blueprint '{}' to {}: {e}",
                blueprint.name,
                path.display()
            );
            e
        })?;

        log::info!(
            "saved blueprint '{}' ({} blocks, {} bytes) to {}",
            blueprint.name,
            blueprint.block_count(),
            bytes.len(),
            path.display()
        );
        Ok(path)
    }

    /// Read and decode the blueprint stored under `name`.
    pub fn load(&self, name: &str) -> Result<Blueprint, PersistError> {
        let path = self.path_for(name);
        let bytes = fs::read(&path).map_err(|e| self.read_error(name, &path, e))?;
        let blueprint = load::decode(&bytes)?;
        log::info!(
            "loaded blueprint '{}' ({} blocks) from {}",
            blueprint.name,
            blueprint.block_count(),
            path.display()
        );
        Ok(blueprint)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Stems of every blueprint file in the store, in directory order.
    pub fn list(&self) -> Result<Vec<String>, PersistError> {
        let list_error = |e: std::io::Error| {
            log::error!("failed to list blueprints in {}: {e}", self.root.display());
            PersistError::Io(e)
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(list_error)? {
            let path = entry.map_err(list_error)?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(BLUEPRINT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        Ok(names)
    }

    /// Name, size and block count of a stored blueprint. Reads the header and
    /// the name after it, never the payload.
    pub fn summary(&self, name: &str) -> Result<BlueprintSummary, PersistError> {
        let path = self.path_for(name);
        let mut file = File::open(&path).map_err(|e| self.read_error(name, &path, e))?;

        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        file.by_ref()
            .take(HEADER_SIZE as u64)
            .read_to_end(&mut bytes)
            .map_err(|e| self.read_error(name, &path, e))?;
        let header = load::read_header(&bytes)?;
        file.take(header.name_len as u64)
            .read_to_end(&mut bytes)
            .map_err(|e| self.read_error(name, &path, e))?;
        load::read_summary(&bytes)
    }

    fn read_error(&self, name: &str, path: &Path, err: std::io::Error) -> PersistError {
        if err.kind() == ErrorKind::NotFound {
            PersistError::NotFound(name.to_string())
        } else {
            log::error!("failed to read blueprint '{name}' from {}: {err}", path.display());
            PersistError::Io(err)
        }
    }
}
