use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::blueprint::CaptureRegion;
use crate::constants::{DEFAULT_BLOCKS_PER_CYCLE, DEFAULT_DIMENSIONS, DEFAULT_MAX_CAPTURE_VOLUME};
use crate::error::{ConfigError, ValidationError};
use crate::name::validate_name;
use crate::types::DimensionId;

/// Tunables for capture and placement, stored as RON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapsuleConfig {
    /// Largest region (in blocks, air included) a single capture may cover.
    #[serde(default = "default_max_capture_volume")]
    pub max_capture_volume: u64,
    /// Successful placements per scheduling cycle. Read fresh every cycle.
    #[serde(default = "default_blocks_per_cycle")]
    pub blocks_per_cycle: u32,
    /// Dimensions capture and placement may target. Empty = no restriction.
    #[serde(default = "default_dimensions")]
    pub allowed_dimensions: Vec<String>,
}

fn default_max_capture_volume() -> u64 {
    DEFAULT_MAX_CAPTURE_VOLUME
}

fn default_blocks_per_cycle() -> u32 {
    DEFAULT_BLOCKS_PER_CYCLE
}

fn default_dimensions() -> Vec<String> {
    DEFAULT_DIMENSIONS.iter().map(|d| d.to_string()).collect()
}

impl Default for CapsuleConfig {
    fn default() -> Self {
        Self {
            max_capture_volume: default_max_capture_volume(),
            blocks_per_cycle: default_blocks_per_cycle(),
            allowed_dimensions: default_dimensions(),
        }
    }
}

impl CapsuleConfig {
    /// Parse a config from a RON string. Missing fields take their defaults.
    pub fn from_ron_str(ron_str: &str) -> Result<Self, ConfigError> {
        let options = ron::Options::default();
        options
            .from_str(ron_str)
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Read the config at `path`, writing the defaults there first if the
    /// file does not exist yet.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            return Self::from_ron_str(&contents);
        }
        let config = Self::default();
        config.save(path)?;
        log::info!("Wrote default capsule config to {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    pub fn is_dimension_allowed(&self, dimension: &DimensionId) -> bool {
        self.allowed_dimensions.is_empty()
            || self
                .allowed_dimensions
                .iter()
                .any(|d| d == dimension.as_str())
    }

    pub fn check_dimension(&self, dimension: &DimensionId) -> Result<(), ValidationError> {
        if self.is_dimension_allowed(dimension) {
            Ok(())
        } else {
            Err(ValidationError::DimensionNotAllowed(dimension.to_string()))
        }
    }

    /// Everything a capture must pass before the world is scanned:
    /// name, dimension, then volume.
    pub fn validate_capture(
        &self,
        name: &str,
        dimension: &DimensionId,
        region: &CaptureRegion,
    ) -> Result<(), ValidationError> {
        validate_name(name)?;
        self.check_dimension(dimension)?;
        let volume = region.volume();
        if volume > self.max_capture_volume {
            return Err(ValidationError::OversizeRegion {
                volume,
                max: self.max_capture_volume,
            });
        }
        Ok(())
    }
}

/// Hot-reloadable config shared between the request side and the
/// scheduling driver. Readers always take a fresh snapshot.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<CapsuleConfig>>,
}

impl SharedConfig {
    pub fn new(config: CapsuleConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    pub fn snapshot(&self) -> CapsuleConfig {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn blocks_per_cycle(&self) -> u32 {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .blocks_per_cycle
    }

    pub fn replace(&self, config: CapsuleConfig) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = config;
    }

    /// Re-read `path`. On failure the current config stays in effect.
    pub fn reload_from(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            log::warn!(
                "Keeping previous capsule config, cannot read {}: {e}",
                path.display()
            );
            ConfigError::Io(e)
        })?;
        match CapsuleConfig::from_ron_str(&contents) {
            Ok(config) => {
                self.replace(config);
                log::info!("Reloaded capsule config from {}", path.display());
                Ok(())
            }
            Err(e) => {
                log::warn!("Keeping previous capsule config: {e}");
                Err(e)
            }
        }
    }
}
