//! Plugin configuration: YAML file plus command line overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bucket::BucketType;
use crate::error::ConfigError;
use crate::seed::Seed;

pub const DEFAULT_LAST_FAILED_PATH: &str = ".pytest_cache/v/cache/lastfailed";

/// Everything the user can set. `bucket` and `seed` stay `None` unless the
/// user supplied them; supplying either one turns reordering on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RandomOrderConfig {
    /// Explicit `--random-order` switch.
    pub enabled: bool,
    pub bucket: Option<BucketType>,
    pub seed: Option<Seed>,
    /// Run previously failed tests first (`--failed-first`).
    pub failed_first: bool,
    pub last_failed_path: Option<PathBuf>,
    /// Scope ids (module files, classes) whose tests keep their order.
    pub disabled_scopes: Vec<String>,
}

impl RandomOrderConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_yaml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.disabled_scopes.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid("disabled_scopes entries must not be empty".into()));
        }
        if let Some(Seed::Text(s)) = &self.seed {
            if s.is_empty() {
                return Err(ConfigError::Invalid("seed must not be empty".into()));
            }
        }
        Ok(())
    }

    /// Layer `overrides` (command line) over `self` (file). Set values win.
    pub fn merge(mut self, overrides: RandomOrderConfig) -> Self {
        self.enabled |= overrides.enabled;
        self.failed_first |= overrides.failed_first;
        if overrides.bucket.is_some() {
            self.bucket = overrides.bucket;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        if overrides.last_failed_path.is_some() {
            self.last_failed_path = overrides.last_failed_path;
        }
        self.disabled_scopes.extend(overrides.disabled_scopes);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled || self.bucket.is_some() || self.seed.is_some()
    }

    /// Bucket type to run with: `none` unless reordering is on, otherwise
    /// the configured type or `module`.
    pub fn bucket_type(&self) -> BucketType {
        if self.is_enabled() {
            self.bucket.unwrap_or_default()
        } else {
            BucketType::None
        }
    }

    pub fn last_failed_path(&self) -> PathBuf {
        self.last_failed_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LAST_FAILED_PATH))
    }
}
