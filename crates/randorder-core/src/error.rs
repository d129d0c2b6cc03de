//! Error types for test ordering.

use std::path::PathBuf;

/// Errors raised while computing or applying a test order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    /// Unknown strategy name, or a key requested from the `none` strategy.
    #[error("{} plugin strategy error: {message}", crate::guard::PLUGIN_NAME)]
    Strategy { message: String },

    /// A bucket-key or disable function could not inspect an item.
    #[error("cannot compute {what} key for {node_id}: {reason}")]
    KeyComputation {
        what: &'static str,
        node_id: String,
        reason: String,
    },

    /// The item set changed across a shuffle attempt. Always fatal.
    #[error("{message}")]
    IntegrityViolation { message: String },

    /// The pseudorandom source could not be initialised.
    #[error("randomness source unavailable: {message}")]
    Randomness { message: String },
}

impl OrderError {
    pub fn strategy(message: impl Into<String>) -> Self {
        Self::Strategy {
            message: message.into(),
        }
    }

    pub fn key_computation(
        what: &'static str,
        node_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::KeyComputation {
            what,
            node_id: node_id.into(),
            reason: reason.into(),
        }
    }

    /// True for errors the integrity guard must never demote to a warning.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::IntegrityViolation { .. } | Self::Strategy { .. })
    }
}

pub type OrderResult<T> = Result<T, OrderError>;

/// Errors reading the last-failed cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to read last-failed cache {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed last-failed cache {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors loading plugin configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
