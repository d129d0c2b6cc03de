//! Failed-first ordering on top of the runner's last-failed cache.
//!
//! The cache is the runner's `lastfailed` JSON object, keyed by node id.
//! Items listed there are moved to the front and their bucket key is
//! rewritten to [`BucketKey::Pinned`], so the shuffle keeps them first and
//! in order.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info};

use crate::bucket::BucketKey;
use crate::error::CacheError;
use crate::item::TestItem;
use crate::session::RunSession;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastFailed {
    ids: BTreeSet<String>,
}

impl LastFailed {
    /// Load the cache at `path`. A missing file means nothing failed last
    /// time and is not an error.
    pub fn load(path: &Path) -> Result<Self, CacheError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no last-failed cache");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(CacheError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(&raw).map_err(|source| CacheError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        let entries: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw)?;
        Ok(entries.into_iter().map(|(id, _)| id).collect())
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.ids.contains(node_id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

impl FromIterator<String> for LastFailed {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Register the key hook sending previously failed items to the pinned
/// bucket. Returns false (and registers nothing) when the cache is empty.
pub fn install(session: &mut RunSession, last_failed: &LastFailed) -> bool {
    if last_failed.is_empty() {
        return false;
    }
    info!(last_failed = last_failed.len(), "running previously failed tests first");
    let ids = last_failed.ids.clone();
    session.add_key_hook(move |item, key| {
        if ids.contains(item.node_id()) {
            BucketKey::Pinned
        } else {
            key
        }
    });
    true
}

/// Stable partition: previously failed items first, both halves keeping
/// their relative order.
pub fn front_load<T: TestItem>(items: &mut Vec<T>, last_failed: &LastFailed) {
    if last_failed.is_empty() {
        return;
    }
    let (mut failed, rest): (Vec<T>, Vec<T>) = items
        .drain(..)
        .partition(|item| last_failed.contains(item.node_id()));
    failed.extend(rest);
    *items = failed;
}
