//! Run-scoped state shared by the key strategies.

use std::fmt;

use crate::bucket::BucketKey;
use crate::item::TestItem;

type KeyHook = Box<dyn Fn(&dyn TestItem, BucketKey) -> BucketKey>;

/// Per-run context. Owns the ordered chain of bucket key rewrites that
/// cross-cutting features (failed-first) install before shuffling.
#[derive(Default)]
pub struct RunSession {
    key_hooks: Vec<KeyHook>,
}

impl RunSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_key_hook(&mut self, hook: impl Fn(&dyn TestItem, BucketKey) -> BucketKey + 'static) {
        self.key_hooks.push(Box::new(hook));
    }

    pub fn key_hook_count(&self) -> usize {
        self.key_hooks.len()
    }

    pub(crate) fn rewrite_key(&self, item: &dyn TestItem, key: BucketKey) -> BucketKey {
        self.key_hooks.iter().fold(key, |key, hook| hook(item, key))
    }
}

impl fmt::Debug for RunSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunSession")
            .field("key_hooks", &self.key_hooks.len())
            .finish()
    }
}
