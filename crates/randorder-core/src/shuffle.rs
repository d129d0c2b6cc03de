//! Bucketed shuffle engine.
//!
//! Items are split into buckets: maximal contiguous runs of items whose
//! composite key (bucket key, disable key) is equal. Each bucket is
//! shuffled internally unless it is disabled or pinned, then the buckets
//! themselves are shuffled. A pinned bucket that comes first stays first.
//!
//! Bucketing is by physical contiguity, not a global group-by. For
//! `[A1, A2, B1, A3]` keyed by letter there are three buckets, and `A3`
//! never moves next to `A1`/`A2` unless the bucket shuffle puts it there.

use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::OrderResult;
use crate::seed::Seed;

/// Identifier of an enclosing scope that opted out of reordering.
pub type DisableKey = String;

/// A value usable as a bucket key.
pub trait BucketId: PartialEq + fmt::Debug {
    /// True for the reserved bucket that is pinned to the front.
    fn is_pinned(&self) -> bool {
        false
    }
}

macro_rules! plain_bucket_ids {
    ($($t:ty),* $(,)?) => {
        $(impl BucketId for $t {})*
    };
}

plain_bucket_ids!((), bool, char, i32, i64, u32, u64, usize, String, &str);

impl<A: BucketId, B: BucketId> BucketId for (A, B) {}

impl<K: BucketId> BucketId for Option<K> {
    fn is_pinned(&self) -> bool {
        self.as_ref().is_some_and(BucketId::is_pinned)
    }
}

/// Grouping key actually used for partitioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeKey<K> {
    pub bucket: Option<K>,
    pub disabled: Option<DisableKey>,
}

impl<K: BucketId> CompositeKey<K> {
    pub fn is_pinned(&self) -> bool {
        self.bucket.is_pinned()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.is_some()
    }
}

type KeyFn<'a, T, K> = Box<dyn Fn(&T) -> OrderResult<K> + 'a>;
type DisableFn<'a, T> = Box<dyn Fn(&T) -> OrderResult<Option<DisableKey>> + 'a>;

/// Configured shuffle. Without a bucket key or a disable function the whole
/// sequence is permuted (the `global` bucket type).
pub struct Shuffler<'a, T, K> {
    bucket_key: Option<KeyFn<'a, T, K>>,
    disable: Option<DisableFn<'a, T>>,
    seed: Option<Seed>,
}

impl<T, K> Default for Shuffler<'_, T, K> {
    fn default() -> Self {
        Self {
            bucket_key: None,
            disable: None,
            seed: None,
        }
    }
}

impl<'a, T, K: BucketId> Shuffler<'a, T, K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket_key(mut self, f: impl Fn(&T) -> OrderResult<K> + 'a) -> Self {
        self.bucket_key = Some(Box::new(f));
        self
    }

    pub fn disable(mut self, f: impl Fn(&T) -> OrderResult<Option<DisableKey>> + 'a) -> Self {
        self.disable = Some(Box::new(f));
        self
    }

    pub fn seed(mut self, seed: Option<Seed>) -> Self {
        self.seed = seed;
        self
    }

    /// Shuffle `items` in place. The PRNG is derived from the seed when one
    /// was set, otherwise from OS entropy.
    pub fn shuffle(&self, items: &mut Vec<T>) -> OrderResult<()> {
        let mut rng = match &self.seed {
            Some(seed) => seed.rng(),
            None => StdRng::from_entropy(),
        };
        self.shuffle_with_rng(items, &mut rng)
    }

    /// Shuffle with a caller-owned PRNG. Keys are computed for every item
    /// before anything moves, so a failing key function leaves `items` as
    /// they were.
    pub fn shuffle_with_rng<R: Rng + ?Sized>(
        &self,
        items: &mut Vec<T>,
        rng: &mut R,
    ) -> OrderResult<()> {
        if self.bucket_key.is_none() && self.disable.is_none() {
            items.shuffle(rng);
            return Ok(());
        }

        let keys = items
            .iter()
            .map(|item| self.composite_key(item))
            .collect::<OrderResult<Vec<_>>>()?;

        let mut buckets = partition(items.drain(..).zip(keys));

        for bucket in &mut buckets {
            if !bucket.key.is_disabled() && !bucket.key.is_pinned() {
                bucket.items.shuffle(rng);
            }
        }

        let pinned_first = buckets.first().is_some_and(|b| b.key.is_pinned());
        if pinned_first {
            buckets[1..].shuffle(rng);
        } else {
            buckets.shuffle(rng);
        }

        debug!(
            buckets = buckets.len(),
            pinned_first,
            disabled = buckets.iter().filter(|b| b.key.is_disabled()).count(),
            "shuffled buckets"
        );

        items.extend(buckets.into_iter().flat_map(|b| b.items));
        Ok(())
    }

    fn composite_key(&self, item: &T) -> OrderResult<CompositeKey<K>> {
        let bucket = match &self.bucket_key {
            Some(f) => Some(f(item)?),
            None => None,
        };
        let disabled = match &self.disable {
            // Pinned items keep their order anyway; a disable key would split the bucket.
            Some(_) if bucket.is_pinned() => None,
            Some(f) => f(item)?,
            None => None,
        };
        Ok(CompositeKey { bucket, disabled })
    }
}

struct Bucket<T, K> {
    key: CompositeKey<K>,
    items: Vec<T>,
}

// One pass: an item joins the last open bucket when the keys match,
// otherwise it opens a new one.
fn partition<T, K: PartialEq>(keyed: impl Iterator<Item = (T, CompositeKey<K>)>) -> Vec<Bucket<T, K>> {
    let mut buckets: Vec<Bucket<T, K>> = Vec::new();
    for (item, key) in keyed {
        match buckets.last_mut() {
            Some(open) if open.key == key => open.items.push(item),
            _ => buckets.push(Bucket {
                key,
                items: vec![item],
            }),
        }
    }
    buckets
}
