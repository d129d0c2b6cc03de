//! Integrity guard around the shuffle, and the plugin entry point.
//!
//! A shuffle is allowed to fail: the run then goes ahead in whatever order
//! the items are in, with a warning. A shuffle is never allowed to lose or
//! duplicate items: that aborts the run.

use std::any::Any;
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};

use tracing::{info, warn};

use crate::bucket::{BucketType, StrategyRegistry};
use crate::disable::DisableResolver;
use crate::error::{OrderError, OrderResult};
use crate::item::TestItem;
use crate::seed::Seed;
use crate::session::RunSession;
use crate::shuffle::Shuffler;

/// Max number of error-chain entries copied into a failure report.
pub const MAX_CHAIN_EXCERPT: usize = 10;

pub const PLUGIN_NAME: &str = "randorder";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Items were reordered.
    Shuffled,
    /// Bucket type `none`: the engine was not invoked.
    Skipped,
    /// The shuffle failed but every item is still present.
    Degraded { failure: String },
}

/// Identity of a sequence: its length and the set of node ids.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    len: usize,
    ids: BTreeSet<String>,
}

impl Snapshot {
    fn capture<T: TestItem>(items: &[T]) -> Self {
        Self {
            len: items.len(),
            ids: items.iter().map(|item| item.node_id().to_string()).collect(),
        }
    }
}

/// Run `attempt` on `items` and check afterwards that no item was lost or
/// duplicated.
pub fn guard<T, F>(items: &mut Vec<T>, attempt: F) -> OrderResult<GuardOutcome>
where
    T: TestItem,
    F: FnOnce(&mut Vec<T>) -> anyhow::Result<()>,
{
    let before = Snapshot::capture(items);

    let result = match panic::catch_unwind(AssertUnwindSafe(|| attempt(&mut *items))) {
        Ok(result) => result,
        Err(payload) => Err(anyhow::anyhow!("panicked: {}", panic_message(payload.as_ref()))),
    };
    let failure = result.as_ref().err().map(failure_report);

    if Snapshot::capture(items) != before {
        let message = failure.unwrap_or_else(|| {
            format!("{PLUGIN_NAME} plugin has failed miserably: test items were lost or duplicated")
        });
        return Err(OrderError::IntegrityViolation { message });
    }

    match (result, failure) {
        (Ok(()), _) => Ok(GuardOutcome::Shuffled),
        (Err(e), failure) => {
            if let Some(fatal) = e.downcast_ref::<OrderError>().filter(|e| e.is_fatal()) {
                return Err(fatal.clone());
            }
            let failure = failure.unwrap_or_else(|| e.to_string());
            warn!(plugin = PLUGIN_NAME, "{failure}");
            Ok(GuardOutcome::Degraded { failure })
        }
    }
}

fn failure_report(e: &anyhow::Error) -> String {
    let mut report = format!("{PLUGIN_NAME} plugin has failed with {e}");
    for cause in e.chain().skip(1).take(MAX_CHAIN_EXCERPT) {
        report.push_str("\n  caused by: ");
        report.push_str(&cause.to_string());
    }
    report
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Reorder `items` for one run.
///
/// `none` skips the engine entirely. Any other bucket type goes through
/// the registry (with the session's key hooks) and the integrity guard.
pub fn randomize<T: TestItem>(
    items: &mut Vec<T>,
    session: &RunSession,
    registry: &StrategyRegistry,
    bucket_type: BucketType,
    disable: Option<DisableResolver>,
    seed: Option<&Seed>,
) -> OrderResult<GuardOutcome> {
    if !bucket_type.is_enabled() {
        return Ok(GuardOutcome::Skipped);
    }
    // Unknown strategies fail before anything runs.
    registry.get(bucket_type)?;

    info!(
        bucket_type = %bucket_type,
        seed = %seed.map_or_else(|| "-".to_string(), ToString::to_string),
        items = items.len(),
        "randomizing test order"
    );

    guard(items, |items| {
        let mut shuffler = Shuffler::new()
            .bucket_key(|item: &T| registry.key_for(bucket_type, item, Some(session)))
            .seed(seed.cloned());
        if let Some(resolve) = disable {
            shuffler = shuffler.disable(move |item: &T| resolve(item));
        }
        shuffler.shuffle(items)?;
        Ok(())
    })
}
