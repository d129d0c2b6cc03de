//! Run-level wiring: config → seed → failed-first → guarded shuffle.

use std::path::PathBuf;

use crate::bucket::{BucketType, StrategyRegistry};
use crate::config::RandomOrderConfig;
use crate::disable::disable_key;
use crate::failed_first::{self, LastFailed};
use crate::guard::{randomize, GuardOutcome};
use crate::item::TestItem;
use crate::seed::Seed;
use crate::session::RunSession;

/// Resolved settings for one run. The seed is always set here, generated
/// when the user gave none, so it can be printed and handed to workers.
#[derive(Debug, Clone, PartialEq)]
pub struct RunPlan {
    pub bucket_type: BucketType,
    pub seed: Seed,
    /// Last-failed cache to read, when failed-first is on.
    pub last_failed: Option<PathBuf>,
}

impl RunPlan {
    pub fn from_config(cfg: &RandomOrderConfig) -> Self {
        Self {
            bucket_type: cfg.bucket_type(),
            seed: cfg.seed.clone().unwrap_or_else(Seed::generate),
            last_failed: cfg.failed_first.then(|| cfg.last_failed_path()),
        }
    }

    /// Lines for the runner's report header.
    pub fn report_header(&self) -> String {
        format!(
            "Using --random-order-bucket={}\nUsing --random-order-seed={}\n",
            self.bucket_type, self.seed
        )
    }

    /// Reorder collected items for this run.
    pub fn apply<T: TestItem>(
        &self,
        items: &mut Vec<T>,
        registry: &StrategyRegistry,
    ) -> anyhow::Result<GuardOutcome> {
        let mut session = RunSession::new();
        if let Some(path) = &self.last_failed {
            let last_failed = LastFailed::load(path)?;
            if failed_first::install(&mut session, &last_failed) {
                failed_first::front_load(items, &last_failed);
            }
        }
        let outcome = randomize(
            items,
            &session,
            registry,
            self.bucket_type,
            Some(disable_key),
            Some(&self.seed),
        )?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_echoes_bucket_and_seed() {
        let plan = RunPlan {
            bucket_type: BucketType::Class,
            seed: Seed::from("abc"),
            last_failed: None,
        };
        assert_eq!(
            plan.report_header(),
            "Using --random-order-bucket=class\nUsing --random-order-seed=abc\n"
        );
    }

    #[test]
    fn seed_is_generated_once() {
        let plan = RunPlan::from_config(&RandomOrderConfig::default());
        assert_eq!(plan.bucket_type, BucketType::None);
        assert!(matches!(plan.seed, Seed::Number(_)));
    }

    #[test]
    fn failed_first_uses_default_cache_path() {
        let cfg = RandomOrderConfig {
            failed_first: true,
            ..Default::default()
        };
        let plan = RunPlan::from_config(&cfg);
        assert_eq!(
            plan.last_failed,
            Some(PathBuf::from(crate::config::DEFAULT_LAST_FAILED_PATH))
        );
    }
}
