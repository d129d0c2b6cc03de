//! Seedable, bucket-aware randomization of test execution order.
//!
//! Collected items are split into contiguous buckets (by module, class,
//! package, ...), shuffled within and across buckets, and handed back. The
//! integrity guard makes sure a failing shuffle can only ever leave the
//! order unchanged; it can never drop or duplicate a test.

pub mod bucket;
pub mod config;
pub mod disable;
pub mod error;
pub mod failed_first;
pub mod guard;
pub mod handoff;
pub mod item;
pub mod node;
pub mod plugin;
pub mod seed;
pub mod session;
pub mod shuffle;

pub use bucket::{BucketKey, BucketType, StrategyRegistry};
pub use config::RandomOrderConfig;
pub use error::{CacheError, ConfigError, OrderError, OrderResult};
pub use guard::{guard, randomize, GuardOutcome};
pub use item::{OrderMarker, Scope, TestItem};
pub use node::{MarkerTable, NodeItem};
pub use plugin::RunPlan;
pub use seed::Seed;
pub use session::RunSession;
pub use shuffle::Shuffler;
