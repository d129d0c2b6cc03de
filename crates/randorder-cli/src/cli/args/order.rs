use clap::{Args, ValueEnum};
use randorder_core::{BucketType, RandomOrderConfig, Seed};
use std::path::PathBuf;

#[derive(Debug, Args, Clone, Default)]
pub struct OrderArgs {
    /// File with one collected node id per line (default: stdin)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// YAML config; command line flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Randomize the order (module buckets unless --random-order-bucket is set)
    #[arg(long = "random-order")]
    pub random_order: bool,

    /// Limit reordering of test items across units of code
    #[arg(long = "random-order-bucket", value_enum)]
    pub bucket: Option<BucketType>,

    /// Seed for the randomizer; pass the seed of a previous run to replay its order
    #[arg(long = "random-order-seed", env = "RANDORDER_SEED")]
    pub seed: Option<String>,

    /// Run the tests that failed last time first
    #[arg(long = "failed-first")]
    pub failed_first: bool,

    /// Last-failed cache (JSON object keyed by node id)
    #[arg(long = "last-failed")]
    pub last_failed: Option<PathBuf>,

    /// Scope id (module file or class) whose tests keep collection order; repeatable
    #[arg(long = "disable-scope")]
    pub disable_scopes: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One node id per line
    #[default]
    Text,
    /// Order plus bucket, seed and outcome as a JSON document
    Json,
}

impl OrderArgs {
    /// Command line values as a config layer for [`RandomOrderConfig::merge`].
    pub fn overrides(&self) -> RandomOrderConfig {
        RandomOrderConfig {
            enabled: self.random_order,
            bucket: self.bucket,
            seed: self.seed.as_deref().map(Seed::from),
            failed_first: self.failed_first,
            last_failed_path: self.last_failed.clone(),
            disabled_scopes: self.disable_scopes.clone(),
        }
    }
}
