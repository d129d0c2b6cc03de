use clap::Args;

#[derive(Debug, Args, Clone, Default)]
pub struct HandoffArgs {
    /// Seed to hand off (default: a freshly generated one)
    #[arg(long = "random-order-seed")]
    pub seed: Option<String>,
}
