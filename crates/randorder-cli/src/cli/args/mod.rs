use clap::{Parser, Subcommand};

pub mod handoff;
pub mod order;
pub use handoff::*;
pub use order::*;

#[derive(Parser)]
#[command(
    name = "randorder",
    version,
    about = "Deterministic, seedable, bucket-aware test order randomizer"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reorder collected test ids read from a file or stdin
    Order(OrderArgs),
    /// List the available bucket types
    Buckets,
    /// Print the environment a worker process needs to reproduce a run
    Handoff(HandoffArgs),
    Version,
}
