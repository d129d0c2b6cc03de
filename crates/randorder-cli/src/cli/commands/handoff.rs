use randorder_core::handoff::WorkerHandoff;
use randorder_core::Seed;

use super::super::args::HandoffArgs;
use crate::exit_codes::SUCCESS;

/// Prints `KEY=value` lines to export into each worker's environment.
pub fn run(args: HandoffArgs) -> anyhow::Result<i32> {
    let seed = args
        .seed
        .as_deref()
        .map(Seed::from)
        .unwrap_or_else(Seed::generate);
    for (key, value) in WorkerHandoff::env(&seed) {
        println!("{key}={value}");
    }
    Ok(SUCCESS)
}
