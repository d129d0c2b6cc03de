use super::args::*;

pub mod buckets;
pub mod handoff;
pub(crate) mod order;

use crate::exit_codes::SUCCESS;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Order(args) => order::run(args),
        Command::Buckets => buckets::run(),
        Command::Handoff(args) => handoff::run(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}
