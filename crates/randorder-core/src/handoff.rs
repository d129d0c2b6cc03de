//! Seed handoff from a coordinating process to its workers.
//!
//! Workers must never pick their own seed: each one shuffles its own copy
//! of the collected items, and they only agree on the order when they share
//! the coordinator's seed.

use std::collections::BTreeMap;

use crate::seed::Seed;

/// Key under which the seed travels in a worker's input map.
pub const WORKER_INPUT_KEY: &str = "random_order_seed";

/// Environment variable carrying the seed into worker processes.
pub const SEED_ENV: &str = "RANDORDER_SEED";

pub struct WorkerHandoff;

impl WorkerHandoff {
    pub fn export(seed: &Seed, worker_input: &mut BTreeMap<String, String>) {
        worker_input.insert(WORKER_INPUT_KEY.to_string(), seed.to_string());
    }

    pub fn import(worker_input: &BTreeMap<String, String>) -> Option<Seed> {
        worker_input
            .get(WORKER_INPUT_KEY)
            .map(|raw| Seed::from(raw.as_str()))
    }

    /// Environment pairs to set on a spawned worker process.
    pub fn env(seed: &Seed) -> [(&'static str, String); 1] {
        [(SEED_ENV, seed.to_string())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_sees_coordinator_seed() {
        let seed = Seed::generate();
        let mut input = BTreeMap::new();
        WorkerHandoff::export(&seed, &mut input);
        assert_eq!(WorkerHandoff::import(&input), Some(seed));
    }

    #[test]
    fn text_seed_survives_handoff() {
        let seed = Seed::from("release-42");
        let mut input = BTreeMap::new();
        WorkerHandoff::export(&seed, &mut input);
        assert_eq!(WorkerHandoff::import(&input), Some(seed));
    }

    #[test]
    fn no_seed_without_export() {
        assert_eq!(WorkerHandoff::import(&BTreeMap::new()), None);
    }
}
