//! Reproducibility token for the order randomizer.
//!
//! A seed is whatever the user typed (`--random-order-seed=1234` or
//! `--random-order-seed=nightly-build`). Numeric seeds drive the PRNG
//! directly; textual seeds are reduced to a `u64` through SHA-256 so any
//! string reproduces the same order on every platform.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

/// Upper bound (inclusive) for generated seeds; keeps them short enough to
/// retype from a CI log.
pub const MAX_GENERATED_SEED: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Seed {
    Number(u64),
    Text(String),
}

impl Seed {
    /// Fresh seed for a run that did not supply one.
    pub fn generate() -> Self {
        Self::Number(rand::thread_rng().gen_range(1..=MAX_GENERATED_SEED))
    }

    pub fn to_u64(&self) -> u64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.parse::<u64>().unwrap_or_else(|_| text_to_u64(s)),
        }
    }

    /// Deterministic PRNG for this seed. `StdRng` output is stable for a
    /// given rand release, which is what makes reruns reproducible.
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.to_u64())
    }
}

fn text_to_u64(s: &str) -> u64 {
    let digest = Sha256::digest(s.as_bytes());
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(buf)
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for Seed {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "007" stays textual so the header echoes exactly what was typed.
        Ok(match s.parse::<u64>() {
            Ok(n) if n.to_string() == s => Self::Number(n),
            _ => Self::Text(s.to_string()),
        })
    }
}

impl From<u64> for Seed {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Seed {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(seed) => seed,
            Err(never) => match never {},
        }
    }
}

// Always written as a string: u64 seeds above 2^53 lose precision in JSON
// consumers. Numbers are still accepted on read.
impl Serialize for Seed {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Seed {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(d)? {
            Raw::Number(n) => Self::Number(n),
            Raw::Text(s) => Self::from(s.as_str()),
        })
    }
}
