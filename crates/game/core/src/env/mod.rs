//! Read-only environment the combat rules consult.
//!
//! Oracles expose static data (skill rank tables) and deterministic randomness
//! so the rules never reach for globals or I/O.
mod rng;
mod skills;

pub use rng::{FixedRng, PcgRng, RngOracle, compute_seed, context as rng_context};
pub use skills::{RankTable, SkillOracle};
