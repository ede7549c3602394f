//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through SubsystemRng instances derived
//! from the single master seed the engine was built with.
//!
//! Each subsystem gets its own RNG stream per tick, seeded from
//! (master_seed, subsystem slot, tick). This means:
//!   - A shot taken on tick N draws the same spread on every replay.
//!   - Adding a new slot never changes existing slots' streams.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::types::Tick;

/// Anything that can hand out uniform draws in [0.0, 1.0).
///
/// Gameplay functions take this instead of a concrete RNG so callers
/// can inject fixed draws.
pub trait RandomSource {
    /// Roll a float in [0.0, 1.0).
    fn next_f64(&mut self) -> f64;

    /// Bernoulli trial: returns true with probability p.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// A deterministic RNG stream for a single subsystem.
pub struct SubsystemRng {
    inner: Pcg64Mcg,
}

impl SubsystemRng {
    /// Create a subsystem RNG from the master seed and a stable
    /// subsystem index. The index must never change once assigned.
    pub fn new(master_seed: u64, subsystem_index: u64) -> Self {
        let derived_seed = master_seed ^ (subsystem_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }
}

impl RandomSource for SubsystemRng {
    fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// All subsystem RNGs for a single engine, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// The stream a subsystem uses on a given tick.
    pub fn for_subsystem_at_tick(&self, slot: SubsystemSlot, tick: Tick) -> SubsystemRng {
        let seed = self.master_seed ^ tick.wrapping_mul(0xbf58_476d_1ce4_e5b9);
        SubsystemRng::new(seed, slot as u64)
    }
}

/// Stable subsystem slot assignments.
/// NEVER reorder or remove entries, only append.
/// Reordering changes every subsystem's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum SubsystemSlot {
    Kickoff = 0,
    Movement = 1,
    Action = 2,
    Ball = 3,
    Goal = 4,
    Phase = 5,
}
