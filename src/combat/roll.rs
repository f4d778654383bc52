//! Damage roll sources
//!
//! The random term added to every team attack comes from a `DamageRoll`.
//! Production uses a fresh thread RNG per roll; tests and replays can inject
//! a seeded or fixed source instead.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the bounded random damage term
pub trait DamageRoll: Send + Sync {
    /// Roll a value in `min..=max`
    fn roll(&self, min: i32, max: i32) -> i32;
}

/// Thread RNG, re-seeded from the OS. Not replayable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRoll;

impl DamageRoll for ThreadRoll {
    fn roll(&self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        rand::rng().random_range(min..=max)
    }
}

/// Seeded RNG: same seed gives the same sequence of rolls
#[derive(Debug)]
pub struct SeededRoll {
    rng: Mutex<StdRng>,
}

impl SeededRoll {
    /// Create a seeded roll source
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl DamageRoll for SeededRoll {
    fn roll(&self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.lock().random_range(min..=max)
    }
}

/// Always rolls the same value, clamped into the requested range
#[derive(Debug, Clone, Copy)]
pub struct FixedRoll(pub i32);

impl DamageRoll for FixedRoll {
    fn roll(&self, min: i32, max: i32) -> i32 {
        self.0.clamp(min, max.max(min))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_roll_bounds() {
        let roll = ThreadRoll;
        for _ in 0..200 {
            let result = roll.roll(500, 1500);
            assert!(result >= 500, "Roll {} below minimum 500", result);
            assert!(result <= 1500, "Roll {} above maximum 1500", result);
        }
    }

    #[test]
    fn test_degenerate_range() {
        assert_eq!(ThreadRoll.roll(7, 7), 7);
        assert_eq!(SeededRoll::new(1).roll(9, 3), 9);
    }

    #[test]
    fn test_seeded_roll_replays() {
        let a = SeededRoll::new(2025);
        let b = SeededRoll::new(2025);
        let first: Vec<i32> = (0..20).map(|_| a.roll(500, 1500)).collect();
        let second: Vec<i32> = (0..20).map(|_| b.roll(500, 1500)).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|r| (500..=1500).contains(r)));
    }

    #[test]
    fn test_fixed_roll_clamps() {
        assert_eq!(FixedRoll(800).roll(500, 1500), 800);
        assert_eq!(FixedRoll(0).roll(500, 1500), 500);
        assert_eq!(FixedRoll(9999).roll(500, 1500), 1500);
    }
}
