//! Deterministic runtime RNG resource.
//!
//! Wraps `ChaCha8Rng` for cross-platform deterministic randomness. Systems
//! that need randomness (quake phase splits, noise seeds, rumble seeds) take
//! `ResMut<SimRng>` instead of `rand::thread_rng()` so that identical seeds
//! produce identical runs.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Default seed used when no explicit seed is provided.
const DEFAULT_SEED: u64 = 42;

/// Deterministic RNG resource for all runtime randomness.
///
/// `rng.0` is a `ChaCha8Rng` implementing `rand::Rng`.
#[derive(Resource)]
pub struct SimRng(pub ChaCha8Rng);

impl Default for SimRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl SimRng {
    /// Create a new `SimRng` seeded from the given `u64` value.
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

pub struct SimRngPlugin;

impl Plugin for SimRngPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimRng>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_default_is_deterministic() {
        let mut a = SimRng::default();
        let mut b = SimRng::default();
        let vals_a: Vec<f32> = (0..10).map(|_| a.0.gen::<f32>()).collect();
        let vals_b: Vec<f32> = (0..10).map(|_| b.0.gen::<f32>()).collect();
        assert_eq!(vals_a, vals_b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a = SimRng::from_seed_u64(1);
        let mut b = SimRng::from_seed_u64(2);
        let vals_a: Vec<f32> = (0..10).map(|_| a.0.gen::<f32>()).collect();
        let vals_b: Vec<f32> = (0..10).map(|_| b.0.gen::<f32>()).collect();
        assert_ne!(vals_a, vals_b);
    }
}
