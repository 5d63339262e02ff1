use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::OrnamentConfig;
use crate::models::ModelPool;

/// Initial placement for one ornament.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnSlot {
    pub position: Vec3,
    pub radius: f32,
    pub model_index: usize,
}

/// Per-index generator seed; keeps neighbouring indices uncorrelated.
fn index_seed(seed: u64, index: usize) -> u64 {
    // splitmix64 finalizer
    let mut z = seed ^ (index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Placement of the `index`-th ornament; a pure function of its inputs.
///
/// Even indices land in the positive octant, odd ones in the negative, and
/// the spread grows with the index.
pub fn spawn_slot(seed: u64, index: usize, config: &OrnamentConfig, pool: &ModelPool) -> SpawnSlot {
    let mut rng = StdRng::seed_from_u64(index_seed(seed, index));
    let sign = if index % 2 == 0 { 1.0 } else { -1.0 };
    let i = index as f32;
    let mut coord = || (i * config.spread * rng.gen::<f32>() + config.base_offset) * sign;
    let position = Vec3::new(coord(), coord(), coord());
    let radius = config.radius_min + rng.gen::<f32>() * config.radius_jitter;

    SpawnSlot {
        position,
        radius,
        model_index: pool.slot_for(index),
    }
}

/// Placements for `count` ornaments in creation order.
pub fn spawn_layout(seed: u64, count: usize, config: &OrnamentConfig, pool: &ModelPool) -> Vec<SpawnSlot> {
    (0..count).map(|i| spawn_slot(seed, i, config, pool)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_models;

    fn pool() -> ModelPool {
        ModelPool::from_config(&default_models()).unwrap()
    }

    #[test]
    fn test_layout_is_reproducible() {
        let config = OrnamentConfig::default();
        let a = spawn_layout(7, 20, &config, &pool());
        let b = spawn_layout(7, 20, &config, &pool());
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let config = OrnamentConfig::default();
        let a = spawn_layout(1, 20, &config, &pool());
        let b = spawn_layout(2, 20, &config, &pool());
        assert_ne!(a, b);
    }

    #[test]
    fn test_slot_independent_of_count() {
        let config = OrnamentConfig::default();
        let layout = spawn_layout(99, 10, &config, &pool());
        assert_eq!(layout[6], spawn_slot(99, 6, &config, &pool()));
    }

    #[test]
    fn test_sign_alternates_and_bounds_hold() {
        let config = OrnamentConfig::default();
        for (i, slot) in spawn_layout(3, 20, &config, &pool()).iter().enumerate() {
            let bound = i as f32 * config.spread + config.base_offset;
            for c in slot.position.to_array() {
                let magnitude = c.abs();
                assert!(magnitude >= config.base_offset && magnitude <= bound + 1e-4);
                if i % 2 == 0 {
                    assert!(c > 0.0);
                } else {
                    assert!(c < 0.0);
                }
            }
            assert!(slot.radius >= 0.45 && slot.radius < 0.70 + 1e-6);
        }
    }

    #[test]
    fn test_first_slot_sits_at_base_offset() {
        let slot = spawn_slot(5, 0, &OrnamentConfig::default(), &pool());
        assert_eq!(slot.position, Vec3::ONE);
        assert_eq!(slot.model_index, 0);
    }

    #[test]
    fn test_models_assigned_round_robin() {
        let layout = spawn_layout(11, 6, &OrnamentConfig::default(), &pool());
        let models: Vec<usize> = layout.iter().map(|s| s.model_index).collect();
        assert_eq!(models, vec![0, 1, 2, 0, 1, 2]);
    }
}
