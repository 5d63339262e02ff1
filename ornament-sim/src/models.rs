use crate::config::ModelConfig;
use crate::error::{SimError, SimResult};

/// A visual ornament model: how a body is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct OrnamentModel {
    pub name: String,
    pub color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
}

impl From<&ModelConfig> for OrnamentModel {
    fn from(config: &ModelConfig) -> Self {
        Self {
            name: config.name.clone(),
            color: [config.color[0], config.color[1], config.color[2], 1.0],
            metallic: config.metallic.clamp(0.0, 1.0),
            roughness: config.roughness.clamp(0.0, 1.0),
        }
    }
}

/// Non-empty, fully built pool of models. Bodies index into it round-robin.
#[derive(Debug, Clone)]
pub struct ModelPool {
    models: Vec<OrnamentModel>,
}

impl ModelPool {
    pub fn new(models: Vec<OrnamentModel>) -> SimResult<Self> {
        if models.is_empty() {
            return Err(SimError::EmptyModelPool);
        }
        Ok(Self { models })
    }

    pub fn from_config(configs: &[ModelConfig]) -> SimResult<Self> {
        Self::new(configs.iter().map(OrnamentModel::from).collect())
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, index: usize) -> Option<&OrnamentModel> {
        self.models.get(index)
    }

    /// Round-robin model slot for the `index`-th ornament.
    pub fn slot_for(&self, index: usize) -> usize {
        index % self.models.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_models;

    #[test]
    fn test_empty_pool_rejected() {
        assert!(matches!(ModelPool::new(Vec::new()), Err(SimError::EmptyModelPool)));
    }

    #[test]
    fn test_round_robin_slots() {
        let pool = ModelPool::from_config(&default_models()).unwrap();
        let slots: Vec<usize> = (0..7).map(|i| pool.slot_for(i)).collect();
        assert_eq!(slots, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_model_from_config_is_opaque() {
        let pool = ModelPool::from_config(&default_models()).unwrap();
        let gold = pool.get(0).unwrap();
        assert_eq!(gold.name, "ornament_gold");
        assert_eq!(gold.color[3], 1.0);
    }
}
