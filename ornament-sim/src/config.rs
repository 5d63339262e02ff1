use serde::Deserialize;

use crate::countdown;
use crate::error::{SimError, SimResult};

/// Complete scene configuration. Every field has a default, so an empty TOML
/// document yields the stock scene.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    pub world: WorldConfig,
    pub camera: CameraConfig,
    pub pointer: PointerConfig,
    pub ornament: OrnamentConfig,
    pub gravity: GravityConfig,
    pub material: MaterialConfig,
    pub lights: LightsConfig,
    pub models: Vec<ModelConfig>,
    pub countdown: CountdownConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Nominal physics substep in seconds.
    pub fixed_timestep: f32,
    /// Upper bound on catch-up substeps per frame.
    pub max_substeps: u32,
    pub body_count: usize,
    /// Placement seed. `None` lets the driver pick one (usually the clock).
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PointerConfig {
    pub mass: f32,
    pub radius: f32,
    /// Fraction of velocity lost per second.
    pub linear_damping: f32,
    /// Pointer position in normalized device coordinates before any input.
    pub initial: [f32; 2],
    pub plane_normal: [f32; 3],
    pub plane_constant: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrnamentConfig {
    pub mass: f32,
    pub radius_min: f32,
    pub radius_jitter: f32,
    /// Per-index spread factor for the initial placement.
    pub spread: f32,
    pub base_offset: f32,
    /// Fractions of linear and angular velocity lost per second.
    pub linear_damping: f32,
    pub angular_damping: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GravityConfig {
    /// Per-axis pull weights applied to the distance.
    pub pull: [f32; 3],
    pub offset_scale: f32,
    pub offset_cap: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaterialConfig {
    pub friction: f32,
    pub restitution: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightsConfig {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub directional_color: [f32; 3],
    pub directional_intensity: f32,
    pub directional_position: [f32; 3],
    pub shadow: ShadowConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShadowConfig {
    pub cast: bool,
    pub map_size: u32,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub far: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    pub name: String,
    pub color: [f32; 3],
    #[serde(default = "default_metallic")]
    pub metallic: f32,
    #[serde(default = "default_roughness")]
    pub roughness: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CountdownConfig {
    pub month: u32,
    pub day: u32,
    /// CSS selector of the countdown container.
    pub selector: String,
}

fn default_metallic() -> f32 {
    0.8
}

fn default_roughness() -> f32 {
    0.25
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 10,
            body_count: 20,
            seed: None,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            position: [0.0, 0.0, 7.5],
        }
    }
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            mass: 100.0,
            radius: 0.75,
            linear_damping: 0.85,
            initial: [1.0, -1.0],
            plane_normal: [0.0, 0.0, -1.0],
            plane_constant: 0.0,
        }
    }
}

impl Default for OrnamentConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            radius_min: 0.45,
            radius_jitter: 0.25,
            spread: 2.5,
            base_offset: 1.0,
            linear_damping: 0.85,
            angular_damping: 0.01,
        }
    }
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            pull: [1.0, 2.0, 5.0],
            offset_scale: 0.0001,
            offset_cap: 0.001,
        }
    }
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            friction: 0.1,
            restitution: 0.0,
        }
    }
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 2.0,
            directional_color: [1.0, 1.0, 1.0],
            directional_intensity: 1.5,
            directional_position: [5.0, 5.0, 5.0],
            shadow: ShadowConfig::default(),
        }
    }
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            cast: false,
            map_size: 1024,
            left: -7.0,
            right: 7.0,
            top: 7.0,
            bottom: -7.0,
            far: 15.0,
        }
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            month: 12,
            day: 25,
            selector: "div.countdown".to_string(),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            camera: CameraConfig::default(),
            pointer: PointerConfig::default(),
            ornament: OrnamentConfig::default(),
            gravity: GravityConfig::default(),
            material: MaterialConfig::default(),
            lights: LightsConfig::default(),
            models: default_models(),
            countdown: CountdownConfig::default(),
        }
    }
}

/// The stock ornament palette: gold, red and green baubles.
pub fn default_models() -> Vec<ModelConfig> {
    vec![
        ModelConfig {
            name: "ornament_gold".to_string(),
            color: [1.0, 0.766, 0.336],
            metallic: 1.0,
            roughness: 0.2,
        },
        ModelConfig {
            name: "ornament_red".to_string(),
            color: [0.78, 0.05, 0.08],
            metallic: 0.6,
            roughness: 0.25,
        },
        ModelConfig {
            name: "ornament_green".to_string(),
            color: [0.05, 0.42, 0.16],
            metallic: 0.6,
            roughness: 0.25,
        },
    ]
}

impl SceneConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(source: &str) -> SimResult<Self> {
        let config: SceneConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> SimResult<()> {
        if !(self.world.fixed_timestep > 0.0) {
            return Err(invalid("world.fixed_timestep must be positive"));
        }
        if self.world.max_substeps == 0 {
            return Err(invalid("world.max_substeps must be at least 1"));
        }
        if self.models.is_empty() {
            return Err(SimError::EmptyModelPool);
        }
        if !(self.camera.near > 0.0 && self.camera.near < self.camera.far) {
            return Err(invalid("camera.near must be positive and below camera.far"));
        }
        if !(self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0) {
            return Err(invalid("camera.fov_degrees must be in (0, 180)"));
        }
        if !(self.pointer.mass > 0.0 && self.pointer.radius > 0.0) {
            return Err(invalid("pointer.mass and pointer.radius must be positive"));
        }
        if !(self.ornament.mass > 0.0 && self.ornament.radius_min > 0.0) {
            return Err(invalid("ornament.mass and ornament.radius_min must be positive"));
        }
        if self.ornament.radius_jitter < 0.0 {
            return Err(invalid("ornament.radius_jitter must not be negative"));
        }
        let dampings = [
            self.pointer.linear_damping,
            self.ornament.linear_damping,
            self.ornament.angular_damping,
        ];
        if !dampings.iter().all(|d| (0.0..1.0).contains(d)) {
            return Err(invalid("damping fractions must be in [0, 1)"));
        }
        let n = self.pointer.plane_normal;
        if n[0] == 0.0 && n[1] == 0.0 && n[2] == 0.0 {
            return Err(invalid("pointer.plane_normal must be non-zero"));
        }
        countdown::validate_month_day(self.countdown.month, self.countdown.day)?;
        Ok(())
    }
}

fn invalid(message: &str) -> SimError {
    SimError::InvalidSetting(message.to_string())
}
