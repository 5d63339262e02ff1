use glam::{Mat4, Vec3};

use crate::uniforms::{FrameUniforms, InstanceRaw};

/// Ambient light term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Directional light placed at `position`, shining toward the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Vec3,
}

impl DirectionalLight {
    /// Unit direction the light travels in.
    pub fn direction(&self) -> Vec3 {
        (-self.position).normalize_or_zero()
    }
}

/// One mesh instance to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderInstance {
    pub model: Mat4,
    /// Bounding radius in world units, used for culling.
    pub bounding_radius: f32,
    pub color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
}

impl RenderInstance {
    pub fn to_raw(&self) -> InstanceRaw {
        InstanceRaw {
            model: self.model.to_cols_array_2d(),
            color: self.color,
            material: [self.metallic, self.roughness, 0.0, 0.0],
        }
    }
}

/// Immutable snapshot of everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub view_proj: Mat4,
    pub camera_position: Vec3,
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    pub instances: Vec<RenderInstance>,
}

impl RenderFrame {
    pub fn uniforms(&self) -> FrameUniforms {
        let a = self.ambient.color;
        let d = self.directional.color;
        let dir = self.directional.direction();
        FrameUniforms {
            view_proj: self.view_proj.to_cols_array_2d(),
            camera_position: self.camera_position.extend(1.0).to_array(),
            ambient: [
                a[0] * self.ambient.intensity,
                a[1] * self.ambient.intensity,
                a[2] * self.ambient.intensity,
                1.0,
            ],
            light_direction: dir.extend(0.0).to_array(),
            light_color: [
                d[0] * self.directional.intensity,
                d[1] * self.directional.intensity,
                d[2] * self.directional.intensity,
                1.0,
            ],
        }
    }
}

/// Something that can draw a [`RenderFrame`] to a surface.
pub trait SceneRenderer {
    type Error: std::fmt::Display;

    /// Resize the drawing surface. Sizes are in CSS pixels; the renderer
    /// multiplies by `pixel_ratio`.
    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f64);

    fn render(&mut self, frame: &RenderFrame) -> Result<(), Self::Error>;
}

/// Renderer that draws nothing. Used by headless drivers.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: u64,
    pub last_instance_count: usize,
}

impl SceneRenderer for NullRenderer {
    type Error = std::convert::Infallible;

    fn resize(&mut self, _width: u32, _height: u32, _pixel_ratio: f64) {}

    fn render(&mut self, frame: &RenderFrame) -> Result<(), Self::Error> {
        self.frames_rendered += 1;
        self.last_instance_count = frame.instances.len();
        Ok(())
    }
}
