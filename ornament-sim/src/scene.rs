use glam::{Mat4, Quat, Vec3};
use ornament_gpu_shared::math::{extract_frustum_planes, sphere_in_frustum};
use ornament_gpu_shared::{AmbientLight, DirectionalLight, PerspectiveCamera, RenderFrame, RenderInstance};

use crate::config::{CameraConfig, LightsConfig, ShadowConfig};
use crate::models::ModelPool;

/// Index of a mesh in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// A renderable ornament.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub transform: Transform,
    pub model_index: usize,
}

/// Directional light plus its (currently unused) shadow frustum.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLights {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    pub shadow: ShadowConfig,
}

impl From<&LightsConfig> for SceneLights {
    fn from(config: &LightsConfig) -> Self {
        Self {
            ambient: AmbientLight {
                color: config.ambient_color,
                intensity: config.ambient_intensity,
            },
            directional: DirectionalLight {
                color: config.directional_color,
                intensity: config.directional_intensity,
                position: Vec3::from_array(config.directional_position),
            },
            shadow: config.shadow.clone(),
        }
    }
}

/// Camera, lights and meshes. Mutated only by the frame loop.
pub struct SceneGraph {
    pub camera: PerspectiveCamera,
    pub lights: SceneLights,
    models: ModelPool,
    meshes: Vec<Mesh>,
}

impl SceneGraph {
    pub fn new(camera: &CameraConfig, aspect: f32, lights: &LightsConfig, models: ModelPool) -> Self {
        Self {
            camera: PerspectiveCamera::new(
                camera.fov_degrees,
                aspect,
                camera.near,
                camera.far,
                Vec3::from_array(camera.position),
            ),
            lights: SceneLights::from(lights),
            models,
            meshes: Vec::new(),
        }
    }

    pub fn models(&self) -> &ModelPool {
        &self.models
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Overwrite a mesh's position and orientation; scale is left alone.
    pub fn set_pose(&mut self, id: MeshId, position: Vec3, rotation: Quat) {
        if let Some(mesh) = self.meshes.get_mut(id.0) {
            mesh.transform.position = position;
            mesh.transform.rotation = rotation;
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.set_viewport(width, height);
    }

    /// Snapshot for the renderer. Meshes fully outside the view frustum are dropped.
    pub fn render_frame(&self) -> RenderFrame {
        let view_proj = self.camera.view_projection();
        let planes = extract_frustum_planes(&view_proj);

        let instances = self
            .meshes
            .iter()
            .filter_map(|mesh| {
                let model = self.models.get(mesh.model_index)?;
                let radius = mesh.transform.scale.max_element();
                if !sphere_in_frustum(&planes, mesh.transform.position, radius) {
                    return None;
                }
                Some(RenderInstance {
                    model: mesh.transform.matrix(),
                    bounding_radius: radius,
                    color: model.color,
                    metallic: model.metallic,
                    roughness: model.roughness,
                })
            })
            .collect();

        RenderFrame {
            view_proj,
            camera_position: self.camera.position,
            ambient: self.lights.ambient,
            directional: self.lights.directional,
            instances,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_models, SceneConfig};

    fn scene() -> SceneGraph {
        let config = SceneConfig::default();
        let pool = ModelPool::from_config(&default_models()).unwrap();
        SceneGraph::new(&config.camera, 16.0 / 9.0, &config.lights, pool)
    }

    fn mesh_at(position: Vec3, model_index: usize) -> Mesh {
        Mesh {
            transform: Transform {
                position,
                rotation: Quat::IDENTITY,
                scale: Vec3::splat(0.5),
            },
            model_index,
        }
    }

    #[test]
    fn test_default_camera_and_lights() {
        let scene = scene();
        assert_eq!(scene.camera.position, Vec3::new(0.0, 0.0, 7.5));
        assert_eq!(scene.camera.fov_degrees, 45.0);
        assert_eq!(scene.lights.ambient.intensity, 2.0);
        assert_eq!(scene.lights.directional.position, Vec3::new(5.0, 5.0, 5.0));
        assert!(!scene.lights.shadow.cast);
    }

    #[test]
    fn test_set_pose_keeps_scale() {
        let mut scene = scene();
        let id = scene.add_mesh(mesh_at(Vec3::ZERO, 0));
        let rotation = Quat::from_rotation_y(1.0);
        scene.set_pose(id, Vec3::new(1.0, 2.0, 3.0), rotation);
        let mesh = scene.mesh(id).unwrap();
        assert_eq!(mesh.transform.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.transform.rotation, rotation);
        assert_eq!(mesh.transform.scale, Vec3::splat(0.5));
    }

    #[test]
    fn test_render_frame_uses_model_material() {
        let mut scene = scene();
        scene.add_mesh(mesh_at(Vec3::ZERO, 1));
        let frame = scene.render_frame();
        assert_eq!(frame.instances.len(), 1);
        assert_eq!(frame.instances[0].color, scene.models().get(1).unwrap().color);
        assert_eq!(frame.instances[0].bounding_radius, 0.5);
    }

    #[test]
    fn test_render_frame_culls_behind_camera() {
        let mut scene = scene();
        scene.add_mesh(mesh_at(Vec3::ZERO, 0));
        scene.add_mesh(mesh_at(Vec3::new(0.0, 0.0, 30.0), 0));
        assert_eq!(scene.render_frame().instances.len(), 1);
    }

    #[test]
    fn test_resize_updates_camera_aspect() {
        let mut scene = scene();
        scene.resize(1000.0, 500.0);
        assert_eq!(scene.camera.aspect, 2.0);
    }
}
