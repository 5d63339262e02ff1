use glam::{Quat, Vec2, Vec3};
use ornament_gpu_shared::{Plane, RenderFrame, SceneRenderer};

use crate::config::SceneConfig;
use crate::error::SimResult;
use crate::frame_loop::FrameClock;
use crate::gravity::CenterGravity;
use crate::models::ModelPool;
use crate::physics::{BodyId, PhysicsWorld, SphereBody};
use crate::scene::{Mesh, MeshId, SceneGraph, Transform};
use crate::spawn::spawn_layout;

/// A mesh and the body that drives it, paired for life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrnamentPair {
    pub mesh: MeshId,
    pub body: BodyId,
}

/// Invisible body that follows the pointer on a fixed plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerCollider {
    pub body: BodyId,
    pub plane: Plane,
    /// Pointer in normalized device coordinates.
    pub ndc: Vec2,
}

/// Per-frame bookkeeping returned by [`Simulation::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub delta_seconds: f64,
    pub substeps: u32,
}

/// Owns everything the frame loop touches: physics world, scene graph,
/// pointer collider and frame clock. Dropping it tears the scene down.
pub struct Simulation {
    world: PhysicsWorld,
    scene: SceneGraph,
    gravity: CenterGravity,
    pointer: PointerCollider,
    ornaments: Vec<OrnamentPair>,
    clock: FrameClock,
    seed: u64,
}

impl Simulation {
    /// Build the scene: camera, lights, zero-gravity world, pointer collider
    /// and `world.body_count` ornaments placed from `seed`.
    pub fn new(config: SceneConfig, seed: u64, aspect: f32) -> SimResult<Self> {
        config.validate()?;
        let pool = ModelPool::from_config(&config.models)?;

        let mut world = PhysicsWorld::new(config.world.fixed_timestep, config.world.max_substeps);
        let mut scene = SceneGraph::new(&config.camera, aspect, &config.lights, pool);

        let pointer_body = world.add_sphere(&SphereBody {
            position: Vec3::ZERO,
            radius: config.pointer.radius,
            mass: config.pointer.mass,
            linear_damping: config.pointer.linear_damping,
            angular_damping: 0.01,
            friction: config.material.friction,
            restitution: config.material.restitution,
        });
        let pointer = PointerCollider {
            body: pointer_body,
            plane: Plane::new(
                Vec3::from_array(config.pointer.plane_normal).normalize(),
                config.pointer.plane_constant,
            ),
            ndc: Vec2::from_array(config.pointer.initial),
        };

        let layout = spawn_layout(seed, config.world.body_count, &config.ornament, scene.models());
        let mut ornaments = Vec::with_capacity(layout.len());
        for slot in layout {
            let mesh = scene.add_mesh(Mesh {
                transform: Transform {
                    position: slot.position,
                    rotation: Quat::IDENTITY,
                    scale: Vec3::splat(slot.radius),
                },
                model_index: slot.model_index,
            });
            let body = world.add_sphere(&SphereBody {
                position: slot.position,
                radius: slot.radius,
                mass: config.ornament.mass,
                linear_damping: config.ornament.linear_damping,
                angular_damping: config.ornament.angular_damping,
                friction: config.material.friction,
                restitution: config.material.restitution,
            });
            ornaments.push(OrnamentPair { mesh, body });
        }

        log::info!(
            "Scene built: {} ornaments, {} models, seed {seed}",
            ornaments.len(),
            scene.models().len(),
        );

        Ok(Self {
            world,
            scene,
            gravity: CenterGravity::from(&config.gravity),
            pointer,
            ornaments,
            clock: FrameClock::new(),
            seed,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn ornaments(&self) -> &[OrnamentPair] {
        &self.ornaments
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn pointer(&self) -> &PointerCollider {
        &self.pointer
    }

    /// Set the pointer in normalized device coordinates. Takes effect on the next frame.
    pub fn set_pointer(&mut self, ndc: Vec2) {
        self.pointer.ndc = ndc;
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.scene.resize(width, height);
    }

    /// Where the pointer ray meets the collider plane, if it does.
    pub fn pointer_target(&self) -> Option<Vec3> {
        self.scene
            .camera
            .ray_through(self.pointer.ndc.x, self.pointer.ndc.y)
            .intersect_plane(&self.pointer.plane)
    }

    /// Steps 1-5 of a frame: clock, physics, pointer teleport, gravity, sync.
    pub fn advance(&mut self, elapsed_seconds: f64) -> FrameStats {
        let delta_seconds = self.clock.delta(elapsed_seconds);
        let substeps = self.world.step(delta_seconds as f32);

        // A miss leaves the collider where it was.
        if let Some(target) = self.pointer_target() {
            self.world.teleport(self.pointer.body, target);
        }

        for pair in &self.ornaments {
            if let Some(position) = self.world.position(pair.body) {
                let pull = self.gravity.force_at(position);
                self.world.apply_force_at_offset(pair.body, pull.force, pull.offset);
            }
        }

        self.sync_meshes();

        FrameStats {
            delta_seconds,
            substeps,
        }
    }

    /// Copy body poses into their meshes. Physics to visuals only.
    fn sync_meshes(&mut self) {
        for pair in &self.ornaments {
            if let (Some(position), Some(rotation)) = (self.world.position(pair.body), self.world.rotation(pair.body)) {
                self.scene.set_pose(pair.mesh, position, rotation);
            }
        }
    }

    pub fn render_frame(&self) -> RenderFrame {
        self.scene.render_frame()
    }

    /// One full frame: advance, then render through `renderer`.
    pub fn frame<R: SceneRenderer + ?Sized>(&mut self, elapsed_seconds: f64, renderer: &mut R) -> Result<FrameStats, R::Error> {
        let stats = self.advance(elapsed_seconds);
        renderer.render(&self.render_frame())?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use ornament_gpu_shared::NullRenderer;

    fn config(body_count: usize) -> SceneConfig {
        let mut config = SceneConfig::default();
        config.world.body_count = body_count;
        config
    }

    fn mesh_poses(sim: &Simulation) -> Vec<Transform> {
        sim.scene().meshes().iter().map(|m| m.transform).collect()
    }

    fn assert_meshes_match_bodies(sim: &Simulation) {
        for pair in sim.ornaments() {
            let mesh = sim.scene().mesh(pair.mesh).unwrap();
            assert_eq!(Some(mesh.transform.position), sim.world().position(pair.body));
            assert_eq!(Some(mesh.transform.rotation), sim.world().rotation(pair.body));
        }
    }

    #[test]
    fn test_builds_stock_scene() {
        let sim = Simulation::new(SceneConfig::default(), 3, 1.5).unwrap();
        assert_eq!(sim.ornaments().len(), 20);
        // ornaments plus the pointer collider
        assert_eq!(sim.world().body_count(), 21);
        assert_eq!(sim.scene().meshes().len(), 20);
        assert_eq!(sim.pointer().ndc, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_empty_model_pool_fails_before_spawning() {
        let mut config = SceneConfig::default();
        config.models.clear();
        assert!(matches!(Simulation::new(config, 0, 1.0), Err(SimError::EmptyModelPool)));
    }

    #[test]
    fn test_pairs_follow_creation_order() {
        let sim = Simulation::new(config(6), 9, 1.0).unwrap();
        let models: Vec<usize> = sim
            .ornaments()
            .iter()
            .map(|p| sim.scene().mesh(p.mesh).unwrap().model_index)
            .collect();
        assert_eq!(models, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_meshes_match_bodies_after_frames() {
        let mut sim = Simulation::new(config(8), 4, 1.0).unwrap();
        let mut renderer = NullRenderer::default();
        for i in 1..=30 {
            sim.frame(i as f64 / 60.0, &mut renderer).unwrap();
            assert_meshes_match_bodies(&sim);
        }
        assert_eq!(renderer.frames_rendered, 30);
    }

    #[test]
    fn test_zero_elapsed_frames_are_idempotent() {
        let mut sim = Simulation::new(config(8), 4, 1.0).unwrap();
        sim.advance(0.25);
        let first = sim.advance(0.5);
        assert!(first.substeps > 0);

        let before = mesh_poses(&sim);
        let stats = sim.advance(0.5);
        assert_eq!(stats.substeps, 0);
        assert_eq!(mesh_poses(&sim), before);
        sim.advance(0.5);
        assert_eq!(mesh_poses(&sim), before);
    }

    #[test]
    fn test_gravity_pulls_ornaments_inward() {
        let mut sim = Simulation::new(config(6), 21, 1.0).unwrap();
        let initial: Vec<f32> = sim
            .ornaments()
            .iter()
            .map(|p| sim.world().position(p.body).unwrap().length())
            .collect();
        // Park the pointer well away from the ornaments.
        sim.set_pointer(Vec2::new(1.0, 1.0));
        for i in 1..=60 {
            sim.advance(i as f64 / 60.0);
        }
        let later: Vec<f32> = sim
            .ornaments()
            .iter()
            .map(|p| sim.world().position(p.body).unwrap().length())
            .collect();
        let before: f32 = initial.iter().sum();
        let after: f32 = later.iter().sum();
        assert!(after < before, "ornaments drifted outward: {before} -> {after}");
    }

    #[test]
    fn test_pointer_center_teleports_to_origin() {
        let mut sim = Simulation::new(config(0), 1, 1.0).unwrap();
        sim.set_pointer(Vec2::ZERO);
        sim.advance(0.0);
        let p = sim.world().position(sim.pointer().body).unwrap();
        assert!(p.length() < 1e-3, "collider at {p:?}");
    }

    #[test]
    fn test_pointer_corner_lands_on_plane() {
        let mut sim = Simulation::new(config(0), 1, 1.0).unwrap();
        sim.set_pointer(Vec2::new(1.0, 1.0));
        sim.advance(0.0);
        let p = sim.world().position(sim.pointer().body).unwrap();
        assert!(p.z.abs() < 1e-3);
        assert!(p.x > 0.0 && p.y > 0.0);
    }

    #[test]
    fn test_pointer_excluded_from_gravity() {
        let mut sim = Simulation::new(config(0), 1, 1.0).unwrap();
        sim.set_pointer(Vec2::new(0.5, 0.5));
        for i in 0..10 {
            sim.advance(i as f64 / 60.0);
        }
        let v = sim.world().linear_velocity(sim.pointer().body).unwrap();
        assert!(v.length() < 1e-5, "pointer picked up velocity {v:?}");
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let mut a = Simulation::new(config(5), 77, 1.0).unwrap();
        let mut b = Simulation::new(config(5), 77, 1.0).unwrap();
        for i in 1..=20 {
            a.advance(i as f64 / 60.0);
            b.advance(i as f64 / 60.0);
        }
        assert_eq!(mesh_poses(&a), mesh_poses(&b));
    }
}
