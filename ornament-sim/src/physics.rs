//! Thin adapter over a rapier3d world: sphere bodies, fixed-step stepping
//! with catch-up, and glam-typed accessors.

use glam::{Quat, Vec3};
use rapier3d::prelude::*;

/// Opaque handle to a body in a [`PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(RigidBodyHandle);

/// Creation parameters for a dynamic sphere body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereBody {
    pub position: Vec3,
    pub radius: f32,
    pub mass: f32,
    /// Fraction of velocity lost per second, in `[0, 1)`.
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub friction: f32,
    pub restitution: f32,
}

/// Per-step damping rate for rapier that keeps `(1 - fraction)^t` of the
/// velocity after `t` seconds of fixed `dt` substeps.
pub fn damping_rate(fraction: f32, dt: f32) -> f32 {
    if !(fraction > 0.0 && dt > 0.0) {
        return 0.0;
    }
    let kept_per_step = (1.0 - fraction.min(0.999_999)).powf(dt);
    (kept_per_step.recip() - 1.0) / dt
}

/// Fixed-step catch-up state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepClock {
    pub fixed_timestep: f32,
    pub max_substeps: u32,
    accumulator: f32,
}

impl StepClock {
    pub fn new(fixed_timestep: f32, max_substeps: u32) -> Self {
        Self {
            fixed_timestep,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
        }
    }

    /// Feed `elapsed` seconds and return how many fixed substeps to run.
    ///
    /// Time beyond `max_substeps` substeps is dropped; the leftover below
    /// one substep carries over.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        if elapsed.is_finite() && elapsed > 0.0 {
            self.accumulator += elapsed;
        }
        let mut substeps = 0;
        while self.accumulator >= self.fixed_timestep && substeps < self.max_substeps {
            self.accumulator -= self.fixed_timestep;
            substeps += 1;
        }
        self.accumulator %= self.fixed_timestep;
        substeps
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }
}

/// Rigid-body world with zero gravity. Forces added between steps are
/// consumed by the next substep and then cleared.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    clock: StepClock,
    substeps_taken: u64,
}

impl PhysicsWorld {
    pub fn new(fixed_timestep: f32, max_substeps: u32) -> Self {
        let integration_parameters = IntegrationParameters {
            dt: fixed_timestep,
            ..Default::default()
        };
        Self {
            gravity: vector![0.0, 0.0, 0.0],
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            clock: StepClock::new(fixed_timestep, max_substeps),
            substeps_taken: 0,
        }
    }

    pub fn add_sphere(&mut self, desc: &SphereBody) -> BodyId {
        let dt = self.integration_parameters.dt;
        let body = RigidBodyBuilder::dynamic()
            .translation(to_vector(desc.position))
            .linear_damping(damping_rate(desc.linear_damping, dt))
            .angular_damping(damping_rate(desc.angular_damping, dt))
            .can_sleep(true)
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::ball(desc.radius)
            .mass(desc.mass)
            .friction(desc.friction)
            .restitution(desc.restitution)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        BodyId(handle)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn substeps_taken(&self) -> u64 {
        self.substeps_taken
    }

    /// Advance by `elapsed` seconds of wall time using fixed substeps.
    /// Returns the number of substeps run; zero elapsed time runs none.
    pub fn step(&mut self, elapsed: f32) -> u32 {
        let substeps = self.clock.advance(elapsed);
        for _ in 0..substeps {
            self.pipeline.step(
                &self.gravity,
                &self.integration_parameters,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                Some(&mut self.query_pipeline),
                &(),
                &(),
            );
            for (_, body) in self.bodies.iter_mut() {
                body.reset_forces(false);
                body.reset_torques(false);
            }
        }
        self.substeps_taken += u64::from(substeps);
        substeps
    }

    pub fn position(&self, id: BodyId) -> Option<Vec3> {
        self.bodies.get(id.0).map(|b| from_vector(b.translation()))
    }

    pub fn rotation(&self, id: BodyId) -> Option<Quat> {
        self.bodies.get(id.0).map(|b| {
            let q = b.rotation();
            Quat::from_xyzw(q.i, q.j, q.k, q.w)
        })
    }

    pub fn linear_velocity(&self, id: BodyId) -> Option<Vec3> {
        self.bodies.get(id.0).map(|b| from_vector(b.linvel()))
    }

    pub fn set_linear_velocity(&mut self, id: BodyId, velocity: Vec3) {
        if let Some(body) = self.bodies.get_mut(id.0) {
            body.set_linvel(to_vector(velocity), true);
        }
    }

    /// Move a body directly, bypassing forces. Velocity is kept.
    pub fn teleport(&mut self, id: BodyId, position: Vec3) {
        if let Some(body) = self.bodies.get_mut(id.0) {
            body.set_translation(to_vector(position), true);
        }
    }

    /// Queue a world-space force at a point offset from the body center.
    pub fn apply_force_at_offset(&mut self, id: BodyId, force: Vec3, offset: Vec3) {
        if let Some(body) = self.bodies.get_mut(id.0) {
            let point = from_vector(body.translation()) + offset;
            body.add_force_at_point(to_vector(force), point![point.x, point.y, point.z], true);
        }
    }
}

fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}
