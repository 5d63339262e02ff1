use glam::Vec3;

use crate::config::GravityConfig;

/// Anisotropic, distance-proportional pull toward the world origin.
///
/// `F = normalize(p) * (-w.x * d, -w.y * d, -w.z * d)` with `d = |p|`. The
/// force grows with distance, so bodies oscillate around the origin and
/// damping settles them into a cluster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterGravity {
    /// Per-axis pull weights.
    pub pull: Vec3,
    pub offset_scale: f32,
    pub offset_cap: f32,
}

/// Force to apply this frame and where, relative to the body center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityForce {
    pub force: Vec3,
    /// World-space offset of the application point from the body center.
    pub offset: Vec3,
}

impl Default for CenterGravity {
    fn default() -> Self {
        Self::from(&GravityConfig::default())
    }
}

impl From<&GravityConfig> for CenterGravity {
    fn from(config: &GravityConfig) -> Self {
        Self {
            pull: Vec3::from_array(config.pull),
            offset_scale: config.offset_scale,
            offset_cap: config.offset_cap,
        }
    }
}

impl CenterGravity {
    /// Per-axis scale applied to the unit direction: `-pull * d`.
    pub fn scale(&self, distance: f32) -> Vec3 {
        -self.pull * distance
    }

    pub fn force_at(&self, position: Vec3) -> GravityForce {
        let distance = position.length();
        let force = position.normalize_or_zero() * self.scale(distance);
        let m = (distance * self.offset_scale).min(self.offset_cap);
        GravityForce {
            force,
            offset: Vec3::splat(-m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_vec(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_scale_vector_on_x_axis() {
        let gravity = CenterGravity::default();
        assert_eq!(gravity.scale(2.0), Vec3::new(-2.0, -4.0, -10.0));

        let f = gravity.force_at(Vec3::new(2.0, 0.0, 0.0));
        assert!(approx_vec(f.force, Vec3::new(-2.0, 0.0, 0.0)), "force={:?}", f.force);
    }

    #[test]
    fn test_force_is_anisotropic() {
        let gravity = CenterGravity::default();
        let d = 3.0_f32.sqrt();
        let f = gravity.force_at(Vec3::ONE);
        let unit = 1.0 / d;
        assert!(approx_vec(f.force, Vec3::new(-unit * d, -2.0 * unit * d, -5.0 * unit * d)));
    }

    #[test]
    fn test_force_points_toward_origin() {
        let gravity = CenterGravity::default();
        for p in [
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(-1.0, 3.0, 0.5),
            Vec3::new(0.1, -0.2, -9.0),
            Vec3::new(-40.0, -40.0, 12.0),
        ] {
            let f = gravity.force_at(p);
            assert!(f.force.dot(p) < 0.0, "force {:?} at {p:?} does not pull inward", f.force);
        }
    }

    #[test]
    fn test_force_grows_with_distance() {
        let gravity = CenterGravity::default();
        let near = gravity.force_at(Vec3::new(0.0, 1.0, 0.0)).force.length();
        let far = gravity.force_at(Vec3::new(0.0, 4.0, 0.0)).force.length();
        assert!((far - 4.0 * near).abs() < EPSILON);
    }

    #[test]
    fn test_zero_at_origin() {
        let f = CenterGravity::default().force_at(Vec3::ZERO);
        assert_eq!(f.force, Vec3::ZERO);
        assert_eq!(f.offset, Vec3::ZERO);
    }

    #[test]
    fn test_offset_clamped() {
        let gravity = CenterGravity::default();
        let small = gravity.force_at(Vec3::new(2.0, 0.0, 0.0));
        assert!(approx_vec(small.offset, Vec3::splat(-0.0002)));

        let capped = gravity.force_at(Vec3::new(100.0, 0.0, 0.0));
        assert!(approx_vec(capped.offset, Vec3::splat(-0.001)));
    }
}
