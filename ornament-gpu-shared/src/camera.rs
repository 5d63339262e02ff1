use glam::{Mat4, Vec3};

use crate::math::{unproject_ray, Ray};

/// Perspective camera looking along a fixed direction.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32, position: Vec3) -> Self {
        Self {
            fov_degrees,
            aspect,
            near,
            far,
            position,
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
        }
    }

    /// Update the aspect ratio from a viewport size. Zero-height viewports are ignored.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Ray from the camera through a normalized device coordinate.
    pub fn ray_through(&self, ndc_x: f32, ndc_y: f32) -> Ray {
        let inverse = self.view_projection().inverse();
        unproject_ray(ndc_x, ndc_y, &inverse, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_viewport_updates_aspect() {
        let mut camera = PerspectiveCamera::new(45.0, 1.0, 0.1, 100.0, Vec3::new(0.0, 0.0, 7.5));
        camera.set_viewport(1920.0, 1080.0);
        assert!((camera.aspect - 16.0 / 9.0).abs() < 1e-6);

        camera.set_viewport(800.0, 0.0);
        assert!((camera.aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_ray_through_center_is_forward() {
        let camera = PerspectiveCamera::new(45.0, 1.5, 0.1, 100.0, Vec3::new(0.0, 0.0, 7.5));
        let ray = camera.ray_through(0.0, 0.0);
        assert_eq!(ray.origin, camera.position);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
    }
}
