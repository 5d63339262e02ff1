use glam::{Mat4, Vec3, Vec4};

/// A half-line in world space. `direction` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Plane in Hessian normal form: points `p` with `normal.dot(p) + constant == 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub constant: f32,
}

impl Plane {
    pub const fn new(normal: Vec3, constant: f32) -> Self {
        Self { normal, constant }
    }

    /// Signed distance of `point` from the plane.
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.constant
    }
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersect the ray with a plane.
    ///
    /// A ray lying inside the plane hits at its origin; a parallel ray that
    /// is off the plane, or a plane behind the origin, is a miss.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Vec3> {
        let denom = plane.normal.dot(self.direction);
        if denom.abs() < 1e-8 {
            if plane.distance_to_point(self.origin).abs() < 1e-8 {
                return Some(self.origin);
            }
            return None;
        }

        let t = -(self.origin.dot(plane.normal) + plane.constant) / denom;
        if t < 0.0 {
            return None;
        }
        Some(self.at(t))
    }
}

/// Build a world-space ray from a normalized device coordinate (`[-1, 1]` on
/// both axes) through a camera.
///
/// The NDC point is unprojected on the near plane and the ray runs from the
/// camera position through it.
pub fn unproject_ray(ndc_x: f32, ndc_y: f32, inverse_view_proj: &Mat4, camera_position: Vec3) -> Ray {
    let clip = Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
    let world = *inverse_view_proj * clip;
    let point = if world.w.abs() > 1e-12 {
        world.truncate() / world.w
    } else {
        world.truncate()
    };
    Ray::new(camera_position, point - camera_position)
}

/// Extract 6 frustum planes from a view-projection matrix (Gribb-Hartmann method).
/// Each plane is [a, b, c, d] where ax + by + cz + d = 0 (Hessian normal form).
///
/// The near plane uses the `[0, 1]` depth range of wgpu clip space.
pub fn extract_frustum_planes(vp: &Mat4) -> [[f32; 4]; 6] {
    let row0 = Vec4::new(vp.col(0).x, vp.col(1).x, vp.col(2).x, vp.col(3).x);
    let row1 = Vec4::new(vp.col(0).y, vp.col(1).y, vp.col(2).y, vp.col(3).y);
    let row2 = Vec4::new(vp.col(0).z, vp.col(1).z, vp.col(2).z, vp.col(3).z);
    let row3 = Vec4::new(vp.col(0).w, vp.col(1).w, vp.col(2).w, vp.col(3).w);

    let mut planes = [
        (row3 + row0).to_array(), // left
        (row3 - row0).to_array(), // right
        (row3 + row1).to_array(), // bottom
        (row3 - row1).to_array(), // top
        row2.to_array(),          // near
        (row3 - row2).to_array(), // far
    ];

    for plane in &mut planes {
        let len = (plane[0] * plane[0] + plane[1] * plane[1] + plane[2] * plane[2]).sqrt();
        if len > 1e-8 {
            plane[0] /= len;
            plane[1] /= len;
            plane[2] /= len;
            plane[3] /= len;
        }
    }

    planes
}

/// Test if a bounding sphere is inside or intersects the frustum.
pub fn sphere_in_frustum(planes: &[[f32; 4]; 6], center: Vec3, radius: f32) -> bool {
    for plane in planes {
        let dist = plane[0] * center.x + plane[1] * center.y + plane[2] * center.z + plane[3];
        if dist < -radius {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn scene_view_proj() -> Mat4 {
        let proj = Mat4::perspective_rh(PI / 4.0, 16.0 / 9.0, 0.1, 100.0);
        let view = Mat4::look_to_rh(Vec3::new(0.0, 0.0, 7.5), Vec3::NEG_Z, Vec3::Y);
        proj * view
    }

    // ── Ray / Plane ──

    #[test]
    fn test_ray_hits_plane_in_front() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let plane = Plane::new(Vec3::new(0.0, 0.0, -1.0), 0.0);
        let hit = ray.intersect_plane(&plane).expect("ray should hit");
        assert!(approx_eq(hit.z, 0.0));
    }

    #[test]
    fn test_ray_misses_plane_behind() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        let plane = Plane::new(Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(ray.intersect_plane(&plane).is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::X);
        let plane = Plane::new(Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(ray.intersect_plane(&plane).is_none());
    }

    #[test]
    fn test_ray_inside_plane_hits_origin() {
        let ray = Ray::new(Vec3::new(1.0, 2.0, 0.0), Vec3::X);
        let plane = Plane::new(Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert_eq!(ray.intersect_plane(&plane), Some(Vec3::new(1.0, 2.0, 0.0)));
    }

    // ── unproject_ray ──

    #[test]
    fn test_unproject_center_points_down_view_axis() {
        let inv = scene_view_proj().inverse();
        let ray = unproject_ray(0.0, 0.0, &inv, Vec3::new(0.0, 0.0, 7.5));
        assert!(approx_eq(ray.direction.x, 0.0));
        assert!(approx_eq(ray.direction.y, 0.0));
        assert!(approx_eq(ray.direction.z, -1.0));

        let hit = ray
            .intersect_plane(&Plane::new(Vec3::new(0.0, 0.0, -1.0), 0.0))
            .expect("center ray should hit the z=0 plane");
        assert!(hit.length() < EPSILON, "hit={hit:?}");
    }

    #[test]
    fn test_unproject_corner_leans_outward() {
        let inv = scene_view_proj().inverse();
        let ray = unproject_ray(1.0, 1.0, &inv, Vec3::new(0.0, 0.0, 7.5));
        assert!(ray.direction.x > 0.0);
        assert!(ray.direction.y > 0.0);
        assert!(approx_eq(ray.direction.length(), 1.0));
    }

    // ── extract_frustum_planes ──

    #[test]
    fn test_frustum_planes_normalized() {
        let planes = extract_frustum_planes(&scene_view_proj());
        for plane in &planes {
            let len = (plane[0] * plane[0] + plane[1] * plane[1] + plane[2] * plane[2]).sqrt();
            assert!(approx_eq(len, 1.0), "Plane normal not unit length: {len}");
        }
    }

    // ── sphere_in_frustum ──

    #[test]
    fn test_sphere_inside_frustum() {
        let planes = extract_frustum_planes(&scene_view_proj());
        assert!(sphere_in_frustum(&planes, Vec3::ZERO, 0.5));
    }

    #[test]
    fn test_sphere_behind_camera_culled() {
        let planes = extract_frustum_planes(&scene_view_proj());
        assert!(!sphere_in_frustum(&planes, Vec3::new(0.0, 0.0, 20.0), 1.0));
    }

    #[test]
    fn test_sphere_straddling_plane() {
        let planes = extract_frustum_planes(&scene_view_proj());
        assert!(sphere_in_frustum(&planes, Vec3::new(50.0, 0.0, 0.0), 100.0));
    }
}
