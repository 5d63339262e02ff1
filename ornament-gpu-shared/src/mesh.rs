use std::f32::consts::PI;

use crate::uniforms::Vertex;

/// Indexed triangle mesh on the CPU, ready for upload.
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Unit-radius UV sphere centred on the origin.
///
/// `segments` runs around the equator, `rings` from pole to pole. Both are
/// clamped to a minimum of 3 and 2.
pub fn uv_sphere(segments: u32, rings: u32) -> MeshData {
    let segments = segments.max(3);
    let rings = rings.max(2);

    let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let theta = v * PI;
        for segment in 0..=segments {
            let u = segment as f32 / segments as f32;
            let phi = u * 2.0 * PI;
            let n = [
                -phi.cos() * theta.sin(),
                theta.cos(),
                phi.sin() * theta.sin(),
            ];
            vertices.push(Vertex {
                position: n,
                normal: n,
            });
        }
    }

    let stride = segments + 1;
    let mut indices = Vec::with_capacity((segments * rings * 6) as usize);
    for ring in 0..rings {
        for segment in 0..segments {
            let a = ring * stride + segment;
            let b = a + stride;
            let c = b + 1;
            let d = a + 1;
            if ring != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if ring != rings - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    MeshData { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_vertices_on_unit_sphere() {
        let mesh = uv_sphere(16, 12);
        for v in &mesh.vertices {
            let len = (v.position[0].powi(2) + v.position[1].powi(2) + v.position[2].powi(2)).sqrt();
            assert!((len - 1.0).abs() < 1e-5, "vertex off sphere: {len}");
        }
    }

    #[test]
    fn test_sphere_indices_in_range() {
        let mesh = uv_sphere(10, 10);
        assert_eq!(mesh.indices.len() % 3, 0);
        let max = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < max));
    }

    #[test]
    fn test_degenerate_parameters_clamped() {
        let mesh = uv_sphere(0, 0);
        assert_eq!(mesh.vertices.len(), 4 * 3);
        assert!(!mesh.indices.is_empty());
    }
}
