use bytemuck::{Pod, Zeroable};

/// Per-vertex data for the shared sphere mesh.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Per-frame uniform block (group 0, binding 0).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// xyz = camera position, w unused
    pub camera_position: [f32; 4],
    /// rgb = ambient colour premultiplied by intensity
    pub ambient: [f32; 4],
    /// xyz = direction the light travels, w unused
    pub light_direction: [f32; 4],
    /// rgb = directional colour premultiplied by intensity
    pub light_color: [f32; 4],
}

/// Per-instance vertex data: model matrix columns plus material.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// x = metallic, y = roughness
    pub material: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_block_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<FrameUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 64 + 4 * 16);
    }

    #[test]
    fn test_instance_stride() {
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 96);
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }
}
