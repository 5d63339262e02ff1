//! Embedded WGSL shader source strings for the ornament pipeline.
//! Shared between the wgpu renderer and anything that validates shaders offline.

pub const ORNAMENT_WGSL: &str = include_str!("../shaders/ornament.wgsl");
