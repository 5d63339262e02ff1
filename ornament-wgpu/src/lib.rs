//! wgpu renderer for the ornament scene.
//!
//! Targets WebGPU where the browser has it and falls back to WebGL2 through
//! wgpu's `webgl` feature. The renderer draws every ornament as an instance
//! of one UV sphere over a transparent clear.

mod backend;
mod error;
mod pipeline;

pub use backend::{instance_capacity, physical_size, WgpuRenderer};
pub use error::RenderError;
pub use pipeline::{ScenePipeline, DEPTH_FORMAT};
