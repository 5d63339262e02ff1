//! Shared GPU-side types for the ornament scene.
//!
//! Camera math, the per-frame render snapshot handed from the simulation to a
//! renderer, bytemuck uniform layouts, the procedural sphere mesh and the WGSL
//! shader all live here so the simulation, the wgpu backend and the web
//! runtime agree on one layout.

pub mod camera;
pub mod frame;
pub mod math;
pub mod mesh;
pub mod shaders;
pub mod uniforms;

pub use camera::PerspectiveCamera;
pub use frame::{AmbientLight, DirectionalLight, NullRenderer, RenderFrame, RenderInstance, SceneRenderer};
pub use math::{Plane, Ray};
