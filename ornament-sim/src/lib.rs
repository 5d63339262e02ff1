//! Platform-independent core of the ornament scene.
//!
//! The countdown arithmetic, the rigid-body world and its center-gravity
//! force, ornament placement, the scene graph and the frame loop live here.
//! Nothing in this crate touches a GPU or a DOM; the web runtime and the CLI
//! drive it through [`FrameLoop`] and a [`SceneRenderer`](ornament_gpu_shared::SceneRenderer).

pub mod config;
pub mod countdown;
pub mod error;
pub mod frame_loop;
pub mod gravity;
pub mod models;
pub mod physics;
pub mod scene;
pub mod simulation;
pub mod spawn;

pub use config::SceneConfig;
pub use countdown::{Countdown, CountdownDigits, CountdownDisplay, Remaining};
pub use error::{SimError, SimResult};
pub use frame_loop::{FrameClock, FrameLoop, LoopControl, LoopState, StopSignal};
pub use gravity::CenterGravity;
pub use models::{ModelPool, OrnamentModel};
pub use physics::{BodyId, PhysicsWorld};
pub use scene::{MeshId, SceneGraph};
pub use simulation::{FrameStats, OrnamentPair, Simulation};
