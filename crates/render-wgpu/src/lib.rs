//! wgpu render backend for ringflight.
//!
//! Draws the corridor as a wireframe, every ring as a loop of instanced box
//! segments, and the craft as a box sized to its bounds. Exponential fog
//! blends toward the sky colour when the simulation has fog on.
//!
//! # Invariants
//! - The renderer never mutates the simulation.
//! - Camera placement is not part of the deterministic simulation.
//! - The fixed simulation tick is independent of the render frame rate.

mod camera;
mod gpu;
mod shaders;

pub use camera::ChaseCamera;
pub use gpu::{InstanceData, LineVertex, RING_SEGMENTS, WgpuRenderer, corridor_lines, scene_instances};
