//! Rendering adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read the simulation, they never mutate it.
//! - Everything drawn derives from simulation state plus a [`RenderView`].
//!
//! The text renderer doubles as the HUD source for every front end: the
//! desktop overlay and the headless CLI print the same [`hud_line`].

mod renderer;

pub use renderer::{HudTextRenderer, RenderView, Renderer, hud_line};

pub fn crate_info() -> &'static str {
    "ringflight-render v0.1.0"
}
