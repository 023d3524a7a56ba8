use glam::Vec3;
use ringflight_kernel::{GameMode, MenuItem, Simulation};
use std::fmt::Write;

/// Camera and frame information for one rendered frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Frames per second as measured by the front end.
    pub fps: f32,
    /// Menu item under the pointer, drawn highlighted.
    pub hovered: Option<MenuItem>,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(-20.0, 10.0, 0.0),
            target: Vec3::ZERO,
            fov_degrees: 60.0,
            fps: 0.0,
            hovered: None,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the simulation and a view and produces output. It never
/// mutates the simulation.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, sim: &Simulation, view: &RenderView) -> Self::Output;
}

/// The one-line status shown in the corner of every frame.
pub fn hud_line(score: i32, lives: u32, fps: f32, timer: f32) -> String {
    format!("Score: {score} Lives: {lives} FPS: {fps:.2} Timer: {timer:.2}")
}

/// Plain-text renderer: the HUD line, flight status and the menu overlay.
///
/// Used by the CLI and for logging; also exercises the render interface in
/// tests without a GPU.
#[derive(Debug, Default)]
pub struct HudTextRenderer {
    /// Include the per-ring listing.
    pub verbose: bool,
}

impl HudTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl Renderer for HudTextRenderer {
    type Output = String;

    fn render(&self, sim: &Simulation, view: &RenderView) -> String {
        let session = sim.session();
        let craft = sim.craft();
        let track = sim.track();
        let mut out = hud_line(session.score, session.lives, view.fps, session.elapsed);
        out.push('\n');

        let mode = match sim.mode() {
            GameMode::Playing if session.autopilot => "autopilot",
            GameMode::Playing => "playing",
            GameMode::Paused => "paused",
            GameMode::GameOver => "game over",
        };
        // writing to a String cannot fail
        let _ = writeln!(
            out,
            "Level {}/{} {} [{mode}] ring {}/{} pos=({:.1}, {:.1}, {:.1}) speed={:.1} force={:.0}",
            session.level + 1,
            sim.level_count(),
            session.difficulty,
            track.cursor().min(track.rings().len()),
            track.rings().len(),
            craft.position.x,
            craft.position.y,
            craft.position.z,
            craft.speed,
            craft.force,
        );

        if self.verbose {
            for (i, ring) in track.rings().iter().enumerate() {
                let marker = if i == track.cursor() { '>' } else { ' ' };
                let p = ring.position;
                let _ = writeln!(
                    out,
                    " {marker} ring {i} {:?} pos=({:.1}, {:.1}, {:.1}) spin={:.0}",
                    ring.movement, p.x, p.y, p.z, ring.spin
                );
            }
        }

        let menu = sim.menu();
        if let Some(items) = menu.items() {
            let _ = writeln!(out, "== {} ==", menu.banner.text());
            for item in items {
                let marker = if view.hovered == Some(item) { '*' } else { '-' };
                let _ = writeln!(out, "  {marker} {}", item.label());
            }
        }
        out
    }
}
