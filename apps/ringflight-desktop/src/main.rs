mod gamepad;

use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use gamepad::GamepadPoller;
use glam::Vec2;
use ringflight_common::{Difficulty, GameConfig};
use ringflight_input::{Button, Buttons, InputConfig, InputNormalizer, RawInput};
use ringflight_kernel::{LevelGrid, MENU_BOXES, MenuResponse, SimEvent, Simulation, mouse_to_ndc};
use ringflight_render::hud_line;
use ringflight_render_wgpu::{ChaseCamera, WgpuRenderer};
use ringflight_tools::{FpsCounter, SimInspector};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "ringflight-desktop", about = "Fly the craft through the rings")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Game configuration (JSON). Missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input configuration (JSON).
    #[arg(long)]
    input_config: Option<PathBuf>,

    /// Level files in play order
    #[arg(long = "level", default_values = ["levels/level1.txt", "levels/level2.txt", "levels/level3.txt"])]
    levels: Vec<PathBuf>,

    /// Craft mesh (OBJ); its bounds drive collision
    #[arg(long)]
    mesh: Option<PathBuf>,

    /// Start a game straight away instead of the attract mode
    #[arg(long)]
    difficulty: Option<Difficulty>,
}

fn key_to_button(key: KeyCode) -> Option<Button> {
    Some(match key {
        KeyCode::KeyW => Button::PitchUp,
        KeyCode::KeyS => Button::PitchDown,
        KeyCode::KeyD => Button::SteerRight,
        KeyCode::KeyA => Button::SteerLeft,
        KeyCode::KeyI => Button::YawLeft,
        KeyCode::KeyK => Button::YawRight,
        KeyCode::KeyO => Button::ThrottleUp,
        KeyCode::KeyL => Button::ThrottleDown,
        KeyCode::KeyP => Button::Pause,
        KeyCode::KeyQ => Button::Autopilot,
        KeyCode::KeyM => Button::MouseMode,
        KeyCode::KeyF => Button::Fog,
        KeyCode::KeyC => Button::CameraCycle,
        KeyCode::KeyG => Button::GamepadToggle,
        KeyCode::KeyT => Button::Turbo,
        _ => return None,
    })
}

/// NDC rectangle to screen points, y down.
fn ndc_rect(min: Vec2, max: Vec2, screen: egui::Rect) -> egui::Rect {
    let to_screen = |p: Vec2| {
        egui::pos2(
            screen.left() + (p.x + 1.0) * 0.5 * screen.width(),
            screen.top() + (1.0 - p.y) * 0.5 * screen.height(),
        )
    };
    egui::Rect::from_two_pos(to_screen(min), to_screen(max))
}

/// Game state plus everything the front end samples between ticks.
struct AppState {
    sim: Simulation,
    normalizer: InputNormalizer,
    camera: ChaseCamera,
    gamepad: GamepadPoller,
    fps: FpsCounter,
    held: Buttons,
    /// Presses seen since the last tick, so a tap shorter than a tick still
    /// reaches the normalizer.
    tapped: Buttons,
    mouse: Vec2,
    look: Vec2,
    show_inspector: bool,
    last_frame: Instant,
    tick_accumulator: f64,
    tick_rate: f64,
}

impl AppState {
    fn new(sim: Simulation, input: InputConfig) -> Self {
        let tick_rate = sim.config().tick_seconds as f64;
        let gamepad = GamepadPoller::new(sim.config().rumble_seconds);
        Self {
            sim,
            normalizer: InputNormalizer::new(input),
            camera: ChaseCamera::default(),
            gamepad,
            fps: FpsCounter::new(),
            held: Buttons::NONE,
            tapped: Buttons::NONE,
            mouse: Vec2::splat(0.5),
            look: Vec2::ZERO,
            show_inspector: false,
            last_frame: Instant::now(),
            tick_accumulator: 0.0,
            tick_rate,
        }
    }

    fn update(&mut self, dt: Duration) {
        self.fps.record(dt);
        // cap the backlog after a stall
        self.tick_accumulator += dt.as_secs_f64().min(0.25);
        let pad = self.gamepad.poll();
        while self.tick_accumulator >= self.tick_rate {
            self.tick_accumulator -= self.tick_rate;
            let raw = RawInput {
                buttons: self.held.union(self.tapped),
                mouse: self.mouse,
                gamepad: pad,
            };
            self.tapped = Buttons::NONE;
            let frame = self.normalizer.sample(&raw, self.tick_rate as f32);
            self.look = frame.look;
            self.sim.step(&frame);
            self.log_events();
        }
        self.gamepad.set_rumble(self.sim.rumble_active());
        self.camera.update(&self.sim, self.sim.camera_mode(), self.look);
    }

    fn log_events(&mut self) {
        for event in self.sim.drain_events() {
            match event {
                SimEvent::RumbleStarted => tracing::debug!("rumble"),
                SimEvent::GameOver { score, level } => {
                    tracing::info!(score, level = level + 1, "game over")
                }
                other => tracing::trace!(event = ?other, "sim event"),
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if key == KeyCode::F1 && pressed {
            self.show_inspector = !self.show_inspector;
            return;
        }
        let Some(button) = key_to_button(key) else {
            return;
        };
        self.held.set(button, pressed);
        if pressed {
            self.tapped.set(button, true);
        }
    }

    /// Returns `true` when the player chose Exit.
    fn handle_click(&mut self) -> bool {
        match self.sim.click(mouse_to_ndc(self.mouse)) {
            MenuResponse::Hidden => {
                self.normalizer.toggle_view_latch();
                false
            }
            MenuResponse::Exit => true,
            MenuResponse::Missed | MenuResponse::Selected(_) => {
                self.log_events();
                false
            }
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        let session = self.sim.session();
        egui::Area::new(egui::Id::new("hud"))
            .fixed_pos(egui::pos2(12.0, 8.0))
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(hud_line(
                        session.score,
                        session.lives,
                        self.fps.fps(),
                        session.elapsed,
                    ))
                    .color(egui::Color32::BLACK)
                    .monospace(),
                );
            });

        let menu = *self.sim.menu();
        if let Some(items) = menu.items() {
            let screen = ctx.screen_rect();
            let hovered = self.sim.hovered(mouse_to_ndc(self.mouse));
            let painter = ctx.layer_painter(egui::LayerId::new(
                egui::Order::Foreground,
                egui::Id::new("menu"),
            ));
            let font = egui::FontId::proportional(28.0);
            let banner_pos = ndc_rect(Vec2::new(-0.25, 0.55), Vec2::new(0.25, 0.75), screen);
            painter.text(
                banner_pos.center(),
                egui::Align2::CENTER_CENTER,
                menu.banner.text(),
                egui::FontId::proportional(40.0),
                egui::Color32::WHITE,
            );
            for (b, item) in MENU_BOXES.iter().zip(items) {
                let rect = ndc_rect(b.min, b.max, screen);
                let fill = if hovered == Some(item) {
                    egui::Color32::from_rgb(200, 60, 40)
                } else {
                    egui::Color32::from_rgb(40, 60, 160)
                };
                painter.rect_filled(rect, 6.0, fill);
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    item.label(),
                    font.clone(),
                    egui::Color32::WHITE,
                );
            }
        }

        if !self.show_inspector {
            return;
        }
        let summary = SimInspector::summary(&self.sim);
        egui::SidePanel::left("inspector")
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.heading("Ringflight");
                ui.separator();
                ui.label(format!(
                    "Tick: {}  Level: {}/{}",
                    summary.tick, summary.level, summary.level_count
                ));
                ui.label(format!(
                    "Difficulty: {}  Mode: {:?}",
                    summary.difficulty, summary.mode
                ));
                ui.label(format!(
                    "Craft: ({:.1}, {:.1}, {:.1})  speed {:.1}  force {:.0}",
                    summary.position[0],
                    summary.position[1],
                    summary.position[2],
                    summary.speed,
                    summary.force
                ));
                ui.label(format!(
                    "Camera: {:?}  Mouse: {:?}  Fog: {}",
                    self.sim.camera_mode(),
                    self.normalizer.mouse_mode(),
                    if self.sim.fog() { "on" } else { "off" }
                ));
                ui.separator();
                ui.heading("Rings");
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for ring in SimInspector::rings(&self.sim) {
                        ui.monospace(ring.to_string());
                    }
                });
                ui.separator();
                ui.small("F1: Inspector | WASD: Steer | I/K: Yaw | O/L: Throttle | P: Pause");
            });
    }
}

/// Surface, device and egui state, created once the window exists.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Ringflight")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("ringflight_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, format, config.width, config.height);
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, format, None, 1, false);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            ?format,
            "GPU initialized"
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn draw(&mut self, egui_ctx: &EguiContext, state: &mut AppState) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer
            .render(&self.device, &self.queue, &view, &state.camera, &state.sim);

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| state.draw_ui(ctx));
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    /// Start-up failure, reported from `main` after the loop exits.
    error: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            gpu: None,
            egui_ctx: EguiContext::default(),
            error: None,
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx) {
            Ok(gpu) => {
                self.state.camera.aspect = gpu.aspect();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        if gpu.egui_winit.on_window_event(&gpu.window, &event).consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                gpu.resize(size);
                self.state.camera.aspect = gpu.aspect();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if key == KeyCode::Escape {
                    event_loop.exit();
                    return;
                }
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let size = gpu.window.inner_size();
                self.state.mouse = Vec2::new(
                    position.x as f32 / size.width.max(1) as f32,
                    position.y as f32 / size.height.max(1) as f32,
                )
                .clamp(Vec2::ZERO, Vec2::ONE);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                if self.state.handle_click() {
                    tracing::info!("exit selected");
                    event_loop.exit();
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now - self.state.last_frame;
                self.state.last_frame = now;
                self.state.update(dt);
                gpu.draw(&self.egui_ctx, &mut self.state);
                gpu.window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn load_simulation(cli: &Cli) -> Result<(Simulation, InputConfig)> {
    let config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    let input = match &cli.input_config {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening input config {}", path.display()))?;
            serde_json::from_reader(file)
                .with_context(|| format!("parsing input config {}", path.display()))?
        }
        None => InputConfig::default(),
    };
    let levels = cli
        .levels
        .iter()
        .map(|path| {
            LevelGrid::load(path).with_context(|| format!("loading level {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    let craft_bounds = ringflight_assets::craft_bounds(cli.mesh.as_deref())
        .context("loading craft mesh")?;

    let mut sim = Simulation::new(config, levels, craft_bounds).context("building simulation")?;
    if let Some(difficulty) = cli.difficulty {
        sim.new_game(difficulty);
    }
    Ok((sim, input))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("ringflight-desktop starting");

    let (sim, input) = load_simulation(&cli).inspect_err(|e| tracing::error!("{e:#}"))?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(AppState::new(sim, input));
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.error {
        tracing::error!("{e:#}");
        return Err(e);
    }
    Ok(())
}
