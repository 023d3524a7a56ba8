use crate::collision::{RingContact, WallSide, breached_wall};
use crate::flight::{Craft, autopilot_steer};
use crate::level::{LevelError, LevelGrid};
use crate::menu::{Banner, Menu, MenuItem, MenuMode};
use crate::session::{Expired, GameMode, Session};
use crate::track::Track;
use glam::{Vec2, Vec3};
use ringflight_common::{Aabb, CameraMode, Difficulty, GameConfig};
use ringflight_input::{ControlFrame, Toggle};
use serde::{Deserialize, Serialize};

/// Something that happened during a tick or a menu action.
///
/// The log is drained by the front end, which turns events into sounds,
/// rumble and log lines; the simulation itself never reads it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    NewGame { difficulty: Difficulty, demo: bool },
    RingEntered { index: usize },
    RingCollided { index: usize, lives: u32 },
    /// The cursor moved past a ring that was entered or clipped.
    RingPassed { index: usize },
    /// The cursor moved past a ring that was never reached.
    RingMissed { index: usize },
    WallBreached { side: WallSide },
    LevelComplete { level: usize },
    GameOver { score: i32, level: usize },
    Paused,
    Resumed,
    AutopilotToggled { on: bool },
    TurboStarted,
    TurboEnded,
    RumbleStarted,
    RumbleEnded,
    CameraChanged { mode: CameraMode },
    FogToggled { on: bool },
}

/// Result of a click while the simulation owns the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuResponse {
    /// No menu is shown; the click belongs to the camera.
    Hidden,
    /// Menu shown but the click hit no box.
    Missed,
    Selected(MenuItem),
    /// The player chose Exit. The front end should terminate.
    Exit,
}

/// Per-ring scoring guards, reset whenever the cursor moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct RingLatch {
    entered: bool,
    collided: bool,
}

/// The whole game state, stepped at a fixed rate.
///
/// Owns the craft, the current level's ring track, the session counters and
/// the menu. Front ends feed one [`ControlFrame`] per tick and read state back
/// through accessors.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: GameConfig,
    levels: Vec<LevelGrid>,
    craft_bounds: Aabb,
    session: Session,
    mode: GameMode,
    menu: Menu,
    track: Track,
    craft: Craft,
    camera: CameraMode,
    fog: bool,
    demo: bool,
    latch: RingLatch,
    tick: u64,
    event_log: Vec<SimEvent>,
}

impl Simulation {
    /// Start in attract mode: an autopilot run behind the welcome menu.
    pub fn new(
        config: GameConfig,
        levels: Vec<LevelGrid>,
        craft_bounds: Aabb,
    ) -> Result<Self, LevelError> {
        let first = levels.first().ok_or(LevelError::NoLevels)?;
        let difficulty = Difficulty::default();
        let track = Track::build(first, config.settings(difficulty), &config, &craft_bounds);
        let mut session = Session::new(difficulty, config.settings(difficulty).lives);
        session.autopilot = true;
        let mut sim = Self {
            craft: Craft::new(start_position(&track)),
            track,
            session,
            mode: GameMode::Playing,
            menu: Menu::shown(Banner::Welcome),
            camera: CameraMode::default(),
            fog: false,
            demo: true,
            latch: RingLatch::default(),
            tick: 0,
            event_log: Vec::new(),
            config,
            levels,
            craft_bounds,
        };
        sim.announce_game();
        Ok(sim)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn is_game_over(&self) -> bool {
        self.mode == GameMode::GameOver
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn craft(&self) -> &Craft {
        &self.craft
    }

    /// Craft extents relative to its position.
    pub fn craft_bounds(&self) -> &Aabb {
        &self.craft_bounds
    }

    /// Craft box in world space.
    pub fn craft_box(&self) -> Aabb {
        self.craft_bounds.translated(self.craft.position)
    }

    pub fn camera_mode(&self) -> CameraMode {
        self.camera
    }

    pub fn fog(&self) -> bool {
        self.fog
    }

    /// Attract mode is running behind the welcome menu.
    pub fn is_demo(&self) -> bool {
        self.demo
    }

    pub fn rumble_active(&self) -> bool {
        self.session.rumble_active()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.event_log
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Start a player game at `difficulty`.
    pub fn new_game(&mut self, difficulty: Difficulty) {
        self.reset(difficulty, false);
    }

    /// Restart attract mode at the current difficulty.
    pub fn start_demo(&mut self) {
        self.reset(self.session.difficulty, true);
    }

    fn reset(&mut self, difficulty: Difficulty, demo: bool) {
        let lives = self.config.settings(difficulty).lives;
        self.session = Session::new(difficulty, lives);
        self.session.autopilot = demo;
        self.demo = demo;
        self.mode = GameMode::Playing;
        self.menu = if demo {
            Menu::shown(Banner::Welcome)
        } else {
            Menu::default()
        };
        self.load_level();
        self.announce_game();
    }

    fn announce_game(&mut self) {
        let (difficulty, demo) = (self.session.difficulty, self.demo);
        tracing::info!(%difficulty, demo, lives = self.session.lives, "new game");
        self.event_log.push(SimEvent::NewGame { difficulty, demo });
    }

    /// Rebuild the track for the session's level and put a fresh craft at
    /// the start.
    fn load_level(&mut self) {
        let level = self.session.level.min(self.levels.len() - 1);
        let settings = self.config.settings(self.session.difficulty);
        self.track = Track::build(&self.levels[level], settings, &self.config, &self.craft_bounds);
        self.craft = Craft::new(start_position(&self.track));
        self.latch = RingLatch::default();
    }

    /// Item under an NDC point, for highlighting.
    pub fn hovered(&self, ndc: Vec2) -> Option<MenuItem> {
        self.menu.hit_test(ndc)
    }

    /// Handle a click at an NDC point.
    pub fn click(&mut self, ndc: Vec2) -> MenuResponse {
        if !self.menu.is_visible() {
            return MenuResponse::Hidden;
        }
        let Some(item) = self.menu.hit_test(ndc) else {
            return MenuResponse::Missed;
        };
        tracing::debug!(?item, "menu selection");
        match item {
            MenuItem::NewGame => self.new_game(self.session.difficulty),
            MenuItem::Difficulty => self.menu.mode = MenuMode::Difficulty,
            MenuItem::Exit => return MenuResponse::Exit,
            MenuItem::Select(difficulty) => self.new_game(difficulty),
        }
        MenuResponse::Selected(item)
    }

    /// Advance one fixed tick.
    ///
    /// Toggles are always handled; flight, ring motion and collision only
    /// run while playing.
    pub fn step(&mut self, frame: &ControlFrame) {
        let _span = tracing::info_span!("sim_step", tick = self.tick).entered();
        for toggle in frame.toggles.iter() {
            self.apply_toggle(toggle);
        }
        if self.mode != GameMode::Playing {
            return;
        }
        self.tick += 1;
        let dt = self.config.tick_seconds;
        self.session.elapsed += dt;
        for expired in self.session.expire() {
            self.event_log.push(match expired {
                Expired::Turbo => SimEvent::TurboEnded,
                Expired::Rumble => SimEvent::RumbleEnded,
            });
        }

        self.fly(frame, dt);
        self.track.advance_motion(&self.config);
        if self.check_rings(frame.gamepad_active) {
            self.game_over();
        } else {
            self.check_walls();
        }
        tracing::trace!(pos = ?self.craft.position, speed = self.craft.speed, "tick");
    }

    fn apply_toggle(&mut self, toggle: Toggle) {
        match toggle {
            Toggle::Pause => self.toggle_pause(),
            Toggle::Autopilot => {
                if !self.demo && self.mode != GameMode::GameOver {
                    self.session.autopilot = !self.session.autopilot;
                    self.event_log.push(SimEvent::AutopilotToggled {
                        on: self.session.autopilot,
                    });
                }
            }
            Toggle::CameraCycle => {
                self.camera = self.camera.next();
                self.event_log.push(SimEvent::CameraChanged { mode: self.camera });
            }
            Toggle::Fog => {
                self.fog = !self.fog;
                self.event_log.push(SimEvent::FogToggled { on: self.fog });
            }
            Toggle::Turbo => {
                if self.mode == GameMode::Playing {
                    self.session.start_turbo(self.config.turbo_seconds);
                    self.event_log.push(SimEvent::TurboStarted);
                }
            }
            // normalizer state, nothing to do here
            Toggle::MouseMode | Toggle::GamepadToggle => {}
        }
    }

    fn toggle_pause(&mut self) {
        match self.mode {
            GameMode::Playing if !self.demo => {
                self.mode = GameMode::Paused;
                self.menu = Menu::shown(Banner::Paused);
                self.event_log.push(SimEvent::Paused);
            }
            GameMode::Paused => {
                self.mode = GameMode::Playing;
                self.menu = Menu::default();
                self.event_log.push(SimEvent::Resumed);
            }
            GameMode::Playing | GameMode::GameOver => {}
        }
    }

    fn autopilot_target(&self) -> Option<Vec3> {
        let ring = self.track.current()?;
        if self.craft.position.x < ring.position.x {
            Some(ring.position)
        } else {
            self.track.upcoming().map(|r| r.position)
        }
    }

    fn fly(&mut self, frame: &ControlFrame, dt: f32) {
        let max_force = self.config.settings(self.session.difficulty).max_force;
        if self.session.turbo_active() {
            self.craft.force = max_force * self.config.turbo_force_factor;
        } else if self.session.autopilot {
            self.craft.force = max_force * self.config.autopilot_force_factor;
        } else {
            self.craft
                .apply_throttle(frame.throttle, max_force, self.config.force_increment);
        }

        let (steer, yaw) = if self.session.autopilot {
            (autopilot_steer(self.craft.position, self.autopilot_target()), 0.0)
        } else {
            (frame.steer, frame.yaw)
        };
        self.craft.integrate(steer, yaw, self.config.drag, dt);
    }

    /// Score the current ring. Returns `true` when a collision took the
    /// last life.
    fn check_rings(&mut self, gamepad_active: bool) -> bool {
        let craft = self.craft_box();
        while let Some(index) = self.track.advance_cursor(craft.min.x) {
            if self.latch.entered || self.latch.collided {
                self.event_log.push(SimEvent::RingPassed { index });
            } else {
                self.session.score -= 1;
                tracing::debug!(index, score = self.session.score, "ring missed");
                self.event_log.push(SimEvent::RingMissed { index });
            }
            self.latch = RingLatch::default();
        }

        let Some(ring) = self.track.current().copied() else {
            return false;
        };
        let index = self.track.cursor();
        match self.track.shape().classify(&craft, ring.position, ring.spin) {
            RingContact::Outside => false,
            RingContact::Inside => {
                if !self.latch.entered && !self.latch.collided {
                    self.latch.entered = true;
                    self.session.score += 1;
                    tracing::debug!(index, score = self.session.score, "ring entered");
                    self.event_log.push(SimEvent::RingEntered { index });
                }
                false
            }
            RingContact::Collided if self.latch.collided => false,
            RingContact::Collided => {
                self.latch.collided = true;
                if self.latch.entered {
                    self.session.score -= 1;
                }
                let out_of_lives = self.session.lose_life();
                tracing::debug!(index, lives = self.session.lives, "ring collided");
                self.event_log.push(SimEvent::RingCollided {
                    index,
                    lives: self.session.lives,
                });
                if gamepad_active {
                    self.session.start_rumble(self.config.rumble_seconds);
                    self.event_log.push(SimEvent::RumbleStarted);
                }
                out_of_lives
            }
        }
    }

    fn check_walls(&mut self) {
        let craft = self.craft_box();
        let Some(side) = breached_wall(&self.track.corridor().walls, &craft) else {
            return;
        };
        self.event_log.push(SimEvent::WallBreached { side });
        if side == WallSide::Back {
            self.complete_level();
        } else {
            tracing::debug!(?side, "wall breached");
            self.game_over();
        }
    }

    fn complete_level(&mut self) {
        let level = self.session.level;
        self.event_log.push(SimEvent::LevelComplete { level });
        if level + 1 < self.levels.len() {
            self.session.level += 1;
            tracing::info!(level = self.session.level, score = self.session.score, "next level");
            self.load_level();
        } else {
            self.session.level = 0;
            self.game_over();
        }
    }

    fn game_over(&mut self) {
        self.mode = GameMode::GameOver;
        let (score, level) = (self.session.score, self.session.level);
        tracing::info!(score, level, demo = self.demo, "game over");
        self.event_log.push(SimEvent::GameOver { score, level });
        if self.demo {
            self.start_demo();
        } else {
            self.menu = Menu::shown(Banner::GameOver);
        }
    }
}

/// Start at x = 0, lined up with the first ring, or the corridor centre when
/// the level has none.
fn start_position(track: &Track) -> Vec3 {
    match track.rings().first() {
        Some(ring) => Vec3::new(0.0, ring.position.y, ring.position.z),
        None => {
            let c = track.corridor().bounds.center();
            Vec3::new(0.0, c.y, c.z)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringflight_input::Throttle;

    const ONE_RING: &str = "1 1\n5S\n";

    fn sim_with(levels: &[&str], config: GameConfig) -> Simulation {
        let grids = levels
            .iter()
            .enumerate()
            .map(|(i, text)| LevelGrid::parse(&format!("level{i}"), text).unwrap())
            .collect();
        let mut sim = Simulation::new(config, grids, Aabb::default()).unwrap();
        sim.new_game(Difficulty::Medium);
        sim.drain_events();
        sim
    }

    fn no_drag() -> GameConfig {
        GameConfig {
            drag: 0.0,
            ..GameConfig::default()
        }
    }

    fn count(events: &[SimEvent], pred: impl Fn(&SimEvent) -> bool) -> usize {
        events.iter().filter(|e| pred(e)).count()
    }

    #[test]
    fn starts_in_attract_mode() {
        let grids = vec![LevelGrid::parse("l", ONE_RING).unwrap()];
        let sim = Simulation::new(GameConfig::default(), grids, Aabb::default()).unwrap();
        assert!(sim.is_demo());
        assert!(sim.session().autopilot);
        assert_eq!(sim.menu().banner, Banner::Welcome);
        assert_eq!(sim.mode(), GameMode::Playing);
        assert_eq!(sim.craft().position, Vec3::new(0.0, 25.0, 0.0));
    }

    #[test]
    fn no_levels_is_an_error() {
        let err = Simulation::new(GameConfig::default(), Vec::new(), Aabb::default()).unwrap_err();
        assert!(matches!(err, LevelError::NoLevels));
    }

    #[test]
    fn straight_through_a_single_ring() {
        let mut sim = sim_with(&[ONE_RING], no_drag());
        sim.craft.speed = 20.0;
        let idle = ControlFrame::default();
        for _ in 0..1_000 {
            sim.step(&idle);
            if sim.track().is_finished() {
                break;
            }
        }
        assert!(sim.track().is_finished());
        assert_eq!(sim.session().score, 1);
        assert_eq!(sim.session().lives, 5);
        let events = sim.drain_events();
        assert_eq!(count(&events, |e| matches!(e, SimEvent::RingEntered { .. })), 1);
        assert_eq!(count(&events, |e| matches!(e, SimEvent::RingPassed { index: 0 })), 1);
        assert_eq!(count(&events, |e| matches!(e, SimEvent::RingMissed { .. })), 0);
        assert_eq!(count(&events, |e| matches!(e, SimEvent::RingCollided { .. })), 0);
        assert!(!sim.is_game_over());
    }

    #[test]
    fn exit_wall_on_last_level_ends_game() {
        let mut sim = sim_with(&[ONE_RING], no_drag());
        sim.craft.speed = 100.0;
        let idle = ControlFrame::default();
        for _ in 0..1_000 {
            sim.step(&idle);
            if sim.is_game_over() {
                break;
            }
        }
        assert!(sim.is_game_over());
        assert_eq!(sim.session().level, 0);
        assert_eq!(sim.menu().banner, Banner::GameOver);
        let events = sim.events();
        assert!(events.contains(&SimEvent::WallBreached { side: WallSide::Back }));
        assert!(events.contains(&SimEvent::LevelComplete { level: 0 }));
    }

    #[test]
    fn exit_wall_advances_level() {
        let mut sim = sim_with(&[ONE_RING, "2 1\n3V\n6C\n"], no_drag());
        sim.craft.speed = 100.0;
        let idle = ControlFrame::default();
        for _ in 0..1_000 {
            sim.step(&idle);
            if sim.session().level == 1 {
                break;
            }
        }
        assert_eq!(sim.session().level, 1);
        assert_eq!(sim.mode(), GameMode::Playing);
        assert_eq!(sim.track().rings().len(), 2);
        assert_eq!(sim.track().cursor(), 0);
        assert_eq!(sim.craft().position.x, 0.0);
        assert_eq!(sim.craft().speed, 0.0);
        assert_eq!(sim.session().score, 1);
    }

    fn fly_until_over(sim: &mut Simulation, frame: &ControlFrame) {
        for _ in 0..1_000 {
            sim.step(frame);
            if sim.is_game_over() {
                break;
            }
        }
    }

    #[test]
    fn side_wall_ends_the_game() {
        let mut sim = sim_with(&[ONE_RING, ONE_RING], no_drag());
        sim.craft.speed = 100.0;
        let frame = ControlFrame {
            steer: Vec2::new(0.0, 5.0),
            ..ControlFrame::default()
        };
        fly_until_over(&mut sim, &frame);
        assert!(sim.is_game_over());
        assert_eq!(sim.session().level, 0);
        assert_eq!(sim.menu().banner, Banner::GameOver);
        let events = sim.events();
        assert!(events.contains(&SimEvent::WallBreached { side: WallSide::Right }));
        assert!(events.contains(&SimEvent::GameOver { score: 0, level: 0 }));
        assert_eq!(count(events, |e| matches!(e, SimEvent::LevelComplete { .. })), 0);
    }

    #[test]
    fn reversing_through_the_front_wall_ends_the_game() {
        let mut sim = sim_with(&[ONE_RING, ONE_RING], no_drag());
        sim.craft.speed = -50.0;
        fly_until_over(&mut sim, &ControlFrame::default());
        assert!(sim.is_game_over());
        assert_eq!(sim.session().level, 0);
        let events = sim.events();
        assert!(events.contains(&SimEvent::WallBreached { side: WallSide::Front }));
        assert_eq!(count(events, |e| matches!(e, SimEvent::LevelComplete { .. })), 0);
        assert_eq!(count(events, |e| matches!(e, SimEvent::GameOver { .. })), 1);
    }

    #[test]
    fn collisions_use_up_lives() {
        let mut config = no_drag();
        config.difficulties.medium.lives = 3;
        let mut sim = sim_with(&["3 1\n5S\n5S\n5S\n"], config);
        // box spans z 4.5..6.5, across the tube at z 5.5..6.5
        sim.craft.position.z = 5.5;
        sim.craft.speed = 50.0;
        let frame = ControlFrame {
            gamepad_active: true,
            ..ControlFrame::default()
        };
        for _ in 0..2_000 {
            sim.step(&frame);
            if sim.is_game_over() {
                break;
            }
        }
        assert!(sim.is_game_over());
        assert_eq!(sim.session().lives, 0);
        assert_eq!(sim.session().score, 0);
        let events = sim.events();
        assert_eq!(count(events, |e| matches!(e, SimEvent::RingCollided { .. })), 3);
        assert_eq!(count(events, |e| matches!(e, SimEvent::RumbleStarted)), 3);
        assert_eq!(count(events, |e| matches!(e, SimEvent::RingMissed { .. })), 0);
    }

    #[test]
    fn missing_a_ring_costs_a_point() {
        let mut sim = sim_with(&["2 1\n5S\n5S\n"], no_drag());
        sim.craft.position.z = 20.0;
        sim.craft.speed = 50.0;
        let idle = ControlFrame::default();
        for _ in 0..2_000 {
            sim.step(&idle);
            if sim.track().is_finished() {
                break;
            }
        }
        assert_eq!(sim.session().score, -2);
        assert_eq!(sim.session().lives, 5);
    }

    #[test]
    fn pause_freezes_the_world() {
        let mut sim = sim_with(&[ONE_RING], no_drag());
        sim.craft.speed = 10.0;
        sim.step(&ControlFrame::with_toggles([Toggle::Pause]));
        assert_eq!(sim.mode(), GameMode::Paused);
        assert_eq!(sim.menu().banner, Banner::Paused);
        let frozen = sim.craft().position;
        let tick = sim.tick();
        for _ in 0..50 {
            sim.step(&ControlFrame::default());
        }
        assert_eq!(sim.craft().position, frozen);
        assert_eq!(sim.tick(), tick);

        sim.step(&ControlFrame::with_toggles([Toggle::Pause]));
        assert_eq!(sim.mode(), GameMode::Playing);
        assert!(!sim.menu().is_visible());
        assert!(sim.craft().position.x > frozen.x);
    }

    #[test]
    fn menu_clicks() {
        let grids = vec![LevelGrid::parse("l", ONE_RING).unwrap()];
        let mut sim = Simulation::new(GameConfig::default(), grids, Aabb::default()).unwrap();
        assert_eq!(sim.click(Vec2::new(0.9, 0.9)), MenuResponse::Missed);
        assert_eq!(
            sim.click(Vec2::new(0.0, 0.4)),
            MenuResponse::Selected(MenuItem::NewGame)
        );
        assert!(!sim.is_demo());
        assert!(!sim.session().autopilot);
        assert_eq!(sim.click(Vec2::ZERO), MenuResponse::Hidden);

        sim.step(&ControlFrame::with_toggles([Toggle::Pause]));
        sim.click(Vec2::new(0.0, 0.0));
        assert_eq!(sim.menu().mode, MenuMode::Difficulty);
        sim.click(Vec2::new(0.0, -0.4));
        assert_eq!(sim.session().difficulty, Difficulty::Hard);
        assert_eq!(sim.session().lives, 3);
        assert_eq!(sim.mode(), GameMode::Playing);

        sim.step(&ControlFrame::with_toggles([Toggle::Pause]));
        assert_eq!(sim.click(Vec2::new(0.0, -0.4)), MenuResponse::Exit);
    }

    #[test]
    fn attract_mode_restarts_itself() {
        let grids = vec![LevelGrid::parse("l", ONE_RING).unwrap()];
        let mut sim = Simulation::new(GameConfig::default(), grids, Aabb::default()).unwrap();
        sim.drain_events();
        let idle = ControlFrame::default();
        for _ in 0..3_000 {
            sim.step(&idle);
            if sim.events().iter().any(|e| matches!(e, SimEvent::GameOver { .. })) {
                break;
            }
        }
        let events = sim.events();
        let over = events
            .iter()
            .position(|e| matches!(e, SimEvent::GameOver { .. }))
            .unwrap();
        assert!(matches!(events[over + 1], SimEvent::NewGame { demo: true, .. }));
        assert_eq!(sim.session().score, 0);
        assert_eq!(sim.mode(), GameMode::Playing);
        assert_eq!(sim.menu().banner, Banner::Welcome);
        assert!(events.contains(&SimEvent::RingEntered { index: 0 }));
    }

    #[test]
    fn turbo_boosts_then_expires() {
        let level = "10 1\n5S\n0\n0\n0\n0\n0\n0\n0\n0\n0\n";
        let mut sim = sim_with(&[level], GameConfig::default());
        sim.step(&ControlFrame::with_toggles([Toggle::Turbo]));
        assert_eq!(sim.craft().force, 15_000.0);
        for _ in 0..250 {
            sim.step(&ControlFrame::default());
        }
        assert!(sim.events().contains(&SimEvent::TurboEnded));
        assert!(!sim.is_game_over());
        // keyboard throttle takes over again, clamped to max force
        sim.step(&ControlFrame {
            throttle: Throttle::Step {
                up: false,
                down: false,
            },
            ..ControlFrame::default()
        });
        assert_eq!(sim.craft().force, 10_000.0);
    }

    #[test]
    fn autopilot_toggle_and_view_toggles() {
        let mut sim = sim_with(&[ONE_RING], GameConfig::default());
        sim.step(&ControlFrame::with_toggles([
            Toggle::Autopilot,
            Toggle::Fog,
            Toggle::CameraCycle,
        ]));
        assert!(sim.session().autopilot);
        assert!(sim.fog());
        assert_eq!(sim.camera_mode(), CameraMode::Cockpit);
        assert_eq!(sim.craft().force, 5_000.0);
    }

    #[test]
    fn same_inputs_same_outcome() {
        let mut a = sim_with(&["3 2\n4H 0\n0 6C\n2V 2A\n"], GameConfig::default());
        let mut b = a.clone();
        let frame = ControlFrame {
            steer: Vec2::new(0.3, -0.2),
            throttle: Throttle::Step {
                up: true,
                down: false,
            },
            ..ControlFrame::default()
        };
        for _ in 0..500 {
            a.step(&frame);
            b.step(&frame);
        }
        assert_eq!(a.craft().position, b.craft().position);
        assert_eq!(a.track().rings(), b.track().rings());
        assert_eq!(a.events(), b.events());
    }
}
