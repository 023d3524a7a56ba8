use crate::action::{ControlFrame, MouseMode, Throttle, Toggle, Toggles};
use crate::raw::{Button, Buttons, GamepadState, RawInput};
use crate::smoothing::SmoothDamp;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Limits and rates for turning raw samples into control intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Largest steering component, either axis.
    pub steer_max: f32,
    /// Steering change per tick while a key is held.
    pub steer_step: f32,
    /// Largest yaw intent in degrees.
    pub yaw_max: f32,
    pub yaw_step: f32,
    /// Free-look range in degrees either side of centre.
    pub look_max: f32,
    /// Stick magnitude below which the stick reads as centred.
    pub stick_deadzone: i16,
    /// Smoothing time for stick-driven steering and look, in seconds.
    pub smooth_time: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            steer_max: 5.0,
            steer_step: 0.05,
            yaw_max: 45.0,
            yaw_step: 1.0,
            look_max: 45.0,
            stick_deadzone: 7849,
            smooth_time: 0.1,
        }
    }
}

/// Step a held-key intent one tick.
///
/// With both or neither key held the value returns toward zero by `step`,
/// snapping to zero once within two steps. Pushing against the current sign
/// moves twice as fast. The result is clamped to `[-max, max]`.
pub fn decaying_intent(current: f32, plus: bool, minus: bool, max: f32, step: f32) -> f32 {
    if plus == minus {
        if current.abs() < 2.0 * step {
            return 0.0;
        }
        return current - step * current.signum();
    }
    let mut next = current;
    if plus && next < max {
        next += if next < 0.0 { 2.0 * step } else { step };
    }
    if minus && next > -max {
        next -= if next > 0.0 { 2.0 * step } else { step };
    }
    next.clamp(-max, max)
}

/// Map a signed 16-bit stick to `[-1, 1]` per axis, zero inside the deadzone.
pub fn filter_stick(raw: [i16; 2], deadzone: i16) -> Vec2 {
    let x = raw[0] as f32;
    let y = raw[1] as f32;
    if (x * x + y * y).sqrt() < deadzone as f32 {
        return Vec2::ZERO;
    }
    Vec2::new(x / i16::MAX as f32, y / i16::MAX as f32).clamp(Vec2::NEG_ONE, Vec2::ONE)
}

/// Converts raw samples into one [`ControlFrame`] per tick.
///
/// Owns the state that has to persist between ticks: previous buttons for
/// edge detection, decaying steering and yaw, smoothing filters, the mouse
/// mode and the gamepad enable flag.
#[derive(Debug, Clone)]
pub struct InputNormalizer {
    pub config: InputConfig,
    previous: Buttons,
    steer: Vec2,
    yaw: f32,
    mouse_mode: MouseMode,
    view_latched: bool,
    look: Vec2,
    gamepad_enabled: bool,
    stick_steer: [SmoothDamp; 2],
    stick_look: [SmoothDamp; 2],
}

impl InputNormalizer {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            previous: Buttons::NONE,
            steer: Vec2::ZERO,
            yaw: 0.0,
            mouse_mode: MouseMode::Off,
            view_latched: false,
            look: Vec2::ZERO,
            gamepad_enabled: false,
            stick_steer: [SmoothDamp::default(); 2],
            stick_look: [SmoothDamp::default(); 2],
        }
    }

    pub fn mouse_mode(&self) -> MouseMode {
        self.mouse_mode
    }

    pub fn gamepad_enabled(&self) -> bool {
        self.gamepad_enabled
    }

    /// Freeze or release the free-look angles (mouse click outside a menu).
    pub fn toggle_view_latch(&mut self) {
        self.view_latched = !self.view_latched;
        tracing::debug!(latched = self.view_latched, "view latch toggled");
    }

    /// Zero all held intent, e.g. when a new game starts.
    pub fn reset_intent(&mut self) {
        self.steer = Vec2::ZERO;
        self.yaw = 0.0;
        self.stick_steer = [SmoothDamp::default(); 2];
        self.stick_look = [SmoothDamp::default(); 2];
    }

    /// Produce the control frame for one tick of `dt` seconds.
    pub fn sample(&mut self, raw: &RawInput, dt: f32) -> ControlFrame {
        let held = match raw.gamepad {
            Some(pad) => raw.buttons.union(pad.buttons),
            None => raw.buttons,
        };
        let toggles = self.edges(held);

        if toggles.contains(Toggle::MouseMode) {
            self.mouse_mode = self.mouse_mode.next();
            tracing::debug!(mode = ?self.mouse_mode, "mouse mode");
        }
        if toggles.contains(Toggle::GamepadToggle) {
            self.gamepad_enabled = !self.gamepad_enabled;
            tracing::debug!(enabled = self.gamepad_enabled, "gamepad toggled");
        }

        let cfg = &self.config;
        self.yaw = decaying_intent(
            self.yaw,
            held.is_held(Button::YawLeft),
            held.is_held(Button::YawRight),
            cfg.yaw_max,
            cfg.yaw_step,
        );

        let pad = raw.gamepad.filter(|_| self.gamepad_enabled);
        let throttle = match pad {
            Some(pad) => self.sample_gamepad(&pad, dt),
            None => {
                self.sample_keyboard_mouse(held, raw.mouse);
                Throttle::Step {
                    up: held.is_held(Button::ThrottleUp),
                    down: held.is_held(Button::ThrottleDown),
                }
            }
        };

        ControlFrame {
            steer: self.steer,
            yaw: self.yaw,
            throttle,
            toggles,
            look: self.look,
            mouse_mode: self.mouse_mode,
            gamepad_active: pad.is_some(),
        }
    }

    fn edges(&mut self, held: Buttons) -> Toggles {
        let pressed = held.newly_pressed(self.previous);
        self.previous = held;
        let mut toggles = Toggles::NONE;
        for (button, toggle) in [
            (Button::Pause, Toggle::Pause),
            (Button::Autopilot, Toggle::Autopilot),
            (Button::CameraCycle, Toggle::CameraCycle),
            (Button::Fog, Toggle::Fog),
            (Button::MouseMode, Toggle::MouseMode),
            (Button::GamepadToggle, Toggle::GamepadToggle),
            (Button::Turbo, Toggle::Turbo),
        ] {
            if pressed.is_held(button) {
                toggles.insert(toggle);
            }
        }
        toggles
    }

    fn sample_keyboard_mouse(&mut self, held: Buttons, mouse: Vec2) {
        let cfg = &self.config;
        let mouse = mouse.clamp(Vec2::ZERO, Vec2::ONE);
        match self.mouse_mode {
            MouseMode::Control => {
                self.steer = Vec2::new(
                    cfg.steer_max * (1.0 - 2.0 * mouse.y),
                    cfg.steer_max * (2.0 * mouse.x - 1.0),
                );
            }
            MouseMode::Off | MouseMode::View => {
                self.steer = Vec2::new(
                    decaying_intent(
                        self.steer.x,
                        held.is_held(Button::PitchUp),
                        held.is_held(Button::PitchDown),
                        cfg.steer_max,
                        cfg.steer_step,
                    ),
                    decaying_intent(
                        self.steer.y,
                        held.is_held(Button::SteerRight),
                        held.is_held(Button::SteerLeft),
                        cfg.steer_max,
                        cfg.steer_step,
                    ),
                );
            }
        }
        match self.mouse_mode {
            MouseMode::View if !self.view_latched => {
                self.look = (mouse * 2.0 - Vec2::ONE) * cfg.look_max;
            }
            MouseMode::View => {}
            MouseMode::Off | MouseMode::Control => self.look = Vec2::ZERO,
        }
    }

    fn sample_gamepad(&mut self, pad: &GamepadState, dt: f32) -> Throttle {
        let cfg = &self.config;
        let left = filter_stick(pad.left_stick, cfg.stick_deadzone);
        let right = filter_stick(pad.right_stick, cfg.stick_deadzone);

        // Stick up pitches up, stick right steers toward +z.
        let steer_target = Vec2::new(left.y, left.x) * cfg.steer_max;
        self.steer = Vec2::new(
            self.stick_steer[0].step(steer_target.x, cfg.smooth_time, dt),
            self.stick_steer[1].step(steer_target.y, cfg.smooth_time, dt),
        );
        let look_target = right * cfg.look_max;
        self.look = Vec2::new(
            self.stick_look[0].step(look_target.x, cfg.smooth_time, dt),
            self.stick_look[1].step(look_target.y, cfg.smooth_time, dt),
        );

        Throttle::Analog {
            accelerate: pad.right_trigger as f32 / u8::MAX as f32,
            brake: pad.left_trigger as f32 / u8::MAX as f32,
        }
    }
}

impl Default for InputNormalizer {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.01;

    fn held(buttons: &[Button]) -> RawInput {
        RawInput {
            buttons: Buttons::from_held(buttons.iter().copied()),
            mouse: Vec2::splat(0.5),
            gamepad: None,
        }
    }

    #[test]
    fn toggle_fires_once_per_press() {
        let mut n = InputNormalizer::default();
        let f1 = n.sample(&held(&[Button::Pause]), DT);
        let f2 = n.sample(&held(&[Button::Pause]), DT);
        let f3 = n.sample(&held(&[]), DT);
        let f4 = n.sample(&held(&[Button::Pause]), DT);
        assert!(f1.toggles.contains(Toggle::Pause));
        assert!(!f2.toggles.contains(Toggle::Pause));
        assert!(f3.toggles.is_empty());
        assert!(f4.toggles.contains(Toggle::Pause));
    }

    #[test]
    fn held_steering_is_clamped() {
        let mut n = InputNormalizer::default();
        let mut frame = ControlFrame::default();
        for _ in 0..1000 {
            frame = n.sample(&held(&[Button::PitchUp, Button::SteerLeft]), DT);
        }
        assert!((frame.steer.x - 5.0).abs() < 1e-4);
        assert!((frame.steer.y + 5.0).abs() < 1e-4);
    }

    #[test]
    fn released_steering_decays_to_zero() {
        let mut n = InputNormalizer::default();
        for _ in 0..40 {
            n.sample(&held(&[Button::PitchUp]), DT);
        }
        let mut prev = n.sample(&held(&[]), DT).steer.x.abs();
        assert!(prev > 0.0);
        let mut reached_zero = false;
        for _ in 0..100 {
            let now = n.sample(&held(&[]), DT).steer.x.abs();
            assert!(now <= prev, "decay must be monotonic");
            prev = now;
            if now == 0.0 {
                reached_zero = true;
            }
        }
        assert!(reached_zero);
    }

    #[test]
    fn opposing_keys_cancel_and_decay() {
        let mut n = InputNormalizer::default();
        for _ in 0..10 {
            n.sample(&held(&[Button::YawLeft]), DT);
        }
        let before = n.sample(&held(&[Button::YawLeft, Button::YawRight]), DT).yaw;
        let after = n.sample(&held(&[Button::YawLeft, Button::YawRight]), DT).yaw;
        assert!(after < before);
    }

    #[test]
    fn reversing_moves_twice_as_fast() {
        assert_eq!(decaying_intent(1.0, false, true, 5.0, 0.25), 0.5);
        assert_eq!(decaying_intent(1.0, true, false, 5.0, 0.25), 1.25);
        assert_eq!(decaying_intent(0.3, false, false, 5.0, 0.25), 0.0);
    }

    #[test]
    fn keyboard_throttle_is_stepped() {
        let mut n = InputNormalizer::default();
        let f = n.sample(&held(&[Button::ThrottleUp]), DT);
        assert_eq!(f.throttle, Throttle::Step { up: true, down: false });
    }

    #[test]
    fn mouse_mode_cycle_and_control_steering() {
        let mut n = InputNormalizer::default();
        n.sample(&held(&[Button::MouseMode]), DT);
        assert_eq!(n.mouse_mode(), MouseMode::View);
        n.sample(&held(&[]), DT);
        n.sample(&held(&[Button::MouseMode]), DT);
        assert_eq!(n.mouse_mode(), MouseMode::Control);

        let raw = RawInput {
            mouse: Vec2::new(1.0, 0.0),
            ..RawInput::default()
        };
        let f = n.sample(&raw, DT);
        assert_eq!(f.steer, Vec2::new(5.0, 5.0));
        assert_eq!(f.mouse_mode, MouseMode::Control);
    }

    #[test]
    fn view_latch_freezes_look() {
        let mut n = InputNormalizer::default();
        n.sample(&held(&[Button::MouseMode]), DT);
        let raw = RawInput {
            mouse: Vec2::new(1.0, 0.5),
            ..RawInput::default()
        };
        let f = n.sample(&raw, DT);
        assert_eq!(f.look, Vec2::new(45.0, 0.0));

        n.toggle_view_latch();
        let moved = RawInput {
            mouse: Vec2::new(0.0, 0.0),
            ..RawInput::default()
        };
        assert_eq!(n.sample(&moved, DT).look, Vec2::new(45.0, 0.0));
    }

    #[test]
    fn stick_deadzone_reads_zero() {
        assert_eq!(filter_stick([1000, -2000], 7849), Vec2::ZERO);
        let full = filter_stick([i16::MAX, 0], 7849);
        assert!((full.x - 1.0).abs() < 1e-6);
        let min = filter_stick([i16::MIN, 0], 7849);
        assert_eq!(min.x, -1.0);
    }

    #[test]
    fn gamepad_ignored_until_enabled() {
        let mut n = InputNormalizer::default();
        let pad = GamepadState {
            left_stick: [0, i16::MAX],
            right_trigger: 255,
            ..GamepadState::default()
        };
        let raw = RawInput {
            gamepad: Some(pad),
            ..RawInput::default()
        };
        let f = n.sample(&raw, DT);
        assert!(!f.gamepad_active);
        assert!(matches!(f.throttle, Throttle::Step { .. }));

        let toggle = RawInput {
            buttons: Buttons::from_held([Button::GamepadToggle]),
            gamepad: Some(pad),
            ..RawInput::default()
        };
        let f = n.sample(&toggle, DT);
        assert!(f.gamepad_active);
        assert_eq!(
            f.throttle,
            Throttle::Analog {
                accelerate: 1.0,
                brake: 0.0
            }
        );
        // Smoothed: moving toward full pitch but not there yet.
        assert!(f.steer.x > 0.0 && f.steer.x < 5.0);
    }
}
