//! Controller polling through `gilrs`.
//!
//! The first connected pad is sampled once per frame into a
//! [`GamepadState`]; the normalizer decides whether it is used. Rumble
//! follows [`Simulation::rumble_active`](ringflight_kernel::Simulation::rumble_active)
//! and is only attempted on pads that report force feedback.

use gilrs::ff::{self, BaseEffect, BaseEffectType, Effect, EffectBuilder, Replay, Ticks};
use gilrs::{Axis, Event, EventType, Gamepad, GamepadId, Gilrs};
use ringflight_input::{Button, Buttons, GamepadState};

const RUMBLE_MAGNITUDE: u16 = 40_000;

/// Pad buttons and the game buttons they hold. Triggers are read as axes.
const PAD_BUTTONS: [(gilrs::Button, Button); 9] = [
    (gilrs::Button::Start, Button::Pause),
    (gilrs::Button::Select, Button::GamepadToggle),
    (gilrs::Button::South, Button::Turbo),
    (gilrs::Button::East, Button::Autopilot),
    (gilrs::Button::West, Button::CameraCycle),
    (gilrs::Button::North, Button::Fog),
    (gilrs::Button::LeftTrigger, Button::YawLeft),
    (gilrs::Button::RightTrigger, Button::YawRight),
    (gilrs::Button::Mode, Button::MouseMode),
];

/// Stick axis in `[-1, 1]` to the signed 16-bit range.
fn stick_axis(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}

/// Trigger travel in `[0, 1]` to the 8-bit range.
fn trigger(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * u8::MAX as f32).round() as u8
}

fn pad_buttons(is_pressed: impl Fn(gilrs::Button) -> bool) -> Buttons {
    Buttons::from_held(
        PAD_BUTTONS
            .iter()
            .filter(|(pad, _)| is_pressed(*pad))
            .map(|(_, button)| *button),
    )
}

fn sample(pad: &Gamepad<'_>) -> GamepadState {
    let trigger_value = |b| pad.button_data(b).map_or(0.0, |d| d.value());
    GamepadState {
        left_stick: [
            stick_axis(pad.value(Axis::LeftStickX)),
            stick_axis(pad.value(Axis::LeftStickY)),
        ],
        right_stick: [
            stick_axis(pad.value(Axis::RightStickX)),
            stick_axis(pad.value(Axis::RightStickY)),
        ],
        left_trigger: trigger(trigger_value(gilrs::Button::LeftTrigger2)),
        right_trigger: trigger(trigger_value(gilrs::Button::RightTrigger2)),
        buttons: pad_buttons(|b| pad.is_pressed(b)),
    }
}

/// Owns the controller backend, the active pad and its rumble effect.
pub struct GamepadPoller {
    gilrs: Option<Gilrs>,
    active: Option<GamepadId>,
    effect: Option<Effect>,
    rumbling: bool,
    rumble_ms: u32,
}

impl GamepadPoller {
    /// A missing controller backend is not fatal; the game runs on keyboard
    /// and mouse alone.
    pub fn new(rumble_seconds: f32) -> Self {
        let gilrs = match Gilrs::new() {
            Ok(gilrs) => Some(gilrs),
            Err(err) => {
                tracing::warn!(%err, "gamepad support unavailable");
                None
            }
        };
        Self {
            gilrs,
            active: None,
            effect: None,
            rumbling: false,
            rumble_ms: (rumble_seconds.max(0.0) * 1000.0) as u32,
        }
    }

    /// Drain controller events and sample the active pad, if any.
    pub fn poll(&mut self) -> Option<GamepadState> {
        let gilrs = self.gilrs.as_mut()?;
        while let Some(Event { id, event, .. }) = gilrs.next_event() {
            match event {
                EventType::Connected if self.active.is_none() => {
                    tracing::info!(pad = %gilrs.gamepad(id).name(), "gamepad connected");
                    self.active = Some(id);
                }
                EventType::Disconnected if self.active == Some(id) => {
                    tracing::info!("gamepad disconnected");
                    self.active = None;
                    self.effect = None;
                    self.rumbling = false;
                }
                _ => {}
            }
        }
        if self.active.is_none() {
            self.active = gilrs.gamepads().next().map(|(id, _)| id);
        }
        let pad = gilrs.connected_gamepad(self.active?)?;
        Some(sample(&pad))
    }

    /// Start or stop the rumble effect on an edge of `on`.
    pub fn set_rumble(&mut self, on: bool) {
        if on == self.rumbling {
            return;
        }
        self.rumbling = on;
        if let Err(err) = self.apply_rumble(on) {
            tracing::warn!(%err, "rumble failed");
        }
    }

    fn apply_rumble(&mut self, on: bool) -> Result<(), ff::Error> {
        let (Some(gilrs), Some(id)) = (self.gilrs.as_mut(), self.active) else {
            return Ok(());
        };
        if self.effect.is_none() && on {
            if !gilrs.connected_gamepad(id).is_some_and(|p| p.is_ff_supported()) {
                return Ok(());
            }
            let effect = EffectBuilder::new()
                .add_effect(BaseEffect {
                    kind: BaseEffectType::Strong {
                        magnitude: RUMBLE_MAGNITUDE,
                    },
                    scheduling: Replay {
                        play_for: Ticks::from_ms(self.rumble_ms),
                        ..Default::default()
                    },
                    ..Default::default()
                })
                .gamepads(&[id])
                .finish(gilrs)?;
            self.effect = Some(effect);
        }
        match &self.effect {
            Some(effect) if on => effect.play(),
            Some(effect) => effect.stop(),
            None => Ok(()),
        }
    }
}
