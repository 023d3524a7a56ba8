use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A physical control the front end can report as held.
///
/// Keyboard keys and gamepad buttons both map onto this set; the normalizer
/// never sees device-specific codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    PitchUp,
    PitchDown,
    SteerRight,
    SteerLeft,
    YawLeft,
    YawRight,
    ThrottleUp,
    ThrottleDown,
    Pause,
    Autopilot,
    MouseMode,
    Fog,
    CameraCycle,
    GamepadToggle,
    Turbo,
}

impl Button {
    pub const ALL: [Button; 15] = [
        Button::PitchUp,
        Button::PitchDown,
        Button::SteerRight,
        Button::SteerLeft,
        Button::YawLeft,
        Button::YawRight,
        Button::ThrottleUp,
        Button::ThrottleDown,
        Button::Pause,
        Button::Autopilot,
        Button::MouseMode,
        Button::Fog,
        Button::CameraCycle,
        Button::GamepadToggle,
        Button::Turbo,
    ];

    const fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// Set of held buttons packed into a single word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buttons(u32);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);

    pub fn from_held(held: impl IntoIterator<Item = Button>) -> Self {
        let mut set = Self::NONE;
        for b in held {
            set.set(b, true);
        }
        set
    }

    #[inline]
    pub const fn is_held(&self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }

    #[inline]
    pub fn set(&mut self, button: Button, held: bool) {
        if held {
            self.0 |= button.bit();
        } else {
            self.0 &= !button.bit();
        }
    }

    pub const fn union(self, other: Buttons) -> Buttons {
        Buttons(self.0 | other.0)
    }

    /// Buttons held in `self` but not in `previous`.
    pub const fn newly_pressed(self, previous: Buttons) -> Buttons {
        Buttons(self.0 & !previous.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// One sample of a game controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GamepadState {
    /// Left stick, signed 16-bit per axis, +y is stick up.
    pub left_stick: [i16; 2],
    /// Right stick, same convention.
    pub right_stick: [i16; 2],
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub buttons: Buttons,
}

/// Everything the front end sampled since the previous tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawInput {
    pub buttons: Buttons,
    /// Pointer position in window space, each axis in `[0, 1]`, origin top left.
    pub mouse: Vec2,
    pub gamepad: Option<GamepadState>,
}
