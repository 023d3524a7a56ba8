use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A discrete mode switch. Fires once per physical press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Toggle {
    Pause,
    Autopilot,
    CameraCycle,
    Fog,
    MouseMode,
    GamepadToggle,
    Turbo,
}

impl Toggle {
    pub const ALL: [Toggle; 7] = [
        Toggle::Pause,
        Toggle::Autopilot,
        Toggle::CameraCycle,
        Toggle::Fog,
        Toggle::MouseMode,
        Toggle::GamepadToggle,
        Toggle::Turbo,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Toggle edges fired on one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toggles(u8);

impl Toggles {
    pub const NONE: Toggles = Toggles(0);

    pub fn insert(&mut self, toggle: Toggle) {
        self.0 |= toggle.bit();
    }

    #[inline]
    pub const fn contains(&self, toggle: Toggle) -> bool {
        self.0 & toggle.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Toggle> + '_ {
        Toggle::ALL.into_iter().filter(|t| self.contains(*t))
    }
}

impl FromIterator<Toggle> for Toggles {
    fn from_iter<I: IntoIterator<Item = Toggle>>(iter: I) -> Self {
        let mut set = Toggles::NONE;
        for t in iter {
            set.insert(t);
        }
        set
    }
}

/// Throttle intent for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Throttle {
    /// Keyboard: nudge the force accumulator up and/or down by one increment.
    Step { up: bool, down: bool },
    /// Controller triggers, each in `[0, 1]`, mapped straight onto force.
    Analog { accelerate: f32, brake: f32 },
}

impl Default for Throttle {
    fn default() -> Self {
        Throttle::Step {
            up: false,
            down: false,
        }
    }
}

/// What the mouse currently drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseMode {
    #[default]
    Off,
    /// Free-look camera.
    View,
    /// Pointer position steers the craft.
    Control,
}

impl MouseMode {
    pub fn next(self) -> Self {
        match self {
            MouseMode::Off => MouseMode::View,
            MouseMode::View => MouseMode::Control,
            MouseMode::Control => MouseMode::Off,
        }
    }
}

/// Normalised control signals for one simulation tick.
///
/// The simulation consumes frames, never raw device events, so keyboard,
/// mouse and gamepad all drive the same flight logic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlFrame {
    /// Steering intent: `x` is the vertical (y) component of the heading,
    /// `y` the lateral (z) component.
    pub steer: Vec2,
    /// Yaw intent in degrees.
    pub yaw: f32,
    pub throttle: Throttle,
    pub toggles: Toggles,
    /// Camera free-look offset in degrees (yaw, pitch).
    pub look: Vec2,
    pub mouse_mode: MouseMode,
    /// A controller is connected and enabled.
    pub gamepad_active: bool,
}

impl ControlFrame {
    /// A frame that only carries toggle edges.
    pub fn with_toggles(toggles: impl IntoIterator<Item = Toggle>) -> Self {
        Self {
            toggles: toggles.into_iter().collect(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_collect_and_iterate() {
        let set: Toggles = [Toggle::Fog, Toggle::Turbo].into_iter().collect();
        assert!(set.contains(Toggle::Fog));
        assert!(!set.contains(Toggle::Pause));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Toggle::Fog, Toggle::Turbo]);
    }

    #[test]
    fn mouse_mode_cycles() {
        assert_eq!(MouseMode::Off.next(), MouseMode::View);
        assert_eq!(MouseMode::View.next(), MouseMode::Control);
        assert_eq!(MouseMode::Control.next(), MouseMode::Off);
    }

    #[test]
    fn default_frame_is_idle() {
        let f = ControlFrame::default();
        assert!(f.toggles.is_empty());
        assert_eq!(f.throttle, Throttle::Step { up: false, down: false });
        assert_eq!(f.steer, Vec2::ZERO);
    }
}
