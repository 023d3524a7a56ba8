//! Input normalizer: keyboard, mouse and gamepad samples mapped to one
//! control frame per simulation tick.
//!
//! # Invariants
//! - The simulation only ever sees [`ControlFrame`]s, never device codes.
//! - A toggle fires exactly once per physical press.
//! - Steering and yaw intent stay within their configured limits.

pub mod action;
pub mod normalizer;
pub mod raw;
pub mod smoothing;

pub use action::{ControlFrame, MouseMode, Throttle, Toggle, Toggles};
pub use normalizer::{InputConfig, InputNormalizer};
pub use raw::{Button, Buttons, GamepadState, RawInput};
pub use smoothing::SmoothDamp;
