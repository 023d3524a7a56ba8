//! Game kernel: flight model, ring track, collision and scoring, and the
//! game/menu state machine, all stepped by one fixed-rate [`Simulation`].
//!
//! # Invariants
//! - Only [`Simulation::step`] and [`Simulation::click`] mutate game state.
//! - At most one ring is current; the cursor only moves forward.
//! - Each ring scores, penalises or costs a life at most once.
//! - Paused and game-over ticks never move the craft or the rings.

pub mod collision;
pub mod flight;
pub mod level;
pub mod menu;
pub mod session;
pub mod simulation;
pub mod track;

pub use collision::{RingContact, RingShape, Wall, WallSide};
pub use flight::Craft;
pub use level::{Cell, LevelError, LevelGrid, MovementKind};
pub use menu::{Banner, MENU_BOXES, Menu, MenuBox, MenuItem, MenuMode, mouse_to_ndc};
pub use session::{GameMode, Session};
pub use simulation::{MenuResponse, SimEvent, Simulation};
pub use track::{Corridor, Direction, Ring, Track};
