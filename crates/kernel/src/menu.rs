//! Menu overlay: three boxes fixed in normalised device coordinates.

use glam::Vec2;
use ringflight_common::Difficulty;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MenuMode {
    #[default]
    Off,
    Normal,
    Difficulty,
}

/// Title shown above the normal menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Banner {
    #[default]
    Welcome,
    Paused,
    GameOver,
}

impl Banner {
    pub fn text(self) -> &'static str {
        match self {
            Banner::Welcome => "Welcome",
            Banner::Paused => "Paused",
            Banner::GameOver => "Game Over",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuItem {
    NewGame,
    Difficulty,
    Exit,
    Select(Difficulty),
}

impl MenuItem {
    pub fn label(self) -> &'static str {
        match self {
            MenuItem::NewGame => "New Game",
            MenuItem::Difficulty => "Difficulty",
            MenuItem::Exit => "Exit",
            MenuItem::Select(d) => d.label(),
        }
    }
}

/// Axis-aligned rectangle in NDC, y up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MenuBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl MenuBox {
    const fn new(min_y: f32, max_y: f32) -> Self {
        Self {
            min: Vec2::new(-0.25, min_y),
            max: Vec2::new(0.25, max_y),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Top to bottom.
pub const MENU_BOXES: [MenuBox; 3] = [
    MenuBox::new(0.3, 0.5),
    MenuBox::new(-0.1, 0.1),
    MenuBox::new(-0.5, -0.3),
];

/// Window-space mouse position in `[0, 1]`, origin top left, to NDC.
pub fn mouse_to_ndc(mouse: Vec2) -> Vec2 {
    Vec2::new(-1.0 + 2.0 * mouse.x, 1.0 - 2.0 * mouse.y)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Menu {
    pub mode: MenuMode,
    pub banner: Banner,
}

impl Menu {
    pub fn shown(banner: Banner) -> Self {
        Self {
            mode: MenuMode::Normal,
            banner,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.mode != MenuMode::Off
    }

    /// Items in box order, or `None` when the menu is hidden.
    pub fn items(&self) -> Option<[MenuItem; 3]> {
        match self.mode {
            MenuMode::Off => None,
            MenuMode::Normal => Some([MenuItem::NewGame, MenuItem::Difficulty, MenuItem::Exit]),
            MenuMode::Difficulty => Some(Difficulty::ALL.map(MenuItem::Select)),
        }
    }

    /// Item under an NDC point.
    pub fn hit_test(&self, ndc: Vec2) -> Option<MenuItem> {
        let items = self.items()?;
        MENU_BOXES
            .iter()
            .zip(items)
            .find(|(b, _)| b.contains(ndc))
            .map(|(_, item)| item)
    }
}
