use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned bounding box, stored as offsets from an origin.
///
/// For the craft this is the mesh extent relative to the craft position,
/// already rotated into world orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box centred on the origin with the given half extents.
    pub fn from_half_extents(half: Vec3) -> Self {
        Self::new(-half.abs(), half.abs())
    }

    /// Smallest box containing every point. `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Largest absolute offset along any axis.
    pub fn max_extent(&self) -> f32 {
        self.min.abs().max(self.max.abs()).max_element()
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Bounds of this box after rotating all eight corners.
    pub fn rotated(&self, rotation: Quat) -> Self {
        let corners = self.corners().map(|c| rotation * c);
        let (min, max) = corners[1..]
            .iter()
            .fold((corners[0], corners[0]), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        Self { min, max }
    }

    /// World-space box for an origin at `position`.
    pub fn translated(&self, position: Vec3) -> Self {
        Self {
            min: self.min + position,
            max: self.max + position,
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::from_half_extents(Vec3::new(1.0, 0.5, 1.0))
    }
}

/// Game difficulty. Chosen from the menu between games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{other}' (expected easy, medium or hard)")),
        }
    }
}

/// Everything a difficulty level changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    /// Distance from the ring centre to the centre of its tube.
    pub ring_outer_radius: f32,
    /// Radius of the ring tube itself.
    pub ring_inner_radius: f32,
    pub max_force: f32,
    /// Grid-to-world scale: x per row, y per height unit, z per column.
    pub scale: Vec3,
    pub lives: u32,
}

impl DifficultySettings {
    /// Radius of the open hole the craft must fit through.
    pub fn hole_radius(&self) -> f32 {
        self.ring_outer_radius - self.ring_inner_radius
    }

    /// Radius of the ring's outer edge.
    pub fn total_radius(&self) -> f32 {
        self.ring_outer_radius + self.ring_inner_radius
    }
}

/// Camera placement relative to the craft, cycled at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraMode {
    #[default]
    Chase,
    Cockpit,
    Overhead,
}

impl CameraMode {
    pub fn next(self) -> Self {
        match self {
            CameraMode::Chase => CameraMode::Cockpit,
            CameraMode::Cockpit => CameraMode::Overhead,
            CameraMode::Overhead => CameraMode::Chase,
        }
    }
}
