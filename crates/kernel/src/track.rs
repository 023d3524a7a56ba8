//! The ring track: rings built from a level grid, the corridor around them
//! and the cursor marking the next ring to clear.

use crate::collision::{RingShape, Wall, corridor_walls};
use crate::level::{LevelGrid, MovementKind};
use glam::Vec3;
use ringflight_common::{Aabb, DifficultySettings, GameConfig};
use serde::{Deserialize, Serialize};

/// Which way an oscillating ring is currently heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub position: Vec3,
    /// Degrees about y, in `(-360, 360)`.
    pub spin: f32,
    pub movement: MovementKind,
    pub direction: Direction,
    /// Grid cell the ring was built from.
    pub row: usize,
    pub col: usize,
}

/// World extents of a level and its six walls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corridor {
    pub bounds: Aabb,
    pub walls: [Wall; 6],
    /// World height of the tallest ring.
    pub max_height: f32,
}

impl Corridor {
    /// Corridor for a grid at the given difficulty.
    ///
    /// The walls sit `margins` grid units beyond the outermost rings and are
    /// then pushed out by the craft's largest extent, so a craft centred on
    /// the corridor edge is still inside.
    pub fn new(
        grid: &LevelGrid,
        settings: &DifficultySettings,
        margins: Vec3,
        craft_bounds: &Aabb,
    ) -> Self {
        let s = settings.scale;
        let midpoint = (grid.cols as f32 - 1.0) / 2.0;
        let max_height = s.y * grid.max_height() as f32 / 3.0;
        let outer = settings.ring_outer_radius;

        let z_upper = s.z * (margins.z + midpoint) + outer;
        let min = Vec3::new(-s.x * margins.x, -(outer + margins.y * s.y), -z_upper);
        let max = Vec3::new(
            s.x * (grid.rows as f32 + margins.x),
            max_height + s.y * margins.y,
            z_upper,
        );
        let clearance = Vec3::splat(craft_bounds.max_extent());
        let bounds = Aabb::new(min - clearance, max + clearance);
        Self {
            walls: corridor_walls(&bounds),
            bounds,
            max_height,
        }
    }
}

/// Rings in traversal order plus the cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    rings: Vec<Ring>,
    cursor: usize,
    shape: RingShape,
    corridor: Corridor,
}

impl Track {
    /// Build the ring sequence in row-major order.
    pub fn build(
        grid: &LevelGrid,
        settings: &DifficultySettings,
        config: &GameConfig,
        craft_bounds: &Aabb,
    ) -> Self {
        let s = settings.scale;
        let midpoint = (grid.cols as f32 - 1.0) / 2.0;
        let rings: Vec<Ring> = grid
            .occupied()
            .map(|(row, col, cell)| Ring {
                position: Vec3::new(
                    s.x * (row as f32 + 1.0),
                    s.y * cell.height as f32 / 3.0,
                    s.z * (col as f32 - midpoint),
                ),
                spin: 0.0,
                movement: cell.movement,
                direction: Direction::Positive,
                row,
                col,
            })
            .collect();
        let corridor = Corridor::new(grid, settings, config.margins, craft_bounds);
        tracing::debug!(level = %grid.name, rings = rings.len(), bounds = ?corridor.bounds, "built track");
        Self {
            rings,
            cursor: 0,
            shape: RingShape::new(settings.ring_outer_radius, settings.ring_inner_radius),
            corridor,
        }
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn shape(&self) -> RingShape {
        self.shape
    }

    pub fn corridor(&self) -> &Corridor {
        &self.corridor
    }

    pub fn current(&self) -> Option<&Ring> {
        self.rings.get(self.cursor)
    }

    /// The ring after the current one.
    pub fn upcoming(&self) -> Option<&Ring> {
        self.rings.get(self.cursor + 1)
    }

    /// Every ring has been passed.
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.rings.len()
    }

    /// Move every ring from the cursor on by one tick.
    pub fn advance_motion(&mut self, config: &GameConfig) {
        let total = self.shape.total();
        let b = self.corridor.bounds;
        let z_limit = b.max.z - total;
        let (y_lo, y_hi) = (b.min.y + total, b.max.y - total);
        let start = self.cursor.min(self.rings.len());
        for ring in &mut self.rings[start..] {
            match ring.movement {
                MovementKind::Stationary => {}
                MovementKind::Horizontal => oscillate(
                    &mut ring.position.z,
                    &mut ring.direction,
                    -z_limit,
                    z_limit,
                    config.oscillation_step,
                ),
                MovementKind::Vertical => oscillate(
                    &mut ring.position.y,
                    &mut ring.direction,
                    y_lo,
                    y_hi,
                    config.oscillation_step,
                ),
                MovementKind::Clockwise => {
                    ring.spin = wrap_degrees(ring.spin + config.spin_step_degrees)
                }
                MovementKind::Anticlockwise => {
                    ring.spin = wrap_degrees(ring.spin - config.spin_step_degrees)
                }
            }
        }
    }

    /// Advance the cursor past the current ring if the craft's trailing edge
    /// has cleared its far face. Returns the index of the ring passed.
    pub fn advance_cursor(&mut self, craft_trailing_x: f32) -> Option<usize> {
        let ring = self.current()?;
        let far_face = ring.position.x + self.shape.half_depth(ring.spin);
        if far_face < craft_trailing_x {
            let passed = self.cursor;
            self.cursor += 1;
            Some(passed)
        } else {
            None
        }
    }
}

fn oscillate(value: &mut f32, direction: &mut Direction, lo: f32, hi: f32, step: f32) {
    if lo > hi {
        return;
    }
    match direction {
        Direction::Positive => {
            *value += step;
            if *value >= hi {
                *value = hi;
                *direction = Direction::Negative;
            }
        }
        Direction::Negative => {
            *value -= step;
            if *value <= lo {
                *value = lo;
                *direction = Direction::Positive;
            }
        }
    }
}

fn wrap_degrees(angle: f32) -> f32 {
    if angle >= 360.0 {
        angle - 360.0
    } else if angle <= -360.0 {
        angle + 360.0
    } else {
        angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringflight_common::Difficulty;

    fn build(text: &str) -> Track {
        let config = GameConfig::default();
        let grid = LevelGrid::parse("t", text).unwrap();
        Track::build(
            &grid,
            config.settings(Difficulty::Medium),
            &config,
            &Aabb::default(),
        )
    }

    #[test]
    fn ring_positions_from_grid() {
        let track = build("2 3\n3S 0 6H\n0 9V 0\n");
        let p: Vec<Vec3> = track.rings().iter().map(|r| r.position).collect();
        // medium scale (100, 15, 25), midpoint 1
        assert_eq!(p[0], Vec3::new(100.0, 15.0, -25.0));
        assert_eq!(p[1], Vec3::new(100.0, 30.0, 25.0));
        assert_eq!(p[2], Vec3::new(200.0, 45.0, 0.0));
        assert_eq!(track.corridor().max_height, 45.0);
    }

    #[test]
    fn corridor_bounds_follow_grid() {
        let track = build("1 1\n5S\n");
        let b = track.corridor().bounds;
        // rows 1 + margin 2 = 3 rows of 100, plus the craft clearance of 1
        assert_eq!(b.max.x, 301.0);
        assert_eq!(b.min.x, -201.0);
        assert_eq!(b.max.y, 25.0 + 15.0 + 1.0);
        assert_eq!(b.min.y, -(6.0 + 15.0) - 1.0);
        assert_eq!(b.max.z, 25.0 * 10.0 + 6.0 + 1.0);
        assert_eq!(b.min.z, -b.max.z);
    }

    #[test]
    fn cursor_walks_every_ring_once() {
        let mut track = build("3 2\n4S 0\n0 4S\n2S 2S\n");
        let n = track.rings().len();
        assert_eq!(n, 4);
        let mut advances = 0;
        let mut x = 0.0;
        while x < 1000.0 {
            if track.advance_cursor(x).is_some() {
                advances += 1;
            }
            x += 0.5;
        }
        assert_eq!(advances, n);
        assert!(track.is_finished());
        assert!(track.current().is_none());
    }

    #[test]
    fn oscillation_reverses_at_limit() {
        let config = GameConfig::default();
        let mut track = build("1 1\n5H\n");
        let limit = track.corridor().bounds.max.z - track.shape().total();
        let mut max_z = f32::MIN;
        let mut reversed = false;
        for _ in 0..10_000 {
            track.advance_motion(&config);
            let r = track.rings()[0];
            max_z = max_z.max(r.position.z);
            reversed |= r.direction == Direction::Negative;
        }
        assert!(reversed);
        assert!(max_z <= limit + 1e-3);
    }

    #[test]
    fn vertical_rings_stay_between_floor_and_ceiling() {
        let config = GameConfig::default();
        let mut track = build("1 1\n5V\n");
        let b = track.corridor().bounds;
        let total = track.shape().total();
        for _ in 0..5_000 {
            track.advance_motion(&config);
            let y = track.rings()[0].position.y;
            assert!(y >= b.min.y + total - 1e-3 && y <= b.max.y - total + 1e-3);
        }
    }

    #[test]
    fn spin_wraps() {
        let config = GameConfig::default();
        let mut track = build("1 2\n5C 5A\n");
        for _ in 0..725 {
            track.advance_motion(&config);
        }
        let [cw, acw] = [track.rings()[0].spin, track.rings()[1].spin];
        assert!(cw > 0.0 && cw < 360.0, "{cw}");
        assert!(acw < 0.0 && acw > -360.0, "{acw}");
    }

    #[test]
    fn passed_rings_stop_moving() {
        let config = GameConfig::default();
        let mut track = build("2 1\n5C\n5C\n");
        track.advance_cursor(1000.0);
        track.advance_motion(&config);
        assert_eq!(track.rings()[0].spin, 0.0);
        assert_eq!(track.rings()[1].spin, 1.0);
    }

    #[test]
    fn finished_track_is_frozen() {
        let config = GameConfig::default();
        let mut track = build("2 1
5C
5H
");
        while track.advance_cursor(1000.0).is_some() {}
        assert!(track.is_finished());
        let before = track.rings().to_vec();
        track.advance_motion(&config);
        assert_eq!(track.rings(), &before[..]);
    }
}
