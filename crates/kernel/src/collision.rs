//! Ring and wall tests.
//!
//! Both tests take the craft as a world-space [`Aabb`]. Rings are tori whose
//! axis starts along x and turns about y as the ring spins; the test uses the
//! box that bounds the torus at its current spin rather than the exact
//! surface.

use glam::Vec3;
use ringflight_common::Aabb;
use ringflight_common::vector::det3;
use serde::{Deserialize, Serialize};

/// Where the craft is relative to the current ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RingContact {
    Outside,
    /// Within the ring's slab and entirely inside its hole.
    Inside,
    /// Within the ring's slab but clipping the tube.
    Collided,
}

/// Torus dimensions: `outer` is centre to tube centre, `tube` the tube radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingShape {
    pub outer: f32,
    pub tube: f32,
}

impl RingShape {
    pub fn new(outer: f32, tube: f32) -> Self {
        Self { outer, tube }
    }

    pub fn total(&self) -> f32 {
        self.outer + self.tube
    }

    pub fn hole(&self) -> f32 {
        self.outer - self.tube
    }

    /// Half the ring's depth along x at spin angle `spin` (degrees).
    pub fn half_depth(&self, spin: f32) -> f32 {
        let (s, c) = spin.to_radians().sin_cos();
        self.tube * c.abs() + self.total() * s.abs()
    }

    /// Half extents along z of the whole ring and of its hole.
    fn z_extents(&self, spin: f32) -> (f32, f32) {
        let (s, c) = spin.to_radians().sin_cos();
        (
            self.total() * c.abs() + self.tube * s.abs(),
            self.hole() * c.abs(),
        )
    }

    /// Classify a world-space craft box against a ring centred at `centre`.
    pub fn classify(&self, craft: &Aabb, centre: Vec3, spin: f32) -> RingContact {
        let depth = self.half_depth(spin);
        let (outer_z, hole_z) = self.z_extents(spin);
        let outer_y = self.total();
        let hole_y = self.hole();

        let in_slab = craft.max.x > centre.x - depth && craft.min.x < centre.x + depth;
        let in_square = craft.max.z > centre.z - outer_z
            && craft.min.z < centre.z + outer_z
            && craft.max.y > centre.y - outer_y
            && craft.min.y < centre.y + outer_y;
        if !(in_slab && in_square) {
            return RingContact::Outside;
        }

        let clips = craft.max.z > centre.z + hole_z
            || craft.min.z < centre.z - hole_z
            || craft.max.y > centre.y + hole_y
            || craft.min.y < centre.y - hole_y;
        if clips {
            RingContact::Collided
        } else {
            RingContact::Inside
        }
    }
}

/// The six faces of the corridor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallSide {
    /// x minimum, behind the start.
    Front,
    /// x maximum, the exit.
    Back,
    /// z minimum.
    Left,
    /// z maximum.
    Right,
    Ceiling,
    Floor,
}

impl WallSide {
    pub const ALL: [WallSide; 6] = [
        WallSide::Front,
        WallSide::Back,
        WallSide::Left,
        WallSide::Right,
        WallSide::Ceiling,
        WallSide::Floor,
    ];
}

/// A corridor wall as a quad. The first three vertices wind so that
/// `(b - a) x (c - a)` points into the corridor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub side: WallSide,
    pub vertices: [Vec3; 4],
}

impl Wall {
    fn from_triangle(side: WallSide, a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            side,
            vertices: [a, b, c, a + c - b],
        }
    }

    /// Inward facing, not normalised.
    pub fn normal(&self) -> Vec3 {
        let [a, b, c, _] = self.vertices;
        (b - a).cross(c - a)
    }

    /// Signed volume of the point against the wall plane; negative is outside.
    pub fn side_of(&self, p: Vec3) -> f32 {
        let [a, b, c, _] = self.vertices;
        det3(b - a, c - a, p - a)
    }

    /// True when any part of the craft box is past the wall.
    pub fn is_breached(&self, craft: &Aabb) -> bool {
        let n = self.normal();
        // corner furthest along the outward direction
        let p = Vec3::select(n.cmpgt(Vec3::ZERO), craft.min, craft.max);
        self.side_of(p) < 0.0
    }
}

/// Build the six walls of a box-shaped corridor.
pub fn corridor_walls(bounds: &Aabb) -> [Wall; 6] {
    let (lo, hi) = (bounds.min, bounds.max);
    let v = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);
    [
        Wall::from_triangle(
            WallSide::Front,
            v(lo.x, lo.y, lo.z),
            v(lo.x, hi.y, lo.z),
            v(lo.x, hi.y, hi.z),
        ),
        Wall::from_triangle(
            WallSide::Back,
            v(hi.x, lo.y, lo.z),
            v(hi.x, lo.y, hi.z),
            v(hi.x, hi.y, hi.z),
        ),
        Wall::from_triangle(
            WallSide::Left,
            v(lo.x, lo.y, lo.z),
            v(hi.x, lo.y, lo.z),
            v(hi.x, hi.y, lo.z),
        ),
        Wall::from_triangle(
            WallSide::Right,
            v(lo.x, lo.y, hi.z),
            v(lo.x, hi.y, hi.z),
            v(hi.x, hi.y, hi.z),
        ),
        Wall::from_triangle(
            WallSide::Ceiling,
            v(lo.x, hi.y, lo.z),
            v(hi.x, hi.y, lo.z),
            v(hi.x, hi.y, hi.z),
        ),
        Wall::from_triangle(
            WallSide::Floor,
            v(lo.x, lo.y, lo.z),
            v(lo.x, lo.y, hi.z),
            v(hi.x, lo.y, hi.z),
        ),
    ]
}

/// First breached wall, with every other wall taking priority over the exit.
pub fn breached_wall(walls: &[Wall; 6], craft: &Aabb) -> Option<WallSide> {
    let mut exit = None;
    for wall in walls {
        if wall.is_breached(craft) {
            if wall.side != WallSide::Back {
                return Some(wall.side);
            }
            exit = Some(WallSide::Back);
        }
    }
    exit
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring() -> RingShape {
        RingShape::new(6.0, 0.5)
    }

    fn craft_at(p: Vec3) -> Aabb {
        Aabb::from_half_extents(Vec3::new(1.0, 0.5, 1.0)).translated(p)
    }

    #[test]
    fn small_box_in_hole_is_inside() {
        let centre = Vec3::new(100.0, 25.0, 0.0);
        let contact = ring().classify(&craft_at(centre), centre, 0.0);
        assert_eq!(contact, RingContact::Inside);
        // off-centre but still clear of the tube
        let contact = ring().classify(&craft_at(centre + Vec3::new(0.0, 4.0, -4.0)), centre, 0.0);
        assert_eq!(contact, RingContact::Inside);
    }

    #[test]
    fn box_wider_than_gap_collides() {
        let centre = Vec3::new(100.0, 25.0, 0.0);
        let wide = Aabb::from_half_extents(Vec3::new(1.0, 0.5, 6.0)).translated(centre);
        assert_eq!(ring().classify(&wide, centre, 0.0), RingContact::Collided);
        let clipping = craft_at(centre + Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(ring().classify(&clipping, centre, 0.0), RingContact::Collided);
    }

    #[test]
    fn clear_of_slab_or_square_is_outside() {
        let centre = Vec3::new(100.0, 25.0, 0.0);
        let before = craft_at(centre - Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(ring().classify(&before, centre, 0.0), RingContact::Outside);
        let beside = craft_at(centre + Vec3::new(0.0, 0.0, 20.0));
        assert_eq!(ring().classify(&beside, centre, 0.0), RingContact::Outside);
    }

    #[test]
    fn spin_changes_cross_section() {
        let r = ring();
        assert!((r.half_depth(0.0) - 0.5).abs() < 1e-5);
        assert!((r.half_depth(90.0) - 6.5).abs() < 1e-4);
        let centre = Vec3::new(100.0, 25.0, 0.0);
        // edge-on ring leaves no hole along z
        assert_eq!(
            r.classify(&craft_at(centre), centre, 90.0),
            RingContact::Collided
        );
        // a slab that is thicker when spun catches a box the flat ring misses
        let near = craft_at(centre - Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(r.classify(&near, centre, 0.0), RingContact::Outside);
        assert_ne!(r.classify(&near, centre, 45.0), RingContact::Outside);
    }

    #[test]
    fn walls_face_inward() {
        let bounds = Aabb::new(Vec3::new(-10.0, -5.0, -20.0), Vec3::new(100.0, 40.0, 20.0));
        let centre = bounds.center();
        for wall in corridor_walls(&bounds) {
            assert!(wall.side_of(centre) > 0.0, "{:?}", wall.side);
            let n = wall.normal().normalize();
            let outside = wall.vertices[0] - n * 1.0;
            assert!(wall.side_of(outside) < 0.0, "{:?}", wall.side);
        }
    }

    #[test]
    fn each_wall_detects_its_own_breach() {
        let bounds = Aabb::new(Vec3::new(-10.0, -5.0, -20.0), Vec3::new(100.0, 40.0, 20.0));
        let walls = corridor_walls(&bounds);
        let inside = craft_at(Vec3::new(50.0, 10.0, 0.0));
        assert_eq!(breached_wall(&walls, &inside), None);

        let cases = [
            (Vec3::new(-9.5, 10.0, 0.0), WallSide::Front),
            (Vec3::new(99.5, 10.0, 0.0), WallSide::Back),
            (Vec3::new(50.0, 10.0, -19.5), WallSide::Left),
            (Vec3::new(50.0, 10.0, 19.5), WallSide::Right),
            (Vec3::new(50.0, 39.8, 0.0), WallSide::Ceiling),
            (Vec3::new(50.0, -4.8, 0.0), WallSide::Floor),
        ];
        for (pos, side) in cases {
            assert_eq!(breached_wall(&walls, &craft_at(pos)), Some(side), "{pos:?}");
        }
    }

    #[test]
    fn side_wall_beats_exit() {
        let bounds = Aabb::new(Vec3::new(-10.0, -5.0, -20.0), Vec3::new(100.0, 40.0, 20.0));
        let walls = corridor_walls(&bounds);
        let corner = craft_at(Vec3::new(99.5, 10.0, 19.5));
        assert_eq!(breached_wall(&walls, &corner), Some(WallSide::Right));
    }
}
