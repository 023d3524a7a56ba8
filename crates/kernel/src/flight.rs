//! Flight model: force, quadratic drag and steering integrated once per tick.

use glam::{Vec2, Vec3};
use ringflight_common::vector::{normalize, rotate_about_y};
use ringflight_input::Throttle;
use serde::{Deserialize, Serialize};

/// The player's craft.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Craft {
    pub position: Vec3,
    /// Degrees about y.
    pub yaw: f32,
    pub force: f32,
    /// Signed speed along the heading.
    pub speed: f32,
    pub velocity: Vec3,
    /// Unit heading after yaw.
    pub heading: Vec3,
    /// Steering intent applied on the last tick.
    pub steer: Vec2,
}

impl Craft {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            force: 0.0,
            speed: 0.0,
            velocity: Vec3::ZERO,
            heading: Vec3::X,
            steer: Vec2::ZERO,
        }
    }

    /// Update the force accumulator from throttle intent.
    ///
    /// Keys move the force by `increment` per tick within `[0, max_force]`;
    /// triggers set it directly, with the brake trigger able to push it
    /// negative for reversing.
    pub fn apply_throttle(&mut self, throttle: Throttle, max_force: f32, increment: f32) {
        match throttle {
            Throttle::Step { up, down } => {
                if up && self.force < max_force {
                    self.force += increment;
                }
                if down && self.force > 0.0 {
                    self.force -= increment;
                }
                self.force = self.force.clamp(0.0, max_force);
            }
            Throttle::Analog { accelerate, brake } => {
                self.force = max_force * (accelerate - brake).clamp(-1.0, 1.0);
            }
        }
    }

    /// Integrate one tick of `dt` seconds.
    ///
    /// `steer` is `(y, z)` of the heading before yaw; the x component is
    /// always 1 so the heading never degenerates.
    pub fn integrate(&mut self, steer: Vec2, yaw: f32, drag: f32, dt: f32) {
        let v = self.speed;
        let resistance = drag * v * v;
        let acceleration = if v >= 0.0 {
            self.force - resistance
        } else {
            self.force + resistance
        };
        self.speed += acceleration * dt;
        self.steer = steer;
        self.yaw = yaw;
        self.heading = heading(steer, yaw);
        self.velocity = self.heading * self.speed;
        self.position += self.velocity * dt;
    }
}

/// Unit heading for a steering intent and yaw.
pub fn heading(steer: Vec2, yaw: f32) -> Vec3 {
    rotate_about_y(normalize(Vec3::new(1.0, steer.x, steer.y)), yaw)
}

/// Steering that points the heading straight at `target`.
///
/// Returns zero (straight ahead) when there is no target or the target is
/// not ahead of the craft.
pub fn autopilot_steer(position: Vec3, target: Option<Vec3>) -> Vec2 {
    match target {
        Some(t) if t.x > position.x => {
            let d = t - position;
            Vec2::new(d.y / d.x, d.z / d.x)
        }
        _ => Vec2::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.01;

    #[test]
    fn drag_gives_terminal_speed() {
        let mut craft = Craft::new(Vec3::ZERO);
        craft.force = 10_000.0;
        for _ in 0..20_000 {
            craft.integrate(Vec2::ZERO, 0.0, 0.2, DT);
        }
        // force = drag * v^2 at terminal speed
        let terminal = (10_000.0f32 / 0.2).sqrt();
        assert!((craft.speed - terminal).abs() < 1.0, "{}", craft.speed);
    }

    #[test]
    fn zero_force_zero_drag_never_speeds_up() {
        let mut craft = Craft::new(Vec3::ZERO);
        craft.speed = 30.0;
        let mut steer = Vec2::new(2.0, -3.0);
        let mut last = craft.speed;
        for _ in 0..1_000 {
            steer *= 0.9;
            craft.integrate(steer, 0.0, 0.0, DT);
            assert!(craft.speed.abs() <= last.abs() + 1e-6);
            last = craft.speed;
        }
        // steering has decayed, so the heading settles on straight ahead
        assert!((craft.heading - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn drag_opposes_reverse_motion() {
        let mut craft = Craft::new(Vec3::ZERO);
        craft.speed = -20.0;
        craft.integrate(Vec2::ZERO, 0.0, 0.2, DT);
        assert!(craft.speed > -20.0 && craft.speed < 0.0);
        assert!(craft.velocity.x < 0.0);
    }

    #[test]
    fn heading_is_unit_and_yawed() {
        let h = heading(Vec2::new(3.0, -4.0), 30.0);
        assert!((h.length() - 1.0).abs() < 1e-5);
        let yawed = heading(Vec2::ZERO, 90.0);
        assert!((yawed - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn keyboard_throttle_is_clamped() {
        let mut craft = Craft::new(Vec3::ZERO);
        for _ in 0..200 {
            craft.apply_throttle(Throttle::Step { up: true, down: false }, 10_000.0, 100.0);
        }
        assert_eq!(craft.force, 10_000.0);
        for _ in 0..200 {
            craft.apply_throttle(Throttle::Step { up: false, down: true }, 10_000.0, 100.0);
        }
        assert_eq!(craft.force, 0.0);
    }

    #[test]
    fn triggers_map_directly() {
        let mut craft = Craft::new(Vec3::ZERO);
        let t = Throttle::Analog {
            accelerate: 0.5,
            brake: 0.0,
        };
        craft.apply_throttle(t, 8_000.0, 100.0);
        assert_eq!(craft.force, 4_000.0);
    }

    #[test]
    fn autopilot_aims_at_target() {
        let pos = Vec3::new(0.0, 10.0, 5.0);
        let target = Vec3::new(100.0, 30.0, -15.0);
        let steer = autopilot_steer(pos, Some(target));
        let h = heading(steer, 0.0);
        assert!((h - (target - pos).normalize()).length() < 1e-5);
        assert_eq!(autopilot_steer(pos, None), Vec2::ZERO);
        assert_eq!(autopilot_steer(pos, Some(Vec3::new(-1.0, 0.0, 0.0))), Vec2::ZERO);
    }
}
