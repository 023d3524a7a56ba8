use glam::{Mat4, Vec2, Vec3};
use ringflight_common::CameraMode;
use ringflight_common::vector::rotate_about_y;
use ringflight_kernel::Simulation;

/// Camera that follows the craft.
///
/// Placement depends on [`CameraMode`]; free-look offsets (degrees, yaw then
/// pitch) swing the view around the craft. Camera motion lives outside the
/// simulation and never feeds back into it.
#[derive(Debug, Clone)]
pub struct ChaseCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Distance behind the craft in chase mode.
    pub distance: f32,
    /// Height above the craft in chase mode.
    pub height: f32,
}

impl Default for ChaseCamera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(-20.0, 6.0, 0.0),
            target: Vec3::ZERO,
            fov: 60.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 3000.0,
            distance: 20.0,
            height: 6.0,
        }
    }
}

impl ChaseCamera {
    /// Place the camera for this frame.
    pub fn update(&mut self, sim: &Simulation, mode: CameraMode, look: Vec2) {
        let craft = sim.craft();
        let pos = craft.position;
        // follow the yawed heading on the horizontal plane only
        let forward = rotate_about_y(Vec3::X, craft.yaw);
        match mode {
            CameraMode::Chase => {
                let offset = look_rotate(-forward * self.distance, look) + Vec3::Y * self.height;
                self.eye = pos + offset;
                self.target = pos + forward * 10.0;
            }
            CameraMode::Cockpit => {
                let bounds = sim.craft_bounds();
                self.eye = pos + Vec3::new(0.0, bounds.max.y, 0.0);
                self.target = self.eye + look_rotate(craft.heading, look) * 10.0;
            }
            CameraMode::Overhead => {
                self.eye = pos + Vec3::new(-30.0, 80.0, 0.0);
                self.target = pos + look_rotate(forward, look) * 40.0;
            }
        }
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or(Vec3::X)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Swing a direction by a yaw (about y) then a pitch (toward +y), degrees.
fn look_rotate(dir: Vec3, look: Vec2) -> Vec3 {
    let yawed = rotate_about_y(dir, look.x);
    let horizontal = Vec3::new(yawed.x, 0.0, yawed.z);
    let h = horizontal.length();
    if h == 0.0 {
        return yawed;
    }
    let flat = horizontal / h;
    let (sin, cos) = look.y.to_radians().sin_cos();
    // rotate within the vertical plane containing the direction
    flat * (h * cos - yawed.y * sin) + Vec3::Y * (h * sin + yawed.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringflight_common::{Aabb, GameConfig};
    use ringflight_kernel::LevelGrid;

    fn sim() -> Simulation {
        let grid = LevelGrid::parse("l", "1 1\n5S\n").unwrap();
        Simulation::new(GameConfig::default(), vec![grid], Aabb::default()).unwrap()
    }

    #[test]
    fn chase_sits_behind_and_above() {
        let sim = sim();
        let mut cam = ChaseCamera::default();
        cam.update(&sim, CameraMode::Chase, Vec2::ZERO);
        let pos = sim.craft().position;
        assert!(cam.eye.x < pos.x);
        assert!(cam.eye.y > pos.y);
        assert!(cam.target.x > pos.x);
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn cockpit_looks_along_heading() {
        let sim = sim();
        let mut cam = ChaseCamera::default();
        cam.update(&sim, CameraMode::Cockpit, Vec2::ZERO);
        assert!((cam.eye - sim.craft().position).length() < 1.0);
        assert!((cam.forward() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn look_offsets_swing_the_view() {
        let sim = sim();
        let mut cam = ChaseCamera::default();
        cam.update(&sim, CameraMode::Cockpit, Vec2::new(90.0, 0.0));
        assert!((cam.forward() - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-4);
        cam.update(&sim, CameraMode::Cockpit, Vec2::new(0.0, 45.0));
        assert!(cam.forward().y > 0.5);
    }

    #[test]
    fn look_rotate_keeps_length() {
        let d = Vec3::new(3.0, 1.0, -2.0);
        let r = look_rotate(d, Vec2::new(30.0, -20.0));
        assert!((r.length() - d.length()).abs() < 1e-4);
    }
}
