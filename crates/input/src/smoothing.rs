/// Critically damped second-order smoother.
///
/// Moves a value toward a target without overshoot, carrying a velocity
/// between steps so direction changes ease in instead of snapping.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SmoothDamp {
    pub value: f32,
    velocity: f32,
}

impl SmoothDamp {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            velocity: 0.0,
        }
    }

    /// Advance by `dt` seconds toward `target`. `smooth_time` is roughly the
    /// time to reach the target; zero or less snaps immediately.
    pub fn step(&mut self, target: f32, smooth_time: f32, dt: f32) -> f32 {
        if smooth_time <= 0.0 {
            self.value = target;
            self.velocity = 0.0;
            return self.value;
        }
        let omega = 2.0 / smooth_time;
        let x = omega * dt;
        // Pade approximation of exp(-x)
        let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);
        let change = self.value - target;
        let temp = (self.velocity + omega * change) * dt;
        self.velocity = (self.velocity - omega * temp) * decay;
        self.value = target + (change + temp) * decay;
        self.value
    }

    pub fn reset(&mut self, value: f32) {
        *self = Self::new(value);
    }
}
