use std::time::Duration;

/// Frames-per-second counter.
///
/// Frames are counted as they are presented; the reported rate is recomputed
/// once a full second has accumulated and held until the next second ends.
#[derive(Debug, Default, Clone)]
pub struct FpsCounter {
    frames: u32,
    window: Duration,
    fps: f32,
    total_frames: u64,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame that took `dt`. Returns the new rate when the
    /// one-second window rolled over.
    pub fn record(&mut self, dt: Duration) -> Option<f32> {
        self.frames += 1;
        self.total_frames += 1;
        self.window += dt;
        if self.window < Duration::from_secs(1) {
            return None;
        }
        self.fps = self.frames as f32 / self.window.as_secs_f32();
        tracing::trace!(fps = self.fps, "fps window");
        self.frames = 0;
        self.window = Duration::ZERO;
        Some(self.fps)
    }

    /// Rate from the last completed window, zero before the first.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}
