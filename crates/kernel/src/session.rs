use ringflight_common::Difficulty;
use serde::{Deserialize, Serialize};

/// Top-level game mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Playing,
    Paused,
    GameOver,
}

/// A timed effect that switched off on this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expired {
    Turbo,
    Rumble,
}

/// Score, lives and progress for one game, plus timed effects.
///
/// Timed effects are stored as expiry times on the session clock and cleared
/// by [`Session::expire`]; starting an effect again just moves its expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub difficulty: Difficulty,
    pub score: i32,
    pub lives: u32,
    pub level: usize,
    /// Seconds of play, paused time excluded.
    pub elapsed: f32,
    pub autopilot: bool,
    turbo_until: Option<f32>,
    rumble_until: Option<f32>,
}

impl Session {
    pub fn new(difficulty: Difficulty, lives: u32) -> Self {
        Self {
            difficulty,
            score: 0,
            lives,
            level: 0,
            elapsed: 0.0,
            autopilot: false,
            turbo_until: None,
            rumble_until: None,
        }
    }

    pub fn start_turbo(&mut self, seconds: f32) {
        self.turbo_until = Some(self.elapsed + seconds);
    }

    pub fn start_rumble(&mut self, seconds: f32) {
        self.rumble_until = Some(self.elapsed + seconds);
    }

    pub fn turbo_active(&self) -> bool {
        self.turbo_until.is_some()
    }

    pub fn rumble_active(&self) -> bool {
        self.rumble_until.is_some()
    }

    /// Clear effects whose expiry has been reached.
    pub fn expire(&mut self) -> Vec<Expired> {
        let now = self.elapsed;
        let mut ended = Vec::new();
        if self.turbo_until.is_some_and(|t| now >= t) {
            self.turbo_until = None;
            ended.push(Expired::Turbo);
        }
        if self.rumble_until.is_some_and(|t| now >= t) {
            self.rumble_until = None;
            ended.push(Expired::Rumble);
        }
        ended
    }

    /// Take one life. Returns true when none are left.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turbo_expires_after_duration() {
        let mut s = Session::new(Difficulty::Medium, 3);
        s.start_turbo(2.0);
        s.elapsed = 1.99;
        assert!(s.expire().is_empty());
        assert!(s.turbo_active());
        s.elapsed = 2.0;
        assert_eq!(s.expire(), vec![Expired::Turbo]);
        assert!(!s.turbo_active());
    }

    #[test]
    fn restarting_an_effect_extends_it() {
        let mut s = Session::new(Difficulty::Medium, 3);
        s.start_rumble(0.25);
        s.elapsed = 0.2;
        s.start_rumble(0.25);
        s.elapsed = 0.3;
        assert!(s.expire().is_empty());
        s.elapsed = 0.46;
        assert_eq!(s.expire(), vec![Expired::Rumble]);
    }

    #[test]
    fn lives_bottom_out_at_zero() {
        let mut s = Session::new(Difficulty::Hard, 2);
        assert!(!s.lose_life());
        assert!(s.lose_life());
        assert!(s.lose_life());
        assert_eq!(s.lives, 0);
    }
}
