use ringflight_common::Difficulty;
use ringflight_kernel::{GameMode, LevelGrid, MovementKind, Simulation};
use serde::Serialize;
use std::fmt;

/// Read-only queries against a running simulation and its levels, for the
/// CLI and debug overlays.
pub struct SimInspector;

impl SimInspector {
    /// Snapshot of the session, craft and ring progress.
    pub fn summary(sim: &Simulation) -> SimSummary {
        let session = sim.session();
        let craft = sim.craft();
        let track = sim.track();
        SimSummary {
            tick: sim.tick(),
            level: session.level + 1,
            level_count: sim.level_count(),
            difficulty: session.difficulty,
            mode: sim.mode(),
            demo: sim.is_demo(),
            autopilot: session.autopilot,
            score: session.score,
            lives: session.lives,
            elapsed: session.elapsed,
            rings_passed: track.cursor().min(track.rings().len()),
            ring_count: track.rings().len(),
            position: craft.position.to_array(),
            speed: craft.speed,
            force: craft.force,
            pending_events: sim.events().len(),
        }
    }

    /// One entry per ring on the current track.
    pub fn rings(sim: &Simulation) -> Vec<RingInfo> {
        let track = sim.track();
        track
            .rings()
            .iter()
            .enumerate()
            .map(|(index, ring)| RingInfo {
                index,
                row: ring.row,
                col: ring.col,
                movement: ring.movement,
                position: ring.position.to_array(),
                spin: ring.spin,
                current: index == track.cursor(),
            })
            .collect()
    }

    /// Static report on a parsed level file.
    pub fn level(grid: &LevelGrid) -> LevelReport {
        let mix = grid.movement_mix();
        LevelReport {
            name: grid.name.clone(),
            rows: grid.rows,
            cols: grid.cols,
            rings: grid.ring_count(),
            max_height: grid.max_height(),
            movement_mix: MovementKind::ALL.iter().copied().zip(mix).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SimSummary {
    pub tick: u64,
    /// One-based level number.
    pub level: usize,
    pub level_count: usize,
    pub difficulty: Difficulty,
    pub mode: GameMode,
    pub demo: bool,
    pub autopilot: bool,
    pub score: i32,
    pub lives: u32,
    pub elapsed: f32,
    pub rings_passed: usize,
    pub ring_count: usize,
    pub position: [f32; 3],
    pub speed: f32,
    pub force: f32,
    pub pending_events: usize,
}

impl fmt::Display for SimSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tick={} level={}/{} difficulty={} mode={:?}{} score={} lives={} rings={}/{} time={:.2}s pos=({:.1}, {:.1}, {:.1}) speed={:.2}",
            self.tick,
            self.level,
            self.level_count,
            self.difficulty,
            self.mode,
            if self.demo { " (demo)" } else { "" },
            self.score,
            self.lives,
            self.rings_passed,
            self.ring_count,
            self.elapsed,
            self.position[0],
            self.position[1],
            self.position[2],
            self.speed,
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RingInfo {
    pub index: usize,
    pub row: usize,
    pub col: usize,
    pub movement: MovementKind,
    pub position: [f32; 3],
    pub spin: f32,
    pub current: bool,
}

impl fmt::Display for RingInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ring {} [{}, {}] {:?} pos=({:.1}, {:.1}, {:.1}) spin={:.0}",
            if self.current { '>' } else { ' ' },
            self.index,
            self.row,
            self.col,
            self.movement,
            self.position[0],
            self.position[1],
            self.position[2],
            self.spin,
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LevelReport {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    pub rings: usize,
    pub max_height: u32,
    pub movement_mix: Vec<(MovementKind, usize)>,
}

impl fmt::Display for LevelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}x{} grid, {} rings, max height {}",
            self.name, self.rows, self.cols, self.rings, self.max_height
        )?;
        for (kind, count) in &self.movement_mix {
            if *count > 0 {
                write!(f, " {}={count}", kind.code())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringflight_common::{Aabb, GameConfig};
    use ringflight_input::ControlFrame;

    const LEVEL: &str = "2 3\n2S 0 3H\n0 4C 4C\n";

    fn sim() -> Simulation {
        let grid = LevelGrid::parse("test", LEVEL).unwrap();
        Simulation::new(GameConfig::default(), vec![grid], Aabb::default()).unwrap()
    }

    #[test]
    fn summary_of_fresh_demo() {
        let sim = sim();
        let summary = SimInspector::summary(&sim);
        assert_eq!(summary.tick, 0);
        assert_eq!(summary.level, 1);
        assert_eq!(summary.level_count, 1);
        assert!(summary.demo);
        assert!(summary.autopilot);
        assert_eq!(summary.ring_count, 4);
        assert_eq!(summary.rings_passed, 0);
        assert_eq!(summary.position[0], 0.0);
    }

    #[test]
    fn summary_tracks_ticks() {
        let mut sim = sim();
        sim.new_game(Difficulty::Easy);
        for _ in 0..10 {
            sim.step(&ControlFrame::default());
        }
        let summary = SimInspector::summary(&sim);
        assert_eq!(summary.tick, 10);
        assert!(!summary.demo);
        assert_eq!(summary.lives, GameConfig::default().difficulties.easy.lives);
        let text = summary.to_string();
        assert!(text.contains("tick=10"));
        assert!(text.contains("difficulty=Easy"));
        assert!(!text.contains("(demo)"));
    }

    #[test]
    fn rings_listed_in_track_order() {
        let rings = SimInspector::rings(&sim());
        assert_eq!(rings.len(), 4);
        assert!(rings[0].current);
        assert!(rings[1..].iter().all(|r| !r.current));
        assert_eq!((rings[0].row, rings[0].col), (0, 0));
        assert_eq!(rings[1].movement, MovementKind::Horizontal);
        assert!(rings[0].to_string().starts_with("> ring 0"));
    }

    #[test]
    fn level_report_counts_movements() {
        let grid = LevelGrid::parse("test", LEVEL).unwrap();
        let report = SimInspector::level(&grid);
        assert_eq!(report.rings, 4);
        assert_eq!(report.max_height, 4);
        let clockwise = report
            .movement_mix
            .iter()
            .find(|(k, _)| *k == MovementKind::Clockwise)
            .map(|(_, n)| *n);
        assert_eq!(clockwise, Some(2));
        assert_eq!(report.to_string(), "test: 2x3 grid, 4 rings, max height 4 S=1 H=1 C=2");
    }
}
