//! Developer tooling: session inspector, level reports and the FPS counter.
//!
//! # Invariants
//! - Tools only read simulation state.

mod fps;
mod inspector;

pub use fps::FpsCounter;
pub use inspector::{LevelReport, RingInfo, SimInspector, SimSummary};

pub fn crate_info() -> &'static str {
    "ringflight-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
