//! Developer tooling: frame-rate stats for the overlay and a read-only
//! scene inspector.
//!
//! # Invariants
//! - Tools only read the scene; they never mutate it.
//! - Frame stats take timestamps as arguments so they can be driven by tests.

pub mod inspector;
pub mod stats;

pub use inspector::{SceneInspector, SceneSummary};
pub use stats::{FrameStats, Panel, StatsMode};

pub fn crate_info() -> &'static str {
    concat!("rolestage-tools v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
