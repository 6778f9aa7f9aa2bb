//! Camera input: pointer gestures mapped to orbit actions, and the damped
//! orbit controller that applies them.
//!
//! # Invariants
//! - Windowing code produces [`OrbitAction`]s; the controller never sees raw events.
//! - The damping factor is fixed at construction and has no setter.
//! - `OrbitControls::update` runs once per frame, before the frame is rendered.

pub mod action;
pub mod orbit;

pub use action::{DragButton, OrbitAction, PointerTracker};
pub use orbit::{OrbitControls, DAMPING_FACTOR};

pub fn crate_info() -> &'static str {
    concat!("rolestage-input v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
