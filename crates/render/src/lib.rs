//! Rendering adapter: flattens the scene graph into a [`RenderList`] that any
//! backend can draw, plus a debug text renderer for the CLI and tests.
//!
//! # Invariants
//! - Renderers never mutate the scene or the camera.
//! - A render list is derived entirely from the scene; rebuilding it yields the same list.

mod extract;
mod renderer;

pub use extract::{extract, LightData, LineSegment, MeshInstance, RenderList};
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    concat!("rolestage-render v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
