//! Scene graph: the figure, the ground, the light and the helpers.
//!
//! # Invariants
//! - The scene root is append-only; nodes are never removed or re-parented.
//! - Node offsets are fixed at construction. Nothing in the frame loop mutates them.
//! - The camera is the only state that changes after startup.

pub mod assembly;
pub mod camera;
pub mod figure;
pub mod graph;
pub mod node;

pub use assembly::{assemble_scene, SceneOptions};
pub use camera::PerspectiveCamera;
pub use figure::build_figure;
pub use graph::Scene;
pub use node::{DirectionalLight, Material, Node, NodeId, NodeKind, ShadowCamera};

pub fn crate_info() -> &'static str {
    concat!("rolestage-scene v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
