//! wgpu render backend.
//!
//! Draws the meshes of a [`rolestage_render::RenderList`] with Phong or
//! Lambert shading under one directional light, the helper lines on top of
//! the same depth buffer, and optionally a shadow map rendered from the
//! light's orthographic shadow camera.
//!
//! # Invariants
//! - The renderer never mutates the scene or the camera.
//! - Geometry is uploaded once per content hash; twin meshes share buffers.
//! - Size-dependent targets are recreated on every resize.

mod context;
mod error;
mod gpu;
mod instances;
mod shaders;

pub use context::GpuContext;
pub use error::RenderError;
pub use gpu::{RendererOptions, WgpuRenderer};
