use crate::extract::{extract, RenderList};
use rolestage_scene::{Material, PerspectiveCamera, Scene};
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene and a camera and produces output. It never
/// mutates either.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of `scene` as seen from `camera`.
    fn render(&self, scene: &Scene, camera: &PerspectiveCamera) -> Self::Output;
}

/// Produces a human-readable dump of what a frame would draw.
///
/// Used by the CLI and by tests that have no GPU.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }

    fn write_list(out: &mut String, list: &RenderList, camera: &PerspectiveCamera) -> std::fmt::Result {
        writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0} aspect={:.3}",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.target.x,
            camera.target.y,
            camera.target.z,
            camera.fov,
            camera.aspect
        )?;
        match &list.light {
            Some(light) => writeln!(
                out,
                "Light: pos=({:.1}, {:.1}, {:.1}) color={} shadows={}",
                light.position.x,
                light.position.y,
                light.position.z,
                light.color,
                if light.cast_shadow { "on" } else { "off" }
            )?,
            None => writeln!(out, "Light: none")?,
        }
        writeln!(out, "Meshes: {}", list.meshes.len())?;
        for mesh in &list.meshes {
            let p = mesh.model.transform_point3(glam::Vec3::ZERO);
            let shading = match mesh.material {
                Material::Phong { .. } => "phong",
                Material::Lambert { .. } => "lambert",
            };
            writeln!(
                out,
                "  [{}] {} pos=({:.2}, {:.2}, {:.2}) {} {}",
                mesh.name,
                mesh.geometry.label(),
                p.x,
                p.y,
                p.z,
                shading,
                mesh.material.color()
            )?;
        }
        writeln!(out, "Lines: {}", list.lines.len())
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, camera: &PerspectiveCamera) -> String {
        let list = extract(scene);
        let mut out = format!("=== Scene ({} nodes) ===\n", scene.node_count());
        // Writing into a String cannot fail.
        let _ = Self::write_list(&mut out, &list, camera);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolestage_scene::{assemble_scene, SceneOptions};

    #[test]
    fn debug_renderer_empty_scene() {
        let output = DebugTextRenderer::new().render(&Scene::new(), &PerspectiveCamera::default());
        assert!(output.contains("0 nodes"));
        assert!(output.contains("Light: none"));
        assert!(output.contains("Meshes: 0"));
    }

    #[test]
    fn debug_renderer_stage() {
        let scene = assemble_scene(&SceneOptions::default());
        let camera = PerspectiveCamera::for_viewport(800, 600);
        let output = DebugTextRenderer::new().render(&scene, &camera);

        assert!(output.contains("=== Scene (13 nodes) ==="));
        assert!(output.contains("eye=(30.0, 30.0, 30.0)"));
        assert!(output.contains("aspect=1.333"));
        assert!(output.contains("[head] icosphere(r=2, detail=2) pos=(0.00, 6.00, 0.00) phong #8ccdf3"));
        assert!(output.contains("[ground] plane(60x60) pos=(0.00, -7.00, 0.00) lambert #ffffff"));
        assert!(output.contains("Lines: 8"));
    }

    #[test]
    fn rendering_does_not_change_scene() {
        let scene = assemble_scene(&SceneOptions::default());
        let camera = PerspectiveCamera::for_viewport(800, 600);
        let renderer = DebugTextRenderer::new();
        let first = renderer.render(&scene, &camera);
        let second = renderer.render(&scene, &camera);
        assert_eq!(first, second);
    }
}
