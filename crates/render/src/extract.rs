use glam::{Mat4, Vec3};
use rolestage_assets::{Geometry, GeometryId};
use rolestage_common::Color;
use rolestage_scene::{DirectionalLight, Material, NodeId, NodeKind, Scene, ShadowCamera};

/// One mesh node in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshInstance {
    pub node: NodeId,
    pub name: String,
    pub geometry: Geometry,
    pub geometry_id: GeometryId,
    pub model: Mat4,
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

/// A colored line in world space, colors in linear RGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Vec3,
    pub end: Vec3,
    pub start_color: Vec3,
    pub end_color: Vec3,
}

impl LineSegment {
    fn solid(start: Vec3, end: Vec3, color: Vec3) -> Self {
        Self {
            start,
            end,
            start_color: color,
            end_color: color,
        }
    }
}

/// The directional light resolved to world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightData {
    pub position: Vec3,
    pub target: Vec3,
    pub color: Color,
    pub intensity: f32,
    pub cast_shadow: bool,
    pub shadow: ShadowCamera,
}

impl LightData {
    /// Unit vector the light travels along (from the light toward its target).
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Orthographic view-projection of the shadow camera.
    pub fn shadow_view_projection(&self) -> Mat4 {
        let dir = self.direction();
        let up = if dir.cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        let view = Mat4::look_at_rh(self.position, self.target, up);
        let h = self.shadow.half_extent;
        let proj = Mat4::orthographic_rh(-h, h, -h, h, self.shadow.near, self.shadow.far);
        proj * view
    }
}

/// Everything a backend needs to draw one frame of the scene.
#[derive(Debug, Clone, Default)]
pub struct RenderList {
    pub meshes: Vec<MeshInstance>,
    pub lines: Vec<LineSegment>,
    pub light: Option<LightData>,
}

impl RenderList {
    pub fn shadow_casters(&self) -> impl Iterator<Item = &MeshInstance> {
        self.meshes.iter().filter(|m| m.cast_shadow)
    }
}

/// Flatten `scene` into world-space draw data.
///
/// Only the first directional light is used for shading; extra lights are
/// logged and skipped.
pub fn extract(scene: &Scene) -> RenderList {
    let mut list = RenderList::default();
    let mut lights: Vec<(NodeId, LightData)> = Vec::new();
    let mut light_helpers: Vec<(NodeId, f32)> = Vec::new();

    scene.walk(|node, world| match &node.kind {
        NodeKind::Group => {}
        NodeKind::Mesh {
            geometry,
            material,
            cast_shadow,
            receive_shadow,
        } => list.meshes.push(MeshInstance {
            node: node.id,
            name: node.name.clone(),
            geometry: *geometry,
            geometry_id: GeometryId::of(geometry),
            model: world,
            material: *material,
            cast_shadow: *cast_shadow,
            receive_shadow: *receive_shadow,
        }),
        NodeKind::DirectionalLight(light) => {
            lights.push((node.id, resolve_light(light, world)));
        }
        NodeKind::DirectionalLightHelper { light, size } => {
            light_helpers.push((*light, *size));
        }
        NodeKind::AxesHelper { size } => axes_lines(*size, world, &mut list.lines),
    });

    // Helpers may precede their light in traversal order, so resolve them last.
    for (light_id, size) in light_helpers {
        match lights.iter().find(|(id, _)| *id == light_id) {
            Some((_, light)) => light_helper_lines(light, size, &mut list.lines),
            None => tracing::warn!("light helper refers to missing light {}", light_id.short()),
        }
    }

    if lights.len() > 1 {
        tracing::warn!("{} directional lights in scene, shading with the first", lights.len());
    }
    list.light = lights.first().map(|(_, l)| *l);
    list
}

fn resolve_light(light: &DirectionalLight, world: Mat4) -> LightData {
    LightData {
        position: world.transform_point3(Vec3::ZERO),
        target: light.target,
        color: light.color,
        intensity: light.intensity,
        cast_shadow: light.cast_shadow,
        shadow: light.shadow,
    }
}

fn axes_lines(size: f32, world: Mat4, out: &mut Vec<LineSegment>) {
    let origin = world.transform_point3(Vec3::ZERO);
    let axes = [
        (Vec3::X, Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.6, 0.0)),
        (Vec3::Y, Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.6, 1.0, 0.0)),
        (Vec3::Z, Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.6, 1.0)),
    ];
    for (axis, start_color, end_color) in axes {
        out.push(LineSegment {
            start: origin,
            end: world.transform_point3(axis * size),
            start_color,
            end_color,
        });
    }
}

fn light_helper_lines(light: &LightData, size: f32, out: &mut Vec<LineSegment>) {
    let color = Vec3::from_array(light.color.to_linear());
    let forward = light.direction();
    let mut right = forward.cross(Vec3::Y);
    if right.length_squared() < 1e-6 {
        right = Vec3::X;
    }
    let right = right.normalize() * size;
    let up = right.cross(forward).normalize() * size;

    let p = light.position;
    let corners = [p - right + up, p + right + up, p + right - up, p - right - up];
    for i in 0..4 {
        out.push(LineSegment::solid(corners[i], corners[(i + 1) % 4], color));
    }
    out.push(LineSegment::solid(p, light.target, color));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolestage_scene::{assemble_scene, Node, SceneOptions};

    fn stage() -> RenderList {
        extract(&assemble_scene(&SceneOptions::default()))
    }

    #[test]
    fn extracts_every_mesh() {
        let list = stage();
        assert_eq!(list.meshes.len(), 7);
        let names: Vec<&str> = list.meshes.iter().map(|m| m.name.as_str()).collect();
        assert!(names.contains(&"head"));
        assert!(names.contains(&"ground"));
    }

    #[test]
    fn mesh_models_are_world_space() {
        let list = stage();
        let head = list.meshes.iter().find(|m| m.name == "head").unwrap();
        assert_eq!(head.model.transform_point3(Vec3::ZERO), Vec3::new(0.0, 6.0, 0.0));
        let foot = list.meshes.iter().find(|m| m.name == "foot_right").unwrap();
        assert_eq!(foot.model.transform_point3(Vec3::ZERO), Vec3::new(0.0, -5.0, -2.5));
    }

    #[test]
    fn twin_limbs_share_geometry_ids() {
        let list = stage();
        let id = |name: &str| list.meshes.iter().find(|m| m.name == name).unwrap().geometry_id;
        assert_eq!(id("hand_left"), id("hand_right"));
        assert_eq!(id("foot_left"), id("foot_right"));
        assert_ne!(id("hand_left"), id("foot_left"));
    }

    #[test]
    fn light_is_resolved() {
        let light = stage().light.unwrap();
        assert_eq!(light.position, Vec3::new(-10.0, 20.0, 20.0));
        assert!(light.cast_shadow);
        let expected = Vec3::new(10.0, -20.0, -20.0).normalize();
        assert!(light.direction().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn helper_lines() {
        let list = stage();
        // 3 axes + 4 square edges + 1 target line
        assert_eq!(list.lines.len(), 8);
        let x_axis = list.lines[0];
        assert_eq!(x_axis.start, Vec3::ZERO);
        assert_eq!(x_axis.end, Vec3::new(20.0, 0.0, 0.0));
        let target_line = list.lines[7];
        assert_eq!(target_line.start, Vec3::new(-10.0, 20.0, 20.0));
        assert_eq!(target_line.end, Vec3::ZERO);
    }

    #[test]
    fn light_helper_square_faces_target() {
        let list = stage();
        let light = list.light.unwrap();
        for edge in &list.lines[3..7] {
            let along = (edge.end - edge.start).normalize();
            assert!(along.dot(light.direction()).abs() < 1e-5);
            assert!(((edge.end - edge.start).length() - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn shadow_camera_sees_origin() {
        let light = stage().light.unwrap();
        let clip = light.shadow_view_projection() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn shadow_casters_follow_flags() {
        assert_eq!(stage().shadow_casters().count(), 0);
        let list = extract(&assemble_scene(&SceneOptions { shadows: true }));
        assert_eq!(list.shadow_casters().count(), 6);
    }

    #[test]
    fn dangling_helper_is_skipped() {
        let mut scene = Scene::new();
        scene.add(Node::new(
            "orphan",
            NodeKind::DirectionalLightHelper {
                light: NodeId::new(),
                size: 1.0,
            },
        ));
        let list = extract(&scene);
        assert!(list.lines.is_empty());
        assert!(list.light.is_none());
    }
}
