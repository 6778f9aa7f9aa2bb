use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use rolestage_assets::GeometryId;
use rolestage_render::{LightData, LineSegment, MeshInstance};
use rolestage_scene::{Material, PerspectiveCamera};
use std::collections::BTreeMap;
use std::ops::Range;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Globals {
    pub view_proj: [[f32; 4]; 4],
    pub light_view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub light_dir: [f32; 4],
    pub light_color: [f32; 4],
    pub params: [f32; 4],
}

/// Depth offset subtracted before the shadow comparison.
const SHADOW_BIAS: f32 = 0.002;

impl Globals {
    pub fn new(
        camera: &PerspectiveCamera,
        light: Option<&LightData>,
        shadows: bool,
        shadow_map_size: u32,
    ) -> Self {
        let (light_view_proj, light_dir, light_color) = match light {
            Some(l) => {
                let [r, g, b] = l.color.to_linear();
                (
                    l.shadow_view_projection(),
                    (-l.direction()).extend(0.0).to_array(),
                    [r * l.intensity, g * l.intensity, b * l.intensity, 1.0],
                )
            }
            None => (Mat4::IDENTITY, [0.0, 1.0, 0.0, 0.0], [0.0; 4]),
        };
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            light_view_proj: light_view_proj.to_cols_array_2d(),
            camera_pos: camera.position.extend(1.0).to_array(),
            light_dir,
            light_color,
            params: [
                if shadows { 1.0 } else { 0.0 },
                1.0 / shadow_map_size.max(1) as f32,
                SHADOW_BIAS,
                0.0,
            ],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub model_0: [f32; 4],
    pub model_1: [f32; 4],
    pub model_2: [f32; 4],
    pub model_3: [f32; 4],
    pub color: [f32; 4],
    pub specular: [f32; 4],
    pub flags: [f32; 4],
}

impl InstanceData {
    pub fn from_mesh(mesh: &MeshInstance) -> Self {
        let cols = mesh.model.to_cols_array_2d();
        let (specular, phong) = match mesh.material {
            Material::Phong {
                specular,
                shininess,
                ..
            } => {
                let [r, g, b] = specular.to_linear();
                ([r, g, b, shininess], 1.0)
            }
            Material::Lambert { .. } => ([0.0, 0.0, 0.0, 1.0], 0.0),
        };
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color: mesh.material.color().to_linear_rgba().to_array(),
            specular,
            flags: [phong, if mesh.receive_shadow { 1.0 } else { 0.0 }, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Two vertices per segment, for a `LineList` topology.
pub fn line_vertices(lines: &[LineSegment]) -> Vec<LineVertex> {
    lines
        .iter()
        .flat_map(|l| {
            [
                LineVertex {
                    position: l.start.to_array(),
                    color: l.start_color.extend(1.0).to_array(),
                },
                LineVertex {
                    position: l.end.to_array(),
                    color: l.end_color.extend(1.0).to_array(),
                },
            ]
        })
        .collect()
}

/// A run of instances drawn with one mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawBatch {
    pub geometry: GeometryId,
    pub instances: Range<u32>,
}

/// Group `meshes` by geometry, appending their instance data to `out`.
/// Batch ranges index into `out`.
pub fn build_batches<'a>(
    meshes: impl Iterator<Item = &'a MeshInstance>,
    out: &mut Vec<InstanceData>,
) -> Vec<DrawBatch> {
    let mut grouped: BTreeMap<GeometryId, Vec<InstanceData>> = BTreeMap::new();
    for mesh in meshes {
        grouped
            .entry(mesh.geometry_id)
            .or_default()
            .push(InstanceData::from_mesh(mesh));
    }

    let mut batches = Vec::with_capacity(grouped.len());
    for (geometry, instances) in grouped {
        let start = out.len() as u32;
        out.extend(instances);
        batches.push(DrawBatch {
            geometry,
            instances: start..out.len() as u32,
        });
    }
    batches
}
