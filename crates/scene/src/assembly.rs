//! Scene population: light, helpers, figure and ground.

use crate::figure::build_figure;
use crate::graph::Scene;
use crate::node::{DirectionalLight, Material, Node, NodeKind, ShadowCamera};
use glam::Vec3;
use rolestage_assets::Geometry;
use rolestage_common::{Color, Transform};

pub const LIGHT_POSITION: Vec3 = Vec3::new(-10.0, 20.0, 20.0);
pub const AXES_LENGTH: f32 = 20.0;
pub const GROUND_SIZE: f32 = 60.0;
pub const GROUND_HEIGHT: f32 = -7.0;

/// Switches that affect how the scene is populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneOptions {
    /// Mark the figure as a shadow caster and the ground as a receiver.
    pub shadows: bool,
}

/// Build the stage scene.
///
/// Top-level nodes, in order: `sun`, `sun_helper`, `axes`, `figure`, `ground`.
pub fn assemble_scene(options: &SceneOptions) -> Scene {
    let mut scene = Scene::new();

    let sun = Node::new(
        "sun",
        NodeKind::DirectionalLight(DirectionalLight {
            color: Color::WHITE,
            intensity: 1.0,
            target: Vec3::ZERO,
            cast_shadow: true,
            shadow: ShadowCamera {
                half_extent: 20.0,
                map_size: 2048,
                ..ShadowCamera::default()
            },
        }),
    )
    .with_transform(Transform {
        position: LIGHT_POSITION,
        ..Transform::default()
    });
    let sun_id = scene.add(sun);

    scene.add(Node::new(
        "sun_helper",
        NodeKind::DirectionalLightHelper {
            light: sun_id,
            size: 1.0,
        },
    ));

    scene.add(Node::new("axes", NodeKind::AxesHelper { size: AXES_LENGTH }));

    let mut figure = build_figure();
    figure.set_shadow_flags(options.shadows, false);
    scene.add(figure);

    let mut ground = Node::mesh(
        "ground",
        Geometry::Plane {
            width: GROUND_SIZE,
            height: GROUND_SIZE,
        },
        Material::lambert(Color::WHITE),
    )
    .with_transform(
        Transform::from_xyz(0.0, GROUND_HEIGHT, 0.0).with_rotation_x(-std::f32::consts::FRAC_PI_2),
    );
    ground.set_shadow_flags(false, options.shadows);
    scene.add(ground);

    tracing::info!(
        "assembled scene: {} top-level nodes, {} total, shadows {}",
        scene.nodes().len(),
        scene.node_count(),
        if options.shadows { "on" } else { "off" }
    );
    scene
}
