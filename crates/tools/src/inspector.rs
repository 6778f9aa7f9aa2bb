use rolestage_assets::GeometryId;
use rolestage_scene::{NodeKind, Scene};
use serde::Serialize;
use std::collections::BTreeSet;

/// Read-only queries against a scene for the CLI and debug UI.
pub struct SceneInspector;

impl SceneInspector {
    /// Count nodes by kind.
    pub fn summary(scene: &Scene) -> SceneSummary {
        let mut summary = SceneSummary {
            top_level: scene.nodes().len(),
            total_nodes: 0,
            groups: 0,
            meshes: 0,
            lights: 0,
            helpers: 0,
            unique_geometries: 0,
            shadow_casters: 0,
            shadow_receivers: 0,
        };
        let mut geometries = BTreeSet::new();

        scene.walk(|node, _| {
            summary.total_nodes += 1;
            match &node.kind {
                NodeKind::Group => summary.groups += 1,
                NodeKind::Mesh {
                    geometry,
                    cast_shadow,
                    receive_shadow,
                    ..
                } => {
                    summary.meshes += 1;
                    geometries.insert(GeometryId::of(geometry));
                    summary.shadow_casters += usize::from(*cast_shadow);
                    summary.shadow_receivers += usize::from(*receive_shadow);
                }
                NodeKind::DirectionalLight(_) => summary.lights += 1,
                NodeKind::DirectionalLightHelper { .. } | NodeKind::AxesHelper { .. } => {
                    summary.helpers += 1
                }
            }
        });
        summary.unique_geometries = geometries.len();
        summary
    }

    /// Names of the top-level nodes in insertion order.
    pub fn list_top_level(scene: &Scene) -> Vec<String> {
        scene.nodes().iter().map(|n| n.name.clone()).collect()
    }
}

/// Node counts for a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneSummary {
    pub top_level: usize,
    pub total_nodes: usize,
    pub groups: usize,
    pub meshes: usize,
    pub lights: usize,
    pub helpers: usize,
    pub unique_geometries: usize,
    pub shadow_casters: usize,
    pub shadow_receivers: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: nodes={} (top-level {}) meshes={} geometries={} lights={} helpers={} groups={}",
            self.total_nodes,
            self.top_level,
            self.meshes,
            self.unique_geometries,
            self.lights,
            self.helpers,
            self.groups
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolestage_scene::{assemble_scene, SceneOptions};

    #[test]
    fn summary_empty_scene() {
        let summary = SceneInspector::summary(&Scene::new());
        assert_eq!(summary.total_nodes, 0);
        assert_eq!(summary.unique_geometries, 0);
    }

    #[test]
    fn summary_of_stage() {
        let summary = SceneInspector::summary(&assemble_scene(&SceneOptions::default()));
        assert_eq!(summary.top_level, 5);
        // figure group + hands + feet
        assert_eq!(summary.groups, 3);
        // head, body, 2 hands, 2 feet, ground
        assert_eq!(summary.meshes, 7);
        // icosphere, body box, hand box, foot box, plane
        assert_eq!(summary.unique_geometries, 5);
        assert_eq!(summary.lights, 1);
        assert_eq!(summary.helpers, 2);
        assert_eq!(summary.total_nodes, 13);
        assert_eq!(summary.shadow_casters, 0);
    }

    #[test]
    fn shadow_counts_follow_options() {
        let summary = SceneInspector::summary(&assemble_scene(&SceneOptions { shadows: true }));
        assert_eq!(summary.shadow_casters, 6);
        assert_eq!(summary.shadow_receivers, 1);
    }

    #[test]
    fn top_level_order() {
        let names = SceneInspector::list_top_level(&assemble_scene(&SceneOptions::default()));
        assert_eq!(names, vec!["sun", "sun_helper", "axes", "figure", "ground"]);
    }

    #[test]
    fn summary_serializes() {
        let summary = SceneInspector::summary(&assemble_scene(&SceneOptions::default()));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["meshes"], 7);
        assert!(summary.to_string().contains("meshes=7"));
    }
}
