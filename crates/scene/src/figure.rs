//! The blocky humanoid figure.

use crate::node::{Material, Node};
use rolestage_assets::Geometry;
use rolestage_common::Color;

pub const FIGURE_COLOR: Color = Color::from_hex(0x8ccdf3);
pub const FIGURE_SPECULAR: Color = Color::from_hex(0x6e6e6e);

const HEAD: Geometry = Geometry::Icosahedron {
    radius: 2.0,
    detail: 2,
};
const BODY: Geometry = Geometry::Box {
    width: 2.0,
    height: 8.0,
    depth: 2.0,
};
const HAND: Geometry = Geometry::Box {
    width: 2.0,
    height: 2.0,
    depth: 2.0,
};
const FOOT: Geometry = Geometry::Box {
    width: 2.0,
    height: 5.0,
    depth: 2.0,
};

/// Lateral offset of hands and feet along Z.
const LIMB_SPREAD: f32 = 2.5;

/// Build the figure: a `figure` group holding `head`, `body`, `hands` and
/// `feet`, all sharing one Phong material.
///
/// Every call returns a fresh tree with new node ids. The caller adds it to
/// a scene.
pub fn build_figure() -> Node {
    let material = Material::phong(FIGURE_COLOR, FIGURE_SPECULAR);

    let head = Node::mesh("head", HEAD, material).at(0.0, 6.0, 0.0);
    let body = Node::mesh("body", BODY, material);

    let hands = Node::group("hands")
        .with_child(Node::mesh("hand_left", HAND, material).at(0.0, 2.5, LIMB_SPREAD))
        .with_child(Node::mesh("hand_right", HAND, material).at(0.0, 2.5, -LIMB_SPREAD));

    let feet = Node::group("feet")
        .with_child(Node::mesh("foot_left", FOOT, material).at(0.0, -5.0, LIMB_SPREAD))
        .with_child(Node::mesh("foot_right", FOOT, material).at(0.0, -5.0, -LIMB_SPREAD));

    Node::group("figure")
        .with_child(head)
        .with_child(body)
        .with_child(hands)
        .with_child(feet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use glam::Vec3;

    fn mesh_geometry(node: &Node) -> Geometry {
        match node.kind {
            NodeKind::Mesh { geometry, .. } => geometry,
            ref other => panic!("expected mesh, got {other:?}"),
        }
    }

    #[test]
    fn figure_layout() {
        let figure = build_figure();
        let names: Vec<&str> = figure.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["head", "body", "hands", "feet"]);
        assert_eq!(figure.subtree_len(), 9);
    }

    #[test]
    fn head_offset_and_shape() {
        let figure = build_figure();
        let head = figure.find("head").unwrap();
        assert_eq!(head.transform.position, Vec3::new(0.0, 6.0, 0.0));
        assert_eq!(mesh_geometry(head), HEAD);
    }

    #[test]
    fn limbs_mirror_across_z() {
        let figure = build_figure();
        let offsets = |group: &str| -> Vec<Vec3> {
            figure
                .find(group)
                .unwrap()
                .children
                .iter()
                .map(|c| c.transform.position)
                .collect()
        };
        assert_eq!(
            offsets("hands"),
            vec![Vec3::new(0.0, 2.5, 2.5), Vec3::new(0.0, 2.5, -2.5)]
        );
        assert_eq!(
            offsets("feet"),
            vec![Vec3::new(0.0, -5.0, 2.5), Vec3::new(0.0, -5.0, -2.5)]
        );
        assert_eq!(mesh_geometry(figure.find("foot_right").unwrap()), FOOT);
        assert_eq!(mesh_geometry(figure.find("hand_left").unwrap()), HAND);
    }

    #[test]
    fn all_meshes_share_material() {
        let figure = build_figure();
        let mut materials = Vec::new();
        fn collect(node: &Node, out: &mut Vec<Material>) {
            if let NodeKind::Mesh { material, .. } = node.kind {
                out.push(material);
            }
            node.children.iter().for_each(|c| collect(c, out));
        }
        collect(&figure, &mut materials);
        assert_eq!(materials.len(), 6);
        assert!(materials.iter().all(|m| *m == Material::phong(FIGURE_COLOR, FIGURE_SPECULAR)));
    }

    #[test]
    fn builds_are_identical_but_distinct() {
        let a = build_figure();
        let b = build_figure();
        assert!(a.same_structure(&b));
        assert_ne!(a.id, b.id);
        assert_ne!(a.find("head").unwrap().id, b.find("head").unwrap().id);
        // The second hand is its own node, not a copy of the first.
        assert_ne!(a.find("hand_left").unwrap().id, a.find("hand_right").unwrap().id);
    }
}
