use crate::node::{Node, NodeId, NodeKind};
use glam::Mat4;
use serde::Serialize;

/// The scene root.
///
/// Top-level nodes are kept in insertion order. There is no removal API:
/// composition only grows, and everything added at startup lives as long as
/// the scene does.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Scene {
    nodes: Vec<Node>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node (and its subtree) to the root. Returns its id.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = node.id;
        tracing::debug!(
            "scene: added {} '{}' [{}] ({} nodes)",
            node.kind.label(),
            node.name,
            id.short(),
            node.subtree_len()
        );
        self.nodes.push(node);
        id
    }

    /// Top-level nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Total node count, descendants included.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(Node::subtree_len).sum()
    }

    /// Find a node anywhere in the tree by id.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        fn search(node: &Node, id: NodeId) -> Option<&Node> {
            if node.id == id {
                return Some(node);
            }
            node.children.iter().find_map(|c| search(c, id))
        }
        self.nodes.iter().find_map(|n| search(n, id))
    }

    /// Find the first node named `name` (depth-first, insertion order).
    pub fn find(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find_map(|n| n.find(name))
    }

    /// Count top-level nodes whose kind satisfies `pred`.
    pub fn count_top_level(&self, pred: impl Fn(&NodeKind) -> bool) -> usize {
        self.nodes.iter().filter(|n| pred(&n.kind)).count()
    }

    /// World matrix of the node with `id`, composing every ancestor transform.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut found = None;
        self.walk(|node, world| {
            if node.id == id && found.is_none() {
                found = Some(world);
            }
        });
        found
    }

    /// Visit every node depth-first with its world matrix.
    pub fn walk(&self, mut visit: impl FnMut(&Node, Mat4)) {
        fn recurse(node: &Node, parent: Mat4, visit: &mut dyn FnMut(&Node, Mat4)) {
            let world = parent * node.transform.matrix();
            visit(node, world);
            for child in &node.children {
                recurse(child, world, visit);
            }
        }
        for node in &self.nodes {
            recurse(node, Mat4::IDENTITY, &mut visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rolestage_assets::Geometry;
    use rolestage_common::Color;
    use crate::node::Material;

    fn cube(name: &str) -> Node {
        Node::mesh(
            name,
            Geometry::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            Material::lambert(Color::WHITE),
        )
    }

    #[test]
    fn scene_starts_empty() {
        let scene = Scene::new();
        assert!(scene.nodes().is_empty());
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn add_keeps_insertion_order() {
        let mut scene = Scene::new();
        let a = scene.add(cube("a"));
        let b = scene.add(cube("b"));
        let ids: Vec<NodeId> = scene.nodes().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn world_matrix_composes_parents() {
        let mut scene = Scene::new();
        let child = cube("child").at(0.0, 2.0, 0.0);
        let child_id = child.id;
        scene.add(Node::group("parent").at(1.0, 0.0, 0.0).with_child(child));

        let world = scene.world_matrix(child_id).unwrap();
        assert_eq!(world.transform_point3(Vec3::ZERO), Vec3::new(1.0, 2.0, 0.0));
        assert!(scene.get(child_id).is_some());
        assert_eq!(scene.node_count(), 2);
    }

    #[test]
    fn world_matrix_unknown_id() {
        let scene = Scene::new();
        assert!(scene.world_matrix(NodeId::new()).is_none());
    }

    #[test]
    fn walk_visits_every_node() {
        let mut scene = Scene::new();
        scene.add(Node::group("g").with_child(cube("x")).with_child(cube("y")));
        scene.add(cube("z"));
        let mut names = Vec::new();
        scene.walk(|n, _| names.push(n.name.clone()));
        assert_eq!(names, vec!["g", "x", "y", "z"]);
    }
}
