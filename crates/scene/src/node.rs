use glam::Vec3;
use rolestage_assets::Geometry;
use rolestage_common::{Color, Transform};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for logs.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Surface shading model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum Material {
    /// Diffuse plus a Blinn-Phong specular highlight.
    Phong {
        color: Color,
        specular: Color,
        shininess: f32,
    },
    /// Diffuse only.
    Lambert { color: Color },
}

impl Material {
    pub const DEFAULT_SHININESS: f32 = 30.0;

    pub fn phong(color: Color, specular: Color) -> Self {
        Self::Phong {
            color,
            specular,
            shininess: Self::DEFAULT_SHININESS,
        }
    }

    pub fn lambert(color: Color) -> Self {
        Self::Lambert { color }
    }

    pub fn color(&self) -> Color {
        match self {
            Material::Phong { color, .. } | Material::Lambert { color } => *color,
        }
    }
}

/// Orthographic volume the directional light renders its shadow map from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowCamera {
    /// Half of the square's side, in world units.
    pub half_extent: f32,
    pub near: f32,
    pub far: f32,
    /// Shadow map resolution in texels per side.
    pub map_size: u32,
}

impl Default for ShadowCamera {
    fn default() -> Self {
        Self {
            half_extent: 5.0,
            near: 0.5,
            far: 500.0,
            map_size: 512,
        }
    }
}

/// Light with parallel rays shining from the node position toward `target`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub target: Vec3,
    pub cast_shadow: bool,
    pub shadow: ShadowCamera,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            target: Vec3::ZERO,
            cast_shadow: false,
            shadow: ShadowCamera::default(),
        }
    }
}

/// What a node is. Groups only position their children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    Group,
    Mesh {
        geometry: Geometry,
        material: Material,
        cast_shadow: bool,
        receive_shadow: bool,
    },
    DirectionalLight(DirectionalLight),
    /// Wireframe square at the light plus a line to its target.
    DirectionalLightHelper { light: NodeId, size: f32 },
    /// Red/green/blue lines along +X/+Y/+Z.
    AxesHelper { size: f32 },
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Group => "group",
            NodeKind::Mesh { .. } => "mesh",
            NodeKind::DirectionalLight(_) => "directional_light",
            NodeKind::DirectionalLightHelper { .. } => "light_helper",
            NodeKind::AxesHelper { .. } => "axes_helper",
        }
    }

    pub fn is_helper(&self) -> bool {
        matches!(
            self,
            NodeKind::DirectionalLightHelper { .. } | NodeKind::AxesHelper { .. }
        )
    }
}

/// A named node with a parent-relative transform and owned children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            transform: Transform::default(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, geometry: Geometry, material: Material) -> Self {
        Self::new(
            name,
            NodeKind::Mesh {
                geometry,
                material,
                cast_shadow: false,
                receive_shadow: false,
            },
        )
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn at(self, x: f32, y: f32, z: f32) -> Self {
        self.with_transform(Transform::from_xyz(x, y, z))
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first search for a descendant (or self) named `name`.
    pub fn find(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    /// Number of nodes in this subtree, self included.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }

    /// Set the shadow flags on every mesh in this subtree.
    pub fn set_shadow_flags(&mut self, cast: bool, receive: bool) {
        if let NodeKind::Mesh {
            cast_shadow,
            receive_shadow,
            ..
        } = &mut self.kind
        {
            *cast_shadow = cast;
            *receive_shadow = receive;
        }
        for child in &mut self.children {
            child.set_shadow_flags(cast, receive);
        }
    }

    /// Equal in everything but node ids.
    pub fn same_structure(&self, other: &Node) -> bool {
        let kinds_match = match (&self.kind, &other.kind) {
            (
                NodeKind::DirectionalLightHelper { size: a, .. },
                NodeKind::DirectionalLightHelper { size: b, .. },
            ) => a == b,
            (a, b) => a == b,
        };
        kinds_match
            && self.name == other.name
            && self.transform == other.transform
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.same_structure(b))
    }
}
