use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A procedural primitive, described by its construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    /// Icosahedron whose faces are split into `(detail + 1)^2` triangles and
    /// pushed out onto the sphere.
    Icosahedron { radius: f32, detail: u32 },
    /// Axis-aligned box centered at the origin.
    Box { width: f32, height: f32, depth: f32 },
    /// Quad in the XY plane facing +Z, centered at the origin.
    Plane { width: f32, height: f32 },
}

/// Triangle mesh generated from a [`Geometry`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds of all positions, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.positions.iter().map(|p| Vec3::from_array(*p));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    fn push(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        index
    }
}

impl Geometry {
    /// Generate the triangle mesh for this primitive.
    pub fn mesh(&self) -> MeshData {
        match *self {
            Geometry::Icosahedron { radius, detail } => icosphere_mesh(radius, detail),
            Geometry::Box {
                width,
                height,
                depth,
            } => box_mesh(width, height, depth),
            Geometry::Plane { width, height } => plane_mesh(width, height),
        }
    }

    /// Stable byte encoding used for content addressing.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(16);
        match *self {
            Geometry::Icosahedron { radius, detail } => {
                out.push(0);
                out.extend_from_slice(&radius.to_le_bytes());
                out.extend_from_slice(&detail.to_le_bytes());
            }
            Geometry::Box {
                width,
                height,
                depth,
            } => {
                out.push(1);
                for v in [width, height, depth] {
                    out.extend_from_slice(&v.to_le_bytes());
                }
            }
            Geometry::Plane { width, height } => {
                out.push(2);
                for v in [width, height] {
                    out.extend_from_slice(&v.to_le_bytes());
                }
            }
        }
        out
    }

    /// Short human-readable label.
    pub fn label(&self) -> String {
        match *self {
            Geometry::Icosahedron { radius, detail } => {
                format!("icosphere(r={radius}, detail={detail})")
            }
            Geometry::Box {
                width,
                height,
                depth,
            } => format!("box({width}x{height}x{depth})"),
            Geometry::Plane { width, height } => format!("plane({width}x{height})"),
        }
    }
}

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

fn icosahedron_vertices() -> [Vec3; 12] {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
}

fn icosphere_mesh(radius: f32, detail: u32) -> MeshData {
    let corners = icosahedron_vertices();
    let cols = detail as usize + 1;
    let mut mesh = MeshData::default();

    for face in ICOSAHEDRON_FACES {
        let [a, b, c] = face.map(|i| corners[i]);

        // Row i runs from the a-b edge (i = 0) up to the apex c (i = cols).
        let mut grid: Vec<Vec<Vec3>> = Vec::with_capacity(cols + 1);
        for i in 0..=cols {
            let s = i as f32 / cols as f32;
            let aj = a.lerp(c, s);
            let bj = b.lerp(c, s);
            let rows = cols - i;
            if rows == 0 {
                grid.push(vec![c]);
                continue;
            }
            grid.push(
                (0..=rows)
                    .map(|j| aj.lerp(bj, j as f32 / rows as f32))
                    .collect(),
            );
        }

        for i in 0..cols {
            for j in 0..2 * (cols - i) - 1 {
                let k = j / 2;
                let tri = if j % 2 == 0 {
                    [grid[i][k + 1], grid[i + 1][k], grid[i][k]]
                } else {
                    [grid[i][k + 1], grid[i + 1][k + 1], grid[i + 1][k]]
                };
                for p in tri {
                    let n = p.normalize();
                    let index = mesh.push(n * radius, n);
                    mesh.indices.push(index);
                }
            }
        }
    }

    mesh
}

fn box_mesh(width: f32, height: f32, depth: f32) -> MeshData {
    let (x, y, z) = (width / 2.0, height / 2.0, depth / 2.0);
    #[rustfmt::skip]
    let faces: [([[f32; 3]; 4], [f32; 3]); 6] = [
        // +Z
        ([[-x, -y,  z], [ x, -y,  z], [ x,  y,  z], [-x,  y,  z]], [0.0, 0.0, 1.0]),
        // -Z
        ([[ x, -y, -z], [-x, -y, -z], [-x,  y, -z], [ x,  y, -z]], [0.0, 0.0, -1.0]),
        // +X
        ([[ x, -y,  z], [ x, -y, -z], [ x,  y, -z], [ x,  y,  z]], [1.0, 0.0, 0.0]),
        // -X
        ([[-x, -y, -z], [-x, -y,  z], [-x,  y,  z], [-x,  y, -z]], [-1.0, 0.0, 0.0]),
        // +Y
        ([[-x,  y,  z], [ x,  y,  z], [ x,  y, -z], [-x,  y, -z]], [0.0, 1.0, 0.0]),
        // -Y
        ([[-x, -y, -z], [ x, -y, -z], [ x, -y,  z], [-x, -y,  z]], [0.0, -1.0, 0.0]),
    ];

    let mut mesh = MeshData::default();
    for (corners, normal) in faces {
        let normal = Vec3::from_array(normal);
        let base = mesh.positions.len() as u32;
        for corner in corners {
            mesh.push(Vec3::from_array(corner), normal);
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    mesh
}

fn plane_mesh(width: f32, height: f32) -> MeshData {
    let (x, y) = (width / 2.0, height / 2.0);
    let mut mesh = MeshData::default();
    for corner in [[-x, -y], [x, -y], [x, y], [-x, y]] {
        mesh.push(Vec3::new(corner[0], corner[1], 0.0), Vec3::Z);
    }
    mesh.indices.extend_from_slice(&[0, 1, 2, 2, 3, 0]);
    mesh
}
