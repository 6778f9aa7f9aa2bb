//! Procedural geometry and a content-addressed geometry registry.
//!
//! Geometry is identified by a hash of its construction parameters, so two
//! nodes built from the same constants share one mesh. The renderer consumes
//! meshes by [`GeometryId`], never by node.

mod geometry;

pub use geometry::{Geometry, MeshData};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Content-addressed geometry ID computed from the construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeometryId(pub u64);

impl GeometryId {
    /// Hash `geometry` without registering it.
    pub fn of(geometry: &Geometry) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(geometry.canonical_bytes());
        let result = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&result[..8]);
        GeometryId(u64::from_le_bytes(bytes))
    }
}

impl std::fmt::Display for GeometryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Errors from geometry lookups.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("geometry not found: {0}")]
    NotFound(GeometryId),
}

#[derive(Debug, Clone)]
struct Entry {
    geometry: Geometry,
    mesh: MeshData,
}

/// Registry of generated meshes keyed by content hash.
#[derive(Debug, Clone, Default)]
pub struct GeometryRegistry {
    entries: BTreeMap<GeometryId, Entry>,
}

impl GeometryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `geometry`, generating its mesh the first time it is seen.
    pub fn insert(&mut self, geometry: Geometry) -> GeometryId {
        let id = GeometryId::of(&geometry);
        self.entries.entry(id).or_insert_with(|| {
            let mesh = geometry.mesh();
            tracing::debug!(
                "generated {} ({} vertices, {} triangles)",
                geometry.label(),
                mesh.vertex_count(),
                mesh.triangle_count()
            );
            Entry { geometry, mesh }
        });
        id
    }

    pub fn get(&self, id: GeometryId) -> Result<&MeshData, AssetError> {
        self.entries
            .get(&id)
            .map(|e| &e.mesh)
            .ok_or(AssetError::NotFound(id))
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.entries.get(&id).map(|e| &e.geometry)
    }

    pub fn contains(&self, id: GeometryId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Iterate registered meshes in id order.
    pub fn iter(&self) -> impl Iterator<Item = (GeometryId, &MeshData)> {
        self.entries.iter().map(|(id, e)| (*id, &e.mesh))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn crate_info() -> &'static str {
    concat!("rolestage-assets v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("assets"));
    }

    const HAND: Geometry = Geometry::Box {
        width: 2.0,
        height: 2.0,
        depth: 2.0,
    };

    #[test]
    fn insert_and_get() {
        let mut registry = GeometryRegistry::new();
        let id = registry.insert(HAND);
        assert_eq!(registry.get(id).unwrap().vertex_count(), 24);
        assert_eq!(registry.geometry(id), Some(&HAND));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn content_addressed_dedup() {
        let mut registry = GeometryRegistry::new();
        let id1 = registry.insert(HAND);
        let id2 = registry.insert(HAND);
        assert_eq!(id1, id2);
        assert_eq!(registry.len(), 1);
        assert_eq!(GeometryId::of(&HAND), id1);
    }

    #[test]
    fn different_sizes_get_different_ids() {
        let mut registry = GeometryRegistry::new();
        let hand = registry.insert(HAND);
        let foot = registry.insert(Geometry::Box {
            width: 2.0,
            height: 5.0,
            depth: 2.0,
        });
        assert_ne!(hand, foot);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let registry = GeometryRegistry::new();
        let err = registry.get(GeometryId(7)).unwrap_err();
        assert!(matches!(err, AssetError::NotFound(GeometryId(7))));
        assert!(registry.is_empty());
    }
}
