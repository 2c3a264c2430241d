use std::sync::atomic::{AtomicU64, Ordering};

use glam::{Vec3, Vec4};

static NEXT_MESH_ID: AtomicU64 = AtomicU64::new(1);

/// One indexed triangle list with a single base color.
///
/// Vertex data is in the owning node's local space. `normals` and `colors`
/// are either empty or hold one entry per position.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
    pub base_color: Vec4,
}

impl Primitive {
    /// Creates a primitive. Without `indices` the positions are taken as a
    /// plain triangle list.
    #[must_use]
    pub fn new(positions: Vec<[f32; 3]>, indices: Option<Vec<u32>>) -> Self {
        let indices = indices.unwrap_or_else(|| (0..positions.len() as u32).collect());
        Self {
            positions,
            normals: Vec::new(),
            colors: Vec::new(),
            indices,
            base_color: Vec4::ONE,
        }
    }

    #[must_use]
    pub fn with_base_color(mut self, color: Vec4) -> Self {
        self.base_color = color;
        self
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the buffers agree with each other and every index is in range.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let count = self.positions.len();
        !self.indices.is_empty()
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as usize) < count)
            && (self.normals.is_empty() || self.normals.len() == count)
            && (self.colors.is_empty() || self.colors.len() == count)
    }

    /// Fills `normals` with area-weighted vertex normals when they are
    /// missing. Degenerate triangles contribute nothing.
    pub fn ensure_normals(&mut self) {
        if !self.normals.is_empty() || !self.is_well_formed() {
            return;
        }
        let mut sums = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
            let pa = Vec3::from_array(self.positions[a]);
            let pb = Vec3::from_array(self.positions[b]);
            let pc = Vec3::from_array(self.positions[c]);
            let face = (pb - pa).cross(pc - pa);
            sums[a] += face;
            sums[b] += face;
            sums[c] += face;
        }
        self.normals = sums
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
            .collect();
    }
}

/// Renderable geometry shared by every node instantiated from the same
/// prefab node.
#[derive(Debug)]
pub struct Mesh {
    id: u64,
    pub name: String,
    pub primitives: Vec<Primitive>,
}

impl Mesh {
    #[must_use]
    pub fn new(name: impl Into<String>, primitives: Vec<Primitive>) -> Self {
        Self {
            id: NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            primitives,
        }
    }

    /// Process-unique identifier, used to cache GPU buffers.
    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.primitives.iter().map(Primitive::triangle_count).sum()
    }
}
