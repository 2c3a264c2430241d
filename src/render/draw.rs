//! Frame data for the mesh pass
//!
//! Plain data built from the [`Scene`] before any GPU work: vertex layout,
//! per-frame and per-draw uniforms, and the draw list.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

use crate::scene::{Camera, LightKind, Mesh, Primitive, Scene};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x4];

    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Interleaves a primitive's attributes. Missing normals point up and
    /// missing colors are white.
    #[must_use]
    pub fn interleave(primitive: &Primitive) -> Vec<Self> {
        primitive
            .positions
            .iter()
            .enumerate()
            .map(|(i, &position)| Self {
                position,
                normal: primitive.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                color: primitive.colors.get(i).copied().unwrap_or([1.0; 4]),
            })
            .collect()
    }
}

/// Camera and lighting for one frame. Colors are linear.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_projection: Mat4,
    /// xyz: unit vector toward the directional light, w: intensity.
    pub light_direction: Vec4,
    pub light_color: Vec4,
    /// rgb: sky color, w: hemisphere intensity.
    pub sky_color: Vec4,
    pub ground_color: Vec4,
}

impl FrameUniforms {
    /// Reads the camera and the first light of each kind. A directional
    /// light shines from its node's world position toward the origin.
    #[must_use]
    pub fn new(scene: &Scene, camera: &Camera) -> Self {
        let mut uniforms = Self {
            view_projection: camera.view_projection_matrix(),
            light_direction: Vec4::new(0.0, 1.0, 0.0, 0.0),
            light_color: Vec4::ZERO,
            sky_color: Vec4::ZERO,
            ground_color: Vec4::ZERO,
        };
        let (mut has_directional, mut has_hemisphere) = (false, false);

        for node in scene.nodes.values() {
            let Some(light) = node.light.and_then(|key| scene.lights.get(key)) else {
                continue;
            };
            match &light.kind {
                LightKind::Directional(_) if !has_directional => {
                    has_directional = true;
                    let direction = Vec3::from(node.world_matrix().translation)
                        .try_normalize()
                        .unwrap_or(Vec3::Y);
                    uniforms.light_direction = direction.extend(light.intensity);
                    uniforms.light_color = srgb_to_linear(light.color).extend(1.0);
                }
                LightKind::Hemisphere(hemi) if !has_hemisphere => {
                    has_hemisphere = true;
                    uniforms.sky_color = srgb_to_linear(light.color).extend(light.intensity);
                    uniforms.ground_color = srgb_to_linear(hemi.ground_color).extend(1.0);
                }
                _ => {}
            }
        }
        uniforms
    }
}

/// Per-draw transform and color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub model: Mat4,
    pub normal_matrix: Mat4,
    pub base_color: Vec4,
}

impl ObjectUniforms {
    #[must_use]
    pub fn new(model: Mat4, base_color: Vec4) -> Self {
        let normal_matrix = if model.determinant().abs() > f32::EPSILON {
            model.inverse().transpose()
        } else {
            Mat4::IDENTITY
        };
        Self {
            model,
            normal_matrix,
            base_color,
        }
    }
}

/// One primitive of one mesh, placed by its node's world matrix.
#[derive(Debug, Clone)]
pub struct DrawItem {
    pub mesh: Arc<Mesh>,
    pub primitive: usize,
    pub object: ObjectUniforms,
}

/// Every drawable primitive on a visible path, in hierarchy order.
#[must_use]
pub fn collect_draws(scene: &Scene) -> Vec<DrawItem> {
    let mut draws = Vec::new();
    scene.for_each_visible_mesh(|mesh, world| {
        let model = Mat4::from(*world);
        for (index, primitive) in mesh.primitives.iter().enumerate() {
            if !primitive.is_well_formed() {
                continue;
            }
            draws.push(DrawItem {
                mesh: Arc::clone(mesh),
                primitive: index,
                object: ObjectUniforms::new(model, primitive.base_color),
            });
        }
    });
    draws
}

/// Rounds `size` up to a multiple of `alignment`.
#[must_use]
pub fn aligned_stride(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

/// Packs each draw's uniforms at `stride`-byte offsets for a dynamic-offset
/// uniform buffer. `stride` is raised to the uniform size if smaller.
#[must_use]
pub fn pack_objects(draws: &[DrawItem], stride: u64) -> Vec<u8> {
    let stride = (stride as usize).max(std::mem::size_of::<ObjectUniforms>());
    let mut bytes = vec![0u8; draws.len() * stride];
    for (slot, draw) in bytes.chunks_exact_mut(stride).zip(draws) {
        let object = bytemuck::bytes_of(&draw.object);
        slot[..object.len()].copy_from_slice(object);
    }
    bytes
}

#[must_use]
pub fn srgb_to_linear(color: Vec3) -> Vec3 {
    let channel = |c: f32| {
        if c <= 0.040_45 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    Vec3::new(channel(color.x), channel(color.y), channel(color.z))
}
