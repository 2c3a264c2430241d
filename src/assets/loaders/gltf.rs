use std::sync::Arc;

use base64::Engine as _;
use glam::{Quat, Vec3, Vec4};

use crate::animation::{
    AnimationClip, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData, TrackMeta,
};
use crate::assets::prefab::{ModelPrefab, PrefabNode};
use crate::errors::{Result, SkyscrollError};
use crate::scene::{Mesh, Primitive};

/// glTF 2.0 loader producing a [`ModelPrefab`].
///
/// Accepts `.gltf` JSON and `.glb` containers. Buffers come from the GLB
/// binary chunk or from base64 `data:` URIs. The node hierarchy, triangle
/// meshes with their base colors, and the translation/rotation/scale
/// animation channels are kept. Textures, skins and morph targets are not.
pub struct GltfLoader;

impl GltfLoader {
    pub fn load_from_bytes(name: &str, bytes: &[u8]) -> Result<ModelPrefab> {
        let gltf = gltf::Gltf::from_slice(bytes)?;
        let buffers = Self::load_buffers(&gltf)?;

        let meshes: Vec<Arc<Mesh>> = gltf
            .meshes()
            .map(|mesh| Arc::new(Self::load_mesh(&mesh, &buffers)))
            .collect();

        let mut prefab = ModelPrefab::new(name);
        prefab.nodes = gltf
            .nodes()
            .map(|node| Self::load_node(&node, &meshes))
            .collect();
        prefab.roots = Self::root_indices(&gltf);
        prefab.clips = Self::load_animations(&gltf, &buffers)?
            .into_iter()
            .map(Arc::new)
            .collect();

        log::debug!(
            "Decoded '{}': {} nodes, {} triangles, {} clips",
            name,
            prefab.nodes.len(),
            prefab.triangle_count(),
            prefab.clips.len()
        );
        Ok(prefab)
    }

    fn load_buffers(gltf: &gltf::Gltf) -> Result<Vec<Vec<u8>>> {
        let mut buffer_data = Vec::new();
        for buffer in gltf.buffers() {
            let data = match buffer.source() {
                gltf::buffer::Source::Bin => gltf
                    .blob
                    .as_deref()
                    .map(<[u8]>::to_vec)
                    .ok_or_else(|| SkyscrollError::Gltf("Missing GLB binary chunk".into()))?,
                gltf::buffer::Source::Uri(uri) => Self::decode_data_uri(uri)?,
            };
            if data.len() < buffer.length() {
                return Err(SkyscrollError::Gltf(format!(
                    "Buffer {} holds {} bytes, {} declared",
                    buffer.index(),
                    data.len(),
                    buffer.length()
                )));
            }
            buffer_data.push(data);
        }
        Ok(buffer_data)
    }

    fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
        let payload = uri
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(_, payload)| payload)
            .ok_or_else(|| {
                SkyscrollError::Gltf(format!("External buffer '{uri}' is not supported"))
            })?;
        Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
    }

    fn node_name(node: &gltf::Node) -> String {
        node.name()
            .map_or_else(|| format!("Node_{}", node.index()), ToString::to_string)
    }

    fn load_node(node: &gltf::Node, meshes: &[Arc<Mesh>]) -> PrefabNode {
        let (t, r, s) = node.transform().decomposed();
        PrefabNode {
            name: Self::node_name(node),
            translation: Vec3::from_array(t),
            rotation: Quat::from_array(r),
            scale: Vec3::from_array(s),
            children: node.children().map(|c| c.index()).collect(),
            mesh: node.mesh().and_then(|m| meshes.get(m.index()).cloned()),
        }
    }

    fn load_mesh(mesh: &gltf::Mesh, buffers: &[Vec<u8>]) -> Mesh {
        let name = mesh
            .name()
            .map_or_else(|| format!("Mesh_{}", mesh.index()), ToString::to_string);
        let primitives = mesh
            .primitives()
            .filter_map(|primitive| Self::load_primitive(&name, &primitive, buffers))
            .collect();
        Mesh::new(name, primitives)
    }

    fn load_primitive(
        mesh_name: &str,
        primitive: &gltf::Primitive,
        buffers: &[Vec<u8>],
    ) -> Option<Primitive> {
        if !matches!(primitive.mode(), gltf::mesh::Mode::Triangles) {
            log::debug!("Skipping {:?} primitive on '{mesh_name}'", primitive.mode());
            return None;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
        let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
        if positions.is_empty() {
            return None;
        }
        let indices = reader.read_indices().map(|iter| iter.into_u32().collect());

        let base_color = Vec4::from_array(
            primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_factor(),
        );
        let mut out = Primitive::new(positions, indices).with_base_color(base_color);
        if let Some(iter) = reader.read_normals() {
            out.normals = iter.collect();
        }
        if let Some(iter) = reader.read_colors(0) {
            out.colors = iter.into_rgba_f32().collect();
        }

        if !out.is_well_formed() {
            log::warn!("Skipping malformed primitive on '{mesh_name}'");
            return None;
        }
        out.ensure_normals();
        Some(out)
    }

    // Default scene roots, else the first scene, else every parentless node.
    fn root_indices(gltf: &gltf::Gltf) -> Vec<usize> {
        if let Some(scene) = gltf.default_scene().or_else(|| gltf.scenes().next()) {
            return scene.nodes().map(|n| n.index()).collect();
        }
        let mut has_parent = vec![false; gltf.nodes().len()];
        for node in gltf.nodes() {
            for child in node.children() {
                has_parent[child.index()] = true;
            }
        }
        has_parent
            .iter()
            .enumerate()
            .filter_map(|(i, &p)| (!p).then_some(i))
            .collect()
    }

    fn load_animations(gltf: &gltf::Gltf, buffers: &[Vec<u8>]) -> Result<Vec<AnimationClip>> {
        let mut animations = Vec::new();

        for anim in gltf.animations() {
            let mut tracks = Vec::new();

            for channel in anim.channels() {
                let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
                let target = channel.target();
                let node_name = Self::node_name(&target.node());

                let times: Vec<f32> = reader
                    .read_inputs()
                    .ok_or_else(|| SkyscrollError::Gltf("Animation sampler without input".into()))?
                    .collect();
                if times.is_empty() {
                    continue;
                }

                let interpolation = match channel.sampler().interpolation() {
                    gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
                    gltf::animation::Interpolation::Step => InterpolationMode::Step,
                    gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
                };

                let outputs = reader
                    .read_outputs()
                    .ok_or_else(|| SkyscrollError::Gltf("Animation sampler without output".into()))?;

                let (target_path, data) = match outputs {
                    gltf::animation::util::ReadOutputs::Translations(iter) => (
                        TargetPath::Translation,
                        TrackData::Vector3(KeyframeTrack::new(
                            times,
                            iter.map(Vec3::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    gltf::animation::util::ReadOutputs::Rotations(iter) => (
                        TargetPath::Rotation,
                        TrackData::Quaternion(KeyframeTrack::new(
                            times,
                            iter.into_f32().map(Quat::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    gltf::animation::util::ReadOutputs::Scales(iter) => (
                        TargetPath::Scale,
                        TrackData::Vector3(KeyframeTrack::new(
                            times,
                            iter.map(Vec3::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    gltf::animation::util::ReadOutputs::MorphTargetWeights(_) => {
                        log::debug!("Skipping morph weight channel on '{node_name}'");
                        continue;
                    }
                };

                if !data.is_well_formed() {
                    log::warn!("Skipping malformed {target_path:?} channel on '{node_name}'");
                    continue;
                }

                tracks.push(Track {
                    meta: TrackMeta {
                        node_name,
                        target: target_path,
                    },
                    data,
                });
            }

            let clip_name = anim
                .name()
                .map_or_else(|| format!("Animation_{}", anim.index()), ToString::to_string);
            animations.push(AnimationClip::new(clip_name, tracks));
        }

        Ok(animations)
    }
}
