//! glTF Loader Tests
//!
//! Tests for:
//! - Node hierarchy and TRS decoding from `.gltf` JSON with a data URI buffer
//! - The same asset packed as a `.glb` container
//! - Triangle meshes with base colors and generated normals
//! - Translation animation channels becoming clips
//! - Root selection and name fallbacks
//! - Unsupported external buffers and malformed input
//! - Loading through `GltfSource` from a directory

#![cfg(feature = "gltf")]

use base64::Engine as _;
use glam::{Quat, Vec3, Vec4};
use serde_json::{Value, json};

use skyscroll::animation::{AnimationMixer, AnimationPlayer, TargetPath, TrackData};
use skyscroll::assets::{GltfLoader, GltfSource, ModelSource};
use skyscroll::errors::SkyscrollError;
use skyscroll::scene::Scene;

const EPSILON: f32 = 1e-5;

fn approx_vec(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

// ============================================================================
// Fixtures
// ============================================================================

/// Keyframe times `[0, 1]` and translations `(0,0,0)`, `(2,0,0)` (bytes
/// 0..32), one triangle's positions (32..68) and its `u16` indices (68..74,
/// padded to 76).
fn buffer_bytes() -> Vec<u8> {
    let floats: [f32; 17] = [
        0.0, 1.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, // animation
        0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, // triangle
    ];
    let mut bytes: Vec<u8> = floats.iter().flat_map(|f| f.to_le_bytes()).collect();
    for index in [0u16, 1, 2, 0] {
        bytes.extend_from_slice(&index.to_le_bytes());
    }
    bytes
}

/// A body node carrying a red triangle with a wing child, and a clip moving
/// the wing along +X. `buffer` is spliced in as the single buffer entry.
fn bird_document(buffer: Value) -> Value {
    json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0] } ],
        "nodes": [
            { "name": "body", "translation": [0.0, 1.0, 0.0], "children": [1], "mesh": 0 },
            { "name": "wing", "translation": [1.0, 0.0, 0.0], "scale": [2.0, 2.0, 2.0] }
        ],
        "meshes": [ {
            "name": "body_mesh",
            "primitives": [ { "attributes": { "POSITION": 2 }, "indices": 3, "material": 0 } ]
        } ],
        "materials": [ { "pbrMetallicRoughness": { "baseColorFactor": [1.0, 0.0, 0.0, 1.0] } } ],
        "buffers": [ buffer ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 8, "byteLength": 24 },
            { "buffer": 0, "byteOffset": 32, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 68, "byteLength": 6 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 2, "type": "SCALAR",
              "min": [0.0], "max": [1.0] },
            { "bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC3" },
            { "bufferView": 2, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 3, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ],
        "animations": [ {
            "name": "fly",
            "channels": [ { "sampler": 0, "target": { "node": 1, "path": "translation" } } ],
            "samplers": [ { "input": 0, "output": 1, "interpolation": "LINEAR" } ]
        } ]
    })
}

fn bird_gltf() -> Vec<u8> {
    let bytes = buffer_bytes();
    let uri = format!(
        "data:application/octet-stream;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&bytes)
    );
    let doc = bird_document(json!({ "byteLength": bytes.len(), "uri": uri }));
    serde_json::to_vec(&doc).expect("serialize fixture")
}

fn pad_to_four(mut data: Vec<u8>, fill: u8) -> Vec<u8> {
    while data.len() % 4 != 0 {
        data.push(fill);
    }
    data
}

fn bird_glb() -> Vec<u8> {
    let bin = buffer_bytes();
    let doc = bird_document(json!({ "byteLength": bin.len() }));
    let json_chunk = pad_to_four(serde_json::to_vec(&doc).expect("serialize fixture"), b' ');
    let bin_chunk = pad_to_four(bin, 0);

    let total = 12 + 8 + json_chunk.len() + 8 + bin_chunk.len();
    let mut glb = Vec::with_capacity(total);
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total as u32).to_le_bytes());
    glb.extend_from_slice(&(json_chunk.len() as u32).to_le_bytes());
    glb.extend_from_slice(b"JSON");
    glb.extend_from_slice(&json_chunk);
    glb.extend_from_slice(&(bin_chunk.len() as u32).to_le_bytes());
    glb.extend_from_slice(b"BIN\0");
    glb.extend_from_slice(&bin_chunk);
    glb
}

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn decodes_node_hierarchy() -> anyhow::Result<()> {
    let prefab = GltfLoader::load_from_bytes("Bird.gltf", &bird_gltf())?;

    assert_eq!(prefab.name, "Bird.gltf");
    assert_eq!(prefab.nodes.len(), 2);
    assert_eq!(prefab.roots, vec![0]);

    let body = &prefab.nodes[0];
    assert_eq!(body.name, "body");
    assert_eq!(body.children, vec![1]);
    assert!(approx_vec(body.translation, Vec3::new(0.0, 1.0, 0.0)));

    let wing = &prefab.nodes[1];
    assert!(approx_vec(wing.scale, Vec3::splat(2.0)));
    assert_eq!(wing.rotation, Quat::IDENTITY);
    Ok(())
}

#[test]
fn decodes_translation_clip() -> anyhow::Result<()> {
    let prefab = GltfLoader::load_from_bytes("Bird.gltf", &bird_gltf())?;

    assert!(prefab.is_animated());
    let clip = &prefab.clips[0];
    assert_eq!(clip.name, "fly");
    assert!((clip.duration - 1.0).abs() < EPSILON);
    assert_eq!(clip.tracks.len(), 1);

    let track = &clip.tracks[0];
    assert_eq!(track.meta.node_name, "wing");
    assert_eq!(track.meta.target, TargetPath::Translation);
    match &track.data {
        TrackData::Vector3(t) => {
            let mid = t.sample(0.5).expect("non-empty track");
            assert!(approx_vec(mid, Vec3::new(1.0, 0.0, 0.0)), "got {mid}");
        }
        TrackData::Quaternion(_) => panic!("expected a vector track"),
    }
    Ok(())
}

#[test]
fn decodes_triangle_mesh() -> anyhow::Result<()> {
    let prefab = GltfLoader::load_from_bytes("Bird.gltf", &bird_gltf())?;

    let mesh = prefab.nodes[0].mesh.as_ref().expect("body mesh");
    assert!(prefab.nodes[1].mesh.is_none());
    assert_eq!(mesh.name, "body_mesh");
    assert_eq!(mesh.primitives.len(), 1);
    assert_eq!(prefab.triangle_count(), 1);

    let primitive = &mesh.primitives[0];
    assert_eq!(primitive.positions, vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    assert_eq!(primitive.indices, vec![0, 1, 2]);
    assert_eq!(primitive.base_color, Vec4::new(1.0, 0.0, 0.0, 1.0));
    // No NORMAL attribute: face normals are generated
    assert_eq!(primitive.normals, vec![[0.0, 0.0, 1.0]; 3]);
    assert!(primitive.colors.is_empty());
    Ok(())
}

#[test]
fn glb_container_matches_json_form() -> anyhow::Result<()> {
    let from_glb = GltfLoader::load_from_bytes("Bird.glb", &bird_glb())?;
    let from_json = GltfLoader::load_from_bytes("Bird.glb", &bird_gltf())?;

    assert_eq!(from_glb.nodes.len(), from_json.nodes.len());
    assert_eq!(from_glb.roots, from_json.roots);
    assert_eq!(from_glb.clips.len(), 1);
    assert_eq!(from_glb.triangle_count(), 1);
    assert!((from_glb.clips[0].duration - from_json.clips[0].duration).abs() < EPSILON);
    Ok(())
}

#[test]
fn instantiated_clip_animates_scene() -> anyhow::Result<()> {
    let prefab = GltfLoader::load_from_bytes("Bird.glb", &bird_glb())?;
    let mut scene = Scene::new();
    let root = scene.instantiate(&prefab);

    let mut mixer = AnimationMixer::new(root);
    let action = mixer.clip_action(prefab.clips[0].clone(), &scene);
    assert!(mixer.play(action));
    mixer.advance(0.25, &mut scene);
    scene.update();

    let wing = scene.find_node_by_name(root, "wing").expect("wing");
    let local = scene.get_node(wing).expect("wing").transform.position;
    assert!(approx_vec(local, Vec3::new(0.5, 0.0, 0.0)), "got {local}");

    let world: Vec3 = scene.get_node(wing).expect("wing").world_matrix().translation.into();
    assert!(approx_vec(world, Vec3::new(0.5, 1.0, 0.0)), "got {world}");

    let body = scene.find_node_by_name(root, "body").expect("body");
    assert!(scene.get_node(body).expect("body").mesh.is_some());
    assert_eq!(scene.meshes.len(), 1);
    Ok(())
}

// ============================================================================
// Fallbacks
// ============================================================================

#[test]
fn unnamed_nodes_and_missing_scenes() -> anyhow::Result<()> {
    let doc = json!({
        "asset": { "version": "2.0" },
        "nodes": [ { "children": [1] }, {}, { "name": "lone" } ]
    });
    let prefab = GltfLoader::load_from_bytes("plain.gltf", &serde_json::to_vec(&doc)?)?;

    assert_eq!(prefab.nodes[0].name, "Node_0");
    assert_eq!(prefab.nodes[1].name, "Node_1");
    assert_eq!(prefab.roots, vec![0, 2]);
    assert!(!prefab.is_animated());
    Ok(())
}

#[test]
fn unnamed_animation_gets_index_name() -> anyhow::Result<()> {
    let mut doc: Value = serde_json::from_slice(&bird_gltf())?;
    doc["animations"][0]
        .as_object_mut()
        .expect("animation object")
        .remove("name");
    let prefab = GltfLoader::load_from_bytes("Bird.gltf", &serde_json::to_vec(&doc)?)?;

    assert_eq!(prefab.clips[0].name, "Animation_0");
    Ok(())
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn external_buffer_is_rejected() {
    let doc = bird_document(json!({ "byteLength": 76, "uri": "bird.bin" }));
    let bytes = serde_json::to_vec(&doc).expect("serialize fixture");

    let result = GltfLoader::load_from_bytes("Bird.gltf", &bytes);
    match result {
        Err(SkyscrollError::Gltf(msg)) => assert!(msg.contains("bird.bin"), "got {msg}"),
        other => panic!("expected glTF error, got {other:?}"),
    }
}

#[test]
fn short_buffer_is_rejected() {
    let uri = format!(
        "data:application/octet-stream;base64,{}",
        base64::engine::general_purpose::STANDARD.encode([0u8; 4])
    );
    let doc = bird_document(json!({ "byteLength": 76, "uri": uri }));
    let bytes = serde_json::to_vec(&doc).expect("serialize fixture");

    assert!(matches!(
        GltfLoader::load_from_bytes("Bird.gltf", &bytes),
        Err(SkyscrollError::Gltf(_))
    ));
}

#[test]
fn garbage_bytes_are_rejected() {
    assert!(GltfLoader::load_from_bytes("noise.glb", b"definitely not a model").is_err());
}

// ============================================================================
// GltfSource
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn source_loads_from_directory() -> anyhow::Result<()> {
    let dir = std::env::temp_dir().join(format!("skyscroll_assets_{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    std::fs::write(dir.join("Bird.glb"), bird_glb())?;

    let source = GltfSource::from_root(&dir.to_string_lossy())?;
    let runtime = tokio::runtime::Runtime::new()?;
    let loaded = runtime.block_on(source.load("Bird.glb"));
    let missing = runtime.block_on(source.load("Missing.glb"));
    std::fs::remove_dir_all(&dir)?;

    let prefab = loaded?;
    assert_eq!(prefab.name, "Bird.glb");
    assert_eq!(prefab.clips.len(), 1);
    assert!(matches!(missing, Err(SkyscrollError::Io(_))));
    Ok(())
}
