//! Scene Graph Tests
//!
//! Tests for:
//! - Node creation, attach and subtree removal
//! - Camera and light components
//! - Name lookup within a subtree
//! - Prefab instantiation
//! - Mesh components, visibility and primitive checks
//! - World matrix propagation and camera view refresh
//! - Transform euler / look rotation helpers

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::{Quat, Vec3, Vec4};

use skyscroll::assets::{ModelPrefab, PrefabNode};
use skyscroll::scene::light::color_from_hex;
use skyscroll::scene::{Camera, Light, LightKind, Mesh, Primitive, Scene, Transform};

const EPSILON: f32 = 1e-4;

fn approx_vec(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn add_node_goes_to_root_list() {
    let mut scene = Scene::new();
    let a = scene.create_node_with_name("a");
    let b = scene.create_node_with_name("b");

    assert_eq!(scene.node_count(), 2);
    assert_eq!(scene.root_nodes, vec![a, b]);
}

#[test]
fn attach_moves_node_out_of_root_list() {
    let mut scene = Scene::new();
    let parent = scene.create_node_with_name("parent");
    let child = scene.create_node_with_name("child");

    scene.attach(child, parent);

    assert_eq!(scene.root_nodes, vec![parent]);
    assert_eq!(scene.get_node(child).and_then(|n| n.parent()), Some(parent));
    assert_eq!(scene.get_node(parent).map(|n| n.children().to_vec()), Some(vec![child]));
}

#[test]
fn attach_reparents_between_parents() {
    let mut scene = Scene::new();
    let p1 = scene.create_node_with_name("p1");
    let p2 = scene.create_node_with_name("p2");
    let child = scene.create_node_with_name("child");

    scene.attach(child, p1);
    scene.attach(child, p2);

    assert!(scene.get_node(p1).is_some_and(|n| n.children().is_empty()));
    assert_eq!(scene.get_node(child).and_then(|n| n.parent()), Some(p2));
}

#[test]
fn attach_to_self_is_ignored() {
    let mut scene = Scene::new();
    let a = scene.create_node_with_name("a");

    scene.attach(a, a);

    assert_eq!(scene.get_node(a).and_then(|n| n.parent()), None);
    assert_eq!(scene.root_nodes, vec![a]);
}

#[test]
fn remove_node_removes_subtree() {
    let mut scene = Scene::new();
    let root = scene.create_node_with_name("root");
    let mid = scene.create_node_with_name("mid");
    let leaf = scene.create_node_with_name("leaf");
    let other = scene.create_node_with_name("other");
    scene.attach(mid, root);
    scene.attach(leaf, mid);

    scene.remove_node(root);

    assert_eq!(scene.node_count(), 1);
    assert!(scene.get_node(leaf).is_none());
    assert_eq!(scene.root_nodes, vec![other]);
}

#[test]
fn remove_camera_node_clears_components() {
    let mut scene = Scene::new();
    let cam = scene.add_camera(Camera::new_perspective(60.0, 1.0, 0.1, 100.0));
    scene.active_camera = Some(cam);
    let light = scene.add_light(Light::new_directional(Vec3::ONE, 1.0));

    scene.remove_node(cam);
    scene.remove_node(light);

    assert!(scene.cameras.is_empty());
    assert!(scene.lights.is_empty());
    assert!(scene.active_camera.is_none());
    assert!(scene.main_camera().is_none());
}

#[test]
fn find_node_by_name_stays_in_subtree() {
    let mut scene = Scene::new();
    let model_a = scene.create_node_with_name("model_a");
    let wing_a = scene.create_node_with_name("wing");
    scene.attach(wing_a, model_a);

    let model_b = scene.create_node_with_name("model_b");
    let wing_b = scene.create_node_with_name("wing");
    scene.attach(wing_b, model_b);

    assert_eq!(scene.find_node_by_name(model_a, "wing"), Some(wing_a));
    assert_eq!(scene.find_node_by_name(model_b, "wing"), Some(wing_b));
    assert_eq!(scene.find_node_by_name(model_b, "missing"), None);
}

// ============================================================================
// Components
// ============================================================================

#[test]
fn camera_perspective_stores_radians() {
    let camera = Camera::new_perspective(90.0, 2.0, 0.5, 400.0);
    assert!((camera.fov - FRAC_PI_2).abs() < EPSILON);
    assert!((camera.aspect - 2.0).abs() < EPSILON);
}

#[test]
fn camera_set_aspect_ignores_invalid() {
    let mut camera = Camera::new_perspective(75.0, 1.5, 0.5, 400.0);
    let projection = camera.projection_matrix();

    camera.set_aspect(0.0);
    camera.set_aspect(f32::NAN);
    assert_eq!(camera.projection_matrix(), projection);

    camera.set_aspect(3.0);
    assert_ne!(camera.projection_matrix(), projection);
}

#[test]
fn light_kinds_and_hex_colors() {
    let sky = color_from_hex(0xddeeff);
    let ground = color_from_hex(0x202020);
    let light = Light::new_hemisphere(sky, ground, 10.0);

    assert!(approx_vec(light.color, Vec3::new(221.0, 238.0, 255.0) / 255.0));
    match light.kind {
        LightKind::Hemisphere(h) => assert!(approx_vec(h.ground_color, Vec3::splat(32.0 / 255.0))),
        LightKind::Directional(_) => panic!("expected hemisphere light"),
    }

    assert!(approx_vec(color_from_hex(0xffffff), Vec3::ONE));
    assert!(approx_vec(color_from_hex(0x000000), Vec3::ZERO));
}

// ============================================================================
// Prefab instantiation
// ============================================================================

fn bird_prefab() -> ModelPrefab {
    let mut body = PrefabNode::new("body");
    body.translation = Vec3::new(0.0, 1.0, 0.0);
    body.children = vec![1];
    let mut wing = PrefabNode::new("wing");
    wing.translation = Vec3::new(2.0, 0.0, 0.0);

    let mut prefab = ModelPrefab::new("bird");
    prefab.nodes = vec![body, wing];
    prefab.roots = vec![0];
    prefab
}

#[test]
fn instantiate_builds_hierarchy_under_named_root() {
    let mut scene = Scene::new();
    let root = scene.instantiate(&bird_prefab());

    assert_eq!(scene.node_count(), 3);
    assert_eq!(scene.root_nodes, vec![root]);
    assert_eq!(scene.get_node(root).map(|n| n.name.as_ref()), Some("bird"));

    let body = scene.find_node_by_name(root, "body").expect("body");
    let wing = scene.find_node_by_name(root, "wing").expect("wing");
    assert_eq!(scene.get_node(wing).and_then(|n| n.parent()), Some(body));
    assert_eq!(scene.get_node(body).and_then(|n| n.parent()), Some(root));
}

#[test]
fn instantiate_twice_gives_independent_copies() {
    let mut scene = Scene::new();
    let prefab = bird_prefab();
    let a = scene.instantiate(&prefab);
    let b = scene.instantiate(&prefab);

    assert_ne!(a, b);
    assert_eq!(scene.node_count(), 6);
    assert_ne!(scene.find_node_by_name(a, "wing"), scene.find_node_by_name(b, "wing"));
}

#[test]
fn instantiated_world_matrices_compose() {
    let mut scene = Scene::new();
    let root = scene.instantiate(&bird_prefab());
    if let Some(node) = scene.get_node_mut(root) {
        node.transform.position = Vec3::new(10.0, 0.0, 0.0);
    }

    scene.update();

    let wing = scene.find_node_by_name(root, "wing").expect("wing");
    let world = scene.get_node(wing).expect("wing").world_matrix().translation;
    assert!(approx_vec(world.into(), Vec3::new(12.0, 1.0, 0.0)), "got {world:?}");
}

// ============================================================================
// Meshes
// ============================================================================

fn triangle() -> Primitive {
    Primitive::new(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], None)
}

fn meshed_prefab() -> (ModelPrefab, Arc<Mesh>) {
    let mesh = Arc::new(Mesh::new("body_mesh", vec![triangle()]));
    let mut prefab = bird_prefab();
    prefab.nodes[0].mesh = Some(Arc::clone(&mesh));
    (prefab, mesh)
}

#[test]
fn instances_share_prefab_mesh() {
    let mut scene = Scene::new();
    let (prefab, mesh) = meshed_prefab();
    let a = scene.instantiate(&prefab);
    let b = scene.instantiate(&prefab);

    assert_eq!(scene.meshes.len(), 2);
    for root in [a, b] {
        let body = scene.find_node_by_name(root, "body").expect("body");
        let key = scene.get_node(body).and_then(|n| n.mesh).expect("mesh key");
        assert!(Arc::ptr_eq(&scene.meshes[key], &mesh));
    }
}

#[test]
fn remove_node_drops_subtree_meshes() {
    let mut scene = Scene::new();
    let (prefab, _) = meshed_prefab();
    let a = scene.instantiate(&prefab);
    scene.instantiate(&prefab);

    scene.remove_node(a);
    assert_eq!(scene.meshes.len(), 1);
}

#[test]
fn set_mesh_replaces_previous() {
    let mut scene = Scene::new();
    let node = scene.create_node_with_name("n");
    scene.set_mesh(node, Arc::new(Mesh::new("first", vec![triangle()])));
    scene.set_mesh(node, Arc::new(Mesh::new("second", vec![triangle()])));

    assert_eq!(scene.meshes.len(), 1);
    let key = scene.get_node(node).and_then(|n| n.mesh).expect("mesh key");
    assert_eq!(scene.meshes[key].name, "second");
}

#[test]
fn hidden_node_hides_its_subtree_meshes() {
    let mut scene = Scene::new();
    let (mut prefab, _) = meshed_prefab();
    prefab.nodes[1].mesh = Some(Arc::new(Mesh::new("wing_mesh", vec![triangle()])));
    let root = scene.instantiate(&prefab);
    scene.update();

    let mut seen = Vec::new();
    scene.for_each_visible_mesh(|mesh, _| seen.push(mesh.name.clone()));
    assert_eq!(seen, vec!["body_mesh", "wing_mesh"]);

    let body = scene.find_node_by_name(root, "body").expect("body");
    if let Some(node) = scene.get_node_mut(body) {
        node.visible = false;
    }
    let mut count = 0;
    scene.for_each_visible_mesh(|_, _| count += 1);
    assert_eq!(count, 0);
}

#[test]
fn mesh_ids_are_unique() {
    let a = Mesh::new("a", vec![]);
    let b = Mesh::new("a", vec![]);
    assert_ne!(a.id(), b.id());
}

#[test]
fn primitive_without_indices_is_a_triangle_list() {
    let primitive = triangle();
    assert_eq!(primitive.indices, vec![0, 1, 2]);
    assert_eq!(primitive.triangle_count(), 1);
    assert!(primitive.is_well_formed());
    assert_eq!(primitive.base_color, Vec4::ONE);
}

#[test]
fn primitive_well_formed_checks_buffers() {
    let mut out_of_range = triangle();
    out_of_range.indices = vec![0, 1, 3];
    assert!(!out_of_range.is_well_formed());

    let mut partial = triangle();
    partial.indices = vec![0, 1];
    assert!(!partial.is_well_formed());

    let mut short_normals = triangle();
    short_normals.normals = vec![[0.0, 0.0, 1.0]];
    assert!(!short_normals.is_well_formed());

    assert!(!Primitive::new(Vec::new(), None).is_well_formed());
}

#[test]
fn ensure_normals_averages_faces() {
    // Two triangles folded along the shared X axis edge
    let mut primitive = Primitive::new(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]],
        Some(vec![0, 1, 2, 0, 1, 3]),
    );
    primitive.ensure_normals();

    let normal = |i: usize| Vec3::from_array(primitive.normals[i]);
    assert!(approx_vec(normal(2), Vec3::Z));
    assert!(approx_vec(normal(3), Vec3::Y));
    assert!(approx_vec(normal(0), Vec3::new(0.0, 1.0, 1.0).normalize()));

    // Existing normals are kept
    let mut explicit = triangle();
    explicit.normals = vec![[1.0, 0.0, 0.0]; 3];
    explicit.ensure_normals();
    assert_eq!(explicit.normals, vec![[1.0, 0.0, 0.0]; 3]);
}

// ============================================================================
// Transform propagation
// ============================================================================

#[test]
fn parent_scale_and_rotation_propagate() {
    let mut scene = Scene::new();
    let parent = scene.create_node_with_name("parent");
    let child = scene.create_node_with_name("child");
    scene.attach(child, parent);

    if let Some(node) = scene.get_node_mut(parent) {
        node.transform.scale = Vec3::splat(2.0);
        node.transform.rotation = Quat::from_rotation_y(FRAC_PI_2);
    }
    if let Some(node) = scene.get_node_mut(child) {
        node.transform.position = Vec3::X;
    }

    scene.update();

    let world = scene.get_node(child).expect("child").world_matrix().translation;
    assert!(approx_vec(world.into(), Vec3::new(0.0, 0.0, -2.0)), "got {world:?}");
}

#[test]
fn parent_change_reaches_unchanged_child() {
    let mut scene = Scene::new();
    let parent = scene.create_node_with_name("parent");
    let child = scene.create_node_with_name("child");
    scene.attach(child, parent);
    scene.update();

    if let Some(node) = scene.get_node_mut(parent) {
        node.transform.position = Vec3::new(0.0, 5.0, 0.0);
    }
    scene.update();

    let world = scene.get_node(child).expect("child").world_matrix().translation;
    assert!(approx_vec(world.into(), Vec3::new(0.0, 5.0, 0.0)));
}

#[test]
fn camera_view_follows_node() {
    let mut scene = Scene::new();
    let cam = scene.add_camera(Camera::new_perspective(60.0, 1.0, 0.1, 100.0));
    scene.active_camera = Some(cam);
    if let Some(node) = scene.get_node_mut(cam) {
        node.transform.position = Vec3::new(0.0, 0.0, 5.0);
    }

    scene.update();

    let view = scene.main_camera().expect("camera").view_matrix();
    let origin_in_view = view.transform_point3(Vec3::ZERO);
    assert!(approx_vec(origin_in_view, Vec3::new(0.0, 0.0, -5.0)), "got {origin_in_view}");
}

#[test]
fn query_main_camera_bundle_requires_active_camera() {
    let mut scene = Scene::new();
    scene.add_camera(Camera::new_perspective(60.0, 1.0, 0.1, 100.0));
    assert!(scene.query_main_camera_bundle().is_none());
}

// ============================================================================
// Transform helpers
// ============================================================================

#[test]
fn euler_roundtrip() {
    let mut transform = Transform::new();
    transform.set_rotation_euler(0.3, -0.7, 0.1);

    let euler = transform.rotation_euler();
    assert!(approx_vec(euler, Vec3::new(0.3, -0.7, 0.1)), "got {euler}");
}

#[test]
fn rotate_y_accumulates() {
    let mut transform = Transform::new();
    transform.rotate_y(0.5);
    transform.rotate_y(0.5);

    let expected = Quat::from_rotation_y(1.0);
    assert!(transform.rotation.angle_between(expected) < EPSILON);
}

#[test]
fn look_rotation_points_negative_z_at_target() {
    let eye = Vec3::new(1.0, 2.0, 3.0);
    let target = Vec3::new(-4.0, 0.0, 1.0);

    let rotation = Transform::look_rotation(eye, target, Vec3::Y).expect("valid direction");
    let forward = rotation * Vec3::NEG_Z;
    assert!(approx_vec(forward, (target - eye).normalize()), "got {forward}");
}

#[test]
fn look_rotation_degenerate_cases() {
    assert!(Transform::look_rotation(Vec3::ONE, Vec3::ONE, Vec3::Y).is_none());
    assert!(Transform::look_rotation(Vec3::ZERO, Vec3::Y * 3.0, Vec3::Y).is_none());

    let mut transform = Transform::new();
    transform.rotation = Quat::from_rotation_x(0.2);
    transform.look_at(Vec3::ZERO, Vec3::Y);
    assert!(transform.rotation.angle_between(Quat::from_rotation_x(0.2)) < EPSILON);
}
