//! Integration tests for per-frame light selection
//!
//! These tests drive whole frames (update, then cull per camera) through the
//! public API and check the lighting handed to drawables.
//!
//! Run with: cargo test --test lighting_integration_tests

use lumen_scene::glam::{Mat4, Vec3, Vec4};
use lumen_scene::lumen::camera::Camera;
use lumen_scene::lumen::lighting::{
    CombinationKeyMode, GpuLight, Light, LightManagerConfig, LightSource, MAX_LIGHTS,
};
use lumen_scene::lumen::log::{LogEntry, LogSeverity, Logger};
use lumen_scene::lumen::math::BoundingSphere;
use lumen_scene::lumen::scene::{NodeKey, SceneGraph};
use lumen_scene::lumen::{Engine, Error};
use serial_test::serial;
use std::sync::{Arc, Mutex};

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn entries_from(entries: &Arc<Mutex<Vec<LogEntry>>>, source: &str) -> Vec<LogEntry> {
    entries
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.source == source)
        .cloned()
        .collect()
}

// ============================================================================
// SCENE HELPERS
// ============================================================================

fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, y, z))
}

/// A street of `lamps` point lights (radius 20) spaced 1 unit apart on X,
/// and a single building mesh at the origin.
fn street(lamps: usize, config: LightManagerConfig) -> (SceneGraph, NodeKey, NodeKey) {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let manager = graph.add_light_manager(root, "street", config).unwrap();

    for i in 0..lamps {
        let post = graph
            .add_transform(manager, &format!("post_{}", i), translation(i as f32, 0.0, 0.0))
            .unwrap();
        let light = Light::point(Vec3::new(0.0, 2.0, 0.0));
        graph.add_light_source(post, &format!("lamp_{}", i), LightSource::new(light, 20.0)).unwrap();
    }

    let building = graph.add_group(manager, "building").unwrap();
    let mesh = graph.add_drawable(building, "facade", BoundingSphere::new(Vec3::ZERO, 1.0)).unwrap();
    (graph, manager, mesh)
}

// ============================================================================
// FRAME TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_frame_caps_lights() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    let (mut graph, manager, mesh) = street(12, LightManagerConfig::default());
    graph.update().unwrap();
    let list = graph.cull(&Camera::default()).unwrap();

    let lighting = list.leaf(mesh).unwrap().lighting.clone().unwrap();
    assert_eq!(lighting.len(), MAX_LIGHTS);
    for (slot, light) in lighting.slots().iter().enumerate() {
        assert_eq!(light.slot as usize, slot);
        assert_eq!(light.light.light_num as usize, slot);
        assert_eq!(light.registry_index, slot);
        assert_eq!(light.light.position, Vec4::new(slot as f32, 2.0, 0.0, 1.0));
    }
    assert_eq!(graph.light_manager(manager).unwrap().frame_stats().truncations, 1);

    let debug = entries_from(&entries, "lumen::LightSelector");
    assert_eq!(debug.len(), 1);
    assert_eq!(debug[0].severity, LogSeverity::Debug);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_decoration_logged_once() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    let (mut graph, _manager, _mesh) = street(2, LightManagerConfig::default());
    for _ in 0..4 {
        graph.update().unwrap();
        graph.cull(&Camera::default()).unwrap();
    }

    let info = entries_from(&entries, "lumen::SceneGraph");
    assert_eq!(info.len(), 1);
    assert_eq!(info[0].severity, LogSeverity::Info);
    assert!(info[0].message.contains("street"));

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_light_outside_manager_logged() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    let mut graph = SceneGraph::new();
    let root = graph.root();
    graph.add_light_source(root, "stray", LightSource::new(Light::default(), 1.0)).unwrap();

    let result = graph.update();

    assert!(matches!(result, Err(Error::LightOutsideManager(_))));
    let errors = entries_from(&entries, "lumen::UpdateVisitor");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].severity, LogSeverity::Error);
    assert!(errors[0].message.contains("stray"));
    assert!(errors[0].file.is_some());
    assert!(errors[0].line.is_some());

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_gpu_upload_per_camera() {
    let (mut graph, _manager, mesh) = street(1, LightManagerConfig::default());
    graph.update().unwrap();

    let front = Camera::new(translation(0.0, 0.0, -5.0), Mat4::IDENTITY);
    let side = Camera::new(translation(-3.0, 0.0, 0.0), Mat4::IDENTITY);

    for camera in [&front, &side] {
        let list = graph.cull(camera).unwrap();
        let lighting = list.leaf(mesh).unwrap().lighting.clone().unwrap();
        let gpu = lighting.to_gpu_lights(camera.view_matrix());

        let expected = *camera.view_matrix() * Vec4::new(0.0, 2.0, 0.0, 1.0);
        assert_eq!(gpu.len(), 1);
        assert_eq!(gpu[0].position, expected.to_array());
        assert_eq!(GpuLight::as_bytes(&gpu).len(), 96);
    }
}

#[test]
#[serial]
fn test_integration_configured_cap() {
    let config = LightManagerConfig { max_lights: 3, log_truncation: false, ..LightManagerConfig::default() };
    let (mut graph, _manager, mesh) = street(6, config);
    graph.update().unwrap();

    let list = graph.cull(&Camera::default()).unwrap();

    assert_eq!(list.leaf(mesh).unwrap().lighting.as_ref().unwrap().len(), 3);
}

#[test]
#[serial]
fn test_integration_sorted_keys_share_configuration() {
    let config = LightManagerConfig { key_mode: CombinationKeyMode::Sorted, ..LightManagerConfig::default() };
    let (mut graph, manager, _mesh) = street(3, config);
    graph.update().unwrap();

    let manager = graph.light_manager_mut(manager).unwrap();
    let forward = manager.light_list_state_set(&[0, 2]).unwrap();
    let backward = manager.light_list_state_set(&[2, 0]).unwrap();

    assert!(Arc::ptr_eq(&forward, &backward));
    assert_eq!(manager.cache_len(), 1);
}

#[test]
#[serial]
fn test_integration_ordered_keys_distinguish_order() {
    let (mut graph, manager, _mesh) = street(3, LightManagerConfig::default());
    graph.update().unwrap();

    let manager = graph.light_manager_mut(manager).unwrap();
    let forward = manager.light_list_state_set(&[0, 2]).unwrap();
    let backward = manager.light_list_state_set(&[2, 0]).unwrap();

    assert!(!Arc::ptr_eq(&forward, &backward));
    assert_eq!(backward.slot(0).unwrap().registry_index, 2);
    assert_eq!(manager.cache_len(), 2);
}

#[test]
#[serial]
fn test_integration_moving_mesh_changes_lighting() {
    let (mut graph, manager, mesh) = street(1, LightManagerConfig::default());
    let building = graph.node(mesh).unwrap().parent().unwrap();
    graph.remove_node(building).unwrap();
    let mover = graph.add_transform(manager, "mover", translation(0.0, 0.0, 0.0)).unwrap();
    let mesh = graph.add_drawable(mover, "cart", BoundingSphere::new(Vec3::ZERO, 1.0)).unwrap();
    graph.attach_light_selector(mover, manager).unwrap();

    graph.update().unwrap();
    assert!(graph.cull(&Camera::default()).unwrap().leaf(mesh).unwrap().lighting.is_some());

    graph.set_matrix(mover, translation(0.0, 0.0, 30.0)).unwrap();
    graph.update().unwrap();
    assert!(graph.cull(&Camera::default()).unwrap().leaf(mesh).unwrap().lighting.is_none());
}
