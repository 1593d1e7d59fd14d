/// Light manager — frame-scoped light registry and configuration cache.
///
/// A LightManager lives behind a `NodeKind::LightManager` node for the whole
/// application, but everything it stores is rebuilt every frame:
/// - the update traversal calls `update()` then `add_light()` for every
///   light source below the manager node
/// - the first light selector culled for a camera calls
///   `prepare_for_camera()` to move light bounds into view space
/// - selectors request configurations through `light_list_state_set()`
///
/// Lights are never deregistered. A light node that stops being traversed
/// simply stops appearing in the next frame's registry.

use std::sync::Arc;
use glam::{Mat4, Vec3};
use rustc_hash::FxHashMap;
use slotmap::new_key_type;
use crate::camera::Camera;
use crate::error::Result;
use crate::math::BoundingSphere;
use crate::scene::NodeKey;
use crate::{engine_err, engine_trace, engine_warn};
use super::config::LightManagerConfig;
use super::light::LightSource;
use super::lighting_configuration::{CombinationKey, LightSlot, LightingConfiguration};

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable handle of a LightManager owned by a SceneGraph.
    pub struct LightManagerKey;
}

// ===== REGISTRY ENTRY =====

/// One light registered for the current frame.
#[derive(Debug, Clone)]
pub struct LightSourceTransform {
    light_source: NodeKey,
    source: LightSource,
    world_matrix: Mat4,
    view_bound: BoundingSphere,
}

impl LightSourceTransform {
    /// Node that emitted this light (non-owning)
    pub fn light_source(&self) -> NodeKey {
        self.light_source
    }

    /// Light parameters and radius as traversed this frame
    pub fn source(&self) -> &LightSource {
        &self.source
    }

    /// Accumulated world transform at registration
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world_matrix
    }

    /// Light reach in view space. Invalid until `prepare_for_camera()` ran.
    pub fn view_bound(&self) -> &BoundingSphere {
        &self.view_bound
    }
}

// ===== FRAME STATISTICS =====

/// Counters reset by every `update()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightFrameStats {
    /// Entries added to the registry
    pub lights_registered: usize,
    /// View-space preparations performed (one per distinct camera view)
    pub camera_preparations: usize,
    /// Configuration requests answered from the cache
    pub cache_hits: usize,
    /// Configuration requests that had to build
    pub cache_misses: usize,
    /// Candidate lists cut down to the light cap
    pub truncations: usize,
}

// ===== LIGHT MANAGER =====

/// Frame-scoped light registry and configuration cache.
pub struct LightManager {
    config: LightManagerConfig,
    /// Lights registered this frame, in traversal order
    lights: Vec<LightSourceTransform>,
    /// Configurations built this frame
    state_set_cache: FxHashMap<CombinationKey, Arc<LightingConfiguration>>,
    /// View matrix the current view bounds were computed for
    prepared_view: Option<Mat4>,
    /// Sticky: selectors have been attached below the manager node
    decorated: bool,
    frame_number: u64,
    stats: LightFrameStats,
}

impl LightManager {
    /// Create a manager with the default configuration
    pub fn new() -> Self {
        Self {
            config: LightManagerConfig::default(),
            lights: Vec::new(),
            state_set_cache: FxHashMap::default(),
            prepared_view: None,
            decorated: false,
            frame_number: 0,
            stats: LightFrameStats::default(),
        }
    }

    /// Create a manager with a validated configuration
    pub fn with_config(config: LightManagerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Active configuration
    pub fn config(&self) -> &LightManagerConfig {
        &self.config
    }

    /// Start a new frame: drop the registry, the cache and the view-space latch.
    ///
    /// Returns `true` while the scene decoration pass has not run yet; the
    /// owning scene graph reacts by decorating the manager's subtree.
    pub fn update(&mut self) -> bool {
        self.lights.clear();
        self.state_set_cache.clear();
        self.prepared_view = None;
        self.stats = LightFrameStats::default();
        self.frame_number += 1;

        engine_trace!("lumen::LightManager", "Frame {} reset", self.frame_number);

        !self.decorated
    }

    /// Whether the scene decoration pass has run
    pub fn is_decorated(&self) -> bool {
        self.decorated
    }

    pub(crate) fn mark_decorated(&mut self) {
        self.decorated = true;
    }

    /// Number of `update()` calls so far
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Register a light for the current frame. No deduplication.
    pub fn add_light(&mut self, light_source: NodeKey, source: &LightSource, world_matrix: Mat4) {
        self.lights.push(LightSourceTransform {
            light_source,
            source: source.clone(),
            world_matrix,
            view_bound: BoundingSphere::INVALID,
        });
        self.stats.lights_registered += 1;
    }

    /// Compute every registered light's view-space bound for `camera`.
    ///
    /// The bound is a sphere of the light's radius at its node origin, moved
    /// through `view * world`. Repeated calls with the same view matrix are
    /// no-ops until the next `update()`; a different view recomputes.
    pub fn prepare_for_camera(&mut self, camera: &Camera) {
        let view = *camera.view_matrix();
        if self.prepared_view == Some(view) {
            return;
        }

        for l in &mut self.lights {
            let world_view = view * l.world_matrix;
            l.view_bound = BoundingSphere::new(Vec3::ZERO, l.source.radius())
                .transformed(&world_view);
        }

        self.prepared_view = Some(view);
        self.stats.camera_preparations += 1;
    }

    /// Whether view bounds are current for `camera`
    pub fn is_prepared_for(&self, camera: &Camera) -> bool {
        self.prepared_view == Some(*camera.view_matrix())
    }

    /// Lights registered this frame, in traversal order
    pub fn lights(&self) -> &[LightSourceTransform] {
        &self.lights
    }

    /// Number of configurations cached this frame
    pub fn cache_len(&self) -> usize {
        self.state_set_cache.len()
    }

    /// Counters for the current frame
    pub fn frame_stats(&self) -> LightFrameStats {
        self.stats
    }

    pub(crate) fn record_truncation(&mut self) {
        self.stats.truncations += 1;
    }

    /// Configuration for the candidate list `light_list`, built on first request.
    ///
    /// `light_list` holds registry indices in slot order. Every request with
    /// the same key in the same frame returns the same `Arc`.
    ///
    /// # Errors
    ///
    /// - `InvalidNode` if an index is outside the registry
    /// - `SceneError` if the list is longer than the light cap
    pub fn light_list_state_set(&mut self, light_list: &[usize]) -> Result<Arc<LightingConfiguration>> {
        if light_list.len() > self.config.max_lights {
            return Err(engine_err!("lumen::LightManager",
                "{} lights requested, cap is {}", light_list.len(), self.config.max_lights));
        }
        if let Some(&bad) = light_list.iter().find(|&&i| i >= self.lights.len()) {
            return Err(engine_err!(InvalidNode, "lumen::LightManager",
                "Light index {} out of range ({} registered)", bad, self.lights.len()));
        }

        let key = CombinationKey::from_indices(light_list, self.config.key_mode);

        if let Some(found) = self.state_set_cache.get(&key) {
            if found.matches(light_list, self.config.key_mode) {
                self.stats.cache_hits += 1;
                return Ok(Arc::clone(found));
            }
            engine_warn!("lumen::LightManager",
                "Combination key {:#x} collides for {:?}, building uncached", key.value(), light_list);
            self.stats.cache_misses += 1;
            return Ok(Arc::new(self.build_configuration(key, light_list)));
        }

        self.stats.cache_misses += 1;
        let configuration = Arc::new(self.build_configuration(key, light_list));
        self.state_set_cache.insert(key, Arc::clone(&configuration));
        Ok(configuration)
    }

    /// Resolve each candidate: copy its parameters, move its position into
    /// world space, number it by list position.
    fn build_configuration(&self, key: CombinationKey, light_list: &[usize]) -> LightingConfiguration {
        let slots = light_list
            .iter()
            .enumerate()
            .map(|(slot, &index)| {
                let entry = &self.lights[index];
                let mut light = entry.source.light().clone();
                light.position = entry.world_matrix * light.position;
                light.light_num = slot as u32;
                LightSlot {
                    slot: slot as u32,
                    registry_index: index,
                    source: entry.light_source,
                    light,
                }
            })
            .collect();

        LightingConfiguration::new(key, slots)
    }
}

impl Default for LightManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "light_manager_tests.rs"]
mod tests;
