/// Light selector — the cull-time callback attached to renderable parents.
///
/// The scene decoration pass attaches one selector per parent of drawable
/// content. When the cull traversal reaches that node it asks the selector
/// which lights touch the node; the traversal then pushes the returned
/// configuration around the node's children.

use std::sync::Arc;
use glam::Mat4;
use crate::camera::Camera;
use crate::error::Result;
use crate::math::BoundingSphere;
use crate::engine_debug;
use super::light_manager::{LightManager, LightManagerKey, LightSourceTransform};
use super::lighting_configuration::LightingConfiguration;

/// Registry indices of every light whose view bound touches `view_bound`,
/// in registry order.
pub fn collect_candidates(lights: &[LightSourceTransform], view_bound: &BoundingSphere) -> Vec<usize> {
    lights
        .iter()
        .enumerate()
        .filter(|(_, l)| l.view_bound().intersects(view_bound))
        .map(|(i, _)| i)
        .collect()
}

/// Cull-time light selection bound to one light manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightSelector {
    manager: LightManagerKey,
}

impl LightSelector {
    /// Create a selector feeding from `manager`
    pub fn new(manager: LightManagerKey) -> Self {
        Self { manager }
    }

    /// Manager this selector queries
    pub fn manager(&self) -> LightManagerKey {
        self.manager
    }

    /// Pick the lights for one node.
    ///
    /// `node_bound` is the node's bound in its own space and `model_view`
    /// the matrix taking that space to the camera's view space.
    ///
    /// Returns `None` when the node should be traversed unchanged (no light
    /// registered, or none touching the node). Lists longer than the cap
    /// are cut to their first `max_lights` entries; there is no ranking.
    pub fn select(
        &self,
        manager: &mut LightManager,
        camera: &Camera,
        node_bound: &BoundingSphere,
        model_view: &Mat4,
    ) -> Result<Option<Arc<LightingConfiguration>>> {
        manager.prepare_for_camera(camera);

        if manager.lights().is_empty() {
            return Ok(None);
        }

        let view_bound = node_bound.transformed(model_view);
        let mut candidates = collect_candidates(manager.lights(), &view_bound);

        if candidates.is_empty() {
            return Ok(None);
        }

        let cap = manager.config().max_lights;
        if candidates.len() > cap {
            if manager.config().log_truncation {
                engine_debug!("lumen::LightSelector",
                    "{} lights touch the node, keeping the first {}", candidates.len(), cap);
            }
            // TODO: rank by intensity and distance instead of discovery order
            candidates.truncate(cap);
            manager.record_truncation();
        }

        manager.light_list_state_set(&candidates).map(Some)
    }
}

#[cfg(test)]
#[path = "light_selector_tests.rs"]
mod tests;
