/// Lighting configuration — the cached, immutable draw state for one
/// combination of active lights.
///
/// Built by `LightManager::light_list_state_set()` and shared through `Arc`
/// by every renderable that selected the same combination in a frame.

use glam::Mat4;
use crate::scene::NodeKey;
use super::config::CombinationKeyMode;
use super::light::{GpuLight, Light};

// ===== COMBINATION KEY =====

/// Hash of a candidate light index list, used as the cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CombinationKey(u64);

impl CombinationKey {
    /// Derive the key for a candidate list.
    ///
    /// Indices are folded with the `hash_combine` recurrence
    /// (`seed ^= v + 0x9e3779b9 + (seed << 6) + (seed >> 2)`), so the result
    /// depends on order unless `mode` is `Sorted`.
    pub fn from_indices(indices: &[usize], mode: CombinationKeyMode) -> Self {
        match mode {
            CombinationKeyMode::Ordered => Self(Self::fold(indices.iter().copied())),
            CombinationKeyMode::Sorted => {
                let mut sorted = indices.to_vec();
                sorted.sort_unstable();
                Self(Self::fold(sorted.into_iter()))
            }
        }
    }

    fn fold(indices: impl Iterator<Item = usize>) -> u64 {
        indices.fold(0u64, |seed, index| {
            seed ^ (index as u64)
                .wrapping_add(0x9e37_79b9)
                .wrapping_add(seed << 6)
                .wrapping_add(seed >> 2)
        })
    }

    /// Raw hash value
    pub fn value(&self) -> u64 {
        self.0
    }
}

// ===== LIGHT SLOT =====

/// One resolved light inside a configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LightSlot {
    /// Pipeline light slot (0-based position in the candidate list)
    pub slot: u32,
    /// Index into the manager registry of the frame that built it
    pub registry_index: usize,
    /// Light-emitting node this slot came from
    pub source: NodeKey,
    /// Light parameters, position already in world space
    pub light: Light,
}

// ===== LIGHTING CONFIGURATION =====

/// Immutable set of up to `MAX_LIGHTS` resolved lights.
#[derive(Debug)]
pub struct LightingConfiguration {
    key: CombinationKey,
    slots: Vec<LightSlot>,
}

impl LightingConfiguration {
    pub(crate) fn new(key: CombinationKey, slots: Vec<LightSlot>) -> Self {
        Self { key, slots }
    }

    /// Key this configuration was cached under
    pub fn key(&self) -> CombinationKey {
        self.key
    }

    /// Resolved lights, in slot order
    pub fn slots(&self) -> &[LightSlot] {
        &self.slots
    }

    /// Slot by pipeline index
    pub fn slot(&self, index: usize) -> Option<&LightSlot> {
        self.slots.get(index)
    }

    /// Number of active lights
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no light is active
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Registry indices in slot order
    pub fn registry_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().map(|s| s.registry_index)
    }

    /// Whether this configuration answers the request `indices`.
    ///
    /// Guards against two different lists sharing a hash.
    pub(crate) fn matches(&self, indices: &[usize], mode: CombinationKeyMode) -> bool {
        if indices.len() != self.slots.len() {
            return false;
        }
        match mode {
            CombinationKeyMode::Ordered => self.registry_indices().eq(indices.iter().copied()),
            CombinationKeyMode::Sorted => {
                let mut ours: Vec<usize> = self.registry_indices().collect();
                let mut theirs = indices.to_vec();
                ours.sort_unstable();
                theirs.sort_unstable();
                ours == theirs
            }
        }
    }

    /// Pack every slot for upload, moving positions into the eye space of `view`.
    pub fn to_gpu_lights(&self, view: &Mat4) -> Vec<GpuLight> {
        self.slots
            .iter()
            .map(|s| GpuLight::from_world_light(&s.light, view))
            .collect()
    }
}

#[cfg(test)]
#[path = "lighting_configuration_tests.rs"]
mod tests;
