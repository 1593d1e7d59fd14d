//! Lighting module
//!
//! Frame-scoped light registry, combination-keyed configuration cache and
//! the cull-time light selection that feeds it.

mod config;
mod light;
mod lighting_configuration;
mod light_manager;
mod light_selector;

pub use config::{LightManagerConfig, CombinationKeyMode, MAX_LIGHTS};
pub use light::{Light, LightSource, GpuLight};
pub use lighting_configuration::{LightingConfiguration, LightSlot, CombinationKey};
pub use light_manager::{LightManager, LightManagerKey, LightSourceTransform, LightFrameStats};
pub use light_selector::{LightSelector, collect_candidates};
