/// Light manager configuration.

use crate::error::Result;
use crate::engine_err;

/// Number of light slots a configuration can address (fixed-function limit).
pub const MAX_LIGHTS: usize = 8;

/// How a candidate index list is turned into a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombinationKeyMode {
    /// Hash indices in scan order. The same set discovered in a different
    /// order builds a second, identical configuration.
    #[default]
    Ordered,
    /// Sort indices before hashing. One configuration per light set; slot
    /// order follows whichever request built it first.
    Sorted,
}

/// Light manager configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LightManagerConfig {
    /// Cap on lights per renderable, 1..=MAX_LIGHTS
    pub max_lights: usize,
    /// Cache key derivation
    pub key_mode: CombinationKeyMode,
    /// Emit a DEBUG entry when a candidate list is truncated
    pub log_truncation: bool,
}

impl Default for LightManagerConfig {
    fn default() -> Self {
        Self {
            max_lights: MAX_LIGHTS,
            key_mode: CombinationKeyMode::Ordered,
            log_truncation: true,
        }
    }
}

impl LightManagerConfig {
    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_lights == 0 || self.max_lights > MAX_LIGHTS {
            return Err(engine_err!(InvalidConfig, "lumen::LightManagerConfig",
                "max_lights must be in 1..={}, got {}", MAX_LIGHTS, self.max_lights));
        }
        Ok(())
    }
}
