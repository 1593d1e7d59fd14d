//! Error types for the Lumen scene lighting engine
//!
//! This module defines the error types used throughout the crate,
//! including scene construction, light collection and configuration.

use std::fmt;

/// Result type for Lumen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Lumen errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A light source was collected with no enclosing LightManager.
    ///
    /// This is a scene construction defect, the frame is abandoned.
    LightOutsideManager(String),

    /// Invalid node, manager handle or registry index
    InvalidNode(String),

    /// Invalid configuration value
    InvalidConfig(String),

    /// Generic scene graph error
    SceneError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::LightOutsideManager(msg) => write!(f, "Light outside manager: {}", msg),
            Error::InvalidNode(msg) => write!(f, "Invalid node: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            Error::SceneError(msg) => write!(f, "Scene error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an error with file:line and build the matching `Error` variant.
///
/// The first form produces `Error::SceneError`. The second form names the
/// variant explicitly.
///
/// # Example
///
/// ```ignore
/// return Err(engine_err!("lumen::SceneGraph", "Node {:?} not found", key));
/// return Err(engine_err!(InvalidConfig, "lumen::LightManager", "max_lights is 0"));
/// ```
#[macro_export]
macro_rules! engine_err {
    ($variant:ident, $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::lumen::Error::$variant(message)
    }};
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::lumen::Error::SceneError(message)
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
