/*!
# Lumen Scene

Per-frame dynamic light selection and lighting-state caching for a scene graph.

Every frame the update traversal collects the lights living under each
[`LightManager`](lighting::LightManager) node. The cull traversal then asks,
for every renderable subtree, which of those lights touch it (bounding-sphere
tests in view space), caps the answer at eight lights, and pushes a shared
[`LightingConfiguration`](lighting::LightingConfiguration) for that
combination onto the render-state stack.

## Architecture

- **BoundingSphere**: sphere bound with matrix transform and intersection test
- **Camera**: passive view/projection container
- **LightManager**: frame-scoped light registry and configuration cache
- **LightSelector**: cull-time light selection attached to renderable parents
- **SceneGraph**: node storage, update traversal, decoration and cull traversal
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod math;
pub mod camera;
pub mod lighting;
pub mod scene;

// Main lumen namespace module
pub mod lumen {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine (logger owner)
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Math sub-module
    pub mod math {
        pub use crate::math::*;
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }

    // Lighting sub-module
    pub mod lighting {
        pub use crate::lighting::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }
}

// Re-export math library at crate root
pub use glam;
