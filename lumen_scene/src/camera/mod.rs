//! Camera module — low-level passive camera.
//!
//! The crate does NOT store or manage cameras. They are owned and driven by
//! the caller and handed to each cull traversal.

mod camera;

pub use camera::Camera;
