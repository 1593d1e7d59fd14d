//! Math utilities — bounding volumes used for light selection.

mod bounding_sphere;

pub use bounding_sphere::BoundingSphere;
