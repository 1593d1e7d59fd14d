/// Bounding sphere — cheap conservative bound for light/node overlap tests.
///
/// A sphere with a negative radius is *invalid* (empty). Invalid spheres
/// never intersect anything and are ignored when expanding.

use glam::{Mat4, Vec3};

/// Sphere bound (center, radius)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Center of the sphere
    pub center: Vec3,
    /// Radius, negative when the sphere is empty
    pub radius: f32,
}

impl BoundingSphere {
    /// The empty sphere
    pub const INVALID: Self = Self { center: Vec3::ZERO, radius: -1.0 };

    /// Create a sphere from center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether this sphere encloses anything
    pub fn valid(&self) -> bool {
        self.radius >= 0.0
    }

    /// Sphere-sphere overlap, boundary inclusive.
    ///
    /// Two spheres intersect iff the distance between their centers is
    /// at most the sum of their radii.
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        if !self.valid() || !other.valid() {
            return false;
        }
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) <= reach * reach
    }

    /// Transform this sphere by a matrix, returning a new sphere.
    ///
    /// The center is transformed as a point. The radius is scaled by the
    /// longest transformed basis axis, so the result stays conservative
    /// under non-uniform scale.
    pub fn transformed(&self, matrix: &Mat4) -> BoundingSphere {
        if !self.valid() {
            return *self;
        }

        let center = matrix.transform_point3(self.center);
        let scale = matrix.col(0).truncate().length()
            .max(matrix.col(1).truncate().length())
            .max(matrix.col(2).truncate().length());

        BoundingSphere { center, radius: self.radius * scale }
    }

    /// Grow this sphere so it also encloses `other`.
    pub fn expand_by(&mut self, other: &BoundingSphere) {
        if !other.valid() {
            return;
        }
        if !self.valid() {
            *self = *other;
            return;
        }

        let d = self.center.distance(other.center);

        // other already inside self
        if d + other.radius <= self.radius {
            return;
        }
        // other swallows self
        if d + self.radius <= other.radius {
            *self = *other;
            return;
        }

        let new_radius = (self.radius + d + other.radius) * 0.5;
        let ratio = (new_radius - self.radius) / d;
        self.center += (other.center - self.center) * ratio;
        self.radius = new_radius;
    }
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self::INVALID
    }
}

#[cfg(test)]
#[path = "bounding_sphere_tests.rs"]
mod tests;
