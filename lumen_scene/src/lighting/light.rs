/// Light parameters, light sources and the packed GPU record.
///
/// `Light` follows the fixed-function lighting model: a homogeneous position
/// (w = 0 for directional lights), three color terms, distance attenuation
/// and an optional spot cone. The lighting core treats every field except
/// `position` and `light_num` as opaque and copies it verbatim.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

/// Photometric parameters of one light
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Light slot this light binds to (0..MAX_LIGHTS)
    pub light_num: u32,
    /// Homogeneous position in light-local space (w = 0: directional)
    pub position: Vec4,
    /// Ambient color
    pub ambient: Vec4,
    /// Diffuse color
    pub diffuse: Vec4,
    /// Specular color
    pub specular: Vec4,
    /// Spot direction
    pub direction: Vec3,
    /// Constant attenuation term
    pub constant_attenuation: f32,
    /// Linear attenuation term
    pub linear_attenuation: f32,
    /// Quadratic attenuation term
    pub quadratic_attenuation: f32,
    /// Spot falloff exponent
    pub spot_exponent: f32,
    /// Spot cone half-angle in degrees, 180 disables the cone
    pub spot_cutoff: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            light_num: 0,
            position: Vec4::new(0.0, 0.0, 1.0, 0.0),
            ambient: Vec4::new(0.05, 0.05, 0.05, 1.0),
            diffuse: Vec4::new(0.8, 0.8, 0.8, 1.0),
            specular: Vec4::new(0.05, 0.05, 0.05, 1.0),
            direction: Vec3::new(0.0, 0.0, -1.0),
            constant_attenuation: 1.0,
            linear_attenuation: 0.0,
            quadratic_attenuation: 0.0,
            spot_exponent: 0.0,
            spot_cutoff: 180.0,
        }
    }
}

impl Light {
    /// Positional light at `position` (light-local space)
    pub fn point(position: Vec3) -> Self {
        Self {
            position: position.extend(1.0),
            ..Self::default()
        }
    }

    /// Directional light shining along `direction`
    pub fn directional(direction: Vec3) -> Self {
        Self {
            position: (-direction).extend(0.0),
            ..Self::default()
        }
    }

    /// Set the diffuse color
    pub fn with_diffuse(mut self, diffuse: Vec4) -> Self {
        self.diffuse = diffuse;
        self
    }

    /// Set the three attenuation terms
    pub fn with_attenuation(mut self, constant: f32, linear: f32, quadratic: f32) -> Self {
        self.constant_attenuation = constant;
        self.linear_attenuation = linear;
        self.quadratic_attenuation = quadratic;
        self
    }

    /// Turn this light into a spot light
    pub fn with_spot(mut self, direction: Vec3, cutoff_degrees: f32, exponent: f32) -> Self {
        self.direction = direction;
        self.spot_cutoff = cutoff_degrees;
        self.spot_exponent = exponent;
        self
    }

    /// Whether the position is a point (w != 0) rather than a direction
    pub fn is_positional(&self) -> bool {
        self.position.w != 0.0
    }

    /// Whether the spot cone is enabled
    pub fn is_spot(&self) -> bool {
        self.spot_cutoff < 180.0
    }
}

/// A light-emitting scene node payload: the light plus its reach.
///
/// `radius` bounds the region the light affects; the light manager tests a
/// sphere of this radius centered on the node origin against renderables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LightSource {
    light: Light,
    radius: f32,
}

impl LightSource {
    /// Create a light source
    pub fn new(light: Light, radius: f32) -> Self {
        Self { light, radius }
    }

    /// Light parameters
    pub fn light(&self) -> &Light {
        &self.light
    }

    /// Mutable light parameters
    pub fn light_mut(&mut self) -> &mut Light {
        &mut self.light
    }

    /// Effective radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Set the effective radius
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }
}

/// One light packed for a uniform/storage buffer (std140 compatible, 96 bytes).
///
/// Positions and spot directions are in eye space.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuLight {
    /// Eye-space homogeneous position
    pub position: [f32; 4],
    /// Ambient color
    pub ambient: [f32; 4],
    /// Diffuse color
    pub diffuse: [f32; 4],
    /// Specular color
    pub specular: [f32; 4],
    /// Eye-space spot direction
    pub spot_direction: [f32; 3],
    /// Spot falloff exponent
    pub spot_exponent: f32,
    /// Constant, linear, quadratic attenuation
    pub attenuation: [f32; 3],
    /// Cosine of the spot cutoff angle (-1 when not a spot)
    pub spot_cos_cutoff: f32,
}

impl GpuLight {
    /// Pack a light whose position is already in world space, moving it
    /// into the eye space of `view`.
    pub fn from_world_light(light: &Light, view: &Mat4) -> Self {
        let position = *view * light.position;
        let spot_direction = view.transform_vector3(light.direction);
        Self {
            position: position.to_array(),
            ambient: light.ambient.to_array(),
            diffuse: light.diffuse.to_array(),
            specular: light.specular.to_array(),
            spot_direction: spot_direction.to_array(),
            spot_exponent: light.spot_exponent,
            attenuation: [
                light.constant_attenuation,
                light.linear_attenuation,
                light.quadratic_attenuation,
            ],
            spot_cos_cutoff: light.spot_cutoff.to_radians().cos(),
        }
    }

    /// Raw bytes of a packed light array, ready for a buffer upload
    pub fn as_bytes(lights: &[GpuLight]) -> &[u8] {
        bytemuck::cast_slice(lights)
    }
}

#[cfg(test)]
#[path = "light_tests.rs"]
mod tests;
