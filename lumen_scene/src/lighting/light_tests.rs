use glam::{Mat4, Vec3, Vec4};
use super::*;

// ============================================================================
// Light
// ============================================================================

#[test]
fn test_light_defaults() {
    let light = Light::default();
    assert_eq!(light.position, Vec4::new(0.0, 0.0, 1.0, 0.0));
    assert_eq!(light.constant_attenuation, 1.0);
    assert_eq!(light.spot_cutoff, 180.0);
    assert!(!light.is_positional());
    assert!(!light.is_spot());
}

#[test]
fn test_point_light_is_positional() {
    let light = Light::point(Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(light.position, Vec4::new(1.0, 2.0, 3.0, 1.0));
    assert!(light.is_positional());
}

#[test]
fn test_directional_light_points_against_direction() {
    let light = Light::directional(Vec3::new(0.0, -1.0, 0.0));
    assert_eq!(light.position, Vec4::new(0.0, 1.0, 0.0, 0.0));
    assert!(!light.is_positional());
}

#[test]
fn test_builders() {
    let light = Light::point(Vec3::ZERO)
        .with_diffuse(Vec4::new(1.0, 0.0, 0.0, 1.0))
        .with_attenuation(0.5, 0.1, 0.01)
        .with_spot(Vec3::X, 30.0, 2.0);

    assert_eq!(light.diffuse, Vec4::new(1.0, 0.0, 0.0, 1.0));
    assert_eq!(light.linear_attenuation, 0.1);
    assert_eq!(light.quadratic_attenuation, 0.01);
    assert!(light.is_spot());
    assert_eq!(light.direction, Vec3::X);
}

// ============================================================================
// LightSource
// ============================================================================

#[test]
fn test_light_source_default_radius_is_zero() {
    let source = LightSource::default();
    assert_eq!(source.radius(), 0.0);
}

#[test]
fn test_light_source_set_radius() {
    let mut source = LightSource::new(Light::point(Vec3::ZERO), 4.0);
    assert_eq!(source.radius(), 4.0);
    source.set_radius(10.0);
    assert_eq!(source.radius(), 10.0);
    source.light_mut().light_num = 3;
    assert_eq!(source.light().light_num, 3);
}

// ============================================================================
// GpuLight
// ============================================================================

#[test]
fn test_gpu_light_size() {
    assert_eq!(std::mem::size_of::<GpuLight>(), 96);
}

#[test]
fn test_gpu_light_moves_position_to_eye_space() {
    let light = Light::point(Vec3::new(0.0, 0.0, -5.0));
    let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -10.0));

    let gpu = GpuLight::from_world_light(&light, &view);

    assert_eq!(gpu.position, [0.0, 0.0, -15.0, 1.0]);
}

#[test]
fn test_gpu_light_directional_ignores_translation() {
    let light = Light::directional(Vec3::new(0.0, -1.0, 0.0));
    let view = Mat4::from_translation(Vec3::new(5.0, 5.0, 5.0));

    let gpu = GpuLight::from_world_light(&light, &view);

    assert_eq!(gpu.position, [0.0, 1.0, 0.0, 0.0]);
}

#[test]
fn test_gpu_light_copies_photometric_terms() {
    let light = Light::point(Vec3::ZERO)
        .with_diffuse(Vec4::new(0.2, 0.4, 0.6, 1.0))
        .with_attenuation(1.0, 0.25, 0.125);

    let gpu = GpuLight::from_world_light(&light, &Mat4::IDENTITY);

    assert_eq!(gpu.diffuse, [0.2, 0.4, 0.6, 1.0]);
    assert_eq!(gpu.attenuation, [1.0, 0.25, 0.125]);
    assert!((gpu.spot_cos_cutoff - (-1.0)).abs() < 1e-6);
}

#[test]
fn test_gpu_light_bytes() {
    let gpu = GpuLight::from_world_light(&Light::default(), &Mat4::IDENTITY);
    let bytes: &[u8] = bytemuck::bytes_of(&gpu);
    assert_eq!(bytes.len(), 96);
}

#[test]
fn test_gpu_light_array_as_bytes() {
    let lights = vec![
        GpuLight::from_world_light(&Light::default(), &Mat4::IDENTITY),
        GpuLight::from_world_light(&Light::point(Vec3::ONE), &Mat4::IDENTITY),
    ];

    let bytes = GpuLight::as_bytes(&lights);

    assert_eq!(bytes.len(), 192);
    assert_eq!(&bytes[96..112], bytemuck::bytes_of(&lights[1].position));
}
