//! Channel interpolation shared by the decimator and the sampling decoder.
//!
//! Decimation tests reconstruction error with these exact functions. If
//! decoding blended any other way, the error bound established while
//! decimating would not hold for decoded poses.
use glam::{Quat, Vec3};

pub fn lerp_vec3(a: Vec3, b: Vec3, alpha: f32) -> Vec3 {
    a.lerp(b, alpha)
}

/// Normalized linear blend with quaternion sign correction.
///
/// `q` and `-q` encode the same rotation. Blending across the sign flip
/// without negating one operand spins the long way around.
pub fn nlerp(a: Quat, b: Quat, alpha: f32) -> Quat {
    let b = if a.dot(b) < 0.0 { -b } else { b };
    (a * (1.0 - alpha) + b * alpha).normalize()
}
