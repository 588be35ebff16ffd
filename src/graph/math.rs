use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Vec3, vec3};

use crate::util::stable_pair;

pub const DEGENERATE_DISTANCE: f32 = 0.0001;

/// Drops the z component. Planar agents live in the z = 0 plane.
pub fn flatten(vector: Vec3) -> Vec3 {
    vec3(vector.x, vector.y, 0.0)
}

/// Normalizes `vector`, or returns `None` when its length is too small to
/// carry a direction.
pub fn try_direction(vector: Vec3) -> Option<Vec3> {
    let length = vector.length();
    if length > DEGENERATE_DISTANCE && length.is_finite() {
        Some(vector / length)
    } else {
        None
    }
}

pub fn clamp_length(vector: Vec3, max: f32) -> Vec3 {
    let length_sq = vector.length_squared();
    if length_sq > max * max && length_sq > 0.0 {
        vector * (max / length_sq.sqrt())
    } else {
        vector
    }
}

/// Stable unit direction splitting two coincident points apart. Swapping the
/// names flips it.
pub fn fallback_direction(own: &str, other: &str, planar: bool) -> Vec3 {
    let (low, high, sign) = if own <= other {
        (own, other, 1.0)
    } else {
        (other, own, -1.0)
    };

    let (jx, jy) = stable_pair(&format!("{low}\u{0}{high}"));
    let azimuth = (jx * 0.5 + 0.5) * TAU;
    let direction = if planar {
        vec3(azimuth.cos(), azimuth.sin(), 0.0)
    } else {
        let elevation = jy.clamp(-1.0, 1.0).asin();
        vec3(
            elevation.cos() * azimuth.cos(),
            elevation.cos() * azimuth.sin(),
            elevation.sin(),
        )
    };
    direction * sign
}

/// Euler angles that rotate a primitive authored along +y so it points along
/// `direction`: `(yaw around z, pitch around x)`.
pub fn link_orientation(direction: Vec3) -> (f32, f32) {
    let yaw = direction.y.atan2(direction.x) + FRAC_PI_2;
    let horizontal = (direction.x * direction.x + direction.y * direction.y).sqrt();
    let pitch = horizontal.atan2(direction.z) + FRAC_PI_2;
    (yaw, pitch)
}
