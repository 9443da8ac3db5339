//! Boundary reflection and pairwise separation
//!
//! Pure helpers for the three geometric questions the step asks: does the
//! pointer push this particle, does a wall reflect it, and does an
//! overlapping neighbor displace it. All distances are floored at
//! `DISTANCE_FLOOR` before division so coincident centers yield a huge but
//! finite response instead of NaN.

use glam::Vec2;

use crate::consts::{DISTANCE_FLOOR, SEPARATION_EPSILON};

/// Repulsion imparted by a pressed pointer, or `None` outside its influence.
///
/// The force magnitude is `influence / distance`, diverging as the particle
/// approaches the pointer. Direction points from pointer to particle.
pub fn pointer_push(pos: Vec2, pointer_pos: Vec2, influence: f32) -> Option<Vec2> {
    let delta = pos - pointer_pos;
    let distance = delta.length().max(DISTANCE_FLOOR);
    if distance >= influence {
        return None;
    }
    let force = influence / distance;
    let angle = delta.y.atan2(delta.x);
    Some(Vec2::new(angle.cos(), angle.sin()) * force)
}

/// Clamp one axis to `[radius, extent - radius]`, negating velocity on contact.
///
/// Returns the corrected `(position, velocity)` pair. Reflection is lossless:
/// the velocity component only flips sign.
pub fn reflect_axis(pos: f32, vel: f32, radius: f32, extent: f32) -> (f32, f32) {
    if pos < radius {
        (radius, -vel)
    } else if pos > extent - radius {
        (extent - radius, -vel)
    } else {
        (pos, vel)
    }
}

/// Where an overlapping particle must move to clear its neighbor.
///
/// Returns `None` when the centers are farther apart than the sum of radii.
/// On overlap the particle is placed just past contact distance along the
/// line between centers, one-sided: only the caller moves. A fully
/// degenerate (zero) delta falls back to the `+X` axis so the outcome stays
/// deterministic.
pub fn separation_target(pos: Vec2, other_pos: Vec2, sum_of_radii: f32) -> Option<Vec2> {
    let delta = pos - other_pos;
    let distance = delta.length();
    if distance > sum_of_radii {
        return None;
    }
    let unit = if distance > DISTANCE_FLOOR {
        delta / distance
    } else {
        Vec2::X
    };
    Some(other_pos + (sum_of_radii + SEPARATION_EPSILON) * unit)
}
