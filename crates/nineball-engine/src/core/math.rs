//! Small vector and angle helpers shared by the physics and the planner.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Unit vector for an angle in radians.
#[inline]
pub fn from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of the direction `from -> to`, via `atan2`.
#[inline]
pub fn angle_between_points(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Rotate a vector counter-clockwise by `angle` radians.
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

/// Absolute difference between two angles, folded into [0, PI].
#[inline]
pub fn angle_diff(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(TAU);
    if d > PI {
        TAU - d
    } else {
        d
    }
}

/// Perpendicular distance of `p` from the infinite line through `a` along `dir`
/// (unit), and its signed projection onto that line.
#[inline]
pub fn line_offsets(a: Vec2, dir: Vec2, p: Vec2) -> (f32, f32) {
    let d = p - a;
    let across = (d.x * dir.y - d.y * dir.x).abs();
    let along = d.dot(dir);
    (across, along)
}

/// `asin` clamped to its domain so spin inputs slightly outside [-1, 1] stay finite.
#[inline]
pub fn safe_asin(x: f32) -> f32 {
    x.clamp(-1.0, 1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_quarter_turn() {
        let v = rotate(Vec2::X, PI / 2.0);
        assert!(v.x.abs() < 1e-6 && (v.y - 1.0).abs() < 1e-6, "got {:?}", v);
    }

    #[test]
    fn angle_diff_wraps() {
        let d = angle_diff(PI - 0.1, -PI + 0.1);
        assert!((d - 0.2).abs() < 1e-5, "d={}", d);
        assert!(angle_diff(0.3, 0.3).abs() < 1e-6);
    }

    #[test]
    fn line_offsets_split_components() {
        let (across, along) = line_offsets(Vec2::ZERO, Vec2::X, Vec2::new(5.0, -3.0));
        assert!((across - 3.0).abs() < 1e-6);
        assert!((along - 5.0).abs() < 1e-6);
    }

    #[test]
    fn safe_asin_clamps() {
        assert!((safe_asin(1.5) - PI / 2.0).abs() < 1e-6);
    }
}
