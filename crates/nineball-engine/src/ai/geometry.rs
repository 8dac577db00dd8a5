//! Line-of-sight and aiming geometry for the planner.

use glam::Vec2;

use crate::core::ball::BallView;
use crate::core::math::{angle_between_points, angle_diff, line_offsets};
use crate::core::table::Cushion;

/// A ball blocks a path when its centre is closer to the line than this
/// many ball radii.
pub const BLOCK_TOLERANCE: f32 = 1.8;

/// Whether any in-play ball not listed in `ignore` sits on the path `from -> to`.
///
/// A ball blocks when its perpendicular distance to the line is below the
/// tolerance and its projection falls strictly between the endpoints.
/// Degenerate (zero-length) paths are never blocked.
pub fn is_shot_blocked(from: Vec2, to: Vec2, balls: &[BallView], ignore: &[u8], ball_radius: f32) -> bool {
    let seg = to - from;
    let len = seg.length();
    if len < 1e-6 {
        return false;
    }
    let dir = seg / len;
    let tolerance = BLOCK_TOLERANCE * ball_radius;
    balls
        .iter()
        .filter(|b| b.in_game && !ignore.contains(&b.number))
        .any(|b| {
            let (across, along) = line_offsets(from, dir, b.pos);
            across < tolerance && along > 0.0 && along < len
        })
}

/// Where the cue ball's centre must be at contact to send `target` toward `pocket`.
pub fn ghost_point(target: Vec2, pocket: Vec2, ball_radius: f32) -> Vec2 {
    let dir = (pocket - target).normalize_or_zero();
    target - dir * 2.0 * ball_radius
}

/// Angle between the cue-to-target and target-to-pocket directions.
pub fn cut_angle(cue: Vec2, target: Vec2, pocket: Vec2) -> f32 {
    angle_diff(angle_between_points(cue, target), angle_between_points(target, pocket))
}

/// One-cushion route from `from` to `to`: the point on the cushion's rubber
/// where a ball must rebound. Uses the mirror image of `to`. `None` when the
/// line never meets the cushion or meets it at a pocket mouth.
pub fn cushion_route(cushion: &Cushion, from: Vec2, to: Vec2) -> Option<Vec2> {
    let virtual_to = cushion.mirror(to);
    let contact = cushion.crossing(from, virtual_to)?;
    if !cushion.covers(cushion.axial(contact)) {
        return None;
    }
    // Both ends must be on the playing side of the rail.
    let side = |p: Vec2| (p - contact).dot(cushion.normal);
    if side(from) <= 0.0 || side(to) <= 0.0 {
        return None;
    }
    Some(contact)
}

/// Where a cue ball travelling from `cue` along unit `dir` first touches a
/// ball at `target`, as the cue ball's centre. `None` on a miss.
pub fn first_contact(cue: Vec2, dir: Vec2, target: Vec2, ball_radius: f32) -> Option<Vec2> {
    let (across, along) = line_offsets(cue, dir, target);
    let reach = 2.0 * ball_radius;
    if along <= 0.0 || across >= reach {
        return None;
    }
    let back = (reach * reach - across * across).sqrt();
    Some(cue + dir * (along - back))
}

/// Shortest distance from `p` to the segment `from -> to`.
pub fn segment_distance(from: Vec2, to: Vec2, p: Vec2) -> f32 {
    let seg = to - from;
    let len = seg.length();
    if len < 1e-6 {
        return from.distance(p);
    }
    let (across, along) = line_offsets(from, seg / len, p);
    if along <= 0.0 {
        from.distance(p)
    } else if along >= len {
        to.distance(p)
    } else {
        across
    }
}

/// Smallest strike power that carries a ball `distance` units when it loses
/// `deceleration` of speed every tick, scaled by `margin`.
///
/// A ball struck at `v` covers `v - a`, `v - 2a`, ... per tick, about
/// `v^2 / 2a - v / 2` in all.
pub fn power_to_reach(distance: f32, deceleration: f32, margin: f32) -> f32 {
    if distance <= 0.0 || deceleration <= 0.0 {
        return 0.0;
    }
    let a = deceleration;
    (a + (a * a + 8.0 * a * distance).sqrt()) / 2.0 * margin
}

/// Shortest distance from `pos` to any of the four cushion lines.
pub fn cushion_distance(pos: Vec2, lo: Vec2, hi: Vec2) -> f32 {
    (pos.x - lo.x).min(hi.x - pos.x).min(pos.y - lo.y).min(hi.y - pos.y).max(0.0)
}
