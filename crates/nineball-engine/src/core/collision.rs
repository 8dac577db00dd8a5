use glam::Vec2;

use crate::config::PhysicsConfig;
use crate::core::ball::Ball;

/// Outcome of an approaching ball-ball contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    /// Number of the ball that was moving faster along the line of centres.
    pub striker: u8,
    pub struck: u8,
    /// Closing speed along the line of centres, before the exchange.
    pub closing_speed: f32,
}

/// Whether two in-play balls overlap or touch.
#[inline]
pub fn overlapping(a: &Ball, b: &Ball) -> bool {
    let min = a.radius + b.radius;
    a.pos.distance_squared(b.pos) <= min * min
}

/// Resolve contact between two balls.
///
/// Approaching balls exchange momentum along the line of centres (elastic,
/// arbitrary masses), hand over part of the striker's spin and record the
/// contact in the cue ball's `collision_order`. Separating balls that still
/// overlap are only pushed apart. Returns the impact when one happened.
pub fn resolve_pair(a: &mut Ball, b: &mut Ball, physics: &PhysicsConfig) -> Option<Impact> {
    if !a.in_game || !b.in_game || !overlapping(a, b) {
        return None;
    }

    let delta = b.pos - a.pos;
    let dist = delta.length();
    let normal = if dist > 1e-6 {
        delta / dist
    } else {
        // Coincident centres: push along relative velocity, or x as last resort.
        (a.vel - b.vel).try_normalize().unwrap_or(Vec2::X)
    };

    let u1 = a.vel.dot(normal);
    let u2 = b.vel.dot(normal);
    let closing = u1 - u2;

    let impact = if closing > 0.0 {
        let (m1, m2) = (a.mass, b.mass);
        let total = m1 + m2;
        let v1 = ((m1 - m2) * u1 + 2.0 * m2 * u2) / total;
        let v2 = ((m2 - m1) * u2 + 2.0 * m1 * u1) / total;
        a.vel += (v1 - u1) * normal;
        b.vel += (v2 - u2) * normal;

        // The faster ball along the normal is the one doing the striking.
        let a_strikes = u1 >= -u2;
        let (striker, struck) = if a_strikes { (&mut *a, &mut *b) } else { (&mut *b, &mut *a) };
        let handed = striker.spin.scaled(physics.spin_transfer);
        struck.spin.top = (struck.spin.top + handed.top).clamp(-1.0, 1.0);
        struck.spin.side = (struck.spin.side + handed.side).clamp(-1.0, 1.0);
        striker.spin = striker.spin.scaled(1.0 - physics.spin_transfer);

        if striker.is_cue() {
            striker.collision_order.push(struck.number);
        } else if struck.is_cue() {
            struck.collision_order.push(striker.number);
        }

        Some(Impact { striker: striker.number, struck: struck.number, closing_speed: closing })
    } else {
        None
    };

    // Positional separation, shared by inverse mass.
    let overlap = a.radius + b.radius - dist;
    if overlap > 0.0 {
        let inv_a = 1.0 / a.mass;
        let inv_b = 1.0 / b.mass;
        let share = overlap / (inv_a + inv_b);
        a.pos -= normal * share * inv_a;
        b.pos += normal * share * inv_b;
    }

    impact
}
