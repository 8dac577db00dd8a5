//! Diamond rack and ball spotting.

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::ball::NINE;
use crate::core::table::Table;

/// Slot offsets in (rows toward the foot rail, half-ball columns).
/// Slot 0 is the apex, slot 4 the centre on the foot spot.
const DIAMOND: [(f32, f32); 9] = [
    (-2.0, 0.0),
    (-1.0, -0.5),
    (-1.0, 0.5),
    (0.0, -1.0),
    (0.0, 0.0),
    (0.0, 1.0),
    (1.0, -0.5),
    (1.0, 0.5),
    (2.0, 0.0),
];

const APEX_SLOT: usize = 0;
const CENTER_SLOT: usize = 4;

/// Centre-to-centre spacing of racked balls.
pub fn rack_spacing(ball_radius: f32, gap: f32) -> f32 {
    2.0 * ball_radius + gap
}

/// Slot positions of the diamond around the foot spot.
pub fn rack_positions(foot_spot: Vec2, ball_radius: f32, gap: f32) -> [Vec2; 9] {
    let s = rack_spacing(ball_radius, gap);
    let row = s * 3f32.sqrt() / 2.0;
    DIAMOND.map(|(r, c)| foot_spot + Vec2::new(r * row, c * s))
}

/// Ball number for each slot: the 1-ball at the apex, the 9-ball in the
/// centre and the rest shuffled.
pub fn rack_order<R: Rng + ?Sized>(rng: &mut R) -> [u8; 9] {
    let mut rest: Vec<u8> = (2..NINE).collect();
    rest.shuffle(rng);
    let mut rest = rest.into_iter();

    let mut order = [0u8; 9];
    for (slot, number) in order.iter_mut().enumerate() {
        *number = match slot {
            APEX_SLOT => 1,
            CENTER_SLOT => NINE,
            _ => rest.next().unwrap_or(0),
        };
    }
    order
}

/// Find a free spot for a ball whose natural position is `home`.
///
/// Walks row by row from `home` toward the foot rail, trying the row's centre
/// and then alternating offsets across the table. If the foot end is full the
/// walk continues back toward the head rail. Returns `None` if nothing is free.
pub fn find_spot(table: &Table, home: Vec2, occupied: &[Vec2], ball_radius: f32) -> Option<Vec2> {
    let s = 2.0 * ball_radius;
    let row = s * 3f32.sqrt() / 2.0;
    let lo = table.min_center();
    let hi = table.max_center();
    let free = |p: Vec2| {
        table.contains(p) && table.pocket_at(p).is_none() && occupied.iter().all(|o| o.distance(p) >= s)
    };

    let home = table.clamp_to_surface(home);
    let max_rows = ((hi.x - lo.x) / row).ceil() as i32 + 1;
    let max_cols = ((hi.y - lo.y) / s).ceil() as i32 + 1;

    let forward = (0..max_rows).map(|k| home.x + k as f32 * row);
    let backward = (1..max_rows).map(|k| home.x - k as f32 * row);
    for x in forward.chain(backward) {
        if x < lo.x || x > hi.x {
            continue;
        }
        for c in 0..max_cols {
            for sign in [1.0, -1.0] {
                if c == 0 && sign < 0.0 {
                    continue;
                }
                let candidate = Vec2::new(x, home.y + sign * c as f32 * s);
                if free(candidate) {
                    return Some(candidate);
                }
            }
        }
    }
    None
}
