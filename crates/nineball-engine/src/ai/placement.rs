//! Ball-in-hand: where to drop the cue ball.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use rand::Rng;

use crate::ai::geometry::{cut_angle, is_shot_blocked};
use crate::config::AiConfig;
use crate::core::ball::{BallView, CUE};
use crate::core::table::Table;

/// Choose a legal cue-ball position.
///
/// Scores a grid over the legal region (the kitchen when breaking) and
/// returns the best legal cell. With no legal cell, tries random positions,
/// then settles on a fixed spot near the head rail.
pub fn choose_cue_position<R: Rng + ?Sized>(
    table: &Table,
    balls: &[BallView],
    target: Option<u8>,
    is_break: bool,
    config: &AiConfig,
    rng: &mut R,
) -> Vec2 {
    let others: Vec<(u8, Vec2)> = balls
        .iter()
        .filter(|b| b.in_game && b.number != CUE)
        .map(|b| (b.number, b.pos))
        .collect();
    let target = target.and_then(|n| balls.iter().find(|b| b.number == n && b.in_game)).copied();

    let lo = table.min_center();
    let mut hi = table.max_center();
    if is_break {
        hi.x = hi.x.min(table.head_string_x());
    }
    let legal = |p: Vec2| table.is_valid_cue_position(p, others.iter().copied(), is_break);

    let steps = config.placement_grid_steps;
    let mut best: Option<(f32, Vec2)> = None;
    if steps > 0 {
        let cell = (hi - lo) / steps as f32;
        for i in 0..steps {
            for j in 0..steps {
                let p = lo + Vec2::new((i as f32 + 0.5) * cell.x, (j as f32 + 0.5) * cell.y);
                if !legal(p) {
                    continue;
                }
                let score = placement_score(table, balls, target.as_ref(), p, config);
                if best.map_or(true, |(s, _)| score > s) {
                    best = Some((score, p));
                }
            }
        }
    }
    if let Some((score, p)) = best {
        log::debug!("cue ball placement ({:.1}, {:.1}) score {:.3}", p.x, p.y, score);
        return p;
    }

    if hi.x > lo.x && hi.y > lo.y {
        for _ in 0..config.placement_attempts {
            let p = Vec2::new(rng.gen_range(lo.x..hi.x), rng.gen_range(lo.y..hi.y));
            if legal(p) {
                log::warn!("placement grid found nothing; random drop at ({:.1}, {:.1})", p.x, p.y);
                return p;
            }
        }
    }

    let fallback = Vec2::new(lo.x + 50.0, table.height() / 2.0);
    log::warn!("no legal placement found; using default ({:.1}, {:.1})", fallback.x, fallback.y);
    fallback
}

/// Desirability of a legal cell: a comfortable distance to the target, an
/// easy angle into some pocket, and a central spot. A blocked line to the
/// target costs heavily.
fn placement_score(table: &Table, balls: &[BallView], target: Option<&BallView>, p: Vec2, config: &AiConfig) -> f32 {
    let center = table.center();
    let reach = center.distance(table.min_center()).max(1.0);
    let centrality = (1.0 - p.distance(center) / reach).max(0.0);

    let Some(target) = target else {
        return 0.2 * centrality;
    };

    let ideal = config.placement_ideal_distance.max(1.0);
    let distance = (1.0 - (p.distance(target.pos) - ideal).abs() / ideal).max(0.0);

    let angle = table
        .pocket_centers()
        .iter()
        .map(|&pocket| (1.0 - cut_angle(p, target.pos, pocket) / FRAC_PI_2).max(0.0))
        .fold(0.0, f32::max);

    let mut score = 0.3 * distance + 0.3 * angle + 0.2 * centrality;
    if is_shot_blocked(p, target.pos, balls, &[CUE, target.number], table.ball_radius()) {
        score -= 0.5;
    }
    score
}
