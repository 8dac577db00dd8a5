//! Direct pots through the ghost ball, with a one-shot look-ahead.

use std::f32::consts::PI;

use glam::Vec2;

use crate::ai::geometry::{cut_angle, ghost_point, is_shot_blocked};
use crate::ai::shot::{Layout, ShotCandidate};
use crate::config::AiConfig;
use crate::core::ball::{BallView, Shot, CUE};
use crate::core::math::angle_between_points;
use crate::core::table::Table;

/// Power multipliers tried around the base power.
const POWER_STEPS: [f32; 3] = [0.8, 1.0, 1.2];

/// Score a straight pot of the target into `pockets[pocket]`, or `None` when
/// the cut is too thin, a path is blocked, every power level risks a scratch
/// or the result is not worth playing.
pub fn evaluate_direct_shot(layout: &Layout, pocket: usize, table: &Table, config: &AiConfig) -> Option<ShotCandidate> {
    let pocket_pos = *layout.pockets.get(pocket)?;
    let r = layout.ball_radius;
    let cue = layout.cue.pos;
    let target = layout.target.pos;

    let cut = cut_angle(cue, target, pocket_pos);
    if cut > config.max_cut() {
        return None;
    }
    let ghost = ghost_point(target, pocket_pos, r);
    if is_shot_blocked(target, pocket_pos, layout.balls, &[layout.target.number], r) {
        return None;
    }
    if is_shot_blocked(cue, ghost, layout.balls, &[CUE, layout.target.number], r) {
        return None;
    }

    let to_ghost = cue.distance(ghost);
    let to_pocket = target.distance(pocket_pos);
    let cut_penalty = (cut + (cut - config.ideal_cut()).max(0.0)) / PI;
    let base_score = 1.0 - (to_ghost + to_pocket) / config.travel_norm - cut_penalty;

    let base_power = ((to_ghost + to_pocket / 2.0) / 4.0).min(config.power_cap) * config.difficulty;
    let angle = angle_between_points(cue, ghost);
    let weight = config.lookahead_weight;

    let mut best: Option<(f32, f32, Vec2)> = None;
    for step in POWER_STEPS {
        let power = (base_power * step).min(config.power_cap * config.difficulty).max(1.0);
        let rest = predict_cue_rest(cue, ghost, pocket_pos - target, power, table, config);
        if layout.near_pocket(rest, config.scratch_risk_radius) {
            continue;
        }
        let next = lookahead(layout, rest, config);
        let score = (1.0 - weight) * base_score + weight * next;
        if best.map_or(true, |(s, _, _)| score > s) {
            best = Some((score, power, rest));
        }
    }

    let (score, power, cue_rest) = best?;
    if score <= config.min_direct_score {
        return None;
    }
    Some(ShotCandidate::Direct {
        shot: Shot::new(angle, power),
        pocket,
        cut_angle: cut,
        cue_rest,
        score,
    })
}

/// Where the cue ball settles after potting. The cue ball leaves the ghost
/// point at 90 degrees to the object ball's path, on the side it was heading;
/// a full hit leaves it at the ghost point.
pub fn predict_cue_rest(cue: Vec2, ghost: Vec2, object_dir: Vec2, power: f32, table: &Table, config: &AiConfig) -> Vec2 {
    let incoming = (ghost - cue).normalize_or_zero();
    let along = object_dir.normalize_or_zero();
    let tangent = incoming - along * incoming.dot(along);
    let share = tangent.length();
    if share < 1e-4 {
        return ghost;
    }
    let travel = power * config.cue_travel_per_power * share;
    table.clamp_to_surface(ghost + tangent / share * travel)
}

/// How good the next shot looks from `cue_rest` once the target has dropped.
/// Potting the last ball is worth full marks; no next shot is worth nothing.
fn lookahead(layout: &Layout, cue_rest: Vec2, config: &AiConfig) -> f32 {
    let Some(next) = layout.next_ball() else {
        return 1.0;
    };
    let ignore = [CUE, layout.target.number, next.number];
    layout
        .pockets
        .iter()
        .filter_map(|&pocket| simple_score(cue_rest, &next, pocket, layout, &ignore, config))
        .fold(0.0, f32::max)
}

fn simple_score(
    cue: Vec2,
    next: &BallView,
    pocket: Vec2,
    layout: &Layout,
    ignore: &[u8],
    config: &AiConfig,
) -> Option<f32> {
    let cut = cut_angle(cue, next.pos, pocket);
    if cut > config.max_cut() {
        return None;
    }
    let ghost = ghost_point(next.pos, pocket, layout.ball_radius);
    if is_shot_blocked(cue, ghost, layout.balls, ignore, layout.ball_radius) {
        return None;
    }
    let travel = cue.distance(next.pos) + next.pos.distance(pocket);
    Some((1.0 - travel / config.lookahead_norm - cut / PI).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Table, Vec<Vec2>) {
        let table = Table::default();
        let pockets = table.pocket_centers().to_vec();
        (table, pockets)
    }

    #[test]
    fn straight_shot_scores_well() {
        // Target on the line from the cue ball to the top-right corner.
        let (table, pockets) = fixture();
        let corner = pockets[1];
        let cue = Vec2::new(300.0, 250.0);
        let dir = (corner - cue).normalize();
        let target = cue + dir * 150.0;
        let balls = [BallView::new(0, cue), BallView::new(1, target), BallView::new(9, Vec2::new(200.0, 330.0))];
        let layout = Layout { cue: balls[0], target: balls[1], balls: &balls, pockets: &pockets, ball_radius: 8.0 };
        let config = AiConfig::default();

        let candidate = evaluate_direct_shot(&layout, 1, &table, &config).expect("clear straight shot");
        match candidate {
            ShotCandidate::Direct { cut_angle, score, shot, .. } => {
                assert!(cut_angle.abs() < 1e-3, "cut angle {}", cut_angle);
                assert!(score > config.offensive_threshold(), "score {} below threshold", score);
                assert!(shot.power > 0.0 && shot.angle.is_finite());
            }
            other => panic!("expected a direct shot, got {:?}", other),
        }
    }

    #[test]
    fn thin_cut_rejected() {
        let (table, pockets) = fixture();
        // Cue directly below the target, pocket down and to the left: over 100 degrees of cut
        let balls = [BallView::new(0, Vec2::new(600.0, 300.0)), BallView::new(1, Vec2::new(600.0, 200.0))];
        let layout = Layout { cue: balls[0], target: balls[1], balls: &balls, pockets: &pockets, ball_radius: 8.0 };
        assert!(evaluate_direct_shot(&layout, 2, &table, &AiConfig::default()).is_none());
    }

    #[test]
    fn blocked_pocket_path_rejected() {
        let (table, pockets) = fixture();
        let corner = pockets[1];
        let cue = Vec2::new(300.0, 250.0);
        let dir = (corner - cue).normalize();
        let target = cue + dir * 150.0;
        let blocker = target + dir * 100.0;
        let balls = [BallView::new(0, cue), BallView::new(1, target), BallView::new(5, blocker)];
        let layout = Layout { cue: balls[0], target: balls[1], balls: &balls, pockets: &pockets, ball_radius: 8.0 };
        assert!(evaluate_direct_shot(&layout, 1, &table, &AiConfig::default()).is_none());
    }

    #[test]
    fn cue_rest_follows_tangent() {
        let table = Table::default();
        let config = AiConfig::default();
        // Full hit: stays at the ghost point
        let rest = predict_cue_rest(Vec2::new(100.0, 200.0), Vec2::new(300.0, 200.0), Vec2::X, 5.0, &table, &config);
        assert_eq!(rest, Vec2::new(300.0, 200.0));
        // Cut to the right: cue ball drifts along +y
        let rest = predict_cue_rest(Vec2::new(200.0, 100.0), Vec2::new(300.0, 200.0), Vec2::X, 5.0, &table, &config);
        assert!(rest.y > 200.0 && (rest.x - 300.0).abs() < 1e-3, "rest {:?}", rest);
    }
}
