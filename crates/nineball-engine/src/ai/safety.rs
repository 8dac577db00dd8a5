//! Defensive shots: touch the target and leave it somewhere awkward.

use glam::Vec2;

use crate::ai::geometry::{
    cushion_distance, cushion_route, cut_angle, first_contact, is_shot_blocked, power_to_reach, segment_distance,
};
use crate::ai::shot::{Layout, ShotCandidate};
use crate::config::AiConfig;
use crate::core::ball::{Shot, CUE};
use crate::core::math::{angle_between_points, from_angle};
use crate::core::table::Table;

/// Fractions of the widest still-hitting offset tried on a direct safety.
const OFFSET_STEPS: [f32; 5] = [-0.75, -0.4, 0.0, 0.4, 0.75];

/// Every safety worth considering: direct touches when the target is in
/// sight, one-cushion kicks otherwise. `deceleration` is the table's
/// per-tick speed loss; powers too weak to reach the target are dropped.
pub fn evaluate_safeties(layout: &Layout, table: &Table, deceleration: f32, config: &AiConfig) -> Vec<ShotCandidate> {
    let r = layout.ball_radius;
    let ignore = [CUE, layout.target.number];
    if is_shot_blocked(layout.cue.pos, layout.target.pos, layout.balls, &ignore, r) {
        kick_safeties(layout, table, deceleration, config)
    } else {
        direct_safeties(layout, table, deceleration, config)
    }
}

/// Where both balls settle after the cue ball, travelling along unit `dir`,
/// meets the target with its centre at `contact`. The object ball takes the
/// share of `travel` along the line of centres, the cue ball the rest along
/// the tangent.
fn predict_leave(contact: Vec2, dir: Vec2, target: Vec2, travel: f32, table: &Table) -> (Vec2, Vec2) {
    let normal = (target - contact).normalize_or_zero();
    let transfer = dir.dot(normal).max(0.0);
    let tangent = dir - normal * transfer;
    let object_rest = table.clamp_to_surface(target + normal * travel * transfer);
    let cue_rest = table.clamp_to_surface(contact + tangent * travel);
    (object_rest, cue_rest)
}

/// Whether the cue ball's predicted rest, or any of the given path legs,
/// comes close enough to a pocket to risk a scratch.
fn scratch_risk(layout: &Layout, legs: &[(Vec2, Vec2)], cue_rest: Vec2, config: &AiConfig) -> bool {
    let radius = config.scratch_risk_radius;
    layout.near_pocket(cue_rest, radius)
        || legs
            .iter()
            .any(|&(from, to)| layout.pockets.iter().any(|&p| segment_distance(from, to, p) < radius))
}

fn direct_safeties(layout: &Layout, table: &Table, deceleration: f32, config: &AiConfig) -> Vec<ShotCandidate> {
    let r = layout.ball_radius;
    let cue = layout.cue.pos;
    let target = layout.target.pos;
    let dist = cue.distance(target);
    if dist < 1e-3 {
        return Vec::new();
    }
    let max_offset = (0.9 * 2.0 * r / dist).min(1.0).asin();
    let aim = angle_between_points(cue, target);
    let ignore = [CUE, layout.target.number];

    let mut out = Vec::new();
    for step in OFFSET_STEPS {
        let angle = aim + step * max_offset;
        let dir = from_angle(angle);
        let Some(contact) = first_contact(cue, dir, target, r) else {
            continue;
        };
        if is_shot_blocked(cue, contact, layout.balls, &ignore, r) {
            continue;
        }
        let needed = power_to_reach(cue.distance(contact), deceleration, config.reach_margin);

        for &power in config.safety_powers.iter().filter(|&&p| p >= needed) {
            let travel = power * config.safety_travel_per_power;
            let (object_rest, cue_rest) = predict_leave(contact, dir, target, travel, table);
            if scratch_risk(layout, &[], cue_rest, config) {
                continue;
            }
            out.push(ShotCandidate::Safety {
                shot: Shot::new(angle, power),
                kick: None,
                object_rest,
                score: leave_score(layout, table, object_rest, cue_rest, config),
            });
        }
    }
    out
}

fn kick_safeties(layout: &Layout, table: &Table, deceleration: f32, config: &AiConfig) -> Vec<ShotCandidate> {
    let r = layout.ball_radius;
    let cue = layout.cue.pos;
    let target = layout.target.pos;
    let ignore = [CUE, layout.target.number];

    let mut out = Vec::new();
    for cushion in table.cushions() {
        let Some(rail) = cushion_route(cushion, cue, target) else {
            continue;
        };
        if is_shot_blocked(cue, rail, layout.balls, &ignore, r)
            || is_shot_blocked(rail, target, layout.balls, &ignore, r)
        {
            continue;
        }
        // Off the rail the cue ball heads for the target's centre: a full hit.
        let dir = (target - rail).normalize_or_zero();
        let contact = target - dir * 2.0 * r;
        let legs = [(rail, contact)];
        let path = cue.distance(rail) + rail.distance(contact);
        let needed = power_to_reach(path, deceleration, config.reach_margin);

        for &power in config.kick_safety_powers.iter().filter(|&&p| p >= needed) {
            let travel = power * config.kick_travel_per_power;
            let (object_rest, cue_rest) = predict_leave(contact, dir, target, travel, table);
            if scratch_risk(layout, &legs, cue_rest, config) {
                continue;
            }
            out.push(ShotCandidate::Safety {
                shot: Shot::new(angle_between_points(cue, rail), power),
                kick: Some(cushion.side),
                object_rest,
                score: leave_score(layout, table, object_rest, cue_rest, config),
            });
        }
    }
    out
}

/// How awkward the leave is for the opponent. Higher is better.
///
/// Rewards distance from the pockets the opponent could cut into easily,
/// a target near (not frozen on) a cushion, separation from the cue ball,
/// and a ball hiding the target from the cue ball.
pub fn leave_score(layout: &Layout, table: &Table, object: Vec2, cue: Vec2, config: &AiConfig) -> f32 {
    let mut score = 1.0;

    for &pocket in layout.pockets {
        let ease = 1.0 - cut_angle(cue, object, pocket).sin().abs();
        score += object.distance(pocket) / config.safety_pocket_norm * ease;
    }

    let rail = cushion_distance(object, table.min_center(), table.max_center());
    if rail < config.safety_frozen_distance {
        score -= 0.5;
    } else if rail < config.safety_cushion_range {
        score += (1.0 - rail / config.safety_cushion_range) * 0.3;
    }

    score += (cue.distance(object) / config.safety_separation_norm).min(1.0) * 0.4;

    let hidden = layout
        .others()
        .any(|b| is_shot_blocked(cue, object, std::slice::from_ref(b), &[], layout.ball_radius));
    if hidden {
        score += config.safety_hide_bonus;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ball::BallView;

    const DECEL: f32 = 0.05;

    fn layout_for<'a>(balls: &'a [BallView], pockets: &'a [Vec2]) -> Layout<'a> {
        Layout { cue: balls[0], target: balls[1], balls, pockets, ball_radius: 8.0 }
    }

    #[test]
    fn open_target_gets_direct_safeties() {
        let table = Table::default();
        let pockets = table.pocket_centers().to_vec();
        let balls = [BallView::new(0, Vec2::new(200.0, 200.0)), BallView::new(1, Vec2::new(400.0, 210.0))];
        let layout = layout_for(&balls, &pockets);
        let safeties = evaluate_safeties(&layout, &table, DECEL, &AiConfig::default());
        assert!(!safeties.is_empty());
        for s in &safeties {
            assert!(matches!(s, ShotCandidate::Safety { kick: None, .. }));
            let shot = s.shot();
            // Every candidate still reaches the target
            assert!(first_contact(layout.cue.pos, from_angle(shot.angle), layout.target.pos, 8.0).is_some());
            assert!(table.contains(match s {
                ShotCandidate::Safety { object_rest, .. } => *object_rest,
                _ => unreachable!(),
            }));
        }
    }

    #[test]
    fn hidden_target_gets_kick_safeties() {
        let table = Table::default();
        let pockets = table.pocket_centers().to_vec();
        let balls = [
            BallView::new(0, Vec2::new(200.0, 200.0)),
            BallView::new(1, Vec2::new(400.0, 200.0)),
            BallView::new(7, Vec2::new(300.0, 200.0)),
        ];
        let layout = layout_for(&balls, &pockets);
        let safeties = evaluate_safeties(&layout, &table, DECEL, &AiConfig::default());
        assert!(!safeties.is_empty(), "top and bottom rails both offer a kick");
        assert!(safeties.iter().all(|s| matches!(s, ShotCandidate::Safety { kick: Some(_), .. })));
    }

    #[test]
    fn far_target_keeps_only_powers_that_arrive() {
        let table = Table::default();
        let pockets = table.pocket_centers().to_vec();
        let config = AiConfig::default();
        let balls = [BallView::new(0, Vec2::new(100.0, 200.0)), BallView::new(1, Vec2::new(700.0, 210.0))];
        let layout = layout_for(&balls, &pockets);
        let safeties = evaluate_safeties(&layout, &table, DECEL, &config);
        assert!(!safeties.is_empty());
        let needed = power_to_reach(600.0 - 16.0, DECEL, config.reach_margin);
        for s in &safeties {
            assert!(s.shot().power >= needed, "power {} cannot cover the table", s.shot().power);
        }
        assert!(safeties.iter().all(|s| s.shot().power > config.safety_powers[0]));
    }

    #[test]
    fn kick_off_a_pocket_jaw_is_refused() {
        // Both rail routes meet the cushion beside a corner pocket.
        let table = Table::default();
        let pockets = table.pocket_centers().to_vec();
        let balls = [
            BallView::new(0, Vec2::new(35.0, 100.0)),
            BallView::new(1, Vec2::new(75.0, 100.0)),
            BallView::new(7, Vec2::new(55.0, 100.0)),
        ];
        let layout = layout_for(&balls, &pockets);
        let top = &table.cushions()[0];
        let rail = cushion_route(top, balls[0].pos, balls[1].pos).expect("route off the top rail");
        assert!(layout.near_pocket(rail, AiConfig::default().scratch_risk_radius));

        let safeties = evaluate_safeties(&layout, &table, DECEL, &AiConfig::default());
        assert!(safeties.is_empty(), "kept a scratching kick: {:?}", safeties);
    }

    #[test]
    fn frozen_leave_scores_below_near_rail() {
        let table = Table::default();
        let pockets = table.pocket_centers().to_vec();
        let balls = [BallView::new(0, Vec2::new(200.0, 200.0)), BallView::new(1, Vec2::new(400.0, 200.0))];
        let layout = layout_for(&balls, &pockets);
        let config = AiConfig::default();
        let cue = Vec2::new(400.0, 200.0);
        let frozen = leave_score(&layout, &table, Vec2::new(28.0, 200.0), cue, &config);
        let near = leave_score(&layout, &table, Vec2::new(60.0, 200.0), cue, &config);
        assert!(near > frozen, "near={} frozen={}", near, frozen);
    }

    #[test]
    fn hiding_the_object_ball_is_rewarded() {
        let table = Table::default();
        let pockets = table.pocket_centers().to_vec();
        let config = AiConfig::default();
        let open = [BallView::new(0, Vec2::new(100.0, 100.0)), BallView::new(1, Vec2::new(100.0, 100.0))];
        let hidden = [
            BallView::new(0, Vec2::new(100.0, 100.0)),
            BallView::new(1, Vec2::new(100.0, 100.0)),
            BallView::new(5, Vec2::new(400.0, 200.0)),
        ];
        let cue = Vec2::new(300.0, 200.0);
        let object = Vec2::new(500.0, 200.0);
        let a = leave_score(&layout_for(&open, &pockets), &table, object, cue, &config);
        let b = leave_score(&layout_for(&hidden, &pockets), &table, object, cue, &config);
        assert!((b - a - config.safety_hide_bonus).abs() < 1e-4);
    }
}
