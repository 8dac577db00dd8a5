//! One-cushion kick pots: the cue ball comes off a rail onto the ghost ball.

use std::f32::consts::PI;

use crate::ai::geometry::{cushion_route, cut_angle, ghost_point, is_shot_blocked};
use crate::ai::shot::{Layout, ShotCandidate};
use crate::config::AiConfig;
use crate::core::ball::{Shot, CUE};
use crate::core::math::angle_between_points;
use crate::core::table::Cushion;

/// Score a pot of the target into `pockets[pocket]` with the cue ball
/// banked off `cushion`. The route is found by mirroring the target's aim
/// point (its ghost ball) across the cushion line.
pub fn evaluate_bank_shot(layout: &Layout, pocket: usize, cushion: &Cushion, config: &AiConfig) -> Option<ShotCandidate> {
    let pocket_pos = *layout.pockets.get(pocket)?;
    let r = layout.ball_radius;
    let cue = layout.cue.pos;
    let target = layout.target.pos;
    let ghost = ghost_point(target, pocket_pos, r);

    let contact = cushion_route(cushion, cue, ghost)?;

    // After the rail the cue ball arrives along contact -> ghost.
    let cut = cut_angle(contact, target, pocket_pos);
    if cut > config.max_cut() {
        return None;
    }

    let ignore = [CUE, layout.target.number];
    if is_shot_blocked(cue, contact, layout.balls, &ignore, r)
        || is_shot_blocked(contact, ghost, layout.balls, &ignore, r)
        || is_shot_blocked(target, pocket_pos, layout.balls, &ignore, r)
    {
        return None;
    }

    let path = cue.distance(contact) + contact.distance(ghost);
    let to_pocket = target.distance(pocket_pos);
    let score = config.bank_base_score - path / config.bank_path_norm - to_pocket / config.bank_pocket_norm - cut / PI;
    let power = ((path + to_pocket) / 3.0).min(config.power_cap) * config.difficulty;

    Some(ShotCandidate::Bank {
        shot: Shot::new(angle_between_points(cue, contact), power.max(1.0)),
        pocket,
        cushion: cushion.side,
        contact,
        score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ball::BallView;
    use crate::core::math::from_angle;
    use crate::core::table::{CushionSide, Table};
    use glam::Vec2;

    #[test]
    fn kick_around_a_blocker() {
        let table = Table::default();
        let pockets = table.pocket_centers().to_vec();
        // Target near the bottom-right corner, blocker straight between.
        let cue = Vec2::new(300.0, 300.0);
        let target = Vec2::new(700.0, 330.0);
        let blocker = Vec2::new(500.0, 315.0);
        let balls = [BallView::new(0, cue), BallView::new(2, target), BallView::new(6, blocker)];
        let layout = Layout { cue: balls[0], target: balls[1], balls: &balls, pockets: &pockets, ball_radius: 8.0 };
        let top = table.cushions().iter().find(|c| c.side == CushionSide::Top).unwrap();

        let candidate = evaluate_bank_shot(&layout, 3, top, &AiConfig::default()).expect("bank off the top rail");
        match candidate {
            ShotCandidate::Bank { contact, shot, cushion, .. } => {
                assert_eq!(cushion, CushionSide::Top);
                assert!((contact.y - top.line).abs() < 1e-3);
                assert!(contact.x > cue.x && contact.x < target.x);
                assert!(from_angle(shot.angle).y < 0.0, "aims up at the rail");
            }
            other => panic!("expected a bank, got {:?}", other),
        }
    }

    #[test]
    fn bank_through_pocket_mouth_is_refused() {
        let table = Table::default();
        let pockets = table.pocket_centers().to_vec();
        // Ghost ball for the top-right corner sits near (500, 100); its mirror
        // route off the top rail meets the side-pocket mouth at x = 400.
        let cue = Vec2::new(300.0, 100.0);
        let target = Vec2::new(515.5, 96.0);
        let balls = [BallView::new(0, cue), BallView::new(1, target)];
        let layout = Layout { cue: balls[0], target: balls[1], balls: &balls, pockets: &pockets, ball_radius: 8.0 };
        let top = &table.cushions()[0];
        assert!(evaluate_bank_shot(&layout, 1, top, &AiConfig::default()).is_none());
    }
}
