use glam::Vec2;

use crate::ai::bank::evaluate_bank_shot;
use crate::ai::direct::evaluate_direct_shot;
use crate::ai::geometry::power_to_reach;
use crate::ai::placement::choose_cue_position;
use crate::ai::safety::evaluate_safeties;
use crate::ai::shot::{best, Layout, ShotCandidate};
use crate::config::{AiConfig, SimConfig};
use crate::core::ball::{BallView, Shot};
use crate::core::math::angle_between_points;
use crate::core::table::Table;

/// Picks a strike for the player at the table. Holds only immutable table
/// geometry and tuning; every call gets the ball layout explicitly, so one
/// planner can serve any number of tables.
#[derive(Debug, Clone)]
pub struct ShotPlanner {
    table: Table,
    /// Per-tick speed loss on the cloth, used to size shots that must arrive.
    deceleration: f32,
    config: AiConfig,
}

impl ShotPlanner {
    pub fn new(table: Table, deceleration: f32, config: AiConfig) -> Self {
        Self { table, deceleration, config }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(Table::new(&config.table), config.table.deceleration, config.ai.clone())
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Every direct and bank pot that survives its filters.
    pub fn offensive_candidates(&self, layout: &Layout) -> Vec<ShotCandidate> {
        let mut out = Vec::new();
        for pocket in 0..layout.pockets.len() {
            if let Some(c) = evaluate_direct_shot(layout, pocket, &self.table, &self.config) {
                out.push(c);
            }
            for cushion in self.table.cushions() {
                if let Some(c) = evaluate_bank_shot(layout, pocket, cushion, &self.config) {
                    out.push(c);
                }
            }
        }
        out
    }

    /// The candidate the planner would play, or `None` when nothing but the
    /// last-resort shot is left.
    pub fn choose(&self, layout: &Layout) -> Option<ShotCandidate> {
        let offensive = best(self.offensive_candidates(layout));
        let threshold = self.config.offensive_threshold();
        match offensive {
            Some(c) if c.score() >= threshold => Some(c),
            _ => best(evaluate_safeties(layout, &self.table, self.deceleration, &self.config)).or(offensive),
        }
    }

    /// Plan the next strike. `None` only when the target (or the cue ball)
    /// is not in play; otherwise a shot with finite angle and positive power
    /// is always returned.
    pub fn plan_shot(
        &self,
        cue: &BallView,
        target: &BallView,
        balls: &[BallView],
        pockets: &[Vec2],
        ball_radius: f32,
    ) -> Option<Shot> {
        if !target.in_game || !cue.in_game {
            return None;
        }
        let layout = Layout { cue: *cue, target: *target, balls, pockets, ball_radius };

        match self.choose(&layout) {
            Some(candidate) if candidate.shot().is_finite() => {
                log::debug!(
                    "planner: {} on the {}-ball, score {:.3}",
                    candidate.label(),
                    target.number,
                    candidate.score()
                );
                Some(candidate.shot())
            }
            _ => {
                log::debug!("planner: no candidate for the {}-ball, playing straight at it", target.number);
                Some(self.fallback(cue.pos, target.pos))
            }
        }
    }

    /// Soft shot straight at the target, just hard enough to get there.
    pub fn fallback(&self, cue: Vec2, target: Vec2) -> Shot {
        let angle = angle_between_points(cue, target);
        let gap = cue.distance(target) - 2.0 * self.table.ball_radius();
        let needed = power_to_reach(gap, self.deceleration, self.config.reach_margin);
        let power = self.config.fallback_power.max(needed).min(self.config.power_cap).max(0.1);
        Shot::new(if angle.is_finite() { angle } else { 0.0 }, power)
    }

    /// Choose where to drop the cue ball with ball in hand.
    pub fn place_cue_ball<R: rand::Rng + ?Sized>(
        &self,
        balls: &[BallView],
        target: Option<u8>,
        is_break: bool,
        rng: &mut R,
    ) -> Vec2 {
        choose_cue_position(&self.table, balls, target, is_break, &self.config, rng)
    }
}
