//! Computer player: waits a few ticks, then drops the cue ball or strikes.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use nineball_engine::rules::rack::find_spot;
use nineball_engine::{BallView, NineBall, Phase, ShotPlanner, SimConfig, CUE};

/// Ticks the opponent "thinks" before each action, so a viewer can follow.
pub const DEFAULT_THINK_TICKS: u32 = 45;

/// What the opponent did this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Placed(Vec2),
    Struck { angle: f32, power: f32 },
}

pub struct Opponent {
    planner: ShotPlanner,
    rng: StdRng,
    think_ticks: u32,
    waited: u32,
    /// Phase and player of the decision being waited on.
    pending: Option<(Phase, u8)>,
}

impl Opponent {
    pub fn new(config: &SimConfig, game: &NineBall) -> Self {
        Self {
            planner: ShotPlanner::new(game.table().clone(), config.table.deceleration, config.ai.clone()),
            // Separate stream from the rack shuffle.
            rng: StdRng::seed_from_u64(config.seed.wrapping_add(1)),
            think_ticks: DEFAULT_THINK_TICKS,
            waited: 0,
            pending: None,
        }
    }

    pub fn with_think_ticks(mut self, ticks: u32) -> Self {
        self.think_ticks = ticks;
        self
    }

    /// Forget a half-finished wait, e.g. after a reset.
    pub fn cancel(&mut self) {
        self.waited = 0;
        self.pending = None;
    }

    /// Advance the opponent by one tick. Acts on `game` once the think time
    /// for the current decision has passed.
    pub fn update(&mut self, game: &mut NineBall) -> Option<Action> {
        let phase = game.phase();
        if phase == Phase::ShotInFlight {
            self.cancel();
            return None;
        }

        let key = (phase, game.current_player().number());
        if self.pending != Some(key) {
            self.pending = Some(key);
            self.waited = 0;
        }
        if self.waited < self.think_ticks {
            self.waited += 1;
            return None;
        }
        self.cancel();

        match phase {
            Phase::PlacingCueBall => self.place(game),
            Phase::Aiming => self.shoot(game),
            Phase::ShotInFlight => None,
        }
    }

    fn place(&mut self, game: &mut NineBall) -> Option<Action> {
        let views = game.ball_views();
        let target = game.target_ball().map(|b| b.number);
        let pos = self.planner.place_cue_ball(&views, target, game.kitchen_only(), &mut self.rng);

        match game.place_cue_ball(pos) {
            Ok(()) => Some(Action::Placed(pos)),
            Err(err) => {
                log::warn!("opponent placement at ({:.1}, {:.1}) refused: {}", pos.x, pos.y, err);
                // Walk from the head rail toward the foot; the kitchen comes first.
                let table = game.table();
                let occupied: Vec<Vec2> = views
                    .iter()
                    .filter(|b| b.in_game && b.number != CUE)
                    .map(|b| b.pos)
                    .collect();
                let home = Vec2::new(table.min_center().x, table.center().y);
                let spot = find_spot(table, home, &occupied, table.ball_radius())?;
                game.place_cue_ball(spot).ok().map(|()| Action::Placed(spot))
            }
        }
    }

    fn shoot(&mut self, game: &mut NineBall) -> Option<Action> {
        let cue = BallView::from(game.ball(CUE)?);
        let Some(target) = game.target_ball().map(BallView::from) else {
            log::warn!("opponent has no target ball in play");
            return None;
        };
        let views = game.ball_views();
        let table = game.table();
        let pockets = table.pocket_centers();
        let shot = self
            .planner
            .plan_shot(&cue, &target, &views, &pockets, table.ball_radius())?;

        match game.strike(shot) {
            Ok(()) => Some(Action::Struck { angle: shot.angle, power: shot.power }),
            Err(err) => {
                log::warn!("opponent strike refused: {}", err);
                None
            }
        }
    }
}
