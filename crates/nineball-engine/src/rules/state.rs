//! The nine-ball rule engine: rack, ball-in-hand, strikes, shot resolution.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SimConfig;
use crate::core::ball::{Ball, BallView, Shot, Spin, CUE, NINE};
use crate::core::physics::{BallWorld, PhysicsEvent};
use crate::core::table::Table;
use crate::error::{EngineError, PlacementError};
use crate::rules::events::{MessageLog, TableEvent};
use crate::rules::fouls::{check_cue_ball, Foul};
use crate::rules::rack::{find_spot, rack_order, rack_positions};

/// A shot still rolling after this many ticks is stopped by force.
const MAX_FLIGHT_TICKS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// 0 or 1, for indexing per-player arrays.
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// 1 or 2, as shown to people.
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

/// Where the table is in the shot cycle. Resolution runs inside the tick
/// that brings the last ball to rest, so it never shows up as a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ball in hand: waiting for a legal cue-ball position.
    PlacingCueBall,
    /// Waiting for a strike.
    Aiming,
    /// Balls are moving.
    ShotInFlight,
}

/// Rule state visible to the presentation layer and the AI driver.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub phase: Phase,
    pub current_player: Player,
    /// Lowest-numbered object ball still on the table.
    pub current_target_ball: u8,
    /// Whether the last resolved shot was a foul.
    pub foul: bool,
    pub last_foul: Option<Foul>,
    /// Set when a frame ends; cleared once the next break is placed.
    pub game_over: bool,
    pub winner: Option<Player>,
    /// Cue-ball placement is limited to the kitchen until the break is played.
    pub is_initial_placement: bool,
    /// Object balls on the table when the current shot started.
    pub ball_left: u8,
    /// Frames won.
    pub scores: [u32; 2],
    /// Shots played this frame.
    pub shots: u32,
}

impl GameState {
    fn fresh(breaker: Player) -> Self {
        Self {
            phase: Phase::PlacingCueBall,
            current_player: breaker,
            current_target_ball: 1,
            foul: false,
            last_foul: None,
            game_over: false,
            winner: None,
            is_initial_placement: true,
            ball_left: NINE,
            scores: [0; 2],
            shots: 0,
        }
    }
}

/// A two-player game of nine-ball on one table.
pub struct NineBall {
    world: BallWorld,
    state: GameState,
    rng: StdRng,
    rack_gap: f32,
    max_power: f32,
    pending_spin: Spin,
    flight_ticks: u32,
    physics_events: Vec<PhysicsEvent>,
    events: Vec<TableEvent>,
    messages: MessageLog,
}

impl NineBall {
    pub fn new(config: &SimConfig) -> Self {
        let mut game = Self {
            world: BallWorld::new(&config.table, config.physics.clone()),
            state: GameState::fresh(Player::One),
            rng: StdRng::seed_from_u64(config.seed),
            rack_gap: config.table.rack_gap,
            max_power: config.table.max_power,
            pending_spin: Spin::NONE,
            flight_ticks: 0,
            physics_events: Vec::new(),
            events: Vec::new(),
            messages: MessageLog::default(),
        };
        game.rack(Player::One);
        game
    }

    // -- Accessors --

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn current_player(&self) -> Player {
        self.state.current_player
    }

    pub fn world(&self) -> &BallWorld {
        &self.world
    }

    pub fn table(&self) -> &Table {
        self.world.table()
    }

    pub fn balls(&self) -> &[Ball] {
        self.world.balls()
    }

    pub fn ball(&self, number: u8) -> Option<&Ball> {
        self.world.ball(number)
    }

    pub fn target_ball(&self) -> Option<&Ball> {
        self.world.ball(self.state.current_target_ball).filter(|b| b.in_game)
    }

    /// Read-only copies of every ball, for the planner.
    pub fn ball_views(&self) -> Vec<BallView> {
        self.world.balls().iter().map(BallView::from).collect()
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn pending_spin(&self) -> Spin {
        self.pending_spin
    }

    pub fn max_power(&self) -> f32 {
        self.max_power
    }

    /// Whether ball-in-hand is restricted to the kitchen right now.
    pub fn kitchen_only(&self) -> bool {
        self.state.is_initial_placement
    }

    /// Take every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.events)
    }

    // -- Commands --

    /// Start a new match: scores cleared, player one breaks.
    pub fn reset(&mut self) {
        self.state = GameState::fresh(Player::One);
        self.messages.clear();
        self.rack(Player::One);
    }

    /// Check a cue-ball drop without applying it.
    pub fn check_cue_position(&self, pos: Vec2) -> Result<(), PlacementError> {
        if self.state.phase != Phase::PlacingCueBall {
            return Err(PlacementError::NotPlacing);
        }
        self.table()
            .check_cue_position(pos, self.world.occupied_except(CUE), self.kitchen_only())
    }

    pub fn is_valid_cue_position(&self, pos: Vec2) -> bool {
        self.check_cue_position(pos).is_ok()
    }

    /// Drop the cue ball. Nothing changes when the position is refused.
    pub fn place_cue_ball(&mut self, pos: Vec2) -> Result<(), PlacementError> {
        self.check_cue_position(pos)?;
        if let Some(cue) = self.world.ball_mut(CUE) {
            cue.place(pos);
            cue.collision_order.clear();
        }
        self.state.phase = Phase::Aiming;
        self.state.game_over = false;
        log::info!("player {} placed the cue ball at ({:.1}, {:.1})", self.state.current_player.number(), pos.x, pos.y);
        self.events.push(TableEvent::CueBallPlaced { pos });
        Ok(())
    }

    /// Store spin for the next strike, scaled back onto the unit disc.
    pub fn set_spin(&mut self, top: f32, side: f32) {
        self.pending_spin = Spin { top, side }.clamped_to_disc();
    }

    /// Strike the cue ball. Power is capped at the table maximum.
    pub fn strike(&mut self, shot: Shot) -> Result<(), EngineError> {
        if self.state.phase != Phase::Aiming {
            return Err(EngineError::InvalidStrike("no shot can be played right now"));
        }
        if !shot.is_finite() {
            return Err(EngineError::InvalidStrike("angle and power must be finite"));
        }
        if shot.power <= 0.0 {
            return Err(EngineError::InvalidStrike("power must be positive"));
        }
        let shot = Shot {
            power: shot.power.min(self.max_power),
            spin: shot.spin.clamped_to_disc(),
            ..shot
        };
        if !self.world.strike_cue(&shot) {
            return Err(EngineError::InvalidStrike("cue ball is not on the table"));
        }

        self.state.ball_left = self.remaining();
        self.state.phase = Phase::ShotInFlight;
        self.state.shots += 1;
        self.pending_spin = Spin::NONE;
        self.flight_ticks = 0;
        log::info!(
            "player {} strikes: angle {:.3} power {:.1} spin ({:.2}, {:.2})",
            self.state.current_player.number(),
            shot.angle,
            shot.power,
            shot.spin.top,
            shot.spin.side
        );
        self.events.push(TableEvent::ShotTaken { player: self.state.current_player, power: shot.power });
        Ok(())
    }

    /// Advance one simulation tick. Only does work while a shot is in flight;
    /// the tick on which everything comes to rest also resolves the shot.
    pub fn tick(&mut self) {
        if self.state.phase != Phase::ShotInFlight {
            return;
        }
        self.world.step_into(&mut self.physics_events);
        for event in self.physics_events.drain(..) {
            if let PhysicsEvent::Pocketed { ball, pocket } = event {
                log::info!("ball {} pocketed (pocket {})", ball, pocket);
            }
            self.events.push(TableEvent::from_physics(event));
        }

        self.flight_ticks += 1;
        if self.flight_ticks >= MAX_FLIGHT_TICKS && !self.world.all_at_rest() {
            log::warn!("shot still moving after {} ticks; stopping all balls", self.flight_ticks);
            for ball in self.world.balls_mut() {
                ball.vel = Vec2::ZERO;
                ball.spin = Spin::NONE;
            }
        }

        if self.world.all_at_rest() {
            self.resolve_shot();
        }
    }

    // -- Internals --

    /// Object balls still on the table.
    fn remaining(&self) -> u8 {
        self.world.in_play().filter(|b| b.number != CUE).count() as u8
    }

    fn lowest_in_play(&self) -> Option<u8> {
        self.world
            .in_play()
            .map(|b| b.number)
            .filter(|&n| n != CUE)
            .min()
    }

    /// Rack all nine object balls with `breaker` to play. Scores and the
    /// frame result survive.
    fn rack(&mut self, breaker: Player) {
        let table = self.world.table();
        let radius = table.ball_radius();
        let head_spot = table.head_spot();
        let slots = rack_positions(table.foot_spot(), radius, self.rack_gap);
        let mass = self.world.physics().ball_mass;
        let order = rack_order(&mut self.rng);

        let mut objects: Vec<Ball> = order
            .iter()
            .zip(slots)
            .map(|(&number, pos)| Ball::new(number, pos, radius, mass))
            .collect();
        objects.sort_by_key(|b| b.number);

        let mut cue = Ball::new(CUE, head_spot, radius, mass);
        cue.remove();
        let mut balls = Vec::with_capacity(10);
        balls.push(cue);
        balls.extend(objects);
        self.world.set_balls(balls);

        self.state.phase = Phase::PlacingCueBall;
        self.state.current_player = breaker;
        self.state.current_target_ball = 1;
        self.state.foul = false;
        self.state.last_foul = None;
        self.state.is_initial_placement = true;
        self.state.ball_left = NINE;
        self.state.shots = 0;
        self.pending_spin = Spin::NONE;
        log::info!("new rack, player {} to break", breaker.number());
        self.events.push(TableEvent::NewRack);
    }

    fn resolve_shot(&mut self) {
        let player = self.state.current_player;
        let target = self.state.current_target_ball;
        let foul = match self.world.cue_ball() {
            Some(cue) => check_cue_ball(cue, target),
            None => Some(Foul::CueBallPocketed),
        };
        let nine_down = self.world.ball(NINE).map_or(false, |b| !b.in_game);
        let pocketed_any = self.remaining() < self.state.ball_left;

        self.state.is_initial_placement = false;

        match foul {
            Some(foul) => {
                self.state.foul = true;
                self.state.last_foul = Some(foul);
                log::info!("foul by player {}: {}", player.number(), foul);
                self.messages.push(format!("Foul by player {}: {}", player.number(), foul));
                self.events.push(TableEvent::Foul { player, foul });

                // Ball in hand for the opponent.
                if let Some(cue) = self.world.ball_mut(CUE) {
                    cue.remove();
                }
                if nine_down {
                    self.spot_ball(NINE, self.table().foot_spot());
                }
                self.switch_turn();
                self.state.phase = Phase::PlacingCueBall;
            }
            None if nine_down => {
                self.finish_frame(player);
                return;
            }
            None => {
                self.state.foul = false;
                self.state.last_foul = None;
                if !pocketed_any {
                    self.switch_turn();
                }
                self.state.phase = Phase::Aiming;
            }
        }

        if let Some(cue) = self.world.ball_mut(CUE) {
            cue.collision_order.clear();
        }
        self.state.ball_left = self.remaining();
        self.update_target();
    }

    fn finish_frame(&mut self, winner: Player) {
        self.state.scores[winner.index()] += 1;
        self.state.game_over = true;
        self.state.winner = Some(winner);
        self.state.foul = false;
        self.state.last_foul = None;
        log::info!(
            "player {} wins the frame ({} - {})",
            winner.number(),
            self.state.scores[0],
            self.state.scores[1]
        );
        self.messages.push(format!("Player {} wins!", winner.number()));
        self.events.push(TableEvent::FrameWon { winner, scores: self.state.scores });
        // Winner breaks.
        self.rack(winner);
    }

    /// Return a pocketed ball to the table at `home`, or the nearest free spot.
    fn spot_ball(&mut self, number: u8, home: Vec2) {
        let radius = self.table().ball_radius();
        let occupied: Vec<Vec2> = self
            .world
            .in_play()
            .filter(|b| b.number != number)
            .map(|b| b.pos)
            .collect();
        let pos = match find_spot(self.table(), home, &occupied, radius) {
            Some(pos) => pos,
            None => {
                log::warn!("no free spot for ball {}; placing at its home position", number);
                self.table().clamp_to_surface(home)
            }
        };
        if let Some(ball) = self.world.ball_mut(number) {
            ball.place(pos);
        }
        log::info!("ball {} spotted at ({:.1}, {:.1})", number, pos.x, pos.y);
        self.messages.push(format!("{}-ball spotted", number));
        self.events.push(TableEvent::BallSpotted { ball: number, pos });
    }

    fn switch_turn(&mut self) {
        let next = self.state.current_player.other();
        self.state.current_player = next;
        log::info!("turn passes to player {}", next.number());
        self.messages.push(format!("Player {}'s turn", next.number()));
        self.events.push(TableEvent::TurnChanged { player: next });
    }

    fn update_target(&mut self) {
        if let Some(lowest) = self.lowest_in_play() {
            if lowest != self.state.current_target_ball {
                self.state.current_target_ball = lowest;
                self.events.push(TableEvent::TargetChanged { ball: lowest });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    /// Put the listed balls at fixed spots, take every other object ball off
    /// the table and hand the shot to the current player.
    fn arrange(game: &mut NineBall, cue: Vec2, layout: &[(u8, Vec2)]) {
        for ball in game.world.balls_mut() {
            if ball.number == CUE {
                ball.place(cue);
            } else if let Some(&(_, pos)) = layout.iter().find(|(n, _)| *n == ball.number) {
                ball.place(pos);
            } else {
                ball.remove();
            }
        }
        game.state.phase = Phase::Aiming;
        game.state.is_initial_placement = false;
        game.state.ball_left = game.remaining();
        game.update_target();
        game.drain_events();
    }

    fn play_out(game: &mut NineBall) {
        for _ in 0..20_000 {
            game.tick();
            if game.phase() != Phase::ShotInFlight {
                return;
            }
        }
        panic!("shot never came to rest");
    }

    fn shoot_down(game: &mut NineBall, power: f32) {
        game.strike(Shot::new(FRAC_PI_2, power)).unwrap();
        play_out(game);
    }

    #[test]
    fn new_game_starts_with_kitchen_placement() {
        let game = NineBall::new(&SimConfig::default());
        assert_eq!(game.phase(), Phase::PlacingCueBall);
        assert!(game.kitchen_only());
        assert_eq!(game.state().current_target_ball, 1);
        assert_eq!(game.world().in_play().count(), 9, "nine object balls, cue in hand");
        assert!(!game.is_valid_cue_position(Vec2::new(400.0, 200.0)));
        assert!(game.is_valid_cue_position(game.table().head_spot()));
    }

    #[test]
    fn refused_placement_changes_nothing() {
        let mut game = NineBall::new(&SimConfig::default());
        let before = game.balls().to_vec();
        let err = game.place_cue_ball(Vec2::new(500.0, 200.0)).unwrap_err();
        assert_eq!(err, PlacementError::OutsideKitchen);
        assert_eq!(game.balls(), &before[..]);
        assert_eq!(game.phase(), Phase::PlacingCueBall);
    }

    #[test]
    fn strike_requires_aiming() {
        let mut game = NineBall::new(&SimConfig::default());
        assert!(matches!(game.strike(Shot::new(0.0, 10.0)), Err(EngineError::InvalidStrike(_))));
        game.place_cue_ball(game.table().head_spot()).unwrap();
        assert!(game.strike(Shot::new(0.0, f32::NAN)).is_err());
        assert!(game.strike(Shot::new(0.0, -1.0)).is_err());
        assert!(game.strike(Shot::new(0.0, 50.0)).is_ok());
        assert_eq!(game.phase(), Phase::ShotInFlight);
    }

    #[test]
    fn break_resolves_and_clears_initial_placement() {
        let mut game = NineBall::new(&SimConfig::default());
        game.place_cue_ball(game.table().head_spot()).unwrap();
        game.strike(Shot::new(0.0, 20.0)).unwrap();
        play_out(&mut game);
        assert!(!game.kitchen_only() || game.state().game_over);
        assert!(matches!(game.phase(), Phase::Aiming | Phase::PlacingCueBall));
        for ball in game.world().in_play() {
            assert!(game.table().contains(ball.pos), "ball {} off table", ball.number);
        }
    }

    #[test]
    fn legal_pot_keeps_the_turn() {
        let mut game = NineBall::new(&SimConfig::default());
        arrange(
            &mut game,
            Vec2::new(400.0, 250.0),
            &[(1, Vec2::new(400.0, 340.0)), (9, Vec2::new(650.0, 100.0))],
        );
        shoot_down(&mut game, 6.0);
        assert!(!game.state().foul);
        assert!(!game.ball(1).unwrap().in_game);
        assert_eq!(game.current_player(), Player::One);
        assert_eq!(game.state().current_target_ball, 9);
        assert_eq!(game.state().ball_left, 1);
        assert_eq!(game.phase(), Phase::Aiming);
    }

    #[test]
    fn legal_miss_passes_the_turn() {
        let mut game = NineBall::new(&SimConfig::default());
        arrange(
            &mut game,
            Vec2::new(300.0, 200.0),
            &[(1, Vec2::new(400.0, 200.0)), (9, Vec2::new(650.0, 100.0))],
        );
        game.strike(Shot::new(0.0, 4.0)).unwrap();
        play_out(&mut game);
        assert!(!game.state().foul);
        assert_eq!(game.current_player(), Player::Two);
        assert_eq!(game.phase(), Phase::Aiming);
        assert!(game.drain_events().iter().any(|e| matches!(e, TableEvent::TurnChanged { player: Player::Two })));
    }

    #[test]
    fn wrong_ball_first_gives_ball_in_hand() {
        let mut game = NineBall::new(&SimConfig::default());
        arrange(
            &mut game,
            Vec2::new(400.0, 250.0),
            &[(1, Vec2::new(100.0, 100.0)), (2, Vec2::new(400.0, 300.0)), (9, Vec2::new(650.0, 100.0))],
        );
        shoot_down(&mut game, 3.0);
        assert!(game.state().foul);
        assert_eq!(game.state().last_foul, Some(Foul::WrongBallFirst { expected: 1, hit: 2 }));
        assert_eq!(game.current_player(), Player::Two);
        assert_eq!(game.phase(), Phase::PlacingCueBall);
        assert!(!game.ball(CUE).unwrap().in_game);
        // Anywhere on the table after the break
        assert!(game.place_cue_ball(Vec2::new(500.0, 150.0)).is_ok());
    }

    #[test]
    fn nine_on_a_foul_is_spotted() {
        let mut game = NineBall::new(&SimConfig::default());
        arrange(
            &mut game,
            Vec2::new(400.0, 250.0),
            &[(1, Vec2::new(100.0, 100.0)), (9, Vec2::new(400.0, 340.0))],
        );
        shoot_down(&mut game, 6.0);
        assert!(game.state().foul);
        assert!(!game.state().game_over);
        let nine = game.ball(NINE).unwrap();
        assert!(nine.in_game, "9-ball should be back on the table");
        assert_eq!(nine.pos, game.table().foot_spot());
        assert_eq!(game.state().ball_left, 2);
    }

    #[test]
    fn legal_nine_wins_and_winner_breaks() {
        let mut game = NineBall::new(&SimConfig::default());
        game.state.current_player = Player::Two;
        arrange(&mut game, Vec2::new(400.0, 250.0), &[(9, Vec2::new(400.0, 340.0))]);
        assert_eq!(game.state().current_target_ball, 9);
        shoot_down(&mut game, 6.0);
        let state = game.state();
        assert!(state.game_over);
        assert_eq!(state.winner, Some(Player::Two));
        assert_eq!(state.scores, [0, 1]);
        assert_eq!(state.current_player, Player::Two);
        assert!(state.is_initial_placement);
        assert_eq!(state.phase, Phase::PlacingCueBall);
        assert_eq!(game.world().in_play().count(), 9);
        assert_eq!(game.messages().latest(), Some("Player 2 wins!"));

        game.place_cue_ball(game.table().head_spot()).unwrap();
        assert!(!game.state().game_over);
        assert_eq!(game.state().scores, [0, 1], "scores survive the new rack");
    }

    #[test]
    fn scratch_is_a_foul() {
        let mut game = NineBall::new(&SimConfig::default());
        arrange(
            &mut game,
            Vec2::new(400.0, 300.0),
            &[(1, Vec2::new(100.0, 100.0)), (9, Vec2::new(650.0, 100.0))],
        );
        shoot_down(&mut game, 8.0);
        assert_eq!(game.state().last_foul, Some(Foul::CueBallPocketed));
        assert_eq!(game.phase(), Phase::PlacingCueBall);
    }

    #[cfg(feature = "ai")]
    #[test]
    fn planned_shots_always_reach_a_ball() {
        use crate::ai::ShotPlanner;

        let config = SimConfig::default();
        let planner = ShotPlanner::from_config(&config);
        let layouts: [(Vec2, Vec<(u8, Vec2)>); 5] = [
            // Far target, diagonal.
            (Vec2::new(100.0, 100.0), vec![(1, Vec2::new(700.0, 300.0)), (9, Vec2::new(300.0, 330.0))]),
            // Full length with a ball in the way and both kicks through side-pocket mouths.
            (
                Vec2::new(100.0, 200.0),
                vec![(1, Vec2::new(700.0, 200.0)), (5, Vec2::new(400.0, 200.0)), (9, Vec2::new(250.0, 330.0))],
            ),
            // Hidden target with a kick off either long rail.
            (
                Vec2::new(200.0, 200.0),
                vec![(1, Vec2::new(400.0, 200.0)), (7, Vec2::new(300.0, 200.0)), (9, Vec2::new(600.0, 330.0))],
            ),
            // Corner to corner.
            (Vec2::new(60.0, 340.0), vec![(2, Vec2::new(740.0, 60.0)), (9, Vec2::new(400.0, 330.0))]),
            // Short and open.
            (Vec2::new(300.0, 250.0), vec![(1, Vec2::new(450.0, 180.0)), (9, Vec2::new(600.0, 330.0))]),
        ];

        for (cue, balls) in &layouts {
            let mut game = NineBall::new(&config);
            arrange(&mut game, *cue, balls);
            let views = game.ball_views();
            let cue_view = BallView::from(game.ball(CUE).unwrap());
            let target = BallView::from(game.target_ball().unwrap());
            let pockets = game.table().pocket_centers();
            let shot = planner
                .plan_shot(&cue_view, &target, &views, &pockets, game.table().ball_radius())
                .unwrap();

            game.strike(shot).unwrap();
            play_out(&mut game);
            assert_ne!(
                game.state().last_foul,
                Some(Foul::NoContact),
                "cue at {:?} played {:?} and touched nothing",
                cue,
                shot
            );
        }
    }

    #[test]
    fn spin_input_clamps_to_disc() {
        let mut game = NineBall::new(&SimConfig::default());
        game.set_spin(3.0, 3.0);
        let s = game.pending_spin();
        assert!((s.top * s.top + s.side * s.side).sqrt() <= 1.0 + 1e-6);
        assert!((s.top - s.side).abs() < 1e-6);
    }

    #[test]
    fn reset_clears_scores() {
        let mut game = NineBall::new(&SimConfig::default());
        game.state.scores = [3, 2];
        game.reset();
        assert_eq!(game.state().scores, [0, 0]);
        assert_eq!(game.phase(), Phase::PlacingCueBall);
    }
}
