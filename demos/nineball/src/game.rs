//! Nine-ball for two seats, each a person at the browser or the computer.
//! The engine does the physics and the rules; this file routes commands,
//! runs the computer opponent and forwards table events to the host.

use glam::Vec2;
use nineball_engine::api::game::GameConfig;
use nineball_engine::input::queue::{InputEvent, InputQueue};
use nineball_engine::{EngineContext, EngineError, Game, NineBall, Player, RenderContext, Shot, SimConfig};

use crate::opponent::{Action, Opponent};

/// Who plays a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    Human,
    Computer,
}

pub struct NineBallGame {
    config: SimConfig,
    table: NineBall,
    seats: [Seat; 2],
    opponent: Opponent,
}

impl NineBallGame {
    /// Player one at the browser, player two the computer.
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    pub fn with_config(config: SimConfig) -> Self {
        let table = NineBall::new(&config);
        let opponent = Opponent::new(&config, &table);
        Self {
            config,
            table,
            seats: [Seat::Human, Seat::Computer],
            opponent,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(Self::with_config(SimConfig::from_json(json)?))
    }

    pub fn with_seats(mut self, one: Seat, two: Seat) -> Self {
        self.seats = [one, two];
        self
    }

    pub fn with_think_ticks(mut self, ticks: u32) -> Self {
        self.opponent = self.opponent.with_think_ticks(ticks);
        self
    }

    pub fn table(&self) -> &NineBall {
        &self.table
    }

    pub fn seat(&self, player: Player) -> Seat {
        self.seats[player.index()]
    }

    fn human_to_play(&self) -> bool {
        self.seat(self.table.current_player()) == Seat::Human
    }

    fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Reset => {
                log::info!("match reset");
                self.table.reset();
                self.opponent.cancel();
            }
            InputEvent::SetSpin { top, side } => self.table.set_spin(top, side),
            InputEvent::PlaceCueBall { x, y } => {
                if !self.human_to_play() {
                    log::debug!("ignoring cue-ball drop on the computer's turn");
                    return;
                }
                if let Err(err) = self.table.place_cue_ball(Vec2::new(x, y)) {
                    log::debug!("cue-ball drop at ({:.1}, {:.1}) refused: {}", x, y, err);
                }
            }
            InputEvent::Strike { angle, power } => {
                if !self.human_to_play() {
                    log::debug!("ignoring strike on the computer's turn");
                    return;
                }
                let shot = Shot::new(angle, power).with_spin(self.table.pending_spin());
                if let Err(err) = self.table.strike(shot) {
                    log::debug!("strike refused: {}", err);
                }
            }
        }
    }
}

impl Default for NineBallGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for NineBallGame {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: self.config.table.width,
            world_height: self.config.table.height,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        for event in self.table.drain_events() {
            ctx.emit_table_event(event);
        }
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            self.apply(*event);
        }

        if !self.human_to_play() {
            match self.opponent.update(&mut self.table) {
                Some(Action::Placed(pos)) => log::debug!("computer placed at ({:.1}, {:.1})", pos.x, pos.y),
                Some(Action::Struck { angle, power }) => log::debug!("computer strikes {:.3} @ {:.1}", angle, power),
                None => {}
            }
        }

        self.table.tick();
        for event in self.table.drain_events() {
            ctx.emit_table_event(event);
        }
    }

    fn render(&self, ctx: &mut RenderContext) {
        ctx.state.write_table(&self.table);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nineball_engine::{Phase, TableEvent, CUE};

    #[test]
    fn human_commands_drive_the_table() {
        let mut game = NineBallGame::new().with_seats(Seat::Human, Seat::Human);
        let mut ctx = EngineContext::new();
        game.init(&mut ctx);
        assert!(ctx.table_events.contains(&TableEvent::NewRack));

        let mut input = InputQueue::new();
        input.push(InputEvent::PlaceCueBall { x: 100.0, y: 200.0 });
        input.push(InputEvent::SetSpin { top: 0.5, side: 0.0 });
        input.push(InputEvent::Strike { angle: 0.0, power: 12.0 });
        ctx.clear_frame_data();
        game.update(&mut ctx, &input);

        assert_eq!(game.table().phase(), Phase::ShotInFlight);
        assert!(ctx
            .table_events
            .iter()
            .any(|e| matches!(e, TableEvent::ShotTaken { player: Player::One, .. })));
        let cue = game.table().ball(CUE).unwrap();
        assert!(cue.spin.top > 0.0, "pending spin went with the strike");
    }

    #[test]
    fn refused_drop_changes_nothing() {
        let mut game = NineBallGame::new();
        let mut ctx = EngineContext::new();
        let mut input = InputQueue::new();
        // Past the head string before the break.
        input.push(InputEvent::PlaceCueBall { x: 500.0, y: 200.0 });
        game.update(&mut ctx, &input);
        assert_eq!(game.table().phase(), Phase::PlacingCueBall);
        assert!(!game.table().ball(CUE).unwrap().in_game);
    }

    #[test]
    fn commands_ignored_on_the_computers_turn() {
        let mut game = NineBallGame::new()
            .with_seats(Seat::Computer, Seat::Human)
            .with_think_ticks(1_000);
        let mut ctx = EngineContext::new();
        let mut input = InputQueue::new();
        input.push(InputEvent::PlaceCueBall { x: 100.0, y: 200.0 });
        game.update(&mut ctx, &input);
        assert_eq!(game.table().phase(), Phase::PlacingCueBall);
    }

    #[test]
    fn reset_clears_the_match() {
        let mut game = NineBallGame::new().with_seats(Seat::Human, Seat::Human);
        let mut ctx = EngineContext::new();
        let mut input = InputQueue::new();
        input.push(InputEvent::PlaceCueBall { x: 100.0, y: 200.0 });
        game.update(&mut ctx, &input);
        assert_eq!(game.table().phase(), Phase::Aiming);

        let mut input = InputQueue::new();
        input.push(InputEvent::Reset);
        game.update(&mut ctx, &input);
        assert_eq!(game.table().phase(), Phase::PlacingCueBall);
        assert_eq!(game.table().state().scores, [0, 0]);
        assert!(game.table().kitchen_only());
    }

    #[test]
    fn computer_against_computer_keeps_playing() {
        let mut game = NineBallGame::new()
            .with_seats(Seat::Computer, Seat::Computer)
            .with_think_ticks(0);
        let mut ctx = EngineContext::new();
        game.init(&mut ctx);
        let input = InputQueue::new();

        let mut shots = 0;
        for _ in 0..60_000 {
            ctx.clear_frame_data();
            game.update(&mut ctx, &input);
            shots += ctx
                .table_events
                .iter()
                .filter(|e| matches!(e, TableEvent::ShotTaken { .. }))
                .count();

            let table = game.table().table();
            for ball in game.table().balls().iter().filter(|b| b.in_game) {
                assert!(table.contains(ball.pos), "ball {} left the table at {:?}", ball.number, ball.pos);
            }
            if shots >= 12 {
                break;
            }
        }
        assert!(shots >= 12, "only {} shots played", shots);
        let state = game.table().state();
        assert!(state.current_target_ball >= 1 && state.current_target_ball <= 9);
    }
}
