use bytemuck::{Pod, Zeroable};

use crate::api::types::{GameEvent, SoundEvent};
use crate::bridge::protocol::*;
use crate::core::ball::Ball;
use crate::rules::state::{NineBall, Phase};

/// Per-ball data written to SharedArrayBuffer for the TypeScript renderer.
/// Must match the TypeScript protocol: 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BallInstance {
    pub number: f32,
    pub x: f32,
    pub y: f32,
    /// Velocity in table units per tick.
    pub vx: f32,
    pub vy: f32,
    pub top_spin: f32,
    pub side_spin: f32,
    /// 1.0 on the table, 0.0 pocketed or in hand.
    pub in_game: f32,
}

impl BallInstance {
    pub const FLOATS: usize = BALL_FLOATS;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

impl From<&Ball> for BallInstance {
    fn from(ball: &Ball) -> Self {
        Self {
            number: ball.number as f32,
            x: ball.pos.x,
            y: ball.pos.y,
            vx: ball.vel.x,
            vy: ball.vel.y,
            top_spin: ball.spin.top,
            side_spin: ball.spin.side,
            in_game: if ball.in_game { 1.0 } else { 0.0 },
        }
    }
}

/// Rule state as the header carries it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TableStatus {
    /// 0 placing the cue ball, 1 aiming, 2 shot in flight.
    pub phase: f32,
    /// 1 or 2.
    pub player: f32,
    pub target_ball: f32,
    pub foul: f32,
    pub game_over: f32,
    /// 0 while the frame is undecided.
    pub winner: f32,
    pub kitchen_only: f32,
    pub ball_left: f32,
    pub scores: [f32; 2],
    pub spin_top: f32,
    pub spin_side: f32,
    pub max_power: f32,
}

fn flag(b: bool) -> f32 {
    if b {
        1.0
    } else {
        0.0
    }
}

impl TableStatus {
    pub fn from_game(game: &NineBall) -> Self {
        let state = game.state();
        let spin = game.pending_spin();
        Self {
            phase: match state.phase {
                Phase::PlacingCueBall => 0.0,
                Phase::Aiming => 1.0,
                Phase::ShotInFlight => 2.0,
            },
            player: state.current_player.number() as f32,
            target_ball: state.current_target_ball as f32,
            foul: flag(state.foul),
            game_over: flag(state.game_over),
            winner: state.winner.map_or(0.0, |p| p.number() as f32),
            kitchen_only: flag(game.kitchen_only()),
            ball_left: state.ball_left as f32,
            scores: [state.scores[0] as f32, state.scores[1] as f32],
            spin_top: spin.top,
            spin_side: spin.side,
            max_power: game.max_power(),
        }
    }
}

/// Snapshot of the table written during the render pass.
pub struct StateBuffer {
    balls: Vec<BallInstance>,
    capacity: usize,
    pub status: TableStatus,
}

impl StateBuffer {
    pub fn with_capacity(max_balls: usize) -> Self {
        Self {
            balls: Vec::with_capacity(max_balls),
            capacity: max_balls,
            status: TableStatus::default(),
        }
    }

    pub fn clear(&mut self) {
        self.balls.clear();
        self.status = TableStatus::default();
    }

    /// Add a ball. Returns false once the buffer is full.
    pub fn push(&mut self, ball: BallInstance) -> bool {
        if self.balls.len() >= self.capacity {
            return false;
        }
        self.balls.push(ball);
        true
    }

    /// Replace the contents with the given game's balls and status.
    pub fn write_table(&mut self, game: &NineBall) {
        self.clear();
        for ball in game.balls() {
            if !self.push(BallInstance::from(ball)) {
                log::warn!("state buffer full at {} balls", self.capacity);
                break;
            }
        }
        self.status = TableStatus::from_game(game);
    }

    pub fn balls(&self) -> &[BallInstance] {
        &self.balls
    }

    pub fn ball_count(&self) -> u32 {
        self.balls.len() as u32
    }

    /// Raw pointer to ball data for SharedArrayBuffer reads.
    pub fn balls_ptr(&self) -> *const f32 {
        self.balls.as_ptr() as *const f32
    }

    /// Lay the snapshot, this frame's sounds and events out as one flat
    /// buffer in protocol order. Entries past a section's capacity are dropped.
    pub fn pack(
        &self,
        layout: &ProtocolLayout,
        world: (f32, f32),
        frame: u64,
        sounds: &[SoundEvent],
        events: &[GameEvent],
        out: &mut Vec<f32>,
    ) {
        out.clear();
        out.resize(layout.buffer_total_floats, 0.0);

        let balls = &self.balls[..self.balls.len().min(layout.max_balls)];
        let sounds = &sounds[..sounds.len().min(layout.max_sounds)];
        let events = &events[..events.len().min(layout.max_events)];

        // -- Header --
        let s = &self.status;
        out[HEADER_LOCK] = 0.0;
        out[HEADER_FRAME_COUNTER] = frame as f32;
        out[HEADER_MAX_BALLS] = layout.max_balls as f32;
        out[HEADER_BALL_COUNT] = balls.len() as f32;
        out[HEADER_MAX_SOUNDS] = layout.max_sounds as f32;
        out[HEADER_SOUND_COUNT] = sounds.len() as f32;
        out[HEADER_MAX_EVENTS] = layout.max_events as f32;
        out[HEADER_EVENT_COUNT] = events.len() as f32;
        out[HEADER_WORLD_WIDTH] = world.0;
        out[HEADER_WORLD_HEIGHT] = world.1;
        out[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        out[HEADER_PHASE] = s.phase;
        out[HEADER_PLAYER] = s.player;
        out[HEADER_TARGET_BALL] = s.target_ball;
        out[HEADER_FOUL] = s.foul;
        out[HEADER_GAME_OVER] = s.game_over;
        out[HEADER_WINNER] = s.winner;
        out[HEADER_KITCHEN_ONLY] = s.kitchen_only;
        out[HEADER_BALL_LEFT] = s.ball_left;
        out[HEADER_SCORE_ONE] = s.scores[0];
        out[HEADER_SCORE_TWO] = s.scores[1];
        out[HEADER_SPIN_TOP] = s.spin_top;
        out[HEADER_SPIN_SIDE] = s.spin_side;
        out[HEADER_MAX_POWER] = s.max_power;

        // -- Sections --
        let ball_floats: &[f32] = bytemuck::cast_slice(balls);
        let start = layout.ball_data_offset;
        out[start..start + ball_floats.len()].copy_from_slice(ball_floats);

        let start = layout.sound_data_offset;
        for (slot, sound) in out[start..start + sounds.len()].iter_mut().zip(sounds) {
            *slot = sound.0 as f32;
        }

        let event_floats: &[f32] = bytemuck::cast_slice(events);
        let start = layout.event_data_offset;
        out[start..start + event_floats.len()].copy_from_slice(event_floats);
    }
}

impl Default for StateBuffer {
    fn default() -> Self {
        Self::with_capacity(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::core::ball::CUE;

    #[test]
    fn ball_instance_is_8_floats() {
        assert_eq!(std::mem::size_of::<BallInstance>(), BallInstance::STRIDE_BYTES);
    }

    #[test]
    fn snapshot_of_a_fresh_rack() {
        let game = NineBall::new(&SimConfig::default());
        let mut buf = StateBuffer::default();
        buf.write_table(&game);

        assert_eq!(buf.ball_count(), 10);
        let cue = buf.balls().iter().find(|b| b.number == CUE as f32).unwrap();
        assert_eq!(cue.in_game, 0.0, "cue ball starts in hand");
        assert_eq!(buf.status.phase, 0.0);
        assert_eq!(buf.status.player, 1.0);
        assert_eq!(buf.status.target_ball, 1.0);
        assert_eq!(buf.status.kitchen_only, 1.0);
        assert_eq!(buf.status.winner, 0.0);
    }

    #[test]
    fn full_buffer_refuses_more() {
        let mut buf = StateBuffer::with_capacity(1);
        assert!(buf.push(BallInstance::default()));
        assert!(!buf.push(BallInstance::default()));
        assert_eq!(buf.ball_count(), 1);
    }

    #[test]
    fn pack_writes_sections_at_their_offsets() {
        let game = NineBall::new(&SimConfig::default());
        let mut buf = StateBuffer::default();
        buf.write_table(&game);

        let layout = ProtocolLayout::new(16, 4, 2);
        let sounds = [SoundEvent(2), SoundEvent(5)];
        let events = [
            GameEvent::new(1.0, 0.0, 0.0, 0.0),
            GameEvent::new(2.0, 3.0, 4.0, 5.0),
            GameEvent::new(9.0, 9.0, 9.0, 9.0),
        ];
        let mut out = Vec::new();
        buf.pack(&layout, (800.0, 400.0), 7, &sounds, &events, &mut out);

        assert_eq!(out.len(), layout.buffer_total_floats);
        assert_eq!(out[HEADER_FRAME_COUNTER], 7.0);
        assert_eq!(out[HEADER_BALL_COUNT], 10.0);
        assert_eq!(out[HEADER_SOUND_COUNT], 2.0);
        assert_eq!(out[HEADER_EVENT_COUNT], 2.0, "events past capacity are dropped");
        assert_eq!(out[HEADER_WORLD_WIDTH], 800.0);
        assert_eq!(out[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);

        let first = &out[layout.ball_data_offset..layout.ball_data_offset + BALL_FLOATS];
        assert_eq!(first[0], buf.balls()[0].number);
        assert_eq!(first[1], buf.balls()[0].x);

        assert_eq!(&out[layout.sound_data_offset..layout.sound_data_offset + 2], &[2.0, 5.0]);
        let e = layout.event_data_offset + EVENT_FLOATS;
        assert_eq!(&out[e..e + 4], &[2.0, 3.0, 4.0, 5.0]);
    }
}
