/// SharedArrayBuffer layout.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 24 floats]
/// [Balls: max_balls × 8 floats]
/// [Sounds: max_sounds × 1 float]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written into the header every frame.
/// TypeScript reads them from the header to compute offsets.

use crate::api::game::GameConfig;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 24;

/// Header field indices: buffer bookkeeping.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_BALLS: usize = 2;
pub const HEADER_BALL_COUNT: usize = 3;
pub const HEADER_MAX_SOUNDS: usize = 4;
pub const HEADER_SOUND_COUNT: usize = 5;
pub const HEADER_MAX_EVENTS: usize = 6;
pub const HEADER_EVENT_COUNT: usize = 7;
pub const HEADER_WORLD_WIDTH: usize = 8;
pub const HEADER_WORLD_HEIGHT: usize = 9;
pub const HEADER_PROTOCOL_VERSION: usize = 10;

/// Header field indices: table status.
pub const HEADER_PHASE: usize = 11;
pub const HEADER_PLAYER: usize = 12;
pub const HEADER_TARGET_BALL: usize = 13;
pub const HEADER_FOUL: usize = 14;
pub const HEADER_GAME_OVER: usize = 15;
pub const HEADER_WINNER: usize = 16;
pub const HEADER_KITCHEN_ONLY: usize = 17;
pub const HEADER_BALL_LEFT: usize = 18;
pub const HEADER_SCORE_ONE: usize = 19;
pub const HEADER_SCORE_TWO: usize = 20;
pub const HEADER_SPIN_TOP: usize = 21;
pub const HEADER_SPIN_SIDE: usize = 22;
pub const HEADER_MAX_POWER: usize = 23;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per ball: number, x, y, vx, vy, top, side, in_game (wire format).
pub const BALL_FLOATS: usize = 8;

/// Floats per game event: kind, a, b, c (wire format).
pub const EVENT_FLOATS: usize = 4;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_balls: usize,
    pub max_sounds: usize,
    pub max_events: usize,

    /// Size of ball data section in floats.
    pub ball_data_floats: usize,
    /// Size of sound data section in floats.
    pub sound_data_floats: usize,
    /// Size of event data section in floats.
    pub event_data_floats: usize,

    /// Offset (in floats) where ball data begins.
    pub ball_data_offset: usize,
    /// Offset (in floats) where sound data begins.
    pub sound_data_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_balls: usize, max_sounds: usize, max_events: usize) -> Self {
        let ball_data_floats = max_balls * BALL_FLOATS;
        let sound_data_floats = max_sounds;
        let event_data_floats = max_events * EVENT_FLOATS;

        let ball_data_offset = HEADER_FLOATS;
        let sound_data_offset = ball_data_offset + ball_data_floats;
        let event_data_offset = sound_data_offset + sound_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;

        Self {
            max_balls,
            max_sounds,
            max_events,
            ball_data_floats,
            sound_data_floats,
            event_data_floats,
            ball_data_offset,
            sound_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from a GameConfig.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.max_balls, config.max_sounds, config.max_events)
    }
}
