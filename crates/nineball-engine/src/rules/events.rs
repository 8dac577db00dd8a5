use std::collections::VecDeque;

use glam::Vec2;

use crate::api::types::{GameEvent, SoundEvent};
use crate::core::physics::PhysicsEvent;
use crate::rules::fouls::Foul;
use crate::rules::state::Player;

/// Structured record of what happened at the table. The presentation layer
/// drains these instead of scraping log output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TableEvent {
    NewRack,
    CueBallPlaced { pos: Vec2 },
    ShotTaken { player: Player, power: f32 },
    BallContact { striker: u8, struck: u8, speed: f32 },
    Cushion { ball: u8 },
    Pocketed { ball: u8, pocket: usize },
    Foul { player: Player, foul: Foul },
    BallSpotted { ball: u8, pos: Vec2 },
    TurnChanged { player: Player },
    TargetChanged { ball: u8 },
    FrameWon { winner: Player, scores: [u32; 2] },
}

/// Wire `kind` codes for [`GameEvent`].
pub mod kind {
    pub const NEW_RACK: f32 = 1.0;
    pub const CUE_BALL_PLACED: f32 = 2.0;
    pub const SHOT_TAKEN: f32 = 3.0;
    pub const BALL_CONTACT: f32 = 4.0;
    pub const CUSHION: f32 = 5.0;
    pub const POCKETED: f32 = 6.0;
    pub const FOUL: f32 = 7.0;
    pub const BALL_SPOTTED: f32 = 8.0;
    pub const TURN_CHANGED: f32 = 9.0;
    pub const TARGET_CHANGED: f32 = 10.0;
    pub const FRAME_WON: f32 = 11.0;
}

/// Sounds the presentation layer may play.
pub mod sound {
    use crate::api::types::SoundEvent;

    pub const BALL_CLICK: SoundEvent = SoundEvent(1);
    pub const CUSHION: SoundEvent = SoundEvent(2);
    pub const POCKET: SoundEvent = SoundEvent(3);
    pub const CUE_STRIKE: SoundEvent = SoundEvent(4);
    pub const FOUL: SoundEvent = SoundEvent(5);
    pub const WIN: SoundEvent = SoundEvent(6);
}

impl TableEvent {
    /// Lift a physics event into the table stream.
    pub fn from_physics(event: PhysicsEvent) -> Self {
        match event {
            PhysicsEvent::BallContact { striker, struck, speed } => TableEvent::BallContact { striker, struck, speed },
            PhysicsEvent::Cushion { ball, .. } => TableEvent::Cushion { ball },
            PhysicsEvent::Pocketed { ball, pocket } => TableEvent::Pocketed { ball, pocket },
        }
    }

    /// Flatten into the 4-float wire record.
    pub fn to_wire(&self) -> GameEvent {
        let ev = GameEvent::new;
        match *self {
            TableEvent::NewRack => ev(kind::NEW_RACK, 0.0, 0.0, 0.0),
            TableEvent::CueBallPlaced { pos } => ev(kind::CUE_BALL_PLACED, 0.0, pos.x, pos.y),
            TableEvent::ShotTaken { player, power } => ev(kind::SHOT_TAKEN, player.number() as f32, power, 0.0),
            TableEvent::BallContact { striker, struck, speed } => {
                ev(kind::BALL_CONTACT, striker as f32, struck as f32, speed)
            }
            TableEvent::Cushion { ball } => ev(kind::CUSHION, ball as f32, 0.0, 0.0),
            TableEvent::Pocketed { ball, pocket } => ev(kind::POCKETED, ball as f32, pocket as f32, 0.0),
            TableEvent::Foul { player, foul } => {
                let (code, hit) = match foul {
                    Foul::CueBallPocketed => (1.0, 0.0),
                    Foul::NoContact => (2.0, 0.0),
                    Foul::WrongBallFirst { hit, .. } => (3.0, hit as f32),
                };
                ev(kind::FOUL, player.number() as f32, code, hit)
            }
            TableEvent::BallSpotted { ball, pos } => ev(kind::BALL_SPOTTED, ball as f32, pos.x, pos.y),
            TableEvent::TurnChanged { player } => ev(kind::TURN_CHANGED, player.number() as f32, 0.0, 0.0),
            TableEvent::TargetChanged { ball } => ev(kind::TARGET_CHANGED, ball as f32, 0.0, 0.0),
            TableEvent::FrameWon { winner, scores } => {
                ev(kind::FRAME_WON, winner.number() as f32, scores[0] as f32, scores[1] as f32)
            }
        }
    }

    /// Sound cue for this event, if any.
    pub fn sound(&self) -> Option<SoundEvent> {
        match self {
            TableEvent::ShotTaken { .. } => Some(sound::CUE_STRIKE),
            TableEvent::BallContact { .. } => Some(sound::BALL_CLICK),
            TableEvent::Cushion { .. } => Some(sound::CUSHION),
            TableEvent::Pocketed { .. } => Some(sound::POCKET),
            TableEvent::Foul { .. } => Some(sound::FOUL),
            TableEvent::FrameWon { .. } => Some(sound::WIN),
            _ => None,
        }
    }
}

/// Most recent human-readable messages, oldest first.
#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: VecDeque<String>,
    capacity: usize,
}

impl MessageLog {
    pub const DEFAULT_CAPACITY: usize = 3;

    pub fn new(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity), capacity: capacity.max(1) }
    }

    /// Append a message, dropping the oldest past capacity.
    pub fn push(&mut self, message: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(message.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn latest(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
