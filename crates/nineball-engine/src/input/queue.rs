/// Commands the table accepts from the outside world. Pointer handling and
/// power gestures happen before this point; only their results arrive here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Drop the cue ball at table coordinates (x, y).
    PlaceCueBall { x: f32, y: f32 },
    /// Strike the cue ball along `angle` (radians) with `power`, using the
    /// pending spin.
    Strike { angle: f32, power: f32 },
    /// Set spin for the next strike. Values outside the unit disc are scaled back.
    SetSpin { top: f32, side: f32 },
    /// Start a new match.
    Reset,
}

/// Wire codes for [`InputEvent::from_raw`].
pub mod code {
    pub const PLACE_CUE_BALL: u32 = 1;
    pub const STRIKE: u32 = 2;
    pub const SET_SPIN: u32 = 3;
    pub const RESET: u32 = 4;
}

impl InputEvent {
    /// Decode a `(kind, a, b)` triple pushed through the wasm boundary.
    pub fn from_raw(kind: u32, a: f32, b: f32) -> Option<Self> {
        match kind {
            code::PLACE_CUE_BALL => Some(InputEvent::PlaceCueBall { x: a, y: b }),
            code::STRIKE => Some(InputEvent::Strike { angle: a, power: b }),
            code::SET_SPIN => Some(InputEvent::SetSpin { top: a, side: b }),
            code::RESET => Some(InputEvent::Reset),
            _ => None,
        }
    }
}

/// Commands received since the last tick.
/// The host pushes; the game drains once per tick.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self { events: Vec::with_capacity(8) }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Take all pending events, oldest first.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
