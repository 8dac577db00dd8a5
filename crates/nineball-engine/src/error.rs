use thiserror::Error;

/// Why a cue-ball placement was refused. Refusals never change table state.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PlacementError {
    #[error("cue ball can only be placed while ball-in-hand")]
    NotPlacing,
    #[error("position ({x:.1}, {y:.1}) is off the playing surface")]
    OutOfBounds { x: f32, y: f32 },
    #[error("break placement must be behind the head string")]
    OutsideKitchen,
    #[error("position overlaps ball {number}")]
    OverlapsBall { number: u8 },
    #[error("position is inside a pocket")]
    InPocket,
}

/// Errors surfaced by the engine API.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("config parse failed: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("{0}")]
    Placement(#[from] PlacementError),
    #[error("strike rejected: {0}")]
    InvalidStrike(&'static str),
}
