pub mod api;
pub mod core;
pub mod rules;
#[cfg(feature = "ai")]
pub mod ai;
pub mod bridge;
pub mod input;
pub mod config;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext, RenderContext};
pub use api::types::{SoundEvent, GameEvent};
pub use core::ball::{Ball, BallView, Shot, Spin, CUE, NINE};
pub use core::physics::{BallWorld, PhysicsEvent};
pub use core::table::{CushionSide, Pocket, Table};
pub use core::time::FixedTimestep;
pub use rules::{Foul, GameState, MessageLog, NineBall, Phase, Player, TableEvent};
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::ProtocolLayout;
pub use bridge::state::{BallInstance, StateBuffer, TableStatus};
pub use config::{AiConfig, PhysicsConfig, SimConfig, TableConfig};
pub use error::{EngineError, PlacementError};

#[cfg(feature = "ai")]
pub use ai::{ShotCandidate, ShotPlanner};
