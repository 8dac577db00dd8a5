// rules/mod.rs
//
// Nine-ball rules on top of the ball physics: rack, fouls, turn order.
// The physics knows nothing about players; everything here reads it.

pub mod events;
pub mod fouls;
pub mod rack;
pub mod state;

pub use events::{MessageLog, TableEvent};
pub use fouls::{check_foul, Foul};
pub use state::{GameState, NineBall, Phase, Player};
