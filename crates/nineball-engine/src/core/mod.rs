pub mod ball;
pub mod collision;
pub mod math;
pub mod physics;
pub mod table;
pub mod time;

pub use ball::{Ball, BallView, CushionHits, Shot, Spin, CUE, NINE};
pub use collision::{resolve_pair, Impact};
pub use physics::{BallWorld, PhysicsEvent};
pub use table::{Cushion, CushionSide, Pocket, PocketKind, Table};
pub use time::FixedTimestep;
