// ai/mod.rs
//
// Heuristic opponent. Reads a snapshot of the table, never the live balls.

pub mod bank;
pub mod direct;
pub mod geometry;
pub mod placement;
pub mod planner;
pub mod safety;
pub mod shot;

pub use geometry::is_shot_blocked;
pub use placement::choose_cue_position;
pub use planner::ShotPlanner;
pub use shot::{Layout, ShotCandidate};
