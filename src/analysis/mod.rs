//! Filtering and aggregate results over derived games

pub mod filter;
pub mod summary;

pub use filter::{Condition, GameFilter, Outcome, Perspective, Role, StreakRange};
pub use summary::Summary;
