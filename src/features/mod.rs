//! Per-team rolling context
//!
//! Rest, travel, streaks and previous results, derived game by game.

pub mod classification;
pub mod engine;
pub mod previous;
pub mod registry;
pub mod result;
pub mod row;
pub mod schedule;
pub mod streak;

pub use engine::{Derivation, FeatureEngine};
pub use registry::{TeamSnapshot, TeamStateRegistry};
pub use row::{DerivedRow, Side, SideContext};
pub use streak::StreakTracker;
