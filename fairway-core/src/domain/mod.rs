//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod course;
mod score;
mod session;
mod team;
mod tour;
mod user;
pub mod result;

pub use course::{Course, CourseInfo};
pub use score::{
    Achievements, GolfCalculations, HoleScore, LeaderboardEntry, RoundTotals, Score,
    ScorecardData, HOLES_PER_ROUND,
};
pub use session::{AuthChange, AuthEvent, Session};
pub use team::Team;
pub use tour::Tour;
pub use user::{ProfileUpdate, Role, User};
