//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod session;
mod standings;
mod tour;

pub use session::{SessionManager, SessionState};
pub use standings::StandingsService;
pub use tour::TourService;
