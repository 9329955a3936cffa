//! Fairway Core - business logic for the golf tour companion
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (User, Tour, Course, Score, etc.)
//! - **scoring**: Pure golf-score arithmetic
//! - **ports**: Trait definitions for the hosted backend (IdentityProvider, stores)
//! - **services**: Business logic orchestration (session, tour, standings)
//! - **adapters**: Concrete implementations (Supabase REST, in-memory demo)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod scoring;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use adapters::memory::MemoryBackend;
use adapters::supabase::SupabaseClient;
use config::Config;
use ports::{IdentityProvider, ProfileStore, ScoreStore, TourStore};
use services::{SessionManager, StandingsService, TourService};

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult, Result};
pub use domain::{
    Course, CourseInfo, GolfCalculations, HoleScore, LeaderboardEntry, ProfileUpdate, Role,
    RoundTotals, Score, ScorecardData, Session, Team, Tour, User,
};
pub use services::SessionState;

/// Main context for Fairway operations
///
/// This is the primary entry point for all business logic. It holds the
/// configuration and the services wired to the selected backend.
pub struct FairwayContext {
    pub config: Config,
    pub session: Arc<SessionManager>,
    pub tours: TourService,
    pub standings: StandingsService,
}

impl FairwayContext {
    /// Create a new Fairway context
    ///
    /// Demo mode runs against the seeded in-memory backend; otherwise the
    /// configured hosted backend is used, with the session persisted in the
    /// app directory.
    pub fn new(app_dir: &Path) -> Result<Self> {
        let config = Config::load(app_dir)?;

        let (identity, profiles, tours, scores): (
            Arc<dyn IdentityProvider>,
            Arc<dyn ProfileStore>,
            Arc<dyn TourStore>,
            Arc<dyn ScoreStore>,
        ) = if config.demo_mode {
            let backend = Arc::new(MemoryBackend::with_demo_data());
            (
                backend.clone(),
                backend.clone(),
                backend.clone(),
                backend,
            )
        } else {
            let (url, anon_key) = config.require_backend()?;
            let client = Arc::new(SupabaseClient::new(&url, &anon_key, Some(app_dir))?);
            (client.clone(), client.clone(), client.clone(), client)
        };

        let session = SessionManager::start(identity, profiles);
        let tours = TourService::new(tours);
        let standings = StandingsService::new(scores);

        Ok(Self {
            config,
            session,
            tours,
            standings,
        })
    }
}
