//! Data store ports - hosted table access
//!
//! One trait per table family. Errors are surfaced structurally; fetching a
//! row that does not exist returns `Ok(None)`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{ProfileUpdate, Score, Team, Tour, User};

/// Profile rows, keyed by the identity provider's user id
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a profile by user id; absence is not an error
    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Fetch a profile by email, used to detect duplicate signups
    async fn fetch_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Insert a new profile row
    async fn insert(&self, profile: &User) -> Result<()>;

    /// Apply a partial update to an existing profile row
    async fn update(&self, id: Uuid, patch: &ProfileUpdate) -> Result<()>;
}

/// Tour rows
#[async_trait]
pub trait TourStore: Send + Sync {
    /// Fetch the single active tour, if one is flagged
    async fn fetch_active(&self) -> Result<Option<Tour>>;
}

/// Score and team rows for standings
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// All recorded rounds for a tour, including soft-deleted ones
    async fn fetch_for_tour(&self, tour_id: Uuid) -> Result<Vec<Score>>;

    /// All teams competing in a tour
    async fn fetch_teams(&self, tour_id: Uuid) -> Result<Vec<Team>>;
}
