//! Standings service - team leaderboard aggregation

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::LeaderboardEntry;
use crate::ports::ScoreStore;
use crate::scoring::team_standings;

/// Builds the team leaderboard for a tour from recorded rounds
pub struct StandingsService {
    store: Arc<dyn ScoreStore>,
}

impl StandingsService {
    pub fn new(store: Arc<dyn ScoreStore>) -> Self {
        Self { store }
    }

    /// Fetch teams and scores, then aggregate
    ///
    /// Store errors propagate; this backs a caller-facing command rather
    /// than a background refresh.
    pub async fn for_tour(&self, tour_id: Uuid) -> Result<Vec<LeaderboardEntry>> {
        let teams = self.store.fetch_teams(tour_id).await?;
        let scores = self.store.fetch_for_tour(tour_id).await?;
        Ok(team_standings(&scores, &teams))
    }
}
