//! Score and scorecard domain models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Team;

/// Number of holes in a recorded round. Shorter inputs are rejected, never
/// padded or truncated.
pub const HOLES_PER_ROUND: usize = 18;

/// One recorded round for a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub team_id: Uuid,
    pub player_id: Uuid,
    pub course_id: Uuid,
    pub date_played: NaiveDate,
    pub holes: [u32; HOLES_PER_ROUND],
    pub gross: u32,
    pub net: u32,
    pub eagles: u32,
    pub birdies: u32,
    pub three_putts: u32,
    pub rings: u32,
    /// Soft delete marker; deleted rounds are kept but excluded from standings
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Score {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A single hole as entered on the scorecard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleScore {
    pub strokes: u32,
    pub three_putt: bool,
    pub ring: bool,
}

impl HoleScore {
    pub fn strokes(strokes: u32) -> Self {
        Self {
            strokes,
            three_putt: false,
            ring: false,
        }
    }
}

/// Derived metrics for one round, recomputed on every call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GolfCalculations {
    pub course_handicap: i32,
    pub net_score: u32,
    pub score_to_par: i32,
    pub stableford_points: u32,
}

/// Front nine / back nine / total strokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTotals {
    pub front_nine: u32,
    pub back_nine: u32,
    pub total: u32,
}

/// Per-round achievement counts
///
/// Double bogey or worse deliberately lands in no bucket, so the counts may
/// sum to less than 18.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievements {
    pub eagles: u32,
    pub birdies: u32,
    pub pars: u32,
    pub bogeys: u32,
}

/// A filled-in scorecard ready for submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorecardData {
    pub player_id: Uuid,
    pub course_id: Uuid,
    pub date_played: NaiveDate,
    pub holes: Vec<HoleScore>,
    pub gross: u32,
    pub three_putts: u32,
    pub rings: u32,
    pub calculations: GolfCalculations,
}

/// One team's line on the leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub team: Team,
    pub total_gross: u32,
    pub total_net: u32,
    pub total_eagles: u32,
    pub total_birdies: u32,
    pub total_three_putts: u32,
    pub total_rings: u32,
    pub rounds_played: u32,
}
