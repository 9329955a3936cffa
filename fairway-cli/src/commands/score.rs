//! Offline golf score calculations

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use fairway_core::scoring::{self, ScoreStyle};
use fairway_core::CourseInfo;

use crate::output;

#[derive(Subcommand)]
pub enum ScoreCommands {
    /// Front nine, back nine and total for 18 hole scores
    Totals {
        /// The 18 hole scores, in order
        #[arg(value_delimiter = ',', num_args = 1..)]
        holes: Vec<u32>,
    },

    /// Course handicap, net score and Stableford estimate for a round
    Metrics {
        /// Gross score for the round
        #[arg(long)]
        gross: u32,

        /// Handicap index of the player
        #[arg(long)]
        handicap: f64,

        /// Course par
        #[arg(long, default_value_t = 72)]
        par: u32,

        /// Course rating
        #[arg(long, default_value_t = 72.0)]
        rating: f64,

        /// Slope rating
        #[arg(long, default_value_t = 113)]
        slope: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Styled scorecard with achievements for 18 holes against their pars
    Card {
        /// The 18 hole scores, in order
        #[arg(long, value_delimiter = ',')]
        holes: Vec<u32>,

        /// Par for each hole, in order
        #[arg(long, value_delimiter = ',')]
        pars: Vec<u32>,
    },
}

pub fn run(command: ScoreCommands) -> Result<()> {
    match command {
        ScoreCommands::Totals { holes } => totals(&holes),
        ScoreCommands::Metrics {
            gross,
            handicap,
            par,
            rating,
            slope,
            json,
        } => metrics(gross, handicap, par, rating, slope, json),
        ScoreCommands::Card { holes, pars } => card(&holes, &pars),
    }
}

fn totals(holes: &[u32]) -> Result<()> {
    let totals = scoring::round_totals(holes)?;

    let mut table = output::create_table();
    table.set_header(vec!["Front 9", "Back 9", "Total"]);
    table.add_row(vec![
        totals.front_nine.to_string(),
        totals.back_nine.to_string(),
        totals.total.to_string(),
    ]);
    println!("{table}");
    Ok(())
}

fn metrics(gross: u32, handicap: f64, par: u32, rating: f64, slope: u32, json: bool) -> Result<()> {
    if !scoring::is_valid_handicap(handicap) {
        bail!("Handicap index must be between 0.0 and 54.0");
    }

    let course = CourseInfo::new(par, rating, slope);
    let calc = scoring::golf_metrics(gross, handicap, &course);

    if json {
        println!("{}", serde_json::to_string_pretty(&calc)?);
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Gross".to_string(), gross.to_string()]);
    table.add_row(vec![
        "Course handicap".to_string(),
        calc.course_handicap.to_string(),
    ]);
    table.add_row(vec!["Net".to_string(), calc.net_score.to_string()]);
    table.add_row(vec![
        "To par".to_string(),
        format!("{:+}", calc.score_to_par),
    ]);
    table.add_row(vec![
        "Stableford (est.)".to_string(),
        calc.stableford_points.to_string(),
    ]);
    println!("{table}");
    Ok(())
}

fn card(holes: &[u32], pars: &[u32]) -> Result<()> {
    let achievements = scoring::count_achievements(holes, pars)?;
    let totals = scoring::round_totals(holes)?;

    let mut table = output::create_table();
    table.set_header(vec!["Hole", "Par", "Score"]);
    for (i, (&score, &par)) in holes.iter().zip(pars.iter()).enumerate() {
        let display = scoring::score_display(score, par);
        let styled = match display.style {
            ScoreStyle::Eagle => display.text.green().bold().to_string(),
            ScoreStyle::Birdie => display.text.cyan().to_string(),
            ScoreStyle::Par => display.text,
            ScoreStyle::Bogey => display.text.yellow().to_string(),
            ScoreStyle::Trouble => display.text.red().to_string(),
        };
        table.add_row(vec![(i + 1).to_string(), par.to_string(), styled]);
    }
    println!("{table}");

    println!(
        "Out {} / In {} / Total {}",
        totals.front_nine, totals.back_nine, totals.total
    );
    println!(
        "Eagles {} | Birdies {} | Pars {} | Bogeys {}",
        achievements.eagles, achievements.birdies, achievements.pars, achievements.bogeys
    );

    // Gross Stableford, no handicap strokes allocated per hole.
    let stableford: u32 = holes
        .iter()
        .zip(pars.iter())
        .map(|(&score, &par)| scoring::stableford_points(score, par))
        .sum();
    println!("Stableford (gross) {stableford}");
    Ok(())
}
