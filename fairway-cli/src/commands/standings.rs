//! Team standings command

use anyhow::{bail, Result};
use colored::Colorize;

use super::get_context;
use crate::output;

pub async fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;

    let Some(tour) = ctx.tours.refresh().await else {
        bail!("No active tour");
    };

    let entries = ctx.standings.for_tour(tour.id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        output::warning("No teams registered for this tour");
        return Ok(());
    }

    println!("{}", format!("Standings - {}", tour.name).bold());

    let mut table = output::create_table();
    table.set_header(vec![
        "#", "Team", "Rounds", "Gross", "Net", "Eagles", "Birdies", "3-Putts", "Rings",
    ]);
    for (rank, entry) in entries.iter().enumerate() {
        table.add_row(vec![
            (rank + 1).to_string(),
            entry.team.name.clone(),
            entry.rounds_played.to_string(),
            entry.total_gross.to_string(),
            entry.total_net.to_string(),
            entry.total_eagles.to_string(),
            entry.total_birdies.to_string(),
            entry.total_three_putts.to_string(),
            entry.total_rings.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
