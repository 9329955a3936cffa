//! Active tour command

use anyhow::Result;

use super::get_context;
use crate::output;

pub async fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;

    let Some(tour) = ctx.tours.refresh().await else {
        output::warning("No active tour");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&tour)?);
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Tour".to_string(), tour.name.clone()]);
    table.add_row(vec!["Year".to_string(), tour.year.to_string()]);
    table.add_row(vec![
        "Starts".to_string(),
        tour.start_date.format("%Y-%m-%d").to_string(),
    ]);
    println!("{table}");

    match ctx.tours.countdown() {
        Some(label) => output::info(&format!("Starts in: {label}")),
        None => output::info("The tour is underway"),
    }
    Ok(())
}
