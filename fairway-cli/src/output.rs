//! Terminal output helpers

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}
