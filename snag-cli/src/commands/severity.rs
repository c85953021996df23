//! Severity command handler
//!
//! Prints the level to severity table used by the handler.

use colored::*;
use snag_core::{Level, LevelSeverityMap, Severity};

/// Handle the severity command
pub fn handle_severity_command(level: Option<Level>) {
    let map = LevelSeverityMap::standard();

    match level {
        Some(level) => print_row(level, map.resolve(level), !level.is_standard()),
        None => {
            println!("{}", "Level → severity:".bold());
            for (level, severity) in map.entries() {
                print_row(level, severity, false);
            }
            println!(
                "  {} {}",
                "other".dimmed(),
                format!("→ {} (fallback)", colorize_severity(map.fallback())).dimmed()
            );
        }
    }
}

fn print_row(level: Level, severity: Severity, fallback: bool) {
    let note = if fallback { " (fallback)".dimmed().to_string() } else { String::new() };
    println!(
        "  {:<10} {:>4}  → {}{}",
        level.name().unwrap_or("unknown"),
        level.ordinal(),
        colorize_severity(severity),
        note
    );
}

/// Colorize a severity for display
fn colorize_severity(severity: Severity) -> ColoredString {
    match severity {
        Severity::Info => severity.as_str().cyan(),
        Severity::Warning => severity.as_str().yellow(),
        Severity::Error => severity.as_str().red(),
    }
}
