//! Horoscope CLI commands.

use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;
use console::style;

use crate::maintenance;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum HoroscopeCommand {
    /// Generate today's horoscope for every active app user, now.
    Generate,
}

pub async fn run(state: &AppState, action: HoroscopeCommand, json: bool) -> Result<()> {
    match action {
        HoroscopeCommand::Generate => {
            let report = maintenance::generate_horoscopes(state, Utc::now()).await?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "ready": report.ready, "failed": report.failed })
                );
            } else if report.failed == 0 {
                println!(
                    "  {} {} user{} have today's horoscope",
                    style("✓").green().bold(),
                    style(report.ready).bold(),
                    if report.ready == 1 { "" } else { "s" },
                );
            } else {
                println!(
                    "  {} {} ready, {} failed (see logs)",
                    style("!").yellow().bold(),
                    style(report.ready).bold(),
                    style(report.failed).red().bold(),
                );
            }
        }
    }
    Ok(())
}
