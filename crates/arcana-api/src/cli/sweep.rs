//! One-shot maintenance command.

use anyhow::Result;
use chrono::Utc;
use console::style;

use crate::maintenance;
use crate::state::AppState;

pub async fn run(state: &AppState, json: bool) -> Result<()> {
    let report = maintenance::run_once(state, Utc::now()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "  {} Closed {} stale chat{}, deleted {} horoscope{}",
            style("✓").green().bold(),
            style(report.chats_closed).bold(),
            if report.chats_closed == 1 { "" } else { "s" },
            style(report.horoscopes_deleted).bold(),
            if report.horoscopes_deleted == 1 { "" } else { "s" },
        );
    }
    Ok(())
}
