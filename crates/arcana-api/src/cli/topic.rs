//! Topic CLI commands: create, list.

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use crate::state::AppState;

#[derive(Subcommand)]
pub enum TopicCommand {
    /// Create a reading topic.
    Create {
        /// Display name; unique ignoring case.
        name: String,

        #[arg(long)]
        code: Option<String>,

        /// Image URL shown by clients.
        #[arg(long)]
        image: Option<String>,
    },

    /// List all topics.
    #[command(alias = "ls")]
    List,
}

pub async fn run(state: &AppState, action: TopicCommand, json: bool) -> Result<()> {
    match action {
        TopicCommand::Create { name, code, image } => {
            let topic = state.topic_service.create(&name, code, image).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&topic)?);
            } else {
                println!(
                    "  {} Topic '{}' created ({})",
                    style("✓").green().bold(),
                    style(&topic.name).bold(),
                    style(topic.id).dim()
                );
            }
        }
        TopicCommand::List => list(state, json).await?,
    }
    Ok(())
}

async fn list(state: &AppState, json: bool) -> Result<()> {
    let topics = state.topic_service.list().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&topics)?);
        return Ok(());
    }

    if topics.is_empty() {
        println!();
        println!(
            "  {} No topics yet. Add one with: {}",
            style("i").blue().bold(),
            style("arcana topic create Love --code love").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Code").fg(Color::White),
        Cell::new("ID").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for topic in &topics {
        table.add_row(vec![
            Cell::new(&topic.name).fg(Color::Cyan),
            Cell::new(topic.code.as_deref().unwrap_or("-")),
            Cell::new(topic.id.to_string()).fg(Color::DarkGrey),
            Cell::new(topic.created_at.format("%Y-%m-%d").to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} topic{}",
        style(topics.len()).bold(),
        if topics.len() == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}
