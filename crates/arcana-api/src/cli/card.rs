//! Card deck CLI commands: create, list.

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use crate::state::AppState;

#[derive(Subcommand)]
pub enum CardCommand {
    /// Add a card to the deck.
    Create {
        /// Card name, e.g. "The Fool"; unique ignoring case.
        name: String,

        /// Image URL. Defaults to /card/<name-slug>.png.
        #[arg(long)]
        image: Option<String>,
    },

    /// List the deck, ordered by name.
    #[command(alias = "ls")]
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 78)]
        limit: u32,
    },
}

pub async fn run(state: &AppState, action: CardCommand, json: bool) -> Result<()> {
    match action {
        CardCommand::Create { name, image } => {
            let card = state.card_service.create(&name, image).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&card)?);
            } else {
                println!(
                    "  {} Card '{}' added ({})",
                    style("✓").green().bold(),
                    style(&card.name).bold(),
                    style(&card.image).dim()
                );
            }
        }
        CardCommand::List { page, limit } => list(state, page, limit, json).await?,
    }
    Ok(())
}

async fn list(state: &AppState, page: u32, limit: u32, json: bool) -> Result<()> {
    let page = state.card_service.page(page, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    if page.cards.is_empty() {
        println!();
        println!(
            "  {} No cards on this page. Add one with: {}",
            style("i").blue().bold(),
            style("arcana card create \"The Fool\"").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Image").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);

    for card in &page.cards {
        table.add_row(vec![
            Cell::new(&card.name).fg(Color::Cyan),
            Cell::new(&card.image),
            Cell::new(card.id.to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  Page {} of {}, {} card{} in the deck",
        style(page.paging.page).bold(),
        page.paging.total_pages,
        style(page.paging.total).bold(),
        if page.paging.total == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}
