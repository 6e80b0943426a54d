//! CLI command definitions for the `arcana` binary.
//!
//! Uses clap derive macros. Account administration (admins, points, tokens),
//! topic and deck setup happen here; readers go through the HTTP API.

pub mod card;
pub mod horoscope;
pub mod sweep;
pub mod topic;
pub mod user;

use clap::{Parser, Subcommand};

/// Tarot reading backend: API server and administration.
#[derive(Parser)]
#[command(name = "arcana", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST + WebSocket server and the maintenance jobs.
    Serve {
        /// Address to bind (defaults to `server.host` in config.toml).
        #[arg(long, env = "ARCANA_HOST")]
        host: Option<String>,

        /// Port to bind (defaults to `server.port` in config.toml).
        #[arg(long, short, env = "ARCANA_PORT")]
        port: Option<u16>,
    },

    /// Manage user accounts.
    User {
        #[command(subcommand)]
        action: user::UserCommand,
    },

    /// Issue API access tokens.
    Token {
        #[command(subcommand)]
        action: user::TokenCommand,
    },

    /// Manage reading topics.
    Topic {
        #[command(subcommand)]
        action: topic::TopicCommand,
    },

    /// Manage the tarot deck.
    Card {
        #[command(subcommand)]
        action: card::CardCommand,
    },

    /// Daily horoscope jobs.
    Horoscope {
        #[command(subcommand)]
        action: horoscope::HoroscopeCommand,
    },

    /// Run the stale-chat sweep and horoscope cleanup once, now.
    Sweep,
}
