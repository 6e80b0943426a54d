//! User administration commands: create-admin, grant-points, show, token issue.

use anyhow::Result;
use clap::Subcommand;
use console::style;
use uuid::Uuid;

use arcana_types::user::{User, UserRole};

use crate::state::AppState;

#[derive(Subcommand)]
pub enum UserCommand {
    /// Create an admin account.
    CreateAdmin {
        #[arg(long)]
        name: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        email: String,

        /// Admin password (at least 8 characters).
        #[arg(long, env = "ARCANA_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Add points to an app user's balance.
    GrantPoints {
        #[arg(long)]
        user: Uuid,

        /// Points to add; must be positive.
        #[arg(long)]
        amount: i64,
    },

    /// Show a user.
    Show {
        #[arg(long)]
        user: Uuid,
    },
}

#[derive(Subcommand)]
pub enum TokenCommand {
    /// Issue a bearer token for a user. The token is printed once.
    Issue {
        #[arg(long)]
        user: Uuid,
    },
}

pub async fn run(state: &AppState, action: UserCommand, json: bool) -> Result<()> {
    match action {
        UserCommand::CreateAdmin {
            name,
            phone,
            email,
            password,
        } => {
            let user = state
                .user_service
                .create_admin(name, phone, email, &password)
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                println!(
                    "  {} Admin '{}' created ({})",
                    style("✓").green().bold(),
                    style(&user.name).bold(),
                    style(user.id).dim()
                );
            }
        }
        UserCommand::GrantPoints { user, amount } => {
            let user = state.user_service.grant_points(user, amount).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                println!(
                    "  {} '{}' now has {} points",
                    style("✓").green().bold(),
                    style(&user.name).bold(),
                    style(user.points().unwrap_or_default()).cyan()
                );
            }
        }
        UserCommand::Show { user } => {
            let user = state.user_service.get(user).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                print_user(&user);
            }
        }
    }
    Ok(())
}

pub async fn run_token(state: &AppState, action: TokenCommand, json: bool) -> Result<()> {
    match action {
        TokenCommand::Issue { user } => {
            let token = state.user_service.issue_token(user).await?;
            if json {
                println!("{}", serde_json::json!({ "user_id": user, "token": token }));
            } else {
                println!();
                println!(
                    "  {} Token issued (save this -- it won't be shown again):",
                    style("🔑").bold()
                );
                println!();
                println!("  {}", style(&token).yellow().bold());
                println!();
            }
        }
    }
    Ok(())
}

fn print_user(user: &User) {
    println!();
    println!("  {} {}", style(&user.name).cyan().bold(), style(user.id).dim());
    println!("  {:<10} {}", style("Phone").dim(), user.phone);
    println!("  {:<10} {}", style("Active").dim(), user.active);
    match &user.role {
        UserRole::App(profile) => {
            println!("  {:<10} app", style("Role").dim());
            println!("  {:<10} {}", style("Born").dim(), profile.birth_date);
            println!("  {:<10} {}", style("Gender").dim(), profile.gender);
            println!("  {:<10} {}", style("Points").dim(), profile.points);
        }
        UserRole::Admin(profile) => {
            println!("  {:<10} admin", style("Role").dim());
            println!("  {:<10} {}", style("Email").dim(), profile.email);
        }
    }
    println!(
        "  {:<10} {}",
        style("Created").dim(),
        user.created_at.format("%Y-%m-%d %H:%M")
    );
    println!();
}
