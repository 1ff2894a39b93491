//! Awalan Design CLI - Database migrations and admin management.
//!
//! # Usage
//!
//! ```bash
//! # Run site database migrations
//! awalan-cli migrate
//!
//! # Create an admin user (password from AWALAN_ADMIN_PASSWORD)
//! awalan-cli admin create -u admin -e admin@example.com
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin create` - Create admin users

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;

#[derive(Parser)]
#[command(name = "awalan-cli")]
#[command(author, version, about = "Awalan Design CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run site database migrations
    Migrate,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Password (at least 12 characters)
        #[arg(short, long, env = "AWALAN_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,

        /// Contact email address
        #[arg(short, long)]
        email: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::site().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                username,
                password,
                email,
            } => {
                let password = SecretString::from(password);
                commands::admin::create_user(&username, &password, email.as_deref()).await?;
            }
        },
    }
    Ok(())
}
