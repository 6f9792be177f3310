//! Sentra CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! sentra-cli migrate
//!
//! # Seed the catalog and default settings
//! sentra-cli seed
//!
//! # Create admin user (password from -p or ADMIN_PASSWORD)
//! sentra-cli admin create -u admin -n "Super Admin" -r super_admin
//!
//! # Reset a password and reactivate the account
//! sentra-cli admin reset-password -u admin
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Insert the default catalog and settings
//! - `admin create` - Create admin users
//! - `admin reset-password` - Re-hash an admin password

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sentra-cli")]
#[command(author, version, about = "Sentra CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed products and default settings
    Seed,
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

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Admin role (`super_admin`, `admin`)
        #[arg(short, long, default_value = "admin")]
        role: String,

        /// Password (defaults to `ADMIN_PASSWORD`)
        #[arg(short, long)]
        password: Option<String>,

        /// Offices this admin may see, comma separated
        #[arg(short, long, value_delimiter = ',')]
        offices: Vec<String>,
    },
    /// Set a new password for an existing admin
    ResetPassword {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// New password (defaults to `ADMIN_PASSWORD`)
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                username,
                name,
                role,
                password,
                offices,
            } => {
                commands::admin::create_user(&username, &name, &role, password, offices).await?;
            }
            AdminAction::ResetPassword { username, password } => {
                commands::admin::reset_password(&username, password).await?;
            }
        },
    }
    Ok(())
}
