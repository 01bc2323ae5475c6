//! Bazaar CLI - session migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the storefront session table
//! bz-cli migrate storefront
//!
//! # Create the admin session table (in the `admin` schema)
//! bz-cli migrate admin
//!
//! # Both
//! bz-cli migrate all
//!
//! # Promote a new account to admin, signing in as an existing admin
//! BZ_ADMIN_EMAIL=ops@example.com BZ_ADMIN_PASSWORD=... \
//!   bz-cli admin create -e new@example.com -n "New Admin" -p 'secret'
//!
//! # Create products from a YAML list
//! bz-cli seed products products.yaml
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bz-cli")]
#[command(author, version, about = "Bazaar CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create session tables
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the backend with data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Storefront session table
    Storefront,
    /// Admin session table
    Admin,
    /// Both session tables
    All,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user through the backend
    Create {
        /// New admin's email address
        #[arg(short, long)]
        email: String,

        /// New admin's display name
        #[arg(short, long)]
        name: String,

        /// New admin's password
        #[arg(short, long, env = "BZ_NEW_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,

        /// Existing admin to sign in as
        #[arg(long, env = "BZ_ADMIN_EMAIL")]
        as_email: String,

        #[arg(long, env = "BZ_ADMIN_PASSWORD", hide_env_values = true)]
        as_password: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Create every product listed in a YAML file
    Products {
        /// Path to the YAML file
        file: String,

        #[arg(long, env = "BZ_ADMIN_EMAIL")]
        as_email: String,

        #[arg(long, env = "BZ_ADMIN_PASSWORD", hide_env_values = true)]
        as_password: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
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
        Commands::Migrate { target } => match target {
            MigrateTarget::Storefront => commands::migrate::storefront().await?,
            MigrateTarget::Admin => commands::migrate::admin().await?,
            MigrateTarget::All => {
                commands::migrate::storefront().await?;
                commands::migrate::admin().await?;
            }
        },
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                password,
                as_email,
                as_password,
            } => {
                let operator = commands::Credentials {
                    email: as_email,
                    password: as_password.into(),
                };
                commands::admin::create_user(&operator, &email, &name, password).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Products {
                file,
                as_email,
                as_password,
            } => {
                let operator = commands::Credentials {
                    email: as_email,
                    password: as_password.into(),
                };
                commands::seed::products(&operator, &file).await?;
            }
        },
    }
    Ok(())
}
