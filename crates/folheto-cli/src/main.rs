//! Folheto CLI
//!
//! Command-line interface for Folheto - PDF catalog publishing.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use folheto_core::{Role, Store};

mod commands;
mod logging;
mod output;
mod prompt;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "folheto")]
#[command(about = "Folheto - PDF catalog publishing")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and open a session
    Login {
        /// Username of the account
        username: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Close the current session
    Logout,
    /// Show the current session
    Whoami,
    /// Manage catalogs
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Open a published catalog in the page viewer
    View {
        /// Slug of the catalog
        slug: String,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show storage and session status
    Status,
}

#[derive(Subcommand)]
enum CatalogCommands {
    /// Upload a PDF catalog
    #[command(alias = "add")]
    Upload {
        /// Path to the PDF file
        file: PathBuf,
        /// Catalog title
        #[arg(short, long)]
        title: String,
        /// Brand name
        #[arg(short, long)]
        brand: String,
        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List all catalogs
    #[command(alias = "ls")]
    List,
    /// Show catalog details
    Show {
        /// Catalog id (full UUID or prefix) or slug
        reference: String,
    },
    /// Search catalogs by title or description
    Search {
        /// Search query
        query: String,
    },
    /// Delete a catalog
    #[command(alias = "rm")]
    Delete {
        /// Catalog id (full UUID or prefix) or slug
        reference: String,
    },
    /// Print the public share path of a published catalog
    Link {
        /// Slug of the catalog
        slug: String,
    },
    /// Seed demo catalogs on a fresh install
    Seed,
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new account
    #[command(alias = "add")]
    Create {
        /// Username (at least 3 characters)
        username: String,
        /// Access role
        #[arg(long, value_enum, default_value_t = RoleArg::User)]
        role: RoleArg,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// List all accounts
    #[command(alias = "ls")]
    List,
    /// Change an account's password
    Passwd {
        /// User id (full UUID or prefix) or username
        reference: String,
        /// New password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Delete an account
    #[command(alias = "rm")]
    Delete {
        /// User id (full UUID or prefix) or username
        reference: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, max_upload_bytes, ...)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoleArg {
    Admin,
    User,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => Role::Admin,
            RoleArg::User => Role::User,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands work without opening the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), &output);
    }

    let store = Store::open()?;

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&store, username, password, &output)
        }
        Commands::Logout => commands::auth::logout(&store, &output),
        Commands::Whoami => commands::auth::whoami(&store, &output),
        Commands::Catalog { command } => handle_catalog_command(command, &store, &output).await,
        Commands::User { command } => handle_user_command(command, &store, &output),
        Commands::View { slug } => commands::view::view(&store, slug, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Status => commands::status::show(&store, &output),
    }
}

async fn handle_catalog_command(
    command: CatalogCommands,
    store: &Store,
    output: &Output,
) -> Result<()> {
    match command {
        CatalogCommands::Upload {
            file,
            title,
            brand,
            description,
        } => commands::catalog::upload(store, file, title, brand, description, output).await,
        CatalogCommands::List => commands::catalog::list(store, output),
        CatalogCommands::Show { reference } => commands::catalog::show(store, reference, output),
        CatalogCommands::Search { query } => commands::catalog::search(store, query, output),
        CatalogCommands::Delete { reference } => {
            commands::catalog::delete(store, reference, output)
        }
        CatalogCommands::Link { slug } => commands::catalog::link(store, slug, output),
        CatalogCommands::Seed => commands::catalog::seed(store, output),
    }
}

fn handle_user_command(command: UserCommands, store: &Store, output: &Output) -> Result<()> {
    match command {
        UserCommands::Create {
            username,
            role,
            password,
        } => commands::user::add(store, username, role.into(), password, output),
        UserCommands::List => commands::user::list(store, output),
        UserCommands::Passwd {
            reference,
            password,
        } => commands::user::passwd(store, reference, password, output),
        UserCommands::Delete { reference } => commands::user::delete(store, reference, output),
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}
