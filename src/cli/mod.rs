pub mod commands;
pub mod utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::config;
use crate::database::{DatabaseManager, MemoryStore, RecordStore};

#[derive(Parser)]
#[command(name = "admin")]
#[command(about = "Admin CLI - inspect menu, route and affiliation trees")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Read from a JSON fixture file instead of DATABASE_URL")]
    pub fixture: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Resolve a menu or affiliation tree")]
    Tree {
        #[command(subcommand)]
        cmd: commands::tree::TreeCommands,
    },

    #[command(about = "Permission tree or flat code list for buttons/interfaces")]
    Permissions(commands::permissions::PermissionArgs),

    #[command(about = "Front-end route trees")]
    Routes {
        #[command(subcommand)]
        cmd: commands::routes::RouteCommands,
    },

    #[command(about = "Route names of every page")]
    Pages,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.fixture {
        Some(path) => {
            let store = MemoryStore::from_fixture_file(&path).await?;
            dispatch(cli.command, store, output_format).await
        }
        None => {
            let store = DatabaseManager::connect(&config().database).await?;
            let result = dispatch(cli.command, store.clone(), output_format).await;
            store.close().await;
            result
        }
    }
}

async fn dispatch<S: RecordStore + Clone>(command: Commands, store: S, output_format: OutputFormat) -> anyhow::Result<()> {
    match command {
        Commands::Tree { cmd } => commands::tree::handle(cmd, store, output_format).await,
        Commands::Permissions(args) => commands::permissions::handle(args, store, output_format).await,
        Commands::Routes { cmd } => commands::routes::handle(cmd, store, output_format).await,
        Commands::Pages => commands::pages::handle(store, output_format).await,
    }
}
