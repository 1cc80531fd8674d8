use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use catsync::config::Config;
use catsync::init_db;
use commands::{CatsCommand, ConfigCommand, FlagCommand, SyncCommand};

#[derive(Parser)]
#[command(name = "catsync")]
#[command(version)]
#[command(about = "Sync cats from the integration API into local storage", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync one tenant's cats
    Sync(SyncCommand),

    /// Inspect synced cats
    Cats(CatsCommand),

    /// Manage feature flags
    Flag(FlagCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catsync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Sync(cmd)) => {
            let pool = init_db(&config.database_path.value).await?;
            return cmd.run(&pool, &config).await;
        }
        Some(Commands::Cats(cmd)) => {
            let pool = init_db(&config.database_path.value).await?;
            cmd.run(&pool).await?;
        }
        Some(Commands::Flag(cmd)) => {
            let pool = init_db(&config.database_path.value).await?;
            cmd.run(&pool).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(ExitCode::SUCCESS)
}
