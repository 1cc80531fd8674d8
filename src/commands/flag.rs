use clap::{Args, Subcommand};
use sqlx::SqlitePool;

use super::OutputFormat;
use catsync::FeatureFlags;

#[derive(Args)]
pub struct FlagCommand {
    #[command(subcommand)]
    pub command: FlagSubcommand,
}

#[derive(Subcommand)]
pub enum FlagSubcommand {
    /// List all feature flags
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Register a flag (disabled) if it does not exist yet
    Init {
        /// Flag name
        name: String,
    },

    /// Enable a flag
    Enable {
        /// Flag name
        name: String,
    },

    /// Disable a flag
    Disable {
        /// Flag name
        name: String,
    },
}

impl FlagCommand {
    pub async fn run(&self, pool: &SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
        let flags = FeatureFlags::new(pool.clone());

        match &self.command {
            FlagSubcommand::List { format } => {
                let all = flags.list().await?;

                if all.is_empty() {
                    println!("No feature flags found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&all)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<30}  {:<8}  UPDATED", "NAME", "ENABLED");
                        println!("{}", "-".repeat(60));
                        for flag in &all {
                            println!(
                                "{:<30}  {:<8}  {}",
                                flag.name,
                                if flag.enabled { "yes" } else { "no" },
                                flag.updated_at.format("%Y-%m-%d %H:%M")
                            );
                        }
                    }
                }
                Ok(())
            }

            FlagSubcommand::Init { name } => {
                let enabled = flags.ensure(name).await?;
                println!(
                    "Flag '{}' is {}",
                    name.trim(),
                    if enabled { "enabled" } else { "disabled" }
                );
                Ok(())
            }

            FlagSubcommand::Enable { name } => {
                flags.set(name, true).await?;
                println!("Enabled '{}'", name.trim());
                Ok(())
            }

            FlagSubcommand::Disable { name } => {
                flags.set(name, false).await?;
                println!("Disabled '{}'", name.trim());
                Ok(())
            }
        }
    }
}
