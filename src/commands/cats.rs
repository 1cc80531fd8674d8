use clap::{Args, Subcommand};
use sqlx::SqlitePool;

use super::OutputFormat;
use catsync::CatRepository;

#[derive(Args)]
pub struct CatsCommand {
    #[command(subcommand)]
    pub command: CatsSubcommand,
}

#[derive(Subcommand)]
pub enum CatsSubcommand {
    /// List synced cats
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show one cat by its integration id
    Show {
        /// External (integration) id
        external_id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl CatsCommand {
    pub async fn run(&self, pool: &SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
        let repo = CatRepository::new(pool.clone());

        match &self.command {
            CatsSubcommand::List { format } => {
                let cats = repo.list().await?;

                if cats.is_empty() {
                    println!("No cats found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&cats)?);
                    }
                    OutputFormat::Text => {
                        println!(
                            "{:<6}  {:<20}  {:<24}  {:<16}  COLOR",
                            "ID", "EXTERNAL ID", "NAME", "BREED"
                        );
                        println!("{}", "-".repeat(80));
                        for cat in &cats {
                            println!(
                                "{:<6}  {:<20}  {:<24}  {:<16}  {}",
                                cat.id,
                                truncate(&cat.external_id, 20),
                                truncate(cat.name.as_deref().unwrap_or("-"), 24),
                                truncate(cat.breed.as_deref().unwrap_or("-"), 16),
                                cat.color.as_deref().unwrap_or("-")
                            );
                        }
                        println!("\nTotal: {} cat(s)", cats.len());
                    }
                }
                Ok(())
            }

            CatsSubcommand::Show {
                external_id,
                format,
            } => match repo.get_by_external_id(external_id).await? {
                Some(cat) => {
                    match format {
                        OutputFormat::Json => {
                            println!("{}", serde_json::to_string_pretty(&cat)?);
                        }
                        OutputFormat::Text => {
                            println!("{}", cat);
                        }
                    }
                    Ok(())
                }
                None => Err(format!("Cat not found: {}", external_id).into()),
            },
        }
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() > width {
        let kept: String = value.chars().take(width - 3).collect();
        format!("{}...", kept)
    } else {
        value.to_string()
    }
}
