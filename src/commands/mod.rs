use clap::ValueEnum;

mod cats;
mod config_cmd;
mod flag;
mod sync_cmd;

pub use cats::CatsCommand;
pub use config_cmd::ConfigCommand;
pub use flag::FlagCommand;
pub use sync_cmd::SyncCommand;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
