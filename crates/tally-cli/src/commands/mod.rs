pub mod config;
pub mod report;

use tally_config::TallyConfig;

use crate::cli::Commands;

/// Route a parsed command to its handler.
pub async fn dispatch(command: Commands, config: &TallyConfig) -> anyhow::Result<()> {
    match command {
        Commands::Report => report::handle(config).await,
        Commands::Config => config::handle(config),
    }
}
