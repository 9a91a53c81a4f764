use clap::Parser;
use tokio::runtime::Runtime;
use tracing::Level;

use ragstore_core::logging::{init_logging, LoggingConfig};

mod commands;
use commands::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so search output on stdout stays machine-readable
    let mut logging_config = LoggingConfig::from_env();
    if cli.global.verbose {
        logging_config = logging_config.with_level(Level::DEBUG);
    }
    init_logging(logging_config)?;

    let rt = Runtime::new()?;
    rt.block_on(commands::run_command(cli))
}
