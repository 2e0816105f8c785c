// src/main.rs

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; --verbose only changes the fallback level
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Convert {
            source,
            destination,
            prefix,
            overwrite,
            parallel,
            staging_root,
            purge_staging,
            config,
        } => {
            let options = commands::ConvertOptions {
                prefix,
                overwrite,
                parallel,
                staging_root,
                purge_staging,
                config,
            };
            commands::cmd_convert(&source, &destination, &options)
        }
        Commands::Inspect { bundle } => commands::cmd_inspect(&bundle),
        Commands::Packages { jar } => commands::cmd_packages(&jar),
    }
}
