// src/cli/mod.rs
//! CLI definitions for jar2bundle
//!
//! This module contains the command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! - `convert` - Convert a JAR, or every JAR in a directory, into bundles
//! - `inspect` - Show the entries and manifest of a produced bundle
//! - `packages` - List the packages a JAR would export

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jar2bundle")]
#[command(version)]
#[command(about = "Wrap plain JAR archives as OSGi bundles", long_about = None)]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a JAR, or every JAR directly inside a directory
    Convert {
        /// JAR file or directory containing JAR files
        source: PathBuf,

        /// Existing directory that receives the bundles
        destination: PathBuf,

        /// Prefix for the symbolic name and output file name
        #[arg(short, long)]
        prefix: Option<String>,

        /// Replace bundles that already exist instead of skipping them
        #[arg(long)]
        overwrite: bool,

        /// Convert a directory's archives concurrently
        #[arg(long)]
        parallel: bool,

        /// Directory holding per-conversion staging directories
        #[arg(long)]
        staging_root: Option<PathBuf>,

        /// Remove leftover staging directories before converting
        #[arg(long)]
        purge_staging: bool,

        /// TOML configuration file; flags override its values
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show the entries and manifest of a bundle
    Inspect {
        /// Path to the bundle
        bundle: PathBuf,
    },

    /// List the packages a JAR would export
    Packages {
        /// Path to the JAR
        jar: PathBuf,
    },
}
