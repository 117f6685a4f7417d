//! optbridge CLI - generates widget adapter sources from option schemas.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "optbridge")]
#[command(about = "Generates widget adapter sources from option schemas")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to optbridge.toml config file
    #[arg(short, long, default_value = "optbridge.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default config and a sample schema
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Generate adapter sources for every schema
    Generate {
        /// Schemas directory (defaults to config or "schemas")
        #[arg(short, long)]
        schemas: Option<PathBuf>,

        /// Output directory (defaults to config or "generated")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail if generated files are missing or out of date instead of writing them
        #[arg(long)]
        check: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes)?;
        }
        Commands::Generate {
            schemas,
            output,
            check,
        } => {
            commands::generate::run(&cli.config, schemas, output, check)?;
        }
    }

    Ok(())
}
