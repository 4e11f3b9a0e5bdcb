//! storydoc CLI - component documentation from Storybook stories.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "storydoc")]
#[command(about = "Extract component documentation from Storybook stories")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to storydoc.toml config file
    #[arg(short, long, default_value = "storydoc.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the framework detected for the project
    Detect,

    /// Print the documentation of one story as JSON
    Docs {
        /// Story id, e.g. "example-button--primary"
        story_id: String,
    },

    /// Write documentation JSON for every story in the index
    Build {
        /// Output directory (defaults to config or "storydoc-api")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Worker threads (defaults to config or available parallelism)
        #[arg(short = 'j', long)]
        threads: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (stderr; stdout carries command output)
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Detect => {
            commands::detect::run(&config)?;
        }
        Commands::Docs { story_id } => {
            commands::docs::run(&config, &story_id)?;
        }
        Commands::Build { output, threads } => {
            commands::build::run(&config, output, threads).await?;
        }
    }

    Ok(())
}
