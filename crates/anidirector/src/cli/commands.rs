//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Anidirector - storyboard studio for short 3D animated films
#[derive(Parser, Debug)]
#[command(name = "anidirector")]
#[command(about = "Storyboard studio for short 3D animated films", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Store directory (overrides storage.data_dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List saved projects
    Projects {
        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// List the character roster
    Characters {
        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Write a project backup
    Export {
        /// ID of the saved project
        project_id: String,

        /// Backup file to write
        out: PathBuf,
    },

    /// Restore a backup as a new project
    Import {
        /// Backup file to read
        backup: PathBuf,
    },

    /// Generate missing concept images for a project
    Generate {
        /// ID of the saved project
        project_id: String,

        /// Only scenes of this act (1-3)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
        act: Option<u8>,

        /// Use the pro image model
        #[arg(long)]
        pro: bool,

        /// Provider tier from configuration
        #[arg(long)]
        tier: Option<String>,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
