use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// geoviz-wizard - pick the right hosted visualization service for a geospatial file
#[derive(Parser, Debug)]
#[command(name = "geoviz-wizard")]
#[command(about = "Validate a geospatial file reference and recommend a visualization service")]
#[command(version)]
pub struct Cli {
    /// JSON configuration file with service endpoints
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log file used while the TUI is running
    /// (default: geoviz-wizard.log in the temp directory)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive wizard (default)
    Wizard {
        /// Pre-fill the file reference field
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Validate a reference and print the recommendation without the TUI
    Check {
        /// S3 URL, HTTPS URL, or CMR concept ID
        input: String,

        /// Print the report and recommendation as JSON
        #[arg(long)]
        json: bool,

        /// Fetch statistics and print a histogram (COG input only)
        #[arg(long)]
        stats: bool,
    },
    /// Inspect or create configuration files
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration (file plus environment)
    Show,
    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        path: PathBuf,
    },
    /// Write a configuration file with default values
    Init {
        /// Destination path
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
