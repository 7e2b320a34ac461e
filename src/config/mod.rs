pub mod cli;
pub mod file_config;

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "sprint-report")]
#[command(about = "Sprint statistics from Jira: epics, team and member velocity")]
pub struct Cli {
    /// Path to the configuration file (TOML, or YAML for .yml/.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write CSV reports: epics, velocity of teams and velocity of members
    Stats(ReportArgs),
    /// Write a single zip workbook with planned/delivered epics and team velocity
    Workbook(ReportArgs),
    /// Print sprint detail as JSON
    Sprint {
        /// Sprint id, overrides `sprint_id` from the config file
        #[arg(long)]
        sprint: Option<u64>,
    },
    /// Print issue detail as JSON
    Issue {
        /// Issue key, e.g. CORE-123
        key: String,
    },
    /// List agile boards
    Boards,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    /// Sprint id, overrides `sprint_id` from the config file
    #[arg(long)]
    pub sprint: Option<u64>,

    /// Output folder, overrides `output_folder` from the config file
    #[arg(long)]
    pub output: Option<String>,
}
