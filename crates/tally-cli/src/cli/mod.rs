use clap::{Parser, Subcommand};

pub mod global;

pub use global::GlobalFlags;

/// Top-level CLI parser for the `tally` binary.
#[derive(Debug, Parser)]
#[command(
    name = "tally",
    version,
    about = "Reconcile Harvest time entries with task estimates and GitHub issues"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (errors only on stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Harvest project id (overrides harvest.project_id)
    #[arg(long, global = true)]
    pub project_id: Option<u64>,

    /// First day of the range, YYYYMMDD (overrides harvest.from)
    #[arg(long, global = true)]
    pub from: Option<String>,

    /// Last day of the range, YYYYMMDD (overrides harvest.to)
    #[arg(long, global = true)]
    pub to: Option<String>,

    /// Time zone for the date columns: local, utc or +HH:MM (overrides general.timezone)
    #[arg(long, global = true)]
    pub timezone: Option<String>,

    /// Dotenv file to load before reading configuration
    #[arg(long, global = true)]
    pub env_file: Option<String>,
}

/// Top-level command tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Print the reconciled report (default).
    #[default]
    Report,
    /// Print the effective configuration with secrets masked.
    Config,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            quiet: self.quiet,
            verbose: self.verbose,
            project_id: self.project_id,
            from: self.from.clone(),
            to: self.to.clone(),
            timezone: self.timezone.clone(),
            env_file: self.env_file.clone(),
        }
    }
}
