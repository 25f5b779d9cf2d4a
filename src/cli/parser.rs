use crate::parser::PageKind;
use clap::{Parser, Subcommand, ValueEnum};

/// Command-line interface definition for worktracker
/// Reads pages saved from the time-tracking server and mirrors them into SQLite
#[derive(Parser)]
#[command(
    name = "worktracker",
    version = env!("CARGO_PKG_VERSION"),
    about = "Scrape time-tracker pages and keep a local SQLite mirror in sync",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// What `list` shows from the local cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListTarget {
    Projects,
    Tasks,
    Records,
    Report,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Inspect the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Parse a saved page and print what it contains
    Parse {
        /// Which screen the page was saved from
        #[arg(value_enum)]
        kind: PageKind,

        /// HTML file to read ("-" for stdin)
        file: String,

        #[arg(long, help = "Day shown by the page when it does not say (YYYY-MM-DD)")]
        date: Option<String>,

        #[arg(long, help = "First day a report was requested for (YYYY-MM-DD)")]
        from: Option<String>,

        #[arg(long, help = "Last day a report was requested for (YYYY-MM-DD)")]
        to: Option<String>,

        #[arg(long, help = "Print the page as JSON")]
        json: bool,
    },

    /// Parse a saved page and reconcile the local cache with it
    Sync {
        #[arg(value_enum)]
        kind: PageKind,

        /// HTML file to read ("-" for stdin)
        file: String,

        #[arg(long, help = "Day shown by the page when it does not say (YYYY-MM-DD)")]
        date: Option<String>,

        #[arg(long, help = "First day a report was requested for (YYYY-MM-DD)")]
        from: Option<String>,

        #[arg(long, help = "Last day a report was requested for (YYYY-MM-DD)")]
        to: Option<String>,

        #[arg(long, help = "Reconcile even when the page shows a server error")]
        force: bool,
    },

    /// List what the local cache holds
    List {
        #[arg(value_enum)]
        what: ListTarget,

        #[arg(long, help = "First day to list (YYYY-MM-DD)")]
        from: Option<String>,

        #[arg(long, help = "Last day to list (YYYY-MM-DD)")]
        to: Option<String>,
    },
}
