//! Command-line argument parsing for the comic catalog
//!
//! A small debugging surface over the catalog controller: load the catalog,
//! search it, inspect one comic, load an episode's pages, and manage the
//! configuration file.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Comic catalog - load and search a comic aggregation catalog
#[derive(Parser, Debug)]
#[command(
    name = "comic_catalog",
    version,
    about = "Load and search a comic aggregation catalog",
    long_about = "Fetches the full catalog, the newest list and the download host table in parallel,
then answers searches and lookups against the loaded snapshot."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the catalog and report what was fetched
    Load(LoadArgs),

    /// Load the catalog and search comic names
    Search(SearchArgs),

    /// Load the catalog and show one comic
    Show(ShowArgs),

    /// Load the page image URLs of one episode
    Episode(EpisodeArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the load command
#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    /// Print the load report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the search command
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Substring to look for in comic names
    pub keyword: String,

    /// Maximum number of matches to print
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the show command
#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Comic id
    pub id: String,

    /// Look the id up in the newest list instead of the full catalog
    #[arg(long)]
    pub newest: bool,
}

/// Arguments for the episode command
#[derive(Args, Debug, Clone)]
pub struct EpisodeArgs {
    /// Comic id
    pub comic_id: String,

    /// Zero-based episode position
    pub index: usize,
}

/// Arguments for configuration management
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a commented default configuration file
    Init {
        /// Target path (defaults to the user config directory)
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Check the effective configuration
    Validate,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log level implied by the verbosity flags
    pub fn log_level(&self) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }

    /// Whether any verbosity flag was given
    pub fn has_log_flag(&self) -> bool {
        self.global.quiet || self.global.verbose || self.global.very_verbose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from(["comic_catalog", "-v", "search", "One", "--limit", "5"])
            .unwrap();
        assert!(cli.global.verbose);
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.keyword, "One");
                assert_eq!(args.limit, Some(5));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_episode_and_config() {
        let cli = Cli::try_parse_from(["comic_catalog", "episode", "103", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Episode(EpisodeArgs { ref comic_id, index: 2 }) if comic_id == "103"
        ));

        let cli = Cli::try_parse_from(["comic_catalog", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigArgs {
                action: ConfigAction::Init { path: None, force: true }
            })
        ));
    }

    #[test]
    fn test_log_level() {
        let quiet = Cli::try_parse_from(["comic_catalog", "-q", "load"]).unwrap();
        let verbose = Cli::try_parse_from(["comic_catalog", "load", "--verbose"]).unwrap();
        let plain = Cli::try_parse_from(["comic_catalog", "load"]).unwrap();

        assert_eq!(quiet.log_level(), tracing::Level::ERROR);
        assert_eq!(verbose.log_level(), tracing::Level::INFO);
        assert_eq!(plain.log_level(), tracing::Level::WARN);
        assert!(!plain.has_log_flag());
    }
}
