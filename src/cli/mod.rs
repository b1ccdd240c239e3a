//! Command-line interface components
//!
//! Argument parsing and the command handlers that drive the catalog
//! controller from the terminal.

pub mod args;
pub mod commands;

pub use args::{
    Cli, Commands, ConfigAction, ConfigArgs, EpisodeArgs, GlobalArgs, LoadArgs, SearchArgs,
    ShowArgs,
};
pub use commands::{
    build_catalog, handle_config, handle_episode, handle_load, handle_search, handle_show,
};
