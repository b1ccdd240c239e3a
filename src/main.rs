//! Comic catalog CLI application
//!
//! Command-line front end for loading and searching a comic aggregation
//! catalog through the catalog controller.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use comic_catalog::cli::{
    handle_config, handle_episode, handle_load, handle_search, handle_show, Cli, Commands,
};
use comic_catalog::config::AppConfig;
use comic_catalog::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error [{}]: {}", e.category(), e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    let config = AppConfig::load(cli.global.config.clone()).await?;

    init_logging(&cli, &config);
    info!("Comic catalog v{} starting", env!("CARGO_PKG_VERSION"));

    let quiet = cli.global.quiet;
    match cli.command {
        Commands::Load(args) => handle_load(&config, args, quiet).await,
        Commands::Search(args) => handle_search(&config, args, quiet).await,
        Commands::Show(args) => handle_show(&config, args, quiet).await,
        Commands::Episode(args) => handle_episode(&config, args, quiet).await,
        Commands::Config(args) => handle_config(&config, args).await,
    }
}

/// Initialize logging from CLI flags, `RUST_LOG`, or `[logging].level`
fn init_logging(cli: &Cli, config: &AppConfig) {
    let level = if cli.has_log_flag() {
        cli.log_level().to_string().to_lowercase()
    } else {
        config.logging.level.to_lowercase()
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("comic_catalog={}", level)));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
