//! Command handlers for the comic catalog CLI
//!
//! Each handler builds a controller from the effective configuration, runs
//! the initial load where needed, prints its result, and shuts the
//! controller down before returning.

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::app::catalog::ComicView;
use crate::app::controller::ComicCatalog;
use crate::app::loader::LoadReport;
use crate::app::source::JsonCatalogSource;
use crate::cli::{ConfigAction, ConfigArgs, EpisodeArgs, LoadArgs, SearchArgs, ShowArgs};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Build a controller backed by the configured JSON endpoints
pub fn build_catalog(config: &AppConfig) -> Result<Arc<ComicCatalog>> {
    config.validate()?;
    let (catalog_config, source_config) = config.to_runtime_config();
    let client = catalog_config.client.build_http_client()?;
    let source = Arc::new(JsonCatalogSource::new(source_config, client));
    ComicCatalog::start(catalog_config, source)
}

/// Run the initial load behind a spinner
async fn load_catalog(catalog: &ComicCatalog, quiet: bool) -> Result<LoadReport> {
    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .map_err(|e| AppError::generic(format!("Spinner template error: {}", e)))?
            .tick_strings(&["◐", "◓", "◑", "◒"]),
    );
    spinner.set_message("Loading catalog...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let report = catalog
        .load_all(|report| debug!("Initial load settled: {}", report))
        .await;

    spinner.finish_and_clear();
    for (dataset, outcome) in report.failures() {
        warn!("{} not refreshed: {}", dataset, outcome);
    }
    Ok(report)
}

fn print_comic_line(comic: &ComicView) {
    println!("{:>8}  {}", comic.id(), comic.name_with_newest_episode());
}

/// Handle the load command
pub async fn handle_load(config: &AppConfig, args: LoadArgs, quiet: bool) -> Result<()> {
    let catalog = build_catalog(config)?;
    let report = load_catalog(&catalog, quiet).await?;

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::generic(format!("Failed to render report: {}", e)))?;
        println!("{}", json);
    } else {
        println!("Catalog load finished in {:.2?}", report.elapsed);
        for (dataset, outcome) in report.outcomes() {
            let mark = if outcome.is_loaded() { "✅" } else { "❌" };
            println!("  {} {:<14} {}", mark, dataset, outcome);
        }
    }

    catalog.shutdown().await
}

/// Handle the search command
pub async fn handle_search(config: &AppConfig, args: SearchArgs, quiet: bool) -> Result<()> {
    let catalog = build_catalog(config)?;
    let report = load_catalog(&catalog, quiet).await?;
    if !report.all_comics.is_loaded() {
        warn!("Searching without a fresh catalog");
    }

    info!("Searching for '{}'", args.keyword);
    let mut matches = catalog.search_latest(args.keyword.as_str()).await?;
    matches.sort_by_key(|c| c.name());

    let total = matches.len();
    let shown = args.limit.unwrap_or(total).min(total);
    for comic in matches.iter().take(shown) {
        print_comic_line(comic);
    }
    if shown < total {
        println!("... {} more", total - shown);
    }
    if !quiet {
        println!("{} matches for '{}'", total, args.keyword);
    }

    catalog.shutdown().await
}

/// Handle the show command
pub async fn handle_show(config: &AppConfig, args: ShowArgs, quiet: bool) -> Result<()> {
    let catalog = build_catalog(config)?;
    load_catalog(&catalog, quiet).await?;

    let found = if args.newest {
        catalog.find_newest_by_id(&args.id)
    } else {
        catalog.find_by_id(&args.id)
    };

    match found {
        Some(comic) => {
            println!("{}", comic.name());
            println!("  id:          {}", comic.id());
            println!("  author:      {}", comic.author());
            println!("  newest:      {}", comic.newest_episode());
            println!("  updated:     {}", comic.latest_update_date_time());
            println!("  icon:        {}", comic.icon_url());
            println!("  detail page: {}", catalog.comic_detail_url(&comic.id()));
            if let Some(description) = comic.description() {
                println!("  description: {}", description);
            }
            let names = comic.episode_names();
            println!("  episodes:    {}", names.len());
            for (index, name) in names.iter().enumerate() {
                println!("    [{}] {}", index, name);
            }
        }
        None => println!("{}", not_found_message(&args.id, args.newest)),
    }

    catalog.shutdown().await
}

fn not_found_message(id: &str, newest: bool) -> String {
    if newest {
        format!("Comic {} is not in the newest list", id)
    } else {
        format!("Comic {} not found", id)
    }
}

/// Handle the episode command
pub async fn handle_episode(config: &AppConfig, args: EpisodeArgs, quiet: bool) -> Result<()> {
    let catalog = build_catalog(config)?;
    load_catalog(&catalog, quiet).await?;

    let result = catalog
        .load_comic_episode(&args.comic_id, args.index)
        .await
        .map_err(AppError::from);

    if let Ok(episode) = &result {
        println!("{} ({} pages)", episode.name, episode.pages.len());
        for page in &episode.pages {
            println!("  {}", page);
        }
    }

    catalog.shutdown().await?;
    result.map(|_| ())
}

/// Handle configuration management
pub async fn handle_config(config: &AppConfig, args: ConfigArgs) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        ConfigAction::Init { path, force } => {
            let (path, written) = AppConfig::init(path, force).await?;
            if written {
                println!("📁 Created default configuration file:");
                println!("   {}", path.display());
            } else {
                println!("Configuration file already exists: {}", path.display());
                println!("   Use --force to overwrite it.");
            }
            Ok(())
        }
        ConfigAction::Validate => {
            config.validate()?;
            println!("✅ Configuration is valid");
            Ok(())
        }
    }
}
