//! Integration tests for the catalog controller

mod common;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::timeout;

use comic_catalog::app::{CatalogConfig, ComicCatalog, Episode, LoadReport};
use comic_catalog::errors::{CatalogError, PoolError, TransportError};
use common::{comics, MockSource, Reply};

fn start(source: &Arc<MockSource>) -> Arc<ComicCatalog> {
    ComicCatalog::start(CatalogConfig::default(), source.clone()).unwrap()
}

async fn loaded(source: &Arc<MockSource>) -> Arc<ComicCatalog> {
    let catalog = start(source);
    let report = catalog.load_all(|_| {}).await;
    assert!(report.is_complete());
    catalog
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn spawn_initial_load_reports_on_completion() {
    let source = Arc::new(MockSource::new());
    let catalog = start(&source);
    let (tx, rx) = oneshot::channel::<LoadReport>();

    catalog
        .spawn_initial_load(move |report| {
            let _ = tx.send(report.clone());
        })
        .unwrap();

    let report = timeout(Duration::from_secs(5), rx).await.unwrap().unwrap();
    assert!(report.is_complete());
    assert_eq!(catalog.all_comics().len(), 3);
    assert_eq!(catalog.newest_comics().len(), 1);
    assert_eq!(catalog.host_table().len(), 2);

    catalog.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn lookups_by_id() {
    let source = Arc::new(MockSource::new());
    let catalog = loaded(&source).await;

    let comic = catalog.find_by_id("2").unwrap();
    assert_eq!(comic.name(), "Naruto");
    assert_eq!(comic.name_with_newest_episode(), "Naruto[10]");
    assert!(catalog.find_by_id("404").is_none());
    assert!(catalog.find_newest_by_id("3").is_some());
    assert!(catalog.find_newest_by_id("1").is_none());

    catalog.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn search_runs_against_loaded_catalog() {
    let source = Arc::new(MockSource::new());
    let catalog = loaded(&source).await;

    let matches = timeout(Duration::from_secs(5), catalog.search_latest("One"))
        .await
        .unwrap()
        .unwrap();
    let mut names: Vec<_> = matches.iter().map(|c| c.name()).collect();
    names.sort();
    assert_eq!(names, vec!["One Piece", "One Punch Man"]);

    catalog.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn episode_pages_resolve_relative_urls() {
    let source = Arc::new(MockSource::new());
    let catalog = loaded(&source).await;

    let episode = Episode::new("1", "/comic/1-1.html", "1");
    let loaded = catalog.load_episode_pages(episode).await.unwrap();

    assert_eq!(loaded.url, "https://img1.example.com/comic/1-1.html");
    assert_eq!(
        loaded.pages,
        vec![
            "https://cdn.example.com/p1.jpg".to_string(),
            "https://cdn.example.com/p2.jpg".to_string(),
        ]
    );
    assert_eq!(
        source.requested_episodes(),
        vec!["https://img1.example.com/comic/1-1.html".to_string()]
    );

    catalog.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn absolute_episode_urls_skip_host_lookup() {
    let source = Arc::new(MockSource::new());
    let catalog = loaded(&source).await;

    // Category 9 has no host, but the URL is already absolute
    let episode = Episode::new("2", "http://mirror.example.com/1-2.html", "9");
    let loaded = catalog.load_episode_pages(episode).await.unwrap();
    assert_eq!(loaded.url, "http://mirror.example.com/1-2.html");
    assert!(loaded.is_detail_loaded());

    catalog.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn unknown_host_is_reported() {
    let source = Arc::new(MockSource::new());
    let catalog = loaded(&source).await;

    let episode = Episode::new("1", "/comic/x.html", "42");
    let err = catalog.load_episode_pages(episode).await.unwrap_err();
    assert!(matches!(err, CatalogError::UnknownHost { ref catid } if catid == "42"));
    assert!(source.requested_episodes().is_empty());

    catalog.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn comic_episode_pages_are_written_back() {
    let source = Arc::new(MockSource::new());
    let catalog = loaded(&source).await;

    let loaded = catalog.load_comic_episode("1", 0).await.unwrap();
    assert_eq!(loaded.pages.len(), 2);

    let comic = catalog.find_by_id("1").unwrap();
    assert_eq!(comic.episodes()[0], loaded);
    assert!(!comic.episodes()[1].is_detail_loaded());

    // Every holder of the snapshot sees the update
    let from_list = catalog.all_comics().iter().find(|c| c.id() == "1").cloned().unwrap();
    assert!(from_list.episodes()[0].is_detail_loaded());

    assert!(matches!(
        catalog.load_comic_episode("1", 5).await,
        Err(CatalogError::EpisodeNotFound { index: 5, .. })
    ));
    assert!(matches!(
        catalog.load_comic_episode("nope", 0).await,
        Err(CatalogError::NotFound { .. })
    ));

    catalog.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn ordered_episode_loads_finish_in_submission_order() {
    let source = Arc::new(MockSource::new());
    let catalog = loaded(&source).await;
    let finished = Arc::new(Mutex::new(Vec::new()));

    for i in 0..10 {
        let finished = finished.clone();
        let episode = Episode::new(i.to_string(), format!("/comic/1-{}.html", i), "2");
        catalog
            .load_episode_pages_with(episode, move |result| {
                let episode = result.unwrap();
                finished.lock().push(episode.name);
            })
            .unwrap();
    }

    catalog.shutdown().await.unwrap();
    let expected: Vec<String> = (0..10).map(|i| i.to_string()).collect();
    assert_eq!(*finished.lock(), expected);
    assert!(source
        .requested_episodes()
        .iter()
        .all(|url| url.starts_with("https://img2.example.com/comic/1-")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn ordered_tasks_run_fifo() {
    let source = Arc::new(MockSource::new());
    let catalog = start(&source);
    let order = Arc::new(Mutex::new(Vec::new()));

    for i in 0..20u64 {
        let order = order.clone();
        catalog
            .add_ordered_task(async move {
                tokio::time::sleep(Duration::from_millis((20 - i) % 3)).await;
                order.lock().push(i);
                Ok(())
            })
            .unwrap();
    }

    catalog.shutdown().await.unwrap();
    assert_eq!(*order.lock(), (0..20).collect::<Vec<_>>());
    assert_eq!(catalog.stats().ordered_tasks.completed, 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn failed_reload_keeps_comics_available() {
    let source = Arc::new(MockSource::new());
    let catalog = loaded(&source).await;

    source.set_all_reply(Reply::Fail);
    source.set_newest(Reply::Ok, comics(&[("1", "One Piece")]));
    let report = catalog.load_all(|_| {}).await;

    assert!(!report.is_complete());
    assert_eq!(catalog.all_comics().len(), 3);
    assert_eq!(catalog.newest_comics()[0].id(), "1");

    catalog.shutdown().await.unwrap();
}

#[tokio::test]
async fn detail_url_comes_from_source() {
    let source = Arc::new(MockSource::new());
    let catalog = start(&source);
    assert_eq!(
        catalog.comic_detail_url("77"),
        "https://comics.example.com/html/77.html"
    );
    catalog.shutdown().await.unwrap();
}

#[tokio::test]
async fn request_get_http_rejects_bad_url() {
    let source = Arc::new(MockSource::new());
    let catalog = start(&source);
    let err = catalog.request_get_http("::not a url::", "").await.unwrap_err();
    assert!(matches!(err, TransportError::InvalidUrl { .. }));
    catalog.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_closes_everything() {
    let source = Arc::new(MockSource::new());
    let catalog = start(&source);
    catalog.shutdown().await.unwrap();

    assert!(matches!(
        catalog.add_task(async { Ok(()) }),
        Err(PoolError::Closed { .. })
    ));
    assert!(catalog.add_ordered_task(async { Ok(()) }).is_err());
    assert!(catalog.search("x", |_| {}).is_err());
    // Second shutdown is a no-op
    catalog.shutdown().await.unwrap();
}
