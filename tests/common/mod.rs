//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use comic_catalog::app::{CatalogSource, Comic, Episode, HostTable};
use comic_catalog::errors::{SourceError, SourceResult};

/// How a mock dataset fetch answers
#[derive(Debug, Clone)]
pub enum Reply {
    Ok,
    Fail,
    Hang,
    Delay(Duration),
}

#[derive(Debug)]
struct Dataset<T> {
    reply: Reply,
    value: T,
}

/// Scriptable in-memory catalog source
#[derive(Debug)]
pub struct MockSource {
    all: Mutex<Dataset<Vec<Comic>>>,
    newest: Mutex<Dataset<Vec<Comic>>>,
    hosts: Mutex<Dataset<HostTable>>,
    pages: Mutex<Vec<String>>,
    requested_episodes: Mutex<Vec<String>>,
    fetches: AtomicUsize,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            all: Mutex::new(Dataset {
                reply: Reply::Ok,
                value: comics(&[("1", "One Piece"), ("2", "Naruto"), ("3", "One Punch Man")]),
            }),
            newest: Mutex::new(Dataset {
                reply: Reply::Ok,
                value: comics(&[("3", "One Punch Man")]),
            }),
            hosts: Mutex::new(Dataset {
                reply: Reply::Ok,
                value: hosts(&[("1", "https://img1.example.com"), ("2", "https://img2.example.com")]),
            }),
            pages: Mutex::new(vec![
                "//cdn.example.com/p1.jpg".to_string(),
                "https://cdn.example.com/p2.jpg".to_string(),
            ]),
            requested_episodes: Mutex::new(Vec::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn set_all(&self, reply: Reply, value: Vec<Comic>) {
        *self.all.lock() = Dataset { reply, value };
    }

    pub fn set_newest(&self, reply: Reply, value: Vec<Comic>) {
        *self.newest.lock() = Dataset { reply, value };
    }

    pub fn set_hosts(&self, reply: Reply, value: HostTable) {
        *self.hosts.lock() = Dataset { reply, value };
    }

    pub fn set_all_reply(&self, reply: Reply) {
        self.all.lock().reply = reply;
    }

    pub fn set_newest_reply(&self, reply: Reply) {
        self.newest.lock().reply = reply;
    }

    pub fn set_hosts_reply(&self, reply: Reply) {
        self.hosts.lock().reply = reply;
    }

    /// URLs passed to `fetch_episode_detail`, in call order
    pub fn requested_episodes(&self) -> Vec<String> {
        self.requested_episodes.lock().clone()
    }

    /// Number of dataset fetches started
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    async fn answer<T: Clone>(&self, dataset: &Mutex<Dataset<T>>, label: &str) -> SourceResult<T> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let (reply, value) = {
            let guard = dataset.lock();
            (guard.reply.clone(), guard.value.clone())
        };

        match reply {
            Reply::Ok => Ok(value),
            Reply::Fail => Err(SourceError::Unavailable {
                reason: format!("{} offline", label),
            }),
            Reply::Hang => std::future::pending().await,
            Reply::Delay(delay) => {
                tokio::time::sleep(delay).await;
                Ok(value)
            }
        }
    }
}

#[async_trait]
impl CatalogSource for MockSource {
    async fn fetch_all_comics(&self) -> SourceResult<Vec<Comic>> {
        self.answer(&self.all, "all").await
    }

    async fn fetch_newest_comics(&self) -> SourceResult<Vec<Comic>> {
        self.answer(&self.newest, "newest").await
    }

    async fn fetch_host_table(&self) -> SourceResult<HostTable> {
        self.answer(&self.hosts, "hosts").await
    }

    async fn fetch_episode_detail(&self, mut episode: Episode) -> SourceResult<Episode> {
        self.requested_episodes.lock().push(episode.url.clone());
        episode.pages = self.pages.lock().clone();
        Ok(episode)
    }

    fn comic_detail_url(&self, comic_id: &str) -> String {
        format!("https://comics.example.com/html/{}.html", comic_id)
    }
}

/// Comics with the given ids and names, one relative episode each
pub fn comics(entries: &[(&str, &str)]) -> Vec<Comic> {
    entries
        .iter()
        .map(|(id, name)| {
            let mut comic = Comic::new(*id, *name);
            comic.newest_episode = "10".to_string();
            comic.episodes = vec![
                Episode::new("1", format!("/comic/{}-1.html", id), "1"),
                Episode::new("2", format!("http://mirror.example.com/{}-2.html", id), "9"),
            ];
            comic
        })
        .collect()
}

pub fn hosts(entries: &[(&str, &str)]) -> HostTable {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
