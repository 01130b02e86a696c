use super::cache::{TileCache, TileEntry};
use super::source::{TileSource, UrlTemplateSource};
use crate::core::config::TileLoadingConfig;
use crate::core::geo::TileCoord;
use crate::prelude::HashSet;
use crate::{Error, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Shared blocking HTTP client with a custom User-Agent so that public tile
/// servers (e.g. OpenStreetMap) don't reject the request. Building the client
/// once avoids TLS and connection pool setup for every tile.
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    let defaults = TileLoadingConfig::default();
    build_client(&defaults).unwrap_or_else(|e| {
        log::warn!("falling back to a plain HTTP client: {}", e);
        Client::new()
    })
});

fn build_client(config: &TileLoadingConfig) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_millis(config.timeout_ms))
        .build()?)
}

/// Result of a single fetch that reached the server
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Bytes(Vec<u8>),
    /// HTTP 404: the tile does not exist
    NotFound,
}

/// Anything that can turn a tile URL into bytes
pub trait TileFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<FetchOutcome>;
}

/// Blocking HTTP fetcher backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Fetcher on the shared client with default User-Agent and timeout
    pub fn new() -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
        }
    }

    /// Fetcher with the User-Agent and timeout from `config`
    pub fn from_config(config: &TileLoadingConfig) -> Result<Self> {
        let defaults = TileLoadingConfig::default();
        if config.user_agent == defaults.user_agent && config.timeout_ms == defaults.timeout_ms {
            return Ok(Self::new());
        }
        Ok(Self {
            client: build_client(config)?,
        })
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl TileFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchOutcome> {
        let response = self.client.get(url).send()?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(FetchOutcome::NotFound);
        }
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(FetchOutcome::Bytes(response.bytes()?.to_vec()))
    }
}

/// What the renderer should draw for a tile
#[derive(Debug, Clone, PartialEq)]
pub enum TileAvailability {
    Ready(Arc<Vec<u8>>),
    /// Queued or downloading
    Loading,
    /// Missing on the server, or the fetch failed
    Unavailable,
}

impl TileAvailability {
    pub fn is_ready(&self) -> bool {
        matches!(self, TileAvailability::Ready(_))
    }
}

#[derive(Debug)]
struct LoadResult {
    coord: TileCoord,
    outcome: Result<FetchOutcome>,
}

/// Fetches tiles on worker threads and caches what comes back.
///
/// The owner drives it from the UI thread: [`TileLoader::request_visible`]
/// with the current visible set, then [`TileLoader::poll`] once per frame to
/// collect finished downloads. At most `max_concurrent` fetches run at once;
/// the rest wait in a FIFO queue. Failed fetches are not retried until
/// [`TileLoader::retry_failed`] is called.
pub struct TileLoader {
    source: Arc<dyn TileSource>,
    fetcher: Arc<dyn TileFetcher>,
    cache: TileCache,
    max_concurrent: usize,
    queue: VecDeque<TileCoord>,
    in_flight: HashSet<TileCoord>,
    failed: HashSet<TileCoord>,
    result_tx: Sender<LoadResult>,
    result_rx: Receiver<LoadResult>,
    notifier: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl TileLoader {
    pub fn new(
        source: Arc<dyn TileSource>,
        fetcher: Arc<dyn TileFetcher>,
        config: &TileLoadingConfig,
    ) -> Self {
        let (result_tx, result_rx) = unbounded();
        Self {
            source,
            fetcher,
            cache: TileCache::new(config.cache_size),
            max_concurrent: config.max_concurrent.max(1),
            queue: VecDeque::new(),
            in_flight: HashSet::default(),
            failed: HashSet::default(),
            result_tx,
            result_rx,
            notifier: None,
        }
    }

    /// HTTP loader for the configured URL template
    pub fn from_config(config: &TileLoadingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            Arc::new(UrlTemplateSource::from_config(config)),
            Arc::new(HttpFetcher::from_config(config)?),
            config,
        ))
    }

    /// Called from the worker thread after each finished fetch, e.g. to
    /// request a repaint.
    pub fn with_notifier(mut self, notifier: impl Fn() + Send + Sync + 'static) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    pub fn cache(&self) -> &TileCache {
        &self.cache
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    pub fn availability(&self, coord: TileCoord) -> TileAvailability {
        match self.cache.get(&coord) {
            Some(TileEntry::Ready(bytes)) => TileAvailability::Ready(bytes),
            Some(TileEntry::Missing) => TileAvailability::Unavailable,
            None if self.failed.contains(&coord) => TileAvailability::Unavailable,
            None => TileAvailability::Loading,
        }
    }

    /// Queues `coord` unless it is cached, loading, queued or failed.
    pub fn request(&mut self, coord: TileCoord) {
        self.enqueue(coord);
        self.pump();
    }

    /// Replaces the wanted set. Queued tiles that are no longer visible are
    /// dropped; downloads already running are left to finish into the cache.
    pub fn request_visible(&mut self, coords: &[TileCoord]) {
        let wanted: HashSet<TileCoord> = coords.iter().copied().collect();
        let before = self.queue.len();
        self.queue.retain(|coord| wanted.contains(coord));
        let dropped = before - self.queue.len();
        if dropped > 0 {
            log::trace!("dropped {} stale tile requests", dropped);
        }

        for &coord in coords {
            self.enqueue(coord);
        }
        self.pump();
    }

    /// Forgets failures so the next request fetches those tiles again
    pub fn retry_failed(&mut self) -> usize {
        let count = self.failed.len();
        self.failed.clear();
        count
    }

    /// Collects finished downloads without blocking. Returns how many landed.
    pub fn poll(&mut self) -> usize {
        let mut received = 0;
        while let Ok(result) = self.result_rx.try_recv() {
            self.apply_result(result);
            received += 1;
        }
        if received > 0 {
            self.pump();
        }
        received
    }

    /// Waits up to `timeout` for at least one download, then collects all
    /// that are ready.
    pub fn poll_blocking(&mut self, timeout: Duration) -> usize {
        if self.in_flight.is_empty() {
            return self.poll();
        }
        match self.result_rx.recv_timeout(timeout) {
            Ok(result) => {
                self.apply_result(result);
                self.pump();
                1 + self.poll()
            }
            Err(_) => 0,
        }
    }

    fn enqueue(&mut self, coord: TileCoord) {
        if !coord.is_valid()
            || self.cache.contains(&coord)
            || self.in_flight.contains(&coord)
            || self.failed.contains(&coord)
            || self.queue.contains(&coord)
        {
            return;
        }
        self.queue.push_back(coord);
    }

    fn pump(&mut self) {
        while self.in_flight.len() < self.max_concurrent {
            let Some(coord) = self.queue.pop_front() else {
                break;
            };
            self.spawn_fetch(coord);
        }
    }

    fn spawn_fetch(&mut self, coord: TileCoord) {
        let url = self.source.url(coord);
        let fetcher = Arc::clone(&self.fetcher);
        let result_tx = self.result_tx.clone();
        let notifier = self.notifier.clone();

        log::debug!("fetch tile {} from {}", coord, url);
        self.in_flight.insert(coord);

        thread::spawn(move || {
            let outcome = fetcher.fetch(&url);
            // The loader may be gone; nothing to report to then
            let _ = result_tx.send(LoadResult { coord, outcome });
            if let Some(notify) = notifier {
                notify();
            }
        });
    }

    fn apply_result(&mut self, result: LoadResult) {
        let LoadResult { coord, outcome } = result;
        self.in_flight.remove(&coord);

        match outcome {
            Ok(FetchOutcome::Bytes(bytes)) => {
                log::debug!("tile {} fetched ({} bytes)", coord, bytes.len());
                self.cache.insert(coord, bytes);
            }
            Ok(FetchOutcome::NotFound) => {
                log::warn!("tile {} not found", coord);
                self.cache.mark_missing(coord);
            }
            Err(e) => {
                log::error!("tile {} failed: {}", coord, e);
                self.failed.insert(coord);
            }
        }
    }
}

impl std::fmt::Debug for TileLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileLoader")
            .field("max_concurrent", &self.max_concurrent)
            .field("queued", &self.queue.len())
            .field("in_flight", &self.in_flight.len())
            .field("failed", &self.failed.len())
            .field("cached", &self.cache.len())
            .finish()
    }
}
