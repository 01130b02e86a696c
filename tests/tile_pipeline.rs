use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tileview::prelude::*;

/// Tile pipeline tests against an in-memory fetcher; no network access.

/// Records every URL it is asked for. Tiles listed in `missing` answer 404,
/// tiles in `broken` fail like a dropped connection.
#[derive(Default)]
struct StubFetcher {
    requested: Mutex<Vec<String>>,
    missing: Vec<String>,
    broken: Vec<String>,
    calls: AtomicUsize,
}

impl TileFetcher for StubFetcher {
    fn fetch(&self, url: &str) -> Result<FetchOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(url.to_string());
        }
        if self.missing.iter().any(|m| m == url) {
            return Ok(FetchOutcome::NotFound);
        }
        if self.broken.iter().any(|b| b == url) {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: 503,
            });
        }
        Ok(FetchOutcome::Bytes(url.as_bytes().to_vec()))
    }
}

fn loader_with(fetcher: Arc<StubFetcher>, max_concurrent: usize) -> TileLoader {
    let config = TileLoadingConfig {
        url_template: "tiles/{z}/{x}/{y}".into(),
        token: Some("t".into()),
        max_concurrent,
        ..TileLoadingConfig::default()
    };
    TileLoader::new(
        Arc::new(UrlTemplateSource::from_config(&config)),
        fetcher,
        &config,
    )
}

fn settle(loader: &mut TileLoader) {
    for _ in 0..100 {
        if loader.in_flight_count() == 0 && loader.queued_count() == 0 {
            return;
        }
        loader.poll_blocking(Duration::from_secs(2));
    }
    panic!("loader did not settle: {loader:?}");
}

#[test]
fn test_visible_set_is_fetched_once() {
    let fetcher = Arc::new(StubFetcher::default());
    let mut loader = loader_with(Arc::clone(&fetcher), 8);
    let controller = ViewportController::new(ViewportConfig {
        initial_zoom: 1,
        ..ViewportConfig::default()
    })
    .unwrap();

    let visible = controller.visible_tiles();
    loader.request_visible(&visible);
    loader.request_visible(&visible);
    settle(&mut loader);
    loader.request_visible(&visible);

    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 4);
    for coord in visible {
        assert!(loader.availability(coord).is_ready(), "{coord} not ready");
    }
    let requested = fetcher.requested.lock().unwrap();
    assert!(requested.contains(&"tiles/1/0/1?token=t".to_string()));
}

#[test]
fn test_missing_tile_becomes_unavailable_without_refetch() {
    let fetcher = Arc::new(StubFetcher {
        missing: vec!["tiles/0/0/0?token=t".into()],
        ..StubFetcher::default()
    });
    let mut loader = loader_with(Arc::clone(&fetcher), 2);
    let root = TileCoord::new(0, 0, 0);

    loader.request(root);
    settle(&mut loader);
    assert_eq!(loader.availability(root), TileAvailability::Unavailable);

    loader.request(root);
    settle(&mut loader);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failed_tiles_wait_for_explicit_retry() {
    let fetcher = Arc::new(StubFetcher {
        broken: vec!["tiles/1/1/1?token=t".into()],
        ..StubFetcher::default()
    });
    let mut loader = loader_with(Arc::clone(&fetcher), 2);
    let coord = TileCoord::new(1, 1, 1);

    loader.request(coord);
    settle(&mut loader);
    assert_eq!(loader.availability(coord), TileAvailability::Unavailable);

    loader.request(coord);
    settle(&mut loader);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);

    assert_eq!(loader.retry_failed(), 1);
    assert_eq!(loader.availability(coord), TileAvailability::Loading);
    loader.request(coord);
    settle(&mut loader);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_stale_queue_entries_are_dropped() {
    let fetcher = Arc::new(StubFetcher::default());
    let mut loader = loader_with(Arc::clone(&fetcher), 1);

    let first: Vec<TileCoord> = (0..4).map(|y| TileCoord::new(2, 0, y)).collect();
    loader.request_visible(&first);
    assert_eq!(loader.in_flight_count(), 1);
    assert_eq!(loader.queued_count(), 3);

    // The view moved before the queue drained
    let second = vec![TileCoord::new(2, 3, 3)];
    loader.request_visible(&second);
    assert_eq!(loader.queued_count(), 1);

    settle(&mut loader);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    assert!(loader.availability(TileCoord::new(2, 3, 3)).is_ready());
    assert_eq!(loader.availability(TileCoord::new(2, 0, 3)), TileAvailability::Loading);
}

#[test]
fn test_notifier_runs_per_finished_fetch() {
    let fetcher = Arc::new(StubFetcher::default());
    let notified = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&notified);
    let mut loader = loader_with(fetcher, 4).with_notifier(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    loader.request_visible(&[TileCoord::new(1, 0, 0), TileCoord::new(1, 1, 0)]);
    settle(&mut loader);
    // Workers notify after sending, so give the last one a moment
    for _ in 0..50 {
        if notified.load(Ordering::SeqCst) == 2 {
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(notified.load(Ordering::SeqCst), 2);
}

#[test]
fn test_loader_from_config_rejects_bad_template() {
    let config = TileLoadingConfig {
        url_template: "https://tiles.example/static.png".into(),
        ..TileLoadingConfig::default()
    };
    assert!(matches!(TileLoader::from_config(&config), Err(Error::Config(_))));
}
