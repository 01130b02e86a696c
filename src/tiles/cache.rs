use crate::core::geo::TileCoord;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// What is known about a fetched tile
#[derive(Debug, Clone, PartialEq)]
pub enum TileEntry {
    /// Encoded image bytes
    Ready(Arc<Vec<u8>>),
    /// The server has no tile here; render a placeholder and do not refetch
    Missing,
}

/// In-memory tile cache using LRU eviction
#[derive(Debug)]
pub struct TileCache {
    cache: Arc<Mutex<LruCache<TileCoord, TileEntry>>>,
}

impl TileCache {
    /// Create a new tile cache with the given capacity (at least one entry)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Get a tile from the cache, marking it as recently used
    pub fn get(&self, coord: &TileCoord) -> Option<TileEntry> {
        self.cache.lock().ok()?.get(coord).cloned()
    }

    pub fn insert(&self, coord: TileCoord, data: Vec<u8>) {
        self.put(coord, TileEntry::Ready(Arc::new(data)));
    }

    pub fn mark_missing(&self, coord: TileCoord) {
        self.put(coord, TileEntry::Missing);
    }

    fn put(&self, coord: TileCoord, entry: TileEntry) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(coord, entry);
        }
    }

    pub fn contains(&self, coord: &TileCoord) -> bool {
        self.cache
            .lock()
            .ok()
            .map(|cache| cache.contains(coord))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.cache.lock().ok().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Clone for TileCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

impl Default for TileCache {
    fn default() -> Self {
        Self::new(crate::core::config::TileLoadingConfig::default().cache_size)
    }
}
