pub mod cache;
pub mod loader;
pub mod source;

// Re-exports for convenience
pub use cache::{TileCache, TileEntry};
pub use loader::{FetchOutcome, HttpFetcher, TileAvailability, TileFetcher, TileLoader};
pub use source::{TileSource, UrlTemplateSource};
