pub mod widget;

pub use widget::{Hit, TileViewport, TileViewportExt, ViewportLayout};
