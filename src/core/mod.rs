pub mod bounds;
pub mod config;
pub mod constants;
pub mod frame;
pub mod geo;
pub mod grid;
pub mod minimap;
pub mod viewport;
pub mod zoom;
