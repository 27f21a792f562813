pub mod catalog;
pub mod color;
pub mod commands;
pub mod compositor;
pub mod error;
pub mod export;
pub mod image_source;
pub mod layers;
pub mod loader;
pub mod session;
pub mod state;
pub mod tools;
pub mod ui;
pub mod viewport;
