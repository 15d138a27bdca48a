pub mod app;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod feed;
#[cfg(test)]
mod fixtures;
pub mod handlers;
pub mod heatmap;
pub mod models;
pub mod repository;
pub mod series;
pub mod ui;
pub mod state;
pub mod view;

pub use app::router;
pub use config::Config;
pub use state::AppState;
