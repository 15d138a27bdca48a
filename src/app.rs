use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/heatmap", get(handlers::heatmap_page))
        .route("/settings", get(handlers::settings_page))
        .route("/settings/pin", post(handlers::toggle_pin))
        .route("/gym-data", get(handlers::gym_data))
        .route("/gym-data/latest", get(handlers::latest))
        .route("/gym-data/history/:name", get(handlers::history))
        .route("/api/heatmap/:name", get(handlers::api_heatmap))
        .with_state(state)
}
