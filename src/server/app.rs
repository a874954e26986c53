use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{health, series};
use crate::storage::SeriesStore;

#[derive(Clone)]
pub struct AppState {
    pub store: SeriesStore,
}

pub async fn create_app(store: SeriesStore) -> Result<Router> {
    let state = AppState { store };

    let app = Router::new()
        // Health check endpoint
        .route("/health", get(health::health_check))
        // Interactive page and its form targets
        .route("/", get(series::show_page))
        .route("/series/add", post(series::add_rate))
        .route("/series/save", post(series::save_edits))
        .route("/series/chart.svg", get(series::chart_svg))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state);

    Ok(app)
}
