/// Application routes configuration
use crate::handlers::{
    get_apod, get_fact, get_recent, health, index_or_upgrade, ws_upgrade, AppState,
};
use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    let assets = ServeDir::new(state.public_dir.as_path());

    Router::new()
        // Page, or the real-time channel on upgrade
        .route("/", get(index_or_upgrade))
        .route("/ws", get(ws_upgrade))
        // APOD endpoints
        .route("/api/apod", get(get_apod))
        .route("/api/recent", get(get_recent))
        .route("/api/facts", get(get_fact))
        .route("/api/health", get(health))
        .fallback_service(assets)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
