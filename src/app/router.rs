use crate::app::handlers;
use crate::app::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health_check))
        .route("/api/ndvi", get(handlers::ndvi_tiles))
        .route("/api/pixel-value", post(handlers::pixel_value))
        .route("/api/time-series", post(handlers::time_series))
        // 前端儀表板跨來源呼叫
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
