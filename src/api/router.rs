use super::handlers::{core, courses, results, students};
use super::types::AppState;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(core::health))
        .route("/students", get(students::list).post(students::create))
        .route("/courses", get(courses::list).post(courses::create))
        .route("/results", get(results::list).post(results::create))
        .fallback(core::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
