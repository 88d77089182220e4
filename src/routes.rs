use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::{AppState, handlers};

pub fn create_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/api/health", get(handlers::health_check))
        .route("/quote/address", post(handlers::submit_address))
        .route(
            "/quote/upload",
            get(handlers::upload_page).post(handlers::submit_upload),
        )
        .route(
            "/quote/personal",
            get(handlers::personal_page).post(handlers::submit_personal_info),
        )
        .route("/quote/thank-you", get(handlers::thank_you_page))
        .route("/quote/results", get(handlers::results_page))
        .route("/api/quotes", get(handlers::list_quotes))
        .route("/api/quotes/{id}", get(handlers::get_quote))
        .route("/api/quotes/{id}/analysis", get(handlers::get_analysis))
        .route("/api/solar-analysis", post(handlers::solar_analysis))
        .layer(body_limit)
        .with_state(state)
}
