//! Route handlers for the civic complaint API.

pub mod auth;
pub mod complaints;
pub mod health;
pub mod reference;


use std::path::Path;

use axum::extract::{DefaultBodyLimit, FromRequest};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use engine::media::UPLOADS_URL_PREFIX;
use tower_http::services::ServeDir;

use crate::error::ApiError;
use crate::state::AppState;

/// JSON body extractor whose rejections use the API error shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Build the router with all API routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        .route("/api/reference", get(reference::reference))
        // Login
        .route("/api/citizen/request-otp", post(auth::request_otp))
        .route("/api/citizen/verify-otp", post(auth::verify_otp))
        .route("/api/official/login", post(auth::official_login))
        .route("/api/logout", post(auth::logout))
        // Complaints
        .route("/api/complaint/submit", post(complaints::submit))
        .route("/api/complaints", get(complaints::list))
        .route("/api/complaint/:id/detail", get(complaints::detail))
        .route("/api/complaint/:id/forward", post(complaints::forward))
        .route("/api/complaint/:id/assign", post(complaints::assign))
        .route("/api/complaint/:id/start-work", post(complaints::start_work))
        .route("/api/complaint/:id/resolve", post(complaints::resolve))
        .route("/api/complaint/:id/update-status", post(complaints::update_status))
        .route("/api/complaint/:id/mark-fake", post(complaints::mark_fake))
        .route("/api/complaint/:id/report-fake", post(complaints::report_fake))
}

/// The full application: API routes, uploaded photos and body limit.
pub fn app(state: AppState, uploads_dir: &Path, max_body_bytes: usize) -> Router {
    router()
        .nest_service(UPLOADS_URL_PREFIX, ServeDir::new(uploads_dir))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "success": false,
            "message": "Not found",
        })),
    )
}
