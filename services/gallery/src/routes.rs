//! Gallery service routes

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde_json::json;

use crate::{AppState, middleware::auth_middleware};

pub mod accounts;
pub mod artworks;

/// Uploads are re-encoded server-side, so the body cap only needs to admit
/// a reasonable source image
const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Create the router for the gallery service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/accounts/profile", get(accounts::get_profile))
        .route("/accounts/profile", put(accounts::update_profile))
        .route("/artworks", post(artworks::upload_artwork))
        .route("/artworks/mine", get(artworks::list_my_artworks))
        .route("/artworks/:id", delete(artworks::delete_artwork))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/accounts/signup", post(accounts::signup))
        .route("/accounts/login", post(accounts::login))
        .route("/artworks", get(artworks::list_artworks))
        .route("/artworks/:id", get(artworks::get_artwork))
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "gallery-service"
    }))
}

/// Read a multipart text part, surfacing decode failures as input errors
pub(crate) async fn field_text(
    field: axum::extract::multipart::Field<'_>,
) -> Result<String, crate::error::ApiError> {
    field
        .text()
        .await
        .map_err(|e| crate::error::ApiError::Validation(format!("Unreadable field: {}", e)))
}
