//! Middleware for bearer credential validation

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::warn;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Authenticated account attached to the request after the gate
#[derive(Debug, Clone, Copy)]
pub struct AuthAccount {
    pub id: Uuid,
}

/// Resolve the bearer credential to an account id or reject with 401
///
/// Pure verification: no store access, no side effects. A missing or
/// malformed Authorization header and an invalid or expired token are
/// indistinguishable to the caller.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(ApiError::Unauthorized)?;

    let claims = state
        .jwt_service
        .validate_token(bearer.token())
        .map_err(|e| {
            warn!("Rejected bearer credential: {}", e);
            ApiError::Unauthorized
        })?;

    req.extensions_mut().insert(AuthAccount { id: claims.sub });

    Ok(next.run(req).await)
}
