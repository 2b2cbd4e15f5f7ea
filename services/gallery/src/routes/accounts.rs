//! Account routes: signup, login, and profile management

use axum::{
    Extension, Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    image_store::{ImageTransform, PROFILE_FOLDER, PROFILE_SQUARE},
    middleware::AuthAccount,
    models::{NewAccount, ProfilePatch, ProfileResponse},
    repositories::account::normalize_email,
    validation,
};

use super::field_text;

/// Bearer credential issued at signup and login
#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Response for account creation
#[derive(Serialize)]
pub struct SignupResponse {
    pub account: ProfileResponse,
    #[serde(flatten)]
    pub credential: TokenResponse,
}

/// Request for account login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn issue_credential(state: &AppState, account_id: uuid::Uuid) -> ApiResult<TokenResponse> {
    let access_token = state.jwt_service.generate_token(account_id)?;
    Ok(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_service.token_expiry(),
    })
}

/// Account signup endpoint
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<NewAccount>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_name(&payload.name).map_err(ApiError::Validation)?;
    validation::validate_email(&payload.email).map_err(ApiError::Validation)?;
    validation::validate_password(&payload.password).map_err(ApiError::Validation)?;

    if state
        .account_repository
        .find_by_email(&payload.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Validation(
            "Email is already registered".to_string(),
        ));
    }

    let account = state.account_repository.create(&payload).await?;
    let credential = issue_credential(&state, account.id)?;

    info!("Account created: {}", account.id);

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            account: account.into(),
            credential,
        }),
    ))
}

/// Account login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    info!("Login attempt for: {}", payload.email);

    if !state
        .rate_limiter
        .allow_attempt(&normalize_email(&payload.email))
        .await
    {
        return Err(ApiError::TooManyRequests);
    }

    let account = state
        .account_repository
        .find_by_email(&payload.email)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !state
        .account_repository
        .verify_password(&account, &payload.password)
        .await?
    {
        return Err(ApiError::Unauthorized);
    }

    let credential = issue_credential(&state, account.id)?;

    Ok((StatusCode::OK, Json(credential)))
}

/// Return the caller's profile, without the password hash
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
) -> ApiResult<Json<ProfileResponse>> {
    let account = state
        .account_repository
        .find_by_id(auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    Ok(Json(account.into()))
}

/// Apply a partial profile update, with an optional replacement picture
///
/// Multipart fields absent from the request keep their stored value; a
/// `profile_image` part, when present, is relayed to the image store and
/// its URL overwrites the previous one.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    mut multipart: Multipart,
) -> ApiResult<Json<ProfileResponse>> {
    let mut patch = ProfilePatch::default();
    let mut image: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Malformed multipart request: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "profile_image" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Unreadable image field: {}", e)))?;
                if !data.is_empty() {
                    image = Some(data.to_vec());
                }
            }
            "name" => patch.name = Some(field_text(field).await?),
            "bio" => patch.bio = Some(field_text(field).await?),
            "website" => patch.website = Some(field_text(field).await?),
            "instagram" => patch.instagram = Some(field_text(field).await?),
            "twitter" => patch.twitter = Some(field_text(field).await?),
            "facebook" => patch.facebook = Some(field_text(field).await?),
            _ => {}
        }
    }

    if let Some(name) = &patch.name {
        validation::validate_name(name).map_err(ApiError::Validation)?;
    }

    let profile_image = match image {
        Some(data) => Some(
            state
                .image_store
                .store(
                    PROFILE_FOLDER,
                    &data,
                    ImageTransform::CoverSquare(PROFILE_SQUARE),
                )
                .await?,
        ),
        None => None,
    };

    let account = state
        .account_repository
        .update_profile(auth.id, &patch, profile_image.as_deref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    info!("Profile updated: {}", account.id);

    Ok(Json(account.into()))
}
