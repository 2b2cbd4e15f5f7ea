//! Artwork routes: upload, browse, and owner management

use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    image_store::{ARTWORK_FOLDER, ARTWORK_MAX_WIDTH, ImageTransform},
    middleware::AuthAccount,
    models::{ArtworkCategory, NewArtwork, parse_tags},
};

use super::field_text;

/// Multipart parts accepted by the upload route, prior to validation
#[derive(Default)]
struct UploadFields {
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    medium: Option<String>,
    dimensions: Option<String>,
    price: Option<String>,
    for_sale: Option<String>,
    tags: Option<String>,
    image: Option<Vec<u8>>,
}

async fn collect_upload_fields(mut multipart: Multipart) -> ApiResult<UploadFields> {
    let mut fields = UploadFields::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Malformed multipart request: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "image" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Unreadable image field: {}", e)))?;
                if !data.is_empty() {
                    fields.image = Some(data.to_vec());
                }
            }
            "title" => fields.title = Some(field_text(field).await?),
            "description" => fields.description = Some(field_text(field).await?),
            "category" => fields.category = Some(field_text(field).await?),
            "medium" => fields.medium = Some(field_text(field).await?),
            "dimensions" => fields.dimensions = Some(field_text(field).await?),
            "price" => fields.price = Some(field_text(field).await?),
            "for_sale" => fields.for_sale = Some(field_text(field).await?),
            "tags" => fields.tags = Some(field_text(field).await?),
            _ => {}
        }
    }

    Ok(fields)
}

fn required(value: Option<String>, message: &str) -> ApiResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation(message.to_string()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Upload a new artwork
///
/// The image part is mandatory and is relayed to the store before anything
/// is persisted; a relay failure therefore creates no record.
pub async fn upload_artwork(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let fields = collect_upload_fields(multipart).await?;

    let image = fields
        .image
        .ok_or_else(|| ApiError::Validation("image required".to_string()))?;

    let title = required(fields.title, "Title is required")?;
    let description = required(fields.description, "Description is required")?;
    let category = required(fields.category, "Category is required")?
        .parse::<ArtworkCategory>()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let price = match non_empty(fields.price) {
        Some(raw) => raw
            .parse::<f64>()
            .map_err(|_| ApiError::Validation("Price must be a number".to_string()))?,
        None => 0.0,
    };

    let for_sale = match non_empty(fields.for_sale) {
        Some(raw) => raw
            .parse::<bool>()
            .map_err(|_| ApiError::Validation("for_sale must be true or false".to_string()))?,
        None => false,
    };

    let tags = fields.tags.as_deref().map(parse_tags).unwrap_or_default();

    let image_url = state
        .image_store
        .store(
            ARTWORK_FOLDER,
            &image,
            ImageTransform::FitWidth(ARTWORK_MAX_WIDTH),
        )
        .await?;

    let artwork = state
        .artwork_repository
        .create(&NewArtwork {
            title,
            description,
            image_url,
            category,
            medium: non_empty(fields.medium),
            dimensions: non_empty(fields.dimensions),
            price,
            for_sale,
            tags,
            owner_id: auth.id,
        })
        .await?;

    info!("Artwork created: {}", artwork.id);

    Ok((StatusCode::CREATED, Json(artwork)))
}

/// List every artwork with its owner summary, newest first
pub async fn list_artworks(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let artworks = state.artwork_repository.list_all().await?;
    Ok(Json(artworks))
}

/// List the caller's artworks, newest first
pub async fn list_my_artworks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
) -> ApiResult<impl IntoResponse> {
    let artworks = state.artwork_repository.list_by_owner(auth.id).await?;
    Ok(Json(artworks))
}

/// Fetch one artwork with its owner's public profile
///
/// Every successful call counts as a view; the counter moves by exactly one
/// with no de-duplication by viewer.
pub async fn get_artwork(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if !state.artwork_repository.increment_views(id).await? {
        return Err(ApiError::NotFound("Artwork not found".to_string()));
    }

    let artwork = state
        .artwork_repository
        .find_detail(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Artwork not found".to_string()))?;

    Ok(Json(artwork))
}

/// Delete an artwork owned by the caller
pub async fn delete_artwork(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let artwork = state
        .artwork_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Artwork not found".to_string()))?;

    if artwork.owner_id != auth.id {
        return Err(ApiError::Forbidden);
    }

    state.artwork_repository.delete(id).await?;

    Ok(Json(json!({ "message": "Artwork deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields_reject_blank_values() {
        assert_eq!(required(Some("Sky".to_string()), "Title is required").unwrap(), "Sky");
        assert_eq!(
            required(Some("  Sky  ".to_string()), "Title is required").unwrap(),
            "Sky"
        );
        assert!(required(Some("   ".to_string()), "Title is required").is_err());
        assert!(required(None, "Title is required").is_err());
    }

    #[test]
    fn optional_fields_drop_blank_values() {
        assert_eq!(non_empty(Some("oil".to_string())), Some("oil".to_string()));
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(None), None);
    }
}
