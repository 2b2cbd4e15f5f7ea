//! Artwork repository for database operations

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{Artwork, ArtworkCategory, ArtworkDetail, ArtworkSummary, NewArtwork};

const ARTWORK_COLUMNS: &str = "a.id, a.title, a.description, a.image_url, a.category, a.medium, \
                               a.dimensions, a.price, a.for_sale, a.owner_id, a.likes, a.views, \
                               a.tags, a.created_at";

fn artwork_from_row(row: &PgRow) -> Artwork {
    // category is constrained at the write path; an unknown label in the
    // store maps to Other rather than failing the whole listing
    let category = row
        .get::<String, _>("category")
        .parse::<ArtworkCategory>()
        .unwrap_or_default();

    Artwork {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        image_url: row.get("image_url"),
        category,
        medium: row.get("medium"),
        dimensions: row.get("dimensions"),
        price: row.get("price"),
        for_sale: row.get("for_sale"),
        owner_id: row.get("owner_id"),
        likes: row.get("likes"),
        views: row.get("views"),
        tags: row.get("tags"),
        created_at: row.get("created_at"),
    }
}

/// Artwork repository
#[derive(Clone)]
pub struct ArtworkRepository {
    pool: PgPool,
}

impl ArtworkRepository {
    /// Create a new artwork repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new artwork
    pub async fn create(&self, new_artwork: &NewArtwork) -> Result<Artwork> {
        info!(
            "Creating artwork '{}' for account {}",
            new_artwork.title, new_artwork.owner_id
        );

        let row = sqlx::query(&format!(
            "INSERT INTO artworks
                 (title, description, image_url, category, medium, dimensions,
                  price, for_sale, owner_id, tags)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {}",
            ARTWORK_COLUMNS.replace("a.", "")
        ))
        .bind(&new_artwork.title)
        .bind(&new_artwork.description)
        .bind(&new_artwork.image_url)
        .bind(new_artwork.category.as_str())
        .bind(&new_artwork.medium)
        .bind(&new_artwork.dimensions)
        .bind(new_artwork.price)
        .bind(new_artwork.for_sale)
        .bind(new_artwork.owner_id)
        .bind(&new_artwork.tags)
        .fetch_one(&self.pool)
        .await?;

        Ok(artwork_from_row(&row))
    }

    /// Every artwork with its owner summary, newest first
    pub async fn list_all(&self) -> Result<Vec<ArtworkSummary>> {
        let rows = sqlx::query(&format!(
            "SELECT {ARTWORK_COLUMNS},
                    o.name AS owner_name,
                    o.profile_image AS owner_profile_image
             FROM artworks a
             JOIN accounts o ON o.id = a.owner_id
             ORDER BY a.created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        let artworks = rows
            .into_iter()
            .map(|row| ArtworkSummary {
                artwork: artwork_from_row(&row),
                owner_name: row.get("owner_name"),
                owner_profile_image: row.get("owner_profile_image"),
            })
            .collect();

        Ok(artworks)
    }

    /// One account's artworks, newest first, no owner join
    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Artwork>> {
        let rows = sqlx::query(&format!(
            "SELECT {ARTWORK_COLUMNS}
             FROM artworks a
             WHERE a.owner_id = $1
             ORDER BY a.created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(artwork_from_row).collect())
    }

    /// Find an artwork by ID without any join
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Artwork>> {
        let row = sqlx::query(&format!(
            "SELECT {ARTWORK_COLUMNS} FROM artworks a WHERE a.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(artwork_from_row))
    }

    /// Bump the view counter by exactly one. The increment runs as a single
    /// UPDATE so concurrent reads of the same artwork never lose counts.
    /// Returns false when the artwork does not exist.
    pub async fn increment_views(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("UPDATE artworks SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Find an artwork joined with its owner's public profile
    pub async fn find_detail(&self, id: Uuid) -> Result<Option<ArtworkDetail>> {
        let row = sqlx::query(&format!(
            "SELECT {ARTWORK_COLUMNS},
                    o.name AS owner_name,
                    o.email AS owner_email,
                    o.profile_image AS owner_profile_image,
                    o.bio AS owner_bio,
                    o.website AS owner_website,
                    o.instagram AS owner_instagram,
                    o.twitter AS owner_twitter,
                    o.facebook AS owner_facebook
             FROM artworks a
             JOIN accounts o ON o.id = a.owner_id
             WHERE a.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| ArtworkDetail {
            artwork: artwork_from_row(&row),
            owner_name: row.get("owner_name"),
            owner_email: row.get("owner_email"),
            owner_profile_image: row.get("owner_profile_image"),
            owner_bio: row.get("owner_bio"),
            owner_website: row.get("owner_website"),
            owner_instagram: row.get("owner_instagram"),
            owner_twitter: row.get("owner_twitter"),
            owner_facebook: row.get("owner_facebook"),
        }))
    }

    /// Remove an artwork permanently. Ownership is checked by the caller.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        info!("Deleting artwork: {}", id);

        let result = sqlx::query("DELETE FROM artworks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
