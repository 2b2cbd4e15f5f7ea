//! Artwork model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Closed set of artwork categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArtworkCategory {
    Painting,
    #[serde(rename = "Digital Art")]
    DigitalArt,
    Photography,
    Sculpture,
    #[serde(rename = "Mixed Media")]
    MixedMedia,
    #[default]
    Other,
}

impl ArtworkCategory {
    /// Canonical label, as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtworkCategory::Painting => "Painting",
            ArtworkCategory::DigitalArt => "Digital Art",
            ArtworkCategory::Photography => "Photography",
            ArtworkCategory::Sculpture => "Sculpture",
            ArtworkCategory::MixedMedia => "Mixed Media",
            ArtworkCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ArtworkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a category label is not part of the closed set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCategoryError(pub String);

impl fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown artwork category: {}", self.0)
    }
}

impl std::error::Error for ParseCategoryError {}

impl FromStr for ArtworkCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Painting" => Ok(ArtworkCategory::Painting),
            "Digital Art" => Ok(ArtworkCategory::DigitalArt),
            "Photography" => Ok(ArtworkCategory::Photography),
            "Sculpture" => Ok(ArtworkCategory::Sculpture),
            "Mixed Media" => Ok(ArtworkCategory::MixedMedia),
            "Other" => Ok(ArtworkCategory::Other),
            other => Err(ParseCategoryError(other.to_string())),
        }
    }
}

/// Artwork entity as stored in the artworks table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artwork {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub category: ArtworkCategory,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub price: f64,
    pub for_sale: bool,
    pub owner_id: Uuid,
    pub likes: Vec<Uuid>,
    pub views: i64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// New artwork creation payload, image already relayed
#[derive(Debug, Clone)]
pub struct NewArtwork {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub category: ArtworkCategory,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub price: f64,
    pub for_sale: bool,
    pub tags: Vec<String>,
    pub owner_id: Uuid,
}

/// Artwork row for gallery listings, joined with the owner summary
#[derive(Debug, Clone, Serialize)]
pub struct ArtworkSummary {
    #[serde(flatten)]
    pub artwork: Artwork,
    pub owner_name: String,
    pub owner_profile_image: String,
}

/// Artwork row for the detail view, joined with the owner's public profile
#[derive(Debug, Clone, Serialize)]
pub struct ArtworkDetail {
    #[serde(flatten)]
    pub artwork: Artwork,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_profile_image: String,
    pub owner_bio: String,
    pub owner_website: String,
    pub owner_instagram: String,
    pub owner_twitter: String,
    pub owner_facebook: String,
}

/// Split a comma-delimited tag string into trimmed, non-empty tags
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_its_label() {
        let all = [
            ArtworkCategory::Painting,
            ArtworkCategory::DigitalArt,
            ArtworkCategory::Photography,
            ArtworkCategory::Sculpture,
            ArtworkCategory::MixedMedia,
            ArtworkCategory::Other,
        ];
        for category in all {
            assert_eq!(category.as_str().parse::<ArtworkCategory>(), Ok(category));
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = "Graffiti".parse::<ArtworkCategory>().unwrap_err();
        assert_eq!(err, ParseCategoryError("Graffiti".to_string()));
    }

    #[test]
    fn category_serializes_with_spaces() {
        let json = serde_json::to_string(&ArtworkCategory::MixedMedia).unwrap();
        assert_eq!(json, "\"Mixed Media\"");
        let back: ArtworkCategory = serde_json::from_str("\"Digital Art\"").unwrap();
        assert_eq!(back, ArtworkCategory::DigitalArt);
    }

    #[test]
    fn tags_are_split_and_trimmed() {
        assert_eq!(
            parse_tags("landscape, oil , , plein air"),
            vec!["landscape", "oil", "plein air"]
        );
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }
}
