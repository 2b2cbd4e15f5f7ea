//! Gallery service models

pub mod account;
pub mod artwork;

// Re-export for convenience
pub use account::{Account, NewAccount, ProfilePatch, ProfileResponse};
pub use artwork::{
    Artwork, ArtworkCategory, ArtworkDetail, ArtworkSummary, NewArtwork, parse_tags,
};
