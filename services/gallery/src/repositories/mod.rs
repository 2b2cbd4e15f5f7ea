//! Repositories for database operations

pub mod account;
pub mod artwork;

// Re-export for convenience
pub use account::AccountRepository;
pub use artwork::ArtworkRepository;
