//! Account repository for database operations

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{Account, NewAccount, ProfilePatch};

/// Normalize an email for storage and lookup. Uniqueness is
/// case-insensitive, so every write and read goes through this.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

const ACCOUNT_COLUMNS: &str = "id, name, email, password_hash, bio, profile_image, website, \
                               instagram, twitter, facebook, created_at";

fn account_from_row(row: &PgRow) -> Account {
    Account {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        bio: row.get("bio"),
        profile_image: row.get("profile_image"),
        website: row.get("website"),
        instagram: row.get("instagram"),
        twitter: row.get("twitter"),
        facebook: row.get("facebook"),
        created_at: row.get("created_at"),
    }
}

/// Account repository
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new account, hashing the password on the way in
    pub async fn create(&self, new_account: &NewAccount) -> Result<Account> {
        info!("Creating new account: {}", new_account.email);

        let salt = SaltString::generate(&mut rand::thread_rng());
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(new_account.password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();

        let row = sqlx::query(&format!(
            "INSERT INTO accounts (name, email, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(new_account.name.trim())
        .bind(normalize_email(&new_account.email))
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(account_from_row(&row))
    }

    /// Find an account by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(account_from_row))
    }

    /// Find an account by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(account_from_row))
    }

    /// Verify an account's password
    pub async fn verify_password(&self, account: &Account, password: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(&account.password_hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        let argon2 = Argon2::default();
        Ok(argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Apply a partial profile update; fields absent from the patch keep
    /// their stored value. Returns the updated account, or None if it no
    /// longer exists.
    pub async fn update_profile(
        &self,
        id: Uuid,
        patch: &ProfilePatch,
        profile_image: Option<&str>,
    ) -> Result<Option<Account>> {
        info!("Updating profile for account: {}", id);

        let row = sqlx::query(&format!(
            "UPDATE accounts
             SET name = COALESCE($2, name),
                 bio = COALESCE($3, bio),
                 website = COALESCE($4, website),
                 instagram = COALESCE($5, instagram),
                 twitter = COALESCE($6, twitter),
                 facebook = COALESCE($7, facebook),
                 profile_image = COALESCE($8, profile_image)
             WHERE id = $1
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.bio)
        .bind(&patch.website)
        .bind(&patch.instagram)
        .bind(&patch.twitter)
        .bind(&patch.facebook)
        .bind(profile_image)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(account_from_row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_normalized_for_lookup_and_storage() {
        assert_eq!(normalize_email("Ann@X.Com"), "ann@x.com");
        assert_eq!(normalize_email("  ann@x.com  "), "ann@x.com");
    }

    #[test]
    fn password_hashing_round_trips() {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let hash = Argon2::default()
            .hash_password(b"secret1", &salt)
            .unwrap()
            .to_string();

        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"secret1", &parsed)
                .is_ok()
        );
        assert!(
            Argon2::default()
                .verify_password(b"wrong-password", &parsed)
                .is_err()
        );
    }
}
