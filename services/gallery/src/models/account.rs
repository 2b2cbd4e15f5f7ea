//! Account model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account entity as stored in the accounts table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub bio: String,
    pub profile_image: String,
    pub website: String,
    pub instagram: String,
    pub twitter: String,
    pub facebook: String,
    pub created_at: DateTime<Utc>,
}

/// New account creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Partial profile update payload
///
/// Fields left as `None` keep their stored value. An empty string is a
/// deliberate overwrite, not an omission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
}

/// Account as returned by the API, without the password hash
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub bio: String,
    pub profile_image: String,
    pub website: String,
    pub instagram: String,
    pub twitter: String,
    pub facebook: String,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for ProfileResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            bio: account.bio,
            profile_image: account.profile_image,
            website: account.website,
            instagram: account.instagram,
            twitter: account.twitter,
            facebook: account.facebook,
            created_at: account.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account {
            id: Uuid::new_v4(),
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            bio: String::new(),
            profile_image: String::new(),
            website: String::new(),
            instagram: String::new(),
            twitter: String::new(),
            facebook: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn profile_response_drops_the_password_hash() {
        let response = ProfileResponse::from(account());
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "ann@x.com");
    }

    #[test]
    fn default_patch_carries_no_overwrites() {
        let patch = ProfilePatch::default();
        assert!(patch.name.is_none());
        assert!(patch.bio.is_none());
        assert!(patch.website.is_none());
        assert!(patch.instagram.is_none());
        assert!(patch.twitter.is_none());
        assert!(patch.facebook.is_none());
    }
}
