//! Account owner model and DTOs.

use formbase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Carries the owner's Airtable tokens -- NEVER serialize this to API
/// responses directly; use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub airtable_user_id: String,
    pub access_token: String,
    pub refresh_token: String,
    pub token_expires_at: Option<Timestamp>,
    pub last_login_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no tokens).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub airtable_user_id: String,
    pub last_login_at: Timestamp,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            airtable_user_id: user.airtable_user_id.clone(),
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// DTO for upserting an owner after a completed OAuth exchange.
#[derive(Debug, Clone)]
pub struct UpsertUser {
    pub airtable_user_id: String,
    pub access_token: String,
    pub refresh_token: String,
    pub token_expires_at: Option<Timestamp>,
}
