//! Repository for the `users` table.

use formbase_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::{UpsertUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, airtable_user_id, access_token, refresh_token, \
                       token_expires_at, last_login_at, created_at, updated_at";

/// Provides CRUD operations for account owners.
pub struct UserRepo;

impl UserRepo {
    /// Insert or refresh an owner after a completed OAuth exchange.
    ///
    /// On conflict the stored tokens are replaced and `last_login_at` is
    /// bumped, matching a repeat login.
    pub async fn upsert_by_airtable_id(
        pool: &PgPool,
        input: &UpsertUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (airtable_user_id, access_token, refresh_token, token_expires_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (airtable_user_id) DO UPDATE SET
                 access_token = EXCLUDED.access_token,
                 refresh_token = EXCLUDED.refresh_token,
                 token_expires_at = EXCLUDED.token_expires_at,
                 last_login_at = now(),
                 updated_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.airtable_user_id)
            .bind(&input.access_token)
            .bind(&input.refresh_token)
            .bind(input.token_expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find an owner by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace an owner's Airtable tokens (after a refresh-token exchange).
    pub async fn save_tokens(
        pool: &PgPool,
        id: DbId,
        access_token: &str,
        refresh_token: &str,
        token_expires_at: Option<Timestamp>,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                access_token = $2,
                refresh_token = $3,
                token_expires_at = $4,
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(access_token)
            .bind(refresh_token)
            .bind(token_expires_at)
            .fetch_optional(pool)
            .await
    }
}
