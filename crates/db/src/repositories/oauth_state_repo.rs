//! Repository for pending OAuth handshakes.

use sqlx::PgPool;

use crate::models::oauth_state::OauthState;

/// Handshakes older than this are abandoned and eligible for purge.
const STATE_TTL_MINS: i32 = 15;

pub struct OauthStateRepo;

impl OauthStateRepo {
    /// Record a new handshake before redirecting the owner to the provider.
    pub async fn create(
        pool: &PgPool,
        state: &str,
        code_verifier: &str,
    ) -> Result<OauthState, sqlx::Error> {
        sqlx::query_as::<_, OauthState>(
            "INSERT INTO oauth_states (state, code_verifier)
             VALUES ($1, $2)
             RETURNING id, state, code_verifier, created_at",
        )
        .bind(state)
        .bind(code_verifier)
        .fetch_one(pool)
        .await
    }

    /// Consume a handshake by its state token: returns and deletes it in a
    /// single statement, so a replayed callback finds nothing. Expired
    /// handshakes are never returned.
    pub async fn take(pool: &PgPool, state: &str) -> Result<Option<OauthState>, sqlx::Error> {
        sqlx::query_as::<_, OauthState>(
            "DELETE FROM oauth_states
             WHERE state = $1
               AND created_at > now() - make_interval(mins => $2)
             RETURNING id, state, code_verifier, created_at",
        )
        .bind(state)
        .bind(STATE_TTL_MINS)
        .fetch_optional(pool)
        .await
    }

    /// Drop abandoned handshakes. Returns the number of rows removed.
    pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM oauth_states
             WHERE created_at <= now() - make_interval(mins => $1)",
        )
        .bind(STATE_TTL_MINS)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
