//! Pending OAuth handshake state.

use formbase_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from `oauth_states`: one in-flight authorization redirect.
/// Consumed (deleted) when the callback arrives.
#[derive(Debug, Clone, FromRow)]
pub struct OauthState {
    pub id: DbId,
    pub state: String,
    pub code_verifier: String,
    pub created_at: Timestamp,
}
