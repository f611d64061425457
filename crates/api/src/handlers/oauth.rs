//! Handlers for the Airtable OAuth login flow.
//!
//! `login` starts the PKCE handshake and redirects the owner to Airtable;
//! `callback` consumes the stored state, exchanges the code for tokens,
//! upserts the owner row, and hands the browser back to the frontend with
//! a session JWT.

use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::Json;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use formbase_airtable::oauth::{authorize_url, generate_state, PkcePair};
use formbase_core::error::CoreError;
use formbase_db::models::user::{UpsertUser, UserResponse};
use formbase_db::repositories::{OauthStateRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/auth/login
///
/// Start a login attempt: generate a state token and PKCE pair, persist
/// them server-side, and redirect the owner to the Airtable authorize URL.
pub async fn login(State(state): State<AppState>) -> AppResult<Redirect> {
    // Opportunistic cleanup of abandoned handshakes; failure is not fatal.
    if let Err(err) = OauthStateRepo::purge_expired(&state.pool).await {
        tracing::warn!(error = %err, "Failed to purge expired OAuth states");
    }

    let pkce = PkcePair::generate();
    let csrf_state = generate_state();

    OauthStateRepo::create(&state.pool, &csrf_state, &pkce.verifier).await?;

    let airtable = &state.config.airtable;
    let url = authorize_url(
        &airtable.client_id,
        &airtable.redirect_uri,
        &csrf_state,
        &pkce.challenge,
    );

    tracing::info!("Redirecting owner to Airtable authorization");
    Ok(Redirect::to(&url))
}

/// Query parameters Airtable appends to the callback redirect.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set instead of `code` when the owner denied access.
    pub error: Option<String>,
}

/// GET /api/v1/auth/callback?code=...&state=...
///
/// Complete the handshake: consume the stored state (single use), exchange
/// the authorization code, upsert the owner, and redirect to the frontend
/// dashboard with a session JWT in the query string.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> AppResult<Redirect> {
    if let Some(error) = params.error {
        tracing::warn!(%error, "Owner denied Airtable authorization");
        return Err(AppError::Core(CoreError::Unauthorized(format!(
            "Authorization denied: {error}"
        ))));
    }

    let code = params
        .code
        .ok_or_else(|| AppError::BadRequest("Missing code parameter".into()))?;
    let csrf_state = params
        .state
        .ok_or_else(|| AppError::BadRequest("Missing state parameter".into()))?;

    // Single-use consume; a replayed or expired state finds nothing.
    let handshake = OauthStateRepo::take(&state.pool, &csrf_state)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Unknown or expired OAuth state".into(),
            ))
        })?;

    let airtable_cfg = &state.config.airtable;
    let tokens = state
        .airtable
        .exchange_code(
            &airtable_cfg.client_id,
            &airtable_cfg.client_secret,
            &airtable_cfg.redirect_uri,
            &code,
            &handshake.code_verifier,
        )
        .await?;

    let token_expires_at = tokens
        .expires_in
        .map(|secs| chrono::Utc::now() + chrono::Duration::seconds(secs));

    let user = UserRepo::upsert_by_airtable_id(
        &state.pool,
        &UpsertUser {
            airtable_user_id: derive_airtable_user_id(&tokens.access_token),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_expires_at,
        },
    )
    .await?;

    let jwt = crate::auth::jwt::generate_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Failed to issue session token: {e}")))?;

    tracing::info!(user_id = user.id, "Owner logged in via Airtable OAuth");

    let destination = format!("{}/dashboard?token={}", airtable_cfg.frontend_url, jwt);
    Ok(Redirect::to(&destination))
}

/// GET /api/v1/auth/me
///
/// Return the authenticated owner's profile (no tokens).
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let owner = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;

    Ok(Json(DataResponse {
        data: UserResponse::from(&owner),
    }))
}

/// Stable per-account identifier derived from the access token.
///
/// Airtable's token response carries no user id and we request no identity
/// scope, so the SHA-256 of the access token stands in as the account key.
fn derive_airtable_user_id(access_token: &str) -> String {
    let digest = Sha256::digest(access_token.as_bytes());
    format!("{digest:x}")
}
