//! Handlers proxying Airtable schema metadata for the form builder.
//!
//! All endpoints require an authenticated owner; calls go out with the
//! owner's stored Airtable token, refreshed first when it has expired.

use axum::extract::{Path, State};
use axum::Json;

use formbase_airtable::api::{BaseMeta, FieldMeta, TableMeta};
use formbase_core::error::CoreError;
use formbase_core::types::DbId;
use formbase_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/meta/bases
///
/// List the bases the owner's Airtable token can read.
pub async fn list_bases(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<BaseMeta>>>> {
    let token = owner_access_token(&state, user.user_id).await?;
    let bases = state.airtable.list_bases(&token).await?;
    Ok(Json(DataResponse { data: bases }))
}

/// GET /api/v1/meta/bases/{base_id}/tables
pub async fn list_tables(
    State(state): State<AppState>,
    user: AuthUser,
    Path(base_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<TableMeta>>>> {
    let token = owner_access_token(&state, user.user_id).await?;
    let tables = state.airtable.list_tables(&token, &base_id).await?;
    Ok(Json(DataResponse { data: tables }))
}

/// GET /api/v1/meta/bases/{base_id}/tables/{table_id}/fields
///
/// List a table's fields, filtered to the types a question can bind to.
pub async fn list_fields(
    State(state): State<AppState>,
    user: AuthUser,
    Path((base_id, table_id)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<Vec<FieldMeta>>>> {
    let token = owner_access_token(&state, user.user_id).await?;
    let fields = state.airtable.list_fields(&token, &base_id, &table_id).await?;
    Ok(Json(DataResponse { data: fields }))
}

/// Load the owner's Airtable access token, refreshing it first when the
/// stored token has expired.
pub(crate) async fn owner_access_token(state: &AppState, user_id: DbId) -> AppResult<String> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    let expired = user
        .token_expires_at
        .map(|at| at <= chrono::Utc::now())
        .unwrap_or(false);
    if !expired {
        return Ok(user.access_token);
    }

    tracing::info!(user_id, "Airtable token expired, refreshing");
    let airtable_cfg = &state.config.airtable;
    let tokens = state
        .airtable
        .refresh_access_token(
            &airtable_cfg.client_id,
            &airtable_cfg.client_secret,
            &user.refresh_token,
        )
        .await?;

    let token_expires_at = tokens
        .expires_in
        .map(|secs| chrono::Utc::now() + chrono::Duration::seconds(secs));

    UserRepo::save_tokens(
        &state.pool,
        user_id,
        &tokens.access_token,
        &tokens.refresh_token,
        token_expires_at,
    )
    .await?;

    Ok(tokens.access_token)
}
