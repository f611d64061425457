//! Inbound Airtable webhook handler.
//!
//! Keeps the local response rows loosely in sync with the upstream base:
//! an updated record bumps its row's timestamp, a deleted record soft-flags
//! the row so listings and analytics exclude it. Unknown record ids are
//! acknowledged without effect so the sender does not retry forever.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use formbase_db::repositories::ResponseRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Payload Airtable posts for record change notifications.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    pub action: String,
    pub record_id: String,
}

/// POST /webhooks/airtable
pub async fn airtable_webhook(
    State(state): State<AppState>,
    Json(event): Json<WebhookEvent>,
) -> AppResult<Json<serde_json::Value>> {
    let matched = match event.action.as_str() {
        "recordUpdated" => ResponseRepo::touch_by_record_id(&state.pool, &event.record_id).await?,
        "recordDeleted" => {
            ResponseRepo::mark_deleted_by_record_id(&state.pool, &event.record_id).await?
        }
        other => {
            return Err(AppError::BadRequest(format!(
                "Unsupported webhook action: {other}"
            )))
        }
    };

    if matched {
        tracing::info!(action = %event.action, record_id = %event.record_id, "Webhook applied");
    } else {
        tracing::debug!(record_id = %event.record_id, "Webhook for unknown record ignored");
    }

    Ok(Json(json!({ "data": { "matched": matched } })))
}
