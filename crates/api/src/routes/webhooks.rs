//! Route definitions for inbound webhooks (mounted at root level, not
//! under `/api/v1`, to match the URL registered with Airtable).

use axum::routing::post;
use axum::Router;

use crate::handlers::webhooks;
use crate::state::AppState;

/// ```text
/// POST /webhooks/airtable -> airtable_webhook
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/webhooks/airtable", post(webhooks::airtable_webhook))
}
