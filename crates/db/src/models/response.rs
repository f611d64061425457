//! Collected submission model.

use formbase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from `form_responses`: one accepted submission, written after the
/// external record store acknowledged the write.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormResponse {
    pub id: DbId,
    pub form_id: DbId,
    /// Id assigned by Airtable, or the `file-upload-only` sentinel when the
    /// submission carried only attachments.
    pub airtable_record_id: String,
    pub answers: serde_json::Value,
    /// Soft flag set by the Airtable webhook when the record disappears
    /// upstream; flagged rows are excluded from listings and analytics.
    pub deleted_in_airtable: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for persisting an accepted submission.
#[derive(Debug, Clone)]
pub struct CreateResponse {
    pub form_id: DbId,
    pub airtable_record_id: String,
    pub answers: serde_json::Value,
}
