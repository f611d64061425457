//! Repository for collected submissions (`form_responses`).

use formbase_core::types::DbId;
use sqlx::PgPool;

use crate::models::response::{CreateResponse, FormResponse};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, form_id, airtable_record_id, answers, \
                       deleted_in_airtable, created_at, updated_at";

/// Provides persistence for accepted submissions.
pub struct ResponseRepo;

impl ResponseRepo {
    /// Persist an accepted submission. Called only after the external
    /// writes settled with at least one success.
    pub async fn create(pool: &PgPool, input: &CreateResponse) -> Result<FormResponse, sqlx::Error> {
        let query = format!(
            "INSERT INTO form_responses (form_id, airtable_record_id, answers)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FormResponse>(&query)
            .bind(input.form_id)
            .bind(&input.airtable_record_id)
            .bind(&input.answers)
            .fetch_one(pool)
            .await
    }

    /// List a form's responses, excluding those deleted upstream, oldest
    /// first so analytics and exports are chronological.
    pub async fn list_for_form(
        pool: &PgPool,
        form_id: DbId,
    ) -> Result<Vec<FormResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM form_responses
             WHERE form_id = $1 AND deleted_in_airtable = false
             ORDER BY created_at"
        );
        sqlx::query_as::<_, FormResponse>(&query)
            .bind(form_id)
            .fetch_all(pool)
            .await
    }

    /// Bump `updated_at` for the response tied to an Airtable record.
    /// Returns `true` if a matching row existed.
    pub async fn touch_by_record_id(pool: &PgPool, record_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE form_responses SET updated_at = now() WHERE airtable_record_id = $1",
        )
        .bind(record_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-flag the response tied to an Airtable record as deleted
    /// upstream. The row is kept for audit; listings exclude it.
    pub async fn mark_deleted_by_record_id(
        pool: &PgPool,
        record_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE form_responses SET deleted_in_airtable = true, updated_at = now()
             WHERE airtable_record_id = $1",
        )
        .bind(record_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
