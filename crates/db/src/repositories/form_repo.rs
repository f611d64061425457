//! Repository for the `forms` table.

use formbase_core::types::DbId;
use sqlx::PgPool;

use crate::models::form::{CreateForm, Form, UpdateForm};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, name, airtable_base_id, airtable_table_id, \
                       questions, created_at, updated_at";

/// Provides CRUD operations for forms.
pub struct FormRepo;

impl FormRepo {
    /// Insert a new form, returning the created row.
    ///
    /// Callers are expected to have validated the question definitions
    /// (`formbase_core::definition::validate_definition`) first.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateForm,
    ) -> Result<Form, sqlx::Error> {
        let questions = serde_json::to_value(&input.questions).unwrap_or_default();
        let query = format!(
            "INSERT INTO forms (owner_id, name, airtable_base_id, airtable_table_id, questions)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.base_id)
            .bind(&input.table_id)
            .bind(questions)
            .fetch_one(pool)
            .await
    }

    /// Find a form by ID, regardless of owner (used by the public fetch and
    /// submission paths).
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Form>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM forms WHERE id = $1");
        sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an owner's forms, most recently created first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Form>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM forms WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Update a form's name and/or questions. Only non-`None` fields apply.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateForm,
    ) -> Result<Option<Form>, sqlx::Error> {
        let questions = input
            .questions
            .as_ref()
            .map(|qs| serde_json::to_value(qs).unwrap_or_default());
        let query = format!(
            "UPDATE forms SET
                name = COALESCE($2, name),
                questions = COALESCE($3, questions),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(questions)
            .fetch_optional(pool)
            .await
    }

    /// Delete a form by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM forms WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
