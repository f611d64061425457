//! Form entity model and DTOs.

use formbase_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `forms` table. `questions` is the ordered question list
/// as stored; deserialize it with [`Form::parsed_questions`] before
/// evaluating visibility or validating submissions.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Form {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub airtable_base_id: String,
    pub airtable_table_id: String,
    pub questions: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Form {
    /// Deserialize the stored question list into typed core questions.
    pub fn parsed_questions(
        &self,
    ) -> Result<Vec<formbase_core::form::Question>, serde_json::Error> {
        serde_json::from_value(self.questions.clone())
    }
}

/// DTO for creating a form.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateForm {
    pub name: String,
    pub base_id: String,
    pub table_id: String,
    pub questions: Vec<formbase_core::form::Question>,
}

/// DTO for updating a form. All fields optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateForm {
    pub name: Option<String>,
    pub questions: Option<Vec<formbase_core::form::Question>>,
}
