//! The form/question model shared by the builder, the renderer, and the
//! submission path.
//!
//! Questions are stored as an ordered JSONB array on the form row, so every
//! struct here derives `Serialize`/`Deserialize` with the camelCase field
//! names the builder UI and the Airtable field metadata both use.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The Airtable field types a form question may bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionType {
    SingleLineText,
    /// Airtable's field metadata reports long-text fields as
    /// `multilineText`; accept both spellings on input.
    #[serde(alias = "multilineText")]
    LongText,
    Email,
    PhoneNumber,
    Number,
    Date,
    SingleSelect,
    MultipleSelects,
    Attachment,
}

impl QuestionType {
    /// Wire name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::SingleLineText => "singleLineText",
            QuestionType::LongText => "longText",
            QuestionType::Email => "email",
            QuestionType::PhoneNumber => "phoneNumber",
            QuestionType::Number => "number",
            QuestionType::Date => "date",
            QuestionType::SingleSelect => "singleSelect",
            QuestionType::MultipleSelects => "multipleSelects",
            QuestionType::Attachment => "attachment",
        }
    }

    /// Select types are the only ones where `options` is meaningful.
    pub fn is_select(&self) -> bool {
        matches!(
            self,
            QuestionType::SingleSelect | QuestionType::MultipleSelects
        )
    }
}

/// Comparison applied by a single visibility condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
}

/// One predicate over another question's answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Key of the question whose answer is inspected. Must reference a
    /// question earlier in the form's sequence (enforced at save time by
    /// [`crate::definition::validate_definition`]).
    pub question_key: String,
    pub operator: ConditionOperator,
    /// Scalar compared against the answer.
    pub value: Value,
}

/// How a rule set combines its conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleLogic {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

/// A question's visibility rule set. An empty `conditions` list is valid:
/// AND is vacuously true, OR is vacuously false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionalRules {
    pub logic: RuleLogic,
    pub conditions: Vec<Condition>,
}

/// A single question owned by a form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Unique within the form; answers and conditions reference it.
    pub question_key: String,
    /// Airtable field id the answer is written to.
    pub airtable_field_id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub required: bool,
    /// `None` means unconditionally visible.
    #[serde(default)]
    pub conditional_rules: Option<ConditionalRules>,
    /// Choice names for select types; empty otherwise.
    #[serde(default)]
    pub options: Vec<String>,
}

/// In-progress or final answers, keyed by `question_key`.
///
/// Values are whatever the respondent supplied: strings, numbers, or string
/// arrays for multi-selects. Attachment uploads travel out-of-band as files
/// and never appear here as blobs.
pub type AnswerSet = serde_json::Map<String, Value>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn question_type_accepts_airtable_multiline_spelling() {
        // Field metadata listings label long-text fields "multilineText",
        // and saved questions echo that spelling back verbatim.
        let question: Question = serde_json::from_value(json!({
            "questionKey": "bio",
            "airtableFieldId": "fld_bio",
            "label": "Bio",
            "type": "multilineText",
        }))
        .unwrap();
        assert_eq!(question.question_type, QuestionType::LongText);

        let canonical: QuestionType = serde_json::from_value(json!("longText")).unwrap();
        assert_eq!(canonical, QuestionType::LongText);
        assert_eq!(serde_json::to_value(canonical).unwrap(), json!("longText"));
    }
}
