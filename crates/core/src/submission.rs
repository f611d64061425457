//! Submission validation — the authoritative check run at submit time.
//!
//! Reuses [`crate::visibility`] so the renderer and the submit endpoint can
//! never disagree about which questions are required. The output is a
//! [`SubmissionPlan`]: the exact scalar field mapping to forward to the
//! record store plus the attachment slots to dispatch as separate writes.

use serde::Serialize;
use serde_json::Value;

use crate::form::{AnswerSet, Question, QuestionType};
use crate::visibility::visible_questions;

/// Policy knobs for submission checking.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionPolicy {
    /// Forward answers belonging to currently-hidden questions (e.g. stale
    /// values entered before a condition hid them). Defaults to true, the
    /// behavior respondents observe today; see DESIGN.md.
    pub retain_hidden_answers: bool,
}

impl Default for SubmissionPolicy {
    fn default() -> Self {
        Self {
            retain_hidden_answers: true,
        }
    }
}

/// An attachment question with a file to dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentSlot {
    pub question_key: String,
    pub airtable_field_id: String,
}

/// What to write externally once a submission is accepted.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionPlan {
    /// `airtable_field_id -> answer value` for every non-attachment question
    /// with a present answer.
    pub fields: serde_json::Map<String, Value>,
    /// Attachment questions with a present answer, dispatched as independent
    /// file-attach writes.
    pub attachments: Vec<AttachmentSlot>,
}

/// Outcome of the pre-write submission check. No side effects happen before
/// this resolves to `Accepted`.
#[derive(Debug)]
pub enum SubmissionCheck {
    Accepted(SubmissionPlan),
    Rejected { missing_required_keys: Vec<String> },
}

/// Validate a candidate answer set against the form's questions.
///
/// 1. Compute the visible subsequence.
/// 2. A visible required question whose answer is absent or falsy is
///    missing. Falsy deliberately includes `0`, `false`, and `""` — a
///    required numeric question answered with `0` counts as unanswered —
///    but an array is present even when empty.
/// 3. Any missing key rejects the whole submission.
/// 4. Otherwise build the plan over **all** questions (hidden ones too,
///    unless the policy strips them).
pub fn check_submission(
    questions: &[Question],
    answers: &AnswerSet,
    policy: SubmissionPolicy,
) -> SubmissionCheck {
    let visible = visible_questions(questions, answers);

    let missing_required_keys: Vec<String> = visible
        .iter()
        .filter(|q| q.required)
        .filter(|q| !answer_is_present(answers.get(&q.question_key)))
        .map(|q| q.question_key.clone())
        .collect();

    if !missing_required_keys.is_empty() {
        return SubmissionCheck::Rejected {
            missing_required_keys,
        };
    }

    let mut fields = serde_json::Map::new();
    let mut attachments = Vec::new();

    for question in questions {
        let Some(answer) = answers.get(&question.question_key) else {
            continue;
        };
        if answer.is_null() {
            continue;
        }
        if !policy.retain_hidden_answers
            && !visible.iter().any(|v| v.question_key == question.question_key)
        {
            continue;
        }
        if question.question_type == QuestionType::Attachment {
            attachments.push(AttachmentSlot {
                question_key: question.question_key.clone(),
                airtable_field_id: question.airtable_field_id.clone(),
            });
        } else {
            fields.insert(question.airtable_field_id.clone(), answer.clone());
        }
    }

    SubmissionCheck::Accepted(SubmissionPlan {
        fields,
        attachments,
    })
}

/// Truthiness check for a required answer. Mirrors the loose-falsy
/// semantics the forms have always had: `0`, `false`, `""`, and null count
/// as unanswered. Arrays are always present, empty or not — an empty
/// multi-select selection passes a required check.
fn answer_is_present(answer: Option<&Value>) -> bool {
    match answer {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Record-id sentinel used when a submission wrote only attachments and no
/// scalar record was created.
pub const ATTACHMENT_ONLY_RECORD_ID: &str = "file-upload-only";
