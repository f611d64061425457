//! Aggregate analytics over a form's collected responses.
//!
//! Pure computation over already-loaded answer sets; the handler fetches
//! the rows and passes them in.

use std::collections::BTreeMap;
use std::collections::HashSet;

use chrono::Duration;
use serde::Serialize;

use crate::form::{AnswerSet, Question};
use crate::types::Timestamp;

/// Window considered "recent" for the dashboard counter.
const RECENT_WINDOW_DAYS: i64 = 7;

/// Per-question response statistics.
#[derive(Debug, Clone, Serialize)]
pub struct FieldStats {
    pub label: String,
    #[serde(rename = "type")]
    pub question_type: String,
    /// Responses where this question has any answer.
    pub responses: usize,
    /// Distinct answer values observed.
    pub unique_values: usize,
}

/// Aggregate analytics for one form.
#[derive(Debug, Clone, Serialize)]
pub struct FormAnalytics {
    pub total_responses: usize,
    /// Responses submitted within the last seven days.
    pub recent_responses: usize,
    /// Keyed by question key, in form order (BTreeMap keeps serialization
    /// stable across runs).
    pub field_stats: BTreeMap<String, FieldStats>,
}

/// Summarize responses for a form.
///
/// `responses` are `(submitted_at, answers)` pairs; `now` is injected so
/// the seven-day window is testable.
pub fn summarize(
    questions: &[Question],
    responses: &[(Timestamp, AnswerSet)],
    now: Timestamp,
) -> FormAnalytics {
    let week_ago = now - Duration::days(RECENT_WINDOW_DAYS);
    let recent_responses = responses
        .iter()
        .filter(|(submitted_at, _)| *submitted_at > week_ago)
        .count();

    let mut field_stats = BTreeMap::new();
    for question in questions {
        let answered: Vec<&serde_json::Value> = responses
            .iter()
            .filter_map(|(_, answers)| answers.get(&question.question_key))
            .filter(|v| !v.is_null())
            .collect();

        // Distinct by serialized form; answers are scalars or small arrays.
        let unique: HashSet<String> = answered.iter().map(|v| v.to_string()).collect();

        field_stats.insert(
            question.question_key.clone(),
            FieldStats {
                label: question.label.clone(),
                question_type: question.question_type.as_str().to_string(),
                responses: answered.len(),
                unique_values: unique.len(),
            },
        );
    }

    FormAnalytics {
        total_responses: responses.len(),
        recent_responses,
        field_stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::QuestionType;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn question(key: &str, label: &str) -> Question {
        Question {
            question_key: key.to_string(),
            airtable_field_id: format!("fld_{key}"),
            label: label.to_string(),
            question_type: QuestionType::SingleLineText,
            required: false,
            conditional_rules: None,
            options: Vec::new(),
        }
    }

    fn answers(pairs: &[(&str, serde_json::Value)]) -> AnswerSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn counts_totals_and_recent_window() {
        let now = Utc.with_ymd_and_hms(2026, 8, 28, 12, 0, 0).unwrap();
        let questions = vec![question("color", "Favourite color")];
        let responses = vec![
            (now - Duration::days(1), answers(&[("color", json!("red"))])),
            (now - Duration::days(6), answers(&[("color", json!("blue"))])),
            (now - Duration::days(30), answers(&[("color", json!("red"))])),
        ];

        let summary = summarize(&questions, &responses, now);
        assert_eq!(summary.total_responses, 3);
        assert_eq!(summary.recent_responses, 2);
    }

    #[test]
    fn field_stats_count_answered_and_unique() {
        let now = Utc::now();
        let questions = vec![question("color", "Color"), question("shade", "Shade")];
        let responses = vec![
            (now, answers(&[("color", json!("red"))])),
            (now, answers(&[("color", json!("red")), ("shade", json!("navy"))])),
            (now, answers(&[("color", json!("blue"))])),
        ];

        let summary = summarize(&questions, &responses, now);
        let color = &summary.field_stats["color"];
        assert_eq!(color.responses, 3);
        assert_eq!(color.unique_values, 2);
        assert_eq!(color.label, "Color");

        let shade = &summary.field_stats["shade"];
        assert_eq!(shade.responses, 1);
        assert_eq!(shade.unique_values, 1);
    }

    #[test]
    fn null_answers_do_not_count() {
        let now = Utc::now();
        let questions = vec![question("color", "Color")];
        let responses = vec![(now, answers(&[("color", serde_json::Value::Null)]))];

        let summary = summarize(&questions, &responses, now);
        assert_eq!(summary.field_stats["color"].responses, 0);
        assert_eq!(summary.field_stats["color"].unique_values, 0);
    }

    #[test]
    fn empty_form_summarizes_cleanly() {
        let now = Utc::now();
        let summary = summarize(&[], &[], now);
        assert_eq!(summary.total_responses, 0);
        assert_eq!(summary.recent_responses, 0);
        assert!(summary.field_stats.is_empty());
    }
}
