//! Form-definition validation, run when an owner creates or updates a form.
//!
//! The runtime evaluator degrades unresolvable condition references to
//! "hidden" so respondents never see an error, but that makes authoring
//! mistakes invisible. This module rejects them at save time instead:
//! duplicate keys, conditions referencing missing questions, conditions
//! referencing *later* questions (which would allow cycles), and select
//! questions without options.

use std::collections::HashSet;

use crate::form::Question;

/// A single problem found in a form definition.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("duplicate question key '{0}'")]
    DuplicateKey(String),

    #[error("question '{question}' condition references unknown question '{referenced}'")]
    UnknownReference {
        question: String,
        referenced: String,
    },

    #[error(
        "question '{question}' condition references '{referenced}', which appears later in the form"
    )]
    ForwardReference {
        question: String,
        referenced: String,
    },

    #[error("question '{question}' condition references itself")]
    SelfReference { question: String },

    #[error("select question '{0}' has no options")]
    MissingOptions(String),
}

/// Validate the full question sequence. Returns every problem found, not
/// just the first, so the builder UI can surface them together.
pub fn validate_definition(questions: &[Question]) -> Result<(), Vec<DefinitionError>> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for question in questions {
        if !seen.insert(question.question_key.as_str()) {
            errors.push(DefinitionError::DuplicateKey(question.question_key.clone()));
        }
    }

    // Conditions may only reference questions strictly earlier in the
    // sequence. Forward references are rejected even when the key exists,
    // which makes dependency cycles unrepresentable in stored forms.
    let mut earlier: HashSet<&str> = HashSet::new();
    let all_keys: HashSet<&str> = questions.iter().map(|q| q.question_key.as_str()).collect();

    for question in questions {
        if let Some(rules) = &question.conditional_rules {
            for cond in &rules.conditions {
                let referenced = cond.question_key.as_str();
                if referenced == question.question_key {
                    errors.push(DefinitionError::SelfReference {
                        question: question.question_key.clone(),
                    });
                } else if !all_keys.contains(referenced) {
                    errors.push(DefinitionError::UnknownReference {
                        question: question.question_key.clone(),
                        referenced: cond.question_key.clone(),
                    });
                } else if !earlier.contains(referenced) {
                    errors.push(DefinitionError::ForwardReference {
                        question: question.question_key.clone(),
                        referenced: cond.question_key.clone(),
                    });
                }
            }
        }

        if question.question_type.is_select() && question.options.is_empty() {
            errors.push(DefinitionError::MissingOptions(
                question.question_key.clone(),
            ));
        }

        earlier.insert(question.question_key.as_str());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
