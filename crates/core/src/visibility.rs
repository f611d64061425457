//! Conditional-visibility evaluator — pure logic, no database access.
//!
//! The same evaluation runs on every answer mutation during rendering and
//! again as the authoritative check at submit time, so it lives here once.
//! There is no caching and no dependency graph: a form has tens of
//! questions and the full re-scan is cheap.

use serde_json::Value;

use crate::form::{AnswerSet, Condition, ConditionOperator, ConditionalRules, Question, RuleLogic};

/// Return the order-preserving subsequence of `questions` that is currently
/// visible given the in-progress `answers`.
pub fn visible_questions<'a>(questions: &'a [Question], answers: &AnswerSet) -> Vec<&'a Question> {
    questions
        .iter()
        .filter(|q| question_is_visible(q.conditional_rules.as_ref(), answers))
        .collect()
}

/// A question with no rule set is always visible; otherwise the rule set
/// decides.
pub fn question_is_visible(rules: Option<&ConditionalRules>, answers: &AnswerSet) -> bool {
    match rules {
        None => true,
        Some(rules) => evaluate_rules(rules, answers),
    }
}

/// Combine the rule set's conditions per its logic.
///
/// AND over an empty condition list is vacuously true; OR over an empty
/// list is vacuously false. That asymmetry is load-bearing: callers rely on
/// `{logic: "OR", conditions: []}` hiding a question.
fn evaluate_rules(rules: &ConditionalRules, answers: &AnswerSet) -> bool {
    match rules.logic {
        RuleLogic::And => rules.conditions.iter().all(|c| evaluate_condition(c, answers)),
        RuleLogic::Or => rules.conditions.iter().any(|c| evaluate_condition(c, answers)),
    }
}

/// Evaluate one condition against the answer set.
///
/// Closed-world policy: an absent or null dependency answer makes the
/// condition false under every operator, so a question that depends on an
/// unanswered field stays hidden. A condition referencing a key that exists
/// in no question degrades the same way instead of erroring — rendering a
/// malformed stored form must never crash for a respondent.
fn evaluate_condition(condition: &Condition, answers: &AnswerSet) -> bool {
    let answer = match answers.get(&condition.question_key) {
        Some(v) if !v.is_null() => v,
        _ => return false,
    };

    match condition.operator {
        ConditionOperator::Equals => *answer == condition.value,
        ConditionOperator::NotEquals => *answer != condition.value,
        ConditionOperator::Contains => {
            value_as_text(answer).contains(&value_as_text(&condition.value))
        }
    }
}

/// Textual coercion used by `contains`: both sides become their display
/// string, so the number `42` contains `"4"`. Arrays render as their
/// elements joined with commas, with no brackets or quoting, so a
/// multi-select answer `["a", "b"]` reads `a,b`.
fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_as_text)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::QuestionType;
    use serde_json::json;

    fn question(key: &str, rules: Option<ConditionalRules>) -> Question {
        Question {
            question_key: key.to_string(),
            airtable_field_id: format!("fld_{key}"),
            label: key.to_string(),
            question_type: QuestionType::SingleLineText,
            required: false,
            conditional_rules: rules,
            options: Vec::new(),
        }
    }

    fn rules(logic: RuleLogic, conditions: Vec<Condition>) -> ConditionalRules {
        ConditionalRules { logic, conditions }
    }

    fn condition(key: &str, operator: ConditionOperator, value: serde_json::Value) -> Condition {
        Condition {
            question_key: key.to_string(),
            operator,
            value,
        }
    }

    fn answers(pairs: &[(&str, serde_json::Value)]) -> AnswerSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn unconditional_question_is_always_visible() {
        assert!(question_is_visible(None, &answers(&[])));
        assert!(question_is_visible(
            None,
            &answers(&[("anything", json!("at all"))])
        ));
    }

    #[test]
    fn empty_and_is_vacuously_true() {
        let r = rules(RuleLogic::And, vec![]);
        assert!(question_is_visible(Some(&r), &answers(&[])));
    }

    #[test]
    fn empty_or_is_vacuously_false() {
        let r = rules(RuleLogic::Or, vec![]);
        assert!(!question_is_visible(Some(&r), &answers(&[])));
    }

    #[test]
    fn unanswered_dependency_is_false_under_every_operator() {
        for op in [
            ConditionOperator::Equals,
            ConditionOperator::NotEquals,
            ConditionOperator::Contains,
        ] {
            let r = rules(RuleLogic::And, vec![condition("q1", op, json!("x"))]);
            assert!(
                !question_is_visible(Some(&r), &answers(&[])),
                "{op:?} must be false on an absent answer"
            );
        }
    }

    #[test]
    fn null_answer_counts_as_unanswered() {
        let r = rules(
            RuleLogic::And,
            vec![condition("q1", ConditionOperator::NotEquals, json!("x"))],
        );
        assert!(!question_is_visible(
            Some(&r),
            &answers(&[("q1", serde_json::Value::Null)])
        ));
    }

    #[test]
    fn equals_is_strict() {
        let r = rules(
            RuleLogic::And,
            vec![condition("q1", ConditionOperator::Equals, json!("blue"))],
        );
        assert!(question_is_visible(
            Some(&r),
            &answers(&[("q1", json!("blue"))])
        ));
        assert!(!question_is_visible(
            Some(&r),
            &answers(&[("q1", json!("red"))])
        ));
        // No numeric/string coercion for equals.
        let numeric = rules(
            RuleLogic::And,
            vec![condition("q1", ConditionOperator::Equals, json!("42"))],
        );
        assert!(!question_is_visible(
            Some(&numeric),
            &answers(&[("q1", json!(42))])
        ));
    }

    #[test]
    fn not_equals_is_strict_inequality() {
        let r = rules(
            RuleLogic::And,
            vec![condition("q1", ConditionOperator::NotEquals, json!("blue"))],
        );
        assert!(question_is_visible(
            Some(&r),
            &answers(&[("q1", json!("red"))])
        ));
        assert!(!question_is_visible(
            Some(&r),
            &answers(&[("q1", json!("blue"))])
        ));
    }

    #[test]
    fn contains_coerces_both_sides_to_string() {
        let r = rules(
            RuleLogic::And,
            vec![condition("q1", ConditionOperator::Contains, json!("4"))],
        );
        assert!(question_is_visible(
            Some(&r),
            &answers(&[("q1", json!(42))])
        ));

        let numeric_needle = rules(
            RuleLogic::And,
            vec![condition("q1", ConditionOperator::Contains, json!(4))],
        );
        assert!(question_is_visible(
            Some(&numeric_needle),
            &answers(&[("q1", json!("night 4: encore"))])
        ));
    }

    #[test]
    fn contains_joins_array_answers_with_commas() {
        // A multi-select answer coerces to its elements joined by commas,
        // never to JSON syntax with brackets and quotes.
        let r = rules(
            RuleLogic::And,
            vec![condition("q1", ConditionOperator::Contains, json!("red"))],
        );
        assert!(question_is_visible(
            Some(&r),
            &answers(&[("q1", json!(["red", "blue"]))])
        ));

        let spanning = rules(
            RuleLogic::And,
            vec![condition("q1", ConditionOperator::Contains, json!("red,blue"))],
        );
        assert!(question_is_visible(
            Some(&spanning),
            &answers(&[("q1", json!(["red", "blue"]))])
        ));

        let quoted = rules(
            RuleLogic::And,
            vec![condition("q1", ConditionOperator::Contains, json!("\"red\""))],
        );
        assert!(!question_is_visible(
            Some(&quoted),
            &answers(&[("q1", json!(["red", "blue"]))])
        ));
    }

    #[test]
    fn and_requires_every_condition() {
        let r = rules(
            RuleLogic::And,
            vec![
                condition("q1", ConditionOperator::Equals, json!("a")),
                condition("q2", ConditionOperator::Equals, json!("b")),
            ],
        );
        assert!(question_is_visible(
            Some(&r),
            &answers(&[("q1", json!("a")), ("q2", json!("b"))])
        ));
        assert!(!question_is_visible(
            Some(&r),
            &answers(&[("q1", json!("a"))])
        ));
    }

    #[test]
    fn or_requires_at_least_one_condition() {
        let r = rules(
            RuleLogic::Or,
            vec![
                condition("q1", ConditionOperator::Equals, json!("a")),
                condition("q2", ConditionOperator::Equals, json!("b")),
            ],
        );
        assert!(question_is_visible(
            Some(&r),
            &answers(&[("q2", json!("b"))])
        ));
        assert!(!question_is_visible(
            Some(&r),
            &answers(&[("q1", json!("z"))])
        ));
    }

    #[test]
    fn visible_questions_preserves_order() {
        let questions = vec![
            question("first", None),
            question(
                "second",
                Some(rules(
                    RuleLogic::And,
                    vec![condition("first", ConditionOperator::Equals, json!("yes"))],
                )),
            ),
            question("third", None),
        ];

        let hidden = visible_questions(&questions, &answers(&[]));
        let keys: Vec<_> = hidden.iter().map(|q| q.question_key.as_str()).collect();
        assert_eq!(keys, vec!["first", "third"]);

        let shown = visible_questions(&questions, &answers(&[("first", json!("yes"))]));
        let keys: Vec<_> = shown.iter().map(|q| q.question_key.as_str()).collect();
        assert_eq!(keys, vec!["first", "second", "third"]);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let questions = vec![
            question("a", None),
            question(
                "b",
                Some(rules(
                    RuleLogic::Or,
                    vec![condition("a", ConditionOperator::Contains, json!("x"))],
                )),
            ),
        ];
        let ans = answers(&[("a", json!("axe"))]);

        let first: Vec<String> = visible_questions(&questions, &ans)
            .iter()
            .map(|q| q.question_key.clone())
            .collect();
        let second: Vec<String> = visible_questions(&questions, &ans)
            .iter()
            .map(|q| q.question_key.clone())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn dangling_reference_degrades_to_hidden() {
        let r = rules(
            RuleLogic::And,
            vec![condition("no_such_question", ConditionOperator::Equals, json!("x"))],
        );
        assert!(!question_is_visible(
            Some(&r),
            &answers(&[("q1", json!("x"))])
        ));
    }
}
