//! # Quiz/Question Validator
//!
//! A quiz is either a wrapper object holding `questions` (canonical) or a
//! bare array of questions. Both are validated; only the wrapper carries
//! `totalQuestions`, which must equal the number of questions.
//!
//! Aliases are canonicalized on a private copy before any check runs, so
//! `items`, `questionList`, `correctIndex` and `type` are understood
//! without the checks ever naming them.
//!
//! ## Choice-based questions
//!
//! A question is choice-based when its declared `questionType` is
//! `multiple-choice` or `true-false`. Without a declared type it is
//! choice-based when it has non-empty `choices` *and* an answer. Only
//! choice-based questions get the choice and answer checks; open-ended and
//! coding questions skip them.

use serde_json::Value;

use gca_core::{ContentId, QuestionType};

use crate::alias::{canonicalize_aliases, question_location};
use crate::answer::{resolve_answer, AnswerResolution};
use crate::check::{check_record, is_integer, json_type_name};
use crate::registry::{SchemaKind, ValidationMode};
use crate::violation::{Violation, ViolationKind};

/// Minimum number of choices a choice-based question may have.
pub const MIN_CHOICES: usize = 2;

/// Validate a quiz document in either accepted shape.
pub fn validate_quiz(doc: &Value, mode: ValidationMode) -> Vec<Violation> {
    let mut violations = Vec::new();
    let questions: Vec<Value> = match doc {
        Value::Array(items) => items.clone(),
        Value::Object(map) => {
            let mut wrapper = map.clone();
            violations.extend(canonicalize_aliases(&mut wrapper, SchemaKind::Quiz, "").conflicts);
            violations.extend(check_record(&wrapper, SchemaKind::Quiz, mode, ""));

            if let Some(score) = wrapper.get("passingScore").and_then(Value::as_i64) {
                if !(0..=100).contains(&score) {
                    violations.push(Violation::new(
                        "",
                        ViolationKind::InvalidValue,
                        format!("passingScore must be between 0 and 100, got {score}"),
                    ));
                }
            }

            let questions = wrapper
                .get("questions")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();

            if let Some(total) = wrapper.get("totalQuestions").filter(|v| is_integer(v)) {
                if wrapper.get("questions").is_some_and(Value::is_array)
                    && total.as_u64() != Some(questions.len() as u64)
                {
                    violations.push(count_mismatch(total, questions.len()));
                }
            }
            questions
        }
        other => {
            return vec![Violation::new(
                "",
                ViolationKind::Structure,
                format!(
                    "quiz must be an object with a 'questions' list or a list of questions, got {}",
                    json_type_name(other)
                ),
            )]
        }
    };

    for (i, q) in questions.iter().enumerate() {
        violations.extend(validate_question(q, i, mode));
    }
    violations
}

fn count_mismatch(total: &Value, found: usize) -> Violation {
    Violation::new(
        "",
        ViolationKind::Inconsistent,
        format!("question count mismatch: totalQuestions is {total} but found {found} questions"),
    )
}

/// State of the `choices` field after shape checking.
enum Choices {
    Absent,
    Strings(Vec<String>),
    /// Present but not a list of strings; already reported.
    Malformed,
}

fn read_choices(q: &serde_json::Map<String, Value>) -> Choices {
    match q.get("choices") {
        None | Some(Value::Null) => Choices::Absent,
        Some(Value::Array(items)) => items
            .iter()
            .map(|c| c.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map_or(Choices::Malformed, Choices::Strings),
        Some(_) => Choices::Malformed,
    }
}

/// The type a question is judged as: its declared `questionType`, else
/// multiple-choice when it has non-empty string choices and an answer.
/// `None` means the question is not choice-based.
pub(crate) fn effective_type(q: &serde_json::Map<String, Value>) -> Option<QuestionType> {
    let declared = q
        .get("questionType")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<QuestionType>().ok());
    if declared.is_some() {
        return declared;
    }
    let has_answer = q.get("correctAnswer").is_some_and(|v| !v.is_null());
    match read_choices(q) {
        Choices::Strings(c) if !c.is_empty() && has_answer => Some(QuestionType::MultipleChoice),
        _ => None,
    }
}

/// Strict mode: ids must run `1..=n` in file order.
fn out_of_sequence(q: &serde_json::Map<String, Value>, index: usize, location: &str) -> Option<Violation> {
    let id = q.get("id").filter(|v| !v.is_null())?;
    let expected = ContentId::sequential(index + 1);
    let number = ContentId::from_json(id)?.as_number();
    if number == expected.as_number() {
        return None;
    }
    Some(Violation::new(
        location,
        ViolationKind::Inconsistent,
        format!("question id {id} is out of sequence: expected \"{expected}\""),
    ))
}

/// Validate one question. `index` is its 0-based position in the quiz.
pub fn validate_question(q: &Value, index: usize, mode: ValidationMode) -> Vec<Violation> {
    let location = question_location(index);
    let Some(obj) = q.as_object() else {
        return vec![Violation::new(
            location,
            ViolationKind::Structure,
            format!("question must be an object, got {}", json_type_name(q)),
        )];
    };

    let mut question = obj.clone();
    let mut violations = canonicalize_aliases(&mut question, SchemaKind::Question, &location).conflicts;
    violations.extend(check_record(&question, SchemaKind::Question, mode, &location));

    if question
        .get("question")
        .and_then(Value::as_str)
        .is_some_and(|text| text.trim().is_empty())
    {
        violations.push(Violation::new(&location, ViolationKind::InvalidValue, "question text is empty"));
    }

    if mode.is_strict() {
        violations.extend(out_of_sequence(&question, index, &location));
    }

    let answer = question.get("correctAnswer").filter(|v| !v.is_null());
    let choices = read_choices(&question);

    let Some(effective) = effective_type(&question) else {
        return violations;
    };
    if !effective.is_choice_based() {
        return violations;
    }

    let (choices, absent) = match choices {
        Choices::Strings(c) => (c, false),
        Choices::Malformed => return violations,
        Choices::Absent => {
            violations.push(Violation::missing_field(&location, "choices"));
            (Vec::new(), true)
        }
    };

    if !absent && choices.len() < MIN_CHOICES {
        violations.push(Violation::new(
            &location,
            ViolationKind::InvalidValue,
            format!("{effective} question needs at least {MIN_CHOICES} choices, got {}", choices.len()),
        ));
    }

    if mode.is_strict() {
        if let Some(expected) = effective.canonical_choice_count() {
            if !choices.is_empty() && choices.len() != expected {
                violations.push(Violation::new(
                    &location,
                    ViolationKind::InvalidValue,
                    format!("{effective} question must have exactly {expected} choices, got {}", choices.len()),
                ));
            }
        }
    }

    match answer {
        None => violations.push(Violation::missing_field(&location, "correctAnswer")),
        Some(_) if choices.is_empty() => {}
        Some(raw) => {
            let resolution = resolve_answer(raw, &choices);
            let kind = match resolution {
                AnswerResolution::Index { .. } | AnswerResolution::WrongType(_) => None,
                AnswerResolution::OutOfRange { .. } => Some(ViolationKind::InvalidValue),
                AnswerResolution::Ambiguous { .. } | AnswerResolution::Unresolved(_) => {
                    Some(ViolationKind::UnresolvedAnswer)
                }
            };
            if let (Some(kind), Some(message)) = (kind, resolution.failure_message("correctAnswer", raw)) {
                violations.push(Violation::new(&location, kind, message));
            }
        }
    }
    violations
}
