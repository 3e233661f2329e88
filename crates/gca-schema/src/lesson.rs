//! # Lesson Validator
//!
//! Validates lesson documents against the `Lesson` registry entry and
//! recurses into the nested records (`code`, `pitfalls`, `exercises`,
//! `sources`).
//!
//! Locations use 0-based indices: `Lesson 2: pitfalls[0]`. These are
//! positions in the file, not the 1-based `order` or `id` values stored in
//! the data.

use serde_json::{Map, Value};

use gca_core::ContentDate;

use crate::check::{check_record, json_type_name};
use crate::registry::{ElementType, FieldType, SchemaKind, ValidationMode};
use crate::violation::{element, locate, Violation, ViolationKind};

/// Location label of a lesson inside a lesson file.
pub fn lesson_location(index: usize) -> String {
    format!("Lesson {index}")
}

/// Validate one lesson object.
pub fn validate_lesson(doc: &Value, mode: ValidationMode) -> Vec<Violation> {
    validate_lesson_at(doc, mode, "")
}

fn validate_lesson_at(doc: &Value, mode: ValidationMode, location: &str) -> Vec<Violation> {
    let Some(lesson) = doc.as_object() else {
        return vec![Violation::new(
            location,
            ViolationKind::Structure,
            format!("lesson must be an object, got {}", json_type_name(doc)),
        )];
    };

    let mut violations = check_record(lesson, SchemaKind::Lesson, mode, location);

    if let Some(order) = lesson.get("order").and_then(Value::as_i64) {
        if order < 1 {
            violations.push(Violation::new(
                location,
                ViolationKind::InvalidValue,
                format!("order must be at least 1, got {order}"),
            ));
        }
    }

    if mode.is_strict() {
        if let Some(stamp) = lesson.get("lastUpdated").and_then(Value::as_str) {
            if let Err(e) = ContentDate::parse(stamp) {
                violations.push(Violation::new(
                    location,
                    ViolationKind::InvalidValue,
                    format!("lastUpdated: {e}"),
                ));
            }
        }
    }

    violations.extend(nested_records(lesson, mode, location));
    violations
}

/// Check the sub-records of a lesson. Values of the wrong outer shape were
/// already reported by the field check and are skipped here.
fn nested_records(lesson: &Map<String, Value>, mode: ValidationMode, location: &str) -> Vec<Violation> {
    let mut violations = Vec::new();
    for spec in crate::registry::fields(SchemaKind::Lesson) {
        match (spec.ty, lesson.get(spec.name)) {
            (FieldType::Record(kind), Some(Value::Object(obj))) => {
                violations.extend(check_record(obj, kind, mode, &locate(location, spec.name)));
            }
            (FieldType::List(ElementType::Record(kind)), Some(Value::Array(items))) => {
                for (i, item) in items.iter().enumerate() {
                    if let Value::Object(obj) = item {
                        violations.extend(check_record(obj, kind, mode, &element(location, spec.name, i)));
                    }
                }
            }
            _ => {}
        }
    }
    violations
}

/// Validate a whole lesson file.
///
/// The canonical form is an array of lessons. A single lesson object is
/// accepted in lenient mode and reported in strict mode. Strict mode also
/// requires each module's `order` values inside the file to be exactly
/// `1..=n`.
pub fn validate_lesson_file(doc: &Value, mode: ValidationMode) -> Vec<Violation> {
    match doc {
        Value::Array(lessons) => {
            let mut violations: Vec<Violation> = lessons
                .iter()
                .enumerate()
                .flat_map(|(i, lesson)| validate_lesson_at(lesson, mode, &lesson_location(i)))
                .collect();
            if mode.is_strict() {
                violations.extend(order_gaps(lessons));
            }
            violations
        }
        Value::Object(_) => {
            let mut violations = Vec::new();
            if mode.is_strict() {
                violations.push(Violation::new(
                    "",
                    ViolationKind::Structure,
                    "lesson file must be an array of lessons, got a single lesson object",
                ));
            }
            violations.extend(validate_lesson_at(doc, mode, &lesson_location(0)));
            violations
        }
        other => vec![Violation::new(
            "",
            ViolationKind::Structure,
            format!("lesson file must be an array of lessons, got {}", json_type_name(other)),
        )],
    }
}

/// Modules whose lesson orders are not exactly `1..=n`.
fn order_gaps(lessons: &[Value]) -> Vec<Violation> {
    let mut modules: Vec<(&str, Vec<i64>, bool)> = Vec::new();
    for lesson in lessons.iter().filter_map(Value::as_object) {
        let slug = lesson.get("moduleSlug").and_then(Value::as_str).unwrap_or("");
        let order = lesson.get("order").and_then(Value::as_i64);
        let idx = match modules.iter().position(|(s, _, _)| *s == slug) {
            Some(idx) => idx,
            None => {
                modules.push((slug, Vec::new(), true));
                modules.len() - 1
            }
        };
        match order {
            Some(o) => modules[idx].1.push(o),
            None => modules[idx].2 = false,
        }
    }

    let mut violations = Vec::new();
    for (slug, mut orders, complete) in modules {
        if !complete {
            continue;
        }
        orders.sort_unstable();
        let expected: Vec<i64> = (1..=orders.len() as i64).collect();
        if orders != expected {
            let found = orders.iter().map(i64::to_string).collect::<Vec<_>>().join(", ");
            violations.push(Violation::new(
                "",
                ViolationKind::Inconsistent,
                format!(
                    "lesson order for module '{slug}' is [{found}], expected 1..={}",
                    orders.len()
                ),
            ));
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_lesson() -> Value {
        json!({
            "id": 1,
            "moduleSlug": "react-fundamentals",
            "title": "Components",
            "order": 1,
            "objectives": ["Write a component"],
            "intro": "Components are functions.",
            "code": {"example": "const A = () => null;", "explanation": "Empty", "language": "javascript"},
            "pitfalls": [{"mistake": "Lowercase names", "solution": "Capitalise", "severity": "high"}],
            "exercises": [{"title": "Counter", "description": "Build one", "checkpoints": ["renders"]}],
            "next": ["state"],
            "estimatedMinutes": 30,
            "difficulty": "Beginner",
            "tags": ["react"],
            "sources": [{"title": "Docs", "url": "https://react.dev"}],
            "lastUpdated": "2025-01-31"
        })
    }

    #[test]
    fn valid_lesson_has_no_violations() {
        assert!(validate_lesson(&valid_lesson(), ValidationMode::Lenient).is_empty());
        assert!(validate_lesson(&valid_lesson(), ValidationMode::Strict).is_empty());
    }

    #[test]
    fn string_id_is_valid() {
        let mut lesson = valid_lesson();
        lesson["id"] = json!("react-components");
        assert!(validate_lesson(&lesson, ValidationMode::Lenient).is_empty());
    }

    #[test]
    fn nested_violation_is_located_by_index() {
        let mut lesson = valid_lesson();
        lesson["pitfalls"] = json!([
            {"mistake": "a", "solution": "b", "severity": "low"},
            {"mistake": "c", "solution": "d"}
        ]);
        let file = json!([lesson]);
        let v = validate_lesson_file(&file, ValidationMode::Lenient);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].to_string(), "Lesson 0: pitfalls[1]: missing field: severity");
    }

    #[test]
    fn code_block_fields_are_checked() {
        let mut lesson = valid_lesson();
        lesson["code"] = json!({"example": "x", "language": 3});
        let v = validate_lesson(&lesson, ValidationMode::Lenient);
        let msgs: Vec<String> = v.iter().map(ToString::to_string).collect();
        assert_eq!(
            msgs,
            [
                "code: missing field: explanation",
                "code: wrong type for 'language': expected string, got integer",
            ]
        );
    }

    #[test]
    fn non_object_list_entry_reported_once() {
        let mut lesson = valid_lesson();
        lesson["exercises"] = json!(["do the thing"]);
        let v = validate_lesson(&lesson, ValidationMode::Lenient);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].message, "wrong type for 'exercises[0]': expected exercise object, got string");
    }

    #[test]
    fn bad_difficulty_names_value_and_allowed_set() {
        let mut lesson = valid_lesson();
        lesson["difficulty"] = json!("Expert");
        let v = validate_lesson(&lesson, ValidationMode::Lenient);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].message, "invalid difficulty \"Expert\": expected one of Beginner, Intermediate, Advanced");
    }

    #[test]
    fn order_must_be_positive() {
        let mut lesson = valid_lesson();
        lesson["order"] = json!(0);
        let v = validate_lesson(&lesson, ValidationMode::Lenient);
        assert_eq!(v[0].message, "order must be at least 1, got 0");
    }

    #[test]
    fn strict_rejects_unparseable_last_updated() {
        let mut lesson = valid_lesson();
        lesson["lastUpdated"] = json!("last tuesday");
        assert!(validate_lesson(&lesson, ValidationMode::Lenient).is_empty());
        let v = validate_lesson(&lesson, ValidationMode::Strict);
        assert_eq!(v.len(), 1);
        assert!(v[0].message.starts_with("lastUpdated:"));
    }

    #[test]
    fn single_object_file_is_lenient_only() {
        let doc = valid_lesson();
        assert!(validate_lesson_file(&doc, ValidationMode::Lenient).is_empty());
        let v = validate_lesson_file(&doc, ValidationMode::Strict);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].kind, ViolationKind::Structure);
    }

    #[test]
    fn scalar_file_is_structure_violation() {
        let v = validate_lesson_file(&json!("lessons"), ValidationMode::Lenient);
        assert_eq!(v[0].message, "lesson file must be an array of lessons, got string");
    }

    #[test]
    fn strict_requires_contiguous_orders_per_module() {
        let mut a = valid_lesson();
        let mut b = valid_lesson();
        a["order"] = json!(1);
        b["order"] = json!(3);
        let file = json!([a, b]);
        assert!(validate_lesson_file(&file, ValidationMode::Lenient).is_empty());
        let v = validate_lesson_file(&file, ValidationMode::Strict);
        assert_eq!(v.len(), 1);
        assert_eq!(
            v[0].message,
            "lesson order for module 'react-fundamentals' is [1, 3], expected 1..=2"
        );
    }

    #[test]
    fn orders_are_scoped_per_module() {
        let mut a = valid_lesson();
        let mut b = valid_lesson();
        b["moduleSlug"] = json!("react-hooks");
        a["order"] = json!(1);
        b["order"] = json!(1);
        assert!(validate_lesson_file(&json!([a, b]), ValidationMode::Strict).is_empty());
    }
}
