//! Field-name alias canonicalization.
//!
//! Runs immediately after parsing, before any validator looks at a
//! document, so the rest of the crate only ever sees canonical names.
//! Rename aliases are replaced in place (the key keeps its position);
//! mirror aliases stay in the document and are copied into the canonical
//! field when it is absent.

use serde_json::{Map, Value};

use crate::answer::resolve_answer;
use crate::registry::{self, AliasPolicy, FieldType, SchemaKind};
use crate::violation::{Change, Violation, ViolationKind};

/// Result of canonicalizing one document.
#[derive(Debug, Default)]
pub struct AliasOutcome {
    /// Renames and copies performed.
    pub changes: Vec<Change>,
    /// Alias/canonical pairs that disagree. These are left untouched.
    pub conflicts: Vec<Violation>,
}

impl AliasOutcome {
    fn absorb(&mut self, other: AliasOutcome) {
        self.changes.extend(other.changes);
        self.conflicts.extend(other.conflicts);
    }
}

/// Location label of a question inside a quiz.
pub fn question_location(index: usize) -> String {
    format!("Question {index}")
}

fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

/// Rename `from` to `to` in place. A null `to` entry is dropped.
fn rename_key(obj: &mut Map<String, Value>, from: &str, to: &str) {
    let entries = std::mem::take(obj);
    for (k, v) in entries {
        if k == from {
            obj.insert(to.to_string(), v);
        } else if k != to {
            obj.insert(k, v);
        }
    }
}

fn string_choices(obj: &Map<String, Value>) -> Option<Vec<String>> {
    obj.get("choices")?
        .as_array()?
        .iter()
        .map(|c| c.as_str().map(str::to_string))
        .collect()
}

/// Whether a mirror alias and its canonical field say the same thing.
///
/// Answers agree when they resolve to the same choice, so `"B"` and `1`
/// are consistent for `["A", "B"]`.
pub fn mirror_agrees(obj: &Map<String, Value>, canonical: &str, a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    let is_answer = registry::field(SchemaKind::Question, canonical)
        .is_some_and(|spec| spec.ty == FieldType::Answer);
    if !is_answer {
        return false;
    }
    let Some(choices) = string_choices(obj) else {
        return false;
    };
    match (resolve_answer(a, &choices).index(), resolve_answer(b, &choices).index()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Canonicalize the aliases of one object of `kind`.
pub fn canonicalize_aliases(obj: &mut Map<String, Value>, kind: SchemaKind, location: &str) -> AliasOutcome {
    let mut outcome = AliasOutcome::default();
    for alias in registry::aliases(kind) {
        let Some(alias_value) = present(obj, alias.alias).cloned() else {
            continue;
        };
        match (alias.policy, present(obj, alias.canonical)) {
            (AliasPolicy::Rename, None) => {
                rename_key(obj, alias.alias, alias.canonical);
                outcome.changes.push(Change::new(
                    location,
                    format!("renamed '{}' to '{}'", alias.alias, alias.canonical),
                ));
            }
            (AliasPolicy::Rename, Some(_)) => {
                outcome.conflicts.push(Violation::new(
                    location,
                    ViolationKind::Inconsistent,
                    format!("both '{}' and its alias '{}' are present", alias.canonical, alias.alias),
                ));
            }
            (AliasPolicy::Mirror, None) => {
                obj.insert(alias.canonical.to_string(), alias_value);
                outcome.changes.push(Change::new(
                    location,
                    format!("copied '{}' into '{}'", alias.alias, alias.canonical),
                ));
            }
            (AliasPolicy::Mirror, Some(canonical_value)) => {
                if !mirror_agrees(obj, alias.canonical, canonical_value, &alias_value) {
                    outcome.conflicts.push(Violation::new(
                        location,
                        ViolationKind::Inconsistent,
                        format!(
                            "'{}' ({}) disagrees with its alias '{}' ({})",
                            alias.canonical, canonical_value, alias.alias, alias_value
                        ),
                    ));
                }
            }
        }
    }
    outcome
}

/// Bring mirror aliases back in line with their canonical fields.
///
/// Only aliases already present are touched, and only when both sides
/// agree in meaning but differ in form. Conflicting pairs are left for the
/// validator to report.
pub fn sync_mirrors(obj: &mut Map<String, Value>, kind: SchemaKind, location: &str) -> Vec<Change> {
    let mut changes = Vec::new();
    for alias in registry::aliases(kind) {
        if alias.policy != AliasPolicy::Mirror {
            continue;
        }
        let (Some(alias_value), Some(canonical_value)) =
            (present(obj, alias.alias), present(obj, alias.canonical))
        else {
            continue;
        };
        if alias_value == canonical_value
            || !mirror_agrees(obj, alias.canonical, canonical_value, alias_value)
        {
            continue;
        }
        let synced = canonical_value.clone();
        obj.insert(alias.alias.to_string(), synced);
        changes.push(Change::new(
            location,
            format!("set '{}' to match '{}'", alias.alias, alias.canonical),
        ));
    }
    changes
}

/// Canonicalize a quiz document: the wrapper object (if any) and every
/// question object it holds.
pub fn canonicalize_quiz(doc: &mut Value) -> AliasOutcome {
    let mut outcome = AliasOutcome::default();
    let questions = match doc {
        Value::Object(map) => {
            outcome.absorb(canonicalize_aliases(map, SchemaKind::Quiz, ""));
            map.get_mut("questions").and_then(Value::as_array_mut)
        }
        Value::Array(items) => Some(items),
        _ => None,
    };
    for (i, q) in questions.into_iter().flatten().enumerate() {
        if let Value::Object(obj) = q {
            outcome.absorb(canonicalize_aliases(obj, SchemaKind::Question, &question_location(i)));
        }
    }
    outcome
}
