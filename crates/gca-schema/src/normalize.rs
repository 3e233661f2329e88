//! # Normalizer
//!
//! Rewrites a lesson or quiz document into canonical form and records
//! every edit as a [`Change`].
//!
//! ## Steps
//!
//! 1. Wrap: a bare question list becomes `{"questions": [...]}`; a single
//!    lesson object becomes a one-element list.
//! 2. Aliases: `items`/`questionList` are renamed, mirrored aliases are
//!    copied into their canonical field.
//! 3. `legacy` fields are dropped when requested.
//! 4. Coercion: numeric strings in integer fields become integers;
//!    difficulty capitalisation is repaired and `basic`/`expert` map to
//!    `Beginner`/`Advanced`; on choice-based questions, textual answers
//!    that resolve to exactly one choice become indices.
//! 5. Numbering: question ids become `"1".."n"`, lesson `order` becomes
//!    `1..=n` per module, numeric or missing lesson ids follow `order`.
//! 6. Defaults from the registry are appended for absent fields.
//! 7. `totalQuestions` is re-derived and mirrors are brought back in line.
//!
//! Existing keys never move; new keys are appended. The output of a pass
//! is a fixed point: normalizing it again yields no changes.

use serde_json::{json, Map, Value};

use gca_core::{ContentId, ContentKind, Difficulty, ModuleSlug};

use crate::alias::{canonicalize_quiz, question_location, sync_mirrors};
use crate::answer::{resolve_answer, AnswerResolution, MatchRule};
use crate::lesson::lesson_location;
use crate::registry::{
    self, DefaultValue, Derivation, ElementType, FieldType, SchemaKind, LEGACY_FIELD,
};
use crate::violation::{element, locate, Change};

/// Topic used when neither tags nor the module name give one.
pub const FALLBACK_TOPIC: &str = "General";

/// Options controlling one normalizer.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    /// Drop `legacy` fields.
    pub remove_legacy: bool,
    /// Module the file belongs to, usually derived from its name.
    pub module_slug: Option<ModuleSlug>,
}

/// A normalized document plus the edits that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Canonical document.
    pub document: Value,
    /// Edits, in the order they were made.
    pub changes: Vec<Change>,
}

impl Normalized {
    /// Returns true if the input was already canonical.
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Applies the canonicalization steps to lesson and quiz documents.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

/// Values derived defaults are computed from.
struct Context<'a> {
    slug: Option<&'a str>,
    /// 1-based position (lesson `order` for lessons).
    position: usize,
}

impl Normalizer {
    /// Create a normalizer.
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Normalize a document of the given kind.
    pub fn normalize(&self, doc: &Value, kind: ContentKind) -> Normalized {
        let mut document = doc.clone();
        let mut changes = Vec::new();
        match kind {
            ContentKind::Lesson => self.normalize_lessons(&mut document, &mut changes),
            ContentKind::Quiz => self.normalize_quiz(&mut document, &mut changes),
        }
        Normalized { document, changes }
    }

    fn default_slug(&self) -> Option<&str> {
        self.options.module_slug.as_ref().map(ModuleSlug::as_str)
    }

    fn drop_legacy(&self, obj: &mut Map<String, Value>, location: &str, changes: &mut Vec<Change>) {
        if self.options.remove_legacy && remove_key(obj, LEGACY_FIELD).is_some() {
            changes.push(Change::new(location, format!("removed '{LEGACY_FIELD}' field")));
        }
    }

    fn normalize_quiz(&self, doc: &mut Value, changes: &mut Vec<Change>) {
        if let Value::Array(items) = doc {
            let questions = std::mem::take(items);
            *doc = json!({ "questions": questions });
            changes.push(Change::new("", "wrapped bare question list in a quiz object"));
        }
        if !doc.is_object() {
            return;
        }
        changes.extend(canonicalize_quiz(doc).changes);
        let Some(quiz) = doc.as_object_mut() else {
            return;
        };

        self.drop_legacy(quiz, "", changes);
        coerce_fields(quiz, SchemaKind::Quiz, "", changes);

        let slug = quiz
            .get("moduleSlug")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| self.default_slug().map(str::to_string));

        if let Some(Value::Array(questions)) = quiz.get_mut("questions") {
            for (i, q) in questions.iter_mut().enumerate() {
                if let Value::Object(obj) = q {
                    let ctx = Context { slug: slug.as_deref(), position: i + 1 };
                    self.normalize_question(obj, i, &ctx, changes);
                }
            }
        }

        let ctx = Context { slug: slug.as_deref(), position: 1 };
        fill_defaults(quiz, SchemaKind::Quiz, &ctx, "", changes);

        if let Some(count) = quiz.get("questions").and_then(Value::as_array).map(Vec::len) {
            let declared = quiz.get("totalQuestions").cloned().unwrap_or(Value::Null);
            if declared.as_u64() != Some(count as u64) {
                quiz.insert("totalQuestions".to_string(), json!(count));
                changes.push(Change::new(
                    "",
                    format!("set totalQuestions to {count} (was {declared})"),
                ));
            }
        }
    }

    fn normalize_question(
        &self,
        q: &mut Map<String, Value>,
        index: usize,
        ctx: &Context<'_>,
        changes: &mut Vec<Change>,
    ) {
        let location = question_location(index);
        self.drop_legacy(q, &location, changes);
        coerce_fields(q, SchemaKind::Question, &location, changes);
        resolve_text_answer(q, &location, changes);

        let id = ContentId::sequential(index + 1).to_json();
        match q.get("id") {
            Some(existing) if *existing == id => {}
            Some(existing) => {
                let was = existing.to_string();
                q.insert("id".to_string(), id.clone());
                changes.push(Change::new(&location, format!("renumbered id {was} to {id}")));
            }
            None => {
                q.insert("id".to_string(), id.clone());
                changes.push(Change::new(&location, format!("added id {id}")));
            }
        }

        fill_defaults(q, SchemaKind::Question, ctx, &location, changes);
        changes.extend(sync_mirrors(q, SchemaKind::Question, &location));
    }

    fn normalize_lessons(&self, doc: &mut Value, changes: &mut Vec<Change>) {
        if doc.is_object() {
            let lesson = std::mem::take(doc);
            *doc = Value::Array(vec![lesson]);
            changes.push(Change::new("", "wrapped single lesson object in a list"));
        }
        let Some(lessons) = doc.as_array_mut() else {
            return;
        };

        for (i, lesson) in lessons.iter_mut().enumerate() {
            if let Value::Object(obj) = lesson {
                let location = lesson_location(i);
                self.drop_legacy(obj, &location, changes);
                coerce_fields(obj, SchemaKind::Lesson, &location, changes);
            }
        }

        self.canonicalize_orders(lessons, changes);

        for (i, lesson) in lessons.iter_mut().enumerate() {
            let Value::Object(obj) = lesson else {
                continue;
            };
            let location = lesson_location(i);

            let order = obj.get("order").and_then(Value::as_u64).unwrap_or(i as u64 + 1);
            let canonical_id = ContentId::sequential(order as usize).to_json();
            let keep = obj
                .get("id")
                .and_then(ContentId::from_json)
                .is_some_and(|id| !id.as_str().trim().is_empty() && id.as_number().is_none());
            if !keep && obj.get("id") != Some(&canonical_id) {
                let was = obj.get("id").map(Value::to_string);
                obj.insert("id".to_string(), canonical_id.clone());
                let description = match was {
                    Some(was) => format!("set id {was} to {canonical_id}"),
                    None => format!("added id {canonical_id}"),
                };
                changes.push(Change::new(&location, description));
            }

            let slug = obj
                .get("moduleSlug")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| self.default_slug().map(str::to_string));
            let ctx = Context { slug: slug.as_deref(), position: order as usize };
            fill_defaults(obj, SchemaKind::Lesson, &ctx, &location, changes);
        }
    }

    /// Assign `order` = 1..=n per module, sorting lessons with an integer
    /// order by that order, then the rest by position.
    fn canonicalize_orders(&self, lessons: &mut [Value], changes: &mut Vec<Change>) {
        let mut modules: Vec<(String, Vec<(Option<i64>, usize)>)> = Vec::new();
        for (i, lesson) in lessons.iter().enumerate() {
            let Some(obj) = lesson.as_object() else {
                continue;
            };
            let slug = obj
                .get("moduleSlug")
                .and_then(Value::as_str)
                .or_else(|| self.default_slug())
                .unwrap_or("")
                .to_string();
            let order = obj.get("order").and_then(Value::as_i64);
            match modules.iter_mut().find(|(s, _)| *s == slug) {
                Some((_, entries)) => entries.push((order, i)),
                None => modules.push((slug, vec![(order, i)])),
            }
        }

        for (_, mut entries) in modules {
            entries.sort_by_key(|(order, pos)| (order.is_none(), order.unwrap_or(0), *pos));
            for (rank, (_, pos)) in entries.into_iter().enumerate() {
                let Some(obj) = lessons[pos].as_object_mut() else {
                    continue;
                };
                let order = json!(rank + 1);
                match obj.get("order") {
                    Some(existing) if *existing == order => {}
                    Some(existing) => {
                        let was = existing.to_string();
                        obj.insert("order".to_string(), order.clone());
                        changes.push(Change::new(lesson_location(pos), format!("set order to {order} (was {was})")));
                    }
                    None => {
                        obj.insert("order".to_string(), order.clone());
                        changes.push(Change::new(lesson_location(pos), format!("added order {order}")));
                    }
                }
            }
        }
    }
}

/// Normalize with default options.
pub fn normalize(doc: &Value, kind: ContentKind) -> Normalized {
    Normalizer::default().normalize(doc, kind)
}

/// Remove a key without disturbing the order of the others.
fn remove_key(obj: &mut Map<String, Value>, key: &str) -> Option<Value> {
    if !obj.contains_key(key) {
        return None;
    }
    let mut removed = None;
    let entries = std::mem::take(obj);
    for (k, v) in entries {
        if k == key {
            removed = Some(v);
        } else {
            obj.insert(k, v);
        }
    }
    removed
}

/// Integer fields given as numeric strings, and difficulty spellings.
fn coerce_fields(obj: &mut Map<String, Value>, kind: SchemaKind, location: &str, changes: &mut Vec<Change>) {
    for spec in registry::fields(kind) {
        let Some(Value::String(text)) = obj.get(spec.name) else {
            continue;
        };
        let replacement = match spec.ty {
            FieldType::Integer => text.trim().parse::<i64>().ok().map(|n| json!(n)),
            FieldType::OneOf(names) if names == Difficulty::NAMES => Difficulty::parse_lenient(text)
                .filter(|d| d.as_str() != text.as_str())
                .map(|d| json!(d.as_str())),
            _ => None,
        };
        if let Some(value) = replacement {
            let description = format!("converted '{}' from \"{text}\" to {value}", spec.name);
            obj.insert(spec.name.to_string(), value);
            changes.push(Change::new(location, description));
        }
    }
}

/// Replace a textual `correctAnswer` by the index it unambiguously names.
/// Only choice-based questions carry an index answer.
fn resolve_text_answer(q: &mut Map<String, Value>, location: &str, changes: &mut Vec<Change>) {
    if !crate::quiz::effective_type(q).is_some_and(|t| t.is_choice_based()) {
        return;
    }
    let Some(raw) = q.get("correctAnswer").filter(|v| v.is_string()) else {
        return;
    };
    let Some(choices) = q
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|items| items.iter().map(|c| c.as_str().map(str::to_string)).collect::<Option<Vec<_>>>())
    else {
        return;
    };
    if let AnswerResolution::Index { index, rule } = resolve_answer(raw, &choices) {
        if rule == MatchRule::Index {
            return;
        }
        let description = format!("resolved correctAnswer {raw} to index {index}");
        q.insert("correctAnswer".to_string(), json!(index));
        changes.push(Change::new(location, description));
    }
}

fn level_tag(obj: &Map<String, Value>) -> Option<Difficulty> {
    obj.get("tags")?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .find_map(Difficulty::parse_lenient)
}

fn topic_tag(obj: &Map<String, Value>) -> Option<String> {
    obj.get("tags")?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .find(|t| !t.trim().is_empty() && Difficulty::parse_lenient(t).is_none())
        .map(str::to_string)
}

fn derive(derivation: Derivation, obj: &Map<String, Value>, ctx: &Context<'_>) -> Option<Value> {
    let title = || ctx.slug.map(|s| ModuleSlug::new(s).title_case());
    match derivation {
        Derivation::LessonId | Derivation::SequentialId | Derivation::Position => None,
        Derivation::ModuleSlug => ctx.slug.map(|s| json!(s)),
        Derivation::LessonTitle => Some(json!(format!("Lesson {}", ctx.position))),
        Derivation::QuizTitle => title().map(|t| json!(format!("{t} Assessment"))),
        Derivation::QuizDescription => ctx.slug.map(|s| {
            json!(format!("Comprehensive assessment covering key concepts from the {s} module"))
        }),
        Derivation::QuestionCount => obj.get("questions").and_then(Value::as_array).map(|q| json!(q.len())),
        Derivation::Topic => Some(json!(topic_tag(obj)
            .or_else(title)
            .unwrap_or_else(|| FALLBACK_TOPIC.to_string()))),
        Derivation::Difficulty => Some(json!(level_tag(obj).unwrap_or(Difficulty::Beginner).as_str())),
        Derivation::QuestionType => {
            let choices = obj.get("choices").filter(|v| !v.is_null());
            let has_answer = obj.get("correctAnswer").is_some_and(|v| !v.is_null());
            match choices {
                None => Some(json!("open-ended")),
                Some(Value::Array(items)) if items.is_empty() => Some(json!("open-ended")),
                Some(Value::Array(items)) if has_answer && items.iter().all(Value::is_string) => {
                    Some(json!("multiple-choice"))
                }
                _ => None,
            }
        }
        Derivation::Record(kind) => {
            let record: Map<String, Value> = registry::fields(kind)
                .iter()
                .filter_map(|spec| fixed_default(spec.default).map(|v| (spec.name.to_string(), v)))
                .collect();
            Some(Value::Object(record))
        }
    }
}

fn fixed_default(default: DefaultValue) -> Option<Value> {
    match default {
        DefaultValue::None | DefaultValue::Derived(_) => None,
        DefaultValue::Text(s) => Some(json!(s)),
        DefaultValue::Integer(n) => Some(json!(n)),
        DefaultValue::EmptyList => Some(json!([])),
    }
}

/// Insert registry defaults for absent fields of `obj`, then recurse into
/// nested records.
fn fill_defaults(
    obj: &mut Map<String, Value>,
    kind: SchemaKind,
    ctx: &Context<'_>,
    location: &str,
    changes: &mut Vec<Change>,
) {
    for spec in registry::fields(kind) {
        let current = obj.get(spec.name);
        if current.is_some_and(|v| !v.is_null()) {
            continue;
        }
        let was_null = current.is_some();
        let value = match spec.default {
            DefaultValue::Derived(d) => derive(d, obj, ctx),
            other => fixed_default(other),
        };
        let Some(value) = value else {
            continue;
        };
        obj.insert(spec.name.to_string(), value);
        let description = if was_null {
            format!("filled null field '{}'", spec.name)
        } else {
            format!("added missing field '{}'", spec.name)
        };
        changes.push(Change::new(location, description));
    }

    for spec in registry::fields(kind) {
        match (spec.ty, obj.get_mut(spec.name)) {
            (FieldType::Record(nested), Some(Value::Object(inner))) => {
                fill_defaults(inner, nested, ctx, &locate(location, spec.name), changes);
            }
            (FieldType::List(ElementType::Record(nested)), Some(Value::Array(items))) => {
                for (i, item) in items.iter_mut().enumerate() {
                    if let Value::Object(inner) = item {
                        fill_defaults(inner, nested, ctx, &element(location, spec.name, i), changes);
                    }
                }
            }
            _ => {}
        }
    }
}
