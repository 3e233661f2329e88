//! # Schema Registry
//!
//! Static description of every document shape the toolchain validates:
//! for each [`SchemaKind`], the fields it carries, the shape each field
//! must have, whether it is required, and the default the normalizer may
//! insert when it is absent.
//!
//! The tables are `const` data. Nothing mutates them at runtime; validators
//! and the normalizer only look fields up.
//!
//! Field-name aliases (`correctIndex`, `items`, ...) are registered here as
//! well so that every consumer agrees on which name is canonical.

use serde::{Deserialize, Serialize};

use gca_core::{Difficulty, QuestionType};

/// How strictly documents are judged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Accept what the normalizer can repair without human input.
    #[default]
    Lenient,
    /// Additionally enforce canonical cardinalities, contiguous lesson
    /// ordering, parseable dates, and explicit question ids.
    Strict,
}

impl ValidationMode {
    /// Returns true in strict mode.
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// Every object shape known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    /// One teaching unit.
    Lesson,
    /// Quiz wrapper object.
    Quiz,
    /// One assessable item.
    Question,
    /// `code` block of a lesson.
    CodeBlock,
    /// One entry of a lesson's `pitfalls`.
    Pitfall,
    /// One entry of a lesson's `exercises`.
    Exercise,
    /// One entry of a `sources` list.
    Source,
}

impl SchemaKind {
    /// Returns all kinds, documents first.
    pub fn all() -> &'static [SchemaKind] {
        &[
            Self::Lesson,
            Self::Quiz,
            Self::Question,
            Self::CodeBlock,
            Self::Pitfall,
            Self::Exercise,
            Self::Source,
        ]
    }

    /// Returns the snake_case name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lesson => "lesson",
            Self::Quiz => "quiz",
            Self::Question => "question",
            Self::CodeBlock => "code_block",
            Self::Pitfall => "pitfall",
            Self::Exercise => "exercise",
            Self::Source => "source",
        }
    }

    /// Parse the name produced by [`SchemaKind::as_str`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.as_str() == name)
    }
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected shape of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// JSON string.
    String,
    /// JSON integer (floats are rejected even when integral).
    Integer,
    /// JSON boolean.
    Boolean,
    /// Opaque content id: string or integer.
    Identifier,
    /// String drawn from a closed set.
    OneOf(&'static [&'static str]),
    /// Any JSON object.
    Object,
    /// JSON object described by another registry entry.
    Record(SchemaKind),
    /// JSON array whose elements have the given shape.
    List(ElementType),
    /// A single string or a list of strings.
    StringOrStringList,
    /// Answer reference: integer index or the answer text.
    Answer,
    /// Anything, including null.
    Any,
}

/// Shape of list elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    /// Every element is a string.
    String,
    /// Every element is an object described by the registry.
    Record(SchemaKind),
    /// Elements are checked elsewhere.
    Any,
}

impl FieldType {
    /// Human-readable description used in "expected X" messages.
    pub fn describe(&self) -> String {
        match self {
            Self::String => "string".to_string(),
            Self::Integer => "integer".to_string(),
            Self::Boolean => "boolean".to_string(),
            Self::Identifier => "string or integer id".to_string(),
            Self::OneOf(values) => format!("one of {}", values.join(", ")),
            Self::Object => "object".to_string(),
            Self::Record(kind) => format!("{kind} object"),
            Self::List(ElementType::String) => "list of strings".to_string(),
            Self::List(ElementType::Record(kind)) => format!("list of {kind} objects"),
            Self::List(ElementType::Any) => "list".to_string(),
            Self::StringOrStringList => "string or list of strings".to_string(),
            Self::Answer => "integer index or answer text".to_string(),
            Self::Any => "any value".to_string(),
        }
    }
}

/// Whether a field must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// Always required.
    Required,
    /// Required in strict mode, optional otherwise.
    StrictOnly,
    /// Never required.
    Optional,
}

impl Presence {
    /// Whether the field is required under `mode`.
    pub fn is_required(&self, mode: ValidationMode) -> bool {
        match self {
            Self::Required => true,
            Self::StrictOnly => mode.is_strict(),
            Self::Optional => false,
        }
    }
}

/// Default the normalizer inserts for an absent field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    /// No default; an absent required field stays a violation.
    None,
    /// Fixed string.
    Text(&'static str),
    /// Fixed integer.
    Integer(i64),
    /// `[]`.
    EmptyList,
    /// Computed from the document or its file.
    Derived(Derivation),
}

/// Context-dependent defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    /// Lesson id taken from the canonical `order`.
    LessonId,
    /// Question id `"1".."n"` from position in the quiz.
    SequentialId,
    /// Module slug derived from the file name.
    ModuleSlug,
    /// 1-based position in the file (canonicalized per module afterwards).
    Position,
    /// `Lesson N`.
    LessonTitle,
    /// `<Module Title> Assessment`.
    QuizTitle,
    /// Sentence naming the module.
    QuizDescription,
    /// Number of questions in the quiz.
    QuestionCount,
    /// First non-level tag, else the module title, else `General`.
    Topic,
    /// Level tag (`beginner`, ...) if any, else `Beginner`.
    Difficulty,
    /// `multiple-choice` with choices, `open-ended` without.
    QuestionType,
    /// Object assembled from the record's own field defaults.
    Record(SchemaKind),
}

/// Registry entry for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// JSON field name.
    pub name: &'static str,
    /// Expected shape.
    pub ty: FieldType,
    /// Presence rule.
    pub presence: Presence,
    /// Normalizer default.
    pub default: DefaultValue,
}

impl FieldSpec {
    const fn new(name: &'static str, ty: FieldType, presence: Presence) -> Self {
        Self { name, ty, presence, default: DefaultValue::None }
    }

    const fn required(name: &'static str, ty: FieldType) -> Self {
        Self::new(name, ty, Presence::Required)
    }

    const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self::new(name, ty, Presence::Optional)
    }

    const fn strict_only(name: &'static str, ty: FieldType) -> Self {
        Self::new(name, ty, Presence::StrictOnly)
    }

    const fn or(mut self, default: DefaultValue) -> Self {
        self.default = default;
        self
    }

    /// Whether the field is required under `mode`.
    pub fn is_required(&self, mode: ValidationMode) -> bool {
        self.presence.is_required(mode)
    }
}

/// How an alias relates to its canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasPolicy {
    /// The alias is replaced by the canonical name.
    Rename,
    /// The alias stays in the document and is kept equal to the canonical
    /// field. It is never introduced where it was absent.
    Mirror,
}

/// Alternate spelling of a registry field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alias {
    /// Spelling found in some files.
    pub alias: &'static str,
    /// Registry field it stands for.
    pub canonical: &'static str,
    /// Rename or mirror.
    pub policy: AliasPolicy,
}

/// Field removed on request when normalizing.
pub const LEGACY_FIELD: &str = "legacy";

const DIFFICULTIES: FieldType = FieldType::OneOf(Difficulty::NAMES);
const QUESTION_TYPES: FieldType = FieldType::OneOf(QuestionType::NAMES);
const STRINGS: FieldType = FieldType::List(ElementType::String);
const SOURCES: FieldType = FieldType::List(ElementType::Record(SchemaKind::Source));

const LESSON_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("id", FieldType::Identifier).or(DefaultValue::Derived(Derivation::LessonId)),
    FieldSpec::required("moduleSlug", FieldType::String)
        .or(DefaultValue::Derived(Derivation::ModuleSlug)),
    FieldSpec::required("title", FieldType::String)
        .or(DefaultValue::Derived(Derivation::LessonTitle)),
    FieldSpec::required("order", FieldType::Integer).or(DefaultValue::Derived(Derivation::Position)),
    FieldSpec::required("objectives", STRINGS).or(DefaultValue::EmptyList),
    FieldSpec::required("intro", FieldType::String).or(DefaultValue::Text("")),
    FieldSpec::required("code", FieldType::Record(SchemaKind::CodeBlock))
        .or(DefaultValue::Derived(Derivation::Record(SchemaKind::CodeBlock))),
    FieldSpec::required("pitfalls", FieldType::List(ElementType::Record(SchemaKind::Pitfall)))
        .or(DefaultValue::EmptyList),
    FieldSpec::required("exercises", FieldType::List(ElementType::Record(SchemaKind::Exercise)))
        .or(DefaultValue::EmptyList),
    FieldSpec::required("next", FieldType::StringOrStringList).or(DefaultValue::Text("")),
    FieldSpec::required("estimatedMinutes", FieldType::Integer).or(DefaultValue::Integer(30)),
    FieldSpec::required("difficulty", DIFFICULTIES)
        .or(DefaultValue::Derived(Derivation::Difficulty)),
    FieldSpec::required("tags", STRINGS).or(DefaultValue::EmptyList),
    FieldSpec::optional("sources", SOURCES),
    FieldSpec::optional("lastUpdated", FieldType::String),
    FieldSpec::optional("version", FieldType::String),
    FieldSpec::optional("topic", FieldType::String),
    FieldSpec::optional("description", FieldType::String),
    FieldSpec::optional("codeExample", FieldType::Object),
    FieldSpec::optional("output", FieldType::String),
    FieldSpec::optional(LEGACY_FIELD, FieldType::Any),
];

const QUIZ_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("questions", FieldType::List(ElementType::Any)).or(DefaultValue::EmptyList),
    FieldSpec::required("totalQuestions", FieldType::Integer)
        .or(DefaultValue::Derived(Derivation::QuestionCount)),
    FieldSpec::optional("moduleSlug", FieldType::String)
        .or(DefaultValue::Derived(Derivation::ModuleSlug)),
    FieldSpec::optional("title", FieldType::String).or(DefaultValue::Derived(Derivation::QuizTitle)),
    FieldSpec::optional("description", FieldType::String)
        .or(DefaultValue::Derived(Derivation::QuizDescription)),
    FieldSpec::optional("passingScore", FieldType::Integer).or(DefaultValue::Integer(70)),
    FieldSpec::optional("timeLimit", FieldType::Integer).or(DefaultValue::Integer(30)),
    FieldSpec::optional(LEGACY_FIELD, FieldType::Any),
];

const QUESTION_FIELDS: &[FieldSpec] = &[
    FieldSpec::strict_only("id", FieldType::Identifier)
        .or(DefaultValue::Derived(Derivation::SequentialId)),
    FieldSpec::required("question", FieldType::String),
    FieldSpec::optional("topic", FieldType::String).or(DefaultValue::Derived(Derivation::Topic)),
    FieldSpec::optional("difficulty", DIFFICULTIES)
        .or(DefaultValue::Derived(Derivation::Difficulty)),
    FieldSpec::optional("choices", STRINGS),
    FieldSpec::optional("correctAnswer", FieldType::Answer),
    FieldSpec::optional("explanation", FieldType::String).or(DefaultValue::Text("")),
    FieldSpec::optional("industryContext", FieldType::String).or(DefaultValue::Text("")),
    FieldSpec::optional("tags", STRINGS).or(DefaultValue::EmptyList),
    FieldSpec::optional("questionType", QUESTION_TYPES)
        .or(DefaultValue::Derived(Derivation::QuestionType)),
    FieldSpec::optional("estimatedTime", FieldType::Integer).or(DefaultValue::Integer(60)),
    FieldSpec::optional("sources", SOURCES),
    FieldSpec::optional("fixedChoiceOrder", FieldType::Boolean),
    FieldSpec::optional("choiceLabels", FieldType::String),
    FieldSpec::optional(LEGACY_FIELD, FieldType::Any),
];

const CODE_BLOCK_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("example", FieldType::String).or(DefaultValue::Text("")),
    FieldSpec::required("explanation", FieldType::String).or(DefaultValue::Text("")),
    FieldSpec::required("language", FieldType::String).or(DefaultValue::Text("javascript")),
];

const PITFALL_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("mistake", FieldType::String),
    FieldSpec::required("solution", FieldType::String),
    FieldSpec::required("severity", FieldType::String).or(DefaultValue::Text("medium")),
];

const EXERCISE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("title", FieldType::String),
    FieldSpec::required("description", FieldType::String),
    FieldSpec::required("checkpoints", STRINGS).or(DefaultValue::EmptyList),
];

const SOURCE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("title", FieldType::String),
    FieldSpec::required("url", FieldType::String),
];

const QUIZ_ALIASES: &[Alias] = &[
    Alias { alias: "items", canonical: "questions", policy: AliasPolicy::Rename },
    Alias { alias: "questionList", canonical: "questions", policy: AliasPolicy::Rename },
];

const QUESTION_ALIASES: &[Alias] = &[
    Alias { alias: "correctIndex", canonical: "correctAnswer", policy: AliasPolicy::Mirror },
    Alias { alias: "type", canonical: "questionType", policy: AliasPolicy::Mirror },
];

/// All fields of `kind`, in canonical order.
pub fn fields(kind: SchemaKind) -> &'static [FieldSpec] {
    match kind {
        SchemaKind::Lesson => LESSON_FIELDS,
        SchemaKind::Quiz => QUIZ_FIELDS,
        SchemaKind::Question => QUESTION_FIELDS,
        SchemaKind::CodeBlock => CODE_BLOCK_FIELDS,
        SchemaKind::Pitfall => PITFALL_FIELDS,
        SchemaKind::Exercise => EXERCISE_FIELDS,
        SchemaKind::Source => SOURCE_FIELDS,
    }
}

/// Look up one field of `kind`.
pub fn field(kind: SchemaKind, name: &str) -> Option<&'static FieldSpec> {
    fields(kind).iter().find(|f| f.name == name)
}

/// Aliases recognised on objects of `kind`.
pub fn aliases(kind: SchemaKind) -> &'static [Alias] {
    match kind {
        SchemaKind::Quiz => QUIZ_ALIASES,
        SchemaKind::Question => QUESTION_ALIASES,
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_fields() {
        for kind in SchemaKind::all() {
            assert!(!fields(*kind).is_empty(), "{kind} has no fields");
        }
    }

    #[test]
    fn field_names_are_unique_per_kind() {
        for kind in SchemaKind::all() {
            let mut names: Vec<&str> = fields(*kind).iter().map(|f| f.name).collect();
            let before = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(before, names.len(), "duplicate field in {kind}");
        }
    }

    #[test]
    fn lesson_required_fields_match_content_contract() {
        let required: Vec<&str> = fields(SchemaKind::Lesson)
            .iter()
            .filter(|f| f.is_required(ValidationMode::Lenient))
            .map(|f| f.name)
            .collect();
        assert_eq!(
            required,
            [
                "id", "moduleSlug", "title", "order", "objectives", "intro", "code",
                "pitfalls", "exercises", "next", "estimatedMinutes", "difficulty", "tags",
            ]
        );
    }

    #[test]
    fn every_required_lesson_field_has_a_default() {
        for spec in fields(SchemaKind::Lesson) {
            if spec.presence == Presence::Required {
                assert_ne!(spec.default, DefaultValue::None, "{} lacks a default", spec.name);
            }
        }
    }

    #[test]
    fn question_id_is_required_only_when_strict() {
        let id = field(SchemaKind::Question, "id").unwrap();
        assert!(!id.is_required(ValidationMode::Lenient));
        assert!(id.is_required(ValidationMode::Strict));
    }

    #[test]
    fn aliases_point_at_registered_fields() {
        for kind in SchemaKind::all() {
            for alias in aliases(*kind) {
                assert!(field(*kind, alias.canonical).is_some(), "{} -> {}", alias.alias, alias.canonical);
                assert!(field(*kind, alias.alias).is_none(), "alias {} shadows a field", alias.alias);
            }
        }
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in SchemaKind::all() {
            assert_eq!(SchemaKind::from_name(kind.as_str()), Some(*kind));
        }
        assert_eq!(SchemaKind::from_name("module"), None);
    }

    #[test]
    fn describe_names_enum_members() {
        let d = field(SchemaKind::Lesson, "difficulty").unwrap().ty.describe();
        assert_eq!(d, "one of Beginner, Intermediate, Advanced");
        assert_eq!(FieldType::List(ElementType::String).describe(), "list of strings");
    }
}
