//! # Schema Subcommand
//!
//! Prints the schema registry: every field of every document shape with
//! its type, presence rule and the default the normalizer fills in.

use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::Args;

use gca_schema::registry::{self, AliasPolicy, DefaultValue, Derivation, FieldSpec, Presence};
use gca_schema::SchemaKind;

/// Arguments for the `gca schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Shape to print (lesson, quiz, question, code_block, pitfall,
    /// exercise, source). All shapes when omitted.
    #[arg(value_name = "KIND")]
    pub kind: Option<String>,
}

/// Execute the schema subcommand.
pub fn run_schema(args: &SchemaArgs) -> Result<u8> {
    run_schema_to(args, &mut std::io::stdout().lock())
}

/// Like [`run_schema`], writing to `out`.
pub fn run_schema_to(args: &SchemaArgs, out: &mut impl Write) -> Result<u8> {
    let kinds: Vec<SchemaKind> = match args.kind.as_deref() {
        None => SchemaKind::all().to_vec(),
        Some(name) => match SchemaKind::from_name(name) {
            Some(kind) => vec![kind],
            None => {
                let known: Vec<&str> = SchemaKind::all().iter().map(SchemaKind::as_str).collect();
                bail!("unknown schema kind {name:?}: expected one of {}", known.join(", "));
            }
        },
    };

    for (i, kind) in kinds.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        write_kind(*kind, out).context("failed to write schema")?;
    }
    Ok(0)
}

fn write_kind(kind: SchemaKind, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{kind}")?;
    for spec in registry::fields(kind) {
        write_field(spec, out)?;
    }
    let aliases = registry::aliases(kind);
    if !aliases.is_empty() {
        writeln!(out, "  aliases:")?;
        for alias in aliases {
            let policy = match alias.policy {
                AliasPolicy::Rename => "renamed",
                AliasPolicy::Mirror => "mirrored",
            };
            writeln!(out, "    {} -> {} ({policy})", alias.alias, alias.canonical)?;
        }
    }
    Ok(())
}

fn write_field(spec: &FieldSpec, out: &mut impl Write) -> std::io::Result<()> {
    let presence = match spec.presence {
        Presence::Required => "required",
        Presence::StrictOnly => "strict",
        Presence::Optional => "optional",
    };
    write!(out, "  {:<18} {:<9} {}", spec.name, presence, spec.ty.describe())?;
    match describe_default(spec.default) {
        Some(default) => writeln!(out, "  [default: {default}]"),
        None => writeln!(out),
    }
}

fn describe_default(default: DefaultValue) -> Option<String> {
    let text = match default {
        DefaultValue::None => return None,
        DefaultValue::Text(s) => format!("{s:?}"),
        DefaultValue::Integer(n) => n.to_string(),
        DefaultValue::EmptyList => "[]".to_string(),
        DefaultValue::Derived(derivation) => match derivation {
            Derivation::LessonId => "lesson order".to_string(),
            Derivation::SequentialId => "position in quiz".to_string(),
            Derivation::ModuleSlug => "file name".to_string(),
            Derivation::Position => "position in file".to_string(),
            Derivation::LessonTitle => "\"Lesson N\"".to_string(),
            Derivation::QuizTitle => "\"<Module> Assessment\"".to_string(),
            Derivation::QuizDescription => "module sentence".to_string(),
            Derivation::QuestionCount => "number of questions".to_string(),
            Derivation::Topic => "first topic tag, module title or \"General\"".to_string(),
            Derivation::Difficulty => "level tag or \"Beginner\"".to_string(),
            Derivation::QuestionType => "from choices".to_string(),
            Derivation::Record(kind) => format!("{kind} defaults"),
        },
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(kind: Option<&str>) -> Result<String> {
        let mut buf = Vec::new();
        run_schema_to(&SchemaArgs { kind: kind.map(String::from) }, &mut buf)?;
        Ok(String::from_utf8(buf).unwrap())
    }

    #[test]
    fn prints_one_kind() {
        let text = render(Some("question")).unwrap();
        assert!(text.starts_with("question\n"));
        assert!(text.contains("correctAnswer"));
        assert!(text.contains("integer index or answer text"));
        assert!(text.contains("correctIndex -> correctAnswer (mirrored)"));
        assert!(!text.contains("\nlesson\n"));
    }

    #[test]
    fn id_is_strict_only_for_questions() {
        let text = render(Some("question")).unwrap();
        let id_line = text.lines().find(|l| l.trim_start().starts_with("id ")).unwrap();
        assert!(id_line.contains("strict"));
        assert!(id_line.contains("[default: position in quiz]"));
    }

    #[test]
    fn prints_every_kind_by_default() {
        let text = render(None).unwrap();
        for kind in SchemaKind::all() {
            assert!(text.lines().any(|l| l == kind.as_str()), "missing {kind}");
        }
        assert!(text.contains("[default: 70]"));
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let err = render(Some("module")).unwrap_err();
        assert!(err.to_string().contains("expected one of lesson, quiz"));
    }
}
