//! Report rendering for `gca validate`.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use gca_schema::{BatchReport, FileReport};

use crate::config::OutputFormat;

/// Write `report` to `out` in the chosen format.
pub fn write_report(report: &BatchReport, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(report, out).context("failed to write report"),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report).context("failed to serialize report")?;
            writeln!(out).context("failed to write report")
        }
    }
}

fn write_text(report: &BatchReport, out: &mut impl Write) -> std::io::Result<()> {
    for file in &report.files {
        write_file(&report.root, file, report.apply, out)?;
    }
    if !report.files.is_empty() {
        writeln!(out)?;
    }

    let summary = &report.summary;
    writeln!(out, "Validation Summary:")?;
    writeln!(out, "  Files checked: {}", summary.total)?;
    writeln!(out, "  Valid:         {}", summary.valid)?;
    writeln!(out, "  Invalid:       {}", summary.invalid)?;
    if report.apply {
        writeln!(out, "  Fixed:         {}", summary.fixed)?;
    }
    writeln!(out, "  Skipped:       {}", summary.skipped)?;
    let pending = report.files.iter().any(|f| !f.changes.is_empty());
    if !report.apply && (!report.is_success() || pending) {
        writeln!(out, "\nRun with --apply to write fixes.")?;
    }
    Ok(())
}

fn write_file(root: &Path, file: &FileReport, apply: bool, out: &mut impl Write) -> std::io::Result<()> {
    let shown = file.path.strip_prefix(root).unwrap_or(&file.path);
    let mark = if file.is_valid() { "✅" } else { "❌" };
    if file.written {
        writeln!(out, "{mark} {} (updated)", shown.display())?;
    } else {
        writeln!(out, "{mark} {}", shown.display())?;
    }
    if apply {
        for violation in file.violations.iter().filter(|v| !file.remaining.violations().contains(v)) {
            writeln!(out, "   + fixed: {violation}")?;
        }
        for change in &file.changes {
            writeln!(out, "   ~ {change}")?;
        }
    } else {
        for change in &file.changes {
            writeln!(out, "   ~ would apply: {change}")?;
        }
    }
    for violation in file.remaining.iter() {
        writeln!(out, "   - {violation}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use gca_core::ContentKind;
    use gca_schema::{Change, ValidationMode, ValidationViolations, Violation, ViolationKind};

    use super::*;

    fn sample(apply: bool) -> BatchReport {
        let missing = Violation::missing_field("", "totalQuestions");
        let bad = FileReport {
            path: PathBuf::from("/content/quizzes/web-quiz.json"),
            kind: Some(ContentKind::Quiz),
            violations: ValidationViolations::new(vec![missing.clone()]),
            changes: Vec::new(),
            remaining: ValidationViolations::new(vec![missing]),
            written: false,
        };
        let no_tags = Violation::missing_field("Lesson 1", "tags");
        let good = FileReport {
            path: PathBuf::from("/content/lessons/react.json"),
            kind: Some(ContentKind::Lesson),
            violations: ValidationViolations::new(vec![no_tags.clone()]),
            changes: vec![Change::new("Lesson 1", "added missing field 'tags'")],
            remaining: if apply { ValidationViolations::default() } else { ValidationViolations::new(vec![no_tags]) },
            written: apply,
        };
        BatchReport::new(
            PathBuf::from("/content"),
            apply,
            ValidationMode::Lenient,
            vec![good, bad],
            vec![PathBuf::from("/content/package.json")],
        )
    }

    fn render(report: &BatchReport, format: OutputFormat) -> String {
        let mut buf = Vec::new();
        write_report(report, format, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn text_report_marks_files_and_lists_problems() {
        let text = render(&sample(true), OutputFormat::Text);
        assert!(text.contains("✅ lessons/react.json (updated)"));
        assert!(text.contains("   + fixed: Lesson 1: missing field: tags"));
        assert!(text.contains("   ~ Lesson 1: added missing field 'tags'"));
        assert!(text.contains("❌ quizzes/web-quiz.json"));
        assert!(text.contains("   - missing field: totalQuestions"));
        assert!(!text.contains("+ fixed: missing field: totalQuestions"));
        assert!(text.contains("Validation Summary:"));
        assert!(text.contains("  Files checked: 2"));
        assert!(text.contains("  Fixed:         1"));
        assert!(text.contains("  Skipped:       1"));
        assert!(!text.contains("--apply"));
    }

    #[test]
    fn dry_run_hints_at_apply() {
        let text = render(&sample(false), OutputFormat::Text);
        assert!(!text.contains("Fixed:"));
        assert!(!text.contains("+ fixed"));
        assert!(text.contains("❌ lessons/react.json\n"));
        assert!(text.contains("   ~ would apply: Lesson 1: added missing field 'tags'"));
        assert!(text.contains("   - Lesson 1: missing field: tags"));
        assert!(text.contains("Run with --apply"));
    }

    #[test]
    fn dry_run_with_only_pending_edits_still_hints_at_apply() {
        let tidy = FileReport {
            path: PathBuf::from("/content/quizzes/css-quiz.json"),
            kind: Some(ContentKind::Quiz),
            violations: ValidationViolations::default(),
            changes: vec![Change::new("Question 1", "renumbered id \"4\" to \"1\"")],
            remaining: ValidationViolations::default(),
            written: false,
        };
        let report = BatchReport::new(PathBuf::from("/content"), false, ValidationMode::Lenient, vec![tidy], vec![]);
        assert!(report.is_success());
        let text = render(&report, OutputFormat::Text);
        assert!(text.contains("✅ quizzes/css-quiz.json\n   ~ would apply: Question 1: renumbered id \"4\" to \"1\""));
        assert!(text.contains("Run with --apply"));
    }

    #[test]
    fn json_report_carries_summary_and_violations() {
        let json: serde_json::Value =
            serde_json::from_str(&render(&sample(false), OutputFormat::Json)).unwrap();
        assert_eq!(json["summary"]["total"], 2);
        assert_eq!(json["summary"]["invalid"], 2);
        assert_eq!(json["mode"], "lenient");
        assert_eq!(json["files"][1]["remaining"][0]["kind"], "missing_field");
        assert_eq!(json["files"][1]["remaining"][0]["message"], "missing field: totalQuestions");
    }
}
