//! End-to-end runs of `gca validate` against temporary content trees.

use std::fs;
use std::path::Path;

use gca_cli::config::OutputFormat;
use gca_cli::validate::{run_validate_to, ValidateArgs};

const BROKEN_QUIZ: &str =
    r#"{"questions":[{"question":"Q1","choices":["A","B"],"correctIndex":1}]}"#;

const VALID_QUIZ: &str = r#"{
  "totalQuestions": 1,
  "questions": [
    {"id": "1", "question": "Capital of France?", "choices": ["Paris", "London", "Berlin", "Rome"], "correctAnswer": 0}
  ]
}"#;

fn tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let quizzes = dir.path().join("quizzes");
    fs::create_dir_all(&quizzes).unwrap();
    fs::write(quizzes.join("web-fundamentals-quiz.json"), BROKEN_QUIZ).unwrap();
    fs::write(quizzes.join("geography.json"), VALID_QUIZ).unwrap();
    dir
}

fn args(root: &Path) -> ValidateArgs {
    ValidateArgs {
        root: root.to_path_buf(),
        apply: false,
        strict: false,
        remove_legacy: false,
        format: None,
        exclude: Vec::new(),
    }
}

fn run(args: &ValidateArgs, config: Option<&Path>) -> (u8, String) {
    let mut out = Vec::new();
    let code = run_validate_to(args, config, &mut out).unwrap();
    (code, String::from_utf8(out).unwrap())
}

#[test]
fn dry_run_reports_and_fails() {
    let dir = tree();
    let (code, text) = run(&args(dir.path()), None);
    assert_eq!(code, 1);
    assert!(text.contains("❌ quizzes/web-fundamentals-quiz.json"));
    assert!(text.contains("   - missing field: totalQuestions"));
    assert!(text.contains("   ~ would apply: "));
    assert!(text.contains("✅ quizzes/geography.json"));
    assert!(text.contains("  Invalid:       1"));
    assert!(text.contains("Run with --apply"));

    let on_disk = fs::read_to_string(dir.path().join("quizzes/web-fundamentals-quiz.json")).unwrap();
    assert_eq!(on_disk, BROKEN_QUIZ);
}

#[test]
fn apply_fixes_and_succeeds() {
    let dir = tree();
    let mut a = args(dir.path());
    a.apply = true;
    let (code, text) = run(&a, None);
    assert_eq!(code, 0);
    assert!(text.contains("✅ quizzes/web-fundamentals-quiz.json (updated)"));
    assert!(text.contains("   + fixed: missing field: totalQuestions"));
    assert!(text.contains("  Fixed:         1"));

    let (code, text) = run(&a, None);
    assert_eq!(code, 0);
    assert!(!text.contains("(updated)"));
}

#[test]
fn config_file_in_root_is_honoured() {
    let dir = tree();
    fs::write(dir.path().join("gca.yaml"), "format: json\nexclude: [web-fundamentals]\n").unwrap();
    let (code, text) = run(&args(dir.path()), None);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["summary"]["total"], 1);
    assert_eq!(json["summary"]["skipped"], 1);
}

#[test]
fn flags_override_config_format() {
    let dir = tree();
    let config = dir.path().join("ci.yaml");
    fs::write(&config, "format: json\n").unwrap();
    let mut a = args(dir.path());
    a.format = Some(OutputFormat::Text);
    let (_, text) = run(&a, Some(&config));
    assert!(text.contains("Validation Summary:"));
}

#[test]
fn strict_flag_adds_violations() {
    let dir = tempfile::tempdir().unwrap();
    let quizzes = dir.path().join("quizzes");
    fs::create_dir_all(&quizzes).unwrap();
    fs::write(
        quizzes.join("short.json"),
        r#"{"totalQuestions":1,"questions":[{"question":"Q","choices":["A","B","C"],"correctAnswer":0}]}"#,
    )
    .unwrap();

    let (code, _) = run(&args(dir.path()), None);
    assert_eq!(code, 0);

    let mut a = args(dir.path());
    a.strict = true;
    let (code, text) = run(&a, None);
    assert_eq!(code, 1);
    assert!(text.contains("missing field: id"));
    assert!(text.contains("must have exactly 4 choices, got 3"));
}

#[test]
fn bad_config_is_an_error() {
    let dir = tree();
    fs::write(dir.path().join("gca.yaml"), "unknown_key: 1\n").unwrap();
    let mut out = Vec::new();
    let err = run_validate_to(&args(dir.path()), None, &mut out).unwrap_err();
    assert!(format!("{err:#}").contains("unknown_key"));
}
