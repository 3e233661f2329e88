//! File classification by directory and name convention.

use std::path::Path;

use gca_core::ContentKind;

/// Classify a content file found under `root`.
///
/// The nearest directory named `lessons` or `quizzes` decides, looking no
/// higher than `root` itself. Without one, the `-lesson.json` /
/// `-quiz.json` suffix decides. Anything else is not a content file and
/// yields `None`.
pub fn classify(path: &Path, root: &Path) -> Option<ContentKind> {
    let by_directory = path
        .parent()
        .into_iter()
        .flat_map(Path::ancestors)
        .take_while(|dir| dir.starts_with(root))
        .find_map(|dir| {
            let name = dir.file_name()?.to_str()?;
            ContentKind::all().iter().copied().find(|k| k.directory_name() == name)
        });
    by_directory.or_else(|| {
        let name = path.file_name()?.to_str()?;
        ContentKind::all().iter().copied().find(|k| name.ends_with(k.file_suffix()))
    })
}

/// Returns true for `*.json` files.
pub fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}
