//! Dry-run unified diff support for `startercode diff`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use crate::error::io_err;
use crate::pipeline::Plan;
use crate::SyncError;

/// A single rendered file diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Compare every planned file with what is currently on disk.
///
/// Files that would not change are omitted. Missing files diff against
/// empty content. No files are written.
pub fn diff_plan(plan: &Plan) -> Result<Vec<FileDiff>, SyncError> {
    let mut diffs = Vec::new();
    for file in &plan.files {
        let rendered = normalize_line_endings(&file.content);
        let existing = read_existing_or_empty(&file.path)?;
        if existing == rendered {
            continue;
        }

        let relative = file
            .path
            .strip_prefix(&plan.output_root)
            .unwrap_or(file.path.as_path());
        let old_header = format!("a/{}", relative.display());
        let new_header = format!("b/{}", relative.display());
        let unified = TextDiff::from_lines(&existing, &rendered)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string();

        diffs.push(FileDiff {
            path: file.path.clone(),
            unified_diff: unified,
        });
    }
    Ok(diffs)
}

fn read_existing_or_empty(path: &Path) -> Result<String, SyncError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(normalize_line_endings(&content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}

fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}
