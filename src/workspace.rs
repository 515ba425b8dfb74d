// Artifact workspace: write accepted file sets and results to disk
//
// Generated paths come from a model, so every path is checked to stay
// inside the output directory before anything is written.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::info;

use crate::agents::FileSet;

/// Resolve `relative` under `root`, rejecting absolute paths and `..`
pub fn resolve_inside(root: &Path, relative: &str) -> Result<PathBuf> {
    let candidate = Path::new(relative);
    let mut resolved = root.to_path_buf();
    let mut depth = 0usize;

    for component in candidate.components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                bail!("Refusing to write outside the output directory: {relative}");
            }
        }
    }

    if depth == 0 {
        bail!("Empty file path: '{relative}'");
    }
    Ok(resolved)
}

/// Write `content`, creating parent directories and overwriting any existing file
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    write_file(path, &json)
}

/// Write every file of `files` under `root`. Returns the written paths.
///
/// All paths are validated before the first write, so a bad path leaves
/// nothing half-written.
pub fn write_file_set(root: &Path, files: &FileSet) -> Result<Vec<PathBuf>> {
    write_file_sets(root, &[files])
}

/// Write several file sets under one `root`.
///
/// Paths from every set are resolved and checked together before the first
/// write. Two files resolving to the same target is an error rather than a
/// silent overwrite.
pub fn write_file_sets(root: &Path, sets: &[&FileSet]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut targets = Vec::new();
    for file in sets.iter().flat_map(|set| set.files.iter()) {
        let path = resolve_inside(root, &file.path)?;
        if !seen.insert(path.clone()) {
            bail!("Two generated files resolve to the same path: {}", file.path);
        }
        targets.push((path, file.content.as_str()));
    }

    for (path, content) in &targets {
        write_file(path, content)?;
    }

    info!(root = %root.display(), files = targets.len(), "Wrote file set");
    Ok(targets.into_iter().map(|(p, _)| p).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::FileArtifact;

    #[test]
    fn test_write_file_set_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let files = FileSet::new(vec![
            FileArtifact::new("backend/app/main.py", "app = FastAPI()"),
            FileArtifact::new("./backend/requirements.txt", "fastapi"),
        ]);
        let written = write_file_set(dir.path(), &files).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(
            fs::read_to_string(dir.path().join("backend/app/main.py")).unwrap(),
            "app = FastAPI()"
        );
        assert!(dir.path().join("backend/requirements.txt").exists());
    }

    #[test]
    fn test_traversal_rejected_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let files = FileSet::new(vec![
            FileArtifact::new("ok.txt", "fine"),
            FileArtifact::new("../escape.txt", "nope"),
        ]);
        assert!(write_file_set(dir.path(), &files).is_err());
        assert!(!dir.path().join("ok.txt").exists());
    }

    #[test]
    fn test_collision_across_sets_rejected_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileSet::new(vec![
            FileArtifact::new("backend/main.py", "app = FastAPI()"),
            FileArtifact::new("README.txt", "backend notes"),
        ]);
        let frontend = FileSet::new(vec![FileArtifact::new("./README.txt", "frontend notes")]);

        let err = write_file_sets(dir.path(), &[&backend, &frontend]).unwrap_err();
        assert!(err.to_string().contains("README.txt"));
        assert!(!dir.path().join("backend/main.py").exists());
        assert!(!dir.path().join("README.txt").exists());
    }

    #[test]
    fn test_resolve_inside_rejects_absolute_and_empty() {
        let root = Path::new("/out");
        assert!(resolve_inside(root, "/etc/passwd").is_err());
        assert!(resolve_inside(root, "").is_err());
        assert!(resolve_inside(root, "./.").is_err());
        assert_eq!(
            resolve_inside(root, "src/App.tsx").unwrap(),
            PathBuf::from("/out/src/App.tsx")
        );
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/result.json");
        write_json(&path, &serde_json::json!({"status": "success"})).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["status"], "success");
    }
}
