//! Local file system project detection
//!
//! Looks at the marker files in one directory to decide the project kind,
//! lists the well-known files that are present, and renders the preamble
//! that goes ahead of a session's first prompt.

use pilot_application::ProjectInfoProvider;
use pilot_domain::context::KEY_FILES;
use pilot_domain::{ProjectContext, ProjectKind, ProjectSummary};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Project info read from a directory on disk.
///
/// Detection runs on every call, so files created during a session show up
/// in the next session's preamble.
#[derive(Debug, Clone)]
pub struct LocalProjectInfo {
    root: PathBuf,
}

impl LocalProjectInfo {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Inspect the directory and summarize it.
    ///
    /// Returns `None` when the root is not a readable directory.
    pub fn summarize(&self) -> Option<ProjectSummary> {
        let root = match std::fs::canonicalize(&self.root) {
            Ok(root) if root.is_dir() => root,
            Ok(root) => {
                warn!("Project root is not a directory: {}", root.display());
                return None;
            }
            Err(e) => {
                warn!("Cannot resolve project root {}: {}", self.root.display(), e);
                return None;
            }
        };

        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        let kind = ProjectKind::detect(|marker| root.join(marker).exists());
        let key_files: Vec<String> = KEY_FILES
            .iter()
            .filter(|file| root.join(file).exists())
            .map(|file| file.to_string())
            .collect();
        debug!(
            "Detected {} project '{}' with {} key files",
            kind,
            name,
            key_files.len()
        );

        Some(
            ProjectSummary::new(name, kind)
                .with_root(root)
                .with_key_files(key_files),
        )
    }
}

impl ProjectInfoProvider for LocalProjectInfo {
    fn project_context(&self) -> ProjectContext {
        self.summarize()
            .map(ProjectSummary::into_context)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_detects_rust_project_and_key_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Cargo.toml"), "[package]\n").unwrap();
        fs::write(dir.path().join("README.md"), "# demo\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a key file").unwrap();

        let summary = LocalProjectInfo::new(dir.path()).summarize().unwrap();
        assert_eq!(summary.kind, ProjectKind::Rust);
        assert_eq!(summary.key_files, vec!["README.md", "Cargo.toml"]);
    }

    #[test]
    fn test_maven_wins_over_node() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();

        let summary = LocalProjectInfo::new(dir.path()).summarize().unwrap();
        assert_eq!(summary.kind, ProjectKind::Maven);
    }

    #[test]
    fn test_context_carries_root_and_preamble() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("go.mod"), "module demo\n").unwrap();

        let context = LocalProjectInfo::new(dir.path()).project_context();
        let root = fs::canonicalize(dir.path()).unwrap();
        assert_eq!(context.root(), Some(root.as_path()));
        assert!(context.preamble().starts_with("=== Project Context ===\n"));
        assert!(context.preamble().contains("Project Type: Go\n"));
        assert!(context.preamble().contains("Key Files: go.mod\n"));
        assert!(context.preamble().contains(&format!("Project Path: {}\n", root.display())));
    }

    #[test]
    fn test_empty_directory_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let summary = LocalProjectInfo::new(dir.path()).summarize().unwrap();
        assert_eq!(summary.kind, ProjectKind::Unknown);
        assert!(summary.key_files.is_empty());
    }

    #[test]
    fn test_missing_root_gives_empty_context() {
        let dir = tempfile::tempdir().unwrap();
        let info = LocalProjectInfo::new(dir.path().join("gone"));
        assert_eq!(info.project_context(), ProjectContext::empty());
    }
}
