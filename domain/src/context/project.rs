//! Project context prepended to the first prompt of a session.
//!
//! The agent starts without any knowledge of the host project, so the first
//! prompt of every session carries a short preamble describing it:
//!
//! ```
//! use pilot_domain::context::{ProjectKind, ProjectSummary};
//!
//! let summary = ProjectSummary::new("demo", ProjectKind::Rust)
//!     .with_root("/work/demo")
//!     .with_key_files(vec!["Cargo.toml".to_string()]);
//!
//! let preamble = summary.render_preamble();
//! assert!(preamble.starts_with("=== Project Context ==="));
//! assert!(preamble.contains("Key Files: Cargo.toml"));
//! ```

use crate::core::error::DomainError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Files listed under "Key Files" when present in the project root.
pub const KEY_FILES: &[&str] = &[
    "README.md",
    "README.txt",
    "package.json",
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "Cargo.toml",
    "go.mod",
    "requirements.txt",
    "Gemfile",
    ".gitignore",
    "Dockerfile",
];

/// Build system / ecosystem of a project, detected from marker files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProjectKind {
    Maven,
    Gradle,
    NodeJs,
    Rust,
    Go,
    Python,
    Ruby,
    #[default]
    Unknown,
}

impl ProjectKind {
    /// Detection order; the first kind with any marker present wins.
    pub fn detection_order() -> &'static [ProjectKind] {
        &[
            ProjectKind::Maven,
            ProjectKind::Gradle,
            ProjectKind::NodeJs,
            ProjectKind::Rust,
            ProjectKind::Go,
            ProjectKind::Python,
            ProjectKind::Ruby,
        ]
    }

    /// Marker files that identify this kind.
    pub fn marker_files(&self) -> &'static [&'static str] {
        match self {
            ProjectKind::Maven => &["pom.xml"],
            ProjectKind::Gradle => &["build.gradle", "build.gradle.kts"],
            ProjectKind::NodeJs => &["package.json"],
            ProjectKind::Rust => &["Cargo.toml"],
            ProjectKind::Go => &["go.mod"],
            ProjectKind::Python => &["requirements.txt"],
            ProjectKind::Ruby => &["Gemfile"],
            ProjectKind::Unknown => &[],
        }
    }

    /// Detect the kind from a predicate telling whether a marker exists.
    pub fn detect(mut exists: impl FnMut(&str) -> bool) -> Self {
        ProjectKind::detection_order()
            .iter()
            .copied()
            .find(|kind| kind.marker_files().iter().any(|marker| exists(marker)))
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectKind::Maven => "Maven",
            ProjectKind::Gradle => "Gradle",
            ProjectKind::NodeJs => "Node.js",
            ProjectKind::Rust => "Rust",
            ProjectKind::Go => "Go",
            ProjectKind::Python => "Python",
            ProjectKind::Ruby => "Ruby",
            ProjectKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "maven" => Ok(ProjectKind::Maven),
            "gradle" => Ok(ProjectKind::Gradle),
            "node.js" | "nodejs" | "node" => Ok(ProjectKind::NodeJs),
            "rust" => Ok(ProjectKind::Rust),
            "go" => Ok(ProjectKind::Go),
            "python" => Ok(ProjectKind::Python),
            "ruby" => Ok(ProjectKind::Ruby),
            "unknown" => Ok(ProjectKind::Unknown),
            _ => Err(DomainError::UnknownProjectKind(s.to_string())),
        }
    }
}

/// What is known about the host project (Value Object).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub name: String,
    pub kind: ProjectKind,
    pub root: Option<PathBuf>,
    pub key_files: Vec<String>,
}

impl ProjectSummary {
    pub fn new(name: impl Into<String>, kind: ProjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            root: None,
            key_files: Vec::new(),
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_key_files(mut self, key_files: Vec<String>) -> Self {
        self.key_files = key_files;
        self
    }

    /// Render the preamble block sent ahead of the first prompt.
    pub fn render_preamble(&self) -> String {
        let mut out = String::from("=== Project Context ===\n");
        out.push_str(&format!("Project Name: {}\n", self.name));
        out.push_str(&format!("Project Type: {}\n", self.kind));

        if let Some(root) = &self.root {
            out.push_str(&format!("Project Path: {}\n", root.display()));
            if !self.key_files.is_empty() {
                out.push_str(&format!("Key Files: {}\n", self.key_files.join(", ")));
            }
        }

        out.push_str("======================\n\n");
        out
    }

    pub fn into_context(self) -> ProjectContext {
        let preamble = self.render_preamble();
        ProjectContext {
            root: self.root,
            preamble,
        }
    }
}

/// Project root plus the pre-formatted preamble (Value Object).
///
/// The session layer treats `preamble` as opaque text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectContext {
    root: Option<PathBuf>,
    preamble: String,
}

impl ProjectContext {
    pub fn new(root: Option<PathBuf>, preamble: impl Into<String>) -> Self {
        Self {
            root,
            preamble: preamble.into(),
        }
    }

    /// A context with neither root nor preamble.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// Drop the preamble but keep the root (used when context injection is off).
    pub fn without_preamble(self) -> Self {
        Self {
            root: self.root,
            preamble: String::new(),
        }
    }

    /// Prefix `prompt` with the preamble when there is one.
    pub fn enhance_prompt(&self, prompt: &str) -> String {
        if self.preamble.trim().is_empty() {
            prompt.to_string()
        } else {
            format!("{}\n\n{}", self.preamble, prompt)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_follows_priority_order() {
        let kind = ProjectKind::detect(|f| f == "package.json" || f == "Cargo.toml");
        assert_eq!(kind, ProjectKind::NodeJs);

        let gradle = ProjectKind::detect(|f| f == "build.gradle.kts");
        assert_eq!(gradle, ProjectKind::Gradle);

        assert_eq!(ProjectKind::detect(|_| false), ProjectKind::Unknown);
    }

    #[test]
    fn test_preamble_without_root_omits_path_and_key_files() {
        let preamble = ProjectSummary::new("demo", ProjectKind::Unknown)
            .with_key_files(vec!["README.md".to_string()])
            .render_preamble();
        assert_eq!(
            preamble,
            "=== Project Context ===\nProject Name: demo\nProject Type: Unknown\n======================\n\n"
        );
    }

    #[test]
    fn test_preamble_with_root_lists_key_files() {
        let preamble = ProjectSummary::new("demo", ProjectKind::Go)
            .with_root("/src/demo")
            .with_key_files(vec!["go.mod".to_string(), "README.md".to_string()])
            .render_preamble();
        assert!(preamble.contains("Project Type: Go\n"));
        assert!(preamble.contains("Project Path: /src/demo\n"));
        assert!(preamble.contains("Key Files: go.mod, README.md\n"));
    }

    #[test]
    fn test_enhance_prompt_prefixes_non_blank_preamble() {
        let context = ProjectContext::new(None, "CTX");
        assert_eq!(context.enhance_prompt("fix bug"), "CTX\n\nfix bug");
    }

    #[test]
    fn test_enhance_prompt_passes_through_blank_preamble() {
        assert_eq!(ProjectContext::empty().enhance_prompt("fix bug"), "fix bug");
        assert_eq!(
            ProjectContext::new(None, "  \n").enhance_prompt("fix bug"),
            "fix bug"
        );
    }

    #[test]
    fn test_kind_parses_display_names() {
        assert_eq!("Node.js".parse::<ProjectKind>().unwrap(), ProjectKind::NodeJs);
        assert!("cobol".parse::<ProjectKind>().is_err());
    }
}
