//! Project context for the first prompt of a session.
//!
//! - [`ProjectKind`] - ecosystem detected from marker files
//! - [`ProjectSummary`] - name, kind, root and key files of the host project
//! - [`ProjectContext`] - root path plus the rendered preamble

mod project;

pub use project::{KEY_FILES, ProjectContext, ProjectKind, ProjectSummary};
