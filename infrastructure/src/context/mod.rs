//! Project detection infrastructure
//!
//! This module provides the file-system implementation of the
//! [`ProjectInfoProvider`] port defined in the application layer.
//!
//! # Components
//!
//! - [`LocalProjectInfo`] - Detects project kind and key files in a local directory
//!
//! # Usage
//!
//! ```
//! use pilot_application::ProjectInfoProvider;
//! use pilot_infrastructure::LocalProjectInfo;
//!
//! let info = LocalProjectInfo::new(".");
//! let context = info.project_context();
//! assert!(context.root().is_some());
//! ```
//!
//! [`ProjectInfoProvider`]: pilot_application::ProjectInfoProvider

mod project_info;

pub use project_info::LocalProjectInfo;
