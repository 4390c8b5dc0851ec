//! Message domain.
//!
//! - [`entities::Message`] - one displayable item (kind, content, timestamp, metadata)
//! - [`entities::MessageKind`] - the fixed set of kinds a renderer must handle
//! - [`metadata::Metadata`] - structured tool information for tool-call / tool-result

pub mod entities;
pub mod metadata;
