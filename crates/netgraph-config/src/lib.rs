//! Template rendering and network graph extraction for netgraph.
//!
//! This crate handles:
//! - Building the replacement table from `replacements-config.yaml`
//! - Rendering placeholders in `network-config.yaml` and parsing the result
//! - Extracting the normalized entity graph from the resolved tree

pub mod error;
pub mod extract;
pub mod pipeline;
pub mod render;
pub mod replacements;
pub mod value;

pub use error::{ConfigError, ConfigResult};
pub use extract::extract_graph;
pub use pipeline::{Resolution, resolve_documents, resolve_files};
pub use render::{render, render_text, unresolved_placeholders};
pub use replacements::{
    ReplacementTable, ReplacementType, ReplacementValue, build_replacements,
    build_replacements_from_str,
};
