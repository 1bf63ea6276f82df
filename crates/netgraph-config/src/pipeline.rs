//! End-to-end resolution: replacements, rendering, extraction.

use chrono::{DateTime, Utc};
use netgraph_core::{GraphDocument, NetworkGraph};
use serde_yaml::Value;
use std::path::Path;
use tracing::info;

use crate::ConfigResult;
use crate::extract::extract_graph;
use crate::render::render;
use crate::replacements::{ReplacementTable, build_replacements_from_str};
use crate::value::to_json;

/// Everything produced by one resolution run.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub replacements: ReplacementTable,
    pub resolved: Value,
    pub graph: NetworkGraph,
}

impl Resolution {
    /// Wrap the graph and resolved tree in the output envelope.
    pub fn into_document(self, generated_at: DateTime<Utc>) -> GraphDocument {
        GraphDocument::new(self.graph, to_json(&self.resolved), generated_at)
    }

    /// The output envelope as pretty-printed JSON.
    pub fn into_json_pretty(self, generated_at: DateTime<Utc>) -> ConfigResult<String> {
        Ok(self.into_document(generated_at).to_json_pretty()?)
    }
}

/// Resolve a network document against a replacement document, both given as text.
pub fn resolve_documents(replacements_text: &str, network_text: &str) -> ConfigResult<Resolution> {
    let replacements = build_replacements_from_str(replacements_text)?;
    let resolved = render(network_text, &replacements)?;
    let graph = extract_graph(&resolved);

    info!(
        replacements = replacements.len(),
        entities = graph.entity_count(),
        subnets = graph.subnet_count(),
        "Resolved network configuration"
    );

    Ok(Resolution {
        replacements,
        resolved,
        graph,
    })
}

/// Read both documents from disk and resolve them.
pub fn resolve_files(
    replacements_path: impl AsRef<Path>,
    network_path: impl AsRef<Path>,
) -> ConfigResult<Resolution> {
    let replacements_text = std::fs::read_to_string(replacements_path)?;
    let network_text = std::fs::read_to_string(network_path)?;
    resolve_documents(&replacements_text, &network_text)
}
