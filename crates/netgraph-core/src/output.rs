//! JSON output envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::NetworkGraph;

/// Top-level document written by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    pub metadata: Metadata,
    pub graph: NetworkGraph,
    /// The fully resolved network configuration, verbatim.
    pub resolved_network_config: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub generated_at: DateTime<Utc>,
}

impl GraphDocument {
    pub fn new(graph: NetworkGraph, resolved: Value, generated_at: DateTime<Utc>) -> Self {
        Self {
            metadata: Metadata { generated_at },
            graph,
            resolved_network_config: resolved,
        }
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
