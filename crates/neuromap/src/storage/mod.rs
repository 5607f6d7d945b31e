//! Durable persistence of the graph
//!
//! The graph is stored as a single JSON document under one fixed key in a
//! key-value backend (a file per key natively; the browser front end uses
//! its own local storage through the WASM bindings). Persistence is
//! best-effort: storage failures are logged, never fatal, and corrupt
//! stored data degrades to "no data".

mod archive;
mod backend;

pub use archive::*;
pub use backend::*;

use serde::{Deserialize, Serialize};

use crate::core::{now_millis, Connection, Neuron};
use crate::graph::GraphData;

/// The fixed key the graph document is stored under
pub const STORAGE_KEY: &str = "neural-knowledge-map-data";

/// Schema tag written into every saved document
pub const STORAGE_VERSION: &str = "1.0.0";

/// Document metadata: schema tag and save time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub version: String,
    pub last_modified: u64,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            version: STORAGE_VERSION.to_string(),
            last_modified: 0,
        }
    }
}

/// The persisted shape of the whole graph
///
/// All fields are defaulted so that minimal documents (including `{}`)
/// import cleanly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub neurons: Vec<Neuron>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl GraphDocument {
    /// Snapshot the live graph into a document stamped with the current
    /// schema version and time
    pub fn snapshot(graph: &GraphData) -> Self {
        Self {
            neurons: graph.neurons().cloned().collect(),
            connections: graph.connections().to_vec(),
            metadata: DocumentMetadata {
                version: STORAGE_VERSION.to_string(),
                last_modified: now_millis(),
            },
        }
    }
}
