//! The graph archive: load, save, export, import
//!
//! Wraps a [`StorageBackend`] with the document format and the fixed
//! storage key. Saving is best-effort (failures are logged and swallowed);
//! loading treats corrupt data as "no data" and only warns on a schema
//! version mismatch.

use tracing::{debug, warn};

use super::{GraphDocument, StorageBackend, STORAGE_KEY, STORAGE_VERSION};
use crate::core::{MapError, Result};
use crate::graph::{GraphData, GraphStore, SubscriptionId};

/// Durable storage for the graph document
pub struct GraphArchive<B: StorageBackend> {
    backend: B,
    key: String,
}

impl<B: StorageBackend> GraphArchive<B> {
    /// Create an archive over a backend, using the standard storage key
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, STORAGE_KEY)
    }

    /// Create an archive with a custom storage key
    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Persist a snapshot of the graph
    ///
    /// Best-effort: a storage failure is logged and the data stays in
    /// memory; the caller is never blocked.
    pub fn save(&mut self, graph: &GraphData) {
        let document = GraphDocument::snapshot(graph);
        let json = match serde_json::to_string(&document) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize graph document");
                return;
            }
        };
        if let Err(e) = self.backend.write(&self.key, &json) {
            warn!(error = %e, "failed to save graph, keeping data in memory");
        }
    }

    /// Load the stored document
    ///
    /// Returns `None` when nothing is stored or the stored data is corrupt;
    /// a version mismatch is logged but the document is still returned
    /// (no migration is performed).
    pub fn load(&self) -> Option<GraphDocument> {
        let raw = match self.backend.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "failed to read stored graph");
                return None;
            }
        };

        let document: GraphDocument = match serde_json::from_str(&raw) {
            Ok(document) => document,
            Err(e) => {
                warn!(error = %e, "stored graph is corrupt, treating as no data");
                return None;
            }
        };

        if document.metadata.version != STORAGE_VERSION {
            warn!(
                found = %document.metadata.version,
                expected = STORAGE_VERSION,
                "stored data version mismatch, migration may be needed"
            );
        }
        debug!(
            neurons = document.neurons.len(),
            connections = document.connections.len(),
            "graph document loaded"
        );
        Some(document)
    }

    /// The raw stored JSON, or `"{}"` when nothing is stored
    pub fn export(&self) -> String {
        match self.backend.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => "{}".to_string(),
            Err(e) => {
                warn!(error = %e, "failed to read stored graph for export");
                "{}".to_string()
            }
        }
    }

    /// Overwrite stored state with `json`
    ///
    /// Validation is parse-only: any string that deserializes as a graph
    /// document (missing fields default) is accepted.
    pub fn import(&mut self, json: &str) -> Result<GraphDocument> {
        let document: GraphDocument =
            serde_json::from_str(json).map_err(|e| MapError::import(e.to_string()))?;
        self.backend
            .write(&self.key, json)
            .map_err(|e| MapError::storage(e.to_string()))?;
        debug!(
            neurons = document.neurons.len(),
            connections = document.connections.len(),
            "graph document imported"
        );
        Ok(document)
    }

    /// Remove the stored document
    pub fn clear(&mut self) {
        if let Err(e) = self.backend.remove(&self.key) {
            warn!(error = %e, "failed to clear stored graph");
        }
    }

    /// Move the archive into a write-through subscriber on the store:
    /// every subsequent change is persisted as it happens
    pub fn attach(mut self, store: &mut GraphStore) -> SubscriptionId
    where
        B: 'static,
    {
        store.subscribe(move |_change, graph| self.save(graph))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Connection, Neuron, Point3};
    use crate::storage::MemoryBackend;

    fn populated_store() -> GraphStore {
        let mut store = GraphStore::new();
        store
            .add_neuron(Neuron::pinned("a", "Alpha", Point3::new(1.0, 2.0, 0.0)))
            .unwrap();
        store.add_neuron(Neuron::new("b", "Beta")).unwrap();
        store
            .add_connection(Connection::new("ab", "a", "b", 0.7))
            .unwrap();
        store
    }

    #[test]
    fn test_save_load_round_trip() {
        let store = populated_store();
        let mut archive = GraphArchive::new(MemoryBackend::new());
        archive.save(store.graph());

        let document = archive.load().expect("document present");
        assert_eq!(document.metadata.version, STORAGE_VERSION);
        assert_eq!(document.neurons.len(), 2);
        assert_eq!(document.connections.len(), 1);

        let mut restored = GraphStore::new();
        restored.load(document.neurons, document.connections);
        assert_eq!(restored.neuron("a"), store.neuron("a"));
        assert_eq!(restored.neuron("b"), store.neuron("b"));
        assert_eq!(restored.connections(), store.connections());
    }

    #[test]
    fn test_load_absent_is_none() {
        let archive = GraphArchive::new(MemoryBackend::new());
        assert!(archive.load().is_none());
    }

    #[test]
    fn test_corrupt_data_degrades_to_no_data() {
        let mut backend = MemoryBackend::new();
        backend.write(STORAGE_KEY, "{not json").unwrap();
        let archive = GraphArchive::new(backend);
        assert!(archive.load().is_none());
    }

    #[test]
    fn test_version_mismatch_still_loads() {
        let json = r#"{"neurons":[],"connections":[],"metadata":{"version":"0.9.0","lastModified":1}}"#;
        let mut backend = MemoryBackend::new();
        backend.write(STORAGE_KEY, json).unwrap();
        let archive = GraphArchive::new(backend);

        let document = archive.load().expect("mismatched version is not fatal");
        assert_eq!(document.metadata.version, "0.9.0");
    }

    #[test]
    fn test_export_of_empty_store_is_empty_object() {
        let archive = GraphArchive::new(MemoryBackend::new());
        assert_eq!(archive.export(), "{}");
    }

    #[test]
    fn test_import_overwrites_and_parses() {
        let mut archive = GraphArchive::new(MemoryBackend::new());
        archive.save(populated_store().graph());

        let document = archive.import("{}").unwrap();
        assert!(document.neurons.is_empty());
        assert_eq!(archive.export(), "{}");

        assert!(archive.import("definitely not json").is_err());
    }

    #[test]
    fn test_clear_removes_stored_state() {
        let mut archive = GraphArchive::new(MemoryBackend::new());
        archive.save(populated_store().graph());
        assert!(archive.load().is_some());

        archive.clear();
        assert!(archive.load().is_none());
        archive.clear();
    }

    #[test]
    fn test_attached_archive_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = GraphStore::new();
        GraphArchive::new(crate::storage::FileBackend::new(dir.path())).attach(&mut store);

        store.add_neuron(Neuron::new("a", "Alpha")).unwrap();

        let reader = GraphArchive::new(crate::storage::FileBackend::new(dir.path()));
        let document = reader.load().expect("write-through persisted the change");
        assert_eq!(document.neurons.len(), 1);
        assert_eq!(document.neurons[0].id, "a");
    }
}
