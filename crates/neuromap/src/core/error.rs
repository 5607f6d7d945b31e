//! Error types for graph, layout, and persistence operations
//!
//! All errors are local-recoverable; nothing in this crate treats an error
//! as fatal to the running application.

use thiserror::Error;

/// Error type for knowledge-map operations
#[derive(Error, Debug)]
pub enum MapError {
    #[error("no neuron with id `{id}`")]
    NodeNotFound { id: String },

    #[error("no connection with id `{id}`")]
    ConnectionNotFound { id: String },

    #[error("a neuron with id `{id}` already exists")]
    DuplicateNode { id: String },

    #[error("connection `{connection_id}` references unknown neuron `{neuron_id}`")]
    UnknownEndpoint {
        connection_id: String,
        neuron_id: String,
    },

    #[error("storage error: {message}")]
    Storage { message: String },

    #[error("import error: {message}")]
    Import { message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl MapError {
    /// Create a node-not-found error
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }

    /// Create a connection-not-found error
    pub fn connection_not_found(id: impl Into<String>) -> Self {
        Self::ConnectionNotFound { id: id.into() }
    }

    /// Create a duplicate-node error
    pub fn duplicate_node(id: impl Into<String>) -> Self {
        Self::DuplicateNode { id: id.into() }
    }

    /// Create an unknown-endpoint error
    pub fn unknown_endpoint(
        connection_id: impl Into<String>,
        neuron_id: impl Into<String>,
    ) -> Self {
        Self::UnknownEndpoint {
            connection_id: connection_id.into(),
            neuron_id: neuron_id.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create an import error
    pub fn import(message: impl Into<String>) -> Self {
        Self::Import {
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, MapError>;
