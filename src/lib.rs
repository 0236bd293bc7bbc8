//! # Stockroom - single-user item inventory
//!
//! A content store for inventory items, addressed by URI:
//! - `content://<authority>/items` addresses the whole collection
//! - `content://<authority>/items/<id>` addresses one item
//!
//! Stockroom provides:
//! - A static schema contract (table, columns, URIs, MIME types)
//! - A SQLite storage engine with a versioned schema
//! - A provider that routes URIs, validates payloads and runs CRUD
//! - In-process change notification for listeners
//! - A small client facade and a background cursor loader

pub mod contract;
pub mod values;
pub mod uri;
pub mod storage;
pub mod notify;
pub mod provider;
pub mod client;
pub mod loader;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use client::{InventoryClient, Item, NewItem};
pub use notify::{ChangeEvent, ChangeNotifier, ObserverId};
pub use provider::InventoryProvider;
pub use storage::InventoryDb;
pub use uri::{Route, UriMatcher};
pub use values::{ContentValues, Cursor, Row, Selection, Value};

/// Result type alias for Stockroom operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Stockroom operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage unavailable at {path}: {source}")]
    StorageUnavailable {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Unsupported resource: {0}")]
    UnsupportedResource(String),

    #[error("{operation} is not supported for {uri}")]
    UnsupportedOperation {
        operation: &'static str,
        uri: String,
    },

    #[error("Item requires a {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
