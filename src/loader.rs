//! Background cursor loading
//!
//! A loader opens its own connection on a worker thread, runs one query and
//! streams the rows back over a channel. SQLite's file locking is the only
//! coordination with writers on other connections.

use std::path::PathBuf;
use std::thread::JoinHandle;
use crossbeam::channel::{unbounded, Receiver};
use crate::provider::InventoryProvider;
use crate::values::{Row, Selection};
use crate::Error;

/// Message sent from the loader thread
#[derive(Debug)]
pub enum LoadEvent {
    Row(Row),
    /// All rows were sent; carries the row count
    Finished(usize),
    Failed(Error),
}

/// What to load
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub uri: String,
    pub projection: Option<Vec<String>>,
    pub selection: Selection,
    pub sort_order: Option<String>,
}

impl LoadRequest {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            projection: None,
            selection: Selection::all(),
            sort_order: None,
        }
    }

    pub fn projection(mut self, columns: &[&str]) -> Self {
        self.projection = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn sort_order(mut self, order: impl Into<String>) -> Self {
        self.sort_order = Some(order.into());
        self
    }
}

/// Handle to a running load
pub struct LoaderHandle {
    events: Receiver<LoadEvent>,
    worker: Option<JoinHandle<()>>,
}

impl LoaderHandle {
    pub fn events(&self) -> &Receiver<LoadEvent> {
        &self.events
    }

    /// Collect every row, failing if the load failed
    pub fn collect_rows(mut self) -> crate::Result<Vec<Row>> {
        let mut rows = Vec::new();
        for event in self.events.iter() {
            match event {
                LoadEvent::Row(row) => rows.push(row),
                LoadEvent::Finished(_) => break,
                LoadEvent::Failed(e) => return Err(e),
            }
        }
        self.join();
        Ok(rows)
    }

    /// Wait for the worker thread to exit
    pub fn join(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("Cursor loader thread panicked");
            }
        }
    }
}

impl Iterator for LoaderHandle {
    type Item = LoadEvent;

    fn next(&mut self) -> Option<LoadEvent> {
        self.events.recv().ok()
    }
}

/// Spawns loads against one database file
#[derive(Debug, Clone)]
pub struct CursorLoader {
    database: PathBuf,
}

impl CursorLoader {
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
        }
    }

    pub fn spawn(&self, request: LoadRequest) -> LoaderHandle {
        let (tx, rx) = unbounded();
        let database = self.database.clone();

        let worker = std::thread::spawn(move || {
            tracing::debug!("Loading {} from {}", request.uri, database.display());
            let result = InventoryProvider::open(&database).and_then(|provider| {
                let projection: Option<Vec<&str>> = request
                    .projection
                    .as_ref()
                    .map(|cols| cols.iter().map(String::as_str).collect());
                provider.query(
                    &request.uri,
                    projection.as_deref(),
                    &request.selection,
                    request.sort_order.as_deref(),
                )
            });

            // A dropped receiver means nobody is listening; stop quietly
            match result {
                Ok(cursor) => {
                    let count = cursor.len();
                    for row in cursor {
                        if tx.send(LoadEvent::Row(row)).is_err() {
                            return;
                        }
                    }
                    let _ = tx.send(LoadEvent::Finished(count));
                }
                Err(e) => {
                    let _ = tx.send(LoadEvent::Failed(e));
                }
            }
        });

        LoaderHandle {
            events: rx,
            worker: Some(worker),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{InventoryClient, NewItem};
    use crate::contract::CONTENT_URI;

    #[test]
    fn test_background_load_sees_committed_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.db");
        let client = InventoryClient::open(&path).unwrap();
        client.insert_dummy().unwrap();
        client
            .create_item(&NewItem { name: "Sailfish".to_string(), ..NewItem::dummy() })
            .unwrap();

        let loader = CursorLoader::new(&path);
        let rows = loader
            .spawn(LoadRequest::new(CONTENT_URI).projection(&["name"]).sort_order("_id ASC"))
            .collect_rows()
            .unwrap();

        let names: Vec<_> = rows.iter().filter_map(|r| r.get_text("name")).collect();
        assert_eq!(names, vec!["Taimen", "Sailfish"]);
    }

    #[test]
    fn test_events_end_with_finished() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.db");
        InventoryClient::open(&path).unwrap().insert_dummy().unwrap();

        let events: Vec<_> = CursorLoader::new(&path).spawn(LoadRequest::new(CONTENT_URI)).collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], LoadEvent::Row(_)));
        assert!(matches!(events[1], LoadEvent::Finished(1)));
    }

    #[test]
    fn test_bad_uri_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.db");

        let err = CursorLoader::new(&path)
            .spawn(LoadRequest::new("content://com.example.stockroom/nope"))
            .collect_rows()
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedResource(_)));
    }
}
