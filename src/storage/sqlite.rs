//! SQLite storage implementation

use std::path::{Path, PathBuf};
use std::sync::Arc;
use rusqlite::{params_from_iter, Connection, ErrorCode};
use crate::values::{ContentValues, Cursor, Row, Selection, Value};
use crate::{Error, Result};
use super::schema;

/// SQLite-backed storage for the items table.
///
/// Exposes raw table-level primitives; routing and validation live in
/// [`InventoryProvider`](crate::provider::InventoryProvider).
pub struct InventoryDb {
    conn: Connection,
    path: Option<PathBuf>,
}

impl InventoryDb {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let unavailable = |source| Error::StorageUnavailable {
            path: path.display().to_string(),
            source,
        };
        let conn = Connection::open(path).map_err(unavailable)?;
        let db = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        db.initialize_schema().map_err(|e| match e {
            Error::Storage(source) => unavailable(source),
            other => other,
        })?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::StorageUnavailable {
            path: ":memory:".to_string(),
            source,
        })?;
        let db = Self { conn, path: None };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Location of the database file, `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Create the schema on first open, or walk the upgrade path
    fn initialize_schema(&self) -> Result<()> {
        let version = self.schema_version()?;
        if version == 0 {
            tracing::info!("Creating inventory schema (version {})", schema::DATABASE_VERSION);
            for stmt in schema::all_schema_statements() {
                self.conn.execute(stmt, [])?;
            }
        } else if version < schema::DATABASE_VERSION {
            self.on_upgrade(version, schema::DATABASE_VERSION)?;
        } else if version > schema::DATABASE_VERSION {
            tracing::warn!(
                "Database version {} is newer than supported version {}",
                version,
                schema::DATABASE_VERSION
            );
            return Ok(());
        } else {
            return Ok(());
        }
        self.conn
            .pragma_update(None, "user_version", schema::DATABASE_VERSION)?;
        Ok(())
    }

    fn on_upgrade(&self, from: i64, to: i64) -> Result<()> {
        tracing::info!("Upgrading inventory schema {} -> {}", from, to);
        for stmt in schema::upgrade_statements(from, to) {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Schema version stored in the file (0 for a fresh database)
    pub fn schema_version(&self) -> Result<i64> {
        let version: i64 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;
        Ok(version)
    }

    // ========== Table Primitives ==========

    /// Select rows. `None` columns selects every column.
    pub fn query(
        &self,
        table: &str,
        columns: Option<&[&str]>,
        selection: &Selection,
        sort_order: Option<&str>,
    ) -> Result<Cursor> {
        let projection = columns
            .filter(|c| !c.is_empty())
            .map(|c| c.join(", "))
            .unwrap_or_else(|| "*".to_string());
        let mut sql = format!("SELECT {} FROM {}", projection, table);
        push_where(&mut sql, selection);
        if let Some(order) = sort_order.filter(|o| !o.trim().is_empty()) {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }
        tracing::debug!("query: {}", sql);

        let mut stmt = self.conn.prepare(&sql)?;
        let names: Arc<[String]> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
            .into();
        let width = names.len();

        let rows = stmt
            .query_map(params_from_iter(selection.args.iter()), |row| {
                let mut values = Vec::with_capacity(width);
                for i in 0..width {
                    values.push(Value::from(row.get_ref(i)?));
                }
                Ok(values)
            })?
            .map(|r| r.map(|values| Row::new(Arc::clone(&names), values)))
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Cursor::new(names, rows))
    }

    /// Insert one row, returning its id.
    ///
    /// Returns `Ok(None)` when the engine rejects the row on a constraint.
    pub fn insert(&self, table: &str, values: &ContentValues) -> Result<Option<i64>> {
        let sql = if values.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", table)
        } else {
            let columns: Vec<&str> = values.keys().collect();
            let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table,
                columns.join(", "),
                placeholders.join(", ")
            )
        };
        tracing::debug!("insert: {}", sql);

        match self.conn.execute(&sql, params_from_iter(values.iter().map(|(_, v)| v))) {
            Ok(_) => Ok(Some(self.conn.last_insert_rowid())),
            Err(rusqlite::Error::SqliteFailure(err, msg)) if err.code == ErrorCode::ConstraintViolation => {
                tracing::error!(
                    "Insert into {} rejected: {}",
                    table,
                    msg.as_deref().unwrap_or("constraint violation")
                );
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Update matching rows, returning how many changed
    pub fn update(&self, table: &str, values: &ContentValues, selection: &Selection) -> Result<usize> {
        if values.is_empty() {
            return Ok(0);
        }
        let assignments: Vec<String> = values.keys().map(|k| format!("{} = ?", k)).collect();
        let mut sql = format!("UPDATE {} SET {}", table, assignments.join(", "));
        push_where(&mut sql, selection);
        tracing::debug!("update: {}", sql);

        let params = values
            .iter()
            .map(|(_, v)| v)
            .chain(selection.args.iter());
        let rows = self.conn.execute(&sql, params_from_iter(params))?;
        Ok(rows)
    }

    /// Delete matching rows, returning how many were removed
    pub fn delete(&self, table: &str, selection: &Selection) -> Result<usize> {
        let mut sql = format!("DELETE FROM {}", table);
        push_where(&mut sql, selection);
        tracing::debug!("delete: {}", sql);

        let rows = self.conn.execute(&sql, params_from_iter(selection.args.iter()))?;
        Ok(rows)
    }

    /// Count rows in a table
    pub fn count(&self, table: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn push_where(sql: &mut String, selection: &Selection) {
    if let Some(clause) = selection.clause.as_deref().filter(|c| !c.trim().is_empty()) {
        sql.push_str(" WHERE ");
        sql.push_str(clause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::TABLE_NAME;

    fn sample_values(name: &str) -> ContentValues {
        ContentValues::new()
            .with("name", name)
            .with("price", 10.5)
            .with("quantity", 3)
            .with("supplier_name", "Acme")
            .with("supplier_phone", "555-0100")
            .with("supplier_mail", "sales@acme.test")
    }

    #[test]
    fn test_fresh_database_is_versioned() {
        let db = InventoryDb::open_in_memory().unwrap();
        assert_eq!(db.schema_version().unwrap(), schema::DATABASE_VERSION);
        assert_eq!(db.count(TABLE_NAME).unwrap(), 0);
    }

    #[test]
    fn test_row_crud() {
        let db = InventoryDb::open_in_memory().unwrap();

        let id = db.insert(TABLE_NAME, &sample_values("bolt")).unwrap().unwrap();
        let cursor = db.query(TABLE_NAME, None, &Selection::by_id(id), None).unwrap();
        assert_eq!(cursor.len(), 1);
        let row = cursor.first().unwrap();
        assert_eq!(row.get_text("name"), Some("bolt"));
        assert!(row.get("image").unwrap().is_null());

        let changed = db
            .update(TABLE_NAME, &ContentValues::new().with("quantity", 9), &Selection::by_id(id))
            .unwrap();
        assert_eq!(changed, 1);

        assert_eq!(db.delete(TABLE_NAME, &Selection::by_id(id)).unwrap(), 1);
        assert_eq!(db.delete(TABLE_NAME, &Selection::by_id(id)).unwrap(), 0);
    }

    #[test]
    fn test_query_projection_filter_and_order() {
        let db = InventoryDb::open_in_memory().unwrap();
        for name in ["b", "a", "c"] {
            db.insert(TABLE_NAME, &sample_values(name)).unwrap();
        }

        let cursor = db
            .query(
                TABLE_NAME,
                Some(&["name"][..]),
                &Selection::new("name <> ?", vec![Value::from("c")]),
                Some("name ASC"),
            )
            .unwrap();
        assert_eq!(cursor.columns(), &["name".to_string()]);
        let names: Vec<_> = cursor.iter().map(|r| r.get_text("name").unwrap().to_string()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_constraint_failure_yields_no_id() {
        let db = InventoryDb::open_in_memory().unwrap();
        let mut values = sample_values("nut");
        values.remove("supplier_mail");
        assert_eq!(db.insert(TABLE_NAME, &values).unwrap(), None);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let db = InventoryDb::open_in_memory().unwrap();
        let first = db.insert(TABLE_NAME, &sample_values("a")).unwrap().unwrap();
        db.delete(TABLE_NAME, &Selection::all()).unwrap();
        let second = db.insert(TABLE_NAME, &sample_values("b")).unwrap().unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_reopen_file_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(schema::DATABASE_NAME);
        {
            let db = InventoryDb::open(&path).unwrap();
            db.insert(TABLE_NAME, &sample_values("kept")).unwrap();
        }
        let db = InventoryDb::open(&path).unwrap();
        assert_eq!(db.count(TABLE_NAME).unwrap(), 1);
        assert_eq!(db.path(), Some(path.as_path()));
    }

    #[test]
    fn test_upgrade_from_older_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(schema::DATABASE_NAME);
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute(schema::CREATE_ITEMS_TABLE, []).unwrap();
            conn.pragma_update(None, "user_version", 1).unwrap();
        }
        let db = InventoryDb::open(&path).unwrap();
        assert_eq!(db.schema_version().unwrap(), schema::DATABASE_VERSION);
    }

    #[test]
    fn test_unopenable_path_is_storage_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("items.db");
        let err = InventoryDb::open(&path).err().unwrap();
        assert!(matches!(err, Error::StorageUnavailable { .. }));
    }
}
