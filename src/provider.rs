//! Inventory provider - URI-routed CRUD over the items table
//!
//! Every operation first routes its URI:
//! - `Route::Collection` runs against the whole table with the caller's selection
//! - `Route::Item(id)` replaces the caller's selection with `_id = id`
//!
//! Payloads are validated before anything is written, and successful
//! mutations are published through the provider's [`ChangeNotifier`].

use std::path::Path;
use std::sync::Arc;
use crate::contract::{self, TABLE_NAME};
use crate::notify::{ChangeNotifier, ObserverId};
use crate::storage::InventoryDb;
use crate::uri::{Route, UriMatcher};
use crate::values::{ContentValues, Cursor, Selection, Value};
use crate::{Error, Result};

/// Data access layer for inventory items
pub struct InventoryProvider {
    db: InventoryDb,
    matcher: UriMatcher,
    notifier: Arc<ChangeNotifier>,
}

impl InventoryProvider {
    /// Create a provider over an open database
    pub fn new(db: InventoryDb) -> Self {
        Self::with_notifier(db, Arc::new(ChangeNotifier::new()))
    }

    /// Create a provider that publishes into an existing notifier
    pub fn with_notifier(db: InventoryDb, notifier: Arc<ChangeNotifier>) -> Self {
        Self {
            db,
            matcher: UriMatcher::inventory(),
            notifier,
        }
    }

    /// Open (or create) the database at `path` and wrap it
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(InventoryDb::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(InventoryDb::open_in_memory()?))
    }

    pub fn notifier(&self) -> &Arc<ChangeNotifier> {
        &self.notifier
    }

    pub fn database(&self) -> &InventoryDb {
        &self.db
    }

    /// Register a change listener on `scope`
    pub fn register_observer<F>(&self, scope: &str, notify_for_descendants: bool, callback: F) -> ObserverId
    where
        F: Fn(&crate::ChangeEvent) + Send + Sync + 'static,
    {
        self.notifier.register(scope, notify_for_descendants, callback)
    }

    pub fn unregister_observer(&self, id: ObserverId) -> bool {
        self.notifier.unregister(id)
    }

    /// Query rows at `uri`. An empty result is not an error.
    pub fn query(
        &self,
        uri: &str,
        projection: Option<&[&str]>,
        selection: &Selection,
        sort_order: Option<&str>,
    ) -> Result<Cursor> {
        if let Some(columns) = projection {
            check_columns(columns.iter().copied())?;
        }
        let route = self.matcher.route(uri)?;
        let selection = scoped_selection(route, selection);

        let mut cursor = self.db.query(TABLE_NAME, projection, &selection, sort_order)?;
        cursor.set_notification_uri(route.to_uri_string());
        Ok(cursor)
    }

    /// Insert a new item into the collection.
    ///
    /// Returns the new item's URI, or `None` if the engine refused the row.
    pub fn insert(&self, uri: &str, values: &ContentValues) -> Result<Option<String>> {
        match self.matcher.route(uri)? {
            Route::Collection => {
                let values = validate_insert(values)?;
                let Some(id) = self.db.insert(TABLE_NAME, &values)? else {
                    tracing::error!("Failed to insert row for {}", uri);
                    return Ok(None);
                };
                self.notifier.notify_change(&Route::Collection.to_uri_string());
                Ok(Some(Route::Item(id).to_uri_string()))
            }
            Route::Item(_) => Err(Error::UnsupportedOperation {
                operation: "Insertion",
                uri: uri.to_string(),
            }),
        }
    }

    /// Apply a partial update, returning the number of rows changed
    pub fn update(&self, uri: &str, values: &ContentValues, selection: &Selection) -> Result<usize> {
        let route = self.matcher.route(uri)?;
        let selection = scoped_selection(route, selection);
        if values.is_empty() {
            return Ok(0);
        }

        let values = validate_update(values)?;
        let rows = self.db.update(TABLE_NAME, &values, &selection)?;
        if rows > 0 {
            self.notifier.notify_change(&route.to_uri_string());
        }
        Ok(rows)
    }

    /// Delete rows at `uri`, returning how many were removed
    pub fn delete(&self, uri: &str, selection: &Selection) -> Result<usize> {
        let route = self.matcher.route(uri)?;
        let selection = scoped_selection(route, selection);

        let rows = self.db.delete(TABLE_NAME, &selection)?;
        if rows > 0 {
            self.notifier.notify_change(&route.to_uri_string());
        }
        Ok(rows)
    }

    /// MIME type of the data at `uri`
    pub fn get_type(&self, uri: &str) -> Result<&'static str> {
        Ok(self.matcher.route(uri)?.mime_type())
    }
}

/// Item routes always select by their own id
fn scoped_selection(route: Route, selection: &Selection) -> Selection {
    match route {
        Route::Collection => selection.clone(),
        Route::Item(id) => {
            if !selection.is_all() {
                tracing::warn!("Ignoring selection {:?} for item {}", selection.clause, id);
            }
            Selection::by_id(id)
        }
    }
}

fn check_columns<'a>(columns: impl IntoIterator<Item = &'a str>) -> Result<()> {
    for column in columns {
        if !contract::is_known_column(column) {
            return Err(Error::invalid(column, "unknown column"));
        }
    }
    Ok(())
}

fn check_payload_keys(values: &ContentValues) -> Result<()> {
    check_columns(values.keys())?;
    if values.contains_key(contract::COLUMN_ID) {
        return Err(Error::invalid(contract::COLUMN_ID, "assigned by storage"));
    }
    Ok(())
}

fn required_text(field: &str, value: Option<&Value>) -> Result<Value> {
    match value {
        None | Some(Value::Null) => Err(Error::MissingField(field.to_string())),
        Some(Value::Text(s)) if s.trim().is_empty() => Err(Error::MissingField(field.to_string())),
        Some(Value::Text(s)) => Ok(Value::Text(s.clone())),
        Some(other) => Ok(Value::Text(other.to_string())),
    }
}

fn optional_text(field: &str, value: &Value) -> Result<Value> {
    match value {
        Value::Null | Value::Text(_) => Ok(value.clone()),
        _ => Err(Error::invalid(field, "expected text")),
    }
}

fn price(value: Option<&Value>) -> Result<Value> {
    let field = contract::COLUMN_ITEM_PRICE;
    let value = match value {
        None | Some(Value::Null) => return Err(Error::MissingField(field.to_string())),
        Some(v) => v,
    };
    let price = value
        .as_real()
        .ok_or_else(|| Error::invalid(field, format!("{} is not a number", value)))?;
    if !price.is_finite() || price < 0.0 {
        return Err(Error::invalid(field, "must not be negative"));
    }
    Ok(Value::Real(price))
}

fn quantity(value: Option<&Value>, min: i64) -> Result<Value> {
    let field = contract::COLUMN_ITEM_QUANTITY;
    let value = match value {
        None | Some(Value::Null) => return Err(Error::MissingField(field.to_string())),
        Some(v) => v,
    };
    let quantity = value
        .as_integer()
        .ok_or_else(|| Error::invalid(field, format!("{} is not a whole number", value)))?;
    if quantity < min {
        return Err(Error::invalid(field, format!("must be at least {}", min)));
    }
    Ok(Value::Integer(quantity))
}

const SUPPLIER_COLUMNS: [&str; 3] = [
    contract::COLUMN_SUPPLIER_NAME,
    contract::COLUMN_SUPPLIER_PHONE,
    contract::COLUMN_SUPPLIER_MAIL,
];

/// Validate a full insert payload, returning it normalized
pub fn validate_insert(values: &ContentValues) -> Result<ContentValues> {
    check_payload_keys(values)?;

    let mut out = ContentValues::new();
    out.put(
        contract::COLUMN_ITEM_NAME,
        required_text(contract::COLUMN_ITEM_NAME, values.get(contract::COLUMN_ITEM_NAME))?,
    );
    out.put(contract::COLUMN_ITEM_PRICE, price(values.get(contract::COLUMN_ITEM_PRICE))?);
    out.put(
        contract::COLUMN_ITEM_QUANTITY,
        quantity(values.get(contract::COLUMN_ITEM_QUANTITY), 1)?,
    );
    for column in SUPPLIER_COLUMNS {
        out.put(column, required_text(column, values.get(column))?);
    }
    if let Some(image) = values.get(contract::COLUMN_ITEM_IMAGE) {
        out.put(
            contract::COLUMN_ITEM_IMAGE,
            optional_text(contract::COLUMN_ITEM_IMAGE, image)?,
        );
    }
    Ok(out)
}

/// Validate the fields present in an update payload, returning them normalized
pub fn validate_update(values: &ContentValues) -> Result<ContentValues> {
    check_payload_keys(values)?;

    let mut out = ContentValues::new();
    for (column, value) in values.iter() {
        let normalized = match column {
            contract::COLUMN_ITEM_PRICE => price(Some(value))?,
            contract::COLUMN_ITEM_QUANTITY => quantity(Some(value), 0)?,
            contract::COLUMN_ITEM_IMAGE => optional_text(column, value)?,
            _ => required_text(column, Some(value))?,
        };
        out.put(column, normalized);
    }
    Ok(out)
}
