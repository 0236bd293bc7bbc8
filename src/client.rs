//! Client facade used by presentation code
//!
//! Wraps an [`InventoryProvider`] with id-based calls and typed items, so
//! callers never assemble URIs or selections by hand.

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::contract::{self, CONTENT_URI};
use crate::notify::{ChangeEvent, ObserverId};
use crate::provider::InventoryProvider;
use crate::uri::{self, Route};
use crate::values::{ContentValues, Cursor, Row, Selection};
use crate::{Error, Result};

/// A stored inventory item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub image: Option<String>,
    pub supplier_name: String,
    pub supplier_phone: String,
    pub supplier_mail: String,
}

impl Item {
    pub fn uri(&self) -> String {
        Route::Item(self.id).to_uri_string()
    }
}

impl TryFrom<&Row> for Item {
    type Error = Error;

    fn try_from(row: &Row) -> Result<Self> {
        let text = |column: &str| {
            row.get_text(column)
                .map(str::to_string)
                .ok_or_else(|| Error::MissingField(column.to_string()))
        };
        Ok(Self {
            id: row
                .get_integer(contract::COLUMN_ID)
                .ok_or_else(|| Error::MissingField(contract::COLUMN_ID.to_string()))?,
            name: text(contract::COLUMN_ITEM_NAME)?,
            price: row
                .get_real(contract::COLUMN_ITEM_PRICE)
                .ok_or_else(|| Error::MissingField(contract::COLUMN_ITEM_PRICE.to_string()))?,
            quantity: row
                .get_integer(contract::COLUMN_ITEM_QUANTITY)
                .ok_or_else(|| Error::MissingField(contract::COLUMN_ITEM_QUANTITY.to_string()))?,
            image: row.get_text(contract::COLUMN_ITEM_IMAGE).map(str::to_string),
            supplier_name: text(contract::COLUMN_SUPPLIER_NAME)?,
            supplier_phone: text(contract::COLUMN_SUPPLIER_PHONE)?,
            supplier_mail: text(contract::COLUMN_SUPPLIER_MAIL)?,
        })
    }
}

/// Fields of an item that does not exist yet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub image: Option<String>,
    pub supplier_name: String,
    pub supplier_phone: String,
    pub supplier_mail: String,
}

impl NewItem {
    /// Sample item used to seed an empty inventory
    pub fn dummy() -> Self {
        Self {
            name: "Taimen".to_string(),
            price: 600.00,
            quantity: 10,
            image: None,
            supplier_name: "Google".to_string(),
            supplier_phone: "+1-855-836-3987".to_string(),
            supplier_mail: "store-support@google.com".to_string(),
        }
    }

    pub fn to_values(&self) -> ContentValues {
        let mut values = ContentValues::new()
            .with(contract::COLUMN_ITEM_NAME, self.name.as_str())
            .with(contract::COLUMN_ITEM_PRICE, self.price)
            .with(contract::COLUMN_ITEM_QUANTITY, self.quantity)
            .with(contract::COLUMN_SUPPLIER_NAME, self.supplier_name.as_str())
            .with(contract::COLUMN_SUPPLIER_PHONE, self.supplier_phone.as_str())
            .with(contract::COLUMN_SUPPLIER_MAIL, self.supplier_mail.as_str());
        if let Some(image) = &self.image {
            values.put(contract::COLUMN_ITEM_IMAGE, image.as_str());
        }
        values
    }
}

/// Id-based access to the inventory
pub struct InventoryClient {
    provider: InventoryProvider,
}

impl InventoryClient {
    pub fn new(provider: InventoryProvider) -> Self {
        Self { provider }
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(InventoryProvider::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(InventoryProvider::open_in_memory()?))
    }

    pub fn provider(&self) -> &InventoryProvider {
        &self.provider
    }

    /// All rows of the collection
    pub fn list(&self, columns: Option<&[&str]>) -> Result<Cursor> {
        self.provider.query(CONTENT_URI, columns, &Selection::all(), None)
    }

    /// All items, oldest first
    pub fn items(&self) -> Result<Vec<Item>> {
        let sort = format!("{} ASC", contract::COLUMN_ID);
        self.provider
            .query(CONTENT_URI, None, &Selection::all(), Some(&sort))?
            .iter()
            .map(Item::try_from)
            .collect()
    }

    /// One row by id
    pub fn get(&self, id: i64, columns: Option<&[&str]>) -> Result<Option<Row>> {
        let cursor = self
            .provider
            .query(&Route::Item(id).to_uri_string(), columns, &Selection::all(), None)?;
        Ok(cursor.into_iter().next())
    }

    pub fn get_item(&self, id: i64) -> Result<Option<Item>> {
        self.get(id, None)?.as_ref().map(Item::try_from).transpose()
    }

    /// Insert raw fields, returning the new id (`None` if storage refused the row)
    pub fn create(&self, fields: &ContentValues) -> Result<Option<i64>> {
        let created = self.provider.insert(CONTENT_URI, fields)?;
        Ok(created.as_deref().and_then(uri::parse_id))
    }

    pub fn create_item(&self, item: &NewItem) -> Result<Option<i64>> {
        self.create(&item.to_values())
    }

    /// Seed the sample item
    pub fn insert_dummy(&self) -> Result<Option<i64>> {
        self.create_item(&NewItem::dummy())
    }

    /// Change an item's quantity by `delta`.
    ///
    /// Reads the current quantity first; there is no atomic increment. Returns
    /// 0 when the item does not exist. A result below zero is rejected.
    pub fn adjust_quantity(&self, id: i64, delta: i64) -> Result<usize> {
        let Some(row) = self.get(id, Some(&[contract::COLUMN_ITEM_QUANTITY][..]))? else {
            return Ok(0);
        };
        let current = row
            .get_integer(contract::COLUMN_ITEM_QUANTITY)
            .ok_or_else(|| Error::MissingField(contract::COLUMN_ITEM_QUANTITY.to_string()))?;
        let next = current
            .checked_add(delta)
            .ok_or_else(|| Error::invalid(contract::COLUMN_ITEM_QUANTITY, "out of range"))?;

        let values = ContentValues::new().with(contract::COLUMN_ITEM_QUANTITY, next);
        self.provider
            .update(&Route::Item(id).to_uri_string(), &values, &Selection::all())
    }

    /// Partially update one item
    pub fn update(&self, id: i64, fields: &ContentValues) -> Result<usize> {
        self.provider
            .update(&Route::Item(id).to_uri_string(), fields, &Selection::all())
    }

    pub fn delete_one(&self, id: i64) -> Result<usize> {
        self.provider
            .delete(&Route::Item(id).to_uri_string(), &Selection::all())
    }

    pub fn delete_all(&self) -> Result<usize> {
        self.provider.delete(CONTENT_URI, &Selection::all())
    }

    /// Listen for changes at `scope` and anything below it
    pub fn on_change<F>(&self, scope: &str, callback: F) -> ObserverId
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        self.provider.register_observer(scope, true, callback)
    }

    pub fn remove_listener(&self, id: ObserverId) -> bool {
        self.provider.unregister_observer(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn client() -> InventoryClient {
        InventoryClient::open_in_memory().unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let client = client();
        let id = client.insert_dummy().unwrap().unwrap();
        assert_eq!(id, 1);

        let item = client.get_item(id).unwrap().unwrap();
        assert_eq!(item.name, "Taimen");
        assert_eq!(item.price, 600.0);
        assert_eq!(item.quantity, 10);
        assert_eq!(item.image, None);
        assert_eq!(item.uri(), "content://com.example.stockroom/items/1");

        assert!(client.get(42, None).unwrap().is_none());
    }

    #[test]
    fn test_create_item_with_image() {
        let client = client();
        let item = NewItem {
            image: Some("taimen.png".to_string()),
            ..NewItem::dummy()
        };
        let id = client.create_item(&item).unwrap().unwrap();
        assert_eq!(client.get_item(id).unwrap().unwrap().image.as_deref(), Some("taimen.png"));
    }

    #[test]
    fn test_adjust_quantity() {
        let client = client();
        let id = client
            .create_item(&NewItem { quantity: 1, ..NewItem::dummy() })
            .unwrap()
            .unwrap();

        assert_eq!(client.adjust_quantity(id, -1).unwrap(), 1);
        assert_eq!(client.get_item(id).unwrap().unwrap().quantity, 0);

        let err = client.adjust_quantity(id, -1).unwrap_err();
        assert!(matches!(err, Error::InvalidField { .. }));
        assert_eq!(client.get_item(id).unwrap().unwrap().quantity, 0);

        assert_eq!(client.adjust_quantity(id, 5).unwrap(), 1);
        assert_eq!(client.get_item(id).unwrap().unwrap().quantity, 5);

        assert_eq!(client.adjust_quantity(999, 1).unwrap(), 0);
    }

    #[test]
    fn test_delete_one_and_all() {
        let client = client();
        let first = client.insert_dummy().unwrap().unwrap();
        client.insert_dummy().unwrap();
        client.insert_dummy().unwrap();

        assert_eq!(client.delete_one(first).unwrap(), 1);
        assert_eq!(client.delete_one(first).unwrap(), 0);
        assert_eq!(client.items().unwrap().len(), 2);

        assert_eq!(client.delete_all().unwrap(), 2);
        assert!(client.list(None).unwrap().is_empty());
    }

    #[test]
    fn test_ids_increase_after_delete() {
        let client = client();
        let first = client.insert_dummy().unwrap().unwrap();
        client.delete_all().unwrap();
        let second = client.insert_dummy().unwrap().unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_on_change_for_item_and_collection() {
        let client = client();
        let id = client.insert_dummy().unwrap().unwrap();

        let events = Arc::new(Mutex::new(Vec::new()));
        let e = Arc::clone(&events);
        let listener = client.on_change(&Route::Item(id).to_uri_string(), move |event| {
            e.lock().unwrap().push(event.uri.clone());
        });

        client.adjust_quantity(id, 1).unwrap();
        client.delete_all().unwrap();
        assert_eq!(
            *events.lock().unwrap(),
            vec![Route::Item(id).to_uri_string(), CONTENT_URI.to_string()]
        );

        assert!(client.remove_listener(listener));
        client.insert_dummy().unwrap();
        assert_eq!(events.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_list_projection() {
        let client = client();
        client.insert_dummy().unwrap();
        let cursor = client
            .list(Some(&[contract::COLUMN_ID, contract::COLUMN_ITEM_NAME][..]))
            .unwrap();
        assert_eq!(cursor.columns().len(), 2);
        assert_eq!(cursor.notification_uri(), CONTENT_URI);
    }

    #[test]
    fn test_new_item_json() {
        let item: NewItem = serde_json::from_str(
            r#"{"name":"Reel","price":35.5,"quantity":4,"supplier_name":"Acme",
                "supplier_phone":"555","supplier_mail":"a@acme.test"}"#,
        )
        .unwrap();
        assert_eq!(item.image, None);
        assert_eq!(item.to_values().len(), 6);
    }
}
