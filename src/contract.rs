//! Inventory contract - names shared by storage, routing and callers
//!
//! Nothing in here has behavior. The storage engine builds its DDL from these
//! names, the URI matcher builds its routes from them and callers use them to
//! address columns and resources.

/// Authority part of every inventory URI
pub const CONTENT_AUTHORITY: &str = "com.example.stockroom";

/// Scheme-qualified base shared by every inventory URI
pub const BASE_CONTENT_URI: &str = "content://com.example.stockroom";

/// Path segment of the item collection
pub const PATH_ITEMS: &str = "items";

/// Full URI of the item collection
pub const CONTENT_URI: &str = "content://com.example.stockroom/items";

/// Name of the items table
pub const TABLE_NAME: &str = "items";

/// Primary key. Type: INTEGER, assigned by the engine.
pub const COLUMN_ID: &str = "_id";
pub const COLUMN_ITEM_NAME: &str = "name";
pub const COLUMN_ITEM_PRICE: &str = "price";
pub const COLUMN_ITEM_QUANTITY: &str = "quantity";
/// Free-text image placeholder, nullable
pub const COLUMN_ITEM_IMAGE: &str = "image";
pub const COLUMN_SUPPLIER_NAME: &str = "supplier_name";
pub const COLUMN_SUPPLIER_PHONE: &str = "supplier_phone";
pub const COLUMN_SUPPLIER_MAIL: &str = "supplier_mail";

/// Data columns, in table order
pub const DATA_COLUMNS: &[&str] = &[
    COLUMN_ITEM_NAME,
    COLUMN_ITEM_PRICE,
    COLUMN_ITEM_QUANTITY,
    COLUMN_ITEM_IMAGE,
    COLUMN_SUPPLIER_NAME,
    COLUMN_SUPPLIER_PHONE,
    COLUMN_SUPPLIER_MAIL,
];

/// Every column of the items table, primary key first
pub const ALL_COLUMNS: &[&str] = &[
    COLUMN_ID,
    COLUMN_ITEM_NAME,
    COLUMN_ITEM_PRICE,
    COLUMN_ITEM_QUANTITY,
    COLUMN_ITEM_IMAGE,
    COLUMN_SUPPLIER_NAME,
    COLUMN_SUPPLIER_PHONE,
    COLUMN_SUPPLIER_MAIL,
];

/// MIME type of [`CONTENT_URI`], a list of items
pub const CONTENT_LIST_TYPE: &str = "vnd.android.cursor.dir/com.example.stockroom/items";

/// MIME type of a single item URI
pub const CONTENT_ITEM_TYPE: &str = "vnd.android.cursor.item/com.example.stockroom/items";

/// Check whether `name` is a column of the items table
pub fn is_known_column(name: &str) -> bool {
    ALL_COLUMNS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uris_are_consistent() {
        assert_eq!(BASE_CONTENT_URI, format!("content://{}", CONTENT_AUTHORITY));
        assert_eq!(CONTENT_URI, format!("{}/{}", BASE_CONTENT_URI, PATH_ITEMS));
        assert!(CONTENT_LIST_TYPE.ends_with(&format!("{}/{}", CONTENT_AUTHORITY, PATH_ITEMS)));
        assert_ne!(CONTENT_LIST_TYPE, CONTENT_ITEM_TYPE);
    }

    #[test]
    fn test_known_columns() {
        assert!(is_known_column("_id"));
        assert!(is_known_column("supplier_mail"));
        assert!(!is_known_column("color"));
        assert_eq!(DATA_COLUMNS.len() + 1, ALL_COLUMNS.len());
    }
}
