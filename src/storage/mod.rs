//! Storage Layer - SQLite-backed persistence
//!
//! One database file (`items.db`) holding one table:
//! - items(_id, name, price, quantity, image, supplier_name, supplier_phone, supplier_mail)

pub mod schema;
pub mod sqlite;

pub use sqlite::InventoryDb;
