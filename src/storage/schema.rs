//! Database schema definitions

/// File name of the inventory database
pub const DATABASE_NAME: &str = "items.db";

/// Current schema version, stored in `PRAGMA user_version`
pub const DATABASE_VERSION: i64 = 2;

/// SQL to create the items table
pub const CREATE_ITEMS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    price FLOAT NOT NULL,
    quantity INTEGER NOT NULL,
    image TEXT,
    supplier_name TEXT NOT NULL,
    supplier_phone TEXT NOT NULL,
    supplier_mail TEXT NOT NULL
)
"#;

/// Upgrade steps as `(target_version, statements)`, applied in order
/// to databases whose stored version is below `target_version`.
///
/// Version 2 only bumped the number; the table layout is unchanged.
pub const MIGRATIONS: &[(i64, &[&str])] = &[(2, &[])];

/// Statements that create the schema from scratch
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![CREATE_ITEMS_TABLE]
}

/// Statements needed to move a database from `from` to `to`
pub fn upgrade_statements(from: i64, to: i64) -> Vec<&'static str> {
    MIGRATIONS
        .iter()
        .filter(|(version, _)| *version > from && *version <= to)
        .flat_map(|(_, stmts)| stmts.iter().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_end_at_current_version() {
        let last = MIGRATIONS.last().map(|(v, _)| *v);
        assert_eq!(last, Some(DATABASE_VERSION));
    }

    #[test]
    fn test_upgrade_is_noop() {
        assert!(upgrade_statements(1, DATABASE_VERSION).is_empty());
        assert!(upgrade_statements(DATABASE_VERSION, DATABASE_VERSION).is_empty());
    }
}
