//! Field payloads, selections and result rows
//!
//! - [`Value`]: a single SQLite-compatible cell value
//! - [`ContentValues`]: column/value pairs for insert and partial update
//! - [`Selection`]: a `WHERE` clause with positional `?` arguments
//! - [`Row`] / [`Cursor`]: query results

use std::sync::Arc;
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};
use crate::contract;

/// A single cell value.
///
/// Coercion follows SQLite's loose typing: numeric text reads as a number,
/// and an integral real reads as an integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow as text, only for `Text` values
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Coerce to a real number
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            Value::Text(s) => s.trim().parse().ok(),
            Value::Null => None,
        }
    }

    /// Coerce to an integer. Reals with a fractional part do not coerce.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Real(r) if r.fract() == 0.0 && r.is_finite() => Some(*r as i64),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(v: ValueRef<'_>) -> Self {
        match v {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(r) => Value::Real(r),
            ValueRef::Text(t) | ValueRef::Blob(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Value::Real(r) => ToSqlOutput::Borrowed(ValueRef::Real(*r)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

/// Ordered column/value pairs.
///
/// Only the columns present are written, which is what makes updates partial.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentValues {
    entries: Vec<(String, Value)>,
}

impl ContentValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing any previous value for it
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style [`put`](Self::put)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.put(key, value);
        self
    }

    pub fn put_null(&mut self, key: impl Into<String>) {
        self.put(key, Value::Null);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ContentValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = ContentValues::new();
        for (k, v) in iter {
            values.put(k, v);
        }
        values
    }
}

/// A `WHERE` clause with `?` placeholders bound positionally to `args`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub clause: Option<String>,
    pub args: Vec<Value>,
}

impl Selection {
    /// Match every row
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(clause: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            clause: Some(clause.into()),
            args,
        }
    }

    /// Match the single row with primary key `id`
    pub fn by_id(id: i64) -> Self {
        Self::new(format!("{} = ?", contract::COLUMN_ID), vec![Value::Integer(id)])
    }

    pub fn is_all(&self) -> bool {
        self.clause.is_none()
    }
}

/// One result row. Column names are shared with the owning cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub(crate) fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    pub fn get_text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_text)
    }

    pub fn get_integer(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_integer)
    }

    pub fn get_real(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Value::as_real)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.columns.iter().zip(&self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Result set of a query, tagged with the URI it was produced for
#[derive(Debug, Clone)]
pub struct Cursor {
    columns: Arc<[String]>,
    rows: Vec<Row>,
    notification_uri: String,
}

impl Cursor {
    pub(crate) fn new(columns: Arc<[String]>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            notification_uri: String::new(),
        }
    }

    pub(crate) fn set_notification_uri(&mut self, uri: impl Into<String>) {
        self.notification_uri = uri.into();
    }

    /// URI whose change notifications invalidate this cursor
    pub fn notification_uri(&self) -> &str {
        &self.notification_uri
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl IntoIterator for Cursor {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a Cursor {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
