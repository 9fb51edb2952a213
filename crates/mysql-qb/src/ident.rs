//! MySQL identifier handling.
//!
//! This module provides [`TableRef`], a table name with an optional schema
//! (database) qualifier, and the backtick quoting used for every identifier the
//! builders emit.
//!
//! - Names must be non-empty and cannot contain NUL
//! - A backtick inside a name is escaped as a doubled backtick
//!
//! # Example
//! ```
//! use mysql_qb::TableRef;
//!
//! let t = TableRef::new("test")?.with_schema("db2")?;
//! assert_eq!(t.to_sql(), "`db2`.`test`");
//! # Ok::<(), mysql_qb::QbError>(())
//! ```

use crate::error::{QbError, QbResult};
use std::fmt;

/// Validate a bare identifier (table, schema, column, alias or index name).
pub(crate) fn validate_name(kind: &str, name: &str) -> QbResult<()> {
    if name.is_empty() {
        return Err(QbError::invalid_identifier(format!("{kind} name cannot be empty")));
    }
    if name.contains('\0') {
        return Err(QbError::invalid_identifier(format!(
            "{kind} name cannot contain NUL character"
        )));
    }
    Ok(())
}

/// Append `name` to `out` as a backtick-quoted identifier.
pub(crate) fn write_quoted(out: &mut String, name: &str) {
    out.push('`');
    for ch in name.chars() {
        if ch == '`' {
            out.push_str("``");
        } else {
            out.push(ch);
        }
    }
    out.push('`');
}

/// Quote a single identifier.
pub(crate) fn quote(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    write_quoted(&mut out, name);
    out
}

/// A table participating in a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    name: String,
    schema: Option<String>,
}

impl TableRef {
    /// Create a table reference without schema qualifier.
    pub fn new(name: impl Into<String>) -> QbResult<Self> {
        let name = name.into();
        validate_name("Table", &name)?;
        Ok(Self { name, schema: None })
    }

    /// Create a schema-qualified table reference.
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> QbResult<Self> {
        Self::new(name)?.with_schema(schema)
    }

    /// Qualify this table with a schema (database) name.
    pub fn with_schema(mut self, schema: impl Into<String>) -> QbResult<Self> {
        let schema = schema.into();
        validate_name("Schema", &schema)?;
        self.schema = Some(schema);
        Ok(self)
    }

    /// Raw table name, without schema.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw schema name, if any.
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Render the table as a quoted, optionally schema-qualified identifier.
    pub fn to_sql(&self) -> String {
        let cap = self.name.len() + 2 + self.schema.as_ref().map_or(0, |s| s.len() + 3);
        let mut out = String::with_capacity(cap);
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        if let Some(schema) = &self.schema {
            write_quoted(out, schema);
            out.push('.');
        }
        write_quoted(out, &self.name);
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// Convert an input into a [`TableRef`].
pub trait IntoTable {
    fn into_table(self) -> QbResult<TableRef>;
}

impl IntoTable for TableRef {
    fn into_table(self) -> QbResult<TableRef> {
        Ok(self)
    }
}

impl IntoTable for &TableRef {
    fn into_table(self) -> QbResult<TableRef> {
        Ok(self.clone())
    }
}

impl IntoTable for &str {
    fn into_table(self) -> QbResult<TableRef> {
        TableRef::new(self)
    }
}

impl IntoTable for String {
    fn into_table(self) -> QbResult<TableRef> {
        TableRef::new(self)
    }
}

impl IntoTable for &String {
    fn into_table(self) -> QbResult<TableRef> {
        TableRef::new(self.as_str())
    }
}

/// Convert an input into the non-empty table list of a statement.
///
/// Accepts a single table (`&str`, `String`, [`TableRef`]) or a vector, slice or
/// array of them.
pub trait IntoTables {
    fn into_tables(self) -> QbResult<Vec<TableRef>>;
}

fn collect_tables<T: IntoTable>(items: impl IntoIterator<Item = T>) -> QbResult<Vec<TableRef>> {
    let tables = items
        .into_iter()
        .map(IntoTable::into_table)
        .collect::<QbResult<Vec<_>>>()?;
    if tables.is_empty() {
        return Err(QbError::invalid_argument("there were no tables specified"));
    }
    Ok(tables)
}

impl IntoTables for TableRef {
    fn into_tables(self) -> QbResult<Vec<TableRef>> {
        Ok(vec![self])
    }
}

impl IntoTables for &str {
    fn into_tables(self) -> QbResult<Vec<TableRef>> {
        Ok(vec![TableRef::new(self)?])
    }
}

impl IntoTables for String {
    fn into_tables(self) -> QbResult<Vec<TableRef>> {
        Ok(vec![TableRef::new(self)?])
    }
}

impl<T: IntoTable> IntoTables for Vec<T> {
    fn into_tables(self) -> QbResult<Vec<TableRef>> {
        collect_tables(self)
    }
}

impl<T: IntoTable + Clone> IntoTables for &[T] {
    fn into_tables(self) -> QbResult<Vec<TableRef>> {
        collect_tables(self.iter().cloned())
    }
}

impl<T: IntoTable, const N: usize> IntoTables for [T; N] {
    fn into_tables(self) -> QbResult<Vec<TableRef>> {
        collect_tables(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_simple() {
        let t = TableRef::new("test").unwrap();
        assert_eq!(t.to_sql(), "`test`");
        assert_eq!(t.name(), "test");
        assert_eq!(t.schema(), None);
    }

    #[test]
    fn table_with_schema() {
        let t = TableRef::qualified("db2", "test").unwrap();
        assert_eq!(t.to_sql(), "`db2`.`test`");
        assert_eq!(t.schema(), Some("db2"));
        assert_eq!(t.to_string(), "`db2`.`test`");
    }

    #[test]
    fn table_escapes_backtick() {
        let t = TableRef::new("we`ird").unwrap();
        assert_eq!(t.to_sql(), "`we``ird`");
    }

    #[test]
    fn table_rejects_empty() {
        let err = TableRef::new("").unwrap_err();
        assert!(matches!(err, QbError::InvalidIdentifier(_)));
        assert!(TableRef::new("t").unwrap().with_schema("").is_err());
    }

    #[test]
    fn table_rejects_nul() {
        assert!(TableRef::new("a\0b").is_err());
    }

    #[test]
    fn tables_from_various_inputs() {
        assert_eq!("test".into_tables().unwrap().len(), 1);
        assert_eq!(vec!["a", "b"].into_tables().unwrap().len(), 2);
        assert_eq!(["a", "b", "c"].into_tables().unwrap().len(), 3);
        let slice: &[&str] = &["x"];
        assert_eq!(slice.into_tables().unwrap()[0].name(), "x");
    }

    #[test]
    fn tables_reject_empty_list() {
        let err = Vec::<&str>::new().into_tables().unwrap_err();
        assert!(matches!(err, QbError::InvalidArgument(_)));
    }
}
