//! INSERT statement builder.

use crate::error::{QbError, QbResult};
use crate::ident::{IntoTables, TableRef, validate_name, write_quoted};
use crate::qb::core::{QueryCore, StatementKind};
use crate::qb::param::{Literal, ParamBag};
use crate::qb::traits::Statement;
use crate::value::Value;
use indexmap::IndexMap;

/// `ON DUPLICATE KEY UPDATE` behaviour.
///
/// Every inserted column except the primary key is re-set from the row that
/// failed to insert: `` `col` = VALUES(`col`) ``.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OnDuplicateKey {
    primary_key: String,
}

impl OnDuplicateKey {
    /// Update all inserted columns except `primary_key`.
    pub fn update_except(primary_key: impl Into<String>) -> QbResult<Self> {
        let primary_key = primary_key.into();
        validate_name("Primary key", &primary_key)?;
        Ok(Self { primary_key })
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }
}

/// INSERT query builder. Single table only.
#[derive(Clone, Debug)]
pub struct InsertQuery {
    core: QueryCore,
    values: IndexMap<String, Literal>,
    on_duplicate: Option<OnDuplicateKey>,
}

impl InsertQuery {
    /// Create a new INSERT. Fails if more than one table is given.
    pub fn new(tables: impl IntoTables) -> QbResult<Self> {
        let tables = tables.into_tables()?;
        check_single_table(&tables)?;
        Ok(Self {
            core: QueryCore::new(tables),
            values: IndexMap::new(),
            on_duplicate: None,
        })
    }

    /// Set one column value. Setting a column again keeps its original position.
    pub fn with_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> QbResult<&mut Self> {
        let name = name.into();
        validate_name("Column", &name)?;
        self.values.insert(name, Literal::new(value));
        self.core.invalidate();
        Ok(self)
    }

    /// Replace all column values, keeping the given order.
    pub fn set_values<I, K, V>(&mut self, values: I) -> QbResult<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut map = IndexMap::new();
        for (name, value) in values {
            let name = name.into();
            validate_name("Column", &name)?;
            map.insert(name, Literal::new(value));
        }
        self.values = map;
        self.core.invalidate();
        Ok(self)
    }

    /// Enable or disable `ON DUPLICATE KEY UPDATE`.
    pub fn set_on_duplicate_key(&mut self, mode: Option<OnDuplicateKey>) -> &mut Self {
        self.on_duplicate = mode;
        self.core.invalidate();
        self
    }

    /// Column names and their values, in insertion order.
    pub fn show_values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.value()))
    }

    fn render_on_duplicate(&self, mode: &OnDuplicateKey) -> QbResult<String> {
        let mut parts = Vec::new();
        for name in self.values.keys().filter(|k| k.as_str() != mode.primary_key) {
            let mut part = String::new();
            write_quoted(&mut part, name);
            part.push_str(" = VALUES(");
            write_quoted(&mut part, name);
            part.push(')');
            parts.push(part);
        }
        if parts.is_empty() {
            return Err(QbError::state(
                "ON DUPLICATE KEY UPDATE needs at least one non-primary-key column",
            ));
        }
        Ok(format!(" ON DUPLICATE KEY UPDATE {}", parts.join(", ")))
    }
}

fn check_single_table(tables: &[TableRef]) -> QbResult<()> {
    if tables.len() != 1 {
        return Err(QbError::invalid_argument(
            "INSERT can be used only on the single table",
        ));
    }
    Ok(())
}

impl Statement for InsertQuery {
    fn kind(&self) -> StatementKind {
        StatementKind::Insert
    }

    fn core(&self) -> &QueryCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut QueryCore {
        &mut self.core
    }

    fn check_tables(&self, tables: &[TableRef]) -> QbResult<()> {
        check_single_table(tables)
    }

    fn write_sql(&self, params: &mut ParamBag) -> QbResult<String> {
        let mut sql = String::from("INSERT INTO ");
        self.core.tables[0].write_sql(&mut sql);

        let mut columns = Vec::with_capacity(self.values.len());
        let mut placeholders = Vec::with_capacity(self.values.len());
        for (name, value) in &self.values {
            let mut col = String::new();
            write_quoted(&mut col, name);
            columns.push(col);
            placeholders.push(value.render(params));
        }
        sql.push_str(&format!(
            " ({}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        ));

        if let Some(mode) = &self.on_duplicate {
            sql.push_str(&self.render_on_duplicate(mode)?);
        }
        Ok(sql)
    }
}
