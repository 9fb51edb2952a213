//! UPDATE statement builder.

use crate::error::{QbError, QbResult};
use crate::ident::{IntoTables, TableRef};
use crate::qb::core::{QueryCore, StatementKind};
use crate::qb::expr::{Column, Expression, RenderContext, RenderScope, reject_wildcard};
use crate::qb::param::{Literal, ParamBag};
use crate::qb::predicate::Predicate;
use crate::qb::traits::Statement;
use crate::value::Value;

/// Right-hand side of a SET pair.
#[derive(Clone, Debug, PartialEq)]
pub enum SetValue {
    /// Bound literal
    Value(Literal),
    /// Expression, e.g. another column
    Expr(Expression),
}

impl SetValue {
    pub fn value(value: impl Into<Value>) -> Self {
        SetValue::Value(Literal::new(value))
    }

    fn max_table(&self) -> Option<usize> {
        match self {
            SetValue::Value(_) => None,
            SetValue::Expr(e) => e.max_table(),
        }
    }
}

impl From<Literal> for SetValue {
    fn from(l: Literal) -> Self {
        SetValue::Value(l)
    }
}

impl From<Expression> for SetValue {
    fn from(e: Expression) -> Self {
        SetValue::Expr(e)
    }
}

impl From<Column> for SetValue {
    fn from(c: Column) -> Self {
        SetValue::Expr(c.into())
    }
}

/// UPDATE query builder.
///
/// Rendering fails while no SET pair is present. ORDER BY and LIMIT are only
/// available on single-table updates.
#[derive(Clone, Debug)]
pub struct UpdateQuery {
    core: QueryCore,
    sets: Vec<(Column, SetValue)>,
}

impl UpdateQuery {
    /// Create a new UPDATE over one or more tables.
    pub fn new(tables: impl IntoTables) -> QbResult<Self> {
        Ok(Self {
            core: QueryCore::new(tables.into_tables()?),
            sets: Vec::new(),
        })
    }

    /// `` SET `t0`.`name` = :pN `` on the first table.
    pub fn with_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> QbResult<&mut Self> {
        self.set(Column::new(name)?, SetValue::value(value))
    }

    /// Set a column of any table to a value or expression. Setting the same
    /// column again replaces the earlier pair in place. A wildcard value is rejected.
    pub fn set(&mut self, column: Column, value: impl Into<SetValue>) -> QbResult<&mut Self> {
        let value = value.into();
        if let SetValue::Expr(e) = &value {
            reject_wildcard(e, "a SET value")?;
        }
        self.core
            .check_ordinal(Some(column.table()).max(value.max_table()))?;
        let existing = self
            .sets
            .iter()
            .position(|(c, _)| c.name() == column.name() && c.table() == column.table());
        match existing {
            Some(i) => self.sets[i].1 = value,
            None => self.sets.push((column, value)),
        }
        self.core.invalidate();
        Ok(self)
    }

    /// Replace all SET pairs.
    pub fn set_values<I, V>(&mut self, pairs: I) -> QbResult<&mut Self>
    where
        I: IntoIterator<Item = (Column, V)>,
        V: Into<SetValue>,
    {
        let previous = std::mem::take(&mut self.sets);
        for (column, value) in pairs {
            if let Err(err) = self.set(column, value).map(|_| ()) {
                self.sets = previous;
                return Err(err);
            }
        }
        self.core.invalidate();
        Ok(self)
    }

    /// Set or clear the WHERE predicate.
    pub fn set_where(&mut self, predicate: Option<Predicate>) -> QbResult<&mut Self> {
        self.core.set_where(predicate)?;
        Ok(self)
    }

    /// ORDER BY items (single-table updates only).
    pub fn set_order_by(
        &mut self,
        items: Vec<Expression>,
        descending: &[bool],
    ) -> QbResult<&mut Self> {
        self.core
            .require_single_table(StatementKind::Update, "ORDER BY")?;
        self.core.set_order_by(items, descending)?;
        Ok(self)
    }

    /// Maximum number of rows to update (single-table updates only).
    ///
    /// MySQL does not accept an offset here.
    pub fn set_limit(&mut self, limit: u64) -> QbResult<&mut Self> {
        self.core.require_single_table(StatementKind::Update, "LIMIT")?;
        if limit < 1 {
            return Err(QbError::invalid_argument(
                "LIMIT of an UPDATE must be greater than zero",
            ));
        }
        self.core.set_limit(limit, 0);
        Ok(self)
    }

    pub fn show_sets(&self) -> &[(Column, SetValue)] {
        &self.sets
    }

    fn render_set(&self, scope: &RenderScope, params: &mut ParamBag) -> QbResult<String> {
        if self.sets.is_empty() {
            return Err(QbError::state("Empty update-queries are forbidden"));
        }
        let parts: Vec<String> = self
            .sets
            .iter()
            .map(|(column, value)| {
                let target = column.render(scope, RenderContext::Operand);
                let value = match value {
                    SetValue::Value(lit) => lit.render(params),
                    SetValue::Expr(e) => e.render(scope, RenderContext::Operand, params),
                };
                format!("{target} = {value}")
            })
            .collect();
        Ok(format!(" SET {}", parts.join(", ")))
    }
}

impl Statement for UpdateQuery {
    fn kind(&self) -> StatementKind {
        StatementKind::Update
    }

    fn core(&self) -> &QueryCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut QueryCore {
        &mut self.core
    }

    fn payload_max_table(&self) -> Option<usize> {
        self.sets
            .iter()
            .filter_map(|(c, v)| Some(c.table()).max(v.max_table()))
            .max()
    }

    fn check_tables(&self, tables: &[TableRef]) -> QbResult<()> {
        let restricted = !self.core.order_by.is_empty() || self.core.limit.is_some();
        if restricted && tables.len() != 1 {
            return Err(QbError::state(
                "ORDER BY and LIMIT are allowed only in single-table UPDATE queries",
            ));
        }
        Ok(())
    }

    fn write_sql(&self, params: &mut ParamBag) -> QbResult<String> {
        let scope = RenderScope::Aliased;
        let mut sql = format!("UPDATE {}", self.core.aliased_tables(""));
        sql.push_str(&self.render_set(&scope, params)?);
        sql.push_str(&self.core.render_where(&scope, params));
        sql.push_str(&self.core.render_order_by(&scope, params));
        sql.push_str(&self.core.render_row_limit());
        Ok(sql)
    }
}
