//! State and clause renderers shared by every statement kind.

use crate::error::{QbError, QbResult};
use crate::ident::TableRef;
use crate::qb::expr::{Expression, RenderContext, RenderScope, table_alias};
use crate::qb::param::ParamBag;
use crate::qb::predicate::Predicate;
use std::fmt;

/// The four statement kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        })
    }
}

/// A rendered statement: SQL text plus the parameters its placeholders refer to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rendered {
    pub sql: String,
    pub params: ParamBag,
}

/// One ORDER BY item.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderItem {
    pub expr: Expression,
    pub descending: bool,
}

/// LIMIT / OFFSET pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limit {
    pub count: u64,
    pub offset: u64,
}

/// Fail unless every item can appear in GROUP BY / ORDER BY.
pub(crate) fn check_reference_items(clause: &str, items: &[Expression]) -> QbResult<()> {
    if items.iter().any(Expression::is_wildcard) {
        return Err(QbError::invalid_argument(format!(
            "a wildcard cannot be used in {clause}"
        )));
    }
    Ok(())
}

/// Common statement state: tables, WHERE, ORDER BY, LIMIT and the render memo.
#[derive(Clone, Debug)]
pub struct QueryCore {
    pub(crate) tables: Vec<TableRef>,
    pub(crate) where_clause: Option<Predicate>,
    pub(crate) order_by: Vec<OrderItem>,
    pub(crate) limit: Option<Limit>,
    pub(crate) cache: Option<Rendered>,
}

impl QueryCore {
    pub(crate) fn new(tables: Vec<TableRef>) -> Self {
        Self {
            tables,
            where_clause: None,
            order_by: Vec::new(),
            limit: None,
            cache: None,
        }
    }

    pub fn tables(&self) -> &[TableRef] {
        &self.tables
    }

    /// Memoised output of the last render, if still valid.
    pub fn cached(&self) -> Option<&Rendered> {
        self.cache.as_ref()
    }

    /// Drop the memo so the next render starts from scratch.
    pub(crate) fn invalidate(&mut self) {
        if self.cache.take().is_some() {
            #[cfg(feature = "tracing")]
            tracing::trace!(target: "mysql_qb.render", "statement modified, cached SQL dropped");
        }
    }

    /// Fail if `ordinal` does not name one of `tables`.
    pub(crate) fn check_ordinal_in(tables: &[TableRef], ordinal: Option<usize>) -> QbResult<()> {
        match ordinal {
            Some(n) if n >= tables.len() => Err(QbError::invalid_argument(format!(
                "table ordinal {n} is out of range: the statement has {} table(s)",
                tables.len()
            ))),
            _ => Ok(()),
        }
    }

    pub(crate) fn check_ordinal(&self, ordinal: Option<usize>) -> QbResult<()> {
        Self::check_ordinal_in(&self.tables, ordinal)
    }

    pub(crate) fn require_single_table(&self, kind: StatementKind, what: &str) -> QbResult<()> {
        if self.tables.len() != 1 {
            return Err(QbError::state(format!(
                "{what} is allowed only in single-table {kind} queries"
            )));
        }
        Ok(())
    }

    /// Highest ordinal referenced by WHERE and ORDER BY.
    pub(crate) fn max_table(&self) -> Option<usize> {
        let from_where = self.where_clause.as_ref().and_then(Predicate::max_table);
        let from_order = self.order_by.iter().filter_map(|o| o.expr.max_table()).max();
        from_where.max(from_order)
    }

    pub(crate) fn set_where(&mut self, predicate: Option<Predicate>) -> QbResult<()> {
        self.check_ordinal(predicate.as_ref().and_then(Predicate::max_table))?;
        self.where_clause = predicate;
        self.invalidate();
        Ok(())
    }

    /// Pair each item with its direction; missing directions mean ascending.
    pub(crate) fn set_order_by(
        &mut self,
        items: Vec<Expression>,
        descending: &[bool],
    ) -> QbResult<()> {
        check_reference_items("ORDER BY", &items)?;
        self.check_ordinal(items.iter().filter_map(Expression::max_table).max())?;
        self.order_by = items
            .into_iter()
            .enumerate()
            .map(|(i, expr)| OrderItem {
                expr,
                descending: descending.get(i).copied().unwrap_or(false),
            })
            .collect();
        self.invalidate();
        Ok(())
    }

    pub(crate) fn set_limit(&mut self, count: u64, offset: u64) {
        self.limit = Some(Limit { count, offset });
        self.invalidate();
    }

    /// `` `a` AS `t0`, `b` AS `t1` ``, with an optional suffix after table 0.
    pub(crate) fn aliased_tables(&self, first_suffix: &str) -> String {
        let mut out = String::new();
        for (i, table) in self.tables.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            table.write_sql(&mut out);
            out.push_str(" AS ");
            out.push_str(&table_alias(i));
            if i == 0 {
                out.push_str(first_suffix);
            }
        }
        out
    }

    pub(crate) fn render_from(&self, first_suffix: &str) -> String {
        format!(" FROM {}", self.aliased_tables(first_suffix))
    }

    pub(crate) fn render_where(&self, scope: &RenderScope, params: &mut ParamBag) -> String {
        render_predicate(" WHERE ", self.where_clause.as_ref(), scope, params)
    }

    pub(crate) fn render_order_by(&self, scope: &RenderScope, params: &mut ParamBag) -> String {
        if self.order_by.is_empty() {
            return String::new();
        }
        let items: Vec<String> = self
            .order_by
            .iter()
            .map(|item| {
                let expr = item.expr.render(scope, RenderContext::Reference, params);
                let dir = if item.descending { " DESC" } else { " ASC" };
                format!("{expr}{dir}")
            })
            .collect();
        format!(" ORDER BY {}", items.join(", "))
    }

    /// ` LIMIT n` as used by UPDATE and DELETE.
    pub(crate) fn render_row_limit(&self) -> String {
        match self.limit {
            Some(Limit { count, .. }) => format!(" LIMIT {count}"),
            None => String::new(),
        }
    }
}

pub(crate) fn render_predicate(
    keyword: &str,
    predicate: Option<&Predicate>,
    scope: &RenderScope,
    params: &mut ParamBag,
) -> String {
    match predicate {
        Some(p) => {
            let sql = p.render(scope, params);
            if sql.is_empty() {
                String::new()
            } else {
                format!("{keyword}{sql}")
            }
        }
        None => String::new(),
    }
}

pub(crate) fn render_reference_list(
    keyword: &str,
    items: &[Expression],
    scope: &RenderScope,
    params: &mut ParamBag,
) -> String {
    if items.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = items
        .iter()
        .map(|e| e.render(scope, RenderContext::Reference, params))
        .collect();
    format!("{keyword}{}", parts.join(", "))
}
