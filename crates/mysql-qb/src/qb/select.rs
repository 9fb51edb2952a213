//! SELECT statement builder.

use crate::error::{QbError, QbResult};
use crate::ident::{IntoTables, validate_name, write_quoted};
use crate::qb::core::{
    QueryCore, StatementKind, check_reference_items, render_predicate, render_reference_list,
};
use crate::qb::expr::{Expression, RenderContext, RenderScope, Wildcard};
use crate::qb::param::ParamBag;
use crate::qb::predicate::Predicate;
use crate::qb::traits::Statement;

/// SELECT query builder.
///
/// By default it selects `` `t0`.* `` from all given tables, each aliased by
/// position (`` `t0` ``, `` `t1` ``, ...).
#[derive(Clone, Debug)]
pub struct SelectQuery {
    core: QueryCore,
    select: Vec<Expression>,
    distinct: bool,
    indices: Vec<String>,
    group_by: Vec<Expression>,
    having: Option<Predicate>,
}

impl SelectQuery {
    /// Create a new SELECT over one or more tables.
    pub fn new(tables: impl IntoTables) -> QbResult<Self> {
        Ok(Self {
            core: QueryCore::new(tables.into_tables()?),
            select: vec![Wildcard::new(0).into()],
            distinct: false,
            indices: Vec::new(),
            group_by: Vec::new(),
            having: None,
        })
    }

    /// Set the select list; `distinct` switches to `SELECT DISTINCT`.
    pub fn set_select(&mut self, items: Vec<Expression>, distinct: bool) -> QbResult<&mut Self> {
        if items.is_empty() {
            return Err(QbError::invalid_argument("Nothing to select"));
        }
        self.core
            .check_ordinal(items.iter().filter_map(Expression::max_table).max())?;
        self.select = items;
        self.distinct = distinct;
        self.core.invalidate();
        Ok(self)
    }

    /// Toggle `SELECT DISTINCT` without touching the select list.
    pub fn set_distinct(&mut self, distinct: bool) -> &mut Self {
        self.distinct = distinct;
        self.core.invalidate();
        self
    }

    /// Preferred indexes for the first table (`USE INDEX (...)`). An empty list clears the hint.
    pub fn set_indices<I, S>(&mut self, indices: I) -> QbResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let indices: Vec<String> = indices.into_iter().map(Into::into).collect();
        for idx in &indices {
            validate_name("Index", idx)?;
        }
        self.indices = indices;
        self.core.invalidate();
        Ok(self)
    }

    /// GROUP BY items. Aliased items render as their alias. An empty list clears the clause.
    pub fn set_group_by(&mut self, items: Vec<Expression>) -> QbResult<&mut Self> {
        check_reference_items("GROUP BY", &items)?;
        self.core
            .check_ordinal(items.iter().filter_map(Expression::max_table).max())?;
        self.group_by = items;
        self.core.invalidate();
        Ok(self)
    }

    /// Set or clear the WHERE predicate.
    pub fn set_where(&mut self, predicate: Option<Predicate>) -> QbResult<&mut Self> {
        self.core.set_where(predicate)?;
        Ok(self)
    }

    /// Set or clear the HAVING predicate.
    pub fn set_having(&mut self, predicate: Option<Predicate>) -> QbResult<&mut Self> {
        self.core
            .check_ordinal(predicate.as_ref().and_then(Predicate::max_table))?;
        self.having = predicate;
        self.core.invalidate();
        Ok(self)
    }

    /// ORDER BY items; `descending[i]` selects DESC for item `i`, missing entries mean ASC.
    pub fn set_order_by(
        &mut self,
        items: Vec<Expression>,
        descending: &[bool],
    ) -> QbResult<&mut Self> {
        self.core.set_order_by(items, descending)?;
        Ok(self)
    }

    /// `LIMIT limit OFFSET offset`; a zero limit renders no clause.
    pub fn set_limit(&mut self, limit: u64, offset: u64) -> &mut Self {
        self.core.set_limit(limit, offset);
        self
    }

    pub fn show_select(&self) -> &[Expression] {
        &self.select
    }

    pub fn show_group_by(&self) -> &[Expression] {
        &self.group_by
    }

    pub fn show_having(&self) -> Option<&Predicate> {
        self.having.as_ref()
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    fn render_select(&self, scope: &RenderScope, params: &mut ParamBag) -> String {
        let items: Vec<String> = self
            .select
            .iter()
            .map(|e| e.render(scope, RenderContext::Projection, params))
            .collect();
        let distinct = if self.distinct { "DISTINCT " } else { "" };
        format!("SELECT {distinct}{}", items.join(", "))
    }

    fn render_indices(&self) -> String {
        if self.indices.is_empty() {
            return String::new();
        }
        let mut out = String::from(" USE INDEX (");
        for (i, idx) in self.indices.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write_quoted(&mut out, idx);
        }
        out.push(')');
        out
    }

    fn render_limit(&self) -> String {
        match self.core.limit {
            Some(limit) if limit.count > 0 => {
                format!(" LIMIT {} OFFSET {}", limit.count, limit.offset)
            }
            _ => String::new(),
        }
    }
}

impl Statement for SelectQuery {
    fn kind(&self) -> StatementKind {
        StatementKind::Select
    }

    fn core(&self) -> &QueryCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut QueryCore {
        &mut self.core
    }

    fn payload_max_table(&self) -> Option<usize> {
        let exprs = self.select.iter().chain(&self.group_by);
        let from_exprs = exprs.filter_map(Expression::max_table).max();
        let from_having = self.having.as_ref().and_then(Predicate::max_table);
        from_exprs.max(from_having)
    }

    fn write_sql(&self, params: &mut ParamBag) -> QbResult<String> {
        let scope = RenderScope::Aliased;
        let mut sql = self.render_select(&scope, params);
        sql.push_str(&self.core.render_from(&self.render_indices()));
        sql.push_str(&self.core.render_where(&scope, params));
        sql.push_str(&render_reference_list(" GROUP BY ", &self.group_by, &scope, params));
        sql.push_str(&render_predicate(" HAVING ", self.having.as_ref(), &scope, params));
        sql.push_str(&self.core.render_order_by(&scope, params));
        sql.push_str(&self.render_limit());
        Ok(sql)
    }
}
