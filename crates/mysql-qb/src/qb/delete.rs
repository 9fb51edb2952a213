//! DELETE statement builder.

use crate::error::{QbError, QbResult};
use crate::ident::{IntoTables, TableRef};
use crate::qb::core::{QueryCore, StatementKind};
use crate::qb::expr::{Expression, RenderScope, table_alias};
use crate::qb::param::ParamBag;
use crate::qb::predicate::Predicate;
use crate::qb::traits::Statement;

/// DELETE query builder.
///
/// A single-table DELETE renders without aliases, so its columns are qualified
/// by the table name itself:
///
/// ```text
/// DELETE FROM `test` WHERE `test`.`id` = :p1 LIMIT 1
/// ```
///
/// With more than one table the rows are removed from the *target* tables
/// (by default only table 0) while the full list is joined in `USING`:
///
/// ```text
/// DELETE FROM `t0`, `t2` USING `a` AS `t0`, `b` AS `t1`, `c` AS `t2` WHERE ...
/// ```
///
/// There is no `set_having`: MySQL's DELETE has no GROUP BY, so a HAVING clause
/// is not valid there. Filter with [`DeleteQuery::set_where`] instead.
#[derive(Clone, Debug)]
pub struct DeleteQuery {
    core: QueryCore,
    targets: Vec<usize>,
}

impl DeleteQuery {
    /// Create a new DELETE over one or more tables.
    pub fn new(tables: impl IntoTables) -> QbResult<Self> {
        Ok(Self {
            core: QueryCore::new(tables.into_tables()?),
            targets: vec![0],
        })
    }

    /// Ordinals of the tables rows are removed from.
    pub fn set_targets(&mut self, targets: Vec<usize>) -> QbResult<&mut Self> {
        if targets.is_empty() {
            return Err(QbError::invalid_argument(
                "DELETE needs at least one target table",
            ));
        }
        self.core.check_ordinal(targets.iter().copied().max())?;
        for (i, t) in targets.iter().enumerate() {
            if targets[..i].contains(t) {
                return Err(QbError::invalid_argument(format!(
                    "table ordinal {t} is listed twice as a DELETE target"
                )));
            }
        }
        self.targets = targets;
        self.core.invalidate();
        Ok(self)
    }

    /// Set or clear the WHERE predicate.
    pub fn set_where(&mut self, predicate: Option<Predicate>) -> QbResult<&mut Self> {
        self.core.set_where(predicate)?;
        Ok(self)
    }

    /// ORDER BY items (single-table deletes only).
    pub fn set_order_by(
        &mut self,
        items: Vec<Expression>,
        descending: &[bool],
    ) -> QbResult<&mut Self> {
        self.core
            .require_single_table(StatementKind::Delete, "ORDER BY")?;
        self.core.set_order_by(items, descending)?;
        Ok(self)
    }

    /// Maximum number of rows to delete (single-table deletes only).
    pub fn set_limit(&mut self, limit: u64) -> QbResult<&mut Self> {
        self.core.require_single_table(StatementKind::Delete, "LIMIT")?;
        if limit < 1 {
            return Err(QbError::invalid_argument(
                "LIMIT of a DELETE must be greater than zero",
            ));
        }
        self.core.set_limit(limit, 0);
        Ok(self)
    }

    pub fn show_targets(&self) -> &[usize] {
        &self.targets
    }

    fn write_single(&self, params: &mut ParamBag) -> String {
        let table = &self.core.tables[0];
        let scope = RenderScope::Named(vec![table.to_sql()]);
        let mut sql = String::from("DELETE FROM ");
        table.write_sql(&mut sql);
        sql.push_str(&self.core.render_where(&scope, params));
        sql.push_str(&self.core.render_order_by(&scope, params));
        sql.push_str(&self.core.render_row_limit());
        sql
    }

    fn write_multi(&self, params: &mut ParamBag) -> String {
        let scope = RenderScope::Aliased;
        let targets: Vec<String> = self.targets.iter().map(|&t| table_alias(t)).collect();
        let mut sql = format!(
            "DELETE FROM {} USING {}",
            targets.join(", "),
            self.core.aliased_tables("")
        );
        sql.push_str(&self.core.render_where(&scope, params));
        sql
    }
}

impl Statement for DeleteQuery {
    fn kind(&self) -> StatementKind {
        StatementKind::Delete
    }

    fn core(&self) -> &QueryCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut QueryCore {
        &mut self.core
    }

    fn payload_max_table(&self) -> Option<usize> {
        self.targets.iter().copied().max()
    }

    fn check_tables(&self, tables: &[TableRef]) -> QbResult<()> {
        let restricted = !self.core.order_by.is_empty() || self.core.limit.is_some();
        if restricted && tables.len() != 1 {
            return Err(QbError::state(
                "ORDER BY and LIMIT are allowed only in single-table DELETE queries",
            ));
        }
        Ok(())
    }

    fn write_sql(&self, params: &mut ParamBag) -> QbResult<String> {
        if self.core.tables.len() == 1 {
            Ok(self.write_single(params))
        } else {
            Ok(self.write_multi(params))
        }
    }
}
