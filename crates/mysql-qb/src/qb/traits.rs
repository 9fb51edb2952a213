//! Trait shared by all statement builders.

use crate::error::{QbError, QbResult};
use crate::ident::{IntoTables, TableRef};
use crate::qb::core::{QueryCore, Rendered, StatementKind};
use crate::qb::param::ParamBag;
use crate::qb::predicate::Predicate;

/// Longest SQL text emitted in render logs.
#[cfg(feature = "tracing")]
const MAX_LOGGED_SQL: usize = 200;

#[cfg(feature = "tracing")]
fn truncate_sql(sql: &str, max: usize) -> std::borrow::Cow<'_, str> {
    if sql.len() <= max {
        return std::borrow::Cow::Borrowed(sql);
    }
    let mut end = max;
    while !sql.is_char_boundary(end) {
        end -= 1;
    }
    std::borrow::Cow::Owned(format!("{}...", &sql[..end]))
}

/// Base trait for statement builders.
///
/// Implementors provide the clause assembly ([`Statement::write_sql`]); the
/// trait supplies the memoised render, the parameter accessor and the
/// table-list bookkeeping.
pub trait Statement {
    fn kind(&self) -> StatementKind;

    #[doc(hidden)]
    fn core(&self) -> &QueryCore;

    #[doc(hidden)]
    fn core_mut(&mut self) -> &mut QueryCore;

    /// Assemble the statement text, binding literals into `params` in clause order.
    fn write_sql(&self, params: &mut ParamBag) -> QbResult<String>;

    /// Highest table ordinal referenced by kind-specific state (select list, SET
    /// pairs, delete targets, ...).
    fn payload_max_table(&self) -> Option<usize> {
        None
    }

    /// Kind-specific checks on a replacement table list.
    fn check_tables(&self, _tables: &[TableRef]) -> QbResult<()> {
        Ok(())
    }

    /// Render from scratch, bypassing (and not touching) the memo.
    fn build(&self) -> QbResult<Rendered> {
        let mut params = ParamBag::new();
        let sql = self.write_sql(&mut params)?;
        Ok(Rendered { sql, params })
    }

    /// Render if the memo is stale, and return the memoised output.
    fn render(&mut self) -> QbResult<&Rendered> {
        if self.core().cached().is_none() {
            let rendered = self.build()?;
            #[cfg(feature = "tracing")]
            tracing::debug!(
                target: "mysql_qb.render",
                kind = %self.kind(),
                params = rendered.params.len(),
                sql = %truncate_sql(&rendered.sql, MAX_LOGGED_SQL),
                "rendered statement"
            );
            self.core_mut().cache = Some(rendered);
        } else {
            #[cfg(feature = "tracing")]
            tracing::trace!(target: "mysql_qb.render", kind = %self.kind(), "using cached SQL");
        }
        self.core()
            .cached()
            .ok_or_else(|| QbError::state("statement could not be rendered"))
    }

    /// SQL text with `:pN` placeholders.
    fn sql(&mut self) -> QbResult<&str> {
        Ok(&self.render()?.sql)
    }

    /// Parameters of the last render.
    ///
    /// This does not render: call [`Statement::sql`] first, and again after any
    /// modification.
    fn parameters(&self) -> QbResult<&ParamBag> {
        self.core()
            .cached()
            .map(|r| &r.params)
            .ok_or_else(|| {
                QbError::state("sql() should be called before calling parameters()")
            })
    }

    /// Raw table names, in table-list order.
    fn show_tables(&self) -> Vec<&str> {
        self.core().tables().iter().map(TableRef::name).collect()
    }

    /// The attached WHERE predicate.
    fn show_conditions(&self) -> Option<&Predicate> {
        self.core().where_clause.as_ref()
    }

    /// Replace the table list.
    ///
    /// Fails without modifying the statement if an attached node references a
    /// table ordinal the new list does not have.
    fn set_tables(&mut self, tables: impl IntoTables) -> QbResult<&mut Self>
    where
        Self: Sized,
    {
        let tables = tables.into_tables()?;
        self.check_tables(&tables)?;
        let referenced = self.core().max_table().max(self.payload_max_table());
        QueryCore::check_ordinal_in(&tables, referenced)?;
        let core = self.core_mut();
        core.tables = tables;
        core.invalidate();
        Ok(self)
    }
}
