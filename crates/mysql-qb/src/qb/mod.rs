//! Statement builders for MySQL.
//!
//! Every statement works over an ordered list of tables. Expression nodes
//! address tables by ordinal, and the renderer aliases table `N` as
//! `` `tN` ``. Literals are never written into the SQL text. Each one becomes a
//! `:pN` placeholder, and its value goes into the statement's [`ParamBag`].
//!
//! # Features
//!
//! - **Reusable nodes**: columns, functions, aggregates and predicates are
//!   immutable and can be attached to several statements
//! - **Deterministic numbering**: placeholders are numbered from `:p1` in the
//!   order clauses are emitted, on every render
//! - **Memoised rendering**: `sql()` renders once; any setter invalidates the memo
//!
//! # Usage
//!
//! ```
//! use mysql_qb::qb::{self, Column, Comparison, Statement};
//!
//! let mut q = qb::select("test")?;
//! q.set_where(Some(Comparison::eq(Column::new("somefield")?, 35)?.into()))?
//!     .set_limit(10, 2);
//!
//! assert_eq!(
//!     q.sql()?,
//!     "SELECT `t0`.* FROM `test` AS `t0` WHERE `t0`.`somefield` = :p1 LIMIT 10 OFFSET 2"
//! );
//! assert_eq!(q.parameters()?.len(), 1);
//! # Ok::<(), mysql_qb::QbError>(())
//! ```

mod core;
mod delete;
mod expr;
mod insert;
mod param;
mod predicate;
mod select;
mod traits;
mod update;

pub use self::core::{Limit, OrderItem, QueryCore, Rendered, StatementKind};
pub use delete::DeleteQuery;
pub use expr::{
    Aggregate, AggregateFn, Column, Expression, FunctionArg, FunctionCall, RenderContext,
    RenderScope, SqlFunction, Wildcard,
};
pub use insert::{InsertQuery, OnDuplicateKey};
pub use param::{Literal, PLACEHOLDER_PREFIX, ParamBag};
pub use predicate::{
    BoolKind, BooleanOp, Comparator, Comparison, Operand, Predicate, PredicateNode,
};
pub use select::SelectQuery;
pub use traits::Statement;
pub use update::{SetValue, UpdateQuery};

use crate::error::QbResult;
use crate::ident::IntoTables;

/// Create a SELECT over the given tables.
///
/// # Example
/// ```
/// let q = mysql_qb::qb::select(["users", "orders"])?;
/// # Ok::<(), mysql_qb::QbError>(())
/// ```
pub fn select(tables: impl IntoTables) -> QbResult<SelectQuery> {
    SelectQuery::new(tables)
}

/// Create an INSERT into a single table.
pub fn insert(table: impl IntoTables) -> QbResult<InsertQuery> {
    InsertQuery::new(table)
}

/// Create an UPDATE over the given tables.
pub fn update(tables: impl IntoTables) -> QbResult<UpdateQuery> {
    UpdateQuery::new(tables)
}

/// Create a DELETE over the given tables.
///
/// Unlike SELECT, a DELETE without WHERE is rendered as-is and removes every row.
pub fn delete(tables: impl IntoTables) -> QbResult<DeleteQuery> {
    DeleteQuery::new(tables)
}
