//! # mysql-qb
//!
//! A typed statement builder for MySQL.
//!
//! ## Features
//!
//! - **Parameterized only**: literals are bound to `:pN` placeholders, never inlined
//! - **Typed nodes**: columns, functions, aggregates and predicates are values you
//!   construct once and attach to as many statements as you like
//! - **Multi-table aware**: tables are addressed by position and aliased `` `tN` ``
//! - **Safe identifiers**: every table, column and alias is backtick-quoted
//! - **No execution layer**: the output is SQL text plus a [`ParamBag`] that any
//!   MySQL client with named parameters can consume
//!
//! ## Query Builder (qb)
//!
//! ```
//! use mysql_qb::prelude::*;
//!
//! let user = Column::new("user")?;
//! let url = Column::new("very_long_identifier")?.with_alias("url")?;
//! let count = Aggregate::new(AggregateFn::Count, user)?
//!     .distinct(true)
//!     .with_alias("c")?;
//!
//! let mut q = qb::select("test")?;
//! q.set_select(vec![count.clone().into(), url.clone().into()], false)?
//!     .set_group_by(vec![count.into()])?
//!     .set_order_by(vec![url.into()], &[false])?;
//!
//! assert_eq!(
//!     q.sql()?,
//!     "SELECT COUNT(DISTINCT `t0`.`user`) AS `c`, `t0`.`very_long_identifier` AS `url` \
//!      FROM `test` AS `t0` GROUP BY `c` ORDER BY `url` ASC"
//! );
//! # Ok::<(), mysql_qb::QbError>(())
//! ```

pub mod error;
pub mod ident;
pub mod prelude;
pub mod qb;
pub mod value;

pub use error::{QbError, QbResult};
pub use ident::{IntoTable, IntoTables, TableRef};
pub use value::Value;

// Re-export the builders for easy access
pub use qb::{
    DeleteQuery, InsertQuery, Predicate, Rendered, SelectQuery, Statement, UpdateQuery, delete,
    insert, select, update,
};
