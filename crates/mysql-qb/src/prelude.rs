//! Commonly used types, for glob import.

pub use crate::error::{QbError, QbResult};
pub use crate::ident::TableRef;
pub use crate::qb::{
    self, Aggregate, AggregateFn, BoolKind, Column, Comparator, Comparison, DeleteQuery,
    Expression, FunctionArg, FunctionCall, InsertQuery, OnDuplicateKey, Predicate, SelectQuery,
    SetValue, SqlFunction, Statement, UpdateQuery, Wildcard,
};
pub use crate::value::Value;
