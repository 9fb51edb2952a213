//! Value-producing expression nodes.
//!
//! Columns are bound to a table *ordinal* (position in the statement's table
//! list), never to a table name, so the same node can be reused by any
//! statement whose table list has a table at that position.
//!
//! Rendering depends on where the expression appears (see [`RenderContext`]):
//!
//! | context      | aliased column                 | plain column      |
//! |--------------|--------------------------------|-------------------|
//! | `Projection` | `` `t0`.`id` AS `a` ``         | `` `t0`.`id` ``   |
//! | `Operand`    | `` `t0`.`id` ``                | `` `t0`.`id` ``   |
//! | `Reference`  | `` `a` ``                      | `` `t0`.`id` ``   |

use crate::error::{QbError, QbResult};
use crate::ident::{quote, validate_name, write_quoted};
use crate::qb::param::{Literal, ParamBag};
use crate::value::Value;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Where an expression is being rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderContext {
    /// SELECT list: full expression followed by `AS alias`.
    Projection,
    /// Comparison operand, function argument, SET target: full expression, no alias.
    Operand,
    /// GROUP BY / ORDER BY item: the bare alias when one is set.
    Reference,
}

/// Maps table ordinals to the qualifier used in front of column names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RenderScope {
    /// Positional aliases: ordinal `N` renders as `` `tN` ``.
    #[default]
    Aliased,
    /// Explicit qualifiers per ordinal (used where tables are not aliased).
    Named(Vec<String>),
}

impl RenderScope {
    /// The qualifier for a table ordinal.
    pub fn qualifier(&self, ordinal: usize) -> Cow<'_, str> {
        match self {
            RenderScope::Named(names) if ordinal < names.len() => Cow::Borrowed(&names[ordinal]),
            _ => Cow::Owned(table_alias(ordinal)),
        }
    }
}

/// Positional alias of a table: `` `tN` ``.
pub(crate) fn table_alias(ordinal: usize) -> String {
    format!("`t{ordinal}`")
}

fn push_alias(out: &mut String, alias: &Option<String>) {
    if let Some(alias) = alias {
        out.push_str(" AS ");
        write_quoted(out, alias);
    }
}

/// Fail if `expr` is a wildcard, which is only valid as a select-list item.
pub(crate) fn reject_wildcard(expr: &Expression, place: &str) -> QbResult<()> {
    if expr.is_wildcard() {
        return Err(QbError::invalid_argument(format!(
            "a wildcard cannot be used as {place}"
        )));
    }
    Ok(())
}

fn checked_alias(alias: impl Into<String>) -> QbResult<String> {
    let alias = alias.into();
    validate_name("Alias", &alias)?;
    Ok(alias)
}

// ==================== Column ====================

/// A column of one of the statement's tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    name: String,
    table: usize,
    alias: Option<String>,
}

impl Column {
    /// Column of the first table (ordinal 0).
    pub fn new(name: impl Into<String>) -> QbResult<Self> {
        Self::of(name, 0)
    }

    /// Column of the table at `table` in the statement's table list.
    pub fn of(name: impl Into<String>, table: usize) -> QbResult<Self> {
        let name = name.into();
        validate_name("Column", &name)?;
        Ok(Self {
            name,
            table,
            alias: None,
        })
    }

    /// Attach an output alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> QbResult<Self> {
        self.alias = Some(checked_alias(alias)?);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table ordinal.
    pub fn table(&self) -> usize {
        self.table
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn render(&self, scope: &RenderScope, ctx: RenderContext) -> String {
        if let (RenderContext::Reference, Some(alias)) = (ctx, &self.alias) {
            return quote(alias);
        }
        let mut out = String::new();
        out.push_str(&scope.qualifier(self.table));
        out.push('.');
        write_quoted(&mut out, &self.name);
        if ctx == RenderContext::Projection {
            push_alias(&mut out, &self.alias);
        }
        out
    }
}

// ==================== Wildcard ====================

/// All columns of one table: `` `tN`.* ``.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Wildcard {
    table: usize,
}

impl Wildcard {
    pub fn new(table: usize) -> Self {
        Self { table }
    }

    pub fn table(&self) -> usize {
        self.table
    }

    pub fn render(&self, scope: &RenderScope) -> String {
        format!("{}.*", scope.qualifier(self.table))
    }
}

// ==================== SQL functions ====================

/// Scalar SQL functions the builder accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SqlFunction {
    Substring,
    Year,
    Month,
    Day,
    Date,
}

impl SqlFunction {
    /// Lower-case function name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlFunction::Substring => "substring",
            SqlFunction::Year => "year",
            SqlFunction::Month => "month",
            SqlFunction::Day => "day",
            SqlFunction::Date => "date",
        }
    }

    fn keyword(&self) -> &'static str {
        match self {
            SqlFunction::Substring => "SUBSTRING",
            SqlFunction::Year => "YEAR",
            SqlFunction::Month => "MONTH",
            SqlFunction::Day => "DAY",
            SqlFunction::Date => "DATE",
        }
    }
}

impl FromStr for SqlFunction {
    type Err = QbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "substring" => Ok(SqlFunction::Substring),
            "year" => Ok(SqlFunction::Year),
            "month" => Ok(SqlFunction::Month),
            "day" => Ok(SqlFunction::Day),
            "date" => Ok(SqlFunction::Date),
            _ => Err(QbError::invalid_argument(format!("Invalid sql-function: {s}"))),
        }
    }
}

impl fmt::Display for SqlFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A function argument.
#[derive(Clone, Debug, PartialEq)]
pub enum FunctionArg {
    /// Nested expression, rendered in operand form.
    Expr(Expression),
    /// Integer written into the SQL text as-is.
    Int(i64),
    /// Float written into the SQL text as-is. NaN and infinities are bound
    /// instead, as MySQL has no literal for them.
    Float(f64),
    /// Any other literal, bound to a placeholder.
    Bound(Literal),
}

impl FunctionArg {
    /// Bind an arbitrary value as a placeholder argument.
    pub fn bound(value: impl Into<Value>) -> Self {
        FunctionArg::Bound(Literal::new(value))
    }

    fn render(&self, scope: &RenderScope, params: &mut ParamBag) -> String {
        match self {
            FunctionArg::Expr(e) => e.render(scope, RenderContext::Operand, params),
            FunctionArg::Int(v) => v.to_string(),
            FunctionArg::Float(v) if v.is_finite() => v.to_string(),
            FunctionArg::Float(v) => Literal::new(*v).render(params),
            FunctionArg::Bound(lit) => lit.render(params),
        }
    }
}

macro_rules! impl_expr_arg {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for FunctionArg {
                fn from(e: $ty) -> Self {
                    FunctionArg::Expr(e.into())
                }
            }
        )+
    };
}

impl_expr_arg!(Expression, Column, FunctionCall, Aggregate);

impl From<i64> for FunctionArg {
    fn from(v: i64) -> Self {
        FunctionArg::Int(v)
    }
}

impl From<i32> for FunctionArg {
    fn from(v: i32) -> Self {
        FunctionArg::Int(v.into())
    }
}

impl From<f64> for FunctionArg {
    fn from(v: f64) -> Self {
        if v.is_finite() {
            FunctionArg::Float(v)
        } else {
            FunctionArg::bound(v)
        }
    }
}

/// A call to a safelisted scalar function.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall {
    function: SqlFunction,
    args: Vec<FunctionArg>,
    alias: Option<String>,
}

impl FunctionCall {
    /// Fails if an argument is a wildcard.
    pub fn new(function: SqlFunction, args: Vec<FunctionArg>) -> QbResult<Self> {
        for arg in &args {
            if let FunctionArg::Expr(e) = arg {
                reject_wildcard(e, "a function argument")?;
            }
        }
        Ok(Self {
            function,
            args,
            alias: None,
        })
    }

    /// Build from a function name, failing if it is not safelisted.
    pub fn named(name: &str, args: Vec<FunctionArg>) -> QbResult<Self> {
        Self::new(name.parse()?, args)
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> QbResult<Self> {
        self.alias = Some(checked_alias(alias)?);
        Ok(self)
    }

    pub fn function(&self) -> SqlFunction {
        self.function
    }

    /// Lower-case function name.
    pub fn name(&self) -> &'static str {
        self.function.as_str()
    }

    pub fn args(&self) -> &[FunctionArg] {
        &self.args
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn render(&self, scope: &RenderScope, ctx: RenderContext, params: &mut ParamBag) -> String {
        if let (RenderContext::Reference, Some(alias)) = (ctx, &self.alias) {
            return quote(alias);
        }
        let args: Vec<String> = self.args.iter().map(|a| a.render(scope, params)).collect();
        let mut out = format!("{}({})", self.function.keyword(), args.join(", "));
        if ctx == RenderContext::Projection {
            push_alias(&mut out, &self.alias);
        }
        out
    }

    fn max_table(&self) -> Option<usize> {
        self.args
            .iter()
            .filter_map(|a| match a {
                FunctionArg::Expr(e) => e.max_table(),
                _ => None,
            })
            .max()
    }
}

// ==================== Aggregates ====================

/// Aggregate functions the builder accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AggregateFn {
    Sum,
    Count,
    Min,
    Max,
    Avg,
}

impl AggregateFn {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFn::Sum => "sum",
            AggregateFn::Count => "count",
            AggregateFn::Min => "min",
            AggregateFn::Max => "max",
            AggregateFn::Avg => "avg",
        }
    }

    fn keyword(&self) -> &'static str {
        match self {
            AggregateFn::Sum => "SUM",
            AggregateFn::Count => "COUNT",
            AggregateFn::Min => "MIN",
            AggregateFn::Max => "MAX",
            AggregateFn::Avg => "AVG",
        }
    }
}

impl FromStr for AggregateFn {
    type Err = QbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sum" => Ok(AggregateFn::Sum),
            "count" => Ok(AggregateFn::Count),
            "min" => Ok(AggregateFn::Min),
            "max" => Ok(AggregateFn::Max),
            "avg" => Ok(AggregateFn::Avg),
            _ => Err(QbError::invalid_argument(format!(
                "Invalid aggregate function: {s}"
            ))),
        }
    }
}

impl fmt::Display for AggregateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An aggregate over an expression, or `COUNT(*)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregate {
    function: AggregateFn,
    inner: Option<Expression>,
    distinct: bool,
    alias: Option<String>,
}

impl Aggregate {
    /// Aggregate over `inner`. A wildcard is rejected; use [`Aggregate::count_all`]
    /// for `COUNT(*)`.
    pub fn new(function: AggregateFn, inner: impl Into<Expression>) -> QbResult<Self> {
        let inner = inner.into();
        reject_wildcard(&inner, "an aggregate argument")?;
        Ok(Self {
            function,
            inner: Some(inner),
            distinct: false,
            alias: None,
        })
    }

    /// `COUNT(*)`.
    pub fn count_all() -> Self {
        Self {
            function: AggregateFn::Count,
            inner: None,
            distinct: false,
            alias: None,
        }
    }

    /// Build from a function name and optional inner expression.
    ///
    /// Only `count` may omit the inner expression.
    pub fn named(name: &str, inner: Option<Expression>) -> QbResult<Self> {
        let function: AggregateFn = name.parse()?;
        match inner {
            Some(inner) => Self::new(function, inner),
            None if function == AggregateFn::Count => Ok(Self::count_all()),
            None => Err(QbError::invalid_argument(format!(
                "{function} requires an expression"
            ))),
        }
    }

    /// Toggle `DISTINCT` inside the call.
    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> QbResult<Self> {
        self.alias = Some(checked_alias(alias)?);
        Ok(self)
    }

    pub fn function(&self) -> AggregateFn {
        self.function
    }

    pub fn inner(&self) -> Option<&Expression> {
        self.inner.as_ref()
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn render(&self, scope: &RenderScope, ctx: RenderContext, params: &mut ParamBag) -> String {
        if let (RenderContext::Reference, Some(alias)) = (ctx, &self.alias) {
            return quote(alias);
        }
        let inner = match &self.inner {
            Some(e) => e.render(scope, RenderContext::Operand, params),
            None => "*".to_string(),
        };
        let mut out = String::from(self.function.keyword());
        out.push('(');
        if self.distinct {
            out.push_str("DISTINCT ");
        }
        out.push_str(&inner);
        out.push(')');
        if ctx == RenderContext::Projection {
            push_alias(&mut out, &self.alias);
        }
        out
    }
}

// ==================== Expression ====================

/// Any value-producing node.
///
/// Function calls and aggregates are reference-counted so cloning an expression
/// tree (e.g. when sharing it between statements) never deep-copies.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Column(Column),
    Wildcard(Wildcard),
    Function(Arc<FunctionCall>),
    Aggregate(Arc<Aggregate>),
}

impl Expression {
    /// Output alias, if the expression carries one.
    pub fn alias(&self) -> Option<&str> {
        match self {
            Expression::Column(c) => c.alias(),
            Expression::Wildcard(_) => None,
            Expression::Function(f) => f.alias(),
            Expression::Aggregate(a) => a.alias(),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Expression::Wildcard(_))
    }

    /// Highest table ordinal referenced anywhere in the expression.
    pub fn max_table(&self) -> Option<usize> {
        match self {
            Expression::Column(c) => Some(c.table()),
            Expression::Wildcard(w) => Some(w.table()),
            Expression::Function(f) => f.max_table(),
            Expression::Aggregate(a) => a.inner.as_ref().and_then(Expression::max_table),
        }
    }

    pub fn render(&self, scope: &RenderScope, ctx: RenderContext, params: &mut ParamBag) -> String {
        match self {
            Expression::Column(c) => c.render(scope, ctx),
            Expression::Wildcard(w) => w.render(scope),
            Expression::Function(f) => f.render(scope, ctx, params),
            Expression::Aggregate(a) => a.render(scope, ctx, params),
        }
    }
}

impl From<Column> for Expression {
    fn from(c: Column) -> Self {
        Expression::Column(c)
    }
}

impl From<Wildcard> for Expression {
    fn from(w: Wildcard) -> Self {
        Expression::Wildcard(w)
    }
}

impl From<FunctionCall> for Expression {
    fn from(f: FunctionCall) -> Self {
        Expression::Function(Arc::new(f))
    }
}

impl From<Aggregate> for Expression {
    fn from(a: Aggregate) -> Self {
        Expression::Aggregate(Arc::new(a))
    }
}
