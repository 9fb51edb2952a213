//! Boolean predicate trees for WHERE and HAVING clauses.
//!
//! A [`Predicate`] is either a leaf [`Comparison`] or a [`BooleanOp`] over child
//! predicates. Nodes are validated when built and immutable afterwards; a
//! `Predicate` is a reference-counted handle, so attaching it to a statement (or
//! to several statements) only copies the handle.

use crate::error::{QbError, QbResult};
use crate::qb::expr::{
    Aggregate, Column, Expression, FunctionCall, RenderContext, RenderScope, reject_wildcard,
};
use crate::qb::param::{Literal, ParamBag};
use crate::value::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Comparison operators the builder accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Comparator {
    Eq,
    Ne,
    Lt,
    Gt,
    Gte,
    Lte,
    Like,
    IsNull,
    FindInSet,
    In,
}

impl Comparator {
    /// Safelist spelling of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Ne => "<>",
            Comparator::Lt => "<",
            Comparator::Gt => ">",
            Comparator::Gte => ">=",
            Comparator::Lte => "<=",
            Comparator::Like => "like",
            Comparator::IsNull => "is null",
            Comparator::FindInSet => "find_in_set",
            Comparator::In => "in",
        }
    }

    /// Comparators that never take a right operand.
    pub fn is_unary(&self) -> bool {
        matches!(self, Comparator::IsNull)
    }
}

impl FromStr for Comparator {
    type Err = QbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "=" => Ok(Comparator::Eq),
            "<>" => Ok(Comparator::Ne),
            "<" => Ok(Comparator::Lt),
            ">" => Ok(Comparator::Gt),
            ">=" => Ok(Comparator::Gte),
            "<=" => Ok(Comparator::Lte),
            "like" => Ok(Comparator::Like),
            "is null" => Ok(Comparator::IsNull),
            "find_in_set" => Ok(Comparator::FindInSet),
            "in" => Ok(Comparator::In),
            _ => Err(QbError::invalid_argument(format!(
                "invalid comparator-function: {s}"
            ))),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of a comparison.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    /// Bound literal.
    Literal(Literal),
    /// Another expression (e.g. a column of a second table).
    Expr(Expression),
    /// Value list for `IN`.
    List(Vec<Literal>),
}

impl Operand {
    /// Bind a literal value.
    pub fn value(value: impl Into<Value>) -> Self {
        Operand::Literal(Literal::new(value))
    }

    /// Build a value list for `IN`.
    pub fn list<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Self {
        Operand::List(values.into_iter().map(Literal::new).collect())
    }
}

impl From<Expression> for Operand {
    fn from(e: Expression) -> Self {
        Operand::Expr(e)
    }
}

macro_rules! impl_expr_operand {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Operand {
                fn from(e: $ty) -> Self {
                    Operand::Expr(e.into())
                }
            }
        )+
    };
}

impl_expr_operand!(Column, FunctionCall, Aggregate);

impl From<Literal> for Operand {
    fn from(l: Literal) -> Self {
        Operand::Literal(l)
    }
}

/// A leaf comparison: `left <comparator> right`.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    comparator: Comparator,
    left: Expression,
    right: Option<Operand>,
}

impl Comparison {
    /// Build and validate a comparison.
    ///
    /// A literal NULL on the right of `=` / `<>` is treated as an absent operand,
    /// rendering `IS NULL` / `IS NOT NULL`.
    pub fn new(
        comparator: Comparator,
        left: impl Into<Expression>,
        right: Option<Operand>,
    ) -> QbResult<Self> {
        let left = left.into();
        if left.is_wildcard() {
            return Err(QbError::invalid_argument(
                "left operand of a comparison cannot be a wildcard",
            ));
        }

        let right = match right {
            Some(Operand::Literal(lit)) if lit.value().is_null() => None,
            other => other,
        };
        if let Some(Operand::Expr(e)) = &right {
            reject_wildcard(e, "the right operand of a comparison")?;
        }

        match (comparator, &right) {
            (Comparator::IsNull, Some(_)) => {
                return Err(QbError::invalid_argument(
                    "\"is null\" does not take a right operand",
                ));
            }
            (Comparator::In, Some(Operand::List(values))) => {
                if values.is_empty() {
                    return Err(QbError::invalid_argument(
                        "Right-op of \"in\" cannot be an empty list",
                    ));
                }
                if let Some(bad) = values.iter().find(|v| !v.value().is_numeric()) {
                    return Err(QbError::invalid_argument(format!(
                        "Right-op has to be a list of NUMERIC VALUES, \
                         if comparison is \"in\" (got {})",
                        bad.value()
                    )));
                }
            }
            (Comparator::In, _) => {
                return Err(QbError::invalid_argument(
                    "Right-op has to be a LIST, if comparison is \"in\"",
                ));
            }
            (_, Some(Operand::List(_))) => {
                return Err(QbError::invalid_argument(format!(
                    "a list operand is only allowed with \"in\", not \"{comparator}\""
                )));
            }
            (Comparator::IsNull | Comparator::Eq | Comparator::Ne, _) => {}
            (_, None) => {
                return Err(QbError::invalid_argument(format!(
                    "\"{comparator}\" requires a right operand"
                )));
            }
            _ => {}
        }

        Ok(Self {
            comparator,
            left,
            right,
        })
    }

    /// Build from a comparator name (e.g. `">="`, `"like"`).
    pub fn parse(
        comparator: &str,
        left: impl Into<Expression>,
        right: Option<Operand>,
    ) -> QbResult<Self> {
        Self::new(comparator.parse()?, left, right)
    }

    /// `left <comparator> :pN` with a bound value.
    pub fn value(
        comparator: Comparator,
        left: impl Into<Expression>,
        value: impl Into<Value>,
    ) -> QbResult<Self> {
        Self::new(comparator, left, Some(Operand::value(value)))
    }

    /// `left = :pN`
    pub fn eq(left: impl Into<Expression>, value: impl Into<Value>) -> QbResult<Self> {
        Self::value(Comparator::Eq, left, value)
    }

    /// `left <> :pN`
    pub fn ne(left: impl Into<Expression>, value: impl Into<Value>) -> QbResult<Self> {
        Self::value(Comparator::Ne, left, value)
    }

    /// `left < :pN`
    pub fn lt(left: impl Into<Expression>, value: impl Into<Value>) -> QbResult<Self> {
        Self::value(Comparator::Lt, left, value)
    }

    /// `left > :pN`
    pub fn gt(left: impl Into<Expression>, value: impl Into<Value>) -> QbResult<Self> {
        Self::value(Comparator::Gt, left, value)
    }

    /// `left >= :pN`
    pub fn gte(left: impl Into<Expression>, value: impl Into<Value>) -> QbResult<Self> {
        Self::value(Comparator::Gte, left, value)
    }

    /// `left <= :pN`
    pub fn lte(left: impl Into<Expression>, value: impl Into<Value>) -> QbResult<Self> {
        Self::value(Comparator::Lte, left, value)
    }

    /// `left LIKE :pN`
    pub fn like(left: impl Into<Expression>, pattern: impl Into<Value>) -> QbResult<Self> {
        Self::value(Comparator::Like, left, pattern)
    }

    /// `left IS NULL`
    pub fn is_null(left: impl Into<Expression>) -> QbResult<Self> {
        Self::new(Comparator::IsNull, left, None)
    }

    /// `left IS NOT NULL`
    pub fn is_not_null(left: impl Into<Expression>) -> QbResult<Self> {
        Self::new(Comparator::Ne, left, None)
    }

    /// `FIND_IN_SET(:pN, left)`
    pub fn find_in_set(left: impl Into<Expression>, needle: impl Into<Value>) -> QbResult<Self> {
        Self::value(Comparator::FindInSet, left, needle)
    }

    /// `left IN (:pN, ...)` over numeric values.
    pub fn in_list<T: Into<Value>>(
        left: impl Into<Expression>,
        values: impl IntoIterator<Item = T>,
    ) -> QbResult<Self> {
        Self::new(Comparator::In, left, Some(Operand::list(values)))
    }

    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    pub fn left(&self) -> &Expression {
        &self.left
    }

    pub fn right(&self) -> Option<&Operand> {
        self.right.as_ref()
    }

    fn max_table(&self) -> Option<usize> {
        let right = match &self.right {
            Some(Operand::Expr(e)) => e.max_table(),
            _ => None,
        };
        self.left.max_table().max(right)
    }

    pub fn render(&self, scope: &RenderScope, params: &mut ParamBag) -> String {
        let left = self.left.render(scope, RenderContext::Operand, params);

        let right = match &self.right {
            None => {
                return if self.comparator == Comparator::Ne {
                    format!("{left} IS NOT NULL")
                } else {
                    format!("{left} IS NULL")
                };
            }
            Some(Operand::Literal(lit)) => lit.render(params),
            Some(Operand::Expr(e)) => e.render(scope, RenderContext::Operand, params),
            Some(Operand::List(values)) => {
                let tokens: Vec<String> = values.iter().map(|v| v.render(params)).collect();
                tokens.join(", ")
            }
        };

        match self.comparator {
            Comparator::In => format!("{left} IN ({right})"),
            Comparator::FindInSet => format!("FIND_IN_SET({right}, {left})"),
            Comparator::Like => format!("{left} LIKE {right}"),
            op => format!("{left} {} {right}", op.as_str()),
        }
    }
}

/// Boolean combinators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoolKind {
    And,
    Or,
    Xor,
    Not,
}

impl BoolKind {
    fn keyword(&self) -> &'static str {
        match self {
            BoolKind::And => " AND ",
            BoolKind::Or => " OR ",
            BoolKind::Xor => " XOR ",
            BoolKind::Not => "NOT ",
        }
    }
}

/// A boolean combination of child predicates.
#[derive(Clone, Debug, PartialEq)]
pub struct BooleanOp {
    kind: BoolKind,
    children: Vec<Predicate>,
}

impl BooleanOp {
    /// `NOT` requires exactly one child; `AND`/`OR`/`XOR` at least one.
    pub fn new(kind: BoolKind, children: Vec<Predicate>) -> QbResult<Self> {
        match kind {
            BoolKind::Not if children.len() != 1 => Err(QbError::invalid_argument(
                "NOT takes exactly one Condition or Operator",
            )),
            _ if children.is_empty() => Err(QbError::invalid_argument(format!(
                "{:?} requires at least one Condition or Operator",
                kind
            ))),
            _ => Ok(Self { kind, children }),
        }
    }

    pub fn kind(&self) -> BoolKind {
        self.kind
    }

    pub fn children(&self) -> &[Predicate] {
        &self.children
    }

    pub fn render(&self, scope: &RenderScope, params: &mut ParamBag) -> String {
        if self.kind == BoolKind::Not {
            let inner: String = self
                .children
                .iter()
                .map(|c| c.render(scope, params))
                .collect();
            return format!("NOT ({inner})");
        }

        // A single child needs no grouping.
        if let [only] = self.children.as_slice() {
            return only.render(scope, params);
        }

        let parts: Vec<String> = self
            .children
            .iter()
            .map(|c| c.render(scope, params))
            .collect();
        format!("({})", parts.join(self.kind.keyword()))
    }
}

/// Node of a predicate tree.
#[derive(Clone, Debug, PartialEq)]
pub enum PredicateNode {
    Comparison(Comparison),
    Boolean(BooleanOp),
}

/// Shared handle to an immutable predicate tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Predicate(Arc<PredicateNode>);

impl Predicate {
    /// `(a AND b ...)`
    pub fn and(children: Vec<Predicate>) -> QbResult<Self> {
        Ok(BooleanOp::new(BoolKind::And, children)?.into())
    }

    /// `(a OR b ...)`
    pub fn or(children: Vec<Predicate>) -> QbResult<Self> {
        Ok(BooleanOp::new(BoolKind::Or, children)?.into())
    }

    /// `(a XOR b ...)`
    pub fn xor(children: Vec<Predicate>) -> QbResult<Self> {
        Ok(BooleanOp::new(BoolKind::Xor, children)?.into())
    }

    /// `NOT (child)`
    pub fn not(child: impl Into<Predicate>) -> Self {
        BooleanOp {
            kind: BoolKind::Not,
            children: vec![child.into()],
        }
        .into()
    }

    pub fn node(&self) -> &PredicateNode {
        &self.0
    }

    /// Whether two handles share the same tree.
    pub fn ptr_eq(&self, other: &Predicate) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Highest table ordinal referenced anywhere in the tree.
    pub fn max_table(&self) -> Option<usize> {
        match self.node() {
            PredicateNode::Comparison(c) => c.max_table(),
            PredicateNode::Boolean(b) => b.children.iter().filter_map(Predicate::max_table).max(),
        }
    }

    /// Render the tree, binding literals into `params` depth-first, left to right.
    pub fn render(&self, scope: &RenderScope, params: &mut ParamBag) -> String {
        match self.node() {
            PredicateNode::Comparison(c) => c.render(scope, params),
            PredicateNode::Boolean(b) => b.render(scope, params),
        }
    }
}

impl From<Comparison> for Predicate {
    fn from(c: Comparison) -> Self {
        Predicate(Arc::new(PredicateNode::Comparison(c)))
    }
}

impl From<BooleanOp> for Predicate {
    fn from(b: BooleanOp) -> Self {
        Predicate(Arc::new(PredicateNode::Boolean(b)))
    }
}
