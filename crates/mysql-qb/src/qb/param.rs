//! Literal nodes and the ordered parameter bag they render into.

use crate::value::Value;
use indexmap::IndexMap;
use serde::Serialize;

/// Placeholder prefix used for every bound literal (`:p1`, `:p2`, ...).
pub const PLACEHOLDER_PREFIX: &str = ":p";

/// Ordered mapping from placeholder token to bound value.
///
/// Tokens are assigned sequentially, starting at `:p1`, in the order literals are
/// encountered during a render pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParamBag {
    params: IndexMap<String, Value>,
}

impl ParamBag {
    /// Create a new empty bag.
    pub fn new() -> Self {
        Self {
            params: IndexMap::new(),
        }
    }

    /// Bind a value and return its placeholder token.
    pub fn push(&mut self, value: Value) -> String {
        let token = format!("{PLACEHOLDER_PREFIX}{}", self.params.len() + 1);
        self.params.insert(token.clone(), value);
        token
    }

    /// Look up the value bound to a placeholder token (e.g. `":p1"`).
    pub fn get(&self, token: &str) -> Option<&Value> {
        self.params.get(token)
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate over `(token, value)` pairs in placeholder order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Values in placeholder order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.params.values()
    }

    /// Consume the bag, returning the underlying ordered map.
    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.params
    }
}

impl<'a> IntoIterator for &'a ParamBag {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

/// A literal value node.
///
/// The value is opaque to the builder: it only becomes a placeholder token when
/// rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct Literal(Value);

impl Literal {
    /// Wrap a value.
    pub fn new(value: impl Into<Value>) -> Self {
        Literal(value.into())
    }

    /// The wrapped value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Bind the value into `params` and return the allocated token.
    pub fn render(&self, params: &mut ParamBag) -> String {
        params.push(self.0.clone())
    }
}
