//! Literal values carried by statements.
//!
//! A [`Value`] never appears in SQL text. It is bound to a `:pN` placeholder at
//! render time and handed to the executor through a
//! [`ParamBag`](crate::qb::ParamBag).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A literal bound to a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// SQL NULL
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    /// JSON document (bound as its serialized text by most drivers)
    #[cfg(feature = "json")]
    Json(serde_json::Value),
    #[cfg(feature = "chrono")]
    Date(chrono::NaiveDate),
    #[cfg(feature = "chrono")]
    DateTime(chrono::NaiveDateTime),
    #[cfg(feature = "uuid")]
    Uuid(uuid::Uuid),
}

impl Value {
    /// Check if this value is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is an integer or float.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::UInt(_) | Value::Float(_))
    }

    /// Build a JSON value from any serializable type.
    #[cfg(feature = "json")]
    pub fn json<T: Serialize>(value: &T) -> serde_json::Result<Self> {
        Ok(Value::Json(serde_json::to_value(value)?))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => f.write_str(if *b { "1" } else { "0" }),
            Value::Int(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            #[cfg(feature = "json")]
            Value::Json(v) => write!(f, "{v}"),
            #[cfg(feature = "chrono")]
            Value::Date(d) => write!(f, "{d}"),
            #[cfg(feature = "chrono")]
            Value::DateTime(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S%.f")),
            #[cfg(feature = "uuid")]
            Value::Uuid(u) => write!(f, "{u}"),
        }
    }
}

macro_rules! impl_from {
    ($variant:ident: $($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )+
    };
}

impl_from!(Bool: bool);
impl_from!(Int: i8, i16, i32, i64);
impl_from!(UInt: u8, u16, u32, u64);
impl_from!(Float: f32, f64);
impl_from!(Text: String, &str, &String);
impl_from!(Bytes: Vec<u8>, &[u8]);

#[cfg(feature = "json")]
impl_from!(Json: serde_json::Value);

#[cfg(feature = "chrono")]
impl_from!(Date: chrono::NaiveDate);

#[cfg(feature = "chrono")]
impl_from!(DateTime: chrono::NaiveDateTime);

#[cfg(feature = "uuid")]
impl_from!(Uuid: uuid::Uuid);

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::UInt(v as u64)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
