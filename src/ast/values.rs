use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ast::Query;

/// A value bound to a placeholder, or spliced as an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// NULL value
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    String(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    Uuid(Uuid),
    Bytes(Vec<u8>),
    /// Raw SQL fragment, spliced verbatim and never bound (e.g. `sysdate`)
    Raw(String),
    /// Column reference (e.g. `users.id` on the right of a join condition)
    Column(String),
    /// Subquery for comparisons (e.g. `"ID" = (select ...)`)
    Subquery(Box<Query>),
}

impl Value {
    /// Whether this value becomes a `?` placeholder.
    pub fn is_bindable(&self) -> bool {
        !matches!(self, Value::Raw(_) | Value::Column(_) | Value::Subquery(_))
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Value::Raw(sql.into())
    }

    pub fn column(name: impl Into<String>) -> Self {
        Value::Column(name.into())
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Date(d) => write!(f, "'{}'", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => write!(f, "'{}'", dt.format("%Y-%m-%d %H:%M:%S")),
            Value::Time(t) => write!(f, "'{}'", t.format("%H:%M:%S")),
            Value::Uuid(u) => write!(f, "'{}'", u),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::Raw(s) => write!(f, "{}", s),
            Value::Column(s) => write!(f, "{}", s),
            Value::Subquery(_) => write!(f, "(SUBQUERY)"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::Time(t)
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Uuid(u)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Query> for Value {
    fn from(q: Query) -> Self {
        Value::Subquery(Box::new(q))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
