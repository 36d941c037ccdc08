use serde::{Deserialize, Serialize};

use crate::ast::{Connective, DatePart, Operator, Query, Value};

/// A predicate together with the connective joining it to its predecessor.
///
/// The connective of the first condition in a group is never rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub boolean: Connective,
    pub predicate: Predicate,
}

impl Condition {
    pub fn and(predicate: Predicate) -> Self {
        Self {
            boolean: Connective::And,
            predicate,
        }
    }

    pub fn or(predicate: Predicate) -> Self {
        Self {
            boolean: Connective::Or,
            predicate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Predicate {
    /// `"COL" op ?`; a `Value::Null` operand renders `is null` / `is not null`.
    Compare {
        column: String,
        op: Operator,
        value: Value,
    },
    Null {
        column: String,
        #[serde(default)]
        negated: bool,
    },
    Between {
        column: String,
        low: Value,
        high: Value,
        #[serde(default)]
        negated: bool,
    },
    In {
        column: String,
        values: Vec<Value>,
        #[serde(default)]
        negated: bool,
    },
    InSub {
        column: String,
        query: Box<Query>,
        #[serde(default)]
        negated: bool,
    },
    Exists {
        query: Box<Query>,
        #[serde(default)]
        negated: bool,
    },
    /// `("A", "B") = (?, ?)`
    RowValues {
        columns: Vec<String>,
        op: Operator,
        values: Vec<Value>,
    },
    /// Compare one part of a date/time column.
    Date {
        part: DatePart,
        column: String,
        op: Operator,
        value: Value,
    },
    /// Oracle Text `contains()` over one or more indexed columns.
    FullText {
        columns: Vec<String>,
        value: Value,
    },
    /// Rejected at compile time; kept so callers get a reported error.
    JsonContains {
        column: String,
        value: Value,
    },
    Raw {
        sql: String,
        #[serde(default)]
        bindings: Vec<Value>,
    },
    /// Parenthesised sub-group.
    Group {
        conditions: Vec<Condition>,
        #[serde(default)]
        negated: bool,
    },
}
