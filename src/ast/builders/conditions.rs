//! Condition builders for where and having clauses.

use crate::ast::{Condition, Connective, Operator, Predicate, Value};

fn compare(column: &str, op: Operator, value: Value) -> Condition {
    Condition::and(Predicate::Compare {
        column: column.to_string(),
        op,
        value,
    })
}

pub fn eq(column: &str, value: impl Into<Value>) -> Condition {
    compare(column, Operator::Eq, value.into())
}

pub fn ne(column: &str, value: impl Into<Value>) -> Condition {
    compare(column, Operator::Ne, value.into())
}

pub fn gt(column: &str, value: impl Into<Value>) -> Condition {
    compare(column, Operator::Gt, value.into())
}

pub fn gte(column: &str, value: impl Into<Value>) -> Condition {
    compare(column, Operator::Gte, value.into())
}

pub fn lt(column: &str, value: impl Into<Value>) -> Condition {
    compare(column, Operator::Lt, value.into())
}

pub fn lte(column: &str, value: impl Into<Value>) -> Condition {
    compare(column, Operator::Lte, value.into())
}

/// Case-sensitive `like`.
pub fn like(column: &str, pattern: impl Into<Value>) -> Condition {
    compare(column, Operator::Like, pattern.into())
}

pub fn is_in<V: Into<Value>>(column: &str, values: impl IntoIterator<Item = V>) -> Condition {
    Condition::and(Predicate::In {
        column: column.to_string(),
        values: values.into_iter().map(Into::into).collect(),
        negated: false,
    })
}

pub fn not_in<V: Into<Value>>(column: &str, values: impl IntoIterator<Item = V>) -> Condition {
    Condition::and(Predicate::In {
        column: column.to_string(),
        values: values.into_iter().map(Into::into).collect(),
        negated: true,
    })
}

pub fn is_null(column: &str) -> Condition {
    Condition::and(Predicate::Null {
        column: column.to_string(),
        negated: false,
    })
}

pub fn between(column: &str, low: impl Into<Value>, high: impl Into<Value>) -> Condition {
    Condition::and(Predicate::Between {
        column: column.to_string(),
        low: low.into(),
        high: high.into(),
        negated: false,
    })
}

/// Re-attach a condition with `or`.
pub fn or(condition: Condition) -> Condition {
    Condition {
        boolean: Connective::Or,
        ..condition
    }
}
