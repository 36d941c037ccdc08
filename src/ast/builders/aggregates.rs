//! Aggregate expressions (count, sum, avg, min, max).

use crate::ast::{AggregateFunc, Expr};

fn aggregate(func: AggregateFunc, column: &str, distinct: bool) -> Expr {
    Expr::Aggregate {
        func,
        column: Box::new(Expr::from(column)),
        distinct,
        alias: None,
    }
}

/// `count(*)`
pub fn count() -> Expr {
    aggregate(AggregateFunc::Count, "*", false)
}

/// `count(distinct "COL")`
pub fn count_distinct(column: &str) -> Expr {
    aggregate(AggregateFunc::Count, column, true)
}

pub fn sum(column: &str) -> Expr {
    aggregate(AggregateFunc::Sum, column, false)
}

pub fn avg(column: &str) -> Expr {
    aggregate(AggregateFunc::Avg, column, false)
}

pub fn min(column: &str) -> Expr {
    aggregate(AggregateFunc::Min, column, false)
}

pub fn max(column: &str) -> Expr {
    aggregate(AggregateFunc::Max, column, false)
}
