//! Grammar test modules.
//!
//! - `select`: projections, joins, grouping, unions, locking, counts
//! - `where_clauses`: the predicate compiler
//! - `pagination`: rownum and fetch-first wrappers
//! - `insert` and `update_delete`: mutations, returning and row-id rewrites
//! - `schema` and `identity`: DDL and sequence/trigger emulation
//! - `dialects`: the generic generator

mod identity;
mod select;
mod update_delete;

use crate::ast::Value;
use crate::config::GrammarConfig;
use crate::transpiler::{Compiled, OracleGrammar};

pub(super) fn grammar() -> OracleGrammar {
    OracleGrammar::default()
}

pub(super) fn prefixed(prefix: &str) -> OracleGrammar {
    OracleGrammar::new(GrammarConfig::default().with_prefix(prefix))
}

pub(super) fn strings(values: &[&str]) -> Vec<Value> {
    values.iter().map(|v| Value::from(*v)).collect()
}

/// Every `?` has exactly one parameter.
pub(super) fn assert_aligned(compiled: &Compiled) {
    assert_eq!(
        compiled.placeholder_count(),
        compiled.parameters().len(),
        "placeholders and parameters differ in {}",
        compiled.sql
    );
}
