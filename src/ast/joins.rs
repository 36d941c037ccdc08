use serde::{Deserialize, Serialize};

use crate::ast::{Condition, JoinKind, Query};

/// What a join reads from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinSource {
    /// Table name, optionally aliased (`posts as p`).
    Table(String),
    /// Derived table.
    Sub { query: Box<Query>, alias: String },
}

/// A join definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub kind: JoinKind,
    pub source: JoinSource,
    /// Empty for cross joins.
    #[serde(default)]
    pub on: Vec<Condition>,
}
