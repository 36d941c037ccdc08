use serde::{Deserialize, Serialize};

use crate::ast::{AggregateFunc, Query, Value};

/// A selectable expression or column reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// `*`
    Star,
    /// Column or qualified column (`users.id`); `name as alias` is honoured.
    Named(String),
    /// Expression with an explicit alias
    Aliased { expr: Box<Expr>, alias: String },
    /// Raw SQL fragment with its own `?` bindings
    Raw {
        sql: String,
        #[serde(default)]
        bindings: Vec<Value>,
    },
    /// Scalar subquery in the select list
    Subquery { query: Box<Query>, alias: String },
    /// Aggregate function over a column (`count(*)`, `sum("TOTAL")`)
    Aggregate {
        func: AggregateFunc,
        column: Box<Expr>,
        #[serde(default)]
        distinct: bool,
        #[serde(default)]
        alias: Option<String>,
    },
}

impl Expr {
    pub fn raw(sql: impl Into<String>) -> Self {
        Expr::Raw {
            sql: sql.into(),
            bindings: vec![],
        }
    }

    pub fn alias(self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        match self {
            Expr::Aggregate {
                func,
                column,
                distinct,
                ..
            } => Expr::Aggregate {
                func,
                column,
                distinct,
                alias: Some(alias),
            },
            Expr::Subquery { query, .. } => Expr::Subquery { query, alias },
            Expr::Aliased { expr, .. } => Expr::Aliased { expr, alias },
            other => Expr::Aliased {
                expr: Box::new(other),
                alias,
            },
        }
    }

    /// The same expression without any alias (`name as n` becomes `name`).
    pub fn without_alias(&self) -> Expr {
        match self {
            Expr::Named(name) => match crate::transpiler::identifier::split_alias(name) {
                Some((base, _)) => Expr::Named(base.to_string()),
                None => self.clone(),
            },
            Expr::Aliased { expr, .. } => expr.without_alias(),
            Expr::Aggregate {
                func,
                column,
                distinct,
                ..
            } => Expr::Aggregate {
                func: *func,
                column: column.clone(),
                distinct: *distinct,
                alias: None,
            },
            other => other.clone(),
        }
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        if s.trim() == "*" {
            Expr::Star
        } else {
            Expr::Named(s.to_string())
        }
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::from(s.as_str())
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Star => write!(f, "*"),
            Expr::Named(name) => write!(f, "{}", name),
            Expr::Aliased { expr, alias } => write!(f, "{} as {}", expr, alias),
            Expr::Raw { sql, .. } => write!(f, "{}", sql),
            Expr::Subquery { alias, .. } => write!(f, "(SUBQUERY) as {}", alias),
            Expr::Aggregate {
                func,
                column,
                distinct,
                alias,
            } => {
                if *distinct {
                    write!(f, "{}(distinct {})", func, column)?;
                } else {
                    write!(f, "{}({})", func, column)?;
                }
                if let Some(a) = alias {
                    write!(f, " as {}", a)?;
                }
                Ok(())
            }
        }
    }
}
