use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OciError;

/// The statement a [`Query`](crate::ast::Query) compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[default]
    Select,
    Insert,
    Update,
    Delete,
    Truncate,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Select => write!(f, "SELECT"),
            Action::Insert => write!(f, "INSERT"),
            Action::Update => write!(f, "UPDATE"),
            Action::Delete => write!(f, "DELETE"),
            Action::Truncate => write!(f, "TRUNCATE"),
        }
    }
}

/// Boolean connective between conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Connective {
    #[default]
    And,
    Or,
}

impl Connective {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Connective::And => "and",
            Connective::Or => "or",
        }
    }
}

impl FromStr for Connective {
    type Err = OciError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "and" => Ok(Connective::And),
            "or" => Ok(Connective::Or),
            other => Err(OciError::invalid(format!("unknown boolean connective '{}'", other))),
        }
    }
}

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Case-sensitive LIKE
    Like,
    NotLike,
    /// Case-insensitive LIKE
    ILike,
    NotILike,
}

impl Operator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Like | Operator::ILike => "like",
            Operator::NotLike | Operator::NotILike => "not like",
        }
    }

    pub fn is_case_insensitive(&self) -> bool {
        matches!(self, Operator::ILike | Operator::NotILike)
    }
}

impl FromStr for Operator {
    type Err = OciError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "=" | "==" => Ok(Operator::Eq),
            "<>" | "!=" => Ok(Operator::Ne),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Gte),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Lte),
            "like" => Ok(Operator::Like),
            "not like" => Ok(Operator::NotLike),
            "ilike" => Ok(Operator::ILike),
            "not ilike" => Ok(Operator::NotILike),
            other => Err(OciError::invalid(format!("unknown operator '{}'", other))),
        }
    }
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Cross,
    /// Rejected at compile time.
    Full,
}

/// Sort order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Part of a date/time column matched by a date predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePart {
    Date,
    Day,
    Month,
    Year,
    Time,
}

impl DatePart {
    pub fn as_sql(&self) -> &'static str {
        match self {
            DatePart::Date => "date",
            DatePart::Day => "day",
            DatePart::Month => "month",
            DatePart::Year => "year",
            DatePart::Time => "time",
        }
    }
}

/// Aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl std::fmt::Display for AggregateFunc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregateFunc::Count => write!(f, "count"),
            AggregateFunc::Sum => write!(f, "sum"),
            AggregateFunc::Avg => write!(f, "avg"),
            AggregateFunc::Min => write!(f, "min"),
            AggregateFunc::Max => write!(f, "max"),
        }
    }
}

/// Row locking mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lock {
    ForUpdate,
    /// Has no Oracle equivalent; rejected at compile time.
    Shared,
    /// Appended verbatim (e.g. `for update nowait`).
    Raw(String),
}

/// Large object kind for LOB inserts and updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LobKind {
    Blob,
    Clob,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connective_parse_any_case() {
        assert_eq!("AND".parse::<Connective>().unwrap(), Connective::And);
        assert_eq!(" Or ".parse::<Connective>().unwrap(), Connective::Or);
        assert!("xor".parse::<Connective>().is_err());
    }

    #[test]
    fn test_operator_parse() {
        assert_eq!("!=".parse::<Operator>().unwrap(), Operator::Ne);
        assert_eq!("NOT LIKE".parse::<Operator>().unwrap(), Operator::NotLike);
        assert_eq!(Operator::ILike.as_sql(), "like");
        assert!("~~".parse::<Operator>().is_err());
    }
}
