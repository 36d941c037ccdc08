//! The generic SQL generator and its dialect hooks.
//!
//! Default methods render portable ANSI SQL. A dialect overrides only the
//! steps where it diverges.

use chrono::Datelike;

use crate::ast::{DatePart, LobKind, Lock, Value};
use crate::config::Pagination;
use crate::error::{OciError, OciResult};

/// Trait for dialect-specific SQL generation.
pub trait SqlGenerator: Send + Sync {
    /// Quote a single identifier segment.
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// `table alias` rendering in `from` and `join`.
    fn table_alias(&self, table: &str, alias: &str) -> String {
        format!("{} as {}", table, alias)
    }

    /// Case-insensitive `like`.
    fn like_insensitive(&self, column: &str, op: &str, value: &str) -> String {
        format!("lower({}) {} lower({})", column, op, value)
    }

    /// Date-part predicate around a wrapped column and a rendered operand.
    fn date_predicate(&self, part: DatePart, column: &str, op: &str, value: &str) -> String {
        match part {
            DatePart::Date => format!("cast({} as date) {} {}", column, op, value),
            DatePart::Time => format!("cast({} as time) {} {}", column, op, value),
            other => format!("extract({} from {}) {} {}", other.as_sql(), column, op, value),
        }
    }

    /// Convert a bound date-part operand to what the predicate compares with.
    fn date_binding(&self, part: DatePart, value: Value) -> Value {
        match (part, value) {
            (DatePart::Date, Value::DateTime(dt)) => {
                Value::String(dt.date().format("%Y-%m-%d").to_string())
            }
            (DatePart::Date, Value::Date(d)) => Value::String(d.format("%Y-%m-%d").to_string()),
            (DatePart::Time, Value::DateTime(dt)) => {
                Value::String(dt.time().format("%H:%M:%S").to_string())
            }
            (DatePart::Time, Value::Time(t)) => Value::String(t.format("%H:%M:%S").to_string()),
            (DatePart::Day, Value::Date(d)) => Value::Int(d.day() as i64),
            (DatePart::Day, Value::DateTime(dt)) => Value::Int(dt.day() as i64),
            (DatePart::Month, Value::Date(d)) => Value::Int(d.month() as i64),
            (DatePart::Month, Value::DateTime(dt)) => Value::Int(dt.month() as i64),
            (DatePart::Year, Value::Date(d)) => Value::Int(d.year() as i64),
            (DatePart::Year, Value::DateTime(dt)) => Value::Int(dt.year() as i64),
            (_, other) => other,
        }
    }

    /// Apply limit/offset to a compiled select.
    fn paginate(&self, sql: String, limit: Option<u64>, offset: Option<u64>, _style: Pagination) -> String {
        let mut sql = sql;
        if let Some(limit) = limit {
            sql.push_str(&format!(" limit {}", limit));
        }
        if let Some(offset) = offset {
            sql.push_str(&format!(" offset {}", offset));
        }
        sql
    }

    fn lock(&self, lock: &Lock) -> OciResult<String> {
        Ok(match lock {
            Lock::ForUpdate => "for update".to_string(),
            Lock::Shared => "for share".to_string(),
            Lock::Raw(clause) => clause.clone(),
        })
    }

    /// Insert of several rows, each already rendered as a list of operands.
    fn insert_rows(&self, table: &str, columns: &str, rows: Vec<String>) -> String {
        let values: Vec<String> = rows.iter().map(|r| format!("({})", r)).collect();
        format!("insert into {} ({}) values {}", table, columns, values.join(", "))
    }

    /// Insert without any value, given the generated key column if known.
    fn empty_insert(&self, table: &str, _key: Option<&str>) -> OciResult<String> {
        Ok(format!("insert into {} default values", table))
    }

    /// `returning` clause for the given wrapped columns and their out slots.
    fn returning(&self, columns: &[String], _slots: &[&str]) -> String {
        format!(" returning {}", columns.join(", "))
    }

    /// Pseudo-column identifying a physical row, used to rewrite
    /// update/delete statements that join, order or limit.
    fn row_identifier(&self) -> Option<&'static str> {
        None
    }

    /// Existence check around a select.
    fn exists_query(&self, sql: &str) -> String {
        format!("select exists({}) as \"exists\"", sql)
    }

    /// Full-text predicate over wrapped columns. `value` is rendered once per
    /// column and bound once per column by the caller.
    fn full_text(&self, _columns: &[String], _value: &str) -> OciResult<String> {
        Err(OciError::unsupported("full text search"))
    }

    fn json_contains(&self, column: &str, value: &str) -> OciResult<String> {
        Ok(format!("json_contains({}, {})", column, value))
    }

    /// Placeholder written for an empty LOB in insert/update values.
    fn empty_lob(&self, _kind: LobKind) -> OciResult<String> {
        Err(OciError::unsupported("lob locators"))
    }

    fn truncate(&self, table: &str) -> String {
        format!("truncate table {}", table)
    }
}
