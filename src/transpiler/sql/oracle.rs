use super::super::dml::paginate::RowRange;
use super::super::identifier;
use super::super::traits::SqlGenerator;
use crate::ast::{DatePart, LobKind, Lock};
use crate::config::Pagination;
use crate::error::{OciError, OciResult};

pub struct OracleGenerator;

impl SqlGenerator for OracleGenerator {
    fn quote_identifier(&self, name: &str) -> String {
        identifier::quote(name)
    }

    // Oracle rejects `as` before a table alias.
    fn table_alias(&self, table: &str, alias: &str) -> String {
        format!("{} {}", table, alias)
    }

    fn like_insensitive(&self, column: &str, op: &str, value: &str) -> String {
        format!("upper({}) {} upper({})", column, op, value)
    }

    fn date_predicate(&self, part: DatePart, column: &str, op: &str, value: &str) -> String {
        match part {
            DatePart::Date => format!("trunc({}) {} to_date({}, 'YYYY-MM-DD')", column, op, value),
            DatePart::Time => format!("to_char({}, 'HH24:MI:SS') {} {}", column, op, value),
            other => format!("extract ({} from {}) {} {}", other.as_sql(), column, op, value),
        }
    }

    fn paginate(&self, sql: String, limit: Option<u64>, offset: Option<u64>, style: Pagination) -> String {
        match style {
            Pagination::FetchFirst => fetch_first(sql, limit, offset),
            Pagination::RowNum => match RowRange::new(limit, offset) {
                None => sql,
                Some(range) => range.wrap(&sql),
            },
        }
    }

    fn lock(&self, lock: &Lock) -> OciResult<String> {
        match lock {
            Lock::ForUpdate => Ok("for update".to_string()),
            Lock::Shared => Err(OciError::unsupported("lock in share mode")),
            Lock::Raw(clause) => Ok(clause.clone()),
        }
    }

    fn insert_rows(&self, table: &str, columns: &str, rows: Vec<String>) -> String {
        let selects: Vec<String> = rows
            .iter()
            .map(|r| format!("select {} from dual", r))
            .collect();
        format!("insert into {} ({}) {}", table, columns, selects.join(" union all "))
    }

    fn empty_insert(&self, table: &str, key: Option<&str>) -> OciResult<String> {
        match key {
            Some(key) => Ok(format!("insert into {} ({}) values (default)", table, key)),
            None => Err(OciError::EmptyInsert(table.to_string())),
        }
    }

    fn returning(&self, columns: &[String], slots: &[&str]) -> String {
        format!(" returning {} into {}", columns.join(", "), slots.join(", "))
    }

    fn row_identifier(&self) -> Option<&'static str> {
        Some("rowid")
    }

    fn exists_query(&self, sql: &str) -> String {
        format!("select 1 as \"exists\" from ({}) where rownum = 1", sql)
    }

    fn full_text(&self, columns: &[String], value: &str) -> OciResult<String> {
        let parts: Vec<String> = columns
            .iter()
            .map(|c| format!("contains({}, {}, 1) > 0", c, value))
            .collect();
        Ok(match parts.len() {
            1 => parts.join(""),
            _ => format!("({})", parts.join(" or ")),
        })
    }

    fn json_contains(&self, _column: &str, _value: &str) -> OciResult<String> {
        Err(OciError::unsupported("json contains"))
    }

    fn empty_lob(&self, kind: LobKind) -> OciResult<String> {
        Ok(match kind {
            LobKind::Blob => "empty_blob()".to_string(),
            LobKind::Clob => "empty_clob()".to_string(),
        })
    }
}

/// 12c row limiting clause.
fn fetch_first(sql: String, limit: Option<u64>, offset: Option<u64>) -> String {
    let mut sql = sql;
    if let Some(offset) = offset {
        sql.push_str(&format!(" offset {} rows", offset));
    }
    if let Some(limit) = limit {
        sql.push_str(&format!(" fetch next {} rows only", limit));
    }
    sql
}
