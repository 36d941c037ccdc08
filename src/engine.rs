//! Execution contract for compiled statements.
//!
//! The grammar only produces text and bindings. An [`Executor`] owns the
//! actual Oracle session; [`Connection`] pairs one with a grammar and
//! [`SchemaRunner`] drives migrations through it.

use std::collections::HashMap;
use std::future::Future;

use serde::Serialize;
use tracing::{debug, info};

use crate::ast::{Blueprint, Query, Value};
use crate::error::{OciError, OciResult};
use crate::transpiler::{Compiled, Identity, OracleGrammar};

/// One result row keyed by column name as the server reports it.
pub type ResultRow = HashMap<String, Value>;

/// What running a statement produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Outcome {
    Rows(Vec<ResultRow>),
    Affected(u64),
    /// Value written into the generated-key out parameter.
    GeneratedKey(Value),
}

/// A session able to run compiled statements.
///
/// Implementations bind `statement.parameters()` positionally, in order.
/// Errors are reported as [`OciError::Execution`] and never retried here.
pub trait Executor: Send + Sync {
    fn execute(&self, statement: &Compiled) -> impl Future<Output = OciResult<Outcome>> + Send;

    /// Run a statement without bindings (DDL, PL/SQL blocks).
    fn statement(&self, sql: &str) -> impl Future<Output = OciResult<()>> + Send;
}

/// A page of rows plus the total the query would return unpaginated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub items: Vec<ResultRow>,
}

/// A grammar bound to an executor.
pub struct Connection<E> {
    grammar: OracleGrammar,
    executor: E,
}

impl<E: Executor> Connection<E> {
    pub fn new(grammar: OracleGrammar, executor: E) -> Self {
        Self { grammar, executor }
    }

    pub fn grammar(&self) -> &OracleGrammar {
        &self.grammar
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn schema(&self) -> SchemaRunner<'_, E> {
        SchemaRunner { connection: self }
    }

    async fn run(&self, compiled: &Compiled) -> OciResult<Outcome> {
        debug!("execute: {:?}, params: {:?}", compiled.sql, compiled.parameters());
        self.executor.execute(compiled).await
    }

    async fn rows(&self, compiled: &Compiled) -> OciResult<Vec<ResultRow>> {
        match self.run(compiled).await? {
            Outcome::Rows(rows) => Ok(rows),
            other => Err(unexpected("rows", &other)),
        }
    }

    async fn affected(&self, compiled: &Compiled) -> OciResult<u64> {
        match self.run(compiled).await? {
            Outcome::Affected(count) => Ok(count),
            other => Err(unexpected("an affected row count", &other)),
        }
    }

    pub async fn select(&self, query: &Query) -> OciResult<Vec<ResultRow>> {
        let compiled = self.grammar.compile_select(query)?;
        self.rows(&compiled).await
    }

    pub async fn first(&self, query: &Query) -> OciResult<Option<ResultRow>> {
        let query = query.clone().limit(1);
        Ok(self.select(&query).await?.into_iter().next())
    }

    pub async fn exists(&self, query: &Query) -> OciResult<bool> {
        let compiled = self.grammar.compile_exists(query)?;
        let rows = self.rows(&compiled).await?;
        // Oracle returns no row at all; other dialects return a flag.
        Ok(rows.first().is_some_and(|row| {
            column(row, "exists").is_none_or(|flag| !matches!(flag, Value::Bool(false) | Value::Int(0)))
        }))
    }

    pub async fn count_for_pagination(&self, query: &Query) -> OciResult<u64> {
        let compiled = self.grammar.compile_count_for_pagination(query)?;
        let rows = self.rows(&compiled).await?;
        let Some(row) = rows.first() else {
            return Ok(0);
        };
        column(row, "aggregate")
            .and_then(as_count)
            .ok_or_else(|| OciError::Execution("count query returned no aggregate".to_string()))
    }

    /// Count, then fetch one 1-based page.
    pub async fn paginate(&self, query: &Query, page: u64, per_page: u64) -> OciResult<Page> {
        let total = self.count_for_pagination(query).await?;
        let items = if total == 0 {
            Vec::new()
        } else {
            self.select(&query.clone().for_page(page, per_page)).await?
        };
        Ok(Page {
            total,
            page,
            per_page,
            items,
        })
    }

    pub async fn insert(&self, query: &Query) -> OciResult<u64> {
        let compiled = self.grammar.compile_insert(query)?;
        self.affected(&compiled).await
    }

    /// Insert one row and return the key the trigger generated.
    pub async fn insert_get_id(&self, query: &Query, key: &str) -> OciResult<Value> {
        let compiled = self.grammar.compile_insert_get_id(query, key)?;
        match self.run(&compiled).await? {
            Outcome::GeneratedKey(value) => Ok(value),
            other => Err(unexpected("a generated key", &other)),
        }
    }

    pub async fn update(&self, query: &Query) -> OciResult<u64> {
        let compiled = self.grammar.compile_update(query)?;
        self.affected(&compiled).await
    }

    pub async fn delete(&self, query: &Query) -> OciResult<u64> {
        let compiled = self.grammar.compile_delete(query)?;
        self.affected(&compiled).await
    }

    pub async fn truncate(&self, query: &Query) -> OciResult<()> {
        let compiled = self.grammar.compile_truncate(query)?;
        self.executor.statement(&compiled.sql).await
    }
}

/// Runs blueprint DDL and keeps identities in step with their tables.
///
/// Statements run one by one and the first failure stops the run; Oracle
/// commits DDL implicitly, so earlier statements stay applied.
pub struct SchemaRunner<'a, E> {
    connection: &'a Connection<E>,
}

impl<E: Executor> SchemaRunner<'_, E> {
    async fn run_all(&self, statements: &[String]) -> OciResult<()> {
        for sql in statements {
            info!("schema: {}", sql);
            self.connection.executor.statement(sql).await?;
        }
        Ok(())
    }

    fn identity(&self, blueprint: &Blueprint) -> Option<Identity> {
        self.connection.grammar.blueprint_identity(blueprint)
    }

    /// Create the table, then its identity.
    pub async fn create(&self, blueprint: &Blueprint) -> OciResult<()> {
        let statements = self.connection.grammar.compile_create(blueprint)?;
        self.run_all(&statements).await?;
        if let Some(identity) = self.identity(blueprint) {
            self.run_all(&identity.create()).await?;
        }
        Ok(())
    }

    /// Alter the table; an added auto-increment column gets its identity.
    pub async fn alter(&self, blueprint: &Blueprint) -> OciResult<()> {
        let statements = self.connection.grammar.compile_alter(blueprint)?;
        self.run_all(&statements).await?;
        if !blueprint.has_drop() {
            if let Some(identity) = self.identity(blueprint) {
                self.run_all(&identity.create()).await?;
            }
        }
        Ok(())
    }

    /// Identity of `key`, or of the blueprint's auto-increment column.
    fn drop_identity(&self, blueprint: &Blueprint, key: Option<&str>) -> Option<Identity> {
        match key {
            Some(key) => Some(self.connection.grammar.blueprint_key_identity(blueprint, key)),
            None => self.identity(blueprint),
        }
    }

    /// Drop the identity of `key` (if any), then the table.
    pub async fn drop(&self, blueprint: &Blueprint, key: Option<&str>) -> OciResult<()> {
        if let Some(identity) = self.drop_identity(blueprint, key) {
            self.run_all(&identity.drop()).await?;
        }
        let statements = self.connection.grammar.compile_drop(blueprint)?;
        self.run_all(&statements).await
    }

    /// Drop the table if present, then the sequence of `key` if present.
    pub async fn drop_if_exists(&self, blueprint: &Blueprint, key: Option<&str>) -> OciResult<()> {
        let mut statements = self.connection.grammar.compile_drop_if_exists(blueprint)?;
        if let Some(identity) = self.drop_identity(blueprint, key) {
            statements.push(identity.drop_sequence_if_exists());
        }
        self.run_all(&statements).await
    }

    /// Rename a table and move the identity of `key` along with it.
    pub async fn rename(&self, from: &str, to: &str, key: Option<&str>) -> OciResult<()> {
        let grammar = &self.connection.grammar;
        let statements = grammar.compile_alter(&Blueprint::alter(from).rename(to))?;
        self.run_all(&statements).await?;
        if let Some(key) = key {
            let moved = grammar.identity(from, key).rename(&grammar.identity(to, key))?;
            self.run_all(&moved).await?;
        }
        Ok(())
    }

    pub async fn table_exists(&self, owner: &str, table: &str) -> OciResult<bool> {
        let compiled = self.connection.grammar.compile_table_exists(owner, table);
        Ok(!self.connection.rows(&compiled).await?.is_empty())
    }

    pub async fn column_exists(&self, owner: &str, table: &str, column_name: &str) -> OciResult<bool> {
        let compiled = self
            .connection
            .grammar
            .compile_column_exists(owner, table, column_name);
        let rows = self.connection.rows(&compiled).await?;
        Ok(rows
            .first()
            .and_then(|row| column(row, "aggregate"))
            .and_then(as_count)
            .is_some_and(|n| n > 0))
    }

    /// Catalog rows for the columns of `table`, in declaration order.
    pub async fn columns(&self, owner: &str, table: &str) -> OciResult<Vec<ResultRow>> {
        let compiled = self.connection.grammar.compile_columns(owner, table);
        self.connection.rows(&compiled).await
    }
}

/// Case-insensitive column lookup; Oracle reports unquoted aliases upper-cased.
fn column<'r>(row: &'r ResultRow, name: &str) -> Option<&'r Value> {
    row.get(name)
        .or_else(|| row.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v))
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Int(n) => u64::try_from(*n).ok(),
        Value::Decimal(d) => d.to_string().parse().ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn unexpected(expected: &str, got: &Outcome) -> OciError {
    let got = match got {
        Outcome::Rows(_) => "rows",
        Outcome::Affected(_) => "an affected row count",
        Outcome::GeneratedKey(_) => "a generated key",
    };
    OciError::Execution(format!("expected {} from the executor, got {}", expected, got))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_column_lookup_ignores_case() {
        let mut row = ResultRow::new();
        row.insert("AGGREGATE".to_string(), Value::Int(3));
        assert_eq!(column(&row, "aggregate"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_counts_from_numbers() {
        assert_eq!(as_count(&Value::Int(7)), Some(7));
        assert_eq!(as_count(&Value::Int(-1)), None);
        assert_eq!(as_count(&Value::Decimal(Decimal::new(42, 0))), Some(42));
        assert_eq!(as_count(&Value::from("12")), Some(12));
    }
}
