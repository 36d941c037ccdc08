//! SQL grammar for the query and schema AST.
//!
//! Converts [`Query`] and [`Blueprint`] values into Oracle SQL text plus
//! ordered bindings.

pub mod bindings;
pub mod conditions;
pub mod ddl;
pub mod dialect;
pub mod dml;
pub mod identifier;
pub mod identity;
pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tracing::debug;

use crate::ast::*;
use crate::config::GrammarConfig;
use crate::error::{OciError, OciResult};

pub use bindings::{Bindings, ClauseKind, Compiled, OutParam, ParamContext, Parameter};
pub use dialect::Dialect;
pub use identity::Identity;
pub use traits::SqlGenerator;

/// Compiles queries and blueprints for one connection.
///
/// The configuration is fixed at construction; build a new grammar to change
/// it. Cloning is cheap and the grammar can be shared across threads.
#[derive(Clone)]
pub struct OracleGrammar {
    config: Arc<GrammarConfig>,
    generator: Arc<dyn SqlGenerator>,
    dialect: Dialect,
}

impl std::fmt::Debug for OracleGrammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleGrammar")
            .field("config", &self.config)
            .field("dialect", &self.dialect)
            .finish()
    }
}

impl Default for OracleGrammar {
    fn default() -> Self {
        Self::new(GrammarConfig::default())
    }
}

impl OracleGrammar {
    pub fn new(config: GrammarConfig) -> Self {
        Self::with_dialect(config, Dialect::Oracle)
    }

    /// Grammar rendering another dialect through the same compiler.
    pub fn with_dialect(config: GrammarConfig, dialect: Dialect) -> Self {
        Self {
            config: Arc::new(config),
            generator: Arc::from(dialect.generator()),
            dialect,
        }
    }

    pub fn config(&self) -> &GrammarConfig {
        &self.config
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn generator(&self) -> &dyn SqlGenerator {
        self.generator.as_ref()
    }

    // ----- identifiers -----

    pub fn quote(&self, name: &str) -> String {
        self.generator.quote_identifier(name)
    }

    /// Wrap a column reference: `users.id` -> `"USERS"."ID"`,
    /// `id as key` -> `"ID" as "KEY"`. The table segment gets the prefix.
    pub fn wrap(&self, value: &str) -> String {
        let value = value.trim();
        if let Some((base, alias)) = identifier::split_alias(value) {
            return format!("{} as {}", self.wrap(base), self.quote(alias));
        }
        let segments: Vec<&str> = value.split('.').collect();
        let table_at = segments.len().checked_sub(2);
        segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                if *segment == "*" {
                    "*".to_string()
                } else if Some(i) == table_at {
                    self.quote(&format!("{}{}", self.config.table_prefix, segment))
                } else {
                    self.quote(segment)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Wrap a table name with the configured prefix and schema.
    pub fn wrap_table(&self, table: &str) -> String {
        self.wrap_table_prefixed(table, &self.config.table_prefix)
    }

    /// Wrap a table name with an explicit prefix.
    pub fn wrap_table_prefixed(&self, table: &str, prefix: &str) -> String {
        let table = table.trim();
        if let Some((base, alias)) = identifier::split_alias(table) {
            let alias = self.quote(&format!("{}{}", prefix, alias));
            return self
                .generator
                .table_alias(&self.wrap_table_prefixed(base, prefix), &alias);
        }
        let segments: Vec<&str> = table.split('.').collect();
        let last = segments.len() - 1;
        let mut parts = Vec::with_capacity(segments.len() + 1);
        if segments.len() == 1 {
            if let Some(schema) = &self.config.schema {
                parts.push(self.quote(schema));
            }
        }
        for (i, segment) in segments.iter().enumerate() {
            if i == last {
                parts.push(self.quote(&format!("{}{}", prefix, segment)));
            } else {
                parts.push(self.quote(segment));
            }
        }
        parts.join(".")
    }

    /// The name a table is referenced by in qualified columns: its alias if
    /// aliased, else the wrapped table.
    pub(crate) fn table_reference(&self, table: &str) -> String {
        match identifier::split_alias(table) {
            Some((_, alias)) => self.quote(&format!("{}{}", self.config.table_prefix, alias)),
            None => self.wrap_table(table),
        }
    }

    /// Wrap and comma-join column names.
    pub fn columnize<S: AsRef<str>>(&self, columns: &[S]) -> String {
        columns
            .iter()
            .map(|c| self.wrap(c.as_ref()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Render an operand: bind it, or splice raw SQL, a column or a subquery.
    pub fn parameter(&self, ctx: &mut ParamContext, value: &Value) -> OciResult<String> {
        match value {
            Value::Raw(sql) => Ok(sql.clone()),
            Value::Column(column) => Ok(self.wrap(column)),
            Value::Subquery(query) => {
                let nested = self.subquery(ctx, query)?;
                Ok(format!("({})", nested))
            }
            other => Ok(ctx.bind(other.clone()).to_string()),
        }
    }

    /// Compile a nested select and fold its bindings into the current clause.
    pub(crate) fn subquery(&self, ctx: &mut ParamContext, query: &Query) -> OciResult<String> {
        let mut nested = ParamContext::new();
        let sql = dml::select::select_sql(self, query, &mut nested)?;
        ctx.absorb(nested.bindings);
        Ok(sql)
    }

    // ----- queries -----

    /// Compile any query by its action.
    pub fn compile(&self, query: &Query) -> OciResult<Compiled> {
        match query.action {
            Action::Select => self.compile_select(query),
            Action::Insert => self.compile_insert(query),
            Action::Update => self.compile_update(query),
            Action::Delete => self.compile_delete(query),
            Action::Truncate => self.compile_truncate(query),
        }
    }

    pub fn compile_select(&self, query: &Query) -> OciResult<Compiled> {
        let mut ctx = ParamContext::new();
        let sql = dml::select::select_sql(self, query, &mut ctx)?;
        Ok(logged("select", ctx.finish(sql)))
    }

    pub fn compile_insert(&self, query: &Query) -> OciResult<Compiled> {
        let mut ctx = ParamContext::new();
        let sql = dml::insert::insert_sql(self, query, &mut ctx)?;
        Ok(logged("insert", ctx.finish(sql)))
    }

    /// Insert returning the generated `key` through a trailing out parameter.
    pub fn compile_insert_get_id(&self, query: &Query, key: &str) -> OciResult<Compiled> {
        let mut query = query.clone();
        query.returning = Some(key.to_string());
        self.compile_insert(&query)
    }

    /// Oracle has no single-statement upsert this grammar emits; callers
    /// fall back to update-then-insert.
    pub fn compile_upsert(&self, _query: &Query, _unique_by: &[&str], _update: &[&str]) -> OciResult<Compiled> {
        Err(OciError::unsupported("upsert"))
    }

    pub fn compile_update(&self, query: &Query) -> OciResult<Compiled> {
        let mut ctx = ParamContext::new();
        let sql = dml::update::update_sql(self, query, &mut ctx)?;
        Ok(logged("update", ctx.finish(sql)))
    }

    pub fn compile_delete(&self, query: &Query) -> OciResult<Compiled> {
        let mut ctx = ParamContext::new();
        let sql = dml::delete::delete_sql(self, query, &mut ctx)?;
        Ok(logged("delete", ctx.finish(sql)))
    }

    pub fn compile_truncate(&self, query: &Query) -> OciResult<Compiled> {
        if query.table.is_empty() {
            return Err(OciError::invalid("truncate needs a table"));
        }
        let sql = self.generator.truncate(&self.wrap_table(&query.table));
        Ok(logged("truncate", Compiled::new(sql)))
    }

    pub fn compile_exists(&self, query: &Query) -> OciResult<Compiled> {
        let mut ctx = ParamContext::new();
        let sql = dml::select::select_sql(self, query, &mut ctx)?;
        let sql = self.generator.exists_query(&sql);
        Ok(logged("exists", ctx.finish(sql)))
    }

    /// Count of the rows a paginated query would page over.
    pub fn compile_count_for_pagination(&self, query: &Query) -> OciResult<Compiled> {
        let mut ctx = ParamContext::new();
        let sql = dml::aggregate::count_sql(self, query, &mut ctx)?;
        Ok(logged("count", ctx.finish(sql)))
    }

    // ----- identity -----

    /// Owner and bare table name: `hr.users` names its schema, a bare name
    /// falls back to the configured one.
    pub(crate) fn split_schema<'t>(&'t self, table: &'t str) -> (Option<&'t str>, &'t str) {
        let table = table.trim();
        match table.rsplit_once('.') {
            Some((schema, name)) => (Some(schema), name),
            None => (self.config.schema.as_deref(), table),
        }
    }

    /// Sequence/trigger pair backing the auto-increment `key` of `table`.
    pub fn identity(&self, table: &str, key: &str) -> Identity {
        self.prefixed_identity(&self.config.table_prefix, table, key)
    }

    fn prefixed_identity(&self, prefix: &str, table: &str, key: &str) -> Identity {
        let (schema, name) = self.split_schema(table);
        let identity = Identity::new(prefix, name, key, self.config.max_identifier_length);
        match schema {
            Some(schema) => identity.with_schema(schema),
            None => identity,
        }
    }

    /// Identity of the blueprint's auto-increment column, named with the
    /// blueprint's own prefix when it has one.
    pub fn blueprint_identity(&self, blueprint: &Blueprint) -> Option<Identity> {
        let column = blueprint.auto_increment_column()?;
        Some(self.blueprint_key_identity(blueprint, &column.name))
    }

    /// Identity of `key` on the blueprint's table. Drop blueprints carry no
    /// columns, so the key is named explicitly.
    pub fn blueprint_key_identity(&self, blueprint: &Blueprint, key: &str) -> Identity {
        let prefix = blueprint.prefix.as_deref().unwrap_or(self.config.table_prefix.as_str());
        self.prefixed_identity(prefix, &blueprint.table, key)
    }
}

fn logged(kind: &str, compiled: Compiled) -> Compiled {
    debug!(
        "{} query: {:?}, params: {:?}",
        kind,
        compiled.sql,
        compiled.flat_bindings()
    );
    compiled
}

/// Trait for converting AST nodes to SQL.
pub trait ToSql {
    /// Compile with a default Oracle grammar.
    fn to_sql(&self) -> OciResult<Compiled> {
        self.to_sql_with(&OracleGrammar::default())
    }

    fn to_sql_with(&self, grammar: &OracleGrammar) -> OciResult<Compiled>;
}

impl ToSql for Query {
    fn to_sql_with(&self, grammar: &OracleGrammar) -> OciResult<Compiled> {
        grammar.compile(self)
    }
}
