//! Schema grammar: blueprints to Oracle DDL.
//!
//! Every compile function returns the statements in execution order. A
//! blueprint may need several, since Oracle has no multi-action
//! `alter table`.

pub mod columns;
pub mod fulltext;
pub mod introspection;

use tracing::debug;

use crate::ast::*;
use crate::error::{OciError, OciResult};
use crate::transpiler::OracleGrammar;
use crate::transpiler::identifier;

use columns::{column_definition, quote_string};

/// Table-scoped naming context shared by the statements of one blueprint.
struct Target<'a> {
    grammar: &'a OracleGrammar,
    blueprint: &'a Blueprint,
    prefix: &'a str,
    table: String,
}

impl<'a> Target<'a> {
    fn new(grammar: &'a OracleGrammar, blueprint: &'a Blueprint) -> OciResult<Self> {
        if blueprint.table.trim().is_empty() {
            return Err(OciError::invalid("blueprint has no table"));
        }
        let prefix = blueprint
            .prefix
            .as_deref()
            .unwrap_or(grammar.config().table_prefix.as_str());
        Ok(Self {
            grammar,
            blueprint,
            prefix,
            table: grammar.wrap_table_prefixed(&blueprint.table, prefix),
        })
    }

    fn object_name(&self, kind: IndexKind, columns: &[String], name: Option<&str>) -> String {
        match name {
            Some(name) => name.to_string(),
            None => identifier::object_name(
                self.prefix,
                &self.blueprint.table,
                columns,
                kind.suffix(),
                self.grammar.config().max_identifier_length,
            ),
        }
    }

    fn columnize(&self, columns: &[String]) -> String {
        columns
            .iter()
            .map(|c| self.grammar.quote(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn primary_constraint(&self, columns: &[String], name: Option<&str>) -> String {
        format!(
            "constraint {} primary key ( {} )",
            self.object_name(IndexKind::Primary, columns, name),
            self.columnize(columns)
        )
    }

    fn foreign_constraint(&self, key: &ForeignKey) -> OciResult<String> {
        if key.on_update.is_some() {
            return Err(OciError::unsupported("foreign key on update"));
        }
        if key.columns.is_empty() || key.columns.len() != key.references.len() {
            return Err(OciError::invalid(format!(
                "foreign key on {} references {} column(s) with {} column(s)",
                key.on,
                key.references.len(),
                key.columns.len()
            )));
        }
        let mut sql = format!(
            "constraint {} foreign key ( {} ) references {} ( {} )",
            self.object_name(IndexKind::Foreign, &key.columns, key.name.as_deref()),
            self.columnize(&key.columns),
            self.grammar.wrap_table_prefixed(&key.on, self.prefix),
            self.columnize(&key.references)
        );
        if let Some(action) = &key.on_delete {
            sql.push_str(" on delete ");
            sql.push_str(&action.to_lowercase());
        }
        Ok(sql)
    }

    /// Statement for a command that is not inlined into `create table`.
    fn command(&self, command: &Command) -> OciResult<Vec<String>> {
        let table = &self.table;
        Ok(match command {
            Command::AddIndex { kind, columns, name } => {
                if columns.is_empty() {
                    return Err(OciError::invalid("index needs at least one column"));
                }
                let name = self.object_name(*kind, columns, name.as_deref());
                match kind {
                    IndexKind::Primary => vec![format!(
                        "alter table {} add {}",
                        table,
                        self.primary_constraint(columns, Some(&name))
                    )],
                    IndexKind::Unique => vec![format!(
                        "alter table {} add constraint {} unique ( {} )",
                        table,
                        name,
                        self.columnize(columns)
                    )],
                    IndexKind::Index => vec![format!(
                        "create index {} on {} ( {} )",
                        name,
                        table,
                        self.columnize(columns)
                    )],
                    IndexKind::FullText => fulltext::create_index(self.grammar, table, &name, columns),
                    IndexKind::Foreign => {
                        return Err(OciError::invalid("foreign keys are declared with Command::Foreign"))
                    }
                }
            }
            Command::Foreign(key) => {
                vec![format!("alter table {} add {}", table, self.foreign_constraint(key)?)]
            }
            Command::DropIndex { kind, columns, name } => {
                if columns.is_empty() && name.is_none() {
                    return Err(OciError::invalid("drop index needs a name or its columns"));
                }
                let name = self.object_name(*kind, columns, name.as_deref());
                match kind {
                    IndexKind::Index => vec![format!("drop index {}", name)],
                    IndexKind::FullText => fulltext::drop_index(&name),
                    _ => vec![format!("alter table {} drop constraint {}", table, name)],
                }
            }
            Command::DropColumn { columns } => {
                vec![format!("alter table {} drop ( {} )", table, self.columnize(columns))]
            }
            Command::RenameColumn { from, to } => vec![format!(
                "alter table {} rename column {} to {}",
                table,
                self.grammar.quote(from),
                self.grammar.quote(to)
            )],
            Command::Rename { to } => vec![format!(
                "alter table {} rename to {}",
                table,
                self.grammar.quote(&format!("{}{}", self.prefix, to))
            )],
            Command::Drop => vec![format!("drop table {}", table)],
            Command::DropIfExists => vec![self.drop_if_exists()],
        })
    }

    /// Checks `all_tables` for the owning schema when there is one, else
    /// `user_tables`.
    fn drop_if_exists(&self) -> String {
        let (owner, table) = self.grammar.split_schema(&self.blueprint.table);
        let name = quote_string(&format!("{}{}", self.prefix, table));
        let catalog = match owner {
            Some(owner) => format!(
                "all_tables where owner = upper({}) and table_name = upper({})",
                quote_string(owner),
                name
            ),
            None => format!("user_tables where table_name = upper({})", name),
        };
        format!(
            "declare c int; begin select count(*) into c from {}; \
             if c = 1 then execute immediate {}; end if; end;",
            catalog,
            quote_string(&format!("drop table {}", self.table))
        )
    }

    fn comments(&self) -> Vec<String> {
        let mut statements = Vec::new();
        if let Some(comment) = &self.blueprint.comment {
            statements.push(format!(
                "comment on table {} is {}",
                self.table,
                quote_string(comment)
            ));
        }
        for column in &self.blueprint.columns {
            if let Some(comment) = &column.comment {
                statements.push(format!(
                    "comment on column {}.{} is {}",
                    self.table,
                    self.grammar.quote(&column.name),
                    quote_string(comment)
                ));
            }
        }
        statements
    }
}

/// `create table` with inline columns, foreign keys and primary key, then
/// indexes and comments.
pub fn create_sql(grammar: &OracleGrammar, blueprint: &Blueprint) -> OciResult<Vec<String>> {
    let target = Target::new(grammar, blueprint)?;
    if blueprint.columns.is_empty() {
        return Err(OciError::invalid(format!(
            "cannot create table '{}' without columns",
            blueprint.table
        )));
    }

    let mut definitions = Vec::with_capacity(blueprint.columns.len() + 1);
    for column in &blueprint.columns {
        definitions.push(column_definition(grammar, column)?);
    }

    let mut primary = None;
    let mut deferred = Vec::new();
    for command in &blueprint.commands {
        match command {
            Command::Foreign(key) => definitions.push(target.foreign_constraint(key)?),
            Command::AddIndex {
                kind: IndexKind::Primary,
                columns,
                name,
            } => primary = Some(target.primary_constraint(columns, name.as_deref())),
            Command::Drop | Command::DropIfExists => {
                return Err(OciError::invalid("cannot drop a table while creating it"))
            }
            other => deferred.push(other),
        }
    }
    if primary.is_none() {
        primary = blueprint
            .auto_increment_column()
            .map(|c| target.primary_constraint(std::slice::from_ref(&c.name), None));
    }
    definitions.extend(primary);

    let mut statements = vec![format!(
        "create table {} ( {} )",
        target.table,
        definitions.join(", ")
    )];
    for command in deferred {
        statements.extend(target.command(command)?);
    }
    statements.extend(target.comments());
    Ok(statements)
}

/// `alter table ... add`, `alter table ... modify`, then one statement per
/// command in declaration order.
pub fn alter_sql(grammar: &OracleGrammar, blueprint: &Blueprint) -> OciResult<Vec<String>> {
    let target = Target::new(grammar, blueprint)?;
    let mut statements = Vec::new();

    let (changed, added): (Vec<&ColumnDef>, Vec<&ColumnDef>) =
        blueprint.columns.iter().partition(|c| c.change);

    if !added.is_empty() {
        let definitions = added
            .iter()
            .map(|c| column_definition(grammar, c))
            .collect::<OciResult<Vec<_>>>()?;
        statements.push(format!("alter table {} add ( {} )", target.table, definitions.join(", ")));
    }
    if !changed.is_empty() {
        let definitions = changed
            .iter()
            .map(|c| column_definition(grammar, c))
            .collect::<OciResult<Vec<_>>>()?;
        statements.push(format!(
            "alter table {} modify ( {} )",
            target.table,
            definitions.join(", ")
        ));
    }

    if !blueprint.has_primary() {
        if let Some(column) = blueprint.auto_increment_column() {
            statements.push(format!(
                "alter table {} add {}",
                target.table,
                target.primary_constraint(std::slice::from_ref(&column.name), None)
            ));
        }
    }

    for command in &blueprint.commands {
        statements.extend(target.command(command)?);
    }
    statements.extend(target.comments());
    Ok(statements)
}

impl OracleGrammar {
    /// Create or alter, depending on `blueprint.creating`.
    pub fn compile_blueprint(&self, blueprint: &Blueprint) -> OciResult<Vec<String>> {
        if blueprint.creating {
            self.compile_create(blueprint)
        } else {
            self.compile_alter(blueprint)
        }
    }

    pub fn compile_create(&self, blueprint: &Blueprint) -> OciResult<Vec<String>> {
        logged("create", create_sql(self, blueprint))
    }

    pub fn compile_alter(&self, blueprint: &Blueprint) -> OciResult<Vec<String>> {
        logged("alter", alter_sql(self, blueprint))
    }

    pub fn compile_drop(&self, blueprint: &Blueprint) -> OciResult<Vec<String>> {
        let target = Target::new(self, blueprint)?;
        logged("drop", target.command(&Command::Drop))
    }

    /// PL/SQL block dropping the table only if the catalog lists it.
    pub fn compile_drop_if_exists(&self, blueprint: &Blueprint) -> OciResult<Vec<String>> {
        let target = Target::new(self, blueprint)?;
        logged("drop if exists", Ok(vec![target.drop_if_exists()]))
    }

    /// Drop the Oracle Text preferences of `table`'s indexes, or all of them.
    pub fn compile_drop_preferences(&self, table: Option<&str>) -> String {
        let table = table.map(|t| format!("{}{}", self.config().table_prefix, t));
        fulltext::drop_preferences(table.as_deref())
    }
}

fn logged(kind: &str, statements: OciResult<Vec<String>>) -> OciResult<Vec<String>> {
    if let Ok(statements) = &statements {
        for sql in statements {
            debug!("{} schema: {:?}", kind, sql);
        }
    }
    statements
}
