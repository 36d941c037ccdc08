use serde::{Deserialize, Serialize};

use crate::ast::{ColumnType, Value};

/// A table schema change: columns to add (or change) and ordered commands.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Blueprint {
    pub table: String,
    /// Overrides the grammar's table prefix.
    pub prefix: Option<String>,
    /// `true` compiles to `create table`, `false` to `alter table`.
    pub creating: bool,
    pub columns: Vec<ColumnDef>,
    pub commands: Vec<Command>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub auto_increment: bool,
    /// Modify an existing column instead of adding it.
    #[serde(default)]
    pub change: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            default: None,
            auto_increment: false,
            change: false,
            comment: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn change(mut self) -> Self {
        self.change = true;
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    Primary,
    Unique,
    Index,
    FullText,
    Foreign,
}

impl IndexKind {
    /// Suffix of generated constraint and index names.
    pub fn suffix(&self) -> &'static str {
        match self {
            IndexKind::Primary => "pk",
            IndexKind::Unique => "uk",
            IndexKind::Index => "index",
            IndexKind::FullText => "fulltext",
            IndexKind::Foreign => "fk",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub columns: Vec<String>,
    /// Referenced table.
    pub on: String,
    pub references: Vec<String>,
    #[serde(default)]
    pub on_delete: Option<String>,
    #[serde(default)]
    pub on_update: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Primary key, unique, plain or full-text index.
    AddIndex {
        kind: IndexKind,
        columns: Vec<String>,
        #[serde(default)]
        name: Option<String>,
    },
    Foreign(ForeignKey),
    DropIndex {
        kind: IndexKind,
        #[serde(default)]
        columns: Vec<String>,
        #[serde(default)]
        name: Option<String>,
    },
    DropColumn { columns: Vec<String> },
    RenameColumn { from: String, to: String },
    Rename { to: String },
    Drop,
    DropIfExists,
}

impl Blueprint {
    pub fn create(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            creating: true,
            ..Default::default()
        }
    }

    pub fn alter(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Auto-incrementing integer key.
    pub fn increments(self, name: &str) -> Self {
        self.column(ColumnDef::new(name, ColumnType::Integer).auto_increment())
    }

    pub fn big_increments(self, name: &str) -> Self {
        self.column(ColumnDef::new(name, ColumnType::BigInteger).auto_increment())
    }

    pub fn string(self, name: &str, length: u32) -> Self {
        self.column(ColumnDef::new(name, ColumnType::String(length)))
    }

    pub fn integer(self, name: &str) -> Self {
        self.column(ColumnDef::new(name, ColumnType::Integer))
    }

    pub fn boolean(self, name: &str) -> Self {
        self.column(ColumnDef::new(name, ColumnType::Boolean))
    }

    pub fn text(self, name: &str) -> Self {
        self.column(ColumnDef::new(name, ColumnType::Text))
    }

    /// Nullable `created_at` and `updated_at`.
    pub fn timestamps(self) -> Self {
        self.column(ColumnDef::new("created_at", ColumnType::Timestamp).nullable())
            .column(ColumnDef::new("updated_at", ColumnType::Timestamp).nullable())
    }

    fn index_command(mut self, kind: IndexKind, columns: &[&str], name: Option<&str>) -> Self {
        self.commands.push(Command::AddIndex {
            kind,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            name: name.map(str::to_string),
        });
        self
    }

    pub fn primary(self, columns: &[&str]) -> Self {
        self.index_command(IndexKind::Primary, columns, None)
    }

    pub fn unique(self, columns: &[&str]) -> Self {
        self.index_command(IndexKind::Unique, columns, None)
    }

    pub fn index(self, columns: &[&str]) -> Self {
        self.index_command(IndexKind::Index, columns, None)
    }

    pub fn named_index(self, kind: IndexKind, columns: &[&str], name: &str) -> Self {
        self.index_command(kind, columns, Some(name))
    }

    pub fn full_text(self, columns: &[&str]) -> Self {
        self.index_command(IndexKind::FullText, columns, None)
    }

    pub fn foreign(mut self, key: ForeignKey) -> Self {
        self.commands.push(Command::Foreign(key));
        self
    }

    pub fn drop_index(mut self, kind: IndexKind, columns: &[&str]) -> Self {
        self.commands.push(Command::DropIndex {
            kind,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            name: None,
        });
        self
    }

    pub fn drop_index_named(mut self, kind: IndexKind, name: &str) -> Self {
        self.commands.push(Command::DropIndex {
            kind,
            columns: vec![],
            name: Some(name.to_string()),
        });
        self
    }

    pub fn drop_column(mut self, columns: &[&str]) -> Self {
        self.commands.push(Command::DropColumn {
            columns: columns.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    pub fn rename_column(mut self, from: &str, to: &str) -> Self {
        self.commands.push(Command::RenameColumn {
            from: from.to_string(),
            to: to.to_string(),
        });
        self
    }

    pub fn rename(mut self, to: &str) -> Self {
        self.commands.push(Command::Rename { to: to.to_string() });
        self
    }

    pub fn drop(mut self) -> Self {
        self.commands.push(Command::Drop);
        self
    }

    pub fn drop_if_exists(mut self) -> Self {
        self.commands.push(Command::DropIfExists);
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// The auto-incrementing column, if any.
    pub fn auto_increment_column(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.auto_increment && !c.change)
    }

    pub fn has_primary(&self) -> bool {
        self.commands.iter().any(|c| {
            matches!(
                c,
                Command::AddIndex {
                    kind: IndexKind::Primary,
                    ..
                }
            )
        })
    }

    pub fn has_drop(&self) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, Command::Drop | Command::DropIfExists))
    }
}

impl ForeignKey {
    pub fn new(columns: &[&str], on: &str, references: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            on: on.to_string(),
            references: references.iter().map(|c| c.to_string()).collect(),
            on_delete: None,
            on_update: None,
            name: None,
        }
    }

    pub fn on_delete(mut self, action: &str) -> Self {
        self.on_delete = Some(action.to_string());
        self
    }

    pub fn on_update(mut self, action: &str) -> Self {
        self.on_update = Some(action.to_string());
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blueprint_from_json() {
        let bp: Blueprint = serde_json::from_str(
            r#"{
                "table": "users",
                "creating": true,
                "columns": [
                    {"name": "id", "type": "integer", "auto_increment": true},
                    {"name": "price", "type": "decimal(8,2)", "nullable": true}
                ],
                "commands": [
                    {"command": "add_index", "kind": "unique", "columns": ["price"]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(bp.columns[1].column_type, ColumnType::Decimal(8, 2));
        assert!(bp.auto_increment_column().is_some());
        assert_eq!(bp.commands.len(), 1);
    }

    #[test]
    fn test_blueprint_json_round_trip_with_enum() {
        let bp = Blueprint::create("posts").column(ColumnDef::new(
            "status",
            ColumnType::Enum(vec!["in review".into(), "live".into(), "it's, done".into()]),
        ));
        let json = serde_json::to_string(&bp).unwrap();
        let back: Blueprint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bp);
    }
}
