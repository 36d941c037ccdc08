//! Catalog queries used by schema introspection.
//!
//! Each template is bound on owner then table name; both are matched
//! case-insensitively.

use crate::ast::Value;
use crate::transpiler::{Compiled, OracleGrammar};

const OWNER_AND_TABLE: &str = "upper(owner) = upper(?) and upper(table_name) = upper(?)";

impl OracleGrammar {
    fn catalog(&self, sql: String, owner: &str, table: &str, extra: Vec<Value>) -> Compiled {
        let mut values = vec![
            Value::String(owner.to_string()),
            Value::String(format!("{}{}", self.config().table_prefix, table)),
        ];
        values.extend(extra);
        Compiled::with_bindings(sql, values)
    }

    pub fn compile_table_exists(&self, owner: &str, table: &str) -> Compiled {
        self.catalog(
            format!("select * from all_tables where {}", OWNER_AND_TABLE),
            owner,
            table,
            vec![],
        )
    }

    pub fn compile_column_exists(&self, owner: &str, table: &str, column: &str) -> Compiled {
        self.catalog(
            format!(
                "select count(*) as aggregate from all_tab_cols where {} and upper(column_name) = upper(?)",
                OWNER_AND_TABLE
            ),
            owner,
            table,
            vec![Value::String(column.to_string())],
        )
    }

    pub fn compile_columns(&self, owner: &str, table: &str) -> Compiled {
        self.catalog(
            format!(
                "select column_name as \"name\", data_type as \"type\", data_length as \"length\", \
                 data_precision as \"precision\", data_scale as \"scale\", nullable as \"nullable\", \
                 data_default as \"default\" from all_tab_cols where {} order by column_id",
                OWNER_AND_TABLE
            ),
            owner,
            table,
            vec![],
        )
    }

    pub fn compile_foreign_keys(&self, owner: &str, table: &str) -> Compiled {
        self.catalog(
            "select c.constraint_name as \"name\", cc.column_name as \"column\", \
             r.table_name as \"foreign_table\", rc.column_name as \"foreign_column\", \
             c.delete_rule as \"on_delete\" \
             from all_constraints c \
             join all_cons_columns cc on cc.owner = c.owner and cc.constraint_name = c.constraint_name \
             join all_constraints r on r.owner = c.r_owner and r.constraint_name = c.r_constraint_name \
             join all_cons_columns rc on rc.owner = r.owner and rc.constraint_name = r.constraint_name \
             and rc.position = cc.position \
             where c.constraint_type = 'R' and upper(c.owner) = upper(?) and upper(c.table_name) = upper(?) \
             order by c.constraint_name, cc.position"
                .to_string(),
            owner,
            table,
            vec![],
        )
    }

    pub fn compile_indexes(&self, owner: &str, table: &str) -> Compiled {
        self.catalog(
            "select i.index_name as \"name\", ic.column_name as \"column\", \
             i.uniqueness as \"uniqueness\", i.index_type as \"type\" \
             from all_indexes i \
             join all_ind_columns ic on ic.index_owner = i.owner and ic.index_name = i.index_name \
             where upper(i.owner) = upper(?) and upper(i.table_name) = upper(?) \
             order by i.index_name, ic.column_position"
                .to_string(),
            owner,
            table,
            vec![],
        )
    }
}
