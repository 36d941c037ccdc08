//! Column definitions.

use crate::ast::*;
use crate::error::{OciError, OciResult};
use crate::transpiler::OracleGrammar;

/// `"COL" type [default X] not null|null [check (...)]`.
pub fn column_definition(grammar: &OracleGrammar, column: &ColumnDef) -> OciResult<String> {
    let name = grammar.quote(&column.name);
    let mut sql = format!("{} {}", name, column.column_type.to_oracle_type());

    if let Some(default) = &column.default {
        sql.push_str(" default ");
        sql.push_str(&literal(default)?);
    }

    // Oracle treats '' as null, so a nullable flag is always spelled out.
    sql.push_str(if column.nullable { " null" } else { " not null" });

    if let ColumnType::Enum(allowed) = &column.column_type {
        let allowed: Vec<String> = allowed.iter().map(|v| quote_string(v)).collect();
        sql.push_str(&format!(" check ({} in ({}))", name, allowed.join(", ")));
    }
    Ok(sql)
}

/// Render a value as an inline SQL literal, for defaults and comments.
pub fn literal(value: &Value) -> OciResult<String> {
    Ok(match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => (if *b { "'1'" } else { "'0'" }).to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Decimal(d) => d.to_string(),
        Value::String(s) => quote_string(s),
        Value::Date(d) => format!("date '{}'", d.format("%Y-%m-%d")),
        Value::DateTime(dt) => format!("timestamp '{}'", dt.format("%Y-%m-%d %H:%M:%S")),
        Value::Uuid(u) => quote_string(&u.to_string()),
        Value::Raw(sql) => sql.clone(),
        other => {
            return Err(OciError::invalid(format!(
                "{} cannot be used as a column default",
                other
            )))
        }
    })
}

/// Single-quoted string literal with embedded quotes doubled.
pub fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
