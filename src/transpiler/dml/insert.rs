//! INSERT SQL generation.

use crate::ast::*;
use crate::error::{OciError, OciResult};
use crate::transpiler::dml::returning_clause;
use crate::transpiler::{ClauseKind, OracleGrammar, ParamContext};

/// Generate an insert: single row, multi-row, `insert ... select`, LOB
/// locators and generated-key returning.
pub fn insert_sql(grammar: &OracleGrammar, query: &Query, ctx: &mut ParamContext) -> OciResult<String> {
    let generator = grammar.generator();
    let table = grammar.wrap_table(&query.table);
    let previous = ctx.enter(ClauseKind::Values);
    let key = query.returning.as_deref();

    if let Some(source) = &query.source_query {
        let sub = grammar.subquery(ctx, source)?;
        ctx.enter(previous);
        if query.insert_columns.is_empty() {
            return Ok(format!("insert into {} {}", table, sub));
        }
        return Ok(format!(
            "insert into {} ({}) {}",
            table,
            grammar.columnize(&query.insert_columns),
            sub
        ));
    }

    let rows: Vec<&Row> = query.rows.iter().filter(|r| !r.is_empty()).collect();

    if rows.is_empty() && query.lobs.is_empty() {
        let wrapped_key = key.map(|k| grammar.wrap(k));
        let mut sql = generator.empty_insert(&table, wrapped_key.as_deref())?;
        sql.push_str(&returning_clause(grammar, ctx, &[], key));
        ctx.enter(previous);
        return Ok(sql);
    }

    let columns: Vec<&str> = rows
        .first()
        .map(|row| row.iter().map(|(c, _)| c.as_str()).collect())
        .unwrap_or_default();

    let mut rendered = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        if row.len() != columns.len() {
            return Err(OciError::invalid(format!(
                "insert row {} has {} column(s), expected {}",
                index,
                row.len(),
                columns.len()
            )));
        }
        let mut operands = Vec::with_capacity(columns.len());
        for column in &columns {
            let value = row
                .iter()
                .find(|(c, _)| c == column)
                .map(|(_, v)| v)
                .ok_or_else(|| OciError::invalid(format!("insert row {} has no value for '{}'", index, column)))?;
            operands.push(grammar.parameter(ctx, value)?);
        }
        rendered.push(operands);
    }

    if rendered.len() > 1 {
        if key.is_some() || !query.lobs.is_empty() {
            return Err(OciError::invalid("returning into needs a single-row insert"));
        }
        let rows = rendered.iter().map(|r| r.join(", ")).collect();
        ctx.enter(previous);
        return Ok(generator.insert_rows(&table, &grammar.columnize(&columns), rows));
    }

    let mut wrapped: Vec<String> = columns.iter().map(|c| grammar.wrap(c)).collect();
    let mut operands = rendered.pop().unwrap_or_default();
    for lob in &query.lobs {
        wrapped.push(grammar.wrap(&lob.column));
        operands.push(generator.empty_lob(lob.kind)?);
    }

    let mut sql = format!(
        "insert into {} ({}) values ({})",
        table,
        wrapped.join(", "),
        operands.join(", ")
    );
    sql.push_str(&returning_clause(grammar, ctx, &query.lobs, key));
    ctx.enter(previous);
    Ok(sql)
}
