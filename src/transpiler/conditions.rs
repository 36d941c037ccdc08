//! Predicate compiler.
//!
//! Placeholders are produced in depth-first, left-to-right order, so the
//! binding list always lines up with the `?` markers in the text.

use crate::ast::*;
use crate::error::{OciError, OciResult};
use crate::transpiler::{OracleGrammar, ParamContext};

/// Compile a condition list without the leading keyword. Empty input gives
/// an empty string.
pub fn compile_conditions(
    grammar: &OracleGrammar,
    ctx: &mut ParamContext,
    conditions: &[Condition],
) -> OciResult<String> {
    let mut sql = String::new();
    for (i, condition) in conditions.iter().enumerate() {
        let fragment = compile_predicate(grammar, ctx, &condition.predicate)?;
        if i > 0 {
            sql.push(' ');
            sql.push_str(condition.boolean.as_sql());
            sql.push(' ');
        }
        sql.push_str(&fragment);
    }
    Ok(sql)
}

pub fn compile_predicate(
    grammar: &OracleGrammar,
    ctx: &mut ParamContext,
    predicate: &Predicate,
) -> OciResult<String> {
    match predicate {
        Predicate::Compare { column, op, value } => compare(grammar, ctx, column, *op, value),
        Predicate::Null { column, negated } => Ok(format!(
            "{} is {}null",
            grammar.wrap(column),
            if *negated { "not " } else { "" }
        )),
        Predicate::Between {
            column,
            low,
            high,
            negated,
        } => {
            let col = grammar.wrap(column);
            let low = grammar.parameter(ctx, low)?;
            let high = grammar.parameter(ctx, high)?;
            Ok(format!(
                "{} {}between {} and {}",
                col,
                if *negated { "not " } else { "" },
                low,
                high
            ))
        }
        Predicate::In {
            column,
            values,
            negated,
        } => in_list(grammar, ctx, column, values, *negated),
        Predicate::InSub {
            column,
            query,
            negated,
        } => {
            let col = grammar.wrap(column);
            let sub = grammar.subquery(ctx, query)?;
            Ok(format!(
                "{} {}in ({})",
                col,
                if *negated { "not " } else { "" },
                sub
            ))
        }
        Predicate::Exists { query, negated } => {
            let sub = grammar.subquery(ctx, query)?;
            Ok(format!("{}exists ({})", if *negated { "not " } else { "" }, sub))
        }
        Predicate::RowValues {
            columns,
            op,
            values,
        } => {
            if columns.len() != values.len() {
                return Err(OciError::ArityMismatch {
                    columns: columns.len(),
                    values: values.len(),
                });
            }
            let mut operands = Vec::with_capacity(values.len());
            for value in values {
                operands.push(grammar.parameter(ctx, value)?);
            }
            Ok(format!(
                "({}) {} ({})",
                grammar.columnize(columns),
                op.as_sql(),
                operands.join(", ")
            ))
        }
        Predicate::Date {
            part,
            column,
            op,
            value,
        } => {
            let generator = grammar.generator();
            let operand = if value.is_bindable() {
                generator.date_binding(*part, value.clone())
            } else {
                value.clone()
            };
            let rendered = grammar.parameter(ctx, &operand)?;
            Ok(generator.date_predicate(*part, &grammar.wrap(column), op.as_sql(), &rendered))
        }
        Predicate::FullText { columns, value } => {
            if columns.is_empty() {
                return Err(OciError::invalid("full text search needs at least one column"));
            }
            let wrapped: Vec<String> = columns.iter().map(|c| grammar.wrap(c)).collect();
            let mut rendered = String::new();
            for _ in columns {
                rendered = grammar.parameter(ctx, value)?;
            }
            grammar.generator().full_text(&wrapped, &rendered)
        }
        Predicate::JsonContains { column, value } => {
            let col = grammar.wrap(column);
            let mut scratch = ParamContext::new();
            let rendered = grammar.parameter(&mut scratch, value)?;
            let sql = grammar.generator().json_contains(&col, &rendered)?;
            ctx.absorb(scratch.bindings);
            Ok(sql)
        }
        Predicate::Raw { sql, bindings } => {
            ctx.bind_all(bindings.iter().cloned());
            Ok(sql.clone())
        }
        Predicate::Group {
            conditions,
            negated,
        } => {
            let inner = compile_conditions(grammar, ctx, conditions)?;
            Ok(format!("{}({})", if *negated { "not " } else { "" }, inner))
        }
    }
}

fn compare(
    grammar: &OracleGrammar,
    ctx: &mut ParamContext,
    column: &str,
    op: Operator,
    value: &Value,
) -> OciResult<String> {
    let col = grammar.wrap(column);
    if matches!(value, Value::Null) {
        return match op {
            Operator::Eq => Ok(format!("{} is null", col)),
            Operator::Ne => Ok(format!("{} is not null", col)),
            _ => Err(OciError::invalid(format!(
                "cannot compare {} with null using '{}'",
                column,
                op.as_sql()
            ))),
        };
    }
    let operand = grammar.parameter(ctx, value)?;
    if op.is_case_insensitive() {
        return Ok(grammar
            .generator()
            .like_insensitive(&col, op.as_sql(), &operand));
    }
    Ok(format!("{} {} {}", col, op.as_sql(), operand))
}

/// `in` list, chunked at the configured list limit. Empty lists become a
/// constant predicate.
fn in_list(
    grammar: &OracleGrammar,
    ctx: &mut ParamContext,
    column: &str,
    values: &[Value],
    negated: bool,
) -> OciResult<String> {
    if values.is_empty() {
        return Ok(if negated { "1 = 1" } else { "1 = 0" }.to_string());
    }
    let col = grammar.wrap(column);
    let keyword = if negated { "not in" } else { "in" };
    let limit = grammar.config().in_list_limit.max(1);

    let mut chunks = Vec::with_capacity(values.len().div_ceil(limit));
    for chunk in values.chunks(limit) {
        let mut operands = Vec::with_capacity(chunk.len());
        for value in chunk {
            operands.push(grammar.parameter(ctx, value)?);
        }
        chunks.push(format!("{} {} ({})", col, keyword, operands.join(", ")));
    }

    if chunks.len() == 1 {
        return Ok(chunks.remove(0));
    }
    let joiner = if negated { " and " } else { " or " };
    Ok(format!("({})", chunks.join(joiner)))
}
