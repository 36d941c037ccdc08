//! SELECT SQL generation.

use crate::ast::*;
use crate::error::OciResult;
use crate::transpiler::dml::{components, orders_sql};
use crate::transpiler::{ClauseKind, OracleGrammar, ParamContext};

/// Generate a select, paginated and locked as requested.
pub fn select_sql(grammar: &OracleGrammar, query: &Query, ctx: &mut ParamContext) -> OciResult<String> {
    let sql = if query.unions.is_empty() {
        components(grammar, query, ctx, None, true)?
    } else {
        union_sql(grammar, query, ctx)?
    };
    let sql = grammar.generator().paginate(
        sql,
        query.limit,
        query.offset,
        grammar.config().pagination,
    );
    match &query.lock {
        Some(lock) => Ok(format!("{} {}", sql, grammar.generator().lock(lock)?)),
        None => Ok(sql),
    }
}

/// A union operand that orders or pages must be a derived table.
fn needs_wrapping(query: &Query) -> bool {
    !query.orders.is_empty() || query.limit.is_some() || query.offset.is_some()
}

/// Base query and its union branches. Pagination and union orders apply to
/// the combined result.
fn union_sql(grammar: &OracleGrammar, query: &Query, ctx: &mut ParamContext) -> OciResult<String> {
    let mut sql = components(grammar, query, ctx, None, true)?;
    if !query.orders.is_empty() {
        sql = format!("select * from ({})", sql);
    }

    let previous = ctx.enter(ClauseKind::Union);
    for union in &query.unions {
        let mut branch = grammar.subquery(ctx, &union.query)?;
        if needs_wrapping(&union.query) {
            branch = format!("select * from ({})", branch);
        }
        sql.push_str(if union.all { " union all " } else { " union " });
        sql.push_str(&branch);
    }

    ctx.enter(ClauseKind::UnionOrder);
    if !query.union_orders.is_empty() {
        sql.push(' ');
        sql.push_str(&orders_sql(grammar, ctx, &query.union_orders)?);
    }
    ctx.enter(previous);
    Ok(sql)
}
