//! Query statements and the clause pieces they share.

pub mod aggregate;
pub mod delete;
pub mod insert;
pub mod paginate;
pub mod select;
pub mod update;

use crate::ast::*;
use crate::error::{OciError, OciResult};
use crate::transpiler::conditions::compile_conditions;
use crate::transpiler::identifier;
use crate::transpiler::{ClauseKind, OracleGrammar, OutParam, ParamContext};

/// `select ... from ... join ... where ... group by ... having ... order by ...`
///
/// `projection` replaces the select list; `with_orders = false` drops the
/// order clause.
pub(crate) fn components(
    grammar: &OracleGrammar,
    query: &Query,
    ctx: &mut ParamContext,
    projection: Option<&str>,
    with_orders: bool,
) -> OciResult<String> {
    if query.table.is_empty() {
        return Err(OciError::invalid("query has no table"));
    }
    let previous = ctx.enter(ClauseKind::Select);
    let mut parts: Vec<String> = Vec::new();

    match projection {
        Some(projection) => parts.push(format!("select {}", projection)),
        None => parts.push(select_list(grammar, query, ctx)?),
    }
    parts.push(format!("from {}", grammar.wrap_table(&query.table)));

    ctx.enter(ClauseKind::Join);
    for join in &query.joins {
        parts.push(join_sql(grammar, ctx, join)?);
    }

    ctx.enter(ClauseKind::Where);
    if !query.wheres.is_empty() {
        parts.push(format!("where {}", compile_conditions(grammar, ctx, &query.wheres)?));
    }

    if !query.groups.is_empty() {
        parts.push(format!("group by {}", grammar.columnize(&query.groups)));
    }

    ctx.enter(ClauseKind::Having);
    if !query.havings.is_empty() {
        parts.push(format!("having {}", compile_conditions(grammar, ctx, &query.havings)?));
    }

    ctx.enter(ClauseKind::Order);
    if with_orders && !query.orders.is_empty() {
        parts.push(orders_sql(grammar, ctx, &query.orders)?);
    }

    ctx.enter(previous);
    Ok(parts.join(" "))
}

fn select_list(grammar: &OracleGrammar, query: &Query, ctx: &mut ParamContext) -> OciResult<String> {
    let keyword = if query.distinct { "select distinct" } else { "select" };
    if query.columns.is_empty() {
        return Ok(format!("{} *", keyword));
    }
    let mut columns = Vec::with_capacity(query.columns.len());
    for expr in &query.columns {
        columns.push(expr_sql(grammar, ctx, expr)?);
    }
    Ok(format!("{} {}", keyword, columns.join(", ")))
}

/// Render a selectable expression.
pub(crate) fn expr_sql(grammar: &OracleGrammar, ctx: &mut ParamContext, expr: &Expr) -> OciResult<String> {
    Ok(match expr {
        Expr::Star => "*".to_string(),
        Expr::Named(name) => grammar.wrap(name),
        Expr::Aliased { expr, alias } => {
            format!("{} as {}", expr_sql(grammar, ctx, expr)?, grammar.quote(alias))
        }
        Expr::Raw { sql, bindings } => {
            ctx.bind_all(bindings.iter().cloned());
            sql.clone()
        }
        Expr::Subquery { query, alias } => {
            format!("({}) as {}", grammar.subquery(ctx, query)?, grammar.quote(alias))
        }
        Expr::Aggregate {
            func,
            column,
            distinct,
            alias,
        } => {
            let inner = expr_sql(grammar, ctx, column)?;
            let call = if *distinct {
                format!("{}(distinct {})", func, inner)
            } else {
                format!("{}({})", func, inner)
            };
            match alias {
                Some(alias) => format!("{} as {}", call, grammar.quote(alias)),
                None => call,
            }
        }
    })
}

fn join_sql(grammar: &OracleGrammar, ctx: &mut ParamContext, join: &Join) -> OciResult<String> {
    let keyword = match join.kind {
        JoinKind::Inner => "inner join",
        JoinKind::Left => "left join",
        JoinKind::Right => "right join",
        JoinKind::Cross => "cross join",
        JoinKind::Full => return Err(OciError::unsupported("full outer join")),
    };
    let source = match &join.source {
        JoinSource::Table(table) => grammar.wrap_table(table),
        JoinSource::Sub { query, alias } => {
            let sub = grammar.subquery(ctx, query)?;
            grammar
                .generator()
                .table_alias(&format!("({})", sub), &grammar.quote(alias))
        }
    };
    if join.on.is_empty() {
        return Ok(format!("{} {}", keyword, source));
    }
    let on = compile_conditions(grammar, ctx, &join.on)?;
    Ok(format!("{} {} on {}", keyword, source, on))
}

pub(crate) fn orders_sql(grammar: &OracleGrammar, ctx: &mut ParamContext, orders: &[Order]) -> OciResult<String> {
    let mut rendered = Vec::with_capacity(orders.len());
    for order in orders {
        match order {
            Order::Column { column, direction } => {
                rendered.push(format!("{} {}", grammar.wrap(column), direction.as_sql()));
            }
            Order::Raw { sql, bindings } => {
                ctx.bind_all(bindings.iter().cloned());
                rendered.push(sql.clone());
            }
        }
    }
    Ok(format!("order by {}", rendered.join(", ")))
}

fn needs_row_rewrite(query: &Query) -> bool {
    query.has_joins() || query.limit.is_some() || query.offset.is_some() || !query.orders.is_empty()
}

/// Table an update or delete targets; the alias is dropped when the filter
/// is rewritten through the row identifier.
pub(crate) fn mutation_table(grammar: &OracleGrammar, query: &Query) -> String {
    if needs_row_rewrite(query) {
        let base = identifier::split_alias(&query.table)
            .map(|(base, _)| base)
            .unwrap_or(&query.table);
        grammar.wrap_table(base)
    } else {
        grammar.wrap_table(&query.table)
    }
}

/// Where clause of an update or delete (with a leading space, or empty).
///
/// Joins, ordering and limits cannot be expressed on the statement itself,
/// so the target rows are selected by row identifier in a subquery.
pub(crate) fn mutation_filter(grammar: &OracleGrammar, query: &Query, ctx: &mut ParamContext) -> OciResult<String> {
    if !needs_row_rewrite(query) {
        let previous = ctx.enter(ClauseKind::Where);
        let conditions = compile_conditions(grammar, ctx, &query.wheres)?;
        ctx.enter(previous);
        return Ok(if conditions.is_empty() {
            String::new()
        } else {
            format!(" where {}", conditions)
        });
    }

    let generator = grammar.generator();
    let row_id = generator
        .row_identifier()
        .ok_or_else(|| OciError::unsupported("update or delete with joins, ordering or limits"))?;
    let reference = grammar.table_reference(&query.table);
    let alias = grammar.quote("rid");
    let projection = format!("{}.{} as {}", reference, row_id, alias);
    let sub = components(grammar, query, ctx, Some(&projection), true)?;

    if query.limit.is_none() && query.offset.is_none() {
        return Ok(format!(" where {} in ({})", row_id, sub));
    }
    let sub = generator.paginate(sub, query.limit, query.offset, grammar.config().pagination);
    Ok(format!(" where {} in (select {} from ({}))", row_id, alias, sub))
}

/// `returning ... into ...` for LOB locators and the generated key.
pub(crate) fn returning_clause(
    grammar: &OracleGrammar,
    ctx: &mut ParamContext,
    lobs: &[Lob],
    key: Option<&str>,
) -> String {
    let mut columns = Vec::new();
    let mut slots = Vec::new();
    for lob in lobs {
        columns.push(grammar.wrap(&lob.column));
        slots.push(ctx.out(OutParam::Lob {
            column: lob.column.clone(),
            kind: lob.kind,
            data: lob.data.clone(),
        }));
    }
    if let Some(key) = key {
        columns.push(grammar.wrap(key));
        slots.push(ctx.out(OutParam::GeneratedKey {
            column: key.to_string(),
        }));
    }
    if columns.is_empty() {
        return String::new();
    }
    grammar.generator().returning(&columns, &slots)
}
