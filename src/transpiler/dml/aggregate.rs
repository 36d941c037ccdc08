//! Row counts for pagination.

use crate::ast::*;
use crate::error::OciResult;
use crate::transpiler::{ClauseKind, OracleGrammar, ParamContext};
use crate::transpiler::dml::select::select_sql;

/// `select count(*) as aggregate ...` over the rows `query` pages through.
///
/// Grouped, filtered-by-having, unioned and multi-column distinct queries
/// are counted through a derived `"TEMP_TABLE"` with select aliases
/// stripped; a distinct single column becomes `count(distinct ..)`, and
/// anything else has its select list replaced.
pub fn count_sql(grammar: &OracleGrammar, query: &Query, ctx: &mut ParamContext) -> OciResult<String> {
    let mut inner = query.clone();
    inner.orders.clear();
    inner.union_orders.clear();
    inner.limit = None;
    inner.offset = None;
    inner.lock = None;

    let distinct_column = match query.columns.as_slice() {
        [column] if query.distinct && matches!(column.without_alias(), Expr::Named(_)) => Some(column),
        _ => None,
    };
    let derived = !query.groups.is_empty()
        || !query.havings.is_empty()
        || !query.unions.is_empty()
        || (query.distinct && distinct_column.is_none());

    if derived {
        inner.columns = inner.columns.iter().map(Expr::without_alias).collect();
        let sql = select_sql(grammar, &inner, ctx)?;
        let derived = grammar
            .generator()
            .table_alias(&format!("({})", sql), &grammar.quote("temp_table"));
        return Ok(format!("select count(*) as aggregate from {}", derived));
    }

    let counted = match distinct_column {
        Some(column) => {
            let previous = ctx.enter(ClauseKind::Select);
            let column = super::expr_sql(grammar, ctx, &column.without_alias())?;
            ctx.enter(previous);
            format!("count(distinct {}) as aggregate", column)
        }
        None => "count(*) as aggregate".to_string(),
    };
    inner.columns = vec![Expr::raw(counted)];
    inner.distinct = false;
    select_sql(grammar, &inner, ctx)
}
