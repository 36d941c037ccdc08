//! UPDATE SQL generation.

use crate::ast::*;
use crate::error::{OciError, OciResult};
use crate::transpiler::dml::{mutation_filter, mutation_table, returning_clause};
use crate::transpiler::{ClauseKind, OracleGrammar, ParamContext};

pub fn update_sql(grammar: &OracleGrammar, query: &Query, ctx: &mut ParamContext) -> OciResult<String> {
    if query.assignments.is_empty() && query.lobs.is_empty() {
        return Err(OciError::invalid("update needs at least one assignment"));
    }
    let table = mutation_table(grammar, query);

    let previous = ctx.enter(ClauseKind::Values);
    let mut sets = Vec::with_capacity(query.assignments.len() + query.lobs.len());
    for (column, value) in &query.assignments {
        let operand = grammar.parameter(ctx, value)?;
        sets.push(format!("{} = {}", grammar.wrap(column), operand));
    }
    for lob in &query.lobs {
        sets.push(format!(
            "{} = {}",
            grammar.wrap(&lob.column),
            grammar.generator().empty_lob(lob.kind)?
        ));
    }
    ctx.enter(previous);

    let filter = mutation_filter(grammar, query, ctx)?;
    let mut sql = format!("update {} set {}{}", table, sets.join(", "), filter);
    sql.push_str(&returning_clause(grammar, ctx, &query.lobs, None));
    Ok(sql)
}
