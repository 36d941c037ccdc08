//! DELETE SQL generation.

use crate::ast::Query;
use crate::error::OciResult;
use crate::transpiler::dml::{mutation_filter, mutation_table};
use crate::transpiler::{OracleGrammar, ParamContext};

pub fn delete_sql(grammar: &OracleGrammar, query: &Query, ctx: &mut ParamContext) -> OciResult<String> {
    let table = mutation_table(grammar, query);
    let filter = mutation_filter(grammar, query, ctx)?;
    Ok(format!("delete from {}{}", table, filter))
}
