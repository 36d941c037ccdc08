//! Oracle Text indexes.
//!
//! A multi-column index is built on its first column with a
//! `MULTI_COLUMN_DATASTORE` preference listing every column; the preference
//! is named after the index.

use crate::transpiler::OracleGrammar;
use crate::transpiler::ddl::columns::quote_string;

/// Statements creating a `ctxsys.context` index named `name`.
pub fn create_index(grammar: &OracleGrammar, table: &str, name: &str, columns: &[String]) -> Vec<String> {
    let Some(first) = columns.first() else {
        return Vec::new();
    };
    if columns.len() == 1 {
        return vec![format!(
            "create index {} on {} ({}) indextype is ctxsys.context parameters ('sync ( on commit )')",
            name,
            table,
            grammar.quote(first)
        )];
    }

    let preference = format!("{}_preference", name);
    let listed: Vec<String> = columns.iter().map(|c| c.to_uppercase()).collect();
    vec![
        format!(
            "begin ctx_ddl.create_preference({pref}, 'MULTI_COLUMN_DATASTORE'); \
             ctx_ddl.set_attribute({pref}, 'COLUMNS', {cols}); end;",
            pref = quote_string(&preference),
            cols = quote_string(&listed.join(", "))
        ),
        format!(
            "create index {} on {} ({}) indextype is ctxsys.context parameters ('datastore {} sync(on commit)')",
            name,
            table,
            grammar.quote(first),
            preference
        ),
    ]
}

/// Drop index `name` and the datastore preference created with it, if any.
pub fn drop_index(name: &str) -> Vec<String> {
    vec![
        format!("drop index {}", name),
        drop_preferences_where(&format!(
            " where pre_name = upper({})",
            quote_string(&format!("{}_preference", name))
        )),
    ]
}

/// Drop the datastore preferences created for `table`'s indexes, or every
/// preference of the current user when `table` is `None`.
///
/// Preferences are found through the indexes they are named after, so
/// shortened index names match too. Run it before the indexes are dropped.
pub fn drop_preferences(table: Option<&str>) -> String {
    match table {
        Some(table) => drop_preferences_where(&format!(
            " where pre_name in (select idx_name || '_PREFERENCE' from ctx_user_indexes \
             where idx_table = upper({}))",
            quote_string(table)
        )),
        None => drop_preferences_where(""),
    }
}

fn drop_preferences_where(filter: &str) -> String {
    format!(
        "begin for p in (select pre_name from ctx_user_preferences{}) loop \
         ctx_ddl.drop_preference(p.pre_name); end loop; end;",
        filter
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_column_has_no_preference() {
        let grammar = OracleGrammar::default();
        let sql = create_index(&grammar, "\"POSTS\"", "posts_body_fulltext", &["body".to_string()]);
        assert_eq!(sql.len(), 1);
        assert!(!sql[0].contains("MULTI_COLUMN_DATASTORE"));
    }

    #[test]
    fn test_preference_drop_scoped_to_table() {
        assert_eq!(
            drop_preferences(Some("posts")),
            "begin for p in (select pre_name from ctx_user_preferences where pre_name in \
             (select idx_name || '_PREFERENCE' from ctx_user_indexes where idx_table = upper('posts'))) \
             loop ctx_ddl.drop_preference(p.pre_name); end loop; end;"
        );
        assert!(!drop_preferences(None).contains("where"));
    }

    #[test]
    fn test_index_drop_takes_its_preference() {
        let statements = drop_index("posts_title_body_fulltext");
        assert_eq!(statements[0], "drop index posts_title_body_fulltext");
        assert!(statements[1].contains("where pre_name = upper('posts_title_body_fulltext_preference')"));
    }
}
