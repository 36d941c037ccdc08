//! Select compilation.

use pretty_assertions::assert_eq;

use super::{assert_aligned, grammar, prefixed, strings};
use crate::ast::builders::{count, count_distinct, sum};
use crate::ast::*;
use crate::config::GrammarConfig;
use crate::error::OciError;
use crate::transpiler::{OracleGrammar, ToSql};

#[test]
fn test_select_all() {
    let sql = Query::table("users").to_sql().unwrap();
    assert_eq!(sql.sql, "select * from \"USERS\"");
    assert!(sql.flat_bindings().is_empty());
}

#[test]
fn test_select_where_id() {
    let sql = Query::table("users").where_eq("id", 1).to_sql().unwrap();
    assert_eq!(sql.sql, "select * from \"USERS\" where \"ID\" = ?");
    assert_eq!(sql.flat_bindings(), vec![Value::Int(1)]);
}

#[test]
fn test_columns_and_aliases() {
    let sql = Query::table("users as u")
        .select(["u.id", "name as n"])
        .where_eq("u.id", 1)
        .to_sql()
        .unwrap();
    assert_eq!(
        sql.sql,
        "select \"U\".\"ID\", \"NAME\" as \"N\" from \"USERS\" \"U\" where \"U\".\"ID\" = ?"
    );
}

#[test]
fn test_schema_qualified_table() {
    let sql = Query::table("hr.employees").select(["hr.employees.id"]).to_sql().unwrap();
    assert_eq!(sql.sql, "select \"HR\".\"EMPLOYEES\".\"ID\" from \"HR\".\"EMPLOYEES\"");

    let grammar = OracleGrammar::new(GrammarConfig::default().with_schema("hr"));
    let sql = grammar.compile(&Query::table("employees")).unwrap();
    assert_eq!(sql.sql, "select * from \"HR\".\"EMPLOYEES\"");
}

#[test]
fn test_table_prefix_applies_to_qualifiers() {
    let sql = prefixed("app_")
        .compile(&Query::table("users").where_eq("users.id", 1))
        .unwrap();
    assert_eq!(sql.sql, "select * from \"APP_USERS\" where \"APP_USERS\".\"ID\" = ?");
}

#[test]
fn test_embedded_quote_doubled() {
    let sql = Query::table("users").select(["o\"brien"]).to_sql().unwrap();
    assert_eq!(sql.sql, "select \"O\"\"BRIEN\" from \"USERS\"");
}

#[test]
fn test_distinct() {
    let sql = Query::table("users").select(["name"]).distinct().to_sql().unwrap();
    assert_eq!(sql.sql, "select distinct \"NAME\" from \"USERS\"");
}

#[test]
fn test_aggregates() {
    let sql = Query::table("orders")
        .select_expr(count())
        .select_expr(sum("total").alias("total"))
        .select_expr(count_distinct("user_id"))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql.sql,
        "select count(*), sum(\"TOTAL\") as \"TOTAL\", count(distinct \"USER_ID\") from \"ORDERS\""
    );
}

#[test]
fn test_joins() {
    let sql = Query::table("users")
        .join("posts", "users.id", Operator::Eq, "posts.user_id")
        .left_join("images", "posts.id", Operator::Eq, "images.post_id")
        .cross_join("roles")
        .to_sql()
        .unwrap();
    assert_eq!(
        sql.sql,
        "select * from \"USERS\" inner join \"POSTS\" on \"USERS\".\"ID\" = \"POSTS\".\"USER_ID\" \
         left join \"IMAGES\" on \"POSTS\".\"ID\" = \"IMAGES\".\"POST_ID\" cross join \"ROLES\""
    );
}

#[test]
fn test_join_with_bound_condition() {
    let sql = Query::table("users")
        .join_where(JoinKind::Inner, "posts", |q| {
            q.where_column("posts.user_id", Operator::Eq, "users.id")
                .where_eq("posts.published", 1)
        })
        .to_sql()
        .unwrap();
    assert_eq!(
        sql.sql,
        "select * from \"USERS\" inner join \"POSTS\" on \"POSTS\".\"USER_ID\" = \"USERS\".\"ID\" and \"POSTS\".\"PUBLISHED\" = ?"
    );
    assert_eq!(sql.flat_bindings(), vec![Value::Int(1)]);
}

#[test]
fn test_join_subquery() {
    let posts = Query::table("posts").select(["user_id"]).where_eq("published", 1);
    let sql = Query::table("users")
        .join_sub(posts, "p", "p.user_id", Operator::Eq, "users.id")
        .where_eq("users.active", 1)
        .to_sql()
        .unwrap();
    assert_eq!(
        sql.sql,
        "select * from \"USERS\" inner join (select \"USER_ID\" from \"POSTS\" where \"PUBLISHED\" = ?) \"P\" \
         on \"P\".\"USER_ID\" = \"USERS\".\"ID\" where \"USERS\".\"ACTIVE\" = ?"
    );
    assert_aligned(&sql);
}

#[test]
fn test_full_outer_join_unsupported() {
    let err = Query::table("users")
        .join_where(JoinKind::Full, "posts", |q| {
            q.where_column("posts.user_id", Operator::Eq, "users.id")
        })
        .to_sql()
        .unwrap_err();
    assert!(matches!(err, OciError::Unsupported { feature: "full outer join" }));
}

#[test]
fn test_group_having_order() {
    let sql = Query::table("orders")
        .select(["user_id"])
        .group_by(&["user_id"])
        .having_op("total", Operator::Gt, 100)
        .order_by("user_id", SortOrder::Asc)
        .order_by_desc("total")
        .to_sql()
        .unwrap();
    assert_eq!(
        sql.sql,
        "select \"USER_ID\" from \"ORDERS\" group by \"USER_ID\" having \"TOTAL\" > ? \
         order by \"USER_ID\" asc, \"TOTAL\" desc"
    );
}

#[test]
fn test_binding_order_independent_of_attach_order() {
    let union = || Query::table("admins").where_eq("level", "u");

    let forward = Query::table("users")
        .select_raw("? as tag", strings(&["s"]))
        .join_where(JoinKind::Inner, "posts", |q| {
            q.where_column("posts.user_id", Operator::Eq, "users.id")
                .where_eq("posts.kind", "j")
        })
        .where_eq("users.id", "w")
        .group_by(&["users.id"])
        .having_raw("count(*) > ?", strings(&["h"]))
        .order_by_raw("nlssort(?)", strings(&["o"]))
        .union(union())
        .order_by_raw("decode(?)", strings(&["uo"]));

    let shuffled = Query::table("users")
        .having_raw("count(*) > ?", strings(&["h"]))
        .where_eq("users.id", "w")
        .order_by_raw("nlssort(?)", strings(&["o"]))
        .group_by(&["users.id"])
        .join_where(JoinKind::Inner, "posts", |q| {
            q.where_column("posts.user_id", Operator::Eq, "users.id")
                .where_eq("posts.kind", "j")
        })
        .select_raw("? as tag", strings(&["s"]))
        .union(union())
        .order_by_raw("decode(?)", strings(&["uo"]));

    let expected = strings(&["s", "j", "w", "h", "o", "u", "uo"]);
    let forward = forward.to_sql().unwrap();
    let shuffled = shuffled.to_sql().unwrap();
    assert_eq!(forward.flat_bindings(), expected);
    assert_eq!(shuffled.flat_bindings(), expected);
    assert_eq!(forward.sql, shuffled.sql);
    assert_aligned(&forward);
}

#[test]
fn test_union_all() {
    let sql = Query::table("users")
        .select(["id"])
        .union_all(Query::table("admins").select(["id"]))
        .to_sql()
        .unwrap();
    assert_eq!(sql.sql, "select \"ID\" from \"USERS\" union all select \"ID\" from \"ADMINS\"");
}

#[test]
fn test_union_order_and_limit_wrap_whole_result() {
    let sql = Query::table("users")
        .select(["id"])
        .union(Query::table("admins").select(["id"]))
        .order_by_desc("id")
        .limit(10)
        .to_sql()
        .unwrap();
    assert_eq!(
        sql.sql,
        "select * from (select \"ID\" from \"USERS\" union select \"ID\" from \"ADMINS\" order by \"ID\" desc) where rownum <= 10"
    );
}

#[test]
fn test_union_branch_with_limit_is_derived() {
    let sql = Query::table("users")
        .union(Query::table("admins").limit(5))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql.sql,
        "select * from \"USERS\" union select * from (select * from (select * from \"ADMINS\") where rownum <= 5)"
    );
}

#[test]
fn test_lock_for_update() {
    let sql = Query::table("users").where_eq("id", 1).lock_for_update().to_sql().unwrap();
    assert_eq!(sql.sql, "select * from \"USERS\" where \"ID\" = ? for update");

    let sql = Query::table("users").lock_raw("for update nowait").to_sql().unwrap();
    assert_eq!(sql.sql, "select * from \"USERS\" for update nowait");
}

#[test]
fn test_shared_lock_unsupported() {
    let err = Query::table("users").shared_lock().to_sql().unwrap_err();
    assert_eq!(err.to_string(), "lock in share mode is not supported by the Oracle grammar");
}

#[test]
fn test_exists() {
    let sql = grammar()
        .compile_exists(&Query::table("users").where_eq("id", 1))
        .unwrap();
    assert_eq!(
        sql.sql,
        "select 1 as \"exists\" from (select * from \"USERS\" where \"ID\" = ?) where rownum = 1"
    );
}

#[test]
fn test_count_strips_order_and_paging() {
    let query = Query::table("users")
        .where_eq("active", 1)
        .order_by("name", SortOrder::Asc)
        .for_page(3, 10);
    let sql = grammar().compile_count_for_pagination(&query).unwrap();
    assert_eq!(sql.sql, "select count(*) as aggregate from \"USERS\" where \"ACTIVE\" = ?");
    assert_eq!(sql.flat_bindings(), vec![Value::Int(1)]);
}

#[test]
fn test_count_distinct_column() {
    let query = Query::table("users").select(["email"]).distinct();
    let sql = grammar().compile_count_for_pagination(&query).unwrap();
    assert_eq!(sql.sql, "select count(distinct \"EMAIL\") as aggregate from \"USERS\"");
}

#[test]
fn test_count_distinct_columns_uses_temp_table() {
    let query = Query::table("users")
        .select(["name", "email as mail"])
        .distinct()
        .where_eq("active", 1);
    let sql = grammar().compile_count_for_pagination(&query).unwrap();
    assert_eq!(
        sql.sql,
        "select count(*) as aggregate from (select distinct \"NAME\", \"EMAIL\" from \"USERS\" \
         where \"ACTIVE\" = ?) \"TEMP_TABLE\""
    );
    assert_eq!(sql.flat_bindings(), vec![Value::Int(1)]);
}

#[test]
fn test_count_distinct_star_uses_temp_table() {
    let sql = grammar()
        .compile_count_for_pagination(&Query::table("users").distinct())
        .unwrap();
    assert_eq!(
        sql.sql,
        "select count(*) as aggregate from (select distinct * from \"USERS\") \"TEMP_TABLE\""
    );
}

#[test]
fn test_count_union_uses_temp_table() {
    let query = Query::table("users")
        .where_eq("active", 1)
        .union(Query::table("admins").where_eq("active", 1))
        .order_by_desc("id");
    let sql = grammar().compile_count_for_pagination(&query).unwrap();
    assert_eq!(
        sql.sql,
        "select count(*) as aggregate from (select * from \"USERS\" where \"ACTIVE\" = ? \
         union select * from \"ADMINS\" where \"ACTIVE\" = ?) \"TEMP_TABLE\""
    );
    assert_eq!(sql.flat_bindings().len(), 2);
}

#[test]
fn test_count_grouped_strips_aliases() {
    let query = Query::table("orders")
        .select(["user_id as uid"])
        .group_by(&["user_id"]);
    let sql = grammar().compile_count_for_pagination(&query).unwrap();
    assert_eq!(
        sql.sql,
        "select count(*) as aggregate from (select \"USER_ID\" from \"ORDERS\" group by \"USER_ID\") \"TEMP_TABLE\""
    );
}

#[test]
fn test_missing_table() {
    let err = Query::default().to_sql().unwrap_err();
    assert!(matches!(err, OciError::InvalidArgument(_)));
}

#[test]
fn test_truncate() {
    let sql = Query::truncate("users").to_sql().unwrap();
    assert_eq!(sql.sql, "truncate table \"USERS\"");
}
