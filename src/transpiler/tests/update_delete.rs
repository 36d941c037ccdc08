//! Update and delete compilation, including the row-id rewrite.

use pretty_assertions::assert_eq;

use crate::ast::*;
use crate::config::GrammarConfig;
use crate::error::OciError;
use crate::transpiler::{Dialect, OracleGrammar, ToSql};

#[test]
fn test_update() {
    let sql = Query::update("users")
        .set("email", "x@example.com")
        .where_eq("id", 1)
        .to_sql()
        .unwrap();
    assert_eq!(sql.sql, "update \"USERS\" set \"EMAIL\" = ? where \"ID\" = ?");
    assert_eq!(sql.flat_bindings(), vec![Value::from("x@example.com"), Value::Int(1)]);
}

#[test]
fn test_update_needs_assignments() {
    let err = Query::update("users").where_eq("id", 1).to_sql().unwrap_err();
    assert!(matches!(err, OciError::InvalidArgument(_)));
}

#[test]
fn test_update_with_join_uses_rowid() {
    let sql = Query::update("users")
        .join("posts", "users.id", Operator::Eq, "posts.user_id")
        .set("active", 0)
        .where_eq("posts.flagged", 1)
        .to_sql()
        .unwrap();
    assert_eq!(
        sql.sql,
        "update \"USERS\" set \"ACTIVE\" = ? where rowid in (select \"USERS\".rowid as \"RID\" from \"USERS\" \
         inner join \"POSTS\" on \"USERS\".\"ID\" = \"POSTS\".\"USER_ID\" where \"POSTS\".\"FLAGGED\" = ?)"
    );
    assert_eq!(sql.flat_bindings(), vec![Value::Int(0), Value::Int(1)]);
}

#[test]
fn test_update_lob_column() {
    let sql = Query::update("documents")
        .set("title", "t")
        .lob("body", LobKind::Blob, vec![1u8, 2, 3])
        .where_eq("id", 7)
        .to_sql()
        .unwrap();
    assert_eq!(
        sql.sql,
        "update \"DOCUMENTS\" set \"TITLE\" = ?, \"BODY\" = empty_blob() where \"ID\" = ? returning \"BODY\" into ?"
    );
    assert_eq!(sql.parameters().len(), 3);
}

#[test]
fn test_delete() {
    let sql = Query::delete_from("users").where_eq("id", 1).to_sql().unwrap();
    assert_eq!(sql.sql, "delete from \"USERS\" where \"ID\" = ?");

    let sql = Query::delete_from("users").to_sql().unwrap();
    assert_eq!(sql.sql, "delete from \"USERS\"");
}

#[test]
fn test_delete_aliased_with_order_and_limit() {
    let sql = Query::delete_from("users as u")
        .where_eq("u.active", 0)
        .order_by("u.created_at", SortOrder::Asc)
        .limit(100)
        .to_sql()
        .unwrap();
    assert_eq!(
        sql.sql,
        "delete from \"USERS\" where rowid in (select \"RID\" from (select * from (select \"U\".rowid as \"RID\" \
         from \"USERS\" \"U\" where \"U\".\"ACTIVE\" = ? order by \"U\".\"CREATED_AT\" asc) where rownum <= 100))"
    );
    assert_eq!(sql.flat_bindings(), vec![Value::Int(0)]);
}

#[test]
fn test_delete_with_join() {
    let sql = Query::delete_from("users")
        .join("bans", "users.id", Operator::Eq, "bans.user_id")
        .to_sql()
        .unwrap();
    assert_eq!(
        sql.sql,
        "delete from \"USERS\" where rowid in (select \"USERS\".rowid as \"RID\" from \"USERS\" \
         inner join \"BANS\" on \"USERS\".\"ID\" = \"BANS\".\"USER_ID\")"
    );
}

#[test]
fn test_rewrite_needs_row_identifier() {
    let grammar = OracleGrammar::with_dialect(GrammarConfig::default(), Dialect::Ansi);
    let query = Query::delete_from("users")
        .join("bans", "users.id", Operator::Eq, "bans.user_id");
    let err = grammar.compile(&query).unwrap_err();
    assert!(matches!(err, OciError::Unsupported { .. }));
}
