//! Connection round trips against a recording executor.

mod common;

use pretty_assertions::assert_eq;
use qail_oci::prelude::*;
use qail_oci::transpiler::OutParam;

use common::{row, Recorder};

fn connect(executor: Recorder) -> Connection<Recorder> {
    Connection::new(OracleGrammar::default(), executor)
}

#[tokio::test]
async fn test_select_returns_rows() {
    let db = connect(Recorder::new().respond(Outcome::Rows(vec![row(&[("ID", Value::Int(1))])])));
    let rows = db
        .select(&Query::table("users").where_eq("id", 1))
        .await
        .unwrap();
    assert_eq!(rows, vec![row(&[("ID", Value::Int(1))])]);
    assert_eq!(db.executor().log(), vec!["select * from \"USERS\" where \"ID\" = ?".to_string()]);
    assert_eq!(db.executor().params(), vec![vec![Parameter::In(Value::Int(1))]]);
}

#[tokio::test]
async fn test_first_limits_to_one_row() {
    let db = connect(Recorder::new());
    assert_eq!(db.first(&Query::table("users")).await.unwrap(), None);
    assert_eq!(
        db.executor().log(),
        vec!["select * from (select * from \"USERS\") where rownum <= 1".to_string()]
    );
}

#[tokio::test]
async fn test_insert_get_id_reads_out_parameter() {
    let db = connect(Recorder::new().respond(Outcome::GeneratedKey(Value::Int(42))));
    let id = db
        .insert_get_id(&Query::insert_into("users").values([("email", "ada@example.com")]), "id")
        .await
        .unwrap();
    assert_eq!(id, Value::Int(42));
    assert_eq!(
        db.executor().log(),
        vec!["insert into \"USERS\" (\"EMAIL\") values (?) returning \"ID\" into ?".to_string()]
    );
    assert_eq!(
        db.executor().params(),
        vec![vec![
            Parameter::In(Value::from("ada@example.com")),
            Parameter::Out(OutParam::GeneratedKey { column: "id".into() }),
        ]]
    );
}

#[tokio::test]
async fn test_wrong_outcome_is_an_execution_error() {
    let db = connect(Recorder::new().respond(Outcome::Rows(vec![])));
    let err = db
        .update(&Query::update("users").set("name", "x"))
        .await
        .unwrap_err();
    assert!(matches!(err, OciError::Execution(_)));
}

#[tokio::test]
async fn test_update_and_delete_report_affected_rows() {
    let db = connect(
        Recorder::new()
            .respond(Outcome::Affected(3))
            .respond(Outcome::Affected(1)),
    );
    let updated = db
        .update(&Query::update("users").set("active", false).where_eq("id", 7))
        .await
        .unwrap();
    let deleted = db
        .delete(&Query::delete_from("users").where_eq("id", 7))
        .await
        .unwrap();
    assert_eq!((updated, deleted), (3, 1));
}

#[tokio::test]
async fn test_exists_is_true_when_a_row_comes_back() {
    let db = connect(
        Recorder::new()
            .respond(Outcome::Rows(vec![row(&[("exists", Value::Int(1))])]))
            .respond(Outcome::Rows(vec![])),
    );
    let query = Query::table("users").where_eq("email", "a");
    assert!(db.exists(&query).await.unwrap());
    assert!(!db.exists(&query).await.unwrap());
    assert_eq!(
        db.executor().log()[0],
        "select 1 as \"exists\" from (select * from \"USERS\" where \"EMAIL\" = ?) where rownum = 1"
    );
}

#[tokio::test]
async fn test_paginate_counts_then_fetches() {
    let db = connect(
        Recorder::new()
            .respond(Outcome::Rows(vec![row(&[("AGGREGATE", Value::Int(25))])]))
            .respond(Outcome::Rows(vec![row(&[("ID", Value::Int(11))])])),
    );
    let page = db
        .paginate(&Query::table("users").order_by("id", SortOrder::Asc), 2, 10)
        .await
        .unwrap();
    assert_eq!(page.total, 25);
    assert_eq!(page.items.len(), 1);

    let log = db.executor().log();
    assert_eq!(log[0], "select count(*) as aggregate from \"USERS\"");
    assert!(log[1].contains("where rownum <= 20) t2 where t2.\"rn\" >= 11"), "{}", log[1]);
}

#[tokio::test]
async fn test_paginate_skips_fetch_when_empty() {
    let db = connect(Recorder::new().respond(Outcome::Rows(vec![row(&[("aggregate", Value::Int(0))])])));
    let page = db.paginate(&Query::table("users"), 1, 10).await.unwrap();
    assert_eq!(page.total, 0);
    assert!(page.items.is_empty());
    assert_eq!(db.executor().log().len(), 1);
}

#[tokio::test]
async fn test_executor_errors_propagate() {
    let db = connect(Recorder::failing_on("USERS"));
    let err = db.select(&Query::table("users")).await.unwrap_err();
    assert!(err.to_string().contains("ORA-00955"));
}
