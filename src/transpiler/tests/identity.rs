//! Sequence and trigger emulation.

use pretty_assertions::assert_eq;

use super::{grammar, prefixed};
use crate::ast::{Blueprint, Value};
use crate::config::GrammarConfig;
use crate::transpiler::OracleGrammar;

#[test]
fn test_create_statements() {
    let identity = grammar().identity("users", "id");
    assert_eq!(
        identity.create(),
        vec![
            "create sequence \"USERS_ID_SEQ\" minvalue 1 start with 1 increment by 1".to_string(),
            "create trigger \"USERS_ID_TRG\" before insert on \"USERS\" for each row begin \
             if :new.\"ID\" is null then select \"USERS_ID_SEQ\".nextval into :new.\"ID\" from dual; end if; end;"
                .to_string(),
        ]
    );
}

#[test]
fn test_drop_statements() {
    assert_eq!(
        grammar().identity("users", "id").drop(),
        vec![
            "drop trigger \"USERS_ID_TRG\"".to_string(),
            "drop sequence \"USERS_ID_SEQ\"".to_string(),
        ]
    );
}

#[test]
fn test_prefixed_names() {
    let identity = prefixed("app_").identity("users", "id");
    assert_eq!(identity.sequence, "app_users_id_seq");
    assert_eq!(identity.drop_sequence(), "drop sequence \"APP_USERS_ID_SEQ\"");
}

#[test]
fn test_overridden_sequence() {
    let identity = grammar().identity("users", "id").with_sequence("user_ids");
    assert_eq!(identity.drop_sequence(), "drop sequence \"USER_IDS\"");
    assert!(identity.create_trigger().contains("select \"USER_IDS\".nextval"));
}

#[test]
fn test_rename_keeps_pair_consistent() {
    let from = grammar().identity("users", "id");
    let to = grammar().identity("members", "id");
    let statements = from.rename(&to).unwrap();
    assert_eq!(statements[0], "drop trigger \"USERS_ID_TRG\"");
    assert_eq!(statements[1], "rename \"USERS_ID_SEQ\" to \"MEMBERS_ID_SEQ\"");
    assert!(statements[2].starts_with("create trigger \"MEMBERS_ID_TRG\" before insert on \"MEMBERS\""));
    assert!(statements[2].contains("\"MEMBERS_ID_SEQ\".nextval"));
}

#[test]
fn test_value_queries() {
    let identity = grammar().identity("users", "id");
    assert_eq!(identity.next_value().sql, "select \"USERS_ID_SEQ\".nextval as \"id\" from dual");
    assert_eq!(identity.current_value().sql, "select \"USERS_ID_SEQ\".currval as \"id\" from dual");
    assert_eq!(identity.sequence_exists().flat_bindings().len(), 1);
}

#[test]
fn test_shortened_names_end_in_their_kind() {
    let identity = prefixed("app_").identity("organization_memberships", "membership_id");
    assert_eq!(identity.sequence, "ap_organiz_member_membe_id_seq");
    assert_eq!(identity.trigger, "ap_organiz_member_membe_id_trg");
}

#[test]
fn test_configured_schema_qualifies_identity() {
    let grammar = OracleGrammar::new(GrammarConfig::default().with_schema("hr"));
    let identity = grammar.identity("users", "id");
    assert_eq!(
        identity.create(),
        vec![
            "create sequence \"HR\".\"USERS_ID_SEQ\" minvalue 1 start with 1 increment by 1".to_string(),
            "create trigger \"HR\".\"USERS_ID_TRG\" before insert on \"HR\".\"USERS\" for each row begin \
             if :new.\"ID\" is null then select \"HR\".\"USERS_ID_SEQ\".nextval into :new.\"ID\" from dual; end if; end;"
                .to_string(),
        ]
    );
    assert_eq!(
        identity.sequence_exists().flat_bindings(),
        vec![Value::from("hr"), Value::from("users_id_seq")]
    );
    assert_eq!(
        identity.drop_sequence_if_exists(),
        "declare c int; begin select count(*) into c from all_sequences where sequence_owner = upper('hr') \
         and sequence_name = upper('users_id_seq'); \
         if c = 1 then execute immediate 'drop sequence \"HR\".\"USERS_ID_SEQ\"'; end if; end;"
    );
}

#[test]
fn test_dotted_table_names_its_schema() {
    let identity = prefixed("app_").identity("sales.orders", "id");
    assert_eq!(identity.schema.as_deref(), Some("sales"));
    assert_eq!(identity.sequence, "app_orders_id_seq");
    assert_eq!(identity.drop_trigger(), "drop trigger \"SALES\".\"APP_ORDERS_ID_TRG\"");
}

#[test]
fn test_drop_blueprint_identity_by_key() {
    let identity = grammar().blueprint_key_identity(&Blueprint::alter("users").with_prefix("legacy_"), "user_id");
    assert_eq!(identity.sequence, "legacy_users_user_id_seq");
    assert_eq!(
        identity.drop_sequence_if_exists(),
        "declare c int; begin select count(*) into c from user_sequences where sequence_name = upper('legacy_users_user_id_seq'); \
         if c = 1 then execute immediate 'drop sequence \"LEGACY_USERS_USER_ID_SEQ\"'; end if; end;"
    );
}
