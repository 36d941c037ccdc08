//! Auto-increment emulation through a sequence and a before-insert trigger.
//!
//! The grammar never runs these statements itself; migration tooling creates
//! the identity after the table and drops it before the table.

use serde::{Deserialize, Serialize};

use crate::error::{OciError, OciResult};
use crate::transpiler::ddl::columns::quote_string;
use crate::transpiler::identifier;
use crate::transpiler::Compiled;

/// Sequence/trigger pair for one table key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Owning schema. `None` means the session schema.
    #[serde(default)]
    pub schema: Option<String>,
    /// Prefixed table name.
    pub table: String,
    pub key: String,
    pub sequence: String,
    pub trigger: String,
    pub start: i64,
    pub increment: i64,
    pub min_value: i64,
    /// `None` leaves the server default, `Some(0)` renders `nocache`.
    pub cache: Option<u32>,
}

impl Identity {
    /// Names are `{prefix}{table}_{key}_seq` and `..._trg`. When too long,
    /// only the `{prefix}{table}_{key}` stem is shortened.
    pub fn new(prefix: &str, table: &str, key: &str, max_length: usize) -> Self {
        let stem = format!("{}{}_{}", prefix, table, key).to_lowercase();
        Self {
            schema: None,
            table: format!("{}{}", prefix, table),
            key: key.to_string(),
            sequence: suffixed(&stem, "seq", max_length),
            trigger: suffixed(&stem, "trg", max_length),
            start: 1,
            increment: 1,
            min_value: 1,
            cache: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_sequence(mut self, name: impl Into<String>) -> Self {
        self.sequence = name.into();
        self
    }

    pub fn start_with(mut self, start: i64) -> Self {
        self.start = start;
        if start < self.min_value {
            self.min_value = start;
        }
        self
    }

    pub fn increment_by(mut self, increment: i64) -> Self {
        self.increment = increment;
        self
    }

    pub fn min_value(mut self, min_value: i64) -> Self {
        self.min_value = min_value;
        self
    }

    pub fn cache(mut self, size: u32) -> Self {
        self.cache = Some(size);
        self
    }

    pub fn nocache(self) -> Self {
        self.cache(0)
    }

    /// `"HR"."NAME"` with a schema, `"NAME"` without.
    fn qualified(&self, name: &str) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", identifier::quote(schema), identifier::quote(name)),
            None => identifier::quote(name),
        }
    }

    pub fn create_sequence(&self) -> String {
        let mut sql = format!(
            "create sequence {} minvalue {} start with {} increment by {}",
            self.qualified(&self.sequence),
            self.min_value,
            self.start,
            self.increment
        );
        match self.cache {
            Some(0) => sql.push_str(" nocache"),
            Some(size) => sql.push_str(&format!(" cache {}", size)),
            None => {}
        }
        sql
    }

    /// Fills the key from the sequence when an insert leaves it null.
    pub fn create_trigger(&self) -> String {
        let key = identifier::quote(&self.key);
        format!(
            "create trigger {} before insert on {} for each row begin if :new.{key} is null then \
             select {}.nextval into :new.{key} from dual; end if; end;",
            self.qualified(&self.trigger),
            self.qualified(&self.table),
            self.qualified(&self.sequence),
            key = key
        )
    }

    /// Sequence then trigger.
    pub fn create(&self) -> Vec<String> {
        vec![self.create_sequence(), self.create_trigger()]
    }

    pub fn drop_sequence(&self) -> String {
        format!("drop sequence {}", self.qualified(&self.sequence))
    }

    pub fn drop_trigger(&self) -> String {
        format!("drop trigger {}", self.qualified(&self.trigger))
    }

    /// Trigger then sequence. A missing object is left to fail at execution.
    pub fn drop(&self) -> Vec<String> {
        vec![self.drop_trigger(), self.drop_sequence()]
    }

    /// PL/SQL block dropping the sequence only if the catalog lists it.
    /// The trigger goes away with its table.
    pub fn drop_sequence_if_exists(&self) -> String {
        let catalog = match &self.schema {
            Some(schema) => format!(
                "all_sequences where sequence_owner = upper({}) and sequence_name = upper({})",
                quote_string(schema),
                quote_string(&self.sequence)
            ),
            None => format!(
                "user_sequences where sequence_name = upper({})",
                quote_string(&self.sequence)
            ),
        };
        format!(
            "declare c int; begin select count(*) into c from {}; \
             if c = 1 then execute immediate {}; end if; end;",
            catalog,
            quote_string(&self.drop_sequence())
        )
    }

    /// Move the identity to `to`: rename the sequence and recreate the
    /// trigger against the renamed table.
    ///
    /// Oracle only renames objects of the session schema, so a sequence
    /// whose name changes cannot carry an explicit schema.
    pub fn rename(&self, to: &Identity) -> OciResult<Vec<String>> {
        let mut statements = vec![self.drop_trigger()];
        if self.sequence != to.sequence || self.schema != to.schema {
            if self.schema.is_some() || to.schema.is_some() {
                return Err(OciError::unsupported("renaming a sequence in an explicit schema"));
            }
            statements.push(format!(
                "rename {} to {}",
                identifier::quote(&self.sequence),
                identifier::quote(&to.sequence)
            ));
        }
        statements.push(to.create_trigger());
        Ok(statements)
    }

    pub fn sequence_exists(&self) -> Compiled {
        match &self.schema {
            Some(schema) => Compiled::with_bindings(
                "select * from all_sequences where upper(sequence_owner) = upper(?) \
                 and upper(sequence_name) = upper(?)",
                vec![schema.clone().into(), self.sequence.clone().into()],
            ),
            None => Compiled::with_bindings(
                "select * from all_sequences where upper(sequence_name) = upper(?)",
                vec![self.sequence.clone().into()],
            ),
        }
    }

    pub fn next_value(&self) -> Compiled {
        Compiled::new(format!(
            "select {}.nextval as \"id\" from dual",
            self.qualified(&self.sequence)
        ))
    }

    pub fn current_value(&self) -> Compiled {
        Compiled::new(format!(
            "select {}.currval as \"id\" from dual",
            self.qualified(&self.sequence)
        ))
    }
}

/// `{stem}_{suffix}` within `max_length`, shortening the stem only.
fn suffixed(stem: &str, suffix: &str, max_length: usize) -> String {
    let room = max_length.saturating_sub(suffix.len() + 1);
    format!("{}_{}", identifier::truncate(stem, room), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_names() {
        let identity = Identity::new("", "users", "id", 30);
        assert_eq!(identity.sequence, "users_id_seq");
        assert_eq!(identity.trigger, "users_id_trg");
    }

    #[test]
    fn test_long_names_keep_their_suffix() {
        let identity = Identity::new("app_", "organization_memberships", "membership_id", 30);
        assert_eq!(identity.sequence, "ap_organiz_member_membe_id_seq");
        assert_eq!(identity.trigger, "ap_organiz_member_membe_id_trg");
        assert!(identity.sequence.len() <= 30);
    }

    #[test]
    fn test_sequence_options() {
        let identity = Identity::new("", "users", "id", 30)
            .start_with(100)
            .increment_by(5)
            .nocache();
        assert_eq!(
            identity.create_sequence(),
            "create sequence \"USERS_ID_SEQ\" minvalue 1 start with 100 increment by 5 nocache"
        );
    }

    #[test]
    fn test_schema_qualifies_every_object() {
        let identity = Identity::new("", "users", "id", 30).with_schema("hr");
        assert_eq!(identity.drop_trigger(), "drop trigger \"HR\".\"USERS_ID_TRG\"");
        assert!(identity
            .create_trigger()
            .contains("before insert on \"HR\".\"USERS\" for each row"));
        assert!(identity.create_trigger().contains("select \"HR\".\"USERS_ID_SEQ\".nextval"));
    }

    #[test]
    fn test_rename_refuses_explicit_schema() {
        let from = Identity::new("", "users", "id", 30).with_schema("hr");
        let to = Identity::new("", "members", "id", 30).with_schema("hr");
        assert!(matches!(from.rename(&to), Err(OciError::Unsupported { .. })));
    }
}
