//! Grammar configuration.
//!
//! Set once per connection and never mutated while compilations are in
//! flight; a changed configuration means a new [`OracleGrammar`].
//!
//! ```toml
//! table_prefix = "app_"
//! schema = "hr"
//! max_identifier_length = 30
//! pagination = "rownum"
//! ```
//!
//! [`OracleGrammar`]: crate::transpiler::OracleGrammar

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{OciError, OciResult};

/// Oracle refuses object names longer than this before 12.2.
pub const DEFAULT_MAX_IDENTIFIER_LENGTH: usize = 30;

/// Maximum number of expressions in an Oracle `IN` list.
pub const DEFAULT_IN_LIST_LIMIT: usize = 1000;

/// How limit/offset are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pagination {
    /// Nested `rownum` ranking subqueries (works on every server version).
    #[default]
    RowNum,
    /// `offset n rows fetch next m rows only` (12c and newer).
    FetchFirst,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarConfig {
    /// Prefix prepended to every table name.
    pub table_prefix: String,
    /// Owner schema prepended to table names, if any.
    pub schema: Option<String>,
    pub max_identifier_length: usize,
    pub pagination: Pagination,
    pub in_list_limit: usize,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            table_prefix: String::new(),
            schema: None,
            max_identifier_length: DEFAULT_MAX_IDENTIFIER_LENGTH,
            pagination: Pagination::RowNum,
            in_list_limit: DEFAULT_IN_LIST_LIMIT,
        }
    }
}

impl GrammarConfig {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_max_identifier_length(mut self, max: usize) -> Self {
        self.max_identifier_length = max;
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(input: &str) -> OciResult<Self> {
        let config: Self = toml::from_str(input).map_err(|e| OciError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> OciResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// `<config dir>/qail-oci/config.toml`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("qail-oci").join("config.toml"))
    }

    pub fn validate(&self) -> OciResult<()> {
        if self.max_identifier_length < 4 {
            return Err(OciError::Config(format!(
                "max_identifier_length must be at least 4, got {}",
                self.max_identifier_length
            )));
        }
        if self.in_list_limit == 0 {
            return Err(OciError::Config("in_list_limit must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config = GrammarConfig::from_toml_str("").unwrap();
        assert_eq!(config, GrammarConfig::default());
        assert_eq!(config.max_identifier_length, 30);
        assert_eq!(config.in_list_limit, 1000);
    }

    #[test]
    fn test_toml_overrides() {
        let config = GrammarConfig::from_toml_str(
            r#"
            table_prefix = "app_"
            schema = "hr"
            max_identifier_length = 128
            pagination = "fetch_first"
            "#,
        )
        .unwrap();
        assert_eq!(config.table_prefix, "app_");
        assert_eq!(config.schema.as_deref(), Some("hr"));
        assert_eq!(config.max_identifier_length, 128);
        assert_eq!(config.pagination, Pagination::FetchFirst);
    }

    #[test]
    fn test_rejects_tiny_identifier_length() {
        let err = GrammarConfig::from_toml_str("max_identifier_length = 2").unwrap_err();
        assert!(matches!(err, OciError::Config(_)));
    }
}
