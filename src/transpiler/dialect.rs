use serde::{Deserialize, Serialize};

use crate::transpiler::sql::ansi::AnsiGenerator;
use crate::transpiler::sql::oracle::OracleGenerator;
use crate::transpiler::traits::SqlGenerator;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Oracle,
    Ansi,
}

impl Dialect {
    pub fn generator(&self) -> Box<dyn SqlGenerator> {
        match self {
            Dialect::Oracle => Box::new(OracleGenerator),
            Dialect::Ansi => Box::new(AnsiGenerator),
        }
    }
}

impl std::str::FromStr for Dialect {
    type Err = crate::error::OciError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "oracle" | "oci" | "oci8" => Ok(Dialect::Oracle),
            "ansi" | "generic" => Ok(Dialect::Ansi),
            other => Err(crate::error::OciError::invalid(format!("unknown dialect '{}'", other))),
        }
    }
}
