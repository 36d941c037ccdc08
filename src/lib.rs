//! # qail-oci: Oracle grammar for QAIL
//!
//! Compiles query and schema ASTs into Oracle SQL with positional `?`
//! bindings in the order the server consumes them.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use qail_oci::prelude::*;
//!
//! let query = Query::table("users")
//!     .select(["id", "email"])
//!     .where_eq("active", true)
//!     .order_by("id", SortOrder::Asc)
//!     .offset(20)
//!     .limit(10);
//!
//! let compiled = query.to_sql()?;
//! // => select * from (select * from (select "ID", "EMAIL" from "USERS" ...) t1) t2 ...
//! ```
//!
//! ## Oracle specifics
//!
//! | Concern          | Rendering                                         |
//! |------------------|---------------------------------------------------|
//! | Identifiers      | upper-cased and double-quoted                     |
//! | Pagination       | nested `rownum` wrappers                          |
//! | Auto-increment   | sequence plus before-insert trigger               |
//! | Generated keys   | `returning ... into ?` out parameters             |
//! | Multi-row insert | `select ... from dual union all ...`              |

pub mod ast;
pub mod config;
pub mod engine;
pub mod error;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::{GrammarConfig, Pagination};
    pub use crate::engine::{Connection, Executor, Outcome, Page, ResultRow, SchemaRunner};
    pub use crate::error::*;
    pub use crate::transpiler::{Compiled, Dialect, Identity, OracleGrammar, Parameter, ToSql};
}
