//! Helper functions to build AST nodes without spelling out the structs.
//!
//! ```ignore
//! use qail_oci::ast::builders::*;
//!
//! let query = Query::table("orders")
//!     .select_expr(count().alias("total"))
//!     .where_cond(eq("status", "paid"))
//!     .where_cond(or(is_null("deleted_at")));
//! ```

pub mod aggregates;
pub mod conditions;
pub mod dynamic;

pub use aggregates::{avg, count, count_distinct, max, min, sum};
pub use conditions::{between, eq, gt, gte, is_in, is_null, like, lt, lte, ne, not_in, or};
pub use dynamic::{DynamicWhere, Segment};
