//! Equality filters assembled from an explicit field list.
//!
//! ```ignore
//! let query = DynamicWhere::new()
//!     .and("name")
//!     .or("email")
//!     .apply(Query::table("users"), vec!["bob".into(), "bob@example.com".into()])?;
//! ```

use serde::{Deserialize, Serialize};

use crate::ast::{Condition, Connective, Operator, Predicate, Query, Value};
use crate::error::{OciError, OciResult};

/// One `field = ?` filter and the connective before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub field: String,
    #[serde(default)]
    pub boolean: Connective,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DynamicWhere {
    segments: Vec<Segment>,
}

impl DynamicWhere {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, field: &str) -> Self {
        self.segments.push(Segment {
            field: field.to_string(),
            boolean: Connective::And,
        });
        self
    }

    pub fn or(mut self, field: &str) -> Self {
        self.segments.push(Segment {
            field: field.to_string(),
            boolean: Connective::Or,
        });
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Add one equality per segment, consuming parameters in order.
    pub fn apply(&self, mut query: Query, parameters: Vec<Value>) -> OciResult<Query> {
        if parameters.len() < self.segments.len() {
            return Err(OciError::invalid(format!(
                "{} field(s) need {} parameter(s), got {}",
                self.segments.len(),
                self.segments.len(),
                parameters.len()
            )));
        }
        for (segment, value) in self.segments.iter().zip(parameters) {
            query.wheres.push(Condition {
                boolean: segment.boolean,
                predicate: Predicate::Compare {
                    column: segment.field.clone(),
                    op: Operator::Eq,
                    value,
                },
            });
        }
        Ok(query)
    }
}
