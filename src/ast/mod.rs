pub mod blueprint;
pub mod builders;
pub mod conditions;
pub mod expr;
pub mod joins;
pub mod operators;
pub mod query;
pub mod types;
pub mod values;

pub use self::blueprint::{Blueprint, ColumnDef, Command, ForeignKey, IndexKind};
pub use self::conditions::{Condition, Predicate};
pub use self::expr::Expr;
pub use self::joins::{Join, JoinSource};
pub use self::operators::{
    Action, AggregateFunc, Connective, DatePart, JoinKind, LobKind, Lock, Operator, SortOrder,
};
pub use self::query::{Lob, Order, Query, Row, Union};
pub use self::types::ColumnType;
pub use self::values::Value;
