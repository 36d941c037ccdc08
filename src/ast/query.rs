use serde::{Deserialize, Serialize};

use crate::ast::{
    Action, Condition, Connective, DatePart, Expr, Join, JoinKind, JoinSource, LobKind, Lock,
    Operator, Predicate, SortOrder, Value,
};

/// Column/value pairs of one inserted row or of an update.
pub type Row = Vec<(String, Value)>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    Column { column: String, direction: SortOrder },
    Raw {
        sql: String,
        #[serde(default)]
        bindings: Vec<Value>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Union {
    pub query: Box<Query>,
    #[serde(default)]
    pub all: bool,
}

/// A LOB column written through a returned locator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lob {
    pub column: String,
    pub kind: LobKind,
    pub data: Value,
}

/// The abstract query a grammar compiles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    pub action: Action,
    /// Target table, optionally aliased (`users as u`).
    pub table: String,
    /// Selected expressions; empty means `*`.
    pub columns: Vec<Expr>,
    pub distinct: bool,
    pub joins: Vec<Join>,
    pub wheres: Vec<Condition>,
    pub groups: Vec<String>,
    pub havings: Vec<Condition>,
    pub orders: Vec<Order>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub unions: Vec<Union>,
    /// Orders applied to the whole union.
    pub union_orders: Vec<Order>,
    pub lock: Option<Lock>,
    /// Insert rows.
    pub rows: Vec<Row>,
    /// Update assignments.
    pub assignments: Row,
    /// Generated key returned by an insert.
    pub returning: Option<String>,
    pub lobs: Vec<Lob>,
    /// Source query for `insert ... select`.
    pub source_query: Option<Box<Query>>,
    pub insert_columns: Vec<String>,
}

impl Query {
    /// Start a select against `table`.
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            action: Action::Select,
            table: table.into(),
            ..Default::default()
        }
    }

    pub fn insert_into(table: impl Into<String>) -> Self {
        Self {
            action: Action::Insert,
            table: table.into(),
            ..Default::default()
        }
    }

    pub fn update(table: impl Into<String>) -> Self {
        Self {
            action: Action::Update,
            table: table.into(),
            ..Default::default()
        }
    }

    pub fn delete_from(table: impl Into<String>) -> Self {
        Self {
            action: Action::Delete,
            table: table.into(),
            ..Default::default()
        }
    }

    pub fn truncate(table: impl Into<String>) -> Self {
        Self {
            action: Action::Truncate,
            table: table.into(),
            ..Default::default()
        }
    }

    // ----- projection -----

    pub fn select<I, E>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn select_expr(mut self, expr: Expr) -> Self {
        self.columns.push(expr);
        self
    }

    pub fn select_raw(mut self, sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.columns.push(Expr::Raw {
            sql: sql.into(),
            bindings,
        });
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    // ----- joins -----

    fn push_join(mut self, kind: JoinKind, table: &str, first: &str, op: Operator, second: &str) -> Self {
        self.joins.push(Join {
            kind,
            source: JoinSource::Table(table.to_string()),
            on: vec![Condition::and(Predicate::Compare {
                column: first.to_string(),
                op,
                value: Value::column(second),
            })],
        });
        self
    }

    pub fn join(self, table: &str, first: &str, op: Operator, second: &str) -> Self {
        self.push_join(JoinKind::Inner, table, first, op, second)
    }

    pub fn left_join(self, table: &str, first: &str, op: Operator, second: &str) -> Self {
        self.push_join(JoinKind::Left, table, first, op, second)
    }

    pub fn right_join(self, table: &str, first: &str, op: Operator, second: &str) -> Self {
        self.push_join(JoinKind::Right, table, first, op, second)
    }

    pub fn cross_join(mut self, table: &str) -> Self {
        self.joins.push(Join {
            kind: JoinKind::Cross,
            source: JoinSource::Table(table.to_string()),
            on: vec![],
        });
        self
    }

    /// Join with arbitrary `on` conditions built by `build`.
    pub fn join_where<F>(mut self, kind: JoinKind, table: &str, build: F) -> Self
    where
        F: FnOnce(Query) -> Query,
    {
        let on = build(Query::default()).wheres;
        self.joins.push(Join {
            kind,
            source: JoinSource::Table(table.to_string()),
            on,
        });
        self
    }

    pub fn join_sub(
        mut self,
        query: Query,
        alias: &str,
        first: &str,
        op: Operator,
        second: &str,
    ) -> Self {
        self.joins.push(Join {
            kind: JoinKind::Inner,
            source: JoinSource::Sub {
                query: Box::new(query),
                alias: alias.to_string(),
            },
            on: vec![Condition::and(Predicate::Compare {
                column: first.to_string(),
                op,
                value: Value::column(second),
            })],
        });
        self
    }

    // ----- where -----

    pub fn where_cond(mut self, condition: Condition) -> Self {
        self.wheres.push(condition);
        self
    }

    fn push_where(mut self, boolean: Connective, predicate: Predicate) -> Self {
        self.wheres.push(Condition { boolean, predicate });
        self
    }

    pub fn where_op(self, column: &str, op: Operator, value: impl Into<Value>) -> Self {
        self.push_where(
            Connective::And,
            Predicate::Compare {
                column: column.to_string(),
                op,
                value: value.into(),
            },
        )
    }

    pub fn where_eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.where_op(column, Operator::Eq, value)
    }

    pub fn or_where_op(self, column: &str, op: Operator, value: impl Into<Value>) -> Self {
        self.push_where(
            Connective::Or,
            Predicate::Compare {
                column: column.to_string(),
                op,
                value: value.into(),
            },
        )
    }

    pub fn or_where_eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.or_where_op(column, Operator::Eq, value)
    }

    /// Compare two columns.
    pub fn where_column(self, first: &str, op: Operator, second: &str) -> Self {
        self.where_op(first, op, Value::column(second))
    }

    /// `like` match; `case_sensitive = false` normalises both sides.
    pub fn where_like(self, column: &str, pattern: impl Into<Value>, case_sensitive: bool) -> Self {
        let op = if case_sensitive {
            Operator::Like
        } else {
            Operator::ILike
        };
        self.where_op(column, op, pattern)
    }

    pub fn where_not_like(self, column: &str, pattern: impl Into<Value>, case_sensitive: bool) -> Self {
        let op = if case_sensitive {
            Operator::NotLike
        } else {
            Operator::NotILike
        };
        self.where_op(column, op, pattern)
    }

    fn push_in<I, V>(self, boolean: Connective, column: &str, values: I, negated: bool) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_where(
            boolean,
            Predicate::In {
                column: column.to_string(),
                values: values.into_iter().map(Into::into).collect(),
                negated,
            },
        )
    }

    pub fn where_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_in(Connective::And, column, values, false)
    }

    pub fn where_not_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_in(Connective::And, column, values, true)
    }

    pub fn or_where_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_in(Connective::Or, column, values, false)
    }

    pub fn where_in_sub(self, column: &str, query: Query) -> Self {
        self.push_where(
            Connective::And,
            Predicate::InSub {
                column: column.to_string(),
                query: Box::new(query),
                negated: false,
            },
        )
    }

    pub fn where_not_in_sub(self, column: &str, query: Query) -> Self {
        self.push_where(
            Connective::And,
            Predicate::InSub {
                column: column.to_string(),
                query: Box::new(query),
                negated: true,
            },
        )
    }

    pub fn where_null(self, column: &str) -> Self {
        self.push_where(
            Connective::And,
            Predicate::Null {
                column: column.to_string(),
                negated: false,
            },
        )
    }

    pub fn where_not_null(self, column: &str) -> Self {
        self.push_where(
            Connective::And,
            Predicate::Null {
                column: column.to_string(),
                negated: true,
            },
        )
    }

    pub fn or_where_null(self, column: &str) -> Self {
        self.push_where(
            Connective::Or,
            Predicate::Null {
                column: column.to_string(),
                negated: false,
            },
        )
    }

    pub fn where_between(self, column: &str, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.push_where(
            Connective::And,
            Predicate::Between {
                column: column.to_string(),
                low: low.into(),
                high: high.into(),
                negated: false,
            },
        )
    }

    pub fn where_not_between(self, column: &str, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.push_where(
            Connective::And,
            Predicate::Between {
                column: column.to_string(),
                low: low.into(),
                high: high.into(),
                negated: true,
            },
        )
    }

    pub fn where_date_part(self, part: DatePart, column: &str, op: Operator, value: impl Into<Value>) -> Self {
        self.push_where(
            Connective::And,
            Predicate::Date {
                part,
                column: column.to_string(),
                op,
                value: value.into(),
            },
        )
    }

    pub fn where_date(self, column: &str, op: Operator, value: impl Into<Value>) -> Self {
        self.where_date_part(DatePart::Date, column, op, value)
    }

    pub fn where_day(self, column: &str, op: Operator, value: impl Into<Value>) -> Self {
        self.where_date_part(DatePart::Day, column, op, value)
    }

    pub fn where_month(self, column: &str, op: Operator, value: impl Into<Value>) -> Self {
        self.where_date_part(DatePart::Month, column, op, value)
    }

    pub fn where_year(self, column: &str, op: Operator, value: impl Into<Value>) -> Self {
        self.where_date_part(DatePart::Year, column, op, value)
    }

    pub fn where_time(self, column: &str, op: Operator, value: impl Into<Value>) -> Self {
        self.where_date_part(DatePart::Time, column, op, value)
    }

    pub fn where_row_values<V: Into<Value>>(self, columns: &[&str], op: Operator, values: Vec<V>) -> Self {
        self.push_where(
            Connective::And,
            Predicate::RowValues {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                op,
                values: values.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn where_raw(self, sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.push_where(
            Connective::And,
            Predicate::Raw {
                sql: sql.into(),
                bindings,
            },
        )
    }

    pub fn or_where_raw(self, sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.push_where(
            Connective::Or,
            Predicate::Raw {
                sql: sql.into(),
                bindings,
            },
        )
    }

    fn push_group<F>(self, boolean: Connective, negated: bool, build: F) -> Self
    where
        F: FnOnce(Query) -> Query,
    {
        let conditions = build(Query::default()).wheres;
        // An empty group would render `()`.
        if conditions.is_empty() {
            return self;
        }
        self.push_where(boolean, Predicate::Group { conditions, negated })
    }

    /// Parenthesised group of conditions.
    pub fn where_nested<F>(self, build: F) -> Self
    where
        F: FnOnce(Query) -> Query,
    {
        self.push_group(Connective::And, false, build)
    }

    pub fn or_where_nested<F>(self, build: F) -> Self
    where
        F: FnOnce(Query) -> Query,
    {
        self.push_group(Connective::Or, false, build)
    }

    pub fn where_not<F>(self, build: F) -> Self
    where
        F: FnOnce(Query) -> Query,
    {
        self.push_group(Connective::And, true, build)
    }

    pub fn where_exists(self, query: Query) -> Self {
        self.push_where(
            Connective::And,
            Predicate::Exists {
                query: Box::new(query),
                negated: false,
            },
        )
    }

    pub fn where_not_exists(self, query: Query) -> Self {
        self.push_where(
            Connective::And,
            Predicate::Exists {
                query: Box::new(query),
                negated: true,
            },
        )
    }

    pub fn where_full_text(self, columns: &[&str], value: impl Into<Value>) -> Self {
        self.push_where(
            Connective::And,
            Predicate::FullText {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                value: value.into(),
            },
        )
    }

    pub fn where_json_contains(self, column: &str, value: impl Into<Value>) -> Self {
        self.push_where(
            Connective::And,
            Predicate::JsonContains {
                column: column.to_string(),
                value: value.into(),
            },
        )
    }

    // ----- grouping -----

    pub fn group_by(mut self, columns: &[&str]) -> Self {
        self.groups.extend(columns.iter().map(|c| c.to_string()));
        self
    }

    pub fn having_op(mut self, column: &str, op: Operator, value: impl Into<Value>) -> Self {
        self.havings.push(Condition::and(Predicate::Compare {
            column: column.to_string(),
            op,
            value: value.into(),
        }));
        self
    }

    pub fn having_raw(mut self, sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.havings.push(Condition::and(Predicate::Raw {
            sql: sql.into(),
            bindings,
        }));
        self
    }

    // ----- ordering and paging -----

    fn push_order(mut self, order: Order) -> Self {
        if self.unions.is_empty() {
            self.orders.push(order);
        } else {
            self.union_orders.push(order);
        }
        self
    }

    pub fn order_by(self, column: &str, direction: SortOrder) -> Self {
        self.push_order(Order::Column {
            column: column.to_string(),
            direction,
        })
    }

    pub fn order_by_desc(self, column: &str) -> Self {
        self.order_by(column, SortOrder::Desc)
    }

    pub fn order_by_raw(self, sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        self.push_order(Order::Raw {
            sql: sql.into(),
            bindings,
        })
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// 1-based page of `per_page` rows.
    pub fn for_page(self, page: u64, per_page: u64) -> Self {
        self.offset(page.saturating_sub(1).saturating_mul(per_page)).limit(per_page)
    }

    pub fn union(mut self, query: Query) -> Self {
        self.unions.push(Union {
            query: Box::new(query),
            all: false,
        });
        self
    }

    pub fn union_all(mut self, query: Query) -> Self {
        self.unions.push(Union {
            query: Box::new(query),
            all: true,
        });
        self
    }

    pub fn lock_for_update(mut self) -> Self {
        self.lock = Some(Lock::ForUpdate);
        self
    }

    pub fn shared_lock(mut self) -> Self {
        self.lock = Some(Lock::Shared);
        self
    }

    pub fn lock_raw(mut self, clause: impl Into<String>) -> Self {
        self.lock = Some(Lock::Raw(clause.into()));
        self
    }

    // ----- mutation payloads -----

    /// Append one insert row.
    pub fn values<I, K, V>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.rows
            .push(row.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.assignments.push((column.to_string(), value.into()));
        self
    }

    /// Return the generated key of an insert.
    pub fn returning(mut self, key: &str) -> Self {
        self.returning = Some(key.to_string());
        self
    }

    pub fn lob(mut self, column: &str, kind: LobKind, data: impl Into<Value>) -> Self {
        self.lobs.push(Lob {
            column: column.to_string(),
            kind,
            data: data.into(),
        });
        self
    }

    /// `insert into ... (columns) select ...`
    pub fn using(mut self, columns: &[&str], query: Query) -> Self {
        self.insert_columns = columns.iter().map(|c| c.to_string()).collect();
        self.source_query = Some(Box::new(query));
        self
    }

    pub fn has_joins(&self) -> bool {
        !self.joins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_after_union_goes_to_union_orders() {
        let q = Query::table("users")
            .order_by("id", SortOrder::Asc)
            .union(Query::table("admins"))
            .order_by_desc("name");
        assert_eq!(q.orders.len(), 1);
        assert_eq!(q.union_orders.len(), 1);
    }

    #[test]
    fn test_for_page() {
        let q = Query::table("users").for_page(3, 15);
        assert_eq!(q.offset, Some(30));
        assert_eq!(q.limit, Some(15));
    }

    #[test]
    fn test_for_page_saturates() {
        let q = Query::table("users").for_page(u64::MAX, 1000);
        assert_eq!(q.offset, Some(u64::MAX));
        assert_eq!(Query::table("users").for_page(0, 10).offset, Some(0));
    }

    #[test]
    fn test_empty_nested_group_is_dropped() {
        let q = Query::table("users").where_nested(|q| q);
        assert!(q.wheres.is_empty());
    }

    #[test]
    fn test_query_json_roundtrip() {
        let q = Query::table("users").where_eq("id", 1).limit(10);
        let json = serde_json::to_string(&q).unwrap();
        let back: Query = serde_json::from_str(&json).unwrap();
        assert_eq!(q, back);
    }
}
