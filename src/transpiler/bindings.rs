//! Placeholder bindings, partitioned by the clause that produced them.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ast::{LobKind, Value};

/// Clause a binding belongs to. The derived order is the order bindings are
/// flattened in, which is also the order the clauses appear in the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseKind {
    /// Insert values and update assignments
    Values,
    Select,
    Join,
    Where,
    Having,
    Order,
    Union,
    UnionOrder,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Bindings {
    clauses: BTreeMap<ClauseKind, Vec<Value>>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, clause: ClauseKind, value: Value) {
        self.clauses.entry(clause).or_default().push(value);
    }

    pub fn extend(&mut self, clause: ClauseKind, values: impl IntoIterator<Item = Value>) {
        self.clauses.entry(clause).or_default().extend(values);
    }

    /// Replace the bindings of one clause, leaving the others alone.
    pub fn set(&mut self, clause: ClauseKind, values: Vec<Value>) {
        if values.is_empty() {
            self.clauses.remove(&clause);
        } else {
            self.clauses.insert(clause, values);
        }
    }

    pub fn get(&self, clause: ClauseKind) -> &[Value] {
        self.clauses.get(&clause).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn clear(&mut self, clause: ClauseKind) {
        self.clauses.remove(&clause);
    }

    /// Append every clause of `other` to the matching clause here.
    pub fn merge(&mut self, other: Bindings) {
        for (clause, values) in other.clauses {
            self.extend(clause, values);
        }
    }

    /// All bindings in clause order.
    pub fn flatten(&self) -> Vec<Value> {
        self.clauses.values().flatten().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.clauses.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What the executor binds into an output parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutParam {
    /// Key returned by `returning ... into ?`.
    GeneratedKey { column: String },
    /// LOB locator returned by `returning ... into ?`, filled with `data`.
    Lob {
        column: String,
        kind: LobKind,
        data: Value,
    },
}

/// A positional parameter as handed to the executor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    In(Value),
    Out(OutParam),
}

/// Output of a compilation: SQL text, its bindings and trailing out params.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Compiled {
    pub sql: String,
    pub bindings: Bindings,
    /// Always bound after every input binding.
    pub out_params: Vec<OutParam>,
}

impl Compiled {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            ..Default::default()
        }
    }

    pub fn with_bindings(sql: impl Into<String>, values: Vec<Value>) -> Self {
        let mut bindings = Bindings::new();
        bindings.extend(ClauseKind::Where, values);
        Self {
            sql: sql.into(),
            bindings,
            out_params: vec![],
        }
    }

    pub fn flat_bindings(&self) -> Vec<Value> {
        self.bindings.flatten()
    }

    /// Input bindings followed by output parameters, one per `?`.
    pub fn parameters(&self) -> Vec<Parameter> {
        let mut params: Vec<Parameter> = self.flat_bindings().into_iter().map(Parameter::In).collect();
        params.extend(self.out_params.iter().cloned().map(Parameter::Out));
        params
    }

    /// Number of `?` placeholders outside quoted literals and identifiers.
    pub fn placeholder_count(&self) -> usize {
        let mut count = 0;
        let mut quote: Option<char> = None;
        for c in self.sql.chars() {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '\'') | (None, '"') => quote = Some(c),
                (None, '?') => count += 1,
                _ => {}
            }
        }
        count
    }
}

/// Mutable state threaded through one compilation.
#[derive(Debug)]
pub struct ParamContext {
    pub bindings: Bindings,
    pub out_params: Vec<OutParam>,
    clause: ClauseKind,
}

impl Default for ParamContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamContext {
    pub fn new() -> Self {
        Self {
            bindings: Bindings::new(),
            out_params: Vec::new(),
            clause: ClauseKind::Where,
        }
    }

    pub fn clause(&self) -> ClauseKind {
        self.clause
    }

    /// Switch the clause new bindings go to; returns the previous one.
    pub fn enter(&mut self, clause: ClauseKind) -> ClauseKind {
        std::mem::replace(&mut self.clause, clause)
    }

    /// Record a binding in the current clause and return its placeholder.
    pub fn bind(&mut self, value: Value) -> &'static str {
        self.bindings.add(self.clause, value);
        "?"
    }

    pub fn bind_all(&mut self, values: impl IntoIterator<Item = Value>) {
        self.bindings.extend(self.clause, values);
    }

    /// Fold a nested compilation's bindings into the current clause.
    pub fn absorb(&mut self, nested: Bindings) {
        let clause = self.clause;
        self.bindings.extend(clause, nested.flatten());
    }

    pub fn out(&mut self, param: OutParam) -> &'static str {
        self.out_params.push(param);
        "?"
    }

    pub fn finish(self, sql: String) -> Compiled {
        Compiled {
            sql,
            bindings: self.bindings,
            out_params: self.out_params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_follows_clause_order() {
        let mut b = Bindings::new();
        b.add(ClauseKind::Union, Value::Int(4));
        b.add(ClauseKind::Having, Value::Int(2));
        b.add(ClauseKind::Where, Value::Int(1));
        b.add(ClauseKind::Order, Value::Int(3));
        assert_eq!(
            b.flatten(),
            vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)]
        );
    }

    #[test]
    fn test_set_replaces_single_clause() {
        let mut b = Bindings::new();
        b.add(ClauseKind::Where, Value::Int(1));
        b.add(ClauseKind::Having, Value::Int(2));
        b.set(ClauseKind::Having, vec![Value::Int(9)]);
        assert_eq!(b.flatten(), vec![Value::Int(1), Value::Int(9)]);
    }

    #[test]
    fn test_placeholder_count_skips_literals() {
        let c = Compiled::new("select '?' as \"Q?\" from dual where a = ? and b = ?");
        assert_eq!(c.placeholder_count(), 2);
    }

    #[test]
    fn test_out_params_trail_inputs() {
        let mut ctx = ParamContext::new();
        ctx.enter(ClauseKind::Values);
        ctx.bind(Value::from("foo"));
        ctx.out(OutParam::GeneratedKey {
            column: "id".to_string(),
        });
        let compiled = ctx.finish("insert".to_string());
        let params = compiled.parameters();
        assert_eq!(params.len(), 2);
        assert!(matches!(params[1], Parameter::Out(OutParam::GeneratedKey { .. })));
    }
}
