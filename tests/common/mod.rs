//! Recording executor shared by the integration tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use qail_oci::prelude::*;

/// Records every statement it is handed and answers `execute` from a queue.
#[derive(Default)]
pub struct Recorder {
    log: Mutex<Vec<String>>,
    params: Mutex<Vec<Vec<Parameter>>>,
    outcomes: Mutex<VecDeque<Outcome>>,
    fail_on: Option<String>,
}

#[allow(dead_code)]
impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any statement containing `needle`.
    pub fn failing_on(needle: &str) -> Self {
        Self {
            fail_on: Some(needle.to_string()),
            ..Self::default()
        }
    }

    pub fn respond(self, outcome: Outcome) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn params(&self) -> Vec<Vec<Parameter>> {
        self.params.lock().unwrap().clone()
    }

    fn record(&self, sql: &str) -> OciResult<()> {
        self.log.lock().unwrap().push(sql.to_string());
        match &self.fail_on {
            Some(needle) if sql.contains(needle.as_str()) => {
                Err(OciError::Execution(format!("ORA-00955: name is already used: {}", needle)))
            }
            _ => Ok(()),
        }
    }
}

impl Executor for Recorder {
    async fn execute(&self, statement: &Compiled) -> OciResult<Outcome> {
        self.record(&statement.sql)?;
        self.params.lock().unwrap().push(statement.parameters());
        Ok(self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Outcome::Rows(vec![])))
    }

    async fn statement(&self, sql: &str) -> OciResult<()> {
        self.record(sql)
    }
}

#[allow(dead_code)]
pub fn row(pairs: &[(&str, Value)]) -> ResultRow {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
