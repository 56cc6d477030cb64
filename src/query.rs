//! Query sessions against a registered buffer handle.

use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::contract::QueryEngine;
use crate::error::CoreError;
use crate::types::TableId;

/// One result row: column name to primitive or nested value, in column
/// order.
pub type Row = serde_json::Map<String, Value>;

/// Holds the current statement text, the target table handle and the
/// last result set.
///
/// `set_statement` and `set_target` are plain replacements; the caller
/// checks non-emptiness before invoking [`QuerySession::run`].
#[derive(Debug, Clone, Default)]
pub struct QuerySession {
    statement: String,
    target: TableId,
    results: Vec<Row>,
    last_error: Option<CoreError>,
}

impl QuerySession {
    pub fn new() -> Self {
        QuerySession::default()
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn target(&self) -> &TableId {
        &self.target
    }

    pub fn results(&self) -> &[Row] {
        &self.results
    }

    pub fn last_error(&self) -> Option<&CoreError> {
        self.last_error.as_ref()
    }

    pub fn set_statement(&mut self, statement: impl Into<String>) {
        self.statement = statement.into();
    }

    pub fn set_target(&mut self, target: impl Into<TableId>) {
        self.target = target.into();
    }

    /// Execute the current statement against the engine.
    ///
    /// On success the prior result set is replaced with the new ordered
    /// rows. On failure the result set is cleared, the error is
    /// recorded for display and returned; the statement text survives
    /// for correction.
    pub async fn run(&mut self, engine: &dyn QueryEngine) -> Result<&[Row], CoreError> {
        debug!(target = %self.target, "running statement");
        match engine.run_query(&self.statement, &self.target).await {
            Ok(rows) => {
                debug!(target = %self.target, rows = rows.len(), "statement succeeded");
                self.results = rows;
                self.last_error = None;
                Ok(&self.results)
            }
            Err(err) => {
                warn!(target = %self.target, error = %err, "statement failed");
                self.results.clear();
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }
}
