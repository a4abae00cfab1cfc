//! Collaborator interfaces implemented by concrete engine connectors.
//!
//! The core never inspects connection-string contents; their format is
//! entirely connector-defined. Everything a connector must expose is
//! the [`Connector`] factory plus one [`ConnectionHandle`] per open
//! connection.

use std::collections::HashMap;

use crate::error::SqlSessionError;
use crate::types::SqlValue;

/// Opaque identifier for a prepared statement held by a connection handle.
pub type StatementId = u64;

/// What one `execute` call against the engine produced.
#[derive(Debug, Clone, Default)]
pub struct Fetched {
    /// Result rows retrieved this call, in retrieval order.
    pub rows: Vec<Vec<SqlValue>>,
    /// Rows affected, for DML statements.
    pub rows_affected: u64,
    /// True once the statement's cursor has no further rows. This is
    /// the signal that drives `Statement::done()`, so it must be
    /// accurate even when the last chunk exactly filled the limit.
    pub exhausted: bool,
}

/// One engine-specific connection, as consumed by [`Session`].
///
/// Implementations are synchronous: every call blocks until the engine
/// responds. A handle is never shared across threads without external
/// synchronization; the session wrapper serializes access.
///
/// Transaction edge cases (commit/rollback with no active transaction,
/// nested begin) are connector-defined and must be documented by each
/// implementation; the core forwards them verbatim.
///
/// [`Session`]: crate::session::Session
pub trait ConnectionHandle: Send {
    /// Parse and prepare one SQL statement, returning a handle-scoped id.
    ///
    /// # Errors
    ///
    /// Returns `SqlSyntax` for malformed SQL, `ExecutionError` for other
    /// engine failures.
    fn prepare(&mut self, sql: &str) -> Result<StatementId, SqlSessionError>;

    /// Run one prepared statement with one row of parameter values.
    ///
    /// For queries, at most `limit` rows are retrieved and the cursor
    /// position is kept across calls; a subsequent call continues where
    /// the previous one stopped. Once `exhausted` has been reported the
    /// next call starts a fresh retrieval.
    ///
    /// # Errors
    ///
    /// Engine-level failures (constraint violations, connectivity loss)
    /// surface as `ExecutionError`.
    fn execute(
        &mut self,
        statement: StatementId,
        params: &[SqlValue],
        limit: Option<u64>,
    ) -> Result<Fetched, SqlSessionError>;

    /// Rewind the statement's cursor so the next `execute` starts from
    /// the first row again.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError` if `statement` is unknown to this handle.
    fn reset(&mut self, statement: StatementId) -> Result<(), SqlSessionError>;

    /// Release the prepared form. Unknown ids are ignored.
    fn finalize(&mut self, statement: StatementId);

    /// # Errors
    ///
    /// Connector-defined; see the trait docs on transaction edge cases.
    fn begin(&mut self) -> Result<(), SqlSessionError>;

    /// # Errors
    ///
    /// Connector-defined; see the trait docs on transaction edge cases.
    fn commit(&mut self) -> Result<(), SqlSessionError>;

    /// # Errors
    ///
    /// Connector-defined; see the trait docs on transaction edge cases.
    fn rollback(&mut self) -> Result<(), SqlSessionError>;

    fn is_connected(&self) -> bool;

    fn in_transaction(&self) -> bool;

    /// # Errors
    ///
    /// Returns `Capability` if the feature name is not supported.
    fn set_feature(&mut self, name: &str, state: bool) -> Result<(), SqlSessionError>;

    /// # Errors
    ///
    /// Returns `Capability` if the feature name is not supported.
    fn get_feature(&self, name: &str) -> Result<bool, SqlSessionError>;

    /// # Errors
    ///
    /// Returns `Capability` if the property name is not supported.
    fn set_property(&mut self, name: &str, value: SqlValue) -> Result<(), SqlSessionError>;

    /// # Errors
    ///
    /// Returns `Capability` if the property name is not supported.
    fn get_property(&self, name: &str) -> Result<SqlValue, SqlSessionError>;

    /// Release the connection. Idempotent.
    fn close(&mut self);
}

/// Factory resolved through the registry; one per engine.
pub trait Connector: Send + Sync {
    /// Establish a connection for the given connector-defined string.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` when the handle cannot be established.
    fn connect(&self, connection_string: &str)
    -> Result<Box<dyn ConnectionHandle>, SqlSessionError>;
}

/// Capability table for boolean features, keyed by declared name.
///
/// Connectors declare the names they understand up front; setting or
/// reading an undeclared name is a `Capability` error, never a silent
/// insert.
#[derive(Debug, Default)]
pub struct FeatureSet {
    entries: HashMap<String, bool>,
}

impl FeatureSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a supported feature and its initial state.
    pub fn declare(&mut self, name: &str, state: bool) {
        self.entries.insert(name.to_string(), state);
    }

    /// # Errors
    ///
    /// Returns `Capability` for undeclared names.
    pub fn set(&mut self, name: &str, state: bool) -> Result<(), SqlSessionError> {
        match self.entries.get_mut(name) {
            Some(slot) => {
                *slot = state;
                Ok(())
            }
            None => Err(SqlSessionError::Capability(name.to_string())),
        }
    }

    /// # Errors
    ///
    /// Returns `Capability` for undeclared names.
    pub fn get(&self, name: &str) -> Result<bool, SqlSessionError> {
        self.entries
            .get(name)
            .copied()
            .ok_or_else(|| SqlSessionError::Capability(name.to_string()))
    }
}

/// Capability table for arbitrarily-typed properties.
#[derive(Debug, Default)]
pub struct PropertySet {
    entries: HashMap<String, SqlValue>,
}

impl PropertySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a supported property and its initial value.
    pub fn declare(&mut self, name: &str, value: SqlValue) {
        self.entries.insert(name.to_string(), value);
    }

    /// # Errors
    ///
    /// Returns `Capability` for undeclared names.
    pub fn set(&mut self, name: &str, value: SqlValue) -> Result<(), SqlSessionError> {
        match self.entries.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(SqlSessionError::Capability(name.to_string())),
        }
    }

    /// # Errors
    ///
    /// Returns `Capability` for undeclared names.
    pub fn get(&self, name: &str) -> Result<SqlValue, SqlSessionError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| SqlSessionError::Capability(name.to_string()))
    }
}
