use thiserror::Error;

/// Errors reported by the session, statement, and binding layer.
///
/// Everything is surfaced synchronously from the operation that detects
/// it; nothing is suppressed or retried internally.
#[derive(Debug, Error)]
pub enum SqlSessionError {
    #[error("No connector registered under '{0}'")]
    ConnectorNotFound(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Session is closed")]
    ClosedSession,

    #[error("Feature or property '{0}' is not supported by this connector")]
    Capability(String),

    #[error("Cannot bind an empty collection")]
    EmptyBinding,

    #[error("Cannot convert {found} into {expected}")]
    UnsupportedType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Binding count mismatch: SQL has {placeholders} placeholder(s) but {bound} column(s) are bound")]
    BindingCountMismatch { placeholders: usize, bound: usize },

    #[error("Bulk bindings disagree on element count: {expected} vs {found}")]
    BindingSizeMismatch { expected: usize, found: usize },

    #[error("SQL syntax error: {0}")]
    SqlSyntax(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),
}
