use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::connector::ConnectionHandle;
use crate::error::SqlSessionError;
use crate::registry;
use crate::statement::StatementBuilder;
use crate::types::SqlValue;

/// A logical connection to one database engine instance.
///
/// Sessions are opened through the connector registry:
///
/// ```no_run
/// use sql_session::Session;
///
/// let session = Session::open("memory", "demo")?;
/// # Ok::<(), sql_session::SqlSessionError>(())
/// ```
///
/// A `Session` is cheap to clone; clones share the same underlying
/// connection handle, so transaction and feature state mutated through
/// one clone is visible through all of them. A single session (and its
/// clones) serializes access to the handle internally, but the design
/// offers no intrinsic concurrency: every operation blocks until the
/// engine responds.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Mutex<SessionInner>>,
}

pub(crate) struct SessionInner {
    connector: String,
    handle: Box<dyn ConnectionHandle>,
    closed: bool,
}

impl SessionInner {
    /// Access the handle, failing once the session has been closed.
    pub(crate) fn handle_mut(
        &mut self,
    ) -> Result<&mut (dyn ConnectionHandle + 'static), SqlSessionError> {
        if self.closed {
            return Err(SqlSessionError::ClosedSession);
        }
        Ok(self.handle.as_mut())
    }
}

impl Session {
    /// Open a session by resolving `connector` in the registry.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorNotFound` if the identifier is unregistered or
    /// `ConnectionError` if the connector cannot establish a handle.
    pub fn open(connector: &str, connection_string: &str) -> Result<Self, SqlSessionError> {
        let handle = registry::resolve(connector, connection_string)?;
        debug!(connector, "session opened");
        Ok(Self::from_handle(connector, handle))
    }

    /// Wrap an already-established connection handle.
    #[must_use]
    pub fn from_handle(connector: &str, handle: Box<dyn ConnectionHandle>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionInner {
                connector: connector.to_string(),
                handle,
                closed: false,
            })),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Identifier of the connector this session was opened with.
    #[must_use]
    pub fn connector(&self) -> String {
        self.lock().connector.clone()
    }

    /// Start building a statement from an initial SQL fragment.
    #[must_use]
    pub fn statement<'v>(&self, sql: &str) -> StatementBuilder<'v> {
        StatementBuilder::new(self.clone(), sql)
    }

    /// Start a transaction.
    ///
    /// # Errors
    ///
    /// `ClosedSession` once closed; behavior of a nested `begin` is
    /// connector-defined and forwarded verbatim.
    pub fn begin(&self) -> Result<(), SqlSessionError> {
        debug!("begin transaction");
        self.lock().handle_mut()?.begin()
    }

    /// Commit and end the current transaction.
    ///
    /// # Errors
    ///
    /// `ClosedSession` once closed; committing with no active
    /// transaction is connector-defined.
    pub fn commit(&self) -> Result<(), SqlSessionError> {
        debug!("commit transaction");
        self.lock().handle_mut()?.commit()
    }

    /// Roll back and end the current transaction.
    ///
    /// # Errors
    ///
    /// `ClosedSession` once closed; rolling back with no active
    /// transaction is connector-defined.
    pub fn rollback(&self) -> Result<(), SqlSessionError> {
        debug!("rollback transaction");
        self.lock().handle_mut()?.rollback()
    }

    /// True iff the session is open and the handle reports a live
    /// connection.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        let inner = self.lock();
        !inner.closed && inner.handle.is_connected()
    }

    /// True iff a transaction is in progress.
    #[must_use]
    pub fn is_transaction(&self) -> bool {
        let inner = self.lock();
        !inner.closed && inner.handle.in_transaction()
    }

    /// Set the state of a connector-defined feature.
    ///
    /// # Errors
    ///
    /// `Capability` if the connector does not support `name`.
    pub fn set_feature(&self, name: &str, state: bool) -> Result<(), SqlSessionError> {
        self.lock().handle_mut()?.set_feature(name, state)
    }

    /// Look up the state of a connector-defined feature.
    ///
    /// # Errors
    ///
    /// `Capability` if the connector does not support `name`.
    pub fn get_feature(&self, name: &str) -> Result<bool, SqlSessionError> {
        self.lock().handle_mut()?.get_feature(name)
    }

    /// Set the value of a connector-defined property.
    ///
    /// # Errors
    ///
    /// `Capability` if the connector does not support `name`.
    pub fn set_property(&self, name: &str, value: SqlValue) -> Result<(), SqlSessionError> {
        self.lock().handle_mut()?.set_property(name, value)
    }

    /// Look up the value of a connector-defined property.
    ///
    /// # Errors
    ///
    /// `Capability` if the connector does not support `name`.
    pub fn get_property(&self, name: &str) -> Result<SqlValue, SqlSessionError> {
        self.lock().handle_mut()?.get_property(name)
    }

    /// Close the session and release the connection handle.
    ///
    /// Closing is immediate and explicit: every subsequent operation on
    /// this session, its clones, and statements built from it fails
    /// with `ClosedSession`. Closing twice is a no-op.
    pub fn close(&self) {
        let mut inner = self.lock();
        if !inner.closed {
            if inner.handle.in_transaction() {
                warn!(connector = %inner.connector, "closing session with a transaction in progress");
            }
            debug!(connector = %inner.connector, "session closed");
            inner.handle.close();
            inner.closed = true;
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("Session")
            .field("connector", &inner.connector)
            .field("closed", &inner.closed)
            .finish()
    }
}
