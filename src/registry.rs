//! Process-wide connector registry.
//!
//! `Session::open` resolves connector identifiers here. Registration is
//! explicit; nothing self-registers except the bundled `memory`
//! connector's own `register()` helper, which callers still invoke.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use lazy_static::lazy_static;
use tracing::debug;

use crate::connector::{ConnectionHandle, Connector};
use crate::error::SqlSessionError;

lazy_static! {
    static ref REGISTRY: Mutex<HashMap<String, Arc<dyn Connector>>> = Mutex::new(HashMap::new());
}

/// Register a connector under `id`, replacing any previous registration.
pub fn register(id: &str, connector: Arc<dyn Connector>) {
    debug!(connector = id, "registering connector");
    REGISTRY
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(id.to_string(), connector);
}

/// Remove a connector registration. Unknown ids are ignored.
pub fn unregister(id: &str) {
    REGISTRY
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(id);
}

/// Resolve `id` and open a connection with `connection_string`.
///
/// # Errors
///
/// Returns `ConnectorNotFound` for unregistered ids and forwards the
/// connector's `ConnectionError` when the handle cannot be established.
pub fn resolve(
    id: &str,
    connection_string: &str,
) -> Result<Box<dyn ConnectionHandle>, SqlSessionError> {
    let connector = {
        let registry = REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
        registry
            .get(id)
            .cloned()
            .ok_or_else(|| SqlSessionError::ConnectorNotFound(id.to_string()))?
    };
    connector.connect(connection_string)
}
