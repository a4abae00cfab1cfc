//! Bundled in-memory connector.
//!
//! Implements the [`Connector`]/[`ConnectionHandle`] collaborator
//! interfaces over a small SQL subset (`CREATE TABLE`, `DROP TABLE`,
//! `INSERT ... VALUES`, `SELECT * FROM`, `SELECT COUNT(*) FROM`,
//! `DELETE FROM`), with chunked retrieval cursors and snapshot
//! transactions. Named databases are shared process-wide, so several
//! sessions can observe the same data.

mod config;
mod engine;
mod handle;

pub use config::MemoryConfig;
pub use handle::MemoryHandle;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use lazy_static::lazy_static;

use crate::connector::{ConnectionHandle, Connector};
use crate::error::SqlSessionError;
use crate::registry;

use engine::Database;

/// Identifier this connector registers under.
pub const CONNECTOR_ID: &str = "memory";

lazy_static! {
    static ref SHARED: Mutex<HashMap<String, Arc<Mutex<Database>>>> =
        Mutex::new(HashMap::new());
}

/// The memory connector factory.
#[derive(Debug, Default)]
pub struct MemoryConnector;

impl Connector for MemoryConnector {
    fn connect(
        &self,
        connection_string: &str,
    ) -> Result<Box<dyn ConnectionHandle>, SqlSessionError> {
        let config = MemoryConfig::parse(connection_string)?;
        let (name, database) = match &config.name {
            Some(name) => {
                let mut shared = SHARED.lock().unwrap_or_else(PoisonError::into_inner);
                let database = shared
                    .entry(name.clone())
                    .or_insert_with(Arc::default)
                    .clone();
                (name.clone(), database)
            }
            None => (String::new(), Arc::default()),
        };
        Ok(Box::new(MemoryHandle::new(
            database,
            &name,
            config.read_only,
        )))
    }
}

/// Register the memory connector under [`CONNECTOR_ID`]. Idempotent.
pub fn register() {
    registry::register(CONNECTOR_ID, Arc::new(MemoryConnector));
}
