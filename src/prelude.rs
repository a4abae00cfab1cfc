//! Convenient imports for common functionality.

pub use crate::binding::{InputBinding, OutputBinding};
pub use crate::connector::{ConnectionHandle, Connector, FeatureSet, Fetched, PropertySet};
pub use crate::error::SqlSessionError;
pub use crate::session::Session;
pub use crate::statement::{Statement, StatementBuilder};
pub use crate::types::{FromSqlValue, Keyed, SqlRecord, SqlValue, ToSqlValue};

#[cfg(feature = "memory")]
pub use crate::memory::{MemoryConfig, MemoryConnector};
