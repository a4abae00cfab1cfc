//! Connector-agnostic session, statement, and binding layer for SQL
//! databases.
//!
//! A [`Session`] holds one connection to a database engine resolved by
//! connector identifier, and builds [`Statement`]s through a fluent
//! chain of SQL fragments, input/output bindings, and an optional row
//! limit:
//!
//! ```no_run
//! use sql_session::Session;
//!
//! sql_session::memory::register();
//! let session = Session::open("memory", "demo")?;
//!
//! session.statement("CREATE TABLE Dummy (data INTEGER)").run()?;
//!
//! // one execute() drives the insert once per element
//! let data: Vec<i64> = (0..100).collect();
//! session
//!     .statement("INSERT INTO Dummy VALUES(:data)")
//!     .bind_each(&data)
//!     .run()?;
//!
//! // chunked retrieval: at most 50 rows per execute()
//! let mut fetched: Vec<i64> = Vec::new();
//! let mut stmt = session
//!     .statement("SELECT * FROM Dummy")
//!     .fetch_all(&mut fetched)
//!     .limit(50)
//!     .build()?;
//! while !stmt.done() {
//!     stmt.execute()?;
//! }
//! # Ok::<(), sql_session::SqlSessionError>(())
//! ```
//!
//! Concrete engines plug in behind the [`connector::Connector`] and
//! [`connector::ConnectionHandle`] traits and are resolved through the
//! [`registry`]. The bundled [`memory`] connector (feature `memory`,
//! on by default) exercises the whole contract in-process.

pub mod binding;
pub mod connector;
mod error;
#[cfg(feature = "memory")]
pub mod memory;
pub mod prelude;
pub mod registry;
mod session;
mod statement;
mod types;

pub use error::SqlSessionError;
pub use session::Session;
pub use statement::{Statement, StatementBuilder, count_placeholders};
pub use types::{FromSqlValue, Keyed, SqlRecord, SqlValue, ToSqlValue};
