use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::connector::{ConnectionHandle, FeatureSet, Fetched, PropertySet, StatementId};
use crate::error::SqlSessionError;
use crate::types::SqlValue;

use super::engine::{self, Command, Database, Table, ValueExpr};

struct PreparedStatement {
    command: Command,
    /// Retrieval position for SELECT statements, kept across chunked
    /// executions.
    cursor: usize,
}

/// One open connection to an in-memory database.
///
/// Transaction policy (connector-defined by contract): `begin` while a
/// transaction is active, and `commit`/`rollback` with none active, are
/// execution errors. Transactions snapshot the whole database.
pub struct MemoryHandle {
    database: Arc<Mutex<Database>>,
    statements: HashMap<StatementId, PreparedStatement>,
    next_statement: StatementId,
    snapshot: Option<HashMap<String, Table>>,
    features: FeatureSet,
    properties: PropertySet,
    connected: bool,
}

impl MemoryHandle {
    pub(crate) fn new(database: Arc<Mutex<Database>>, name: &str, read_only: bool) -> Self {
        let mut features = FeatureSet::new();
        features.declare("autoCommit", true);
        features.declare("readOnly", read_only);

        let mut properties = PropertySet::new();
        properties.declare("name", SqlValue::Text(name.to_string()));
        properties.declare("version", SqlValue::Int(1));

        Self {
            database,
            statements: HashMap::new(),
            next_statement: 1,
            snapshot: None,
            features,
            properties,
            connected: true,
        }
    }

    fn database(&self) -> MutexGuard<'_, Database> {
        self.database.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_connected(&self) -> Result<(), SqlSessionError> {
        if self.connected {
            Ok(())
        } else {
            Err(SqlSessionError::ConnectionError(
                "connection is closed".to_string(),
            ))
        }
    }

    fn ensure_writable(&self) -> Result<(), SqlSessionError> {
        if self.features.get("readOnly")? {
            return Err(SqlSessionError::ExecutionError(
                "database is read-only".to_string(),
            ));
        }
        Ok(())
    }

    fn statement_mut(
        statements: &mut HashMap<StatementId, PreparedStatement>,
        id: StatementId,
    ) -> Result<&mut PreparedStatement, SqlSessionError> {
        statements.get_mut(&id).ok_or_else(|| {
            SqlSessionError::ExecutionError(format!("unknown prepared statement id {id}"))
        })
    }
}

fn resolve_values(
    exprs: &[ValueExpr],
    params: &[SqlValue],
) -> Result<Vec<SqlValue>, SqlSessionError> {
    let needed = exprs
        .iter()
        .filter(|e| matches!(e, ValueExpr::Placeholder))
        .count();
    if params.len() != needed {
        return Err(SqlSessionError::ExecutionError(format!(
            "statement expects {needed} parameter(s), {} supplied",
            params.len()
        )));
    }

    let mut next_param = params.iter();
    let mut row = Vec::with_capacity(exprs.len());
    for expr in exprs {
        match expr {
            ValueExpr::Placeholder => {
                // counted above, so the iterator cannot run dry
                if let Some(value) = next_param.next() {
                    row.push(value.clone());
                }
            }
            ValueExpr::Literal(value) => row.push(value.clone()),
        }
    }
    Ok(row)
}

impl ConnectionHandle for MemoryHandle {
    fn prepare(&mut self, sql: &str) -> Result<StatementId, SqlSessionError> {
        self.ensure_connected()?;
        let command = engine::parse(sql)?;
        let id = self.next_statement;
        self.next_statement += 1;
        self.statements
            .insert(id, PreparedStatement { command, cursor: 0 });
        Ok(id)
    }

    fn execute(
        &mut self,
        statement: StatementId,
        params: &[SqlValue],
        limit: Option<u64>,
    ) -> Result<Fetched, SqlSessionError> {
        self.ensure_connected()?;

        let prepared = Self::statement_mut(&mut self.statements, statement)?;
        let command = prepared.command.clone();

        match command {
            Command::CreateTable { table, columns } => {
                self.ensure_writable()?;
                let mut db = self.database.lock().unwrap_or_else(PoisonError::into_inner);
                if db.tables.contains_key(&table) {
                    return Err(SqlSessionError::ExecutionError(format!(
                        "table '{table}' already exists"
                    )));
                }
                db.tables.insert(
                    table,
                    Table {
                        columns,
                        rows: Vec::new(),
                    },
                );
                Ok(Fetched {
                    exhausted: true,
                    ..Fetched::default()
                })
            }
            Command::DropTable { table } => {
                self.ensure_writable()?;
                let mut db = self.database.lock().unwrap_or_else(PoisonError::into_inner);
                if db.tables.remove(&table).is_none() {
                    return Err(SqlSessionError::ExecutionError(format!(
                        "no such table: {table}"
                    )));
                }
                Ok(Fetched {
                    exhausted: true,
                    ..Fetched::default()
                })
            }
            Command::Insert { table, values } => {
                self.ensure_writable()?;
                let row = resolve_values(&values, params)?;
                let mut db = self.database.lock().unwrap_or_else(PoisonError::into_inner);
                let target = db.tables.get_mut(&table).ok_or_else(|| {
                    SqlSessionError::ExecutionError(format!("no such table: {table}"))
                })?;
                if row.len() != target.columns.len() {
                    return Err(SqlSessionError::ExecutionError(format!(
                        "table '{table}' has {} column(s) but {} value(s) supplied",
                        target.columns.len(),
                        row.len()
                    )));
                }
                target.rows.push(row);
                Ok(Fetched {
                    rows_affected: 1,
                    exhausted: true,
                    ..Fetched::default()
                })
            }
            Command::SelectAll { table } => {
                let db = self.database.lock().unwrap_or_else(PoisonError::into_inner);
                let source = db.tables.get(&table).ok_or_else(|| {
                    SqlSessionError::ExecutionError(format!("no such table: {table}"))
                })?;

                let start = prepared.cursor;
                let available = source.rows.len().saturating_sub(start);
                let take = match limit {
                    Some(l) => usize::try_from(l).unwrap_or(usize::MAX).min(available),
                    None => available,
                };
                let rows: Vec<Vec<SqlValue>> =
                    source.rows[start..start + take].to_vec();

                let new_cursor = start + take;
                let exhausted = new_cursor >= source.rows.len();
                // once the cursor runs off the end, the next execute
                // starts a fresh retrieval
                prepared.cursor = if exhausted { 0 } else { new_cursor };

                debug!(table = %table, fetched = rows.len(), exhausted, "memory select");
                Ok(Fetched {
                    rows,
                    rows_affected: 0,
                    exhausted,
                })
            }
            Command::SelectCount { table } => {
                let db = self.database.lock().unwrap_or_else(PoisonError::into_inner);
                let source = db.tables.get(&table).ok_or_else(|| {
                    SqlSessionError::ExecutionError(format!("no such table: {table}"))
                })?;
                let count = i64::try_from(source.rows.len()).unwrap_or(i64::MAX);
                Ok(Fetched {
                    rows: vec![vec![SqlValue::Int(count)]],
                    rows_affected: 0,
                    exhausted: true,
                })
            }
            Command::Delete { table } => {
                self.ensure_writable()?;
                let mut db = self.database.lock().unwrap_or_else(PoisonError::into_inner);
                let target = db.tables.get_mut(&table).ok_or_else(|| {
                    SqlSessionError::ExecutionError(format!("no such table: {table}"))
                })?;
                let affected = target.rows.len() as u64;
                target.rows.clear();
                Ok(Fetched {
                    rows_affected: affected,
                    exhausted: true,
                    ..Fetched::default()
                })
            }
        }
    }

    fn reset(&mut self, statement: StatementId) -> Result<(), SqlSessionError> {
        let prepared = Self::statement_mut(&mut self.statements, statement)?;
        prepared.cursor = 0;
        Ok(())
    }

    fn finalize(&mut self, statement: StatementId) {
        self.statements.remove(&statement);
    }

    fn begin(&mut self) -> Result<(), SqlSessionError> {
        self.ensure_connected()?;
        if self.snapshot.is_some() {
            return Err(SqlSessionError::ExecutionError(
                "transaction already in progress".to_string(),
            ));
        }
        let tables = self.database().tables.clone();
        self.snapshot = Some(tables);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), SqlSessionError> {
        self.ensure_connected()?;
        if self.snapshot.take().is_none() {
            return Err(SqlSessionError::ExecutionError(
                "no transaction in progress".to_string(),
            ));
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), SqlSessionError> {
        self.ensure_connected()?;
        match self.snapshot.take() {
            Some(tables) => {
                self.database().tables = tables;
                Ok(())
            }
            None => Err(SqlSessionError::ExecutionError(
                "no transaction in progress".to_string(),
            )),
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn in_transaction(&self) -> bool {
        self.snapshot.is_some()
    }

    fn set_feature(&mut self, name: &str, state: bool) -> Result<(), SqlSessionError> {
        self.features.set(name, state)
    }

    fn get_feature(&self, name: &str) -> Result<bool, SqlSessionError> {
        self.features.get(name)
    }

    fn set_property(&mut self, name: &str, value: SqlValue) -> Result<(), SqlSessionError> {
        self.properties.set(name, value)
    }

    fn get_property(&self, name: &str) -> Result<SqlValue, SqlSessionError> {
        self.properties.get(name)
    }

    fn close(&mut self) {
        self.connected = false;
        self.statements.clear();
        self.snapshot = None;
    }
}
