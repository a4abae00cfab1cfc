//! Statement core: one prepared SQL source plus its ordered bindings
//! and optional row limit, executable one or more times.

mod builder;
mod placeholders;

pub use builder::StatementBuilder;
pub use placeholders::count_placeholders;

use tracing::debug;

use crate::binding::{InputBinding, OutputBinding};
use crate::connector::StatementId;
use crate::error::SqlSessionError;
use crate::session::Session;
use crate::types::SqlValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unprepared,
    Prepared,
    Done,
}

/// A reusable, parameterized statement bound to one session.
///
/// The lifetime `'v` ties the statement to every value it binds: bound
/// inputs are borrowed for reading, bound outputs for writing, and both
/// must outlive the statement itself. Build one through
/// [`Session::statement`] and the fluent [`StatementBuilder`].
pub struct Statement<'v> {
    session: Session,
    source: String,
    inputs: Vec<Box<dyn InputBinding + 'v>>,
    outputs: Vec<Box<dyn OutputBinding + 'v>>,
    limit: Option<u64>,
    prepared: Option<StatementId>,
    placeholders: usize,
    state: State,
}

impl<'v> Statement<'v> {
    pub(crate) fn new(session: Session, source: String) -> Self {
        Self {
            session,
            source,
            inputs: Vec::new(),
            outputs: Vec::new(),
            limit: None,
            prepared: None,
            placeholders: 0,
            state: State::Unprepared,
        }
    }

    /// Append another SQL fragment; fragments concatenate.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError` once the statement has been prepared by
    /// a first `execute()`.
    pub fn append_source(&mut self, sql: &str) -> Result<(), SqlSessionError> {
        if self.prepared.is_some() {
            return Err(SqlSessionError::ExecutionError(
                "cannot append SQL to an already prepared statement".to_string(),
            ));
        }
        self.source.push_str(sql);
        Ok(())
    }

    /// The accumulated SQL source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Attach an input binding. Binding order assigns parameter
    /// positions.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError` once the statement is done.
    pub fn add_input(
        &mut self,
        binding: Box<dyn InputBinding + 'v>,
    ) -> Result<(), SqlSessionError> {
        if self.state == State::Done {
            return Err(SqlSessionError::ExecutionError(
                "cannot add bindings to a completed statement".to_string(),
            ));
        }
        self.inputs.push(binding);
        Ok(())
    }

    /// Attach an output binding. Binding order assigns result-column
    /// positions.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError` once a first `execute()` has fixed the
    /// column mapping.
    pub fn add_output(
        &mut self,
        binding: Box<dyn OutputBinding + 'v>,
    ) -> Result<(), SqlSessionError> {
        if self.prepared.is_some() {
            return Err(SqlSessionError::ExecutionError(
                "cannot add output bindings after the first execution".to_string(),
            ));
        }
        self.outputs.push(binding);
        Ok(())
    }

    /// Set or replace the per-`execute()` row-count ceiling. Only the
    /// most recently set limit is effective; `None` means unbounded.
    pub fn set_limit(&mut self, limit: Option<u64>) {
        self.limit = limit;
    }

    /// True once no more rows remain to retrieve for the current
    /// binding set. Monotonic until [`reset`](Self::reset) or a further
    /// `execute()` restarts retrieval.
    #[must_use]
    pub fn done(&self) -> bool {
        self.state == State::Done
    }

    /// Execute the statement once.
    ///
    /// The SQL source is parsed on the first call and the prepared form
    /// reused afterwards. Inputs are re-read and bound per call; for a
    /// bulk input of N elements the underlying operation runs N times.
    /// Retrieved rows are distributed across the output bindings in
    /// binding order. Returns the number of rows retrieved this call,
    /// or the number of rows affected for statements that produce no
    /// result rows.
    ///
    /// Executing an already-done statement restarts retrieval from the
    /// first row and appends to container outputs.
    ///
    /// # Errors
    ///
    /// `BindingCountMismatch` or `SqlSyntax` on the first call that
    /// parses and reconciles bindings; `BindingSizeMismatch` when bulk
    /// inputs disagree on element count; engine failures surface as
    /// `ExecutionError` and leave the statement retryable (not done);
    /// `ClosedSession` once the owning session is closed.
    pub fn execute(&mut self) -> Result<u64, SqlSessionError> {
        let session = self.session.clone();
        let mut guard = session.lock();
        let handle = guard.handle_mut()?;

        // Parse once, execute many.
        let id = match self.prepared {
            Some(id) => id,
            None => {
                self.placeholders = count_placeholders(&self.source);
                let id = handle.prepare(&self.source)?;
                debug!(placeholders = self.placeholders, "statement prepared");
                self.prepared = Some(id);
                self.state = State::Prepared;
                id
            }
        };

        // Reconcile the summed binding widths against the SQL text.
        let bound: usize = self.inputs.iter().map(|b| b.columns_handled()).sum();
        if bound != self.placeholders {
            return Err(SqlSessionError::BindingCountMismatch {
                placeholders: self.placeholders,
                bound,
            });
        }

        // All bulk inputs must agree on element count; scalars repeat.
        let mut elements = 1;
        let mut saw_bulk = false;
        for input in &self.inputs {
            if input.elements() == 0 {
                return Err(SqlSessionError::EmptyBinding);
            }
            if input.is_bulk() {
                if saw_bulk && input.elements() != elements {
                    return Err(SqlSessionError::BindingSizeMismatch {
                        expected: elements,
                        found: input.elements(),
                    });
                }
                elements = input.elements();
                saw_bulk = true;
            }
        }

        // A done statement restarts retrieval; outputs keep accumulating.
        if self.state == State::Done {
            handle.reset(id)?;
            self.state = State::Prepared;
        }

        let out_columns: usize = self.outputs.iter().map(|b| b.columns_handled()).sum();
        let mut retrieved: u64 = 0;
        let mut affected: u64 = 0;
        let mut exhausted = true;
        let mut params: Vec<SqlValue> = Vec::with_capacity(bound);

        for index in 0..elements {
            let remaining = self.limit.map(|l| l.saturating_sub(retrieved));
            if remaining == Some(0) {
                exhausted = false;
                break;
            }

            params.clear();
            for input in &self.inputs {
                let element = if input.is_bulk() { index } else { 0 };
                input.append_element(element, &mut params);
            }

            let fetched = handle.execute(id, &params, remaining)?;
            affected += fetched.rows_affected;
            for row in &fetched.rows {
                if !self.outputs.is_empty() {
                    if row.len() != out_columns {
                        return Err(SqlSessionError::BindingCountMismatch {
                            placeholders: row.len(),
                            bound: out_columns,
                        });
                    }
                    let mut offset = 0;
                    for output in &mut self.outputs {
                        let width = output.columns_handled();
                        output.push_row(&row[offset..offset + width])?;
                        offset += width;
                    }
                }
            }
            retrieved += fetched.rows.len() as u64;
            if !fetched.exhausted {
                exhausted = false;
            }
        }

        self.state = if exhausted { State::Done } else { State::Prepared };
        debug!(retrieved, affected, done = exhausted, "statement executed");

        if retrieved == 0 && self.outputs.is_empty() {
            Ok(affected)
        } else {
            Ok(retrieved)
        }
    }

    /// Clear done-state and accumulated container outputs, allowing a
    /// full re-execution from scratch. Scalar outputs keep their last
    /// value.
    ///
    /// # Errors
    ///
    /// `ClosedSession` once the owning session is closed.
    pub fn reset(&mut self) -> Result<(), SqlSessionError> {
        if let Some(id) = self.prepared {
            let session = self.session.clone();
            let mut guard = session.lock();
            guard.handle_mut()?.reset(id)?;
            self.state = State::Prepared;
        }
        for output in &mut self.outputs {
            output.clear();
        }
        Ok(())
    }
}

impl Drop for Statement<'_> {
    fn drop(&mut self) {
        if let Some(id) = self.prepared {
            let session = self.session.clone();
            let mut guard = session.lock();
            if let Ok(handle) = guard.handle_mut() {
                handle.finalize(id);
            }
        }
    }
}
