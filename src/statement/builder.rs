use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use crate::binding::{
    BTreeMapOut, BTreeSetOut, BulkRefIn, HashMapOut, HashSetOut, ScalarIn, ScalarOut, SliceIn,
    VecOut,
};
use crate::error::SqlSessionError;
use crate::session::Session;
use crate::types::{Keyed, SqlRecord};

use super::Statement;

/// Fluent accumulator that folds SQL fragments, bindings, and a row
/// limit onto one [`Statement`].
///
/// Clause order matters: binding-addition order determines parameter
/// and result-column position assignment. The builder performs no
/// execution itself; finish the chain with [`build`](Self::build) for a
/// reusable statement or [`run`](Self::run) to execute once
/// immediately:
///
/// ```no_run
/// use sql_session::Session;
///
/// let session = Session::open("memory", "demo")?;
/// session.statement("CREATE TABLE t (data INTEGER)").run()?;
///
/// let data: Vec<i64> = (0..100).collect();
/// session
///     .statement("INSERT INTO t VALUES(:data)")
///     .bind_each(&data)
///     .run()?;
/// # Ok::<(), sql_session::SqlSessionError>(())
/// ```
///
/// Clause errors, like binding an empty collection, are deferred and
/// reported by the terminal call so the chain stays fluent; they never
/// reach the engine.
pub struct StatementBuilder<'v> {
    statement: Statement<'v>,
    deferred: Option<SqlSessionError>,
}

impl<'v> StatementBuilder<'v> {
    pub(crate) fn new(session: Session, sql: &str) -> Self {
        Self {
            statement: Statement::new(session, sql.to_string()),
            deferred: None,
        }
    }

    fn record(mut self, result: Result<(), SqlSessionError>) -> Self {
        if let Err(err) = result {
            if self.deferred.is_none() {
                self.deferred = Some(err);
            }
        }
        self
    }

    /// Append another SQL fragment to the statement source.
    #[must_use]
    pub fn sql(mut self, fragment: &str) -> Self {
        let result = self.statement.append_source(fragment);
        self.record(result)
    }

    /// Bind one scalar or record value as input.
    #[must_use]
    pub fn bind<T: SqlRecord>(mut self, value: &'v T) -> Self {
        let result = self.statement.add_input(Box::new(ScalarIn::new(value)));
        self.record(result)
    }

    /// Bind every element of an ordered sequence; one `execute()` then
    /// drives the operation once per element.
    #[must_use]
    pub fn bind_each<T: SqlRecord>(mut self, values: &'v [T]) -> Self {
        let result = SliceIn::new(values)
            .and_then(|binding| self.statement.add_input(Box::new(binding)));
        self.record(result)
    }

    /// Bind every element of a set, in iteration order.
    #[must_use]
    pub fn bind_set<T: SqlRecord + Ord>(mut self, values: &'v BTreeSet<T>) -> Self {
        let result = BulkRefIn::from_btree_set(values)
            .and_then(|binding| self.statement.add_input(Box::new(binding)));
        self.record(result)
    }

    /// Bind every element of a hash set, in iteration order.
    #[must_use]
    pub fn bind_hash_set<T: SqlRecord + Hash + Eq>(mut self, values: &'v HashSet<T>) -> Self {
        let result = BulkRefIn::from_hash_set(values)
            .and_then(|binding| self.statement.add_input(Box::new(binding)));
        self.record(result)
    }

    /// Bind the values of a map, in key order.
    #[must_use]
    pub fn bind_map<K, T: SqlRecord>(mut self, values: &'v BTreeMap<K, T>) -> Self {
        let result = BulkRefIn::from_btree_map(values)
            .and_then(|binding| self.statement.add_input(Box::new(binding)));
        self.record(result)
    }

    /// Bind the values of a hash map, in iteration order.
    #[must_use]
    pub fn bind_hash_map<K, T: SqlRecord>(mut self, values: &'v HashMap<K, T>) -> Self {
        let result = BulkRefIn::from_hash_map(values)
            .and_then(|binding| self.statement.add_input(Box::new(binding)));
        self.record(result)
    }

    /// Retrieve into a scalar slot, overwritten by each result row.
    #[must_use]
    pub fn fetch<T: SqlRecord>(mut self, slot: &'v mut T) -> Self {
        let result = self.statement.add_output(Box::new(ScalarOut::new(slot)));
        self.record(result)
    }

    /// Retrieve into a growable vector; rows accumulate across chunked
    /// executions.
    #[must_use]
    pub fn fetch_all<T: SqlRecord>(mut self, out: &'v mut Vec<T>) -> Self {
        let result = self.statement.add_output(Box::new(VecOut::new(out)));
        self.record(result)
    }

    /// Retrieve into an ordered set.
    #[must_use]
    pub fn fetch_set<T: SqlRecord + Ord>(mut self, out: &'v mut BTreeSet<T>) -> Self {
        let result = self.statement.add_output(Box::new(BTreeSetOut::new(out)));
        self.record(result)
    }

    /// Retrieve into a hash set.
    #[must_use]
    pub fn fetch_hash_set<T: SqlRecord + Hash + Eq>(mut self, out: &'v mut HashSet<T>) -> Self {
        let result = self.statement.add_output(Box::new(HashSetOut::new(out)));
        self.record(result)
    }

    /// Retrieve into an ordered map, keyed by [`Keyed::key`].
    #[must_use]
    pub fn fetch_map<T>(mut self, out: &'v mut BTreeMap<T::Key, T>) -> Self
    where
        T: SqlRecord + Keyed,
        T::Key: Ord,
    {
        let result = self.statement.add_output(Box::new(BTreeMapOut::new(out)));
        self.record(result)
    }

    /// Retrieve into a hash map, keyed by [`Keyed::key`].
    #[must_use]
    pub fn fetch_hash_map<T>(mut self, out: &'v mut HashMap<T::Key, T>) -> Self
    where
        T: SqlRecord + Keyed,
        T::Key: Hash + Eq,
    {
        let result = self.statement.add_output(Box::new(HashMapOut::new(out)));
        self.record(result)
    }

    /// Cap the number of rows one `execute()` retrieves. When given
    /// more than once, only the last limit is effective.
    #[must_use]
    pub fn limit(mut self, rows: u64) -> Self {
        self.statement.set_limit(Some(rows));
        self
    }

    /// Finish the chain and obtain the reusable statement.
    ///
    /// # Errors
    ///
    /// Surfaces the first deferred clause error, e.g. `EmptyBinding`.
    pub fn build(self) -> Result<Statement<'v>, SqlSessionError> {
        match self.deferred {
            Some(err) => Err(err),
            None => Ok(self.statement),
        }
    }

    /// The "execute now" terminal: build and execute exactly once.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build) followed by
    /// [`Statement::execute`].
    pub fn run(self) -> Result<u64, SqlSessionError> {
        self.build()?.execute()
    }
}
