use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::error::SqlSessionError;
use crate::types::{SqlRecord, SqlValue};

use super::InputBinding;

/// Input binding over one scalar or composite record value.
pub(crate) struct ScalarIn<'v, T: SqlRecord> {
    value: &'v T,
}

impl<'v, T: SqlRecord> ScalarIn<'v, T> {
    pub(crate) fn new(value: &'v T) -> Self {
        Self { value }
    }
}

impl<T: SqlRecord> InputBinding for ScalarIn<'_, T> {
    fn columns_handled(&self) -> usize {
        T::COLUMNS
    }

    fn elements(&self) -> usize {
        1
    }

    fn is_bulk(&self) -> bool {
        false
    }

    fn append_element(&self, _index: usize, out: &mut Vec<SqlValue>) {
        self.value.bind_values(out);
    }
}

/// Input binding over an ordered slice of values.
pub(crate) struct SliceIn<'v, T: SqlRecord> {
    values: &'v [T],
}

impl<'v, T: SqlRecord> SliceIn<'v, T> {
    pub(crate) fn new(values: &'v [T]) -> Result<Self, SqlSessionError> {
        if values.is_empty() {
            return Err(SqlSessionError::EmptyBinding);
        }
        Ok(Self { values })
    }
}

impl<T: SqlRecord> InputBinding for SliceIn<'_, T> {
    fn columns_handled(&self) -> usize {
        T::COLUMNS
    }

    fn elements(&self) -> usize {
        self.values.len()
    }

    fn is_bulk(&self) -> bool {
        true
    }

    fn append_element(&self, index: usize, out: &mut Vec<SqlValue>) {
        self.values[index].bind_values(out);
    }
}

/// Input binding over a set or map, snapshotting element *references*
/// in iteration order at bind time. The elements themselves are still
/// read at execute time.
pub(crate) struct BulkRefIn<'v, T: SqlRecord> {
    values: Vec<&'v T>,
}

impl<'v, T: SqlRecord> BulkRefIn<'v, T> {
    fn collect<I>(iter: I) -> Result<Self, SqlSessionError>
    where
        I: IntoIterator<Item = &'v T>,
    {
        let values: Vec<&'v T> = iter.into_iter().collect();
        if values.is_empty() {
            return Err(SqlSessionError::EmptyBinding);
        }
        Ok(Self { values })
    }

    pub(crate) fn from_btree_set(set: &'v BTreeSet<T>) -> Result<Self, SqlSessionError> {
        Self::collect(set)
    }

    pub(crate) fn from_hash_set(set: &'v HashSet<T>) -> Result<Self, SqlSessionError> {
        Self::collect(set)
    }

    pub(crate) fn from_btree_map<K>(map: &'v BTreeMap<K, T>) -> Result<Self, SqlSessionError> {
        Self::collect(map.values())
    }

    pub(crate) fn from_hash_map<K>(map: &'v HashMap<K, T>) -> Result<Self, SqlSessionError> {
        Self::collect(map.values())
    }
}

impl<T: SqlRecord> InputBinding for BulkRefIn<'_, T> {
    fn columns_handled(&self) -> usize {
        T::COLUMNS
    }

    fn elements(&self) -> usize {
        self.values.len()
    }

    fn is_bulk(&self) -> bool {
        true
    }

    fn append_element(&self, index: usize, out: &mut Vec<SqlValue>) {
        self.values[index].bind_values(out);
    }
}
