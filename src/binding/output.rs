use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use crate::error::SqlSessionError;
use crate::types::{Keyed, SqlRecord, SqlValue};

use super::OutputBinding;

/// Output binding over one scalar or record slot; each retrieved row
/// overwrites it, so after an execution it holds the last row's value.
pub(crate) struct ScalarOut<'v, T: SqlRecord> {
    slot: &'v mut T,
}

impl<'v, T: SqlRecord> ScalarOut<'v, T> {
    pub(crate) fn new(slot: &'v mut T) -> Self {
        Self { slot }
    }
}

impl<T: SqlRecord> OutputBinding for ScalarOut<'_, T> {
    fn columns_handled(&self) -> usize {
        T::COLUMNS
    }

    fn push_row(&mut self, row: &[SqlValue]) -> Result<(), SqlSessionError> {
        *self.slot = T::from_row(row)?;
        Ok(())
    }

    fn clear(&mut self) {}
}

/// Output binding appending one element per retrieved row.
pub(crate) struct VecOut<'v, T: SqlRecord> {
    out: &'v mut Vec<T>,
}

impl<'v, T: SqlRecord> VecOut<'v, T> {
    pub(crate) fn new(out: &'v mut Vec<T>) -> Self {
        Self { out }
    }
}

impl<T: SqlRecord> OutputBinding for VecOut<'_, T> {
    fn columns_handled(&self) -> usize {
        T::COLUMNS
    }

    fn push_row(&mut self, row: &[SqlValue]) -> Result<(), SqlSessionError> {
        self.out.push(T::from_row(row)?);
        Ok(())
    }

    fn clear(&mut self) {
        self.out.clear();
    }
}

pub(crate) struct BTreeSetOut<'v, T: SqlRecord + Ord> {
    out: &'v mut BTreeSet<T>,
}

impl<'v, T: SqlRecord + Ord> BTreeSetOut<'v, T> {
    pub(crate) fn new(out: &'v mut BTreeSet<T>) -> Self {
        Self { out }
    }
}

impl<T: SqlRecord + Ord> OutputBinding for BTreeSetOut<'_, T> {
    fn columns_handled(&self) -> usize {
        T::COLUMNS
    }

    fn push_row(&mut self, row: &[SqlValue]) -> Result<(), SqlSessionError> {
        self.out.insert(T::from_row(row)?);
        Ok(())
    }

    fn clear(&mut self) {
        self.out.clear();
    }
}

pub(crate) struct HashSetOut<'v, T: SqlRecord + Hash + Eq> {
    out: &'v mut HashSet<T>,
}

impl<'v, T: SqlRecord + Hash + Eq> HashSetOut<'v, T> {
    pub(crate) fn new(out: &'v mut HashSet<T>) -> Self {
        Self { out }
    }
}

impl<T: SqlRecord + Hash + Eq> OutputBinding for HashSetOut<'_, T> {
    fn columns_handled(&self) -> usize {
        T::COLUMNS
    }

    fn push_row(&mut self, row: &[SqlValue]) -> Result<(), SqlSessionError> {
        self.out.insert(T::from_row(row)?);
        Ok(())
    }

    fn clear(&mut self) {
        self.out.clear();
    }
}

/// Associative output binding; each element is inserted under the key
/// its type extracts via [`Keyed`].
pub(crate) struct BTreeMapOut<'v, T>
where
    T: SqlRecord + Keyed,
    T::Key: Ord,
{
    out: &'v mut BTreeMap<T::Key, T>,
}

impl<'v, T> BTreeMapOut<'v, T>
where
    T: SqlRecord + Keyed,
    T::Key: Ord,
{
    pub(crate) fn new(out: &'v mut BTreeMap<T::Key, T>) -> Self {
        Self { out }
    }
}

impl<T> OutputBinding for BTreeMapOut<'_, T>
where
    T: SqlRecord + Keyed,
    T::Key: Ord,
{
    fn columns_handled(&self) -> usize {
        T::COLUMNS
    }

    fn push_row(&mut self, row: &[SqlValue]) -> Result<(), SqlSessionError> {
        let element = T::from_row(row)?;
        self.out.insert(element.key(), element);
        Ok(())
    }

    fn clear(&mut self) {
        self.out.clear();
    }
}

pub(crate) struct HashMapOut<'v, T>
where
    T: SqlRecord + Keyed,
    T::Key: Hash + Eq,
{
    out: &'v mut HashMap<T::Key, T>,
}

impl<'v, T> HashMapOut<'v, T>
where
    T: SqlRecord + Keyed,
    T::Key: Hash + Eq,
{
    pub(crate) fn new(out: &'v mut HashMap<T::Key, T>) -> Self {
        Self { out }
    }
}

impl<T> OutputBinding for HashMapOut<'_, T>
where
    T: SqlRecord + Keyed,
    T::Key: Hash + Eq,
{
    fn columns_handled(&self) -> usize {
        T::COLUMNS
    }

    fn push_row(&mut self, row: &[SqlValue]) -> Result<(), SqlSessionError> {
        let element = T::from_row(row)?;
        self.out.insert(element.key(), element);
        Ok(())
    }

    fn clear(&mut self) {
        self.out.clear();
    }
}
