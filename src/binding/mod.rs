//! The binding protocol: how program values are exposed as ordered
//! sequences of SQL parameter positions (inputs) or result-column
//! targets (outputs).
//!
//! A binding never owns the bound value's storage; it holds a borrow
//! that must outlive every `execute()` of the owning statement, which
//! the compiler enforces through the statement's lifetime parameter.

mod input;
mod output;

pub(crate) use input::{BulkRefIn, ScalarIn, SliceIn};
pub(crate) use output::{
    BTreeMapOut, BTreeSetOut, HashMapOut, HashSetOut, ScalarOut, VecOut,
};

use crate::error::SqlSessionError;
use crate::types::SqlValue;

/// An input ("use") binding: a source of parameter values.
///
/// A binding over a collection of N elements drives the underlying
/// operation once per element within a single `execute()` call, in the
/// collection's iteration order.
pub trait InputBinding {
    /// How many SQL parameter positions one element occupies.
    fn columns_handled(&self) -> usize;

    /// Number of elements this binding contributes per execution.
    fn elements(&self) -> usize;

    /// Whether this binding came from a collection. Scalar bindings are
    /// repeated for every element row when mixed with bulk bindings.
    fn is_bulk(&self) -> bool;

    /// Append the column values of element `index` to `out`.
    ///
    /// Values are re-read from the borrowed source on every call, so a
    /// statement re-executed after the source was repopulated sees the
    /// current contents.
    fn append_element(&self, index: usize, out: &mut Vec<SqlValue>);
}

/// An output ("into") binding: a sink for result-column values.
pub trait OutputBinding {
    /// How many result columns one element consumes.
    fn columns_handled(&self) -> usize;

    /// Receive one row slice of exactly `columns_handled()` values.
    ///
    /// Container targets append/insert; scalar targets are overwritten.
    ///
    /// # Errors
    ///
    /// Returns `SqlSessionError::UnsupportedType` if a column cannot be
    /// converted into the target's element type.
    fn push_row(&mut self, row: &[SqlValue]) -> Result<(), SqlSessionError>;

    /// Drop accumulated elements, for `Statement::reset`. Scalar targets
    /// keep their last value.
    fn clear(&mut self);
}
