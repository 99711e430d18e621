//! Per-node undo state
//!
//! Grammar nodes are reentrant: a [`Deferred`](super::deferred::Deferred)
//! node can run a node again while an outer attempt of the same node is still
//! in flight. State therefore lives behind `&self` in short-lived `RefCell`
//! borrows, never held across a call into a child node.
//!
//! Cloning either type yields fresh, empty state. A cloned node is the same
//! grammar, not the same attempt.

use super::error::{misuse, UsageError};
use std::cell::RefCell;
use std::fmt;

/// LIFO stack of undo entries, one pushed per successful step
pub struct UndoLog<T> {
    node: &'static str,
    entries: RefCell<Vec<T>>,
}

impl<T> UndoLog<T> {
    /// Create an empty log for a node kind (used in misuse reports)
    pub fn new(node: &'static str) -> Self {
        Self {
            node,
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Record one successful step
    #[inline]
    pub fn push(&self, entry: T) {
        self.entries.borrow_mut().push(entry);
    }

    /// Remove the most recent entry
    ///
    /// # Panics
    ///
    /// Panics with [`UsageError::EmptyUndoLog`] if nothing is pending.
    #[inline]
    #[track_caller]
    pub fn pop(&self) -> T {
        let entry = self.entries.borrow_mut().pop();
        match entry {
            Some(entry) => entry,
            None => misuse(UsageError::EmptyUndoLog { node: self.node }),
        }
    }

    /// Number of pending entries
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing is pending
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl<T> Clone for UndoLog<T> {
    fn clone(&self) -> Self {
        Self::new(self.node)
    }
}

impl<T> fmt::Debug for UndoLog<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoLog")
            .field("node", &self.node)
            .field("pending", &self.len())
            .finish()
    }
}

/// Holds the value of the most recent successful match until it is taken
pub struct Slot<T> {
    node: &'static str,
    value: RefCell<Option<T>>,
}

impl<T> Slot<T> {
    /// Create an empty slot for a node kind
    pub fn new(node: &'static str) -> Self {
        Self {
            node,
            value: RefCell::new(None),
        }
    }

    /// Store the value of a successful match, replacing any untaken one
    #[inline]
    pub fn fill(&self, value: T) {
        *self.value.borrow_mut() = Some(value);
    }

    /// Move the stored value out
    ///
    /// # Panics
    ///
    /// Panics with [`UsageError::NoResult`] if there is no value.
    #[inline]
    #[track_caller]
    pub fn take(&self) -> T {
        let value = self.value.borrow_mut().take();
        match value {
            Some(value) => value,
            None => misuse(UsageError::NoResult { node: self.node }),
        }
    }

    /// Drop any untaken value
    #[inline]
    pub fn clear(&self) {
        self.value.borrow_mut().take();
    }

    /// Whether a value is waiting to be taken
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.value.borrow().is_some()
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self::new(self.node)
    }
}

impl<T> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("node", &self.node)
            .field("filled", &self.is_filled())
            .finish()
    }
}
