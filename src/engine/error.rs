//! Error types for rewind
//!
//! Two kinds of failure exist. A local match failure is not an error at all:
//! `attempt` returns `false` and the node restores itself. Everything here is
//! the other kind, structural misuse of the engine by a grammar author or by a
//! combinator implementation.

use thiserror::Error;

/// Structural misuse of a grammar node or cursor
///
/// These indicate a defect in grammar construction or engine usage, never a
/// parse failure. Inside the engine they abort via [`misuse`]; the few
/// operations a grammar author calls directly return them instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// `unparse` was called on a node with nothing to undo
    #[error("unparse on {node} with an empty undo log")]
    EmptyUndoLog {
        /// Kind of node that was unwound
        node: &'static str,
    },

    /// `result` was called without a preceding successful attempt
    #[error("result requested from {node} without a successful attempt")]
    NoResult {
        /// Kind of node that was asked for a result
        node: &'static str,
    },

    /// A deferred node was assigned a grammar twice
    #[error("deferred parser `{name}` is already defined")]
    AlreadyDefined {
        /// Debug name of the deferred node
        name: String,
    },

    /// A deferred node was run before being assigned a grammar
    #[error("deferred parser `{name}` was used before being defined")]
    Undefined {
        /// Debug name of the deferred node
        name: String,
    },

    /// A weak deferred handle outlived the node it points to
    #[error("deferred parser `{name}` was dropped while still referenced")]
    Dropped {
        /// Debug name of the deferred node
        name: String,
    },

    /// The cursor was asked to retreat past the start of its buffer
    #[error("cursor retreat by {requested} from position {position}")]
    CursorUnderflow {
        /// Bytes requested
        requested: usize,
        /// Position at the time of the call
        position: usize,
    },

    /// The cursor was asked to advance past the end of its buffer
    #[error("cursor advance by {requested} with {remaining} bytes remaining")]
    CursorOverflow {
        /// Bytes requested
        requested: usize,
        /// Bytes left in the buffer
        remaining: usize,
    },

    /// A semantic action expected a different number of parts
    #[error("semantic action expects {expected} parts, got {found}")]
    Arity {
        /// Parts the transform accepts
        expected: usize,
        /// Parts the wrapped node produced
        found: usize,
    },

    /// A top-level run started while undo logs still held entries
    #[error("grammar has pending undo entries from an earlier attempt")]
    Unsettled,
}

/// Errors returned by [`try_run`](super::parser::try_run)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// Input exceeds the configured maximum size
    #[error("input of {input_size} bytes exceeds the limit of {max_size}")]
    InputTooLarge {
        /// Size of the input in bytes
        input_size: usize,
        /// Maximum allowed size
        max_size: usize,
    },

    /// The grammar was misused
    #[error(transparent)]
    Usage(#[from] UsageError),
}

/// Abort on structural misuse
#[cold]
#[track_caller]
pub(crate) fn misuse(err: UsageError) -> ! {
    panic!("{}", err)
}
