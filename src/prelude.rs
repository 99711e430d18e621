//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from rewind.
//! Importing this module with a wildcard import brings the core types into scope:
//!
//! ```
//! use rewind::prelude::*;
//! ```
//!
//! # Re-exported Items
//!
//! ## Core Types
//! - [`Parser`] - Trait implemented by every grammar node
//! - [`ResultValue`] - Value produced by a successful match
//! - [`CustomNode`] - Trait for domain nodes built by actions
//! - [`Cursor`] - Input cursor
//! - [`Deferred`] - Late-bound node for recursive grammars
//!
//! ## Grammar DSL
//! - [`ch()`], [`lit()`], [`int()`], [`quoted()`], [`end()`], [`epsilon()`] - Primitives
//! - [`many()`], [`many1()`], [`optional()`] - Repetition
//! - [`seq()`], [`choice()`] - Lists of nodes
//! - [`dynamic()`] - Type erasure
//! - [`recursive()`] - Self-referential grammars
//! - [`ParserExt`] - Fluent combinator methods
//!
//! ## Running
//! - [`run()`], [`try_run()`], [`matches()`] - Entry points
//! - [`RunConfig`], [`NodeConfig`] - Configuration
//! - [`RunError`], [`UsageError`] - Errors

// ============================================================================
// Core Types
// ============================================================================

pub use crate::engine::{CustomNode, Cursor, Deferred, Parser, ResultValue, Stream};

// ============================================================================
// Grammar DSL
// ============================================================================

pub use crate::engine::dsl::{
    ch, choice, dynamic, end, epsilon, int, lit, many, many1, optional, quoted, recursive, seq,
    ParserExt,
};

// ============================================================================
// Running
// ============================================================================

pub use crate::engine::{matches, run, try_run, NodeConfig, RunConfig};

// ============================================================================
// Error Handling
// ============================================================================

pub use crate::engine::error::{RunError, UsageError};
