//! Deferred nodes for recursive grammars
//!
//! A [`Deferred`] is a placeholder that is used in a grammar before the
//! grammar it stands for exists. Once [`define`](Deferred::define)d it
//! forwards everything to that grammar through [`DynParser`], so the
//! placeholder type does not depend on the grammar's type.
//!
//! # Handles
//!
//! Deferred nodes are handles to shared state. A strong handle keeps the
//! definition alive; a weak handle from [`downgrade`](Deferred::downgrade)
//! does not. A grammar that refers to itself through strong handles forms an
//! `Rc` cycle and is never freed, so [`recursive`] hands the builder a weak
//! handle and returns the only strong one:
//!
//! ```rust
//! use rewind::prelude::*;
//!
//! // block = "{" block* "}"
//! let block = recursive("block", |block| ch(b'{') >> many(block) >> ch(b'}'));
//!
//! assert!(matches(&(block.clone() >> end()), "{ { } { { } } }"));
//! assert!(!matches(&(block >> end()), "{ {  }"));
//! ```

use super::config::NodeConfig;
use super::error::{misuse, UsageError};
use super::parser::{DynParser, Parser};
use super::result::ResultValue;
use super::stream::{Stream, StreamAdapter};
use std::cell::{Cell, OnceCell};
use std::fmt;
use std::rc::{Rc, Weak};

struct Shared {
    config: NodeConfig,
    grammar: OnceCell<Box<dyn DynParser>>,
    // Walk in which is_settled last entered this node
    visited: Cell<u64>,
}

thread_local! {
    static WALK: Cell<u64> = const { Cell::new(0) };
    static WALK_OPEN: Cell<bool> = const { Cell::new(false) };
}

/// One `is_settled` walk over a grammar graph
///
/// The outermost deferred node opens the walk; nested nodes join it. Each
/// node is entered at most once per walk, which also cuts cycles.
struct SettledWalk {
    id: u64,
    opened: bool,
}

impl SettledWalk {
    fn enter() -> Self {
        if WALK_OPEN.with(|open| open.replace(true)) {
            return Self {
                id: WALK.with(Cell::get),
                opened: false,
            };
        }
        let id = WALK.with(|walk| {
            let id = walk.get().wrapping_add(1);
            walk.set(id);
            id
        });
        Self { id, opened: true }
    }
}

impl Drop for SettledWalk {
    fn drop(&mut self) {
        if self.opened {
            WALK_OPEN.with(|open| open.set(false));
        }
    }
}

#[derive(Clone)]
enum Link {
    Strong(Rc<Shared>),
    Weak { shared: Weak<Shared>, name: String },
}

/// Placeholder for a grammar defined later
#[derive(Clone)]
pub struct Deferred {
    link: Link,
}

impl Deferred {
    /// Create an anonymous, undefined node
    pub fn new() -> Self {
        Self::with_config(NodeConfig::new())
    }

    /// Create an undefined node with a debug name
    pub fn named(name: impl Into<String>) -> Self {
        Self::with_config(NodeConfig::named(name))
    }

    /// Create an undefined node with a debug config
    pub fn with_config(config: NodeConfig) -> Self {
        Self {
            link: Link::Strong(Rc::new(Shared {
                config,
                grammar: OnceCell::new(),
                visited: Cell::new(0),
            })),
        }
    }

    /// Assign the grammar this node stands for
    ///
    /// Every handle to the node sees the definition.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::AlreadyDefined`] if the node already has a
    /// grammar, or [`UsageError::Dropped`] if this is a weak handle whose
    /// node is gone.
    pub fn define<P: Parser + 'static>(&self, grammar: P) -> Result<(), UsageError> {
        let shared = self.upgrade()?;
        shared
            .grammar
            .set(Box::new(grammar))
            .map_err(|_| UsageError::AlreadyDefined {
                name: shared.config.display_name().to_string(),
            })
    }

    /// Whether a grammar has been assigned
    pub fn is_defined(&self) -> bool {
        self.upgrade()
            .map(|shared| shared.grammar.get().is_some())
            .unwrap_or(false)
    }

    /// Debug name, or `<anonymous>`
    pub fn name(&self) -> String {
        match &self.link {
            Link::Strong(shared) => shared.config.display_name().to_string(),
            Link::Weak { name, .. } => name.clone(),
        }
    }

    /// Whether this handle keeps the node alive
    pub fn is_strong(&self) -> bool {
        matches!(self.link, Link::Strong(_))
    }

    /// Create a handle that does not keep the node alive
    pub fn downgrade(&self) -> Deferred {
        match &self.link {
            Link::Strong(shared) => Deferred {
                link: Link::Weak {
                    shared: Rc::downgrade(shared),
                    name: shared.config.display_name().to_string(),
                },
            },
            Link::Weak { .. } => self.clone(),
        }
    }

    fn upgrade(&self) -> Result<Rc<Shared>, UsageError> {
        match &self.link {
            Link::Strong(shared) => Ok(Rc::clone(shared)),
            Link::Weak { shared, name } => shared
                .upgrade()
                .ok_or_else(|| UsageError::Dropped { name: name.clone() }),
        }
    }

    #[track_caller]
    fn with_grammar<R>(&self, f: impl FnOnce(&Shared, &dyn DynParser) -> R) -> R {
        let shared = match self.upgrade() {
            Ok(shared) => shared,
            Err(err) => misuse(err),
        };
        match shared.grammar.get() {
            Some(grammar) => f(&shared, grammar.as_ref()),
            None => misuse(UsageError::Undefined {
                name: shared.config.display_name().to_string(),
            }),
        }
    }
}

impl Default for Deferred {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for Deferred {
    fn attempt<S: Stream + ?Sized>(&self, stream: &mut S) -> bool {
        self.with_grammar(|shared, grammar| {
            let matched = grammar.attempt_dyn(&mut StreamAdapter::new(stream));
            if shared.config.trace {
                log_debug!(
                    "{}: attempt {} at {}",
                    shared.config.display_name(),
                    if matched { "matched" } else { "failed" },
                    stream.position()
                );
            }
            matched
        })
    }

    fn unparse<S: Stream + ?Sized>(&self, stream: &mut S) {
        self.with_grammar(|shared, grammar| {
            grammar.unparse_dyn(&mut StreamAdapter::new(stream));
            if shared.config.trace {
                log_debug!(
                    "{}: unparse back to {}",
                    shared.config.display_name(),
                    stream.position()
                );
            }
        })
    }

    fn result(&self) -> ResultValue {
        self.with_grammar(|_, grammar| grammar.result_dyn())
    }

    fn is_settled(&self) -> bool {
        let Ok(shared) = self.upgrade() else {
            return true;
        };
        let walk = SettledWalk::enter();
        // A node seen earlier in this walk has already reported its state
        if shared.visited.replace(walk.id) == walk.id {
            return true;
        }
        shared
            .grammar
            .get()
            .map_or(true, |grammar| grammar.is_settled_dyn())
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("name", &self.name())
            .field("strong", &self.is_strong())
            .field("defined", &self.is_defined())
            .finish()
    }
}

/// Build a self-referential grammar
///
/// `build` receives a weak handle to the node being defined and returns its
/// grammar. The returned handle is strong; the grammar lives as long as it
/// (or a clone of it) does.
pub fn recursive<P, F>(name: impl Into<String>, build: F) -> Deferred
where
    P: Parser + 'static,
    F: FnOnce(Deferred) -> P,
{
    let node = Deferred::named(name);
    let grammar = build(node.downgrade());
    if let Err(err) = node.define(grammar) {
        misuse(err);
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::dsl::{ch, end, int, lit, many, ParserExt};
    use crate::engine::parser::{matches, run};
    use crate::engine::stream::Cursor;
    use std::time::{Duration, Instant};

    #[test]
    fn test_define_once() {
        let node = Deferred::named("value");
        assert!(!node.is_defined());
        node.define(int()).unwrap();
        assert!(node.is_defined());
        let err = node.define(lit("x")).unwrap_err();
        assert_eq!(
            err,
            UsageError::AlreadyDefined {
                name: "value".to_string()
            }
        );
    }

    #[test]
    fn test_forwards_to_definition() {
        let node = Deferred::new();
        node.define(int()).unwrap();
        let mut cursor = Cursor::new(" 12");
        assert!(node.attempt(&mut cursor));
        assert_eq!(node.result(), ResultValue::int(12));
        assert!(!node.is_settled());
        node.unparse(&mut cursor);
        assert_eq!(cursor.position(), 0);
        assert!(node.is_settled());
    }

    #[test]
    fn test_define_after_use_in_grammar() {
        let value = Deferred::named("value");
        let pair = ch(b'(') >> value.clone() >> ch(b',') >> value.clone() >> ch(b')');
        value.define(int() | pair.clone()).unwrap();
        assert!(matches(&(pair.clone() >> end()), "(1, (2, 3))"));
        assert!(!matches(&(pair >> end()), "(1, (2, 3)"));
    }

    #[test]
    fn test_recursive_nesting() {
        let block = recursive("block", |block| ch(b'{') >> many(block) >> ch(b'}'));
        let grammar = block >> end();
        assert!(matches(&grammar, "{ }"));
        assert!(matches(&grammar, "{ { } }"));
        assert!(!matches(&grammar, "{ {  }"));
        assert!(grammar.is_settled());

        let deep = "{".repeat(100) + &"}".repeat(100);
        assert!(matches(&grammar, deep));
    }

    #[test]
    fn test_recursive_does_not_leak() {
        let block = recursive("block", |block| ch(b'[') >> block.many() >> ch(b']'));
        let weak = block.downgrade();
        assert!(weak.is_defined());
        drop(block);
        assert!(!weak.is_defined());
        assert!(weak.is_settled());
    }

    #[test]
    fn test_is_settled_terminates_on_cycles() {
        let a = Deferred::named("a");
        let b = Deferred::named("b");
        a.define(lit("x") | b.clone()).unwrap();
        b.define(lit("y") >> a.clone()).unwrap();
        assert!(a.is_settled());
        assert!(b.is_settled());
        assert_eq!(
            run(&a, "y y x").unwrap().to_string(),
            "([String:y],([String:y],[String:x]))"
        );
    }

    #[test]
    fn test_is_settled_visits_shared_rules_once() {
        // Every rule refers to the next one twice, so a walk that revisits
        // shared rules would take 2^64 steps.
        let mut next = Deferred::named("r64");
        next.define(lit("z")).unwrap();
        for i in (0..64).rev() {
            let rule = Deferred::named(format!("r{}", i));
            rule.define((lit("a") >> next.clone()) | next).unwrap();
            next = rule;
        }

        let started = Instant::now();
        assert!(next.is_settled());
        assert!(run(&next, "x").is_none());
        assert!(run(&next, "a a z").is_some());
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_is_settled_finds_entries_in_shared_rules() {
        let inner = Deferred::named("inner");
        inner.define(int()).unwrap();
        let outer = Deferred::named("outer");
        outer.define(inner.clone() | (lit("-") >> inner.clone())).unwrap();

        let mut cursor = Cursor::new("5");
        assert!(outer.attempt(&mut cursor));
        outer.result();
        assert!(!outer.is_settled());
        assert!(!outer.is_settled());
        outer.unparse(&mut cursor);
        assert!(outer.is_settled());
    }

    #[test]
    fn test_contributes_one_part() {
        let tail = Deferred::named("tail");
        tail.define(end()).unwrap();
        assert_eq!(run(&(int() >> end()), "1").unwrap().to_string(), "([Int:1])");
        assert_eq!(run(&(int() >> tail), "1").unwrap().to_string(), "([Int:1],[])");
    }

    #[test]
    fn test_names() {
        assert_eq!(Deferred::new().name(), "<anonymous>");
        let node = Deferred::with_config(NodeConfig::named("expr").with_trace(true));
        assert_eq!(node.name(), "expr");
        assert_eq!(node.downgrade().name(), "expr");
        assert!(!node.downgrade().is_strong());
    }

    #[test]
    fn test_traced_node_still_parses() {
        let node = Deferred::with_config(NodeConfig::named("number").with_trace(true));
        node.define(int()).unwrap();
        assert_eq!(run(&node, "3"), Some(ResultValue::int(3)));
    }

    #[test]
    #[should_panic(expected = "deferred parser `late` was used before being defined")]
    fn test_undefined_panics() {
        let node = Deferred::named("late");
        node.attempt(&mut Cursor::new("1"));
    }

    #[test]
    #[should_panic(expected = "deferred parser `gone` was dropped")]
    fn test_dropped_panics() {
        let node = Deferred::named("gone");
        node.define(int()).unwrap();
        let weak = node.downgrade();
        drop(node);
        weak.attempt(&mut Cursor::new("1"));
    }
}
