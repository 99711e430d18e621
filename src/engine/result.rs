//! Result values produced by successful matches
//!
//! A successful parse yields exactly one [`ResultValue`], owned by the caller.
//! Leaves produce integers and text, chains and repetitions produce
//! sequences, and semantic actions produce domain nodes through
//! [`CustomNode`].
//!
//! # Rendering
//!
//! `Display` renders a compact bracketed form, used by tests and debugging:
//!
//! ```text
//! [*:[+:[Int:1],[Int:2]],[Int:3]]
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::any::Any;
use std::fmt;

/// A domain-specific node built by a semantic action
///
/// Implementors expose a label and their child values; rendering,
/// comparison and serialization of [`ResultValue::Custom`] are derived from
/// those two.
///
/// # Example
///
/// ```
/// use rewind::engine::result::{CustomNode, ResultValue};
/// use std::any::Any;
///
/// #[derive(Debug)]
/// struct Negate(ResultValue);
///
/// impl CustomNode for Negate {
///     fn label(&self) -> &str {
///         "negate"
///     }
///     fn children(&self) -> Vec<&ResultValue> {
///         vec![&self.0]
///     }
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let value = ResultValue::custom(Negate(ResultValue::int(4)));
/// assert_eq!(value.to_string(), "[negate:[Int:4]]");
/// ```
pub trait CustomNode: fmt::Debug {
    /// Short tag shown in renderings, e.g. `+` or `negate`
    fn label(&self) -> &str;

    /// Child values in order
    fn children(&self) -> Vec<&ResultValue> {
        Vec::new()
    }

    /// Access to the concrete type for downcasting
    fn as_any(&self) -> &dyn Any;
}

/// Typed output of a successful match
#[derive(Debug, Default)]
pub enum ResultValue {
    /// Decimal integer
    Integer(i64),
    /// Matched or quoted text
    Text(String),
    /// Ordered sub-results
    Sequence(Vec<ResultValue>),
    /// Domain node built by a semantic action
    Custom(Box<dyn CustomNode>),
    /// No value
    #[default]
    Empty,
}

impl ResultValue {
    /// Create an integer value
    pub fn int(n: i64) -> Self {
        ResultValue::Integer(n)
    }

    /// Create a text value
    pub fn text(s: impl Into<String>) -> Self {
        ResultValue::Text(s.into())
    }

    /// Create a sequence value
    pub fn seq(items: Vec<ResultValue>) -> Self {
        ResultValue::Sequence(items)
    }

    /// Wrap a domain node
    pub fn custom(node: impl CustomNode + 'static) -> Self {
        ResultValue::Custom(Box::new(node))
    }

    /// Check if this is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, ResultValue::Empty)
    }

    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ResultValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResultValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as a slice of sub-results
    pub fn as_sequence(&self) -> Option<&[ResultValue]> {
        match self {
            ResultValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Take the sub-results out of a sequence
    pub fn into_sequence(self) -> Option<Vec<ResultValue>> {
        match self {
            ResultValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Get as a domain node
    pub fn as_custom(&self) -> Option<&dyn CustomNode> {
        match self {
            ResultValue::Custom(node) => Some(node.as_ref()),
            _ => None,
        }
    }

    /// Get as a domain node of a concrete type
    pub fn downcast_ref<T: CustomNode + 'static>(&self) -> Option<&T> {
        self.as_custom()?.as_any().downcast_ref::<T>()
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Convert to a JSON value tree
    pub fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl PartialEq for ResultValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ResultValue::Integer(a), ResultValue::Integer(b)) => a == b,
            (ResultValue::Text(a), ResultValue::Text(b)) => a == b,
            (ResultValue::Sequence(a), ResultValue::Sequence(b)) => a == b,
            (ResultValue::Custom(a), ResultValue::Custom(b)) => {
                a.label() == b.label() && a.children() == b.children()
            }
            (ResultValue::Empty, ResultValue::Empty) => true,
            _ => false,
        }
    }
}

impl From<i64> for ResultValue {
    fn from(n: i64) -> Self {
        ResultValue::Integer(n)
    }
}

impl From<&str> for ResultValue {
    fn from(s: &str) -> Self {
        ResultValue::Text(s.to_string())
    }
}

impl From<String> for ResultValue {
    fn from(s: String) -> Self {
        ResultValue::Text(s)
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[&ResultValue]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultValue::Integer(n) => write!(f, "[Int:{}]", n),
            ResultValue::Text(s) => write!(f, "[String:{}]", s),
            ResultValue::Sequence(items) => {
                f.write_str("(")?;
                write_joined(f, &items.iter().collect::<Vec<_>>())?;
                f.write_str(")")
            }
            ResultValue::Custom(node) => {
                let children = node.children();
                if children.is_empty() {
                    write!(f, "[{}]", node.label())
                } else {
                    write!(f, "[{}:", node.label())?;
                    write_joined(f, &children)?;
                    f.write_str("]")
                }
            }
            ResultValue::Empty => f.write_str("[]"),
        }
    }
}

impl Serialize for ResultValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ResultValue::Integer(n) => serializer.serialize_i64(*n),
            ResultValue::Text(s) => serializer.serialize_str(s),
            ResultValue::Sequence(items) => items.serialize(serializer),
            ResultValue::Custom(node) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("node", node.label())?;
                map.serialize_entry("children", &node.children())?;
                map.end()
            }
            ResultValue::Empty => serializer.serialize_unit(),
        }
    }
}
