//! Result tree printing
//!
//! [`ResultValue`]'s `Display` form is compact and fits on one line.
//! [`TreePrinter`] lays the same tree out with one value per line, which is
//! easier to read for large results.

use super::result::ResultValue;
use std::fmt::Write;

/// Prints a [`ResultValue`] with one value per line
///
/// Sequences open with `(` and close with `)` on lines of their own, custom
/// nodes print their label above their children. Values nested deeper than
/// [`max_depth`](TreePrinter::max_depth) collapse to `...`.
pub struct TreePrinter {
    step: String,
    depth_limit: Option<usize>,
}

impl TreePrinter {
    /// Two spaces per level, no depth limit
    pub fn new() -> Self {
        Self {
            step: "  ".to_string(),
            depth_limit: None,
        }
    }

    /// Use `step` once per nesting level
    pub fn indent(self, step: &str) -> Self {
        Self {
            step: step.to_string(),
            ..self
        }
    }

    /// Collapse values below `depth` to `...`
    pub fn max_depth(self, depth: usize) -> Self {
        Self {
            depth_limit: Some(depth),
            ..self
        }
    }

    /// Render `value` and everything below it
    pub fn print(&self, value: &ResultValue) -> String {
        let mut output = String::new();
        // Writing to a String cannot fail
        let _ = self.print_value(value, 0, &mut output);
        output
    }

    fn print_value(
        &self,
        value: &ResultValue,
        depth: usize,
        output: &mut String,
    ) -> std::fmt::Result {
        let indent = self.step.repeat(depth);
        if let Some(max) = self.depth_limit {
            if depth > max {
                return writeln!(output, "{}...", indent);
            }
        }

        match value {
            ResultValue::Integer(n) => writeln!(output, "{}{}", indent, n),
            ResultValue::Text(s) => writeln!(output, "{}{:?}", indent, s),
            ResultValue::Empty => writeln!(output, "{}empty", indent),
            ResultValue::Sequence(items) => {
                writeln!(output, "{}(", indent)?;
                for item in items {
                    self.print_value(item, depth + 1, output)?;
                }
                writeln!(output, "{})", indent)
            }
            ResultValue::Custom(node) => {
                writeln!(output, "{}{}", indent, node.label())?;
                for child in node.children() {
                    self.print_value(child, depth + 1, output)?;
                }
                Ok(())
            }
        }
    }
}

impl Default for TreePrinter {
    fn default() -> Self {
        Self::new()
    }
}
