//! Configuration values
//!
//! Debug names and tracing are passed at construction time instead of being
//! toggled on a node after the fact. Limits for top-level runs live in
//! [`RunConfig`].

use serde::{Deserialize, Serialize};

/// Default maximum input size: 100 MB
pub const DEFAULT_MAX_INPUT_SIZE: usize = 100 * 1024 * 1024;

/// Per-node debug configuration
///
/// # Example
///
/// ```rust
/// use rewind::engine::config::NodeConfig;
/// use rewind::engine::deferred::Deferred;
///
/// let expr = Deferred::with_config(NodeConfig::named("expr").with_trace(true));
/// assert_eq!(expr.name(), "expr");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Name used in log events and misuse reports
    pub name: Option<String>,

    /// Log every attempt and unparse through this node
    pub trace: bool,
}

impl NodeConfig {
    /// Create an anonymous, untraced config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config with a debug name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            trace: false,
        }
    }

    /// Enable or disable tracing
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// The debug name, or `<anonymous>`
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}

/// Configuration for a top-level run
///
/// Deserializes from partial JSON; missing fields keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Maximum allowed input size in bytes
    pub max_input_size: usize,

    /// Refuse to start when undo logs still hold entries from an earlier,
    /// never unwound attempt
    pub check_settled: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            check_settled: true,
        }
    }
}

impl RunConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum input size
    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }

    /// Enable or disable the settled check
    pub fn with_check_settled(mut self, check: bool) -> Self {
        self.check_settled = check;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_config_names() {
        assert_eq!(NodeConfig::new().display_name(), "<anonymous>");
        let config = NodeConfig::named("factor").with_trace(true);
        assert_eq!(config.display_name(), "factor");
        assert!(config.trace);
    }

    #[test]
    fn test_run_config_builders() {
        let config = RunConfig::new()
            .with_max_input_size(16)
            .with_check_settled(false);
        assert_eq!(config.max_input_size, 16);
        assert!(!config.check_settled);
        assert!(RunConfig::default().check_settled);
    }

    #[test]
    fn test_run_config_from_partial_json() {
        let config: RunConfig = serde_json::from_str(r#"{"max_input_size": 1024}"#).unwrap();
        assert_eq!(config.max_input_size, 1024);
        assert!(config.check_settled);

        let node: NodeConfig = serde_json::from_str(r#"{"name": "expr"}"#).unwrap();
        assert_eq!(node, NodeConfig::named("expr"));
    }
}
