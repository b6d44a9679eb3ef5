//! Records reported back by the graph database

use serde::{Deserialize, Serialize};

/// One SHACL non-conformance yielded by the validation procedure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub focus_node: String,
    pub node_type: String,
    pub offending_value: String,
    pub result_path: String,
    pub message: String,
    pub severity: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.focus_node.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} ({})", self.message, self.focus_node)
        }
    }
}
