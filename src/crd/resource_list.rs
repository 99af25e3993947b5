//! # ResourceList
//!
//! The KRM function envelope exchanged with kustomize over stdin/stdout.

use crate::constants::{RESOURCE_LIST_API_VERSION, RESOURCE_LIST_KIND};
use serde::{Deserialize, Serialize};

/// `config.kubernetes.io/v1` `ResourceList`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceList {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub items: Vec<serde_yaml::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_config: Option<serde_yaml::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<FunctionResult>,
}

impl Default for ResourceList {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ResourceList {
    /// Create a `ResourceList` carrying `items`
    #[must_use]
    pub fn new(items: Vec<serde_yaml::Value>) -> Self {
        Self {
            api_version: RESOURCE_LIST_API_VERSION.to_string(),
            kind: RESOURCE_LIST_KIND.to_string(),
            items,
            function_config: None,
            results: Vec::new(),
        }
    }

    /// Append an `error` result
    pub fn log_error(&mut self, message: impl Into<String>) {
        self.results.push(FunctionResult {
            message: message.into(),
            severity: Severity::Error,
        });
    }

    /// True when any result has `error` severity
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|r| r.severity == Severity::Error)
    }
}

/// A single entry of `ResourceList.results`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FunctionResult {
    pub message: String,
    pub severity: Severity,
}

/// Result severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_results_are_not_serialized() {
        let list = ResourceList::default();
        let yaml = serde_yaml::to_string(&list).unwrap();
        assert!(yaml.contains("apiVersion: config.kubernetes.io/v1"));
        assert!(yaml.contains("kind: ResourceList"));
        assert!(!yaml.contains("results"));
        assert!(!yaml.contains("functionConfig"));
    }

    #[test]
    fn test_log_error_adds_error_result() {
        let mut list = ResourceList::default();
        assert!(!list.has_errors());

        list.log_error("boom");

        assert!(list.has_errors());
        let yaml = serde_yaml::to_string(&list).unwrap();
        assert!(yaml.contains("severity: error"));
        assert!(yaml.contains("message: boom"));
    }

    #[test]
    fn test_deserialize_with_function_config() {
        let input = r"
apiVersion: config.kubernetes.io/v1
kind: ResourceList
functionConfig:
  kind: SopsSecretGenerator
";
        let list: ResourceList = serde_yaml::from_str(input).unwrap();
        assert!(list.items.is_empty());
        assert!(list.function_config.is_some());
    }
}
