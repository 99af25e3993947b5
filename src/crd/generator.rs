//! # SopsSecretGenerator
//!
//! The generator manifest placed in a kustomization's `generators:` list.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

/// Generator manifest describing one Secret to build
///
/// # Example
///
/// ```yaml
/// apiVersion: kustomize.freightdog.com/v1
/// kind: SopsSecretGenerator
/// metadata:
///   name: my-secret
///   annotations:
///     config.kubernetes.io/function: |
///       exec:
///         path: sops-secret-generator
/// envs:
///   - secret-vars.env
/// files:
///   - secret-file.txt
///   - tls.key=server.key
/// ```
///
/// Every field has a default so that validation, not deserialization,
/// reports missing identity fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SopsSecretGenerator {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    /// Identity and metadata of the Secret to generate
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Encrypted dotenv, YAML or JSON files whose entries become Secret keys
    #[serde(default)]
    pub envs: Vec<String>,
    /// Encrypted files stored whole, as `path` or `key=path`
    #[serde(default)]
    pub files: Vec<String>,
    /// Kustomize merge behavior (create, merge, replace); empty means unset
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub behavior: String,
    /// When true the generated Secret keeps its name without a hash suffix
    #[serde(default)]
    pub disable_name_suffix_hash: bool,
    /// Secret type, e.g. `kubernetes.io/tls`
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub secret_type: String,
}

impl SopsSecretGenerator {
    /// Name of the Secret to generate, empty when unset
    #[must_use]
    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }
}
