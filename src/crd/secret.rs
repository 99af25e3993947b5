//! # Secret
//!
//! The Kubernetes Secret emitted for each generator manifest.

use crate::constants::{SECRET_API_VERSION, SECRET_KIND};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Secret keys mapped to base64-encoded values
pub type SecretData = BTreeMap<String, String>;

/// Generated Kubernetes Secret
///
/// `data` already holds base64 text, so this type is used instead of
/// `k8s_openapi::api::core::v1::Secret`, whose `ByteString` values would
/// be encoded a second time.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub data: SecretData,
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub secret_type: String,
}

impl Secret {
    /// Create a `v1/Secret` with the given metadata and data
    #[must_use]
    pub fn new(metadata: ObjectMeta, data: SecretData, secret_type: String) -> Self {
        Self {
            api_version: SECRET_API_VERSION.to_string(),
            kind: SECRET_KIND.to_string(),
            metadata,
            data,
            secret_type,
        }
    }
}
