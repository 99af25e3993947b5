//! # Kustomize Secret Assembly
//!
//! Builds the generated Secret and the kustomize annotations that control
//! how kustomize names and merges it.

use crate::constants::{BEHAVIOR_ANNOTATION, NEEDS_HASH_ANNOTATION};
use crate::crd::{Secret, SecretData, SopsSecretGenerator};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// Build the Secret for `generator` from already-encoded `data`
///
/// Annotations listed in `stripped_annotations` are dropped. Unless
/// `disableNameSuffixHash` is set, the needs-hash annotation is added; a
/// non-empty `behavior` is passed on as the behavior annotation.
#[must_use]
pub fn build_secret(
    generator: &SopsSecretGenerator,
    data: SecretData,
    stripped_annotations: &[&str],
) -> Secret {
    let metadata = ObjectMeta {
        name: generator.metadata.name.clone(),
        namespace: generator
            .metadata
            .namespace
            .clone()
            .filter(|ns| !ns.is_empty()),
        labels: generator
            .metadata
            .labels
            .clone()
            .filter(|labels| !labels.is_empty()),
        annotations: Some(secret_annotations(generator, stripped_annotations))
            .filter(|annotations| !annotations.is_empty()),
        ..ObjectMeta::default()
    };

    Secret::new(metadata, data, generator.secret_type.clone())
}

fn secret_annotations(
    generator: &SopsSecretGenerator,
    stripped_annotations: &[&str],
) -> BTreeMap<String, String> {
    let mut annotations: BTreeMap<String, String> = generator
        .metadata
        .annotations
        .iter()
        .flatten()
        .filter(|(key, _)| !stripped_annotations.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    if !generator.disable_name_suffix_hash {
        annotations.insert(NEEDS_HASH_ANNOTATION.to_string(), "true".to_string());
    }
    if !generator.behavior.is_empty() {
        annotations.insert(BEHAVIOR_ANNOTATION.to_string(), generator.behavior.clone());
    }

    annotations
}
