//! # Constants
//!
//! Shared constants used throughout the generator.
//!
//! Resource identities, annotation keys and defaults. Values that operators
//! may want to change are also exposed through [`crate::config`].

/// `apiVersion` every generator manifest must carry
pub const GENERATOR_API_VERSION: &str = "kustomize.freightdog.com/v1";

/// `kind` every generator manifest must carry
pub const GENERATOR_KIND: &str = "SopsSecretGenerator";

/// `apiVersion` of generated Secrets
pub const SECRET_API_VERSION: &str = "v1";

/// `kind` of generated Secrets
pub const SECRET_KIND: &str = "Secret";

/// `apiVersion` of the KRM function envelope
pub const RESOURCE_LIST_API_VERSION: &str = "config.kubernetes.io/v1";

/// `kind` of the KRM function envelope
pub const RESOURCE_LIST_KIND: &str = "ResourceList";

/// Annotation asking kustomize to append a content hash to the Secret name
pub const NEEDS_HASH_ANNOTATION: &str = "kustomize.config.k8s.io/needs-hash";

/// Annotation carrying the create/merge/replace behavior for kustomize
pub const BEHAVIOR_ANNOTATION: &str = "kustomize.config.k8s.io/behavior";

/// Annotations belonging to the kustomize function protocol.
/// They describe the generator manifest itself and must never be copied
/// onto the generated Secret.
pub const STRIPPED_ANNOTATIONS: &[&str] = &[
    "config.kubernetes.io/local-config",
    "config.kubernetes.io/function",
];

/// UTF-8 byte order mark, stripped from the first line of dotenv content
pub const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Default program used to decrypt sources
pub const DEFAULT_SOPS_BINARY: &str = "sops";

/// Default tracing filter when neither the CLI nor the environment sets one
pub const DEFAULT_LOG_FILTER: &str = "sops_secret_generator=warn";

/// Maximum number of sops stderr bytes kept in an error message
pub const MAX_SOPS_STDERR_BYTES: usize = 500;

/// Usage text printed when the binary is started without piped input
pub const USAGE: &str = "
SopsSecretGenerator is a Kustomize generator plugin that generates Secrets from sops-encrypted files.

Note:
  The usage examples here are for standalone execution. If the plugin is used via Kustomize,
  then Kustomize will handle passing data to the plugin.

Usage:
  cat ResourceList.yaml | sops-secret-generator
  sops-secret-generator generator.yaml
";
