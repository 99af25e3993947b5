//! # Generator Errors
//!
//! Every error carries its cause in its message and as `source()`, so the
//! top-level text reads outermost context first, e.g.
//! `env source "vars.env": line 3: requires value: FOO`.

use crate::generator::source::LocatorError;
use crate::parser::{DecryptFileError, ParseError};
use thiserror::Error;

/// Failure of a single env or file source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Locator(#[from] LocatorError),
    #[error(transparent)]
    Decrypt(#[from] DecryptFileError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("input must be apiVersion kustomize.freightdog.com/v1, kind SopsSecretGenerator")]
    InvalidType,
    #[error("input must contain metadata.name value")]
    MissingName,
    #[error("could not parse generator manifest: {0}")]
    Manifest(#[source] serde_yaml::Error),
    #[error("env source \"{descriptor}\": {cause}")]
    EnvSource {
        descriptor: String,
        #[source]
        cause: SourceError,
    },
    #[error("file source \"{descriptor}\": {cause}")]
    FileSource {
        descriptor: String,
        #[source]
        cause: SourceError,
    },
    #[error("could not serialize Secret: {0}")]
    Serialize(#[source] serde_yaml::Error),
    #[error("input must be apiVersion config.kubernetes.io/v1, kind ResourceList, got kind \"{0}\"")]
    InvalidResourceList(String),
}

/// Render an error and its `source()` chain on one line
///
/// Causes already spelled out at the end of the message so far are
/// skipped, so wrappers that inline their cause are not repeated.
#[must_use]
pub fn chain_message(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
