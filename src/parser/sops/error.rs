//! # SOPS Decryption Errors
//!
//! Classifies sops failures so the log can point at a likely fix.

use thiserror::Error;

/// Why a sops decryption failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SopsDecryptionFailureReason {
    /// No key able to decrypt the data key was available
    KeyNotFound,
    /// The file was modified after encryption
    MacMismatch,
    /// The encrypted document could not be parsed
    CorruptedFile,
    /// The file carries no sops metadata
    NotEncrypted,
    /// The sops binary is missing or could not be started
    ProviderUnavailable,
    Unknown,
}

impl SopsDecryptionFailureReason {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SopsDecryptionFailureReason::KeyNotFound => "key_not_found",
            SopsDecryptionFailureReason::MacMismatch => "mac_mismatch",
            SopsDecryptionFailureReason::CorruptedFile => "corrupted_file",
            SopsDecryptionFailureReason::NotEncrypted => "not_encrypted",
            SopsDecryptionFailureReason::ProviderUnavailable => "provider_unavailable",
            SopsDecryptionFailureReason::Unknown => "unknown",
        }
    }

    /// Remediation hint for operators
    #[must_use]
    pub fn remediation(&self) -> &'static str {
        match self {
            SopsDecryptionFailureReason::KeyNotFound => {
                "Make the decryption key available to sops (SOPS_AGE_KEY_FILE, a GPG keyring or cloud KMS credentials) and check it matches a recipient in the file's sops metadata"
            }
            SopsDecryptionFailureReason::MacMismatch => {
                "The file was edited without sops; re-encrypt it with `sops --encrypt` or edit it with `sops <file>`"
            }
            SopsDecryptionFailureReason::CorruptedFile => {
                "Check the file is valid for its extension (.env, .yaml, .json) and was produced by sops"
            }
            SopsDecryptionFailureReason::NotEncrypted => {
                "Encrypt the file with `sops --encrypt --in-place <file>`"
            }
            SopsDecryptionFailureReason::ProviderUnavailable => {
                "Install sops (https://github.com/getsops/sops) or point SOPS_SECRET_GENERATOR_SOPS_BINARY at it"
            }
            SopsDecryptionFailureReason::Unknown => "Run `sops --decrypt <file>` manually for details",
        }
    }
}

/// A failed sops decryption
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SopsDecryptionError {
    pub reason: SopsDecryptionFailureReason,
    pub message: String,
}

impl SopsDecryptionError {
    #[must_use]
    pub fn new(reason: SopsDecryptionFailureReason, message: String) -> Self {
        Self { reason, message }
    }
}

/// Classify a sops failure from its stderr and exit code
#[must_use]
pub fn classify_sops_error(stderr: &str, exit_code: Option<i32>) -> SopsDecryptionFailureReason {
    match exit_code {
        Some(128) => return SopsDecryptionFailureReason::KeyNotFound,
        Some(51 | 52) => return SopsDecryptionFailureReason::MacMismatch,
        Some(4 | 24 | 25) => return SopsDecryptionFailureReason::CorruptedFile,
        _ => {}
    }

    let stderr = stderr.to_lowercase();
    if stderr.contains("failed to get the data key")
        || stderr.contains("could not retrieve")
        || stderr.contains("no decryption key")
        || stderr.contains("key not found")
    {
        SopsDecryptionFailureReason::KeyNotFound
    } else if stderr.contains("mac mismatch") {
        SopsDecryptionFailureReason::MacMismatch
    } else if stderr.contains("metadata not found") {
        SopsDecryptionFailureReason::NotEncrypted
    } else if stderr.contains("unmarshal") || stderr.contains("error parsing") {
        SopsDecryptionFailureReason::CorruptedFile
    } else {
        SopsDecryptionFailureReason::Unknown
    }
}
