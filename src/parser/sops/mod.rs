//! # SOPS Decryption
//!
//! Decrypts encrypted sources by piping them through the sops binary.
//!
//! **SECURITY**: ciphertext is written to the sops process over stdin and
//! plaintext is read back from stdout. Neither is written to disk, and the
//! plaintext buffer is zeroed when dropped.

pub mod error;

use crate::constants::{DEFAULT_SOPS_BINARY, MAX_SOPS_STDERR_BYTES};
use crate::parser::sops::error::{
    classify_sops_error, SopsDecryptionError, SopsDecryptionFailureReason,
};
use crate::parser::types::Format;
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info_span, warn};
use zeroize::Zeroizing;

/// Decrypted file content, wiped on drop
pub type Plaintext = Zeroizing<Vec<u8>>;

/// Turns encrypted bytes into plaintext
///
/// `format` tells the engine how the ciphertext is laid out and in which
/// layout the plaintext should come back.
pub trait Decryptor {
    /// Decrypt `content`
    ///
    /// # Errors
    ///
    /// Returns a classified [`SopsDecryptionError`] when decryption fails.
    fn decrypt(&self, content: &[u8], format: Format) -> Result<Plaintext, SopsDecryptionError>;
}

impl<D: Decryptor + ?Sized> Decryptor for &D {
    fn decrypt(&self, content: &[u8], format: Format) -> Result<Plaintext, SopsDecryptionError> {
        (**self).decrypt(content, format)
    }
}

/// Error type for reading and decrypting a source file
#[derive(Debug, Error)]
pub enum DecryptFileError {
    #[error("could not read file: {0}")]
    Read(#[source] std::io::Error),
    #[error("sops could not decrypt: {0}")]
    Decrypt(#[source] SopsDecryptionError),
}

/// Read `path` and decrypt it, inferring the format from the path
#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn decrypt_file<D: Decryptor + ?Sized>(
    decryptor: &D,
    path: &str,
) -> Result<Plaintext, DecryptFileError> {
    let content = std::fs::read(path).map_err(DecryptFileError::Read)?;
    decryptor
        .decrypt(&content, Format::for_path(path))
        .map_err(DecryptFileError::Decrypt)
}

/// [`Decryptor`] backed by the sops command line tool
///
/// The program is resolved on `PATH` at decrypt time, so a generator
/// without sources never needs sops installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SopsBinary {
    program: String,
}

impl Default for SopsBinary {
    fn default() -> Self {
        Self::new(DEFAULT_SOPS_BINARY)
    }
}

impl SopsBinary {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, content: &[u8], format: Format) -> Result<Plaintext, SopsDecryptionError> {
        let sops_path = which::which(&self.program).map_err(|e| {
            SopsDecryptionError::new(
                SopsDecryptionFailureReason::ProviderUnavailable,
                format!("{} binary not found in PATH: {e}", self.program),
            )
        })?;

        debug!("Using sops binary at: {:?}", sops_path);

        let mut child = Command::new(&sops_path)
            .arg("--decrypt")
            .arg("--input-type")
            .arg(format.sops_type())
            .arg("--output-type")
            .arg(format.sops_type())
            .arg("/dev/stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                SopsDecryptionError::new(
                    SopsDecryptionFailureReason::ProviderUnavailable,
                    format!("Failed to spawn sops command: {e}"),
                )
            })?;

        // Dropping stdin closes the pipe so sops sees EOF
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(content) {
                // sops exited before reading everything; its stderr explains why
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
                Err(e) => {
                    return Err(SopsDecryptionError::new(
                        SopsDecryptionFailureReason::Unknown,
                        format!("Failed to write encrypted content to sops stdin: {e}"),
                    ))
                }
                Ok(()) => {}
            }
        }

        let output = child.wait_with_output().map_err(|e| {
            SopsDecryptionError::new(
                SopsDecryptionFailureReason::Unknown,
                format!("Failed to wait for sops command: {e}"),
            )
        })?;

        if output.status.success() {
            return Ok(Zeroizing::new(output.stdout));
        }

        // Drop any partial plaintext before reporting
        drop(Zeroizing::new(output.stdout));

        let stderr = String::from_utf8_lossy(&output.stderr);
        let exit_code = output.status.code();
        let reason = classify_sops_error(&stderr, exit_code);
        let stderr = stderr.trim();
        let safe_error = if stderr.len() > MAX_SOPS_STDERR_BYTES {
            format!("{}... (truncated)", truncate_utf8(stderr, MAX_SOPS_STDERR_BYTES))
        } else {
            stderr.to_string()
        };

        let exit = exit_code.map_or_else(|| "signal".to_string(), |code| code.to_string());
        Err(SopsDecryptionError::new(
            reason,
            format!("{safe_error} (exit code: {exit})"),
        ))
    }
}

impl Decryptor for SopsBinary {
    fn decrypt(&self, content: &[u8], format: Format) -> Result<Plaintext, SopsDecryptionError> {
        let span = info_span!(
            "sops.decrypt",
            file.size = content.len(),
            sops.format = %format
        );
        let _entered = span.enter();
        let start = Instant::now();

        let result = self.run(content, format);

        match &result {
            Ok(plaintext) => {
                debug!(
                    duration_ms = elapsed_ms(start),
                    plaintext.size = plaintext.len(),
                    "SOPS decryption succeeded"
                );
            }
            Err(e) => {
                warn!(
                    reason = e.reason.as_str(),
                    duration_ms = elapsed_ms(start),
                    "SOPS decryption failed: {}",
                    e
                );
                warn!("Remediation: {}", e.reason.remediation());
            }
        }

        result
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Longest prefix of `s` no longer than `max` bytes ending on a char boundary
fn truncate_utf8(s: &str, max: usize) -> &str {
    let mut end = max.min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
