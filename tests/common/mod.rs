//! Common test utilities
//!
//! Fake decryptors so the pipeline can be exercised without a sops binary,
//! and helpers for writing source fixtures into a temporary directory.

#![allow(dead_code, reason = "Not every test binary uses every helper")]

use sops_secret_generator::parser::{
    Format, Plaintext, SopsDecryptionError, SopsDecryptionFailureReason,
};
use sops_secret_generator::Decryptor;
use std::cell::RefCell;
use tempfile::TempDir;
use zeroize::Zeroizing;

/// Treats every file as already decrypted and records the formats it saw
#[derive(Debug, Default)]
pub struct IdentityDecryptor {
    pub formats: RefCell<Vec<Format>>,
}

impl Decryptor for IdentityDecryptor {
    fn decrypt(&self, content: &[u8], format: Format) -> Result<Plaintext, SopsDecryptionError> {
        self.formats.borrow_mut().push(format);
        Ok(Zeroizing::new(content.to_vec()))
    }
}

/// Fails every decryption like sops without a usable key
#[derive(Debug)]
pub struct FailingDecryptor;

impl Decryptor for FailingDecryptor {
    fn decrypt(&self, _content: &[u8], _format: Format) -> Result<Plaintext, SopsDecryptionError> {
        Err(SopsDecryptionError::new(
            SopsDecryptionFailureReason::KeyNotFound,
            "Failed to get the data key required to decrypt the SOPS file. (exit code: 128)"
                .to_string(),
        ))
    }
}

/// Write `content` to `name` under `dir` and return the full path
pub fn write_source(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

/// Generator manifest YAML with the given name, envs and files
pub fn manifest(name: &str, envs: &[&str], files: &[&str]) -> String {
    serde_yaml::to_string(&serde_json::json!({
        "apiVersion": "kustomize.freightdog.com/v1",
        "kind": "SopsSecretGenerator",
        "metadata": { "name": name },
        "envs": envs,
        "files": files,
    }))
    .unwrap()
}

/// Decode a base64 Secret value
pub fn decode(value: &str) -> String {
    use base64::{engine::general_purpose, Engine as _};
    String::from_utf8(general_purpose::STANDARD.decode(value).unwrap()).unwrap()
}
