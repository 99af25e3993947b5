//! # Generator
//!
//! Turns a `SopsSecretGenerator` manifest into a Secret.
//!
//! ## Flow
//!
//! 1. **Validate**: apiVersion, kind and `metadata.name` are checked before any
//!    source is touched
//! 2. **Env sources**: each `envs` entry is decrypted and parsed into keys
//! 3. **File sources**: each `files` entry is decrypted and stored whole
//! 4. **Assemble**: the Secret is built with the kustomize annotations
//!
//! Sources are processed in declaration order. A later source overwrites a key
//! set by an earlier one, and the first failing source aborts the document.

pub mod error;
pub mod source;

pub use error::{chain_message, GeneratorError, SourceError};
pub use source::{parse_file_source, FileSource, LocatorError};

use crate::constants::{GENERATOR_API_VERSION, GENERATOR_KIND, STRIPPED_ANNOTATIONS};
use crate::crd::{Secret, SecretData, SopsSecretGenerator};
use crate::kustomize::build_secret;
use crate::parser::parsers::insert_encoded;
use crate::parser::{decrypt_file, extract, Decryptor, Format};
use tracing::{debug, info};

/// Runs the manifest pipeline with an injected [`Decryptor`]
#[derive(Debug, Clone)]
pub struct Generator<D: Decryptor> {
    decryptor: D,
}

impl<D: Decryptor> Generator<D> {
    #[must_use]
    pub fn new(decryptor: D) -> Self {
        Self { decryptor }
    }

    #[must_use]
    pub fn decryptor(&self) -> &D {
        &self.decryptor
    }

    /// Generate a Secret from manifest YAML and serialize it back to YAML
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest is invalid, a source fails or the
    /// Secret cannot be serialized.
    pub fn process_manifest(&self, manifest: &str) -> Result<String, GeneratorError> {
        let request = read_input(manifest)?;
        let secret = self.generate_secret(&request)?;
        serde_yaml::to_string(&secret).map_err(GeneratorError::Serialize)
    }

    /// Generate a Secret from a single `ResourceList` item
    ///
    /// # Errors
    ///
    /// Same as [`Generator::process_manifest`].
    pub fn generate_item(
        &self,
        item: &serde_yaml::Value,
    ) -> Result<serde_yaml::Value, GeneratorError> {
        let request = read_value(item)?;
        let secret = self.generate_secret(&request)?;
        serde_yaml::to_value(&secret).map_err(GeneratorError::Serialize)
    }

    /// Generate a Secret from an already validated request
    ///
    /// # Errors
    ///
    /// Returns the first failing env or file source.
    pub fn generate_secret(&self, request: &SopsSecretGenerator) -> Result<Secret, GeneratorError> {
        let data = self.parse_sources(request)?;
        info!(
            secret.name = request.name(),
            secret.keys = data.len(),
            "generated Secret"
        );
        Ok(build_secret(request, data, STRIPPED_ANNOTATIONS))
    }

    fn parse_sources(&self, request: &SopsSecretGenerator) -> Result<SecretData, GeneratorError> {
        let mut data = SecretData::new();

        for env in &request.envs {
            self.read_env_source(env, &mut data)
                .map_err(|cause| GeneratorError::EnvSource {
                    descriptor: env.clone(),
                    cause,
                })?;
        }

        for file in &request.files {
            self.read_file_source(file, &mut data)
                .map_err(|cause| GeneratorError::FileSource {
                    descriptor: file.clone(),
                    cause,
                })?;
        }

        Ok(data)
    }

    fn read_env_source(&self, path: &str, data: &mut SecretData) -> Result<(), SourceError> {
        let format = Format::for_path(path);
        debug!(source = path, format = %format, "reading env source");

        let plaintext = decrypt_file(&self.decryptor, path)?;
        extract(&plaintext, format, data)?;
        Ok(())
    }

    fn read_file_source(&self, descriptor: &str, data: &mut SecretData) -> Result<(), SourceError> {
        let FileSource { key, path } = parse_file_source(descriptor)?;
        debug!(source = %path, key = %key, "reading file source");

        let plaintext = decrypt_file(&self.decryptor, &path)?;
        insert_encoded(data, key, &plaintext);
        Ok(())
    }
}

/// Parse and validate a generator manifest from YAML text
///
/// # Errors
///
/// Returns [`GeneratorError::Manifest`] for malformed YAML, otherwise the
/// validation errors of [`validate`].
pub fn read_input(manifest: &str) -> Result<SopsSecretGenerator, GeneratorError> {
    let request: SopsSecretGenerator =
        serde_yaml::from_str(manifest).map_err(GeneratorError::Manifest)?;
    validate(request)
}

/// Parse and validate a generator manifest from an already decoded document
///
/// # Errors
///
/// Same as [`read_input`].
pub fn read_value(item: &serde_yaml::Value) -> Result<SopsSecretGenerator, GeneratorError> {
    let request: SopsSecretGenerator =
        serde_yaml::from_value(item.clone()).map_err(GeneratorError::Manifest)?;
    validate(request)
}

/// Check the resource identity and name of a generator manifest
///
/// # Errors
///
/// Returns [`GeneratorError::InvalidType`] or [`GeneratorError::MissingName`].
pub fn validate(request: SopsSecretGenerator) -> Result<SopsSecretGenerator, GeneratorError> {
    if request.api_version != GENERATOR_API_VERSION || request.kind != GENERATOR_KIND {
        return Err(GeneratorError::InvalidType);
    }
    if request.name().is_empty() {
        return Err(GeneratorError::MissingName);
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Plaintext, SopsDecryptionError, SopsDecryptionFailureReason};
    use std::cell::Cell;
    use std::io::Write as _;
    use tempfile::TempDir;
    use zeroize::Zeroizing;

    /// Returns the file content unchanged and counts calls
    #[derive(Default)]
    struct CountingDecryptor {
        calls: Cell<usize>,
    }

    impl Decryptor for CountingDecryptor {
        fn decrypt(
            &self,
            content: &[u8],
            _format: Format,
        ) -> Result<Plaintext, SopsDecryptionError> {
            self.calls.set(self.calls.get() + 1);
            Ok(Zeroizing::new(content.to_vec()))
        }
    }

    struct FailingDecryptor;

    impl Decryptor for FailingDecryptor {
        fn decrypt(
            &self,
            _content: &[u8],
            _format: Format,
        ) -> Result<Plaintext, SopsDecryptionError> {
            Err(SopsDecryptionError::new(
                SopsDecryptionFailureReason::KeyNotFound,
                "no matching key".to_string(),
            ))
        }
    }

    fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> String {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn manifest(envs: &[String], files: &[String]) -> String {
        serde_yaml::to_string(&serde_json::json!({
            "apiVersion": GENERATOR_API_VERSION,
            "kind": GENERATOR_KIND,
            "metadata": { "name": "my-secret" },
            "envs": envs,
            "files": files,
        }))
        .unwrap()
    }

    mod validation_tests {
        use super::*;

        #[test]
        fn test_wrong_api_version_is_rejected() {
            let err = read_input(
                "apiVersion: v1\nkind: SopsSecretGenerator\nmetadata:\n  name: x\n",
            )
            .unwrap_err();
            assert!(matches!(err, GeneratorError::InvalidType));
        }

        #[test]
        fn test_wrong_kind_is_rejected() {
            let err = read_input(
                "apiVersion: kustomize.freightdog.com/v1\nkind: Secret\nmetadata:\n  name: x\n",
            )
            .unwrap_err();
            assert!(matches!(err, GeneratorError::InvalidType));
        }

        #[test]
        fn test_missing_name_is_rejected() {
            let err = read_input(
                "apiVersion: kustomize.freightdog.com/v1\nkind: SopsSecretGenerator\n",
            )
            .unwrap_err();
            assert!(matches!(err, GeneratorError::MissingName));
            assert_eq!(err.to_string(), "input must contain metadata.name value");
        }

        #[test]
        fn test_malformed_manifest() {
            let err = read_input("envs: [unclosed\n").unwrap_err();
            assert!(matches!(err, GeneratorError::Manifest(_)));
        }

        #[test]
        fn test_invalid_manifest_never_decrypts() {
            let decryptor = CountingDecryptor::default();
            let generator = Generator::new(&decryptor);

            let err = generator
                .process_manifest(
                    "apiVersion: v1\nkind: SopsSecretGenerator\nmetadata:\n  name: x\nenvs: [a.env]\n",
                )
                .unwrap_err();

            assert!(matches!(err, GeneratorError::InvalidType));
            assert_eq!(decryptor.calls.get(), 0);
        }
    }

    mod source_tests {
        use super::*;

        #[test]
        fn test_no_sources_yields_empty_data() {
            let generator = Generator::new(CountingDecryptor::default());
            let request = read_input(&manifest(&[], &[])).unwrap();

            let secret = generator.generate_secret(&request).unwrap();

            assert!(secret.data.is_empty());
            assert_eq!(generator.decryptor().calls.get(), 0);
        }

        #[test]
        fn test_env_and_file_sources() {
            let dir = TempDir::new().unwrap();
            let env = write_file(&dir, "a.env", b"FOO=secret\n");
            let file = write_file(&dir, "plain.txt", b"secret\n");
            let generator = Generator::new(CountingDecryptor::default());
            let request = read_input(&manifest(
                &[env],
                &[format!("secret-file.txt={file}")],
            ))
            .unwrap();

            let secret = generator.generate_secret(&request).unwrap();

            assert_eq!(secret.data["FOO"], "c2VjcmV0");
            assert_eq!(secret.data["secret-file.txt"], "c2VjcmV0Cg==");
            assert_eq!(generator.decryptor().calls.get(), 2);
        }

        #[test]
        fn test_file_source_overwrites_env_key() {
            let dir = TempDir::new().unwrap();
            let env = write_file(&dir, "a.env", b"KEY=from-env\n");
            let file = write_file(&dir, "key.txt", b"from-file");
            let generator = Generator::new(CountingDecryptor::default());
            let request = read_input(&manifest(&[env], &[format!("KEY={file}")])).unwrap();

            let secret = generator.generate_secret(&request).unwrap();

            assert_eq!(secret.data.len(), 1);
            assert_eq!(secret.data["KEY"], "ZnJvbS1maWxl");
        }

        #[test]
        fn test_env_error_names_the_source() {
            let dir = TempDir::new().unwrap();
            let env = write_file(&dir, "a.env", b"OK=1\nBROKEN\n");
            let generator = Generator::new(CountingDecryptor::default());
            let request = read_input(&manifest(&[env.clone()], &[])).unwrap();

            let err = generator.generate_secret(&request).unwrap_err();

            assert_eq!(
                err.to_string(),
                format!("env source \"{env}\": line 1: requires value: BROKEN")
            );
        }

        #[test]
        fn test_env_source_with_unknown_format_fails() {
            let dir = TempDir::new().unwrap();
            let env = write_file(&dir, "a.txt", b"FOO=bar\n");
            let generator = Generator::new(CountingDecryptor::default());
            let request = read_input(&manifest(&[env], &[])).unwrap();

            let err = generator.generate_secret(&request).unwrap_err();

            assert!(matches!(
                err,
                GeneratorError::EnvSource {
                    cause: SourceError::Parse(_),
                    ..
                }
            ));
        }

        #[test]
        fn test_file_locator_error_skips_decryption() {
            let generator = Generator::new(CountingDecryptor::default());
            let request = read_input(&manifest(&[], &["a=b=c".to_string()])).unwrap();

            let err = generator.generate_secret(&request).unwrap_err();

            assert_eq!(
                err.to_string(),
                "file source \"a=b=c\": key names or file paths cannot contain '='"
            );
            assert_eq!(generator.decryptor().calls.get(), 0);
        }

        #[test]
        fn test_missing_file_is_read_error() {
            let dir = TempDir::new().unwrap();
            let missing = dir.path().join("missing.env").to_string_lossy().into_owned();
            let generator = Generator::new(CountingDecryptor::default());
            let request = read_input(&manifest(&[missing], &[])).unwrap();

            let err = generator.generate_secret(&request).unwrap_err();

            assert!(err.to_string().contains("could not read file"));
        }

        #[test]
        fn test_decryption_failure_is_wrapped() {
            let dir = TempDir::new().unwrap();
            let file = write_file(&dir, "tls.key", b"ENC[...]");
            let generator = Generator::new(FailingDecryptor);
            let request = read_input(&manifest(&[], &[file.clone()])).unwrap();

            let err = generator.generate_secret(&request).unwrap_err();

            assert_eq!(
                err.to_string(),
                format!("file source \"{file}\": sops could not decrypt: no matching key")
            );
        }
    }

    mod output_tests {
        use super::*;

        #[test]
        fn test_process_manifest_emits_secret_yaml() {
            let generator = Generator::new(CountingDecryptor::default());

            let yaml = generator.process_manifest(&manifest(&[], &[])).unwrap();
            let secret: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

            assert_eq!(secret["apiVersion"], "v1");
            assert_eq!(secret["kind"], "Secret");
            assert_eq!(secret["metadata"]["name"], "my-secret");
            assert_eq!(
                secret["metadata"]["annotations"]["kustomize.config.k8s.io/needs-hash"],
                "true"
            );
        }

        #[test]
        fn test_generate_item_returns_value() {
            let generator = Generator::new(CountingDecryptor::default());
            let item: serde_yaml::Value = serde_yaml::from_str(&manifest(&[], &[])).unwrap();

            let secret = generator.generate_item(&item).unwrap();

            assert_eq!(secret["kind"], "Secret");
        }
    }
}
