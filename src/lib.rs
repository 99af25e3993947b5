//! # SOPS Secret Generator
//!
//! A kustomize generator that builds Kubernetes Secrets from sops-encrypted
//! files.
//!
//! A `SopsSecretGenerator` manifest names dotenv, YAML or JSON files whose
//! entries become Secret keys (`envs`) and arbitrary files stored whole under
//! one key (`files`). Every source is decrypted by the sops binary and the
//! plaintext is only ever held in memory.
//!
//! ## Modules
//!
//! - `crd`: manifest, Secret and `ResourceList` types
//! - `parser`: decryption and format-specific extraction
//! - `generator`: the manifest pipeline
//! - `kustomize`: Secret assembly and kustomize annotations
//! - `krm`: the KRM function host
//! - `config` / `observability`: process settings and logging

pub mod config;
pub mod constants;
pub mod crd;
pub mod generator;
pub mod krm;
pub mod kustomize;
pub mod observability;
pub mod parser;

pub use crd::{ResourceList, Secret, SopsSecretGenerator};
pub use generator::{Generator, GeneratorError};
pub use parser::{Decryptor, SopsBinary};
