//! # Types
//!
//! File format classification shared by decryption and extraction.

use std::fmt;

/// File format of an encrypted source, inferred from its path
///
/// Mirrors the suffix convention sops itself uses, so the format handed
/// to sops always matches the one it would pick on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Dotenv,
    Yaml,
    Json,
    /// Understood by sops but not extractable into Secret keys
    Ini,
    /// Anything else; sops stores the whole payload under a single value
    Binary,
}

impl Format {
    /// Infer the format from a file path
    #[must_use]
    pub fn for_path(path: &str) -> Self {
        if path.ends_with(".yaml") || path.ends_with(".yml") {
            Format::Yaml
        } else if path.ends_with(".json") {
            Format::Json
        } else if path.ends_with(".env") {
            Format::Dotenv
        } else if path.ends_with(".ini") {
            Format::Ini
        } else {
            Format::Binary
        }
    }

    /// Value for sops' `--input-type` / `--output-type`
    #[must_use]
    pub fn sops_type(self) -> &'static str {
        match self {
            Format::Dotenv => "dotenv",
            Format::Yaml => "yaml",
            Format::Json => "json",
            Format::Ini => "ini",
            Format::Binary => "binary",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sops_type())
    }
}
