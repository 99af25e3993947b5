//! # Parsers
//!
//! Turn decrypted env sources (dotenv, yaml, json) into Secret entries.
//!
//! Every value is base64-encoded on insertion. Entries are merged into a
//! shared [`SecretData`] so that later sources overwrite earlier ones.

use crate::constants::UTF8_BOM;
use crate::crd::SecretData;
use crate::parser::types::Format;
use base64::{engine::general_purpose, Engine as _};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Error type for extracting entries from decrypted content
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: invalid UTF-8 bytes: {content}")]
    InvalidUtf8 { line: usize, content: String },
    #[error("line {line}: requires value: {content}")]
    MissingValue { line: usize, content: String },
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("unknown file format, use dotenv, yaml or json")]
    UnknownFormat,
}

/// Extract entries from decrypted content according to its format
#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn extract(content: &[u8], format: Format, data: &mut SecretData) -> Result<(), ParseError> {
    match format {
        Format::Dotenv => parse_dotenv_content(content, data),
        Format::Yaml => parse_yaml_content(content, data),
        Format::Json => parse_json_content(content, data),
        Format::Ini | Format::Binary => Err(ParseError::UnknownFormat),
    }
}

/// Store `value` base64-encoded under `key`, replacing any earlier value
pub(crate) fn insert_encoded(data: &mut SecretData, key: String, value: &[u8]) {
    let encoded = general_purpose::STANDARD.encode(value);
    if data.insert(key.clone(), encoded).is_some() {
        debug!(key = %key, "Overwriting value from an earlier source");
    }
}

/// Parse dotenv content line by line
///
/// Lines are 0-indexed in error messages. Values are taken verbatim after
/// the first `=`; no quoting or trimming is applied.
pub(crate) fn parse_dotenv_content(content: &[u8], data: &mut SecretData) -> Result<(), ParseError> {
    for (line_num, line) in scan_lines(content).enumerate() {
        let line = if line_num == 0 {
            line.strip_prefix(UTF8_BOM).unwrap_or(line)
        } else {
            line
        };
        parse_dotenv_line(line, line_num, data)?;
    }
    Ok(())
}

/// Split on `\n`, dropping one trailing `\r` per line and the empty
/// remainder after a final newline
fn scan_lines(content: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = content.strip_suffix(b"\n").unwrap_or(content);
    let count = if content.is_empty() { 0 } else { usize::MAX };
    body.split(|&b| b == b'\n')
        .take(count)
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

fn parse_dotenv_line(raw: &[u8], line: usize, data: &mut SecretData) -> Result<(), ParseError> {
    let Ok(text) = std::str::from_utf8(raw) else {
        return Err(ParseError::InvalidUtf8 {
            line,
            content: String::from_utf8_lossy(raw).into_owned(),
        });
    };

    let text = text.trim_start();

    // Skip comments and empty lines
    if text.is_empty() || text.starts_with('#') {
        return Ok(());
    }

    let Some((key, value)) = text.split_once('=') else {
        return Err(ParseError::MissingValue {
            line,
            content: text.to_string(),
        });
    };

    insert_encoded(data, key.to_string(), value.as_bytes());
    Ok(())
}

/// Parse a flat YAML mapping of strings
///
/// Scalars keep their source text (`1.10`, `0x1F` and `True` are stored as
/// written); `null` becomes an empty value. Nested values are a YAML error.
pub(crate) fn parse_yaml_content(content: &[u8], data: &mut SecretData) -> Result<(), ParseError> {
    if content.iter().all(u8::is_ascii_whitespace) {
        return Ok(());
    }

    let document: Option<BTreeMap<String, Option<String>>> = serde_yaml::from_slice(content)?;
    for (key, value) in document.into_iter().flatten() {
        insert_encoded(data, key, value.unwrap_or_default().as_bytes());
    }
    Ok(())
}

/// Parse a flat JSON object of strings
pub(crate) fn parse_json_content(content: &[u8], data: &mut SecretData) -> Result<(), ParseError> {
    let document: BTreeMap<String, Option<String>> = serde_json::from_slice(content)?;
    for (key, value) in document {
        insert_encoded(data, key, value.unwrap_or_default().as_bytes());
    }
    Ok(())
}
