//! # Parser
//!
//! Decrypts sops-encrypted sources and extracts Secret entries from them.
//!
//! ## Supported File Formats
//!
//! - **`.env` files**: `KEY=value` lines, `#` comments, values kept verbatim
//! - **`.yaml` / `.yml` files**: flat mapping of keys to scalar values
//! - **`.json` files**: flat object of keys to string values
//!
//! Any other file can still be used as a whole-file source; sops is asked
//! to treat it as `binary`.

pub mod parsers;
pub mod sops;
pub mod types;

// Re-export public API
pub use parsers::{extract, ParseError};
pub use sops::error::{classify_sops_error, SopsDecryptionError, SopsDecryptionFailureReason};
pub use sops::{decrypt_file, DecryptFileError, Decryptor, Plaintext, SopsBinary};
pub use types::Format;
