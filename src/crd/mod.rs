//! # Resource Types
//!
//! Serde types for the documents the generator reads and writes.
//!
//! ## Module Structure
//!
//! - `generator.rs` - The `SopsSecretGenerator` input manifest
//! - `secret.rs` - The generated Kubernetes `Secret`
//! - `resource_list.rs` - The KRM function `ResourceList` envelope

mod generator;
mod resource_list;
mod secret;

// Re-export all public types
pub use generator::SopsSecretGenerator;
pub use resource_list::{FunctionResult, ResourceList, Severity};
pub use secret::{Secret, SecretData};
