//! # Kustomize Integration
//!
//! Output shaping that kustomize relies on when it consumes generated
//! resources: name-hash and merge-behavior annotations, and removal of the
//! function-protocol annotations carried by the generator manifest.

pub mod secrets;

pub use secrets::build_secret;
