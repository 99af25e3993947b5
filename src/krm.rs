//! # KRM Function Host
//!
//! Runs the generator as a kustomize KRM function: a `ResourceList` is read,
//! every item is replaced by the Secret it generates and the list is written
//! back.

use crate::constants::RESOURCE_LIST_KIND;
use crate::crd::ResourceList;
use crate::generator::{Generator, GeneratorError};
use crate::parser::Decryptor;
use anyhow::{Context, Result};
use std::io::{Read, Write};
use tracing::{debug, error};

/// Exchanges `ResourceList`s with the function caller
pub trait ResourceListHost {
    /// Read the input list
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or decoded.
    fn receive(&mut self) -> Result<ResourceList>;

    /// Write the output list
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be encoded or written.
    fn send(&mut self, list: &ResourceList) -> Result<()>;
}

/// [`ResourceListHost`] speaking YAML over a reader and a writer
#[derive(Debug)]
pub struct StdioHost<R: Read, W: Write> {
    input: R,
    output: W,
}

impl<R: Read, W: Write> StdioHost<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the writer, e.g. to inspect captured output
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: Read, W: Write> ResourceListHost for StdioHost<R, W> {
    fn receive(&mut self) -> Result<ResourceList> {
        let mut buffer = String::new();
        self.input
            .read_to_string(&mut buffer)
            .context("Failed to read ResourceList")?;
        serde_yaml::from_str(&buffer).context("Failed to parse ResourceList")
    }

    fn send(&mut self, list: &ResourceList) -> Result<()> {
        let yaml = serde_yaml::to_string(list).context("Failed to serialize ResourceList")?;
        self.output
            .write_all(yaml.as_bytes())
            .context("Failed to write ResourceList")?;
        self.output.flush().context("Failed to flush output")
    }
}

/// Replace the generator manifests in `list` with the Secrets they generate
///
/// When `items` is empty the `functionConfig` is used as the only manifest.
/// On failure `items` keeps the Secrets generated before the failing
/// manifest and an error result is appended.
///
/// # Errors
///
/// Returns the first failing manifest's error, or
/// [`GeneratorError::InvalidResourceList`] if `list` is not a `ResourceList`.
pub fn process_resource_list<D: Decryptor>(
    generator: &Generator<D>,
    list: &mut ResourceList,
) -> Result<(), GeneratorError> {
    if list.kind != RESOURCE_LIST_KIND {
        let err = GeneratorError::InvalidResourceList(list.kind.clone());
        list.log_error(err.to_string());
        return Err(err);
    }

    let manifests = if list.items.is_empty() {
        list.function_config.iter().cloned().collect()
    } else {
        std::mem::take(&mut list.items)
    };
    debug!(items = manifests.len(), "processing ResourceList");

    let mut secrets = Vec::with_capacity(manifests.len());
    for manifest in &manifests {
        match generator.generate_item(manifest) {
            Ok(secret) => secrets.push(secret),
            Err(err) => {
                list.items = secrets;
                list.log_error(err.to_string());
                return Err(err);
            }
        }
    }

    list.items = secrets;
    Ok(())
}

/// Receive a list, process it and always send it back
///
/// Returns `false` when processing failed; the failure is reported inside
/// the sent list.
///
/// # Errors
///
/// Returns an error only if the host cannot receive or send.
pub fn run<H: ResourceListHost, D: Decryptor>(host: &mut H, generator: &Generator<D>) -> Result<bool> {
    let mut list = host.receive()?;

    let succeeded = match process_resource_list(generator, &mut list) {
        Ok(()) => true,
        Err(err) => {
            error!(error = %err, "failed to generate Secrets");
            false
        }
    };

    host.send(&list)?;
    Ok(succeeded)
}
