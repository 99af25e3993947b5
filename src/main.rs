//! # SOPS Secret Generator
//!
//! Kustomize entry point.
//!
//! ## Usage
//!
//! ```bash
//! # KRM function mode: ResourceList on stdin, ResourceList on stdout
//! cat ResourceList.yaml | sops-secret-generator
//!
//! # Legacy exec plugin mode: generator manifest path as the only argument
//! sops-secret-generator generator.yaml
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use sops_secret_generator::config::{GeneratorConfig, LogFormat};
use sops_secret_generator::constants::USAGE;
use sops_secret_generator::krm::{self, StdioHost};
use sops_secret_generator::observability::init_logging;
use sops_secret_generator::generator::chain_message;
use sops_secret_generator::{Decryptor, Generator, SopsBinary};
use std::io::{IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BUILD_GIT_HASH"),
    " ",
    env!("BUILD_DATETIME"),
    ")"
);

/// Kustomize generator for Secrets from sops-encrypted files
#[derive(Debug, Parser)]
#[command(name = "sops-secret-generator", version = VERSION, about, after_help = USAGE)]
struct Cli {
    /// Generator manifest to process (legacy exec plugin mode)
    manifest: Option<PathBuf>,

    /// Program used to decrypt sources
    #[arg(long, env = "SOPS_SECRET_GENERATOR_SOPS_BINARY")]
    sops_binary: Option<String>,

    /// Tracing filter directive, e.g. `debug`
    #[arg(long, env = "SOPS_SECRET_GENERATOR_LOG")]
    log_level: Option<String>,

    /// Log format (text, json)
    #[arg(long, env = "SOPS_SECRET_GENERATOR_LOG_FORMAT")]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn into_config(self) -> (GeneratorConfig, Option<PathBuf>) {
        let mut config = GeneratorConfig::from_env();
        if let Some(sops_binary) = self.sops_binary {
            config.sops_binary = sops_binary;
        }
        if self.log_level.is_some() {
            config.log_level = self.log_level;
        }
        if let Some(log_format) = self.log_format {
            config.log_format = log_format;
        }
        (config, self.manifest)
    }
}

fn main() -> ExitCode {
    let (config, manifest) = Cli::parse().into_config();

    if let Err(e) = init_logging(&config) {
        eprintln!("{}", chain_message(&*e));
        return ExitCode::FAILURE;
    }

    let generator = Generator::new(SopsBinary::new(config.sops_binary));
    debug!(sops.binary = generator.decryptor().program(), "starting");

    let result = match manifest {
        Some(path) => run_exec_plugin(&generator, &path, std::io::stdout().lock()),
        None => {
            let stdin = std::io::stdin();
            let is_terminal = stdin.is_terminal();
            run_krm_function(&generator, stdin.lock(), std::io::stdout().lock(), is_terminal)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            let message = chain_message(&*e);
            debug!(error = %message, "generator failed");
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

/// KRM function mode; without piped input only the usage is printed
fn run_krm_function<D: Decryptor>(
    generator: &Generator<D>,
    input: impl Read,
    output: impl Write,
    input_is_terminal: bool,
) -> Result<bool> {
    if input_is_terminal {
        eprintln!("{USAGE}");
        return Ok(false);
    }

    let mut host = StdioHost::new(input, output);
    krm::run(&mut host, generator)
}

fn run_exec_plugin<D: Decryptor>(
    generator: &Generator<D>,
    path: &Path,
    mut output: impl Write,
) -> Result<bool> {
    let manifest = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read generator manifest {}", path.display()))?;
    let secret = generator.process_manifest(&manifest)?;
    output
        .write_all(secret.as_bytes())
        .context("Failed to write Secret")?;
    Ok(true)
}
