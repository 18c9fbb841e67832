//! Runtime configuration of the scripts.
//!
//! The configuration is built once at startup from the CLI options and the
//! environment, then passed by value to the commands. Nothing below reads the
//! environment on its own.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use crate::{
    constants::DEFAULT_ARTIFACTS_DIR,
    errors::ScriptError,
    networks::{NetworkProfile, NetworkTable},
};

/// Compiler settings the contracts are built with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolidityConfig {
    /// Solc version
    pub version: String,
    /// Whether the optimizer is enabled
    pub optimizer_enabled: bool,
    /// Optimizer runs
    pub optimizer_runs: u64,
}

impl Default for SolidityConfig {
    fn default() -> Self {
        Self {
            version: "0.8.20".to_string(),
            optimizer_enabled: true,
            optimizer_runs: 200,
        }
    }
}

impl SolidityConfig {
    /// Compare a build's compiler version and optimizer settings with ours,
    /// returning one message per mismatch
    pub fn mismatches(&self, solc_version: &str, input: &Value) -> Vec<String> {
        let mut mismatches = Vec::new();

        if solc_version != self.version {
            mismatches.push(format!(
                "compiled with solc {solc_version}, configured {}",
                self.version
            ));
        }

        let optimizer = &input["settings"]["optimizer"];
        if let Some(enabled) = optimizer["enabled"].as_bool() {
            if enabled != self.optimizer_enabled {
                mismatches.push(format!(
                    "optimizer enabled is {enabled}, configured {}",
                    self.optimizer_enabled
                ));
            }
        }
        if let Some(runs) = optimizer["runs"].as_u64() {
            if runs != self.optimizer_runs {
                mismatches.push(format!(
                    "optimizer runs is {runs}, configured {}",
                    self.optimizer_runs
                ));
            }
        }

        mismatches
    }

    /// Log every mismatch between a build and our settings
    pub fn warn_mismatches(&self, solc_version: &str, input: &Value) {
        for mismatch in self.mismatches(solc_version, input) {
            warn!("Build info differs from the compiler config: {}", mismatch);
        }
    }
}

/// Filesystem layout of the contracts project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathsConfig {
    /// Solidity sources
    pub sources: PathBuf,
    /// Contract tests, layout data for the compiler toolchain only
    pub tests: PathBuf,
    /// Compiler cache, layout data for the compiler toolchain only
    pub cache: PathBuf,
    /// Compiled artifacts
    pub artifacts: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            sources: PathBuf::from("./contracts"),
            tests: PathBuf::from("./test"),
            cache: PathBuf::from("./cache"),
            artifacts: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
        }
    }
}

impl PathsConfig {
    /// Directory holding the artifacts of our own sources, e.g. `artifacts/contracts`
    pub fn source_artifacts(&self) -> PathBuf {
        match self.sources.file_name() {
            Some(name) => self.artifacts.join(name),
            None => self.artifacts.clone(),
        }
    }

    /// Directory holding the build info files
    pub fn build_info(&self) -> PathBuf {
        self.artifacts.join("build-info")
    }
}

/// Everything a command needs to run
#[derive(Debug, Clone)]
pub struct ScriptConfig {
    /// The active network
    pub network: &'static NetworkProfile,
    /// Index of the signing account
    pub account_index: usize,
    /// Confirmations awaited after a deployment
    pub confirmations: u64,
    /// Compiler settings
    pub solidity: SolidityConfig,
    /// Project layout
    pub paths: PathsConfig,
    /// Where deployments are recorded
    pub deployments_file: PathBuf,
    /// Raw signing key material, parsed when the accounts are resolved
    pub key_material: Option<String>,
    /// Explorer API key, or the reason it is unavailable
    explorer_api_key: Result<String, ScriptError>,
}

/// Options used to build a [`ScriptConfig`]
#[derive(Debug, Clone)]
pub struct ConfigOptions<'a> {
    /// Name of the active network
    pub network: &'a str,
    /// Index of the signing account
    pub account_index: usize,
    /// Confirmations awaited after a deployment
    pub confirmations: u64,
    /// Artifacts directory
    pub artifacts: &'a Path,
    /// Deployments file
    pub deployments_file: &'a Path,
}

impl ScriptConfig {
    /// Build the config, reading secrets through `lookup`
    pub fn build(
        table: &NetworkTable,
        options: ConfigOptions<'_>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ScriptError> {
        let network = table.get(options.network)?;

        let paths = PathsConfig {
            artifacts: options.artifacts.to_path_buf(),
            ..PathsConfig::default()
        };

        Ok(Self {
            network,
            account_index: options.account_index,
            confirmations: options.confirmations,
            solidity: SolidityConfig::default(),
            paths,
            deployments_file: options.deployments_file.to_path_buf(),
            key_material: lookup(network.key_env),
            explorer_api_key: network.explorer.api_key.resolve(&lookup),
        })
    }

    /// The explorer API key of the active network
    pub fn explorer_api_key(&self) -> Result<&str, ScriptError> {
        self.explorer_api_key.as_deref().map_err(|e| e.clone())
    }
}
