//! Explorer source verification.

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Mutex, PoisonError},
};

use alloy::{hex, primitives::Address};
use tracing::{info, warn};

use crate::{
    build::artifact::ArtifactStore,
    config::{ScriptConfig, SolidityConfig},
    errors::ScriptError,
    networks::NetworkProfile,
    output_writer::mark_verified,
};

pub mod etherscan;

pub use etherscan::{EtherscanClient, VerificationRequest};

/// Submits deployed contracts to the explorer of the active network
pub struct SourceVerifier {
    network: &'static NetworkProfile,
    artifacts: ArtifactStore,
    solidity: SolidityConfig,
    deployments_file: PathBuf,
    api_key: Result<String, ScriptError>,
    /// Contract name of each address deployed or registered in this run
    known: Mutex<HashMap<Address, String>>,
}

impl SourceVerifier {
    /// Build a verifier for the configured network
    pub fn new(config: &ScriptConfig) -> Self {
        Self {
            network: config.network,
            artifacts: ArtifactStore::new(config.paths.clone()),
            solidity: config.solidity.clone(),
            deployments_file: config.deployments_file.clone(),
            api_key: config.explorer_api_key().map(str::to_string),
            known: Mutex::new(HashMap::new()),
        }
    }

    /// Register the contract deployed at `address`
    pub fn register(&self, address: Address, name: &str) {
        self.known
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address, name.to_string());
    }

    /// Contract name of a registered address
    fn contract_at(&self, address: Address) -> Result<String, ScriptError> {
        self.known
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&address)
            .cloned()
            .ok_or_else(|| {
                ScriptError::Configuration(format!("no known contract deployed at {address}"))
            })
    }

    /// Build the explorer request of a registered contract
    pub fn request(
        &self,
        address: Address,
        args: &[String],
    ) -> Result<VerificationRequest, ScriptError> {
        let name = self.contract_at(address)?;
        let artifact = self.artifacts.load(&name)?;
        let build_info = self.artifacts.build_info(&artifact)?;
        self.solidity
            .warn_mismatches(&build_info.solc_version, &build_info.input);

        Ok(VerificationRequest {
            address,
            source_code: build_info.input.to_string(),
            contract_name: artifact.fully_qualified_name(),
            compiler_version: format!("v{}", build_info.solc_long_version),
            constructor_args: hex::encode(artifact.encode_constructor_args(args)?),
        })
    }

    /// Verify the registered contract at `address`, deployed with `args`
    pub async fn verify(&self, address: Address, args: &[String]) -> Result<(), ScriptError> {
        let api_key = self.api_key.clone()?;
        let request = self.request(address, args)?;

        let explorer = EtherscanClient::new(&self.network.explorer, api_key);
        info!(
            "Verifying {} on {}...",
            request.contract_name, self.network.explorer.network
        );
        explorer.verify(&request).await?;
        info!("Verified: {}", explorer.address_url(address));

        let name = self.contract_at(address)?;
        if let Err(e) = mark_verified(&self.deployments_file, self.network.name, &name, address) {
            warn!("Could not record the verification: {}", e);
        }

        Ok(())
    }
}
