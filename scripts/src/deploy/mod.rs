//! Contract deployment and verification on the active network.

use std::path::PathBuf;

use alloy::primitives::Address;
use tracing::{info, warn};

use crate::{
    accounts::SigningAccount,
    build::artifact::ArtifactStore,
    config::ScriptConfig,
    errors::ScriptError,
    networks::NetworkProfile,
    output_writer::{write_deployment, DeploymentRecord},
    tx::{
        client::{create_rpc_provider, ensure_chain_id, RpcProvider},
        sender::{predict_contract_address, send_creation_transaction},
    },
    verify::SourceVerifier,
};

/// Handle on a deployed contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployedContract {
    /// On-chain address
    pub address: Address,
}

/// Deploys contracts and submits them for source verification
#[allow(async_fn_in_trait)]
pub trait ContractDeployer {
    /// Deploy the contract `name` with the given constructor arguments
    async fn deploy_contract(
        &self,
        name: &str,
        args: &[String],
    ) -> Result<DeployedContract, ScriptError>;

    /// Ask the explorer to verify the contract at `address`, deployed with `args`
    async fn verify_contract(&self, address: Address, args: &[String]) -> Result<(), ScriptError>;
}

/// Deployer backed by an RPC provider and the explorer of the active network
pub struct Deployer {
    client: RpcProvider,
    sender: Address,
    network: &'static NetworkProfile,
    confirmations: u64,
    artifacts: ArtifactStore,
    deployments_file: PathBuf,
    verifier: SourceVerifier,
}

impl Deployer {
    /// Build a deployer sending transactions from `account`
    pub fn new(config: &ScriptConfig, account: &SigningAccount) -> Result<Self, ScriptError> {
        let client = create_rpc_provider(config.network.rpc_url, account)?;

        Ok(Self {
            client,
            sender: account.address(),
            network: config.network,
            confirmations: config.confirmations,
            artifacts: ArtifactStore::new(config.paths.clone()),
            deployments_file: config.deployments_file.clone(),
            verifier: SourceVerifier::new(config),
        })
    }
}

impl ContractDeployer for Deployer {
    async fn deploy_contract(
        &self,
        name: &str,
        args: &[String],
    ) -> Result<DeployedContract, ScriptError> {
        // Build the creation code before touching the network
        let artifact = self.artifacts.load(name)?;
        let deploy_code = artifact.deploy_code(args)?;

        ensure_chain_id(&self.client, self.network.explorer.chain_id).await?;

        let predicted = predict_contract_address(&self.client, self.sender).await?;
        info!(
            "Deploying {} on {}, expected address {}",
            name, self.network.name, predicted
        );

        let receipt =
            send_creation_transaction(&self.client, deploy_code, self.confirmations).await?;
        if receipt.address != predicted {
            warn!(
                "{} deployed at {} instead of the expected {}",
                name, receipt.address, predicted
            );
        }
        self.verifier.register(receipt.address, name);

        // Bookkeeping failures are only logged once the contract is on-chain
        let record = DeploymentRecord {
            address: receipt.address,
            tx_hash: Some(receipt.tx_hash),
            constructor_args: args.to_vec(),
            verified: false,
        };
        if let Err(e) = write_deployment(&self.deployments_file, self.network.name, name, &record)
        {
            warn!("Could not record the deployment: {}", e);
        }

        Ok(DeployedContract {
            address: receipt.address,
        })
    }

    async fn verify_contract(&self, address: Address, args: &[String]) -> Result<(), ScriptError> {
        self.verifier.verify(address, args).await
    }
}
