//! Definitions of CLI arguments and commands for deploy scripts

use std::{io, path::PathBuf};

use alloy::primitives::Address;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::{
    commands::{deploy_contracts, list_networks, verify_contract},
    config::{ConfigOptions, ScriptConfig},
    constants::{
        DEFAULT_ACCOUNT_INDEX, DEFAULT_ARTIFACTS_DIR, DEFAULT_CONFIRMATIONS,
        DEFAULT_CONSTRUCTOR_ARGS, DEFAULT_CONTRACT, DEFAULT_DEPLOYMENTS_FILE, DEFAULT_NETWORK,
    },
    errors::ScriptError,
    networks::NetworkTable,
};

/// Scripts for deploying & verifying contracts on EVM networks.
/// Without a command, deploys the sample Token contract.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Name of the network to use
    #[arg(short, long, env = "NETWORK", default_value = DEFAULT_NETWORK, global = true)]
    pub network: String,

    /// Index of the signing account in the configured key list
    #[arg(long, env = "ACCOUNT_INDEX", default_value_t = DEFAULT_ACCOUNT_INDEX, global = true)]
    pub account_index: usize,

    /// Block confirmations to wait for after a deployment
    #[arg(long, env = "CONFIRMATIONS", default_value_t = DEFAULT_CONFIRMATIONS, global = true)]
    pub confirmations: u64,

    /// Directory of the compiled contract artifacts
    #[arg(long, env = "ARTIFACTS_DIR", default_value = DEFAULT_ARTIFACTS_DIR, global = true)]
    pub artifacts: PathBuf,

    /// File where deployments are recorded
    #[arg(long, env = "DEPLOYMENTS_FILE", default_value = DEFAULT_DEPLOYMENTS_FILE, global = true)]
    pub deployments: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Options used to build the script config
    pub fn config_options(&self) -> ConfigOptions<'_> {
        ConfigOptions {
            network: &self.network,
            account_index: self.account_index,
            confirmations: self.confirmations,
            artifacts: &self.artifacts,
            deployments_file: &self.deployments,
        }
    }
}

/// The possible CLI commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy a contract, then verify it on the network explorer
    Deploy(DeployArgs),
    /// Verify an already deployed contract
    Verify(VerifyArgs),
    /// List the known networks
    Networks,
}

impl Default for Command {
    fn default() -> Self {
        Command::Deploy(DeployArgs::default())
    }
}

impl Command {
    /// Run the command
    pub async fn run(self, config: ScriptConfig, table: &NetworkTable) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => {
                info!("Deploying {} on {}...", args.contract, config.network.name);
                deploy_contracts(args, config).await
            }
            Command::Verify(args) => verify_contract(args, config, &mut io::stdout()).await,
            Command::Networks => list_networks(table, config.network.name, &mut io::stdout()),
        }
    }
}

/// Deploy a contract
#[derive(Args)]
pub struct DeployArgs {
    /// Name of the contract, plain or fully qualified (`contracts/Token.sol:Token`)
    #[arg(short, long, default_value = DEFAULT_CONTRACT)]
    pub contract: String,
    /// Constructor arguments, comma separated
    #[arg(short, long, value_delimiter = ',', default_values = DEFAULT_CONSTRUCTOR_ARGS)]
    pub args: Vec<String>,
}

impl Default for DeployArgs {
    fn default() -> Self {
        Self {
            contract: DEFAULT_CONTRACT.to_string(),
            args: DEFAULT_CONSTRUCTOR_ARGS.map(String::from).to_vec(),
        }
    }
}

/// Verify a deployed contract
#[derive(Args)]
pub struct VerifyArgs {
    /// Name of the contract, plain or fully qualified (`contracts/Token.sol:Token`)
    #[arg(short, long, default_value = DEFAULT_CONTRACT)]
    pub contract: String,
    /// Address of the contract, read from the deployments file when absent
    #[arg(long)]
    pub address: Option<Address>,
    /// Constructor arguments, comma separated, read from the deployments file when absent
    #[arg(short, long, value_delimiter = ',')]
    pub args: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_deploys_the_sample_contract() {
        let cli = Cli::try_parse_from(["deploy-scripts"]).unwrap();
        assert_eq!(cli.network, DEFAULT_NETWORK);
        assert_eq!(cli.account_index, 0);
        assert_eq!(cli.confirmations, 2);
        assert!(cli.command.is_none());

        match Command::default() {
            Command::Deploy(args) => {
                assert_eq!(args.contract, "Token");
                assert_eq!(args.args, vec!["NameToken", "SymbolToken"]);
            }
            _ => panic!("default command should deploy"),
        }
    }

    #[test]
    fn deploy_args_are_comma_separated() {
        let cli = Cli::try_parse_from([
            "deploy-scripts",
            "deploy",
            "--contract",
            "Vault",
            "--args",
            "a,b,c",
            "--network",
            "bscTestnet",
        ])
        .unwrap();

        assert_eq!(cli.network, "bscTestnet");
        match cli.command {
            Some(Command::Deploy(args)) => {
                assert_eq!(args.contract, "Vault");
                assert_eq!(args.args, vec!["a", "b", "c"]);
            }
            _ => panic!("expected a deploy command"),
        }
    }

    #[test]
    fn deploy_without_args_uses_sample_constructor() {
        let cli = Cli::try_parse_from(["deploy-scripts", "deploy"]).unwrap();
        match cli.command {
            Some(Command::Deploy(args)) => {
                assert_eq!(args.args, vec!["NameToken", "SymbolToken"])
            }
            _ => panic!("expected a deploy command"),
        }
    }

    #[test]
    fn verify_parses_address() {
        let cli = Cli::try_parse_from([
            "deploy-scripts",
            "verify",
            "--address",
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
        ])
        .unwrap();

        match cli.command {
            Some(Command::Verify(args)) => {
                assert!(args.address.is_some());
                assert!(args.args.is_none());
            }
            _ => panic!("expected a verify command"),
        }
    }

    #[test]
    fn verify_rejects_malformed_address() {
        assert!(Cli::try_parse_from(["deploy-scripts", "verify", "--address", "0x12"]).is_err());
    }
}
