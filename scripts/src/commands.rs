use std::io::{self, Write};

use tracing::{info, warn};

use crate::{
    accounts::AccountSet,
    cli::{DeployArgs, VerifyArgs},
    config::ScriptConfig,
    deploy::Deployer,
    errors::ScriptError,
    networks::NetworkTable,
    output_writer::read_deployment,
    prompt::StdinPrompt,
    script::{DeployScript, ScriptOutcome},
    verify::SourceVerifier,
};

/// Deploy a contract and verify it, after the operator confirmed
pub async fn deploy_contracts(args: DeployArgs, config: ScriptConfig) -> Result<(), ScriptError> {
    let accounts =
        AccountSet::from_key_material(config.key_material.as_deref(), config.network.key_env)?;

    let script = DeployScript {
        network: config.network.name,
        accounts: &accounts,
        account_index: config.account_index,
        contract: &args.contract,
        constructor_args: &args.args,
    };

    let outcome = script
        .run(
            &mut StdinPrompt,
            |account| Deployer::new(&config, account),
            &mut io::stdout(),
        )
        .await?;

    match outcome {
        ScriptOutcome::Aborted => info!("Deployment aborted by the operator"),
        ScriptOutcome::Deployed(contract) => {
            info!("Deployed and verified with success at {}", contract.address)
        }
    }

    Ok(())
}

/// Submit an already deployed contract for verification
pub async fn verify_contract(
    args: VerifyArgs,
    config: ScriptConfig,
    out: &mut impl Write,
) -> Result<(), ScriptError> {
    // The recorded deployment fills whatever was not given on the command line
    let recorded = read_deployment(&config.deployments_file, config.network.name, &args.contract);

    let address = match (args.address, &recorded) {
        (Some(address), _) => address,
        (None, Ok(record)) => record.address,
        (None, Err(e)) => return Err(e.clone()),
    };

    let constructor_args = match args.args {
        Some(constructor_args) => constructor_args,
        None => match recorded {
            Ok(record) if record.address == address => record.constructor_args,
            _ => {
                warn!("No recorded constructor arguments for {}", address);
                Vec::new()
            }
        },
    };

    let verifier = SourceVerifier::new(&config);
    verifier.register(address, &args.contract);
    verifier.verify(address, &constructor_args).await?;

    writeln!(out, "{}: {}", args.contract, address)
        .map_err(|e| ScriptError::Console(e.to_string()))
}

/// Print the known networks, flagging the active one
pub fn list_networks(
    table: &NetworkTable,
    active: &str,
    out: &mut impl Write,
) -> Result<(), ScriptError> {
    for profile in table.iter() {
        let marker = if profile.name == active { "*" } else { " " };
        writeln!(
            out,
            "{marker} {:<18} chain {:<9} rpc {}  explorer {}",
            profile.name, profile.explorer.chain_id, profile.rpc_url, profile.explorer.browser_url
        )
        .map_err(|e| ScriptError::Console(e.to_string()))?;
    }

    Ok(())
}
