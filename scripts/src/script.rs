//! The deploy-and-verify script: pick the signing account, ask the operator
//! to confirm, deploy, verify, then print the contract address.

use std::io::Write;

use crate::{
    accounts::{AccountSet, SigningAccount},
    constants::CONFIRM_LABEL,
    deploy::{ContractDeployer, DeployedContract},
    errors::ScriptError,
    prompt::{is_affirmative, Prompt},
};

/// How a script run ended, when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptOutcome {
    /// The operator declined, nothing was sent
    Aborted,
    /// The contract was deployed and verified
    Deployed(DeployedContract),
}

/// One run of the deployment script
#[derive(Debug, Clone, Copy)]
pub struct DeployScript<'a> {
    /// Name of the active network
    pub network: &'a str,
    /// Accounts configured on that network
    pub accounts: &'a AccountSet,
    /// Index of the signing account
    pub account_index: usize,
    /// Contract to deploy
    pub contract: &'a str,
    /// Constructor arguments, in order
    pub constructor_args: &'a [String],
}

impl DeployScript<'_> {
    /// Run the script. `connect` builds the deployer once the account is selected,
    /// human readable results are written to `out`.
    pub async fn run<D, P, F, W>(
        self,
        prompt: &mut P,
        connect: F,
        out: &mut W,
    ) -> Result<ScriptOutcome, ScriptError>
    where
        D: ContractDeployer,
        P: Prompt,
        F: FnOnce(&SigningAccount) -> Result<D, ScriptError>,
        W: Write,
    {
        // Init
        let account = self.accounts.select(self.account_index)?;
        say(
            out,
            format_args!(
                "Submit transactions with account: {} on {}",
                account.address(),
                self.network
            ),
        )?;
        let deployer = connect(account)?;

        // Confirm
        let answer = prompt.ask(CONFIRM_LABEL)?;
        if !is_affirmative(&answer) {
            say(out, format_args!("end"))?;
            return Ok(ScriptOutcome::Aborted);
        }

        // Execute
        let deployed = deployer
            .deploy_contract(self.contract, self.constructor_args)
            .await?;
        let verified = deployer
            .verify_contract(deployed.address, self.constructor_args)
            .await;

        // The address is reported even when the verification failed
        say(out, format_args!("{}: {}", self.contract, deployed.address))?;
        verified?;

        Ok(ScriptOutcome::Deployed(deployed))
    }
}

/// Write one line for the operator
fn say<W: Write>(out: &mut W, line: std::fmt::Arguments<'_>) -> Result<(), ScriptError> {
    writeln!(out, "{line}").map_err(|e| ScriptError::Console(e.to_string()))
}
