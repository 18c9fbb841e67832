//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// Missing or invalid configuration value (env secret, account index, network name)
    Configuration(String),
    /// Error reading from or writing to the operator console
    Console(String),
    /// Error reading a compiled contract artifact or its build info
    Artifact(String),
    /// Error when reading or writing the deployments file
    JsonOutputError(String),
    /// Error when creating the client
    ClientInitialization(String),
    /// Error when fetching the nonce to deploy a contract
    NonceFetching(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error submitting a contract for explorer verification
    ContractVerification(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Configuration(s) => write!(f, "configuration error: {}", s),
            ScriptError::Console(s) => write!(f, "console error: {}", s),
            ScriptError::Artifact(s) => write!(f, "error loading contract artifact: {}", s),
            ScriptError::JsonOutputError(s) => write!(f, "error writing json output: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error during client init: {}", s),
            ScriptError::NonceFetching(s) => {
                write!(f, "error during nonce fetching for client signing: {}", s)
            }
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractVerification(s) => {
                write!(f, "error verifying contract: {}", s)
            }
        }
    }
}

impl Error for ScriptError {}
