//! Records deployed contracts in a JSON file keyed by network then contract name.
//!
//! Contracts are keyed by their plain name, so `Token` and
//! `contracts/Token.sol:Token` address the same entry.

use std::{fs, path::Path};

use alloy::primitives::{Address, TxHash};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ScriptError;

/// A contract deployed on a network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRecord {
    /// Deployed address
    pub address: Address,
    /// Creation transaction
    pub tx_hash: Option<TxHash>,
    /// Constructor arguments, in order
    pub constructor_args: Vec<String>,
    /// Whether the explorer accepted the source verification
    pub verified: bool,
}

/// On-disk shape of a [`DeploymentRecord`]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredDeployment {
    address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tx_hash: Option<String>,
    #[serde(default)]
    constructor_args: Vec<String>,
    #[serde(default)]
    verified: bool,
}

impl From<&DeploymentRecord> for StoredDeployment {
    fn from(record: &DeploymentRecord) -> Self {
        Self {
            address: record.address.to_string(),
            tx_hash: record.tx_hash.map(|hash| hash.to_string()),
            constructor_args: record.constructor_args.clone(),
            verified: record.verified,
        }
    }
}

impl TryFrom<StoredDeployment> for DeploymentRecord {
    type Error = ScriptError;

    fn try_from(stored: StoredDeployment) -> Result<Self, Self::Error> {
        let address = stored
            .address
            .parse::<Address>()
            .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
        let tx_hash = stored
            .tx_hash
            .map(|hash| hash.parse::<TxHash>())
            .transpose()
            .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

        Ok(Self {
            address,
            tx_hash,
            constructor_args: stored.constructor_args,
            verified: stored.verified,
        })
    }
}

/// Read the deployment of `contract` on `network`
pub fn read_deployment(
    file_path: &Path,
    network: &str,
    contract: &str,
) -> Result<DeploymentRecord, ScriptError> {
    if !file_path.exists() {
        return Err(ScriptError::JsonOutputError(format!(
            "deployments file {} not found",
            file_path.display()
        )));
    }

    let parsed_json = get_json_from_file(file_path)?;
    let contract = deployment_key(contract);
    let entry = parsed_json
        .get(network)
        .and_then(|deployments| deployments.get(contract))
        .cloned()
        .ok_or_else(|| {
            ScriptError::JsonOutputError(format!("no deployment of {contract} on {network}"))
        })?;

    let stored: StoredDeployment =
        serde_json::from_value(entry).map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
    stored.try_into()
}

/// Write the deployment of `contract` on `network`, replacing any previous one
pub fn write_deployment(
    file_path: &Path,
    network: &str,
    contract: &str,
    record: &DeploymentRecord,
) -> Result<(), ScriptError> {
    let mut parsed_json = if file_path.exists() {
        get_json_from_file(file_path)?
    } else {
        Value::Object(Map::new())
    };

    let root = parsed_json.as_object_mut().ok_or_else(|| {
        ScriptError::JsonOutputError(format!("{} is not a json object", file_path.display()))
    })?;
    let deployments = root
        .entry(network)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| {
            ScriptError::JsonOutputError(format!("{network} entry is not a json object"))
        })?;

    let stored = serde_json::to_value(StoredDeployment::from(record))
        .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
    deployments.insert(deployment_key(contract).to_string(), stored);

    // Write the updated json back to the file
    let contents = serde_json::to_string_pretty(&parsed_json)
        .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
    fs::write(file_path, contents).map_err(|e| ScriptError::JsonOutputError(e.to_string()))
}

/// Flag the recorded deployment as verified, if it is the one at `address`
pub fn mark_verified(
    file_path: &Path,
    network: &str,
    contract: &str,
    address: Address,
) -> Result<bool, ScriptError> {
    let mut record = match read_deployment(file_path, network, contract) {
        Ok(record) => record,
        Err(_) => return Ok(false),
    };
    if record.address != address {
        return Ok(false);
    }

    record.verified = true;
    write_deployment(file_path, network, contract, &record)?;
    Ok(true)
}

/// Plain contract name of a plain or fully qualified name
fn deployment_key(contract: &str) -> &str {
    contract.rsplit(':').next().unwrap_or(contract)
}

/// Parses the JSON file at the given path
fn get_json_from_file(file_path: &Path) -> Result<Value, ScriptError> {
    let contents =
        fs::read_to_string(file_path).map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

    serde_json::from_str(&contents).map_err(|e| ScriptError::JsonOutputError(e.to_string()))
}
