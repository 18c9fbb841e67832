use std::time::Duration;

use alloy::primitives::Address;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    constants::{VERIFY_MAX_POLLS, VERIFY_POLL_INTERVAL_SECS},
    errors::ScriptError,
    networks::ExplorerConfig,
};

/// Everything the explorer needs to verify a deployed contract
#[derive(Debug, Clone)]
pub struct VerificationRequest {
    /// Deployed address
    pub address: Address,
    /// Standard json compiler input
    pub source_code: String,
    /// `<source>:<contract>` name
    pub contract_name: String,
    /// Full compiler version, e.g. `v0.8.20+commit.a1b79de6`
    pub compiler_version: String,
    /// Hex encoded constructor arguments, without prefix
    pub constructor_args: String,
}

/// Raw explorer API response
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    /// `1` on success, `0` otherwise
    pub status: String,
    /// Short message, e.g. `OK` or `NOTOK`
    #[serde(default)]
    pub message: String,
    /// Payload, usually a string
    #[serde(default)]
    pub result: Value,
}

impl ApiResponse {
    /// The result as text
    fn result_text(&self) -> String {
        match &self.result {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// What happened to a verification submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Queued, with the GUID to poll
    Queued(String),
    /// The explorer already has the source
    AlreadyVerified,
}

/// State of a queued verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationStatus {
    /// Still in the explorer queue
    Pending,
    /// Source verified
    Verified,
    /// Rejected, with the explorer reason
    Failed(String),
}

/// Interpret the response to a `verifysourcecode` call
pub fn classify_submission(response: &ApiResponse) -> Result<Submission, ScriptError> {
    let result = response.result_text();

    if result.to_lowercase().contains("already verified") {
        return Ok(Submission::AlreadyVerified);
    }
    if response.status == "1" && !result.is_empty() {
        return Ok(Submission::Queued(result));
    }

    Err(ScriptError::ContractVerification(format!(
        "explorer rejected the submission: {} ({})",
        result, response.message
    )))
}

/// Interpret the response to a `checkverifystatus` call
pub fn classify_status(response: &ApiResponse) -> VerificationStatus {
    let result = response.result_text();

    if result == "Pending in queue" {
        VerificationStatus::Pending
    } else if result == "Pass - Verified" || result == "Already Verified" {
        VerificationStatus::Verified
    } else {
        VerificationStatus::Failed(result)
    }
}

/// Client of an Etherscan compatible verification API
#[derive(Debug, Clone)]
pub struct EtherscanClient {
    http: Client,
    api_url: String,
    browser_url: String,
    api_key: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl EtherscanClient {
    /// Build a client for the given explorer
    pub fn new(explorer: &ExplorerConfig, api_key: String) -> Self {
        Self {
            http: Client::new(),
            api_url: explorer.api_url.to_string(),
            browser_url: explorer.browser_url.to_string(),
            api_key,
            poll_interval: Duration::from_secs(VERIFY_POLL_INTERVAL_SECS),
            max_polls: VERIFY_MAX_POLLS,
        }
    }

    /// Check the verification status every `poll_interval`, at most `max_polls` times
    pub fn with_polling(mut self, poll_interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = poll_interval;
        self.max_polls = max_polls;
        self
    }

    /// Explorer page of the given address
    pub fn address_url(&self, address: Address) -> String {
        format!(
            "{}/address/{}#code",
            self.browser_url.trim_end_matches('/'),
            address
        )
    }

    /// Submit the request and wait until the explorer settles on it
    pub async fn verify(&self, request: &VerificationRequest) -> Result<(), ScriptError> {
        let guid = match self.submit(request).await? {
            Submission::AlreadyVerified => {
                info!("Contract {} is already verified", request.address);
                return Ok(());
            }
            Submission::Queued(guid) => guid,
        };
        info!("Verification submitted, guid: {}", guid);

        for _ in 0..self.max_polls {
            tokio::time::sleep(self.poll_interval).await;

            match self.check_status(&guid).await? {
                VerificationStatus::Pending => debug!("Verification {} still pending", guid),
                VerificationStatus::Verified => return Ok(()),
                VerificationStatus::Failed(reason) => {
                    return Err(ScriptError::ContractVerification(reason))
                }
            }
        }

        Err(ScriptError::ContractVerification(format!(
            "verification {guid} still pending after {} checks",
            self.max_polls
        )))
    }

    /// Send the `verifysourcecode` call
    async fn submit(&self, request: &VerificationRequest) -> Result<Submission, ScriptError> {
        let address = request.address.to_string();
        let form = [
            ("apikey", self.api_key.as_str()),
            ("module", "contract"),
            ("action", "verifysourcecode"),
            ("contractaddress", address.as_str()),
            ("sourceCode", request.source_code.as_str()),
            ("codeformat", "solidity-standard-json-input"),
            ("contractname", request.contract_name.as_str()),
            ("compilerversion", request.compiler_version.as_str()),
            // The misspelling is part of the explorer API
            ("constructorArguements", request.constructor_args.as_str()),
        ];

        let response = self
            .http
            .post(&self.api_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| ScriptError::ContractVerification(e.to_string()))?;

        classify_submission(&parse_response(response).await?)
    }

    /// Send the `checkverifystatus` call
    async fn check_status(&self, guid: &str) -> Result<VerificationStatus, ScriptError> {
        let query = [
            ("apikey", self.api_key.as_str()),
            ("module", "contract"),
            ("action", "checkverifystatus"),
            ("guid", guid),
        ];

        let response = self
            .http
            .get(&self.api_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| ScriptError::ContractVerification(e.to_string()))?;

        Ok(classify_status(&parse_response(response).await?))
    }
}

/// Decode an explorer response body
async fn parse_response(response: reqwest::Response) -> Result<ApiResponse, ScriptError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ScriptError::ContractVerification(e.to_string()))?;

    serde_json::from_str(&body).map_err(|e| {
        ScriptError::ContractVerification(format!(
            "unexpected explorer response ({status}): {e}: {body}"
        ))
    })
}
