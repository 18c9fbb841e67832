//! Signing accounts resolved from the configured key material.

use std::fmt;

use alloy::{
    hex,
    primitives::{Address, B256},
    signers::local::PrivateKeySigner,
};

use crate::errors::ScriptError;

/// An identity able to sign and pay for transactions
#[derive(Clone)]
pub struct SigningAccount {
    /// Position in the account list
    pub index: usize,
    /// Local signer holding the private key
    pub signer: PrivateKeySigner,
}

impl SigningAccount {
    /// Address of the account
    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

impl fmt::Debug for SigningAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningAccount")
            .field("index", &self.index)
            .field("address", &self.address())
            .finish()
    }
}

/// The ordered list of accounts available on a network
#[derive(Debug, Clone, Default)]
pub struct AccountSet {
    accounts: Vec<SigningAccount>,
}

impl AccountSet {
    /// Parse the key material, a comma separated list of hex private keys
    pub fn from_key_material(
        key_material: Option<&str>,
        env_var: &str,
    ) -> Result<Self, ScriptError> {
        let key_material = key_material
            .filter(|keys| !keys.trim().is_empty())
            .ok_or_else(|| {
                ScriptError::Configuration(format!("missing signing key material in {env_var}"))
            })?;

        let accounts = key_material
            .split(',')
            .map(str::trim)
            .enumerate()
            .map(|(index, key)| {
                let signer = parse_private_key(key).map_err(|e| {
                    ScriptError::Configuration(format!("invalid key #{index} in {env_var}: {e}"))
                })?;
                Ok(SigningAccount { index, signer })
            })
            .collect::<Result<Vec<_>, ScriptError>>()?;

        Ok(Self { accounts })
    }

    /// Select the account at `index`
    pub fn select(&self, index: usize) -> Result<&SigningAccount, ScriptError> {
        self.accounts.get(index).ok_or_else(|| {
            ScriptError::Configuration(format!(
                "account index {index} is out of range, {} account(s) configured",
                self.accounts.len()
            ))
        })
    }

    /// Number of accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether no account is configured
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Build a signer from a 32 bytes hex key, with or without `0x` prefix
fn parse_private_key(key: &str) -> Result<PrivateKeySigner, String> {
    let bytes = hex::decode(key).map_err(|e| e.to_string())?;
    if bytes.len() != 32 {
        return Err(format!("expected 32 bytes, got {}", bytes.len()));
    }

    PrivateKeySigner::from_bytes(&B256::from_slice(&bytes)).map_err(|e| e.to_string())
}
