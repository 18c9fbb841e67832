//! The static table of networks the scripts can deploy to.
//!
//! Every profile pairs an RPC endpoint with the explorer used to verify
//! contracts deployed there. Secrets are referenced by env var name and only
//! resolved when they are first needed.

use std::collections::HashSet;

use reqwest::Url;

use crate::{constants::PRIVATE_KEY_ENV, errors::ScriptError};

/// Where the explorer API key of a network comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    /// Read from the given env var
    Env(&'static str),
    /// The explorer does not require a key, this value is sent instead
    Placeholder(&'static str),
}

impl ApiKeySource {
    /// Resolve the API key, using `lookup` to read env vars
    pub fn resolve(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<String, ScriptError> {
        match self {
            ApiKeySource::Env(var) => lookup(var)
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| {
                    ScriptError::Configuration(format!("missing explorer API key in {var}"))
                }),
            ApiKeySource::Placeholder(key) => Ok(key.to_string()),
        }
    }
}

/// Explorer settings used for source verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplorerConfig {
    /// Name of the network on the explorer side
    pub network: &'static str,
    /// API key
    pub api_key: ApiKeySource,
    /// Chain ID served by the explorer
    pub chain_id: u64,
    /// Etherscan-compatible API endpoint
    pub api_url: &'static str,
    /// Human facing explorer URL
    pub browser_url: &'static str,
}

/// A named network the contracts can be deployed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkProfile {
    /// Name used to select the network
    pub name: &'static str,
    /// RPC endpoint
    pub rpc_url: &'static str,
    /// Env var holding the signing key material
    pub key_env: &'static str,
    /// Explorer used for verification
    pub explorer: ExplorerConfig,
}

/// All the supported networks
pub const NETWORKS: &[NetworkProfile] = &[
    NetworkProfile {
        name: "ethMainnet",
        rpc_url: "https://ethereum-rpc.publicnode.com",
        key_env: PRIVATE_KEY_ENV,
        explorer: ExplorerConfig {
            network: "ethereumMainnet",
            api_key: ApiKeySource::Env("API_KEY_ETHERSCAN_MAINNET"),
            chain_id: 1,
            api_url: "https://api.etherscan.io/api",
            browser_url: "https://etherscan.io/",
        },
    },
    NetworkProfile {
        name: "ethereumTestnet",
        rpc_url: "https://ethereum-sepolia-rpc.publicnode.com",
        key_env: PRIVATE_KEY_ENV,
        explorer: ExplorerConfig {
            network: "ethereumTestnet",
            api_key: ApiKeySource::Env("API_KEY_ETHERSCAN_TESTNET"),
            chain_id: 11155111,
            api_url: "https://api-sepolia.etherscan.io/api",
            browser_url: "https://sepolia.etherscan.io/",
        },
    },
    NetworkProfile {
        name: "bscMainnet",
        rpc_url: "https://bsc-dataseed1.binance.org",
        key_env: PRIVATE_KEY_ENV,
        explorer: ExplorerConfig {
            network: "bscMainnet",
            api_key: ApiKeySource::Env("API_KEY_BSCSCAN_MAINNET"),
            chain_id: 56,
            api_url: "https://api.bscscan.com/api",
            browser_url: "https://bscscan.com/",
        },
    },
    NetworkProfile {
        name: "bscTestnet",
        rpc_url: "https://data-seed-prebsc-1-s1.bnbchain.org:8545",
        key_env: PRIVATE_KEY_ENV,
        explorer: ExplorerConfig {
            network: "bscTestnet",
            api_key: ApiKeySource::Env("API_KEY_BSCSCAN_TESTNET"),
            chain_id: 97,
            api_url: "https://api-testnet.bscscan.com/api",
            browser_url: "https://testnet.bscscan.com/",
        },
    },
    NetworkProfile {
        name: "arbitrum",
        rpc_url: "https://arb1.arbitrum.io/rpc",
        key_env: PRIVATE_KEY_ENV,
        explorer: ExplorerConfig {
            network: "arbitrumMainnet",
            api_key: ApiKeySource::Env("API_KEY_ARBISCAN_MAINNET"),
            chain_id: 42161,
            api_url: "https://api.arbiscan.io/api",
            browser_url: "https://arbiscan.io/",
        },
    },
    NetworkProfile {
        name: "arbitrumTestnet",
        rpc_url: "https://sepolia-rollup.arbitrum.io/rpc",
        key_env: PRIVATE_KEY_ENV,
        explorer: ExplorerConfig {
            network: "arbitrumTestnet",
            api_key: ApiKeySource::Env("API_KEY_ARBISCAN_TESTNET"),
            chain_id: 421614,
            api_url: "https://api-sepolia.arbiscan.io/api",
            browser_url: "https://sepolia.arbiscan.io/",
        },
    },
    NetworkProfile {
        name: "baseMainnet",
        rpc_url: "https://mainnet.base.org",
        key_env: PRIVATE_KEY_ENV,
        explorer: ExplorerConfig {
            network: "baseMainnet",
            api_key: ApiKeySource::Env("API_KEY_BASESCAN_MAINNET"),
            chain_id: 8453,
            api_url: "https://api.basescan.org/api",
            browser_url: "https://basescan.org/",
        },
    },
    NetworkProfile {
        name: "baseTestnet",
        rpc_url: "https://sepolia.base.org",
        key_env: PRIVATE_KEY_ENV,
        explorer: ExplorerConfig {
            network: "baseTestnet",
            api_key: ApiKeySource::Env("API_KEY_BASESCAN_TESTNET"),
            chain_id: 84532,
            api_url: "https://api-sepolia.basescan.org/api",
            browser_url: "https://sepolia.basescan.org/",
        },
    },
    NetworkProfile {
        name: "berachainMainnet",
        rpc_url: "https://rpc.berachain.com",
        key_env: PRIVATE_KEY_ENV,
        explorer: ExplorerConfig {
            network: "berachainMainnet",
            api_key: ApiKeySource::Placeholder("berachain_mainnet"),
            chain_id: 80094,
            api_url: "https://rpc.berachain-apis.com",
            browser_url: "https://berascan.com/",
        },
    },
    NetworkProfile {
        name: "berachainTestnet",
        rpc_url: "https://bartio.rpc.berachain.com",
        key_env: PRIVATE_KEY_ENV,
        explorer: ExplorerConfig {
            network: "berachainTestnet",
            api_key: ApiKeySource::Placeholder("berachain_bartio"),
            chain_id: 80084,
            api_url: "https://api.routescan.io/v2/network/testnet/evm/80084/etherscan",
            browser_url: "https://bartio.beratrail.io",
        },
    },
];

/// A validated set of network profiles
#[derive(Debug, Clone, Copy)]
pub struct NetworkTable {
    profiles: &'static [NetworkProfile],
}

impl NetworkTable {
    /// Load and validate the built-in table
    pub fn load() -> Result<Self, ScriptError> {
        Self::from_profiles(NETWORKS)
    }

    /// Validate the given profiles: unique names, well-formed http(s) URLs
    pub fn from_profiles(profiles: &'static [NetworkProfile]) -> Result<Self, ScriptError> {
        let mut names = HashSet::new();
        for profile in profiles {
            if !names.insert(profile.name) {
                return Err(ScriptError::Configuration(format!(
                    "network {} is declared twice",
                    profile.name
                )));
            }

            for url in [
                profile.rpc_url,
                profile.explorer.api_url,
                profile.explorer.browser_url,
            ] {
                if !validate_url(url) {
                    return Err(ScriptError::Configuration(format!(
                        "network {} has an invalid URL: {url}",
                        profile.name
                    )));
                }
            }
        }

        Ok(Self { profiles })
    }

    /// Find the profile of the given network
    pub fn get(&self, name: &str) -> Result<&'static NetworkProfile, ScriptError> {
        self.profiles
            .iter()
            .find(|profile| profile.name == name)
            .ok_or_else(|| {
                ScriptError::Configuration(format!(
                    "unknown network {name}, expected one of: {}",
                    self.names().join(", ")
                ))
            })
    }

    /// Names of all the known networks, in declaration order
    pub fn names(&self) -> Vec<&'static str> {
        self.profiles.iter().map(|profile| profile.name).collect()
    }

    /// Iterate over the profiles
    pub fn iter(&self) -> impl Iterator<Item = &'static NetworkProfile> {
        self.profiles.iter()
    }
}

/// Validate that a URL is well-formed and uses HTTP or HTTPS.
pub fn validate_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            (scheme == "http" || scheme == "https") && parsed.host().is_some()
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_valid() {
        let table = NetworkTable::load().unwrap();
        assert_eq!(table.iter().count(), 10);
    }

    #[test]
    fn lookup_returns_matching_profile() {
        let table = NetworkTable::load().unwrap();
        let profile = table.get("baseTestnet").unwrap();
        assert_eq!(profile.rpc_url, "https://sepolia.base.org");
        assert_eq!(profile.explorer.chain_id, 84532);
        assert_eq!(
            profile.explorer.api_key,
            ApiKeySource::Env("API_KEY_BASESCAN_TESTNET")
        );
    }

    #[test]
    fn default_network_is_in_table() {
        let table = NetworkTable::load().unwrap();
        let profile = table.get(crate::constants::DEFAULT_NETWORK).unwrap();
        assert_eq!(profile.explorer.chain_id, 80084);
    }

    #[test]
    fn lookup_of_unknown_network_lists_known_ones() {
        let table = NetworkTable::load().unwrap();
        let err = table.get("polygon").unwrap_err();
        match err {
            ScriptError::Configuration(msg) => {
                assert!(msg.contains("polygon"));
                assert!(msg.contains("ethMainnet"));
                assert!(msg.contains("berachainTestnet"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn chain_ids_are_unique() {
        let table = NetworkTable::load().unwrap();
        let ids: HashSet<u64> = table.iter().map(|p| p.explorer.chain_id).collect();
        assert_eq!(ids.len(), NETWORKS.len());
    }

    #[test]
    fn every_network_shares_the_private_key_env() {
        assert!(NETWORKS.iter().all(|p| p.key_env == PRIVATE_KEY_ENV));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        static DUPLICATED: [NetworkProfile; 2] = [NETWORKS[0], NETWORKS[0]];
        let err = NetworkTable::from_profiles(&DUPLICATED).unwrap_err();
        assert!(matches!(err, ScriptError::Configuration(_)));
    }

    #[test]
    fn invalid_urls_are_rejected() {
        static BROKEN: [NetworkProfile; 1] = [NetworkProfile {
            name: "broken",
            rpc_url: "not a url",
            key_env: PRIVATE_KEY_ENV,
            explorer: NETWORKS[0].explorer,
        }];
        assert!(NetworkTable::from_profiles(&BROKEN).is_err());
    }

    #[test]
    fn env_api_key_must_be_present() {
        let source = ApiKeySource::Env("API_KEY_ETHERSCAN_MAINNET");
        assert!(source.resolve(|_| None).is_err());
        assert!(source.resolve(|_| Some("  ".to_string())).is_err());
        assert_eq!(source.resolve(|_| Some("abc".to_string())).unwrap(), "abc");
    }

    #[test]
    fn placeholder_api_key_ignores_env() {
        let source = ApiKeySource::Placeholder("berachain_bartio");
        assert_eq!(source.resolve(|_| None).unwrap(), "berachain_bartio");
    }

    #[test]
    fn validate_url_accepts_http_and_https() {
        assert!(validate_url("https://rpc.example.com"));
        assert!(validate_url("http://localhost:8545"));
    }

    #[test]
    fn validate_url_rejects_garbage() {
        assert!(!validate_url(""));
        assert!(!validate_url("not a url"));
        assert!(!validate_url("ftp://server.com"));
    }
}
