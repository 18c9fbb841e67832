use alloy::{
    network::{Ethereum, EthereumWallet},
    providers::{
        fillers::{ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller, WalletFiller},
        Identity, Provider, ProviderBuilder, ReqwestProvider,
    },
};
use reqwest::{Client, Url};
use tracing::info;

use crate::{accounts::SigningAccount, errors::ScriptError};

/// Re-export from alloy recommend filter
type RecommendFiller =
    JoinFill<JoinFill<JoinFill<Identity, GasFiller>, NonceFiller>, ChainIdFiller>;

/// An alloy provider that uses a local signer to generate signatures
/// & interfaces with the RPC endpoint over HTTP
pub type RpcProvider = FillProvider<
    JoinFill<RecommendFiller, WalletFiller<EthereumWallet>>,
    ReqwestProvider,
    alloy::transports::http::Http<Client>,
    Ethereum,
>;

/// Build the RPC provider of `rpc_url`, signing with the given account.
/// No request is sent until the provider is used.
pub fn create_rpc_provider(
    rpc_url: &str,
    account: &SigningAccount,
) -> Result<RpcProvider, ScriptError> {
    let url = rpc_url
        .parse::<Url>()
        .map_err(|e| ScriptError::Configuration(format!("invalid RPC URL {rpc_url}: {e}")))?;

    let wallet = EthereumWallet::from(account.signer.clone());

    // Create our provider with the rpc client + signer
    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(wallet)
        .on_http(url);

    Ok(provider)
}

/// Fetch the chain ID served by the provider and make sure it is the expected one
pub async fn ensure_chain_id(client: &RpcProvider, expected: u64) -> Result<(), ScriptError> {
    let chain_id = client
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    if chain_id != expected {
        return Err(ScriptError::Configuration(format!(
            "RPC endpoint serves chain ID {chain_id}, expected {expected}"
        )));
    }

    info!("Connected to chain ID: {}", chain_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        accounts::AccountSet,
        mock_server::{rpc_method, rpc_result, MockServer},
    };

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    async fn chain_server(chain_id: u64) -> MockServer {
        MockServer::start(move |_, body| match rpc_method(body).as_str() {
            "eth_chainId" => rpc_result(body, json!(format!("{chain_id:#x}"))),
            _ => rpc_result(body, json!(null)),
        })
        .await
    }

    fn provider(server: &MockServer) -> RpcProvider {
        let accounts = AccountSet::from_key_material(Some(KEY), "PRIVATE_KEY").unwrap();
        create_rpc_provider(&server.url("/"), accounts.select(0).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn matching_chain_id_is_accepted() {
        let server = chain_server(84532).await;
        ensure_chain_id(&provider(&server), 84532).await.unwrap();
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn other_chain_id_is_a_configuration_error() {
        let server = chain_server(1).await;
        let err = ensure_chain_id(&provider(&server), 84532).await.unwrap_err();
        assert_eq!(
            err,
            ScriptError::Configuration(
                "RPC endpoint serves chain ID 1, expected 84532".to_string()
            )
        );
    }

    #[test]
    fn malformed_rpc_url_is_rejected() {
        let accounts = AccountSet::from_key_material(Some(KEY), "PRIVATE_KEY").unwrap();
        let err = create_rpc_provider("not a url", accounts.select(0).unwrap()).unwrap_err();
        assert!(matches!(err, ScriptError::Configuration(_)));
    }

    #[tokio::test]
    async fn provider_creation_sends_nothing() {
        let server = chain_server(84532).await;
        let _provider = provider(&server);
        assert!(server.requests().is_empty());
    }
}
