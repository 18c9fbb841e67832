use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes, TxHash},
    providers::Provider,
    rpc::types::eth::TransactionRequest,
};
use tracing::info;

use crate::{errors::ScriptError, tx::client::RpcProvider};

/// Outcome of a mined contract creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreationReceipt {
    /// Address of the created contract
    pub address: Address,
    /// Hash of the creation transaction
    pub tx_hash: TxHash,
}

/// Predict the address of the next contract created by `deployer`
pub async fn predict_contract_address(
    client: &RpcProvider,
    deployer: Address,
) -> Result<Address, ScriptError> {
    let nonce = client
        .get_transaction_count(deployer)
        .await
        .map_err(|e| ScriptError::NonceFetching(e.to_string()))?;

    Ok(deployer.create(nonce))
}

/// Send a contract creation transaction and wait for `confirmations` blocks
pub async fn send_creation_transaction(
    client: &RpcProvider,
    deploy_code: Bytes,
    confirmations: u64,
) -> Result<CreationReceipt, ScriptError> {
    // Build the tx
    let tx_request = TransactionRequest::default().with_deploy_code(deploy_code);

    // Send it
    let pending_tx = client
        .send_transaction(tx_request)
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
    info!("Pending deploy transaction... {}", pending_tx.tx_hash());

    // Wait for the transaction to be included and confirmed
    let receipt = pending_tx
        .with_required_confirmations(confirmations)
        .get_receipt()
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

    if !receipt.status() {
        return Err(ScriptError::ContractDeployment(format!(
            "creation transaction {} reverted",
            receipt.transaction_hash
        )));
    }

    let address = receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment(format!(
            "no contract address in receipt of {}",
            receipt.transaction_hash
        ))
    })?;
    info!(
        "Deploy tx done on block: {}",
        receipt
            .block_number
            .map_or_else(|| "pending".to_string(), |block| block.to_string())
    );

    Ok(CreationReceipt {
        address,
        tx_hash: receipt.transaction_hash,
    })
}
