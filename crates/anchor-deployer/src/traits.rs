//! Trait definitions for the network boundary.
//!
//! The deployment flow only talks to the node through [`Chain`] so it can be
//! unit tested with mocks.

use {
    alloy::primitives::{Address, Bytes, TxHash},
    anyhow::Result,
};

/// Outcome of waiting for a deployment transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub tx_hash: TxHash,
    /// Whether the transaction executed without reverting.
    pub success: bool,
    /// Address of the contract created by the transaction, if any.
    pub contract_address: Option<Address>,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// Abstracts the node and the signing account used for the deployment.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Chain: Send + Sync {
    /// Chain id reported by the node.
    async fn chain_id(&self) -> Result<u64>;

    /// Address of the account that signs and pays for the deployment.
    fn deployer(&self) -> Address;

    /// Signs and broadcasts a contract creation transaction carrying `code`.
    async fn submit_deployment(&self, code: Bytes) -> Result<TxHash>;

    /// Blocks until the transaction is confirmed and returns its receipt.
    async fn confirm(&self, tx_hash: TxHash) -> Result<Confirmation>;

    /// Returns the runtime code stored at `address`.
    async fn code_at(&self, address: Address) -> Result<Bytes>;
}
