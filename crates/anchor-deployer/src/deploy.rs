use {
    crate::{
        artifact::ContractFactory,
        traits::{Chain, Confirmation},
    },
    alloy::primitives::Address,
    anyhow::{Context, Result, ensure},
};

/// A contract instance that is confirmed on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub address: Address,
    pub confirmation: Confirmation,
}

pub struct Deployer<'a> {
    chain: &'a dyn Chain,
}

impl<'a> Deployer<'a> {
    pub fn new(chain: &'a dyn Chain) -> Self {
        Self { chain }
    }

    /// Creates a new instance of the factory's contract without constructor
    /// arguments and waits until it is confirmed.
    ///
    /// The returned address is only produced once the transaction succeeded
    /// and code is present at it.
    pub async fn deploy(&self, factory: &ContractFactory) -> Result<Deployment> {
        let chain_id = self
            .chain
            .chain_id()
            .await
            .context("failed to connect to the node")?;
        tracing::info!(
            chain_id,
            deployer = %self.chain.deployer(),
            contract = %factory.qualified_name(),
            "deploying contract"
        );

        let tx_hash = self
            .chain
            .submit_deployment(factory.bytecode.clone())
            .await
            .context("failed to submit deployment transaction")?;
        tracing::info!(?tx_hash, "waiting for deployment confirmation");

        let confirmation = self
            .chain
            .confirm(tx_hash)
            .await
            .with_context(|| format!("deployment transaction {tx_hash} was not confirmed"))?;
        ensure!(
            confirmation.success,
            "deployment transaction {tx_hash} reverted"
        );
        let address = confirmation
            .contract_address
            .with_context(|| format!("receipt of {tx_hash} carries no contract address"))?;

        // A node can report a receipt before the code is queryable.
        let code = self
            .chain
            .code_at(address)
            .await
            .with_context(|| format!("failed to fetch code at {address}"))?;
        ensure!(!code.is_empty(), "no code at {address} after deployment");

        tracing::info!(
            %address,
            block = ?confirmation.block_number,
            gas_used = confirmation.gas_used,
            "contract deployed"
        );
        Ok(Deployment {
            address,
            confirmation,
        })
    }
}
