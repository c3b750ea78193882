use {
    crate::traits::{Chain, Confirmation},
    alloy::{
        network::{Ethereum, EthereumWallet, TransactionBuilder},
        primitives::{Address, Bytes, TxHash},
        providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
        rpc::{
            client::ClientBuilder,
            types::{TransactionReceipt, TransactionRequest},
        },
        signers::local::{MnemonicBuilder, PrivateKeySigner, coins_bip39::English},
    },
    anyhow::{Context, Result},
    std::time::Duration,
    url::Url,
};

/// Mnemonic of the accounts that Hardhat and Anvil nodes fund at genesis.
const DEV_MNEMONIC: &str = "test test test test test test test test test test test junk";

/// First account of the local development mnemonic.
pub fn dev_account() -> Result<PrivateKeySigner> {
    Ok(MnemonicBuilder::<English>::default()
        .phrase(DEV_MNEMONIC)
        .index(0)?
        .build()?)
}

/// [`Chain`] backed by a JSON-RPC node, signing locally.
pub struct RpcChain {
    provider: DynProvider,
    deployer: Address,
    confirmations: u64,
    timeout: Duration,
}

impl RpcChain {
    pub fn new(url: Url, signer: PrivateKeySigner, confirmations: u64, timeout: Duration) -> Self {
        let deployer = signer.address();
        let rpc = ClientBuilder::default().http(url);
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::new(signer))
            .connect_client(rpc)
            .erased();
        Self::with_provider(provider, deployer, confirmations, timeout)
    }

    pub fn with_provider(
        provider: DynProvider,
        deployer: Address,
        confirmations: u64,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            deployer,
            confirmations,
            timeout,
        }
    }

    /// Watches `tx_hash` with the configured confirmations and timeout.
    fn pending(&self, tx_hash: TxHash) -> PendingTransactionBuilder<Ethereum> {
        PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .with_required_confirmations(self.confirmations)
            .with_timeout(Some(self.timeout))
    }
}

impl From<TransactionReceipt> for Confirmation {
    fn from(receipt: TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            success: receipt.status(),
            contract_address: receipt.contract_address,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        }
    }
}

#[async_trait::async_trait]
impl Chain for RpcChain {
    async fn chain_id(&self) -> Result<u64> {
        Ok(self.provider.get_chain_id().await?)
    }

    fn deployer(&self) -> Address {
        self.deployer
    }

    async fn submit_deployment(&self, code: Bytes) -> Result<TxHash> {
        let tx = TransactionRequest::default()
            .with_from(self.deployer)
            .with_deploy_code(code);
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .context("node rejected the transaction")?;
        Ok(*pending.tx_hash())
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<Confirmation> {
        let receipt = self
            .pending(tx_hash)
            .get_receipt()
            .await
            .with_context(|| {
                format!(
                    "no receipt after {} confirmation(s) within timeout of {:?}",
                    self.confirmations, self.timeout
                )
            })?;
        Ok(receipt.into())
    }

    async fn code_at(&self, address: Address) -> Result<Bytes> {
        Ok(self.provider.get_code_at(address).await?)
    }
}
