pub mod arguments;
pub mod artifact;
pub mod chain;
pub mod deploy;
pub mod report;
pub mod traits;

use {
    crate::{
        arguments::Arguments,
        artifact::{Artifacts, ContractFactory},
        chain::RpcChain,
        deploy::Deployer,
        traits::Chain,
    },
    alloy::primitives::Address,
    anyhow::{Context, Result},
    std::io::Write,
};

/// Deploys the configured contract and reports its address to `out`.
///
/// The contract factory is resolved before any connection to the node is
/// made.
pub async fn run(args: Arguments, out: &mut impl Write) -> Result<Address> {
    report::deploying(out, &args.contract)?;

    let factory = Artifacts::new(&args.artifacts)
        .factory(&args.contract)
        .with_context(|| format!("failed to resolve contract factory {}", args.contract))?;

    let signer = match args.private_key {
        Some(signer) => signer,
        None => {
            tracing::warn!("no private key configured, deploying from the development account");
            chain::dev_account()?
        }
    };
    let chain = RpcChain::new(
        args.node_url,
        signer,
        args.confirmations,
        args.confirmation_timeout,
    );
    deploy_and_report(&chain, &factory, out).await
}

/// Deploys `factory` through `chain`. The address is written to `out` only
/// once the deployment is confirmed.
pub async fn deploy_and_report(
    chain: &dyn Chain,
    factory: &ContractFactory,
    out: &mut impl Write,
) -> Result<Address> {
    let deployment = Deployer::new(chain).deploy(factory).await?;
    report::deployed(out, &deployment.address)?;
    Ok(deployment.address)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            artifact::fixtures,
            traits::{Confirmation, MockChain},
        },
        alloy::primitives::{Bytes, TxHash, address},
        anyhow::anyhow,
        clap::Parser,
        tempfile::TempDir,
    };

    const ADDRESS: Address = address!("0xABCdef1234567890ABCdef1234567890ABCdef12");

    fn factory() -> ContractFactory {
        let dir = TempDir::new().unwrap();
        fixtures::write_keri_anchor(dir.path());
        Artifacts::new(dir.path()).factory("KERIAnchor").unwrap()
    }

    fn chain(confirm: impl Fn() -> Result<Confirmation> + Send + Sync + 'static) -> MockChain {
        let mut chain = MockChain::new();
        chain.expect_chain_id().returning(|| Ok(1337));
        chain.expect_deployer().return_const(Address::repeat_byte(1));
        chain
            .expect_submit_deployment()
            .returning(|_| Ok(TxHash::repeat_byte(2)));
        chain.expect_confirm().returning(move |_| confirm());
        chain
            .expect_code_at()
            .returning(|_| Ok(Bytes::from_static(&[0x60, 0x80])));
        chain
    }

    #[tokio::test]
    async fn reports_confirmed_address() {
        observe::tracing::initialize_reentrant("anchor_deployer=debug");
        let chain = chain(|| {
            Ok(Confirmation {
                tx_hash: TxHash::repeat_byte(2),
                success: true,
                contract_address: Some(ADDRESS),
                block_number: Some(1),
                gas_used: 100_000,
            })
        });

        let mut out = Vec::new();
        let address = deploy_and_report(&chain, &factory(), &mut out)
            .await
            .unwrap();
        assert_eq!(address, ADDRESS);

        let out = String::from_utf8(out).unwrap();
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], format!("✅ Contract deployed to: {ADDRESS}"));
        assert_eq!(lines[1], "");
        assert_eq!(lines[3], format!("CONTRACT_ADDRESS={ADDRESS}"));
        assert_eq!(
            lines[0].rsplit(' ').next(),
            lines[3].strip_prefix("CONTRACT_ADDRESS=")
        );
    }

    #[tokio::test]
    async fn failed_confirmation_reports_nothing() {
        let chain = chain(|| Err(anyhow!("timeout")));

        let mut out = Vec::new();
        let err = deploy_and_report(&chain, &factory(), &mut out)
            .await
            .unwrap_err();
        assert!(format!("{err:?}").contains("timeout"));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn unresolvable_factory_stops_before_connecting() {
        let dir = TempDir::new().unwrap();
        let artifacts = dir.path().to_str().unwrap();
        let args = Arguments::try_parse_from([
            "deploy-anchor",
            "--artifacts",
            artifacts,
            "--node-url",
            "http://127.0.0.1:1",
        ])
        .unwrap();

        let mut out = Vec::new();
        let err = run(args, &mut out).await.unwrap_err();
        let err = format!("{err:?}");
        assert!(
            err.contains("failed to resolve contract factory KERIAnchor"),
            "{err}"
        );
        assert!(err.contains("artifact for KERIAnchor not found"), "{err}");
        assert_eq!(String::from_utf8(out).unwrap(), "Deploying KERIAnchor...\n");
    }
}
