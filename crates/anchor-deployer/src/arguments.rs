use {
    alloy::signers::local::PrivateKeySigner,
    std::{path::PathBuf, time::Duration},
    url::Url,
};

#[derive(clap::Parser)]
#[clap(
    name = "deploy-anchor",
    about = "Deploys a compiled contract and prints its address"
)]
pub struct Arguments {
    #[clap(flatten)]
    pub logging: LoggingArguments,

    /// Contract to deploy. Either a bare contract name or a fully qualified
    /// `contracts/Source.sol:Name`.
    #[clap(long, env = "CONTRACT_NAME", default_value = "KERIAnchor")]
    pub contract: String,

    /// Directory holding the Hardhat compilation artifacts.
    #[clap(long, env = "ARTIFACTS_DIR", default_value = "artifacts")]
    pub artifacts: PathBuf,

    /// The Ethereum node URL to connect to.
    #[clap(long, env = "RPC_URL", default_value = "http://127.0.0.1:8545")]
    pub node_url: Url,

    /// Hex encoded private key of the deploying account. Falls back to the
    /// first account of the local development mnemonic.
    #[clap(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<PrivateKeySigner>,

    /// Number of blocks the deployment transaction has to be buried under
    /// before it counts as confirmed.
    #[clap(
        long,
        env,
        default_value = "1",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub confirmations: u64,

    /// How long to wait for the confirmations before giving up.
    #[clap(
        long,
        env,
        default_value = "2m",
        value_parser = humantime::parse_duration,
    )]
    pub confirmation_timeout: Duration,
}

#[derive(clap::Parser)]
pub struct LoggingArguments {
    #[clap(
        long,
        env,
        default_value = "warn,anchor_deployer=info,deploy_anchor=info"
    )]
    pub log_filter: String,

    /// Emit log events as JSON.
    #[clap(long, env)]
    pub log_json: bool,
}

impl LoggingArguments {
    pub fn config(&self) -> observe::config::Config {
        observe::config::Config::new(&self.log_filter, self.log_json)
    }
}

impl std::fmt::Display for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self {
            logging,
            contract,
            artifacts,
            node_url,
            private_key,
            confirmations,
            confirmation_timeout,
        } = self;

        write!(f, "{logging}")?;
        writeln!(f, "contract: {contract}")?;
        writeln!(f, "artifacts: {}", artifacts.display())?;
        writeln!(f, "node_url: {node_url}")?;
        writeln!(
            f,
            "private_key: {}",
            private_key.as_ref().map_or("None", |_| "SECRET")
        )?;
        writeln!(f, "confirmations: {confirmations}")?;
        writeln!(f, "confirmation_timeout: {confirmation_timeout:?}")?;
        Ok(())
    }
}

impl std::fmt::Display for LoggingArguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "log_filter: {}", self.log_filter)?;
        writeln!(f, "log_json: {}", self.log_json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, clap::Parser};

    // Anvil and Hardhat pre-funded account #0.
    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn runs_without_any_arguments() {
        let args = Arguments::try_parse_from(["deploy-anchor"]).unwrap();
        assert_eq!(args.contract, "KERIAnchor");
        assert_eq!(args.artifacts, PathBuf::from("artifacts"));
        assert_eq!(args.node_url.as_str(), "http://127.0.0.1:8545/");
        assert_eq!(args.confirmations, 1);
        assert_eq!(args.confirmation_timeout, Duration::from_secs(120));
        assert!(!args.logging.log_json);
    }

    #[test]
    fn parses_overrides() {
        let args = Arguments::try_parse_from([
            "deploy-anchor",
            "--contract",
            "contracts/KERIAnchor.sol:KERIAnchor",
            "--node-url",
            "https://sepolia.example.org",
            "--private-key",
            KEY,
            "--confirmations",
            "3",
            "--confirmation-timeout",
            "30s",
        ])
        .unwrap();
        assert_eq!(args.contract, "contracts/KERIAnchor.sol:KERIAnchor");
        assert_eq!(args.confirmations, 3);
        assert_eq!(args.confirmation_timeout, Duration::from_secs(30));
        assert_eq!(
            args.private_key.unwrap().address().to_string(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn rejects_malformed_private_key() {
        assert!(
            Arguments::try_parse_from(["deploy-anchor", "--private-key", "0xnothex"]).is_err()
        );
    }

    #[test]
    fn requires_at_least_one_confirmation() {
        assert!(Arguments::try_parse_from(["deploy-anchor", "--confirmations", "0"]).is_err());
        let args = Arguments::try_parse_from(["deploy-anchor", "--confirmations", "12"]).unwrap();
        assert_eq!(args.confirmations, 12);
    }

    #[test]
    fn display_hides_private_key() {
        let args = Arguments::try_parse_from(["deploy-anchor", "--private-key", KEY]).unwrap();
        let shown = args.to_string();
        assert!(shown.contains("private_key: SECRET"));
        assert!(!shown.contains(&KEY[2..]));
    }
}
