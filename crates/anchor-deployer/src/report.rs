//! Console output of the deployer. Stdout carries nothing else, so the lines
//! below can be relied on by scripts.

use {
    alloy::primitives::Address,
    std::io::{self, Write},
};

/// Key under which the address is expected in the `.env` file.
pub const ENV_KEY: &str = "CONTRACT_ADDRESS";

pub fn deploying(out: &mut impl Write, contract: &str) -> io::Result<()> {
    writeln!(out, "Deploying {contract}...")?;
    out.flush()
}

/// Prints the address once as confirmation and once as a `.env` line.
pub fn deployed(out: &mut impl Write, address: &Address) -> io::Result<()> {
    let address = address.to_string();
    writeln!(out, "✅ Contract deployed to: {address}")?;
    writeln!(out)?;
    writeln!(out, "📝 Copy this address to your .env file:")?;
    writeln!(out, "{ENV_KEY}={address}")?;
    out.flush()
}
