//! This crate contains the code required to make the deployer binaries
//! observable. For now that is the initialization of logging and a panic hook
//! that reports through it.
pub mod config;
pub mod tracing;
