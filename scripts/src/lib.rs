//! Scripts for deploying contracts to EVM networks and verifying their sources
//! on the network explorers.

pub mod accounts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod errors;
pub mod networks;
pub mod prompt;
pub mod script;

/// Our compiled artifacts utils
pub mod build;

/// Our deploy utils
pub mod deploy;

/// Our explorer verification utils
pub mod verify;

// Our output utils
pub mod output_writer;

pub mod tx;

#[cfg(test)]
mod mock_server;
