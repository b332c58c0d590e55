//! Client for the marginfi v2 lending protocol on Solana.
//!
//! Builds, signs and submits account-creation, deposit and withdraw
//! transactions, and decodes on-chain bank / margin-account state into
//! balance and yield reports. Network transport and price lookups sit
//! behind the [`rpc::RpcBackend`] and [`oracle::PriceOracle`] traits so the
//! core is callable non-interactively and testable offline.

pub mod config;
pub mod constants;
pub mod error;
pub mod instruction;
pub mod oracle;
pub mod pda;
pub mod report;
pub mod rpc;
pub mod session;
pub mod state;
pub mod transaction;

pub use {error::ClientError, session::LendingClient};
