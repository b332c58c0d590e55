use {
    solana_sdk::{program_error::ProgramError, signer::SignerError},
    thiserror::Error,
};

/// Errors returned by the lending client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Missing or malformed process configuration. Fatal, raised before any
    /// network call.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A required protocol entity (group, bank, margin account) or oracle
    /// price could not be resolved.
    #[error("not found: {0}")]
    NotFound(String),
    /// The RPC backend or price oracle could not be reached.
    #[error("backend unavailable: {0}")]
    Backend(String),
    /// The ledger rejected the transaction at simulation or execution.
    /// Carries the backend's rejection detail; the client does not retry.
    #[error("transaction rejected: {0}")]
    Rejected(String),
    /// Caller-supplied parameter rejected before any instruction is built.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Fixed-layout decoding of instruction or account bytes failed.
    #[error("failed to decode {0}")]
    Decode(&'static str),
    #[error("failed to sign transaction: {0}")]
    Signing(#[from] SignerError),
    #[error("failed to build token instruction: {0}")]
    TokenInstruction(#[from] ProgramError),
}
