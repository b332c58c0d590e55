//! Abstract ledger backend and its `solana-client` implementation. Each call
//! is a single blocking request/response; callers needing timeouts or
//! cancellation configure them here, not in the core.

use {
    crate::error::ClientError,
    solana_client::{
        client_error::{ClientError as RpcClientError, ClientErrorKind},
        rpc_client::RpcClient,
        rpc_request::{RpcError, RpcResponseErrorData},
        rpc_response::RpcSimulateTransactionResult,
    },
    solana_sdk::{
        account::Account, commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey,
        signature::Signature, transaction::Transaction,
    },
    std::fmt::Write,
};

/// Capabilities the core needs from a ledger node.
pub trait RpcBackend {
    fn get_balance(&self, address: &Pubkey) -> Result<u64, ClientError>;
    fn get_account_info(&self, address: &Pubkey) -> Result<Option<Account>, ClientError>;
    fn get_program_accounts(
        &self,
        program: &Pubkey,
    ) -> Result<Vec<(Pubkey, Account)>, ClientError>;
    fn get_latest_blockhash(&self) -> Result<Hash, ClientError>;
    fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, ClientError>;
    fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, ClientError>;
}

/// JSON-RPC backend over a blocking [`RpcClient`].
pub struct SolanaRpc {
    client: RpcClient,
}

impl SolanaRpc {
    pub fn new(url: impl ToString) -> Self {
        Self {
            client: RpcClient::new_with_commitment(url.to_string(), CommitmentConfig::confirmed()),
        }
    }
}

impl RpcBackend for SolanaRpc {
    fn get_balance(&self, address: &Pubkey) -> Result<u64, ClientError> {
        self.client.get_balance(address).map_err(backend_error)
    }

    fn get_account_info(&self, address: &Pubkey) -> Result<Option<Account>, ClientError> {
        self.client
            .get_account_with_commitment(address, self.client.commitment())
            .map(|response| response.value)
            .map_err(backend_error)
    }

    fn get_program_accounts(
        &self,
        program: &Pubkey,
    ) -> Result<Vec<(Pubkey, Account)>, ClientError> {
        self.client
            .get_program_accounts(program)
            .map_err(backend_error)
    }

    fn get_latest_blockhash(&self) -> Result<Hash, ClientError> {
        self.client.get_latest_blockhash().map_err(backend_error)
    }

    fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, ClientError> {
        self.client
            .get_minimum_balance_for_rent_exemption(data_len)
            .map_err(backend_error)
    }

    fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, ClientError> {
        self.client
            .send_and_confirm_transaction(transaction)
            .map_err(submit_error)
    }
}

fn backend_error(err: RpcClientError) -> ClientError {
    ClientError::Backend(err.to_string())
}

/// Separates ledger rejection (simulation or execution failure, reported
/// through an RPC response error) from transport failure, and pulls the
/// simulation logs into the rejection detail when present.
fn submit_error(err: RpcClientError) -> ClientError {
    if let ClientErrorKind::RpcError(RpcError::RpcResponseError {
        code,
        message,
        data,
    }) = &err.kind
    {
        let mut detail = format!("{message} ({code})");
        if let RpcResponseErrorData::SendTransactionPreflightFailure(
            RpcSimulateTransactionResult {
                logs: Some(logs), ..
            },
        ) = data
        {
            for log in logs {
                let _ = write!(detail, "\n  {log}");
            }
        }
        ClientError::Rejected(detail)
    } else {
        ClientError::Backend(err.to_string())
    }
}
