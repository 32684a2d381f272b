//! The `Network` capability object.
//!
//! Every builder of this workspace is pure; everything that actually touches
//! the ledger goes through this trait, passed explicitly into pipeline and
//! composer calls. This replaces the implicit global provider the protocol's
//! original deployment scripts leaned on, and lets tests substitute a
//! scripted double.

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::{Transaction, TransactionError},
};
use thiserror::Error;

pub type NetworkResult<T> = Result<T, NetworkError>;

/// Failure of a network call, pre-classified for the retry loop.
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    /// Transient: timeouts, unreachable nodes, expired blockhashes. Retried
    /// with a fresh blockhash.
    #[error("transport error: {0}")]
    Transport(String),

    /// Fatal: the program (or the runtime's signature/format checks) refused
    /// the transaction. Never retried.
    #[error("rejected: {0}")]
    Rejected(String),
}

impl NetworkError {
    pub fn is_transient(&self) -> bool {
        matches!(self, NetworkError::Transport(_))
    }
}

/// Minimal ledger surface needed by the pipeline and the read-back client.
#[async_trait]
pub trait Network: Send + Sync {
    async fn latest_blockhash(&self) -> NetworkResult<Hash>;

    async fn send_transaction(&self, tx: &Transaction) -> NetworkResult<Signature>;

    /// Whether `signature` has reached the configured commitment.
    async fn confirm_signature(&self, signature: &Signature) -> NetworkResult<bool>;

    /// Raw account bytes, or `None` if the account does not exist.
    async fn account_data(&self, address: &Pubkey) -> NetworkResult<Option<Vec<u8>>>;
}

/// RPC-backed [`Network`] over the nonblocking Solana client.
pub struct RpcNetwork {
    rpc_client: RpcClient,
    commitment: CommitmentConfig,
    skip_preflight: bool,
}

impl RpcNetwork {
    pub fn new(rpc_url: String, commitment: CommitmentConfig) -> Self {
        Self {
            rpc_client: RpcClient::new_with_commitment(rpc_url, commitment),
            commitment,
            skip_preflight: false,
        }
    }

    pub fn with_skip_preflight(mut self, skip_preflight: bool) -> Self {
        self.skip_preflight = skip_preflight;
        self
    }

    pub fn rpc_client(&self) -> &RpcClient {
        &self.rpc_client
    }

    /// Splits an RPC failure into transient vs. fatal. A `BlockhashNotFound`
    /// carries a `TransactionError` but is still transient: re-signing with a
    /// fresh blockhash is exactly the retry path.
    fn classify(err: solana_client::client_error::ClientError) -> NetworkError {
        match err.get_transaction_error() {
            Some(TransactionError::BlockhashNotFound) => {
                NetworkError::Transport("blockhash not found".to_string())
            }
            Some(tx_err) => NetworkError::Rejected(tx_err.to_string()),
            None => NetworkError::Transport(err.to_string()),
        }
    }
}

#[async_trait]
impl Network for RpcNetwork {
    async fn latest_blockhash(&self) -> NetworkResult<Hash> {
        self.rpc_client
            .get_latest_blockhash()
            .await
            .map_err(Self::classify)
    }

    async fn send_transaction(&self, tx: &Transaction) -> NetworkResult<Signature> {
        let config = solana_client::rpc_config::RpcSendTransactionConfig {
            skip_preflight: self.skip_preflight,
            preflight_commitment: Some(self.commitment.commitment),
            encoding: None,
            max_retries: Some(0),
            min_context_slot: None,
        };
        self.rpc_client
            .send_transaction_with_config(tx, config)
            .await
            .map_err(Self::classify)
    }

    async fn confirm_signature(&self, signature: &Signature) -> NetworkResult<bool> {
        self.rpc_client
            .confirm_transaction_with_commitment(signature, self.commitment)
            .await
            .map(|response| response.value)
            .map_err(Self::classify)
    }

    async fn account_data(&self, address: &Pubkey) -> NetworkResult<Option<Vec<u8>>> {
        self.rpc_client
            .get_account_with_commitment(address, self.commitment)
            .await
            .map(|response| response.value.map(|account| account.data))
            .map_err(Self::classify)
    }
}
