use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::NetworkError;

/// Errors of the batching and broadcast layer.
#[derive(Error, Debug)]
pub enum TxBatchError {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("envelope failed after retrying for {elapsed_secs}s: {last_error}")]
    RetriesExhausted {
        elapsed_secs: u64,
        last_error: String,
    },

    #[error("transaction rejected by the program: {0}")]
    Rejected(String),

    #[error("single instruction exceeds envelope limits: {size} bytes (max {max})")]
    TransactionTooLarge { size: usize, max: usize },

    #[error("no instructions provided")]
    NoInstructions,

    #[error("missing required signer {0}")]
    MissingSigner(Pubkey),

    #[error("failed to sign transaction: {0}")]
    Signing(String),
}
