use thiserror::Error;
use tidepool_batch_tx::TxBatchError;
use tidepool_sdk::SdkError;

pub type ComposeResult<T> = Result<T, ComposeError>;

/// Errors of environment composition.
///
/// `Config` failures happen before any network call and are never retried.
/// `Broadcast` failures carry the group label (`root`, `pool 2`) so a
/// partially applied run can be resumed against the right pool.
#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("instruction build failed: {0}")]
    Sdk(#[from] SdkError),

    #[error("packing failed for {label}: {source}")]
    Packing {
        label: String,
        source: TxBatchError,
    },

    #[error("broadcast failed for {label}: {source}")]
    Broadcast {
        label: String,
        source: TxBatchError,
    },
}
