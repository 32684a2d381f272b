use thiserror::Error;
use tidepool_batch_tx::NetworkError;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("invalid account data: {0}")]
    InvalidAccountData(String),

    #[error("pool index {0} out of bounds")]
    PoolIndexOutOfBounds(u8),

    #[error("strategy index {0} out of bounds")]
    StrategyIndexOutOfBounds(u8),
}
