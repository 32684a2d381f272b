use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Composition failed: {0}")]
    Compose(#[from] tidepool_deploy::ComposeError),

    #[error("Broadcast failed: {0}")]
    Batch(#[from] tidepool_batch_tx::TxBatchError),

    #[error("Instruction build failed: {0}")]
    Sdk(#[from] tidepool_sdk::SdkError),

    #[error("Read-back failed: {0}")]
    Client(#[from] tidepool_client::ClientError),
}
