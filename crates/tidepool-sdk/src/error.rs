use thiserror::Error;

pub type SdkResult<T> = Result<T, SdkError>;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("instruction serialization failed: {0}")]
    Serialization(String),

    #[error("missing account reference: {0}")]
    MissingAccount(&'static str),
}
