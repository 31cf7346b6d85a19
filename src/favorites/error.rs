use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("favorites file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("favorites serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
