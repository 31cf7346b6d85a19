use thiserror::Error;

/// One failure class at the client boundary. Variants keep the failing
/// mechanism apart for the log; the widget shows a single generic
/// message for all of them.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("catalog returned status {0}")]
    Status(u16),

    #[error("catalog response is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid search url: {0}")]
    Url(#[from] url::ParseError),
}
