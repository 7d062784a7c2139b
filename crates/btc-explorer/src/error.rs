use thiserror::Error;

/// Explorer request errors.
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("invalid explorer url: {0}")]
    InvalidUrl(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("explorer returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid explorer response: {0}")]
    InvalidResponse(String),
}
