use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApifyError>;

#[derive(Error, Debug)]
pub enum ApifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Apify API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected dataset payload: {0}")]
    Decode(#[from] serde_json::Error),
}
