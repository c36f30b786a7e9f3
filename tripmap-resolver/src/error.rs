use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{url} answered {status} instead of a redirect")]
    NotRedirected { url: String, status: u16 },

    #[error("Redirect from {0} carried no usable Location header")]
    MissingLocation(String),

    #[error("Cache error: {0}")]
    Cache(String),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
