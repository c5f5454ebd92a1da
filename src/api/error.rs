use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to fetch download links. Please check the URL and try again.")]
    FetchFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("No data found for this link.")]
    NoData,

    #[error("Invalid API endpoint {endpoint}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
}

impl ApiError {
    pub fn fetch_failed<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        ApiError::FetchFailed(err.into())
    }
}
