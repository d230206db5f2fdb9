use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("no Freesound API key configured")]
    MissingApiKey,

    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("search failed with HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("unexpected search response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type SearchResult<T> = Result<T, SearchError>;
