use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Failed to read tracker '{path}': {reason}")]
    StoreRead { path: PathBuf, reason: String },

    #[error("Scraped records were not saved to '{path}': {reason}")]
    StoreWrite { path: PathBuf, reason: String },

    #[error("Invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    #[error("Invalid title noise pattern: {0}")]
    NoisePattern(#[from] regex::Error),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Failed to load config '{path}': {reason}")]
    Config { path: PathBuf, reason: String },
}

/// A page that could not be fetched. Recoverable: the page is skipped.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// A card that could not be turned into a job. Recoverable: the card is skipped.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("card has no {0}")]
    MissingField(&'static str),
}
