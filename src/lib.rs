//! Scrape job-board search results into a deduplicated CSV tracker.
//!
//! A [`Pipeline`] fetches result pages through a [`fetcher::PageSource`],
//! pulls job cards out with the [`extractor::Extractor`], sizes each company
//! with the [`classifier::Classifier`] and merges everything into the
//! [`store::Store`], where previously tracked jobs always win.

pub mod classifier;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod filter;
pub mod models;
pub mod pipeline;
pub mod store;

pub use config::Config;
pub use error::{ExtractionError, FetchError, ScrapeError};
pub use filter::{JobFilter, Summary};
pub use models::{ApplicationStatus, CompanyType, JobRecord};
pub use pipeline::{Pipeline, RunHandle, RunResult, spawn_run};
