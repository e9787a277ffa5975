use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use std::thread;
use std::time::Duration;

use crate::config::Config;
use crate::error::{FetchError, ScrapeError};
use crate::models::RawPage;

/// Results per page on the search board. Offsets step by this.
pub const PAGE_SIZE: usize = 10;

/// Where result pages come from.
///
/// Callers must call `pause` after every successful `fetch` before issuing
/// the next one.
pub trait PageSource {
    fn fetch(&self, query: &str, location: &str, page_index: u32) -> Result<RawPage, FetchError>;
    fn pause(&self);
}

pub struct HttpFetcher {
    client: Client,
    base_url: String,
    delay: Duration,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(&config.user_agent)?);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, header_value(&config.accept_language)?);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| ScrapeError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            delay: Duration::from_secs(config.delay_secs),
        })
    }
}

fn header_value(value: &str) -> Result<HeaderValue, ScrapeError> {
    HeaderValue::from_str(value)
        .map_err(|e| ScrapeError::Client(format!("invalid header value '{}': {}", value, e)))
}

/// Offset the board expects for a zero-based page index.
pub fn page_offset(page_index: u32) -> usize {
    page_index as usize * PAGE_SIZE
}

impl PageSource for HttpFetcher {
    fn fetch(&self, query: &str, location: &str, page_index: u32) -> Result<RawPage, FetchError> {
        let url = format!("{}/jobs", self.base_url);
        let start = page_offset(page_index).to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("l", location), ("start", start.as_str())])
            .send()
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        let final_url = response.url().to_string();
        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: final_url,
                status: response.status(),
            });
        }

        let body = response.text().map_err(|source| FetchError::Request {
            url: final_url.clone(),
            source,
        })?;

        tracing::debug!(url = %final_url, bytes = body.len(), "fetched page");
        Ok(RawPage {
            url: final_url,
            body,
        })
    }

    fn pause(&self) {
        thread::sleep(self.delay);
    }
}
