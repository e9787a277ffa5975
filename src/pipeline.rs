use chrono::{Local, NaiveDate};
use std::collections::HashSet;
use std::thread::{self, JoinHandle};

use crate::classifier::Classifier;
use crate::config::Config;
use crate::error::ScrapeError;
use crate::extractor::Extractor;
use crate::fetcher::{HttpFetcher, PAGE_SIZE, PageSource};
use crate::models::{ApplicationStatus, JobRecord, RawJobCard};
use crate::store::{self, Store};

/// Outcome of one run. Immutable once returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    pub records_added: usize,
    pub total_records: usize,
    pub records_scraped: usize,
    pub pages_fetched: usize,
    pub pages_failed: usize,
}

pub struct Pipeline<S: PageSource> {
    source: S,
    extractor: Extractor,
    classifier: Classifier,
    store: Store,
    location: String,
    platform: String,
}

impl Pipeline<HttpFetcher> {
    pub fn from_config(config: &Config) -> Result<Self, ScrapeError> {
        Ok(Pipeline::new(
            HttpFetcher::new(config)?,
            Extractor::new(&config.selectors, &config.title_noise)?,
            config,
        ))
    }
}

impl<S: PageSource> Pipeline<S> {
    pub fn new(source: S, extractor: Extractor, config: &Config) -> Self {
        Self {
            source,
            extractor,
            classifier: config.classifier.clone(),
            store: Store::open(config.store_path()),
            location: config.location.clone(),
            platform: config.platform.clone(),
        }
    }

    pub fn run(&self, queries: &[String], max_pages: u32) -> Result<RunResult, ScrapeError> {
        // Fail on a corrupt tracker before spending any requests
        let existing = self.store.read()?;
        let today = Local::now().date_naive();

        tracing::info!(
            queries = queries.len(),
            max_pages,
            existing = existing.len(),
            "starting scrape run"
        );

        let mut result = RunResult::default();
        let mut incoming = Vec::new();

        for query in queries {
            tracing::info!(query = %query, "searching");
            for page_index in 0..max_pages {
                let page = match self.source.fetch(query, &self.location, page_index) {
                    Ok(page) => page,
                    Err(e) => {
                        tracing::warn!(query = %query, page = page_index + 1, "skipping page: {}", e);
                        result.pages_failed += 1;
                        continue;
                    }
                };
                result.pages_fetched += 1;
                self.source.pause();

                let cards = self.extractor.extract(&page);
                if cards.is_empty() {
                    tracing::info!(query = %query, page = page_index + 1, "no jobs on page");
                    break;
                }

                let found = cards.len();
                incoming.extend(cards.into_iter().map(|card| self.assemble(card, today)));
                tracing::info!(query = %query, page = page_index + 1, found, "page scraped");

                if found < PAGE_SIZE {
                    break;
                }
            }
        }

        result.records_scraped = incoming.len();
        tracing::info!(scraped = result.records_scraped, "scrape finished");

        if incoming.is_empty() {
            result.total_records = existing.len();
            return Ok(result);
        }

        // Duplicate rows already on disk collapse in the merge; they are not losses
        let existing_count = existing
            .iter()
            .map(JobRecord::identity_key)
            .collect::<HashSet<_>>()
            .len();

        let merged = store::merge(existing, incoming);
        self.store.write(&merged)?;

        result.records_added = merged.len() - existing_count;
        result.total_records = merged.len();
        tracing::info!(
            added = result.records_added,
            total = result.total_records,
            path = %self.store.path().display(),
            "tracker updated"
        );
        Ok(result)
    }

    fn assemble(&self, card: RawJobCard, today: NaiveDate) -> JobRecord {
        let company_type = self.classifier.classify(&card.company);
        JobRecord {
            title: card.title,
            company: card.company,
            location: card.location,
            source: self.platform.clone(),
            company_type,
            status: ApplicationStatus::NotApplied,
            date_added: today,
        }
    }
}

/// A run on its own thread. Poll with `is_finished`, collect with `join`.
pub struct RunHandle {
    handle: JoinHandle<Result<RunResult, ScrapeError>>,
}

impl RunHandle {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn join(self) -> Result<RunResult, ScrapeError> {
        match self.handle.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

pub fn spawn_run<S>(pipeline: Pipeline<S>, queries: Vec<String>, max_pages: u32) -> RunHandle
where
    S: PageSource + Send + 'static,
{
    RunHandle {
        handle: thread::spawn(move || pipeline.run(&queries, max_pages)),
    }
}
