use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::classifier::Classifier;
use crate::error::ScrapeError;
use crate::extractor::ExtractionStrategies;

pub const DEFAULT_QUERIES: [&str; 6] = [
    "Data Analyst",
    "Business Analyst",
    "BI Analyst",
    "Reporting Analyst",
    "Analytics Executive",
    "Junior Data Analyst",
];

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Everything a run needs. Missing keys in the JSON file fall back to the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub location: String,
    pub queries: Vec<String>,
    pub max_pages: u32,
    pub timeout_secs: u64,
    pub delay_secs: u64,
    pub platform: String,
    pub user_agent: String,
    pub accept_language: String,
    /// Substrings the job board glues onto titles (e.g. the "new" badge).
    pub title_noise: Vec<String>,
    pub selectors: ExtractionStrategies,
    pub store_path: Option<PathBuf>,
    pub classifier: Classifier,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://in.indeed.com".to_string(),
            location: "India".to_string(),
            queries: DEFAULT_QUERIES.iter().map(|q| q.to_string()).collect(),
            max_pages: 5,
            timeout_secs: 10,
            delay_secs: 2,
            platform: "Indeed".to_string(),
            user_agent: BROWSER_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.5".to_string(),
            title_noise: vec!["new".to_string()],
            selectors: ExtractionStrategies::default(),
            store_path: None,
            classifier: Classifier::default(),
        }
    }
}

impl Config {
    /// Load from `path` if given (it must exist), else from the user config
    /// dir if a file is there, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ScrapeError> {
        match path {
            Some(p) => Self::from_file(p),
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ScrapeError> {
        let raw = fs::read_to_string(path).map_err(|e| ScrapeError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config: Config = serde_json::from_str(&raw).map_err(|e| ScrapeError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "jobscout")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    pub fn store_path(&self) -> PathBuf {
        self.store_path.clone().unwrap_or_else(default_store_path)
    }
}

fn default_store_path() -> PathBuf {
    // Use XDG data directory or fallback
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobscout") {
        proj_dirs.data_dir().join("tracker.csv")
    } else {
        PathBuf::from("tracker.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_board_conventions() {
        let config = Config::default();
        assert_eq!(config.queries.len(), 6);
        assert_eq!(config.max_pages, 5);
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.delay_secs, 2);
        assert_eq!(config.platform, "Indeed");
        assert_eq!(config.classifier.startup_name_threshold, 15);
    }

    #[test]
    fn test_partial_file_keeps_remaining_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"location": "Bengaluru", "classifier": {{"startup_name_threshold": 10}}}}"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.location, "Bengaluru");
        assert_eq!(config.classifier.startup_name_threshold, 10);
        assert!(config.classifier.mnc_keywords.contains(&"infosys".to_string()));
        assert_eq!(config.max_pages, 5);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ScrapeError::Config { .. }));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = Config::load(Some(Path::new("/nonexistent/jobscout.json"))).unwrap_err();
        assert!(matches!(err, ScrapeError::Config { .. }));
    }
}
