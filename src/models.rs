use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder for a field the extractor could not resolve.
pub const SENTINEL: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum CompanyType {
    Startup,
    #[serde(rename = "Mid-size")]
    MidSize,
    MNC,
    Unknown,
}

impl CompanyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyType::Startup => "Startup",
            CompanyType::MidSize => "Mid-size",
            CompanyType::MNC => "MNC",
            CompanyType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for CompanyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Blank or unrecognized cells in the tracker read back as Unknown.
impl From<String> for CompanyType {
    fn from(s: String) -> Self {
        s.parse().unwrap_or(CompanyType::Unknown)
    }
}

impl FromStr for CompanyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "startup" => Ok(CompanyType::Startup),
            "mid-size" | "midsize" => Ok(CompanyType::MidSize),
            "mnc" => Ok(CompanyType::MNC),
            "unknown" => Ok(CompanyType::Unknown),
            other => Err(format!(
                "unknown company type '{}' (expected startup, mid-size, mnc, unknown)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[serde(rename = "Not Applied")]
    NotApplied,
    Applied,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::NotApplied => "Not Applied",
            ApplicationStatus::Applied => "Applied",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "not applied" => Ok(ApplicationStatus::NotApplied),
            "applied" => Ok(ApplicationStatus::Applied),
            other => Err(format!(
                "unknown status '{}' (expected applied, not-applied)",
                other
            )),
        }
    }
}

/// One row of the tracker. Field order here is the column order on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(rename = "Job Title")]
    pub title: String,
    #[serde(rename = "Company Name")]
    pub company: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Platform")]
    pub source: String,
    #[serde(rename = "Company Type")]
    pub company_type: CompanyType,
    #[serde(rename = "Status")]
    pub status: ApplicationStatus,
    #[serde(rename = "Date Added")]
    pub date_added: NaiveDate,
}

impl JobRecord {
    /// Two records with the same key are the same job.
    pub fn identity_key(&self) -> (&str, &str) {
        (&self.title, &self.company)
    }
}

/// A job card as pulled off a results page, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawJobCard {
    pub title: String,
    pub company: String,
    pub location: String,
}

#[derive(Debug, Clone)]
pub struct RawPage {
    pub url: String,
    pub body: String,
}
