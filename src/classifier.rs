use serde::{Deserialize, Serialize};

use crate::models::CompanyType;

const DEFAULT_MNC_KEYWORDS: [&str; 18] = [
    "microsoft",
    "google",
    "amazon",
    "accenture",
    "tcs",
    "infosys",
    "wipro",
    "cognizant",
    "ibm",
    "oracle",
    "sap",
    "deloitte",
    "pwc",
    "ey",
    "kpmg",
    "capgemini",
    "tech mahindra",
    "hcl",
];

/// Name-only company sizing. Deliberately crude: a keyword hit means MNC,
/// a short name means Startup, anything else is Mid-size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Classifier {
    pub mnc_keywords: Vec<String>,
    pub startup_name_threshold: usize,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            mnc_keywords: DEFAULT_MNC_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            startup_name_threshold: 15,
        }
    }
}

impl Classifier {
    pub fn classify(&self, company_name: &str) -> CompanyType {
        let lower = company_name.to_lowercase();

        // Keyword match wins regardless of length
        if self
            .mnc_keywords
            .iter()
            .any(|keyword| lower.contains(&keyword.to_lowercase()))
        {
            return CompanyType::MNC;
        }

        if company_name.chars().count() < self.startup_name_threshold {
            return CompanyType::Startup;
        }

        CompanyType::MidSize
    }
}
