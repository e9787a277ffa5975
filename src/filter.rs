use std::collections::BTreeMap;

use crate::models::{ApplicationStatus, CompanyType, JobRecord};

#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub status: Option<ApplicationStatus>,
    pub company_type: Option<CompanyType>,
    /// Case-insensitive match against title, company or location.
    pub search: Option<String>,
}

impl JobFilter {
    pub fn matches(&self, job: &JobRecord) -> bool {
        if self.status.is_some_and(|s| s != job.status) {
            return false;
        }
        if self.company_type.is_some_and(|t| t != job.company_type) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                [&job.title, &job.company, &job.location]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&term))
            }
            _ => true,
        }
    }

    pub fn apply<'a>(&self, jobs: &'a [JobRecord]) -> Vec<&'a JobRecord> {
        jobs.iter().filter(|job| self.matches(job)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.company_type.is_none()
            && self.search.as_deref().is_none_or(|s| s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub not_applied: usize,
    pub applied: usize,
    pub by_company_type: BTreeMap<&'static str, usize>,
}

impl Summary {
    pub fn of<'a>(jobs: impl IntoIterator<Item = &'a JobRecord>) -> Self {
        let mut summary = Summary::default();
        for job in jobs {
            summary.total += 1;
            match job.status {
                ApplicationStatus::NotApplied => summary.not_applied += 1,
                ApplicationStatus::Applied => summary.applied += 1,
            }
            *summary
                .by_company_type
                .entry(job.company_type.as_str())
                .or_insert(0) += 1;
        }
        summary
    }

    /// Company type distribution as (type, count, percent of total).
    pub fn company_type_shares(&self) -> Vec<(&'static str, usize, f64)> {
        self.by_company_type
            .iter()
            .map(|(ty, &count)| (*ty, count, percent(count, self.total)))
            .collect()
    }
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}
