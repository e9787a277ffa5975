use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, ScrapeError};
use crate::models::{RawJobCard, RawPage, SENTINEL};

/// CSS selectors tried in order. For cards the first selector with any match
/// wins; for fields the first element with non-empty text wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionStrategies {
    pub cards: Vec<String>,
    pub title: Vec<String>,
    pub company: Vec<String>,
    pub location: Vec<String>,
}

impl Default for ExtractionStrategies {
    fn default() -> Self {
        fn owned(selectors: &[&str]) -> Vec<String> {
            selectors.iter().map(|s| s.to_string()).collect()
        }

        Self {
            cards: owned(&[
                "div.job_seen_beacon",
                "div[data-jk]",
                "a[data-jk]",
                "div.jobCard",
            ]),
            title: owned(&["h2.jobTitle", "a.jcs-JobTitle", "span[title]"]),
            company: owned(&[
                "span.companyName",
                "a[data-testid='company-name']",
                "span[data-testid='company-name']",
            ]),
            location: owned(&["div.companyLocation", "div[data-testid='text-location']"]),
        }
    }
}

struct FieldStrategy {
    field: &'static str,
    selectors: Vec<Selector>,
}

impl FieldStrategy {
    fn compile(field: &'static str, selectors: &[String]) -> Result<Self, ScrapeError> {
        Ok(Self {
            field,
            selectors: compile_all(selectors)?,
        })
    }

    fn resolve(&self, card: ElementRef) -> Option<String> {
        self.selectors
            .iter()
            .flat_map(|selector| card.select(selector))
            .map(element_text)
            .find(|text| !text.is_empty())
    }
}

pub struct Extractor {
    cards: Vec<Selector>,
    title: FieldStrategy,
    company: FieldStrategy,
    location: FieldStrategy,
    title_noise: Option<TitleNoise>,
}

impl Extractor {
    pub fn new(strategies: &ExtractionStrategies, title_noise: &[String]) -> Result<Self, ScrapeError> {
        Ok(Self {
            cards: compile_all(&strategies.cards)?,
            title: FieldStrategy::compile("title", &strategies.title)?,
            company: FieldStrategy::compile("company", &strategies.company)?,
            location: FieldStrategy::compile("location", &strategies.location)?,
            title_noise: TitleNoise::compile(title_noise)?,
        })
    }

    /// Pull job cards out of one results page. An empty result means the
    /// board has no more results for this query.
    pub fn extract(&self, page: &RawPage) -> Vec<RawJobCard> {
        let document = Html::parse_document(&page.body);

        let Some(cards) = self
            .cards
            .iter()
            .map(|selector| document.select(selector).collect::<Vec<_>>())
            .find(|found| !found.is_empty())
        else {
            return Vec::new();
        };

        let mut jobs = Vec::with_capacity(cards.len());
        for card in cards {
            match self.extract_card(card) {
                Ok(job) => jobs.push(job),
                Err(e) => tracing::debug!(url = %page.url, "skipping card: {}", e),
            }
        }
        jobs
    }

    fn extract_card(&self, card: ElementRef) -> Result<RawJobCard, ExtractionError> {
        let title = self
            .title
            .resolve(card)
            .map(|raw| self.clean_title(&raw))
            .filter(|title| !title.is_empty())
            .ok_or(ExtractionError::MissingField(self.title.field))?;

        let company = self
            .company
            .resolve(card)
            .ok_or(ExtractionError::MissingField(self.company.field))?;

        let location = self
            .location
            .resolve(card)
            .unwrap_or_else(|| SENTINEL.to_string());

        Ok(RawJobCard {
            title,
            company,
            location,
        })
    }

    fn clean_title(&self, raw: &str) -> String {
        match &self.title_noise {
            Some(noise) => noise.strip(raw.trim()),
            None => raw.trim().to_string(),
        }
    }
}

fn compile_all(selectors: &[String]) -> Result<Vec<Selector>, ScrapeError> {
    selectors
        .iter()
        .map(|s| {
            Selector::parse(s).map_err(|e| ScrapeError::Selector {
                selector: s.clone(),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Badge words ("new") the board renders inside the title element.
struct TitleNoise {
    /// A badge glued onto the first word, as in "newData Analyst".
    glued: Regex,
    /// Badges standing as whole words at either end, with any separator
    /// between them and the title.
    edges: Regex,
}

impl TitleNoise {
    fn compile(tokens: &[String]) -> Result<Option<Self>, ScrapeError> {
        let alternatives: Vec<String> = tokens
            .iter()
            .filter(|t| !t.trim().is_empty())
            .map(|t| regex::escape(t.trim()))
            .collect();
        if alternatives.is_empty() {
            return Ok(None);
        }

        let alts = alternatives.join("|");
        // A bare hyphen only separates when spaced, so "new-grad" is a word
        let sep = r"(?:\s*[|:,·–—]\s*|\s+-\s+|\s+)";
        Ok(Some(Self {
            glued: Regex::new(&format!(r"^(?:{alts})(\p{{Lu}})"))?,
            edges: Regex::new(&format!(
                r"^(?:(?:{alts})(?:{sep}|$))+|(?:(?:^|{sep})(?:{alts}))+$"
            ))?,
        }))
    }

    fn strip(&self, title: &str) -> String {
        let unglued = self.glued.replace(title, "${1}");
        self.edges.replace_all(&unglued, "").trim().to_string()
    }
}

fn element_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Extractor {
        Extractor::new(&ExtractionStrategies::default(), &["new".to_string()]).unwrap()
    }

    fn page(body: &str) -> RawPage {
        RawPage {
            url: "https://in.indeed.com/jobs?q=test".to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_extracts_primary_card_layout() {
        let html = r#"
            <div class="job_seen_beacon">
              <h2 class="jobTitle"><span class="new">new</span> <a><span>Data Analyst</span></a></h2>
              <span class="companyName">Acme Corp</span>
              <div class="companyLocation">Pune, Maharashtra</div>
            </div>
            <div class="job_seen_beacon">
              <h2 class="jobTitle"><a>BI Analyst</a></h2>
              <span class="companyName">Foo</span>
              <div class="companyLocation">Remote</div>
            </div>"#;

        let cards = extractor().extract(&page(html));
        assert_eq!(
            cards,
            vec![
                RawJobCard {
                    title: "Data Analyst".to_string(),
                    company: "Acme Corp".to_string(),
                    location: "Pune, Maharashtra".to_string(),
                },
                RawJobCard {
                    title: "BI Analyst".to_string(),
                    company: "Foo".to_string(),
                    location: "Remote".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_falls_back_to_data_attribute_cards_and_testid_fields() {
        let html = r#"
            <div data-jk="abc123">
              <a class="jcs-JobTitle"><span>Reporting Analyst</span></a>
              <span data-testid="company-name">Globex Solutions</span>
              <div data-testid="text-location">Chennai</div>
            </div>"#;

        let cards = extractor().extract(&page(html));
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Reporting Analyst");
        assert_eq!(cards[0].company, "Globex Solutions");
        assert_eq!(cards[0].location, "Chennai");
    }

    #[test]
    fn test_last_resort_card_class() {
        let html = r#"
            <div class="jobCard">
              <span title="Analytics Executive">Analytics Executive</span>
              <span class="companyName">Initech</span>
            </div>"#;

        let cards = extractor().extract(&page(html));
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Analytics Executive");
    }

    #[test]
    fn test_missing_location_keeps_card_with_sentinel() {
        let html = r#"
            <div class="job_seen_beacon">
              <h2 class="jobTitle">Junior Data Analyst</h2>
              <span class="companyName">Hooli</span>
            </div>"#;

        let cards = extractor().extract(&page(html));
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].location, SENTINEL);
    }

    #[test]
    fn test_missing_title_or_company_drops_only_that_card() {
        let html = r#"
            <div class="job_seen_beacon">
              <span class="companyName">No Title Inc</span>
            </div>
            <div class="job_seen_beacon">
              <h2 class="jobTitle">Orphan Analyst</h2>
            </div>
            <div class="job_seen_beacon">
              <h2 class="jobTitle">Data Analyst</h2>
              <span class="companyName">Acme</span>
            </div>"#;

        let cards = extractor().extract(&page(html));
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].company, "Acme");
    }

    #[test]
    fn test_empty_field_element_falls_through_to_next_strategy() {
        let html = r#"
            <div class="job_seen_beacon">
              <h2 class="jobTitle">   </h2>
              <a class="jcs-JobTitle">Business Analyst</a>
              <span class="companyName"></span>
              <span data-testid="company-name">Umbrella</span>
            </div>"#;

        let cards = extractor().extract(&page(html));
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Business Analyst");
        assert_eq!(cards[0].company, "Umbrella");
    }

    #[test]
    fn test_no_cards_is_empty_not_error() {
        let cards = extractor().extract(&page("<html><body><p>No results</p></body></html>"));
        assert!(cards.is_empty());
    }

    #[test]
    fn test_title_noise_only_stripped_at_word_edges() {
        let extractor = extractor();
        assert_eq!(extractor.clean_title("new Data Analyst"), "Data Analyst");
        assert_eq!(extractor.clean_title("Data Analyst new"), "Data Analyst");
        assert_eq!(extractor.clean_title("Renewal Analyst"), "Renewal Analyst");
        assert_eq!(extractor.clean_title("news Desk Analyst"), "news Desk Analyst");
        assert_eq!(extractor.clean_title("new"), "");
        assert_eq!(extractor.clean_title("new-grad Analyst"), "new-grad Analyst");
    }

    #[test]
    fn test_title_noise_with_separators_or_glued() {
        let extractor = extractor();
        assert_eq!(extractor.clean_title("Data Analyst - new"), "Data Analyst");
        assert_eq!(extractor.clean_title("new | Data Analyst"), "Data Analyst");
        assert_eq!(extractor.clean_title("Data Analyst, new"), "Data Analyst");
        assert_eq!(extractor.clean_title("newData Analyst"), "Data Analyst");
        assert_eq!(extractor.clean_title("Newcastle Data Analyst"), "Newcastle Data Analyst");
        assert_eq!(extractor.clean_title("Renewal Analyst"), "Renewal Analyst");
    }

    #[test]
    fn test_title_that_is_only_noise_drops_card() {
        let html = r#"
            <div class="job_seen_beacon">
              <h2 class="jobTitle"><span>new</span></h2>
              <span class="companyName">Acme</span>
            </div>"#;

        assert!(extractor().extract(&page(html)).is_empty());
    }

    #[test]
    fn test_invalid_selector_is_rejected_up_front() {
        let strategies = ExtractionStrategies {
            cards: vec!["div[".to_string()],
            ..ExtractionStrategies::default()
        };
        let err = Extractor::new(&strategies, &[]).err().unwrap();
        assert!(matches!(err, ScrapeError::Selector { .. }));
    }
}
