use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use jobscout::store::{self, Store};
use jobscout::{ApplicationStatus, CompanyType, Config, JobFilter, Pipeline, Summary};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "jobscout")]
#[command(about = "Scrape job listings into a tracker and browse what you've found")]
struct Cli {
    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the tracker CSV (overrides config)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the job board and merge new listings into the tracker
    Scrape {
        /// Search query (repeatable; defaults to the configured list)
        #[arg(short, long = "query")]
        queries: Vec<String>,

        /// Location to search in
        #[arg(short, long)]
        location: Option<String>,

        /// Maximum result pages per query
        #[arg(short = 'p', long)]
        max_pages: Option<u32>,
    },

    /// List tracked jobs
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show tracker metrics
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Set the application status of a job
    Mark {
        /// Job title, exactly as tracked
        title: String,

        /// Company name, exactly as tracked
        company: String,

        /// New status (applied, not-applied)
        status: ApplicationStatus,
    },

    /// Export tracked jobs to a CSV file
    Export {
        /// Output file
        path: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Print the effective configuration as JSON
    Config,
}

#[derive(Args)]
struct FilterArgs {
    /// Filter by status (applied, not-applied)
    #[arg(short, long)]
    status: Option<ApplicationStatus>,

    /// Filter by company type (startup, mid-size, mnc, unknown)
    #[arg(short = 't', long)]
    company_type: Option<CompanyType>,

    /// Search title, company and location
    #[arg(long)]
    search: Option<String>,
}

impl From<FilterArgs> for JobFilter {
    fn from(args: FilterArgs) -> Self {
        JobFilter {
            status: args.status,
            company_type: args.company_type,
            search: args.search,
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "jobscout=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = cli.store {
        config.store_path = Some(path);
    }
    let store = Store::open(config.store_path());

    match cli.command {
        Commands::Scrape {
            queries,
            location,
            max_pages,
        } => {
            if let Some(location) = location {
                config.location = location;
            }
            let queries = if queries.is_empty() {
                config.queries.clone()
            } else {
                queries
            };
            let max_pages = max_pages.unwrap_or(config.max_pages);

            println!(
                "Scraping {} quer{} in {} (up to {} pages each)...",
                queries.len(),
                if queries.len() == 1 { "y" } else { "ies" },
                config.location,
                max_pages
            );
            let pipeline = Pipeline::from_config(&config)?;
            let result = pipeline
                .run(&queries, max_pages)
                .context("Scrape run failed")?;

            println!("\nResults:");
            println!("  Jobs scraped: {}", result.records_scraped);
            println!("  Jobs added:   {}", result.records_added);
            println!("  Total jobs:   {}", result.total_records);
            if result.pages_failed > 0 {
                println!("  Failed pages: {}", result.pages_failed);
            }
            if result.records_scraped == 0 {
                println!("\nNo jobs were scraped. Check your connection, or the board's markup may have changed.");
            } else {
                println!("\nTracker: {}", store.path().display());
            }
        }

        Commands::List { filter } => {
            let jobs = store.read()?;
            let filter = JobFilter::from(filter);
            let found = filter.apply(&jobs);
            if found.is_empty() {
                println!("No jobs found.");
            } else {
                println!(
                    "{:<12} {:<9} {:<30} {:<22} {:<18} {:<10}",
                    "STATUS", "TYPE", "TITLE", "COMPANY", "LOCATION", "ADDED"
                );
                println!("{}", "-".repeat(106));
                for job in &found {
                    println!(
                        "{:<12} {:<9} {:<30} {:<22} {:<18} {:<10}",
                        job.status.as_str(),
                        job.company_type.as_str(),
                        truncate(&job.title, 28),
                        truncate(&job.company, 20),
                        truncate(&job.location, 16),
                        job.date_added
                    );
                }
                if !filter.is_empty() {
                    println!("\n{} of {} jobs match.", found.len(), jobs.len());
                }
            }
        }

        Commands::Stats { filter } => {
            let jobs = store.read()?;
            let filter = JobFilter::from(filter);
            let all = Summary::of(&jobs);

            println!("Total jobs:   {}", all.total);
            if !filter.is_empty() {
                println!("Filtered:     {}", filter.apply(&jobs).len());
            }
            println!("Not applied:  {}", all.not_applied);
            println!("Applied:      {}", all.applied);

            let shown = Summary::of(filter.apply(&jobs));
            if shown.total > 0 {
                println!("\nBy company type:");
                for (company_type, count, share) in shown.company_type_shares() {
                    println!("  {:<10} {:>5}  {:>5.1}%", company_type, count, share);
                }
            }
        }

        Commands::Mark {
            title,
            company,
            status,
        } => {
            if store.set_status(&title, &company, status)? {
                println!("Marked '{}' at '{}' as {}.", title, company, status);
            } else {
                return Err(anyhow!("No tracked job '{}' at '{}'", title, company));
            }
        }

        Commands::Export { path, filter } => {
            let jobs = store.read()?;
            let filter = JobFilter::from(filter);
            let found: Vec<_> = filter.apply(&jobs).into_iter().cloned().collect();

            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            store::write_csv(file, &found)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported {} jobs to {}", found.len(), path.display());
        }

        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("Data Analyst", 20), "Data Analyst");
        assert_eq!(truncate("Senior Data Analyst", 10), "Senior ...");
        assert_eq!(truncate("Analyste données", 12), "Analyste ...");
    }

    #[test]
    fn test_cli_parses_scrape_overrides() {
        let cli = Cli::try_parse_from([
            "jobscout", "scrape", "-q", "Data Analyst", "-q", "BI Analyst", "-p", "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Scrape {
                queries, max_pages, ..
            } => {
                assert_eq!(queries, vec!["Data Analyst", "BI Analyst"]);
                assert_eq!(max_pages, Some(2));
            }
            _ => panic!("expected scrape"),
        }
    }

    #[test]
    fn test_cli_parses_filters_and_status() {
        let cli = Cli::try_parse_from([
            "jobscout", "list", "--status", "not-applied", "-t", "mid-size",
        ])
        .unwrap();
        match cli.command {
            Commands::List { filter } => {
                assert_eq!(filter.status, Some(ApplicationStatus::NotApplied));
                assert_eq!(filter.company_type, Some(CompanyType::MidSize));
            }
            _ => panic!("expected list"),
        }

        assert!(Cli::try_parse_from(["jobscout", "mark", "BI Analyst", "Foo", "maybe"]).is_err());
    }
}
