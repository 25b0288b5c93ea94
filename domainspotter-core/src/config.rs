// Run configuration, built once at startup and passed by reference

use crate::rank::{DEFAULT_LIMIT, Ranker};
use crate::report::{ReportFormat, Reporter};
use crate::similarity::{Processor, Scorer};
use chrono::{Days, Local, NaiveDate};
use domainspotter_fetch::Credentials;
use domainspotter_fetch::reputation::{DEFAULT_LOOKUP_DELAY, DEFAULT_XFE_BASE_URL};
use domainspotter_fetch::source::DEFAULT_BASE_URL;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const XFE_KEY_VAR: &str = "XFE_KEY";
pub const XFE_PASS_VAR: &str = "XFE_PASS";
pub const DEFAULT_DAYS_BACK: u32 = 1;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Date offset of {0} days is out of range")]
    DateOutOfRange(u32),

    #[error("XFE_KEY and XFE_PASS must both be set to enable enrichment")]
    MissingCredentials,

    #[error("Unknown scorer '{0}' (expected ratio, partial, token-sort, token-set or weighted)")]
    UnknownScorer(String),

    #[error("Score cutoff must be a number from 0 to 100, got '{0}'")]
    InvalidScoreCutoff(String),

    #[error("Unknown output format '{0}' (expected text or json)")]
    UnknownFormat(String),

    #[error("Failed to read keyword file {path}: {source}")]
    KeywordFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Keyword file {0} contains no keywords")]
    EmptyKeywordFile(String),
}

/// Which day's archive to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSelection {
    /// Relative to the local date at invocation
    DaysBack(u32),
    On(NaiveDate),
}

impl Default for DateSelection {
    fn default() -> Self {
        DateSelection::DaysBack(DEFAULT_DAYS_BACK)
    }
}

impl DateSelection {
    pub fn parse_date(s: &str) -> Result<NaiveDate, ConfigError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| ConfigError::InvalidDate(s.to_string()))
    }

    pub fn resolve(&self, today: NaiveDate) -> Result<NaiveDate, ConfigError> {
        match self {
            DateSelection::DaysBack(days) => today
                .checked_sub_days(Days::new(u64::from(*days)))
                .ok_or(ConfigError::DateOutOfRange(*days)),
            DateSelection::On(date) => Ok(*date),
        }
    }
}

/// Parses a `--score-cutoff` value. NaN, infinities and anything outside
/// 0-100 are rejected.
pub fn parse_score_cutoff(s: &str) -> Result<f64, ConfigError> {
    match s.trim().parse::<f64>() {
        Ok(cutoff) if (0.0..=100.0).contains(&cutoff) => Ok(cutoff),
        _ => Err(ConfigError::InvalidScoreCutoff(s.to_string())),
    }
}

/// Reads X-Force credentials through `lookup`; both values must be present
/// and non-empty.
pub fn credentials_from<F>(lookup: F) -> Option<Credentials>
where
    F: Fn(&str) -> Option<String>,
{
    let key = lookup(XFE_KEY_VAR).filter(|v| !v.is_empty())?;
    let password = lookup(XFE_PASS_VAR).filter(|v| !v.is_empty())?;
    Some(Credentials { key, password })
}

pub fn credentials_from_env() -> Option<Credentials> {
    credentials_from(|name| std::env::var(name).ok())
}

#[derive(Debug, Clone)]
pub struct EnrichConfig {
    pub base_url: String,
    pub credentials: Credentials,
    pub delay: Duration,
    /// Most lookups made for one keyword's matches
    pub limit: usize,
}

impl EnrichConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: DEFAULT_XFE_BASE_URL.to_string(),
            credentials,
            delay: DEFAULT_LOOKUP_DELAY,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub timeout: Duration,
    pub date: DateSelection,
    pub output_dir: PathBuf,
    pub format: ReportFormat,
    pub save: bool,
    pub limit: usize,
    pub scorer: Scorer,
    pub score_cutoff: f64,
    pub processor: Processor,
    pub enrich: Option<EnrichConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            date: DateSelection::default(),
            output_dir: PathBuf::from("."),
            format: ReportFormat::Text,
            save: true,
            limit: DEFAULT_LIMIT,
            scorer: Scorer::default(),
            score_cutoff: 0.0,
            processor: Processor::default(),
            enrich: None,
        }
    }
}

impl Config {
    pub fn reference_date(&self) -> Result<NaiveDate, ConfigError> {
        self.date.resolve(Local::now().date_naive())
    }

    pub fn ranker(&self) -> Ranker {
        Ranker::new(self.scorer)
            .with_score_cutoff(self.score_cutoff)
            .with_processor(self.processor)
    }

    pub fn reporter(&self) -> Reporter {
        Reporter::new(self.output_dir.clone(), self.format, self.save)
    }
}
