use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::ArgMatches;
use colored::Colorize;
use domainspotter_core::config::{ConfigError, DEFAULT_DAYS_BACK, credentials_from};
use domainspotter_core::keywords::load_keywords;
use domainspotter_core::rank::DEFAULT_LIMIT;
use domainspotter_core::report::format_reputation;
use domainspotter_core::{
    Config, DateSelection, EnrichConfig, Processor, ReportFormat, ScanOutcome, Scorer, scan_all,
};
use domainspotter_fetch::{ArchiveSource, ReputationClient, SpotError, decode};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Fuzzy,
    Exact,
}

/// Tallies from one run over a batch of keywords.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    pub queries: usize,
    pub queries_with_matches: usize,
    pub files_written: Vec<PathBuf>,
    pub report_failures: usize,
    pub enrichment_failures: usize,
    /// Matches left without a lookup once a keyword hit the enrichment limit
    pub enrichment_skipped: usize,
}

/// Build the run configuration from parsed arguments and the process
/// environment.
pub fn build_config(args: &ArgMatches, mode: SearchMode) -> Result<Config, ConfigError> {
    build_config_with(args, mode, |name| std::env::var(name).ok())
}

pub fn build_config_with<F>(args: &ArgMatches, mode: SearchMode, env: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::default();

    if let Some(base_url) = args.get_one::<String>("base-url") {
        config.base_url = base_url.clone();
    }
    if let Some(timeout) = args.get_one::<u64>("timeout") {
        config.timeout = Duration::from_secs(*timeout);
    }

    config.date = match args.get_one::<String>("date") {
        Some(date) => DateSelection::On(DateSelection::parse_date(date)?),
        None => DateSelection::DaysBack(
            *args.get_one::<u32>("days-back").unwrap_or(&DEFAULT_DAYS_BACK),
        ),
    };

    if let Some(dir) = args.get_one::<String>("output-dir") {
        config.output_dir = PathBuf::from(shellexpand::tilde(dir).as_ref());
    }
    if let Some(format) = args.get_one::<String>("format") {
        config.format =
            ReportFormat::from_str(format).ok_or_else(|| ConfigError::UnknownFormat(format.clone()))?;
    }
    config.save = !args.get_flag("no-save");

    if mode == SearchMode::Fuzzy {
        config.limit = *args.get_one::<usize>("limit").unwrap_or(&DEFAULT_LIMIT);
        if let Some(scorer) = args.get_one::<String>("scorer") {
            config.scorer =
                Scorer::from_str(scorer).ok_or_else(|| ConfigError::UnknownScorer(scorer.clone()))?;
        }
        config.score_cutoff = *args.get_one::<f64>("score-cutoff").unwrap_or(&0.0);
        if args.get_flag("no-process") {
            config.processor = Processor::Raw;
        }
    }

    if args.get_flag("enrich") {
        match credentials_from(env) {
            Some(credentials) => {
                let mut enrich = EnrichConfig::new(credentials);
                if let Some(ms) = args.get_one::<u64>("enrich-delay-ms") {
                    enrich.delay = Duration::from_millis(*ms);
                }
                if let Some(limit) = args.get_one::<usize>("enrich-limit") {
                    enrich.limit = *limit;
                }
                config.enrich = Some(enrich);
            }
            None => warn!("Enrichment requested without XFE credentials"),
        }
    }

    Ok(config)
}

/// Keywords from the positional argument or from `--keyword-file`.
pub fn load_queries(args: &ArgMatches) -> Result<Vec<String>, ConfigError> {
    if let Some(path) = args.get_one::<PathBuf>("keyword-file") {
        return load_keywords(path);
    }
    Ok(args
        .get_one::<String>("KEYWORD")
        .map(|keyword| vec![keyword.clone()])
        .unwrap_or_default())
}

/// Download and decode the archive for `date`. Any failure leaves the caller
/// with no candidate list at all.
pub async fn fetch_candidates(
    config: &Config,
    date: NaiveDate,
    show_progress: bool,
) -> domainspotter_fetch::error::Result<Vec<String>> {
    let spinner = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Downloading newly registered domains for {}...", date));
        Some(pb)
    } else {
        None
    };

    let result = async {
        let source = ArchiveSource::with_base_url(&config.base_url, config.timeout)?;
        let bytes = source.fetch(date).await?;
        if let Some(pb) = &spinner {
            pb.set_message(format!("Decoding {} bytes...", bytes.len()));
        }
        let domains = decode(&bytes)?;
        Ok::<_, SpotError>(domains)
    }
    .await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if let Ok(domains) = &result {
        info!("Loaded {} newly registered domains for {}", domains.len(), date);
    }
    result
}

/// Run every keyword against the same candidate list.
///
/// A keyword with no matches is reported and the batch moves on. Failures
/// writing a keyword's results file or looking up a domain's reputation are
/// reported and counted without stopping the run.
pub async fn run_search<W: Write>(
    config: &Config,
    mode: SearchMode,
    queries: &[String],
    candidates: &[String],
    out: &mut W,
) -> Result<RunSummary> {
    let reporter = config.reporter();
    let ranker = config.ranker();
    let text = config.format == ReportFormat::Text;
    let mut summary = RunSummary::default();

    let mut reputation = match &config.enrich {
        Some(enrich) => Some(
            ReputationClient::with_base_url(&enrich.base_url, enrich.credentials.clone(), enrich.delay)
                .context("Failed to create reputation client")?,
        ),
        None => None,
    };

    for query in queries {
        summary.queries += 1;
        if text && queries.len() > 1 {
            writeln!(out, "\n{} {}", "==>".bright_blue().bold(), query.bright_white().bold())?;
        }

        let (written, found) = match mode {
            SearchMode::Fuzzy => {
                let matches = ranker.rank(query, candidates, config.limit);
                if matches.is_empty() {
                    reporter.report_no_match(out, query)?;
                    continue;
                }
                let found: Vec<String> = matches.iter().map(|m| m.domain.clone()).collect();
                (reporter.report_ranked(out, query, &matches), found)
            }
            SearchMode::Exact => match scan_all(query, candidates) {
                ScanOutcome::NoMatch => {
                    reporter.report_no_match(out, query)?;
                    continue;
                }
                ScanOutcome::Matches(matches) => {
                    let found: Vec<String> = matches.iter().map(|d| d.to_string()).collect();
                    (reporter.report_scan(out, query, &matches), found)
                }
            },
        };
        summary.queries_with_matches += 1;

        match written {
            Ok(Some(path)) => {
                status(out, text, &format!("{} Results written to: {}", "[+]".green().bold(), path.display()))?;
                summary.files_written.push(path);
            }
            Ok(None) => {}
            Err(e) => {
                eprintln!("{} Failed to report matches for {}: {}", "[!]".red().bold(), query, e);
                summary.report_failures += 1;
            }
        }

        if let (Some(client), Some(enrich)) = (reputation.as_mut(), config.enrich.as_ref()) {
            if found.len() > enrich.limit {
                let skipped = found.len() - enrich.limit;
                status(
                    out,
                    text,
                    &format!(
                        "{} Looking up the first {} of {} matches for {}",
                        "[*]".yellow().bold(),
                        enrich.limit,
                        found.len(),
                        query
                    ),
                )?;
                summary.enrichment_skipped += skipped;
            }
            for domain in found.iter().take(enrich.limit) {
                match client.lookup(domain).await {
                    Ok(report) => status(out, text, &format!("    {}", format_reputation(domain, report.as_ref())))?,
                    Err(e) => {
                        eprintln!("{} {}", "[!]".red().bold(), e);
                        summary.enrichment_failures += 1;
                    }
                }
            }
        }
    }

    Ok(summary)
}

// Status lines go to stderr when stdout carries JSON
fn status<W: Write>(out: &mut W, text: bool, line: &str) -> io::Result<()> {
    if text {
        writeln!(out, "{}", line)
    } else {
        eprintln!("{}", line);
        Ok(())
    }
}

pub async fn handle_search(args: &ArgMatches, mode: SearchMode, quiet: bool) -> Result<()> {
    let config = build_config(args, mode)?;
    if args.get_flag("enrich") && config.enrich.is_none() {
        eprintln!(
            "{} {}; continuing without reputation lookups",
            "[!]".yellow().bold(),
            ConfigError::MissingCredentials
        );
    }

    let queries = load_queries(args)?;
    let date = config.reference_date()?;

    if !quiet {
        println!("Returning results for {}...\n", date.to_string().bright_white());
    }

    let candidates = fetch_candidates(&config, date, !quiet)
        .await
        .with_context(|| format!("Could not load newly registered domains for {}", date))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = run_search(&config, mode, &queries, &candidates, &mut out).await?;
    out.flush()?;

    info!(
        "{} of {} keywords matched across {} domains",
        summary.queries_with_matches,
        summary.queries,
        candidates.len()
    );
    Ok(())
}
