// Match output: console plus a per-keyword results file

use crate::rank::RankedMatch;
use domainspotter_fetch::ReputationReport;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a, T: Serialize> {
    query: &'a str,
    matches: &'a [T],
}

/// Writes matches to the console sink and appends them to
/// `<output_dir>/<keyword>_matches.txt`.
#[derive(Debug, Clone)]
pub struct Reporter {
    output_dir: PathBuf,
    format: ReportFormat,
    save: bool,
}

impl Reporter {
    pub fn new(output_dir: PathBuf, format: ReportFormat, save: bool) -> Self {
        Self {
            output_dir,
            format,
            save,
        }
    }

    pub fn output_path(&self, query: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_matches.txt", sanitize_file_stem(query)))
    }

    /// Reports exact-scan matches. Returns the results file when one was
    /// written.
    pub fn report_scan<W: Write>(
        &self,
        out: &mut W,
        query: &str,
        matches: &[&str],
    ) -> io::Result<Option<PathBuf>> {
        match self.format {
            ReportFormat::Text => {
                for domain in matches {
                    writeln!(out, "{}", domain)?;
                }
            }
            ReportFormat::Json => write_json(out, query, matches)?,
        }

        let records: Vec<String> = matches.iter().map(|d| d.to_string()).collect();
        self.save_records(query, &records)
    }

    /// Reports fuzzy matches as `domain, score, index` lines.
    pub fn report_ranked<W: Write>(
        &self,
        out: &mut W,
        query: &str,
        matches: &[RankedMatch],
    ) -> io::Result<Option<PathBuf>> {
        let records: Vec<String> = matches.iter().map(format_ranked).collect();
        match self.format {
            ReportFormat::Text => {
                for record in &records {
                    writeln!(out, "{}", record)?;
                }
            }
            ReportFormat::Json => write_json(out, query, matches)?,
        }

        self.save_records(query, &records)
    }

    pub fn report_no_match<W: Write>(&self, out: &mut W, query: &str) -> io::Result<()> {
        match self.format {
            ReportFormat::Text => writeln!(
                out,
                "[!] Sorry, there were no matches for {} among the newly registered domains.",
                query
            ),
            ReportFormat::Json => write_json::<_, &str>(out, query, &[]),
        }
    }

    fn save_records(&self, query: &str, records: &[String]) -> io::Result<Option<PathBuf>> {
        if !self.save || records.is_empty() {
            return Ok(None);
        }
        let path = self.output_path(query);
        append_records(&path, records)?;
        debug!("Appended {} records to {}", records.len(), path.display());
        Ok(Some(path))
    }
}

pub fn format_ranked(m: &RankedMatch) -> String {
    format!("{}, {:.1}, {}", m.domain, m.score, m.index)
}

pub fn format_reputation(domain: &str, report: Option<&ReputationReport>) -> String {
    match report {
        None => format!("{}: no reputation record", domain),
        Some(report) => {
            let score = report
                .score
                .map(|s| format!("risk {:.1}", s))
                .unwrap_or_else(|| "unscored".to_string());
            if report.categories.is_empty() {
                format!("{}: {}", domain, score)
            } else {
                format!("{}: {} [{}]", domain, score, report.categories.join(", "))
            }
        }
    }
}

/// Appends newline-terminated records, creating the file if needed.
pub fn append_records(path: &Path, records: &[String]) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for record in records {
        writeln!(file, "{}", record)?;
    }
    file.flush()
}

fn write_json<W: Write, T: Serialize>(out: &mut W, query: &str, matches: &[T]) -> io::Result<()> {
    let report = JsonReport { query, matches };
    serde_json::to_writer(&mut *out, &report).map_err(io::Error::other)?;
    writeln!(out)
}

/// Keyword as a file-name stem: path separators and NUL become `_`.
pub fn sanitize_file_stem(query: &str) -> String {
    query
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect()
}
