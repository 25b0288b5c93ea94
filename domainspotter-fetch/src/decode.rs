use crate::error::DecodeError;
use std::io::{BufRead, BufReader, Cursor};
use tracing::debug;
use zip::ZipArchive;

/// Decodes a WHOISDS archive into its domain list.
///
/// Every file entry is read in archive order and split into lines; trailing
/// CR/LF is stripped and blank lines are dropped. Line order within each
/// entry is preserved and duplicates are kept. Any byte outside ASCII is an
/// error rather than a skipped line.
pub fn decode(bytes: &[u8]) -> Result<Vec<String>, DecodeError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut domains = Vec::new();

    for index in 0..archive.len() {
        let entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }
        let entry_name = entry.name().to_string();
        let before = domains.len();

        let mut reader = BufReader::new(entry);
        let mut buf = Vec::new();
        let mut line_no = 0;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            let line = strip_line_ending(&buf);
            if !line.is_ascii() {
                return Err(DecodeError::NonAscii {
                    entry: entry_name,
                    line: line_no,
                });
            }
            if line.is_empty() {
                continue;
            }
            // ASCII is valid UTF-8
            domains.push(String::from_utf8_lossy(line).into_owned());
        }

        debug!("Decoded {} domains from {}", domains.len() - before, entry_name);
    }

    Ok(domains)
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    while end > 0 && matches!(line[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    &line[..end]
}
