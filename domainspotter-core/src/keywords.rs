use crate::config::ConfigError;
use std::fs;
use std::path::Path;

/// Load search keywords, one per line. Blank lines and `#` comments are
/// skipped and surrounding whitespace is trimmed.
pub fn load_keywords(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::KeywordFile {
        path: path.display().to_string(),
        source,
    })?;

    let keywords = parse_keywords(&content);
    if keywords.is_empty() {
        return Err(ConfigError::EmptyKeywordFile(path.display().to_string()));
    }

    Ok(keywords)
}

pub fn parse_keywords(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with('#'))
        .map(String::from)
        .collect()
}
