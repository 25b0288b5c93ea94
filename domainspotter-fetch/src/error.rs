use thiserror::Error;

/// Failure retrieving the daily archive.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Failure turning archive bytes into a candidate list.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Non-ASCII data in {entry} at line {line}")]
    NonAscii { entry: String, line: usize },
}

#[derive(Error, Debug)]
pub enum ReputationError {
    #[error("Reputation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Reputation service returned HTTP {status} for {domain}")]
    Status { status: u16, domain: String },

    #[error("Unexpected reputation response for {domain}: {reason}")]
    Parse { domain: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

#[derive(Error, Debug)]
pub enum SpotError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Reputation(#[from] ReputationError),
}

pub type Result<T> = std::result::Result<T, SpotError>;
