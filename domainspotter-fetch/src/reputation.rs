// IBM X-Force Exchange URL reputation lookups

use crate::error::ReputationError;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;
use url::Url;

pub const DEFAULT_XFE_BASE_URL: &str = "https://api.xforce.ibmcloud.com";
pub const DEFAULT_LOOKUP_DELAY: Duration = Duration::from_secs(1);

/// API key/password pair for the X-Force Exchange API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key: String,
    pub password: String,
}

// Keep secrets out of debug logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &"<redacted>")
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReputationReport {
    pub domain: String,
    /// Risk score, 1 (benign) to 10 (malicious). Unscored when absent.
    pub score: Option<f64>,
    pub categories: Vec<String>,
}

#[derive(Deserialize)]
struct UrlReportBody {
    result: UrlResult,
}

#[derive(Deserialize)]
struct UrlResult {
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    cats: BTreeMap<String, bool>,
}

/// Sequential reputation client. Consecutive lookups are spaced by at least
/// `delay` to stay inside the service's rate limits.
pub struct ReputationClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
    delay: Duration,
    last_request: Option<Instant>,
}

impl ReputationClient {
    pub fn new(credentials: Credentials) -> Result<Self, ReputationError> {
        Self::with_base_url(DEFAULT_XFE_BASE_URL, credentials, DEFAULT_LOOKUP_DELAY)
    }

    pub fn with_base_url(
        base_url: &str,
        credentials: Credentials,
        delay: Duration,
    ) -> Result<Self, ReputationError> {
        let client = Client::builder()
            .user_agent(crate::source::USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            delay,
            last_request: None,
        })
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Looks up one domain. Returns `Ok(None)` when the service has no record.
    pub async fn lookup(&mut self, domain: &str) -> Result<Option<ReputationReport>, ReputationError> {
        let raw = format!("{}/url/{}", self.base_url, domain);
        let url = Url::parse(&raw).map_err(|e| ReputationError::InvalidUrl(format!("{}: {}", raw, e)))?;

        self.wait_turn().await;

        let response = self
            .client
            .get(url)
            .basic_auth(&self.credentials.key, Some(&self.credentials.password))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("No reputation record for {}", domain);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ReputationError::Status {
                status: status.as_u16(),
                domain: domain.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: UrlReportBody =
            serde_json::from_str(&body).map_err(|e| ReputationError::Parse {
                domain: domain.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Some(ReputationReport {
            domain: domain.to_string(),
            score: parsed.result.score,
            categories: parsed
                .result
                .cats
                .into_iter()
                .filter(|(_, flagged)| *flagged)
                .map(|(name, _)| name)
                .collect(),
        }))
    }

    async fn wait_turn(&mut self) {
        if let Some(last) = self.last_request {
            let ready_at = last + self.delay;
            let now = Instant::now();
            if ready_at > now {
                debug!("Waiting {:?} before next reputation lookup", ready_at - now);
                tokio::time::sleep_until(ready_at).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}
