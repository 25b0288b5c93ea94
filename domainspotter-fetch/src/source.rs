use crate::error::FetchError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://whoisds.com/whois-database/newly-registered-domains/";
pub const USER_AGENT: &str = concat!(
    "domainspotter/",
    env!("CARGO_PKG_VERSION"),
    " (newly registered domain search)"
);

/// Base64 identifier WHOISDS uses for a day's archive, e.g.
/// `2024-01-15` becomes `MjAyNC0wMS0xNS56aXA=`.
///
/// This is the standard alphabet with `=` padding; the service rejects
/// anything else.
pub fn resource_id(date: NaiveDate) -> String {
    let name = format!("{}.zip", date.format("%Y-%m-%d"));
    STANDARD.encode(name.as_bytes())
}

/// Downloads the newly registered domains archive for a given day.
pub struct ArchiveSource {
    client: Client,
    base_url: String,
}

impl ArchiveSource {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(DEFAULT_BASE_URL, Duration::from_secs(30))
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(timeout / 2)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        Ok(Self { client, base_url })
    }

    pub fn archive_url(&self, date: NaiveDate) -> Result<Url, FetchError> {
        let raw = format!("{}{}/nrd", self.base_url, resource_id(date));
        Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    /// Performs a single GET for the archive. Not retried.
    pub async fn fetch(&self, date: NaiveDate) -> Result<Vec<u8>, FetchError> {
        let url = self.archive_url(date)?;
        info!("Fetching newly registered domains for {} from {}", date, url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        debug!("Received {} bytes", body.len());
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_resource_id_known_value() {
        assert_eq!(resource_id(date(2024, 1, 15)), "MjAyNC0wMS0xNS56aXA=");
    }

    #[test]
    fn test_resource_id_round_trips_to_date() {
        for day in [date(2021, 12, 30), date(2024, 2, 29), date(1999, 1, 1)] {
            let id = resource_id(day);
            let decoded = STANDARD.decode(id.as_bytes()).unwrap();
            let text = String::from_utf8(decoded).unwrap();
            assert_eq!(text, format!("{}.zip", day.format("%Y-%m-%d")));
        }
    }

    #[test]
    fn test_resource_id_keeps_padding() {
        // 14 input bytes always encode to 20 chars with one `=`.
        let id = resource_id(date(2022, 6, 1));
        assert_eq!(id.len(), 20);
        assert!(id.ends_with('='));
    }

    #[test]
    fn test_archive_url_layout() {
        let source = ArchiveSource::new().unwrap();
        let url = source.archive_url(date(2024, 1, 15)).unwrap();
        assert_eq!(
            url.as_str(),
            "https://whoisds.com/whois-database/newly-registered-domains/MjAyNC0wMS0xNS56aXA=/nrd"
        );
    }

    #[test]
    fn test_archive_url_adds_missing_slash() {
        let source =
            ArchiveSource::with_base_url("http://localhost:1/nrd-mirror", Duration::from_secs(1))
                .unwrap();
        let url = source.archive_url(date(2024, 1, 15)).unwrap();
        assert_eq!(url.path(), "/nrd-mirror/MjAyNC0wMS0xNS56aXA=/nrd");
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/MjAyNC0wMS0xNS56aXA=/nrd"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK-bytes".to_vec()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let source =
            ArchiveSource::with_base_url(&mock_server.uri(), Duration::from_secs(5)).unwrap();
        let body = source.fetch(date(2024, 1, 15)).await.unwrap();
        assert_eq!(body, b"PK-bytes");
    }

    #[tokio::test]
    async fn test_fetch_service_unavailable_is_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock_server)
            .await;

        let source =
            ArchiveSource::with_base_url(&mock_server.uri(), Duration::from_secs(5)).unwrap();
        let err = source.fetch(date(2024, 1, 15)).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let source =
            ArchiveSource::with_base_url(&mock_server.uri(), Duration::from_secs(5)).unwrap();
        let err = source.fetch(date(2024, 1, 15)).await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&mock_server)
            .await;

        let source =
            ArchiveSource::with_base_url(&mock_server.uri(), Duration::from_millis(100)).unwrap();
        let err = source.fetch(date(2024, 1, 15)).await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
    }
}
