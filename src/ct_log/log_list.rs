// src/ct_log/log_list.rs
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, info};

use super::types::CtLogList;

/// Default source for log metadata: Google's all-logs list
pub const DEFAULT_LOG_LIST_URL: &str =
    "https://www.gstatic.com/ct/log_list/v3/all_logs_list.json";

/// Fetches Google's CT log list (v3 JSON)
pub struct LogListFetcher {
    list_url: String,
    http_client: reqwest::Client,
}

impl LogListFetcher {
    pub fn new(list_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            list_url: list_url.to_string(),
            http_client,
        })
    }

    pub fn url(&self) -> &str {
        &self.list_url
    }

    /// Fetch and deserialize the full log list
    pub async fn fetch(&self) -> Result<CtLogList> {
        info!("Fetching CT log list from {}", self.list_url);

        let response = self
            .http_client
            .get(&self.list_url)
            .send()
            .await
            .context("Failed to fetch CT log list")?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch log list: HTTP {}", response.status());
        }

        let log_list: CtLogList = response
            .json()
            .await
            .context("Failed to parse log list JSON")?;

        debug!(
            "Log list version {} with {} operators",
            log_list.version,
            log_list.operators.len()
        );

        Ok(log_list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_list() -> serde_json::Value {
        serde_json::json!({
            "version": "1.0",
            "log_list_timestamp": "2024-01-01T00:00:00Z",
            "operators": [{
                "name": "Test Operator",
                "email": [],
                "logs": [{
                    "description": "Test Log",
                    "log_id": "3vsSHOVZBvuFdCFdwMV00G/XJLUnL1YLaVbPufGHugA=",
                    "key": "",
                    "url": "https://ct.example.com/",
                    "mmd": 86400,
                    "state": {"usable": {"timestamp": "2023-01-01T00:00:00Z"}}
                }]
            }]
        })
    }

    #[tokio::test]
    async fn test_fetch_log_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/loglist.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_list()))
            .mount(&server)
            .await;

        let fetcher = LogListFetcher::new(
            &format!("{}/loglist.json", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap();

        let list = fetcher.fetch().await.unwrap();
        assert_eq!(list.version, "1.0");
        assert_eq!(list.operators[0].logs.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_log_list_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/loglist.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fetcher = LogListFetcher::new(
            &format!("{}/loglist.json", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap();

        assert!(fetcher.fetch().await.is_err());
    }
}
