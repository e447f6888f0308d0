//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for a run:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests for results pages
//! - Turning transport failures and non-success statuses into fatal errors
//!
//! There is no retry logic. The first failure ends the run.

use crate::config::CrawlerConfig;
use crate::crawler::parser::ResultsPage;
use crate::HarvestError;
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use journal_harvest::config::CrawlerConfig;
/// use journal_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one results page and parses it
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Timeout, connection or TLS failure | `HarvestError::Transport` |
/// | Non-2xx status | `HarvestError::HttpStatus` |
/// | Body could not be read | `HarvestError::Transport` |
///
/// Every failure is logged with the URL before it is returned.
pub async fn fetch_page(client: &Client, url: &str) -> Result<ResultsPage, HarvestError> {
    let body = fetch_body(client, url).await.map_err(|e| {
        tracing::error!("Error fetching page {}: {}", url, e);
        e
    })?;

    Ok(ResultsPage::parse(url, &body))
}

async fn fetch_body(client: &Client, url: &str) -> Result<String, HarvestError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| HarvestError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    tracing::debug!("GET {} -> {}", url, status.as_u16());

    response.text().await.map_err(|source| HarvestError::Transport {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&CrawlerConfig::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let config = CrawlerConfig {
            request_timeout_secs: 1,
            ..CrawlerConfig::default()
        };
        let client = build_http_client(&config).unwrap();

        // Port 9 (discard) on localhost is not expected to accept HTTP
        let result = fetch_page(&client, "http://127.0.0.1:9/journals/?q=x").await;
        match result {
            Err(err) => assert!(err.is_transport()),
            Ok(_) => panic!("expected a transport error"),
        }
    }

    // Status and body handling is covered with wiremock in tests/
}
