use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::rates::{RateProvider, RateSnapshot, RateTable, UpdateWindow};

const SUCCESS: &str = "success";

// Provider for the open.er-api.com "latest rates" endpoint
pub struct OpenErApiProvider {
    base_url: String,
}

impl OpenErApiProvider {
    pub fn new(base_url: &str) -> Self {
        OpenErApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    result: String,
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: RateTable,
    time_last_update_utc: String,
    time_next_update_utc: String,
}

/// Reads a response body, accepting the rate fields only under a success marker.
fn parse_latest(body: &str, base: &str) -> Result<RateSnapshot> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", base, e))?;

    let envelope = Envelope::deserialize(&value)
        .map_err(|e| anyhow!("Missing result marker in response for {}: {}", base, e))?;
    if envelope.result != SUCCESS {
        return Err(anyhow!(
            "Provider returned result '{}' for {}",
            envelope.result,
            base
        ));
    }

    let data = LatestRatesResponse::deserialize(value)
        .map_err(|e| anyhow!("Malformed rates payload for {}: {}", base, e))?;

    Ok(RateSnapshot {
        rates: data.rates,
        update_window: UpdateWindow {
            last_update: data.time_last_update_utc,
            next_update: data.time_next_update_utc,
        },
    })
}

#[async_trait]
impl RateProvider for OpenErApiProvider {
    #[instrument(name = "OpenErApiFetch", skip(self), fields(base = %base))]
    async fn fetch_rates(&self, base: &str) -> Result<RateSnapshot> {
        let url = format!("{}/v6/latest/{}", self.base_url, base);
        debug!("Requesting rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent(concat!("kzfx/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for base currency: {}", e, base))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for base currency: {}",
                response.status(),
                base
            ));
        }

        let text = response.text().await?;
        let snapshot = parse_latest(&text, base)?;
        debug!(
            currencies = snapshot.rates.len(),
            last_update = %snapshot.update_window.last_update,
            "Received rates"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(status: u16, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v6/latest/USD"))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_rates_fetch() {
        let mock_response = r#"{
            "result": "success",
            "base_code": "USD",
            "time_last_update_utc": "Mon, 19 Oct 2026 00:02:31 +0000",
            "time_next_update_utc": "Tue, 20 Oct 2026 00:12:01 +0000",
            "rates": {
                "USD": 1,
                "KZT": 450.5,
                "EUR": 0.921
            }
        }"#;

        let mock_server = create_mock_server(200, mock_response).await;
        let provider = OpenErApiProvider::new(&mock_server.uri());
        let snapshot = provider.fetch_rates("USD").await.unwrap();

        assert_eq!(snapshot.rates.len(), 3);
        assert_eq!(snapshot.rates.get("USD"), Some(1.0));
        assert_eq!(snapshot.rates.get("KZT"), Some(450.5));
        assert_eq!(
            snapshot.update_window.last_update,
            "Mon, 19 Oct 2026 00:02:31 +0000"
        );
        assert_eq!(
            snapshot.update_window.next_update,
            "Tue, 20 Oct 2026 00:12:01 +0000"
        );
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let mock_response = r#"{"result":"success","rates":{"USD":1},"time_last_update_utc":"A","time_next_update_utc":"B"}"#;
        let mock_server = create_mock_server(200, mock_response).await;
        let provider = OpenErApiProvider::new(&format!("{}/", mock_server.uri()));
        assert!(provider.fetch_rates("USD").await.is_ok());
    }

    #[tokio::test]
    async fn test_error_result_marker() {
        let mock_response = r#"{"result": "error", "error-type": "unsupported-code"}"#;
        let mock_server = create_mock_server(200, mock_response).await;
        let provider = OpenErApiProvider::new(&mock_server.uri());

        let result = provider.fetch_rates("USD").await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Provider returned result 'error' for USD"
        );
    }

    #[tokio::test]
    async fn test_success_without_rates_is_malformed() {
        let mock_response = r#"{"result": "success", "time_last_update_utc": "A"}"#;
        let mock_server = create_mock_server(200, mock_response).await;
        let provider = OpenErApiProvider::new(&mock_server.uri());

        let result = provider.fetch_rates("USD").await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Malformed rates payload for USD")
        );
    }

    #[tokio::test]
    async fn test_non_json_body() {
        let mock_server = create_mock_server(200, "<html>maintenance</html>").await;
        let provider = OpenErApiProvider::new(&mock_server.uri());

        let result = provider.fetch_rates("USD").await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response for USD")
        );
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let mock_server = create_mock_server(500, "").await;
        let provider = OpenErApiProvider::new(&mock_server.uri());

        let result = provider.fetch_rates("USD").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error for base currency: USD"
        );
    }

    #[test]
    fn test_parse_ignores_fields_on_failure() {
        // No rates are read when the marker is not success, even if present
        let body = r#"{"result":"error","rates":{"USD":1}}"#;
        assert!(parse_latest(body, "USD").is_err());
    }
}
