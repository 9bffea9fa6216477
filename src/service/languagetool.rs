use crate::error::{Error, Result};
use crate::service::{CheckResponse, GrammarService, IssueRecord};
use log::{debug, info};
use reqwest::blocking::Client;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.languagetool.org/v2/check";

/// Blocking client for the LanguageTool `/v2/check` endpoint.
pub struct LanguageToolClient {
    client: Client,
    endpoint: String,
}

impl LanguageToolClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("grammarfix/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::service(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl GrammarService for LanguageToolClient {
    fn check(&self, text: &str, language: &str) -> Result<Vec<IssueRecord>> {
        info!(
            "Checking {} characters against {} ({})",
            text.chars().count(),
            self.endpoint,
            language
        );

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("text", text), ("language", language)])
            .send()
            .map_err(|e| Error::service(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::service(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .map_err(|e| Error::service(format!("failed to read response body: {}", e)))?;
        debug!("Received {} bytes from grammar service", body.len());

        Ok(CheckResponse::parse(&body)?.matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_endpoint_is_service_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let client =
            LanguageToolClient::new("http://127.0.0.1:9/v2/check", Duration::from_millis(500))
                .unwrap();
        let err = client.check("Some text", "en-US").unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));
    }
}
