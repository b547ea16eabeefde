use crate::domain::ports::DocumentSource;
use crate::utils::error::{MenuError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches menu pages over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!("Making request to: {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(MenuError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/speiseplan.html");
            then.status(200)
                .header("Content-Type", "text/html; charset=utf-8")
                .body("<html><body>Speiseplan</body></html>");
        });

        let source = HttpSource::new().unwrap();
        let body = source.fetch(&server.url("/speiseplan.html")).await.unwrap();

        mock.assert();
        assert!(body.contains("Speiseplan"));
    }

    #[tokio::test]
    async fn test_fetch_rejects_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing.html");
            then.status(404);
        });

        let source = HttpSource::new().unwrap();
        let result = source.fetch(&server.url("/missing.html")).await;

        match result {
            Err(MenuError::HttpStatus { status, .. }) => assert_eq!(status.as_u16(), 404),
            other => panic!("expected HttpStatus error, got {:?}", other),
        }
    }
}
