use crate::domain::ports::{ConfigProvider, PageFetcher};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

/// reqwest-backed fetcher sending a fixed User-Agent on every request.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout_secs: Option<u64>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.user_agent(), config.request_timeout_secs())
    }

    async fn get(&self, url: &str) -> Result<Response> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if status != StatusCode::OK {
            return Err(EtlError::HttpStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        Ok(self.get(url).await?.text().await?)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        Ok(self.get(url).await?.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_sends_user_agent_and_returns_body() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/real-time-billionaires/")
                .header("User-Agent", "Mozilla/5.0");
            then.status(200).body("<html></html>");
        });

        let fetcher = HttpFetcher::new("Mozilla/5.0", None).unwrap();
        let body = fetcher
            .fetch_text(&server.url("/real-time-billionaires/"))
            .await
            .unwrap();

        page_mock.assert();
        assert_eq!(body, "<html></html>");
    }

    #[tokio::test]
    async fn test_non_200_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/moved");
            then.status(204);
        });

        let fetcher = HttpFetcher::new("Mozilla/5.0", Some(5)).unwrap();
        let err = fetcher.fetch_bytes(&server.url("/moved")).await.unwrap_err();

        assert!(matches!(err, EtlError::HttpStatusError { status: 204, .. }));
    }
}
