//! Plain HTTP fetch used when the browser path is unavailable.

use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::results::ScrapeResult;
use crate::utils::normalize_url;
use reqwest::Client;

/// Non-rendering fetcher producing fallback-method results
pub struct FallbackFetcher {
    client: Client,
}

impl FallbackFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// GET the page body, failing on transport errors and non-2xx statuses
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }
        Ok(response.text().await?)
    }

    /// Fetch `url` and wrap the outcome as a [`ScrapeResult`]
    ///
    /// Never returns an error: failures become `success = false` results.
    pub async fn fetch_or_fallback(&self, url: &str) -> ScrapeResult {
        let url = normalize_url(url);
        ::log::info!("Fetching {} without rendering", url);

        match self.fetch(&url).await {
            Ok(html) => {
                ::log::debug!("Fallback fetch got {} bytes from {}", html.len(), url);
                ScrapeResult::fallback(&url, html)
            }
            Err(e) => {
                ::log::error!("Fallback fetch failed for {}: {}", url, e);
                ScrapeResult::failed(&url, e.to_string())
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::serve;
    use super::*;
    use crate::results::ScrapeMethod;

    #[tokio::test]
    async fn test_fetch_success_is_fallback_result() {
        let url = serve(200, "<html><body><h1>Plain</h1></body></html>", 1);
        let fetcher = FallbackFetcher::new(&FetchConfig::default()).unwrap();

        let result = fetcher.fetch_or_fallback(&url).await;

        assert!(result.success);
        assert_eq!(result.method, ScrapeMethod::Fallback);
        assert!(result.html.contains("<h1>Plain</h1>"));
        assert_eq!(result.structured_content.page_title, "Website");
        assert!(result.screenshot.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status_fails() {
        let url = serve(404, "missing", 1);
        let fetcher = FallbackFetcher::new(&FetchConfig::default()).unwrap();

        let result = fetcher.fetch_or_fallback(&url).await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("HTTP status 404"));
        assert!(result.html.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_host_fails() {
        let config = FetchConfig {
            timeout_secs: 2,
            ..FetchConfig::default()
        };
        let fetcher = FallbackFetcher::new(&config).unwrap();

        let result = fetcher.fetch_or_fallback("http://127.0.0.1:1/").await;

        assert!(!result.success);
        assert!(result.error.unwrap().starts_with("HTTP request failed"));
    }
}
