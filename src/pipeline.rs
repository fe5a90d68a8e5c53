//! Resilient scraping: browser analysis first, plain fetch second.

use crate::analyzer::PageAnalyzer;
use crate::fetch::FallbackFetcher;
use crate::results::ScrapeResult;
use crate::utils::normalize_url;
use async_trait::async_trait;

/// Anything that turns a URL into a [`ScrapeResult`]
#[async_trait]
pub trait SiteScraper: Send + Sync {
    /// Always returns a result; failures are reported through `success`
    async fn scrape(&self, url: &str) -> ScrapeResult;
}

/// Layout-aware analysis with a plain HTTP fallback
pub struct ResilientScraper {
    analyzer: PageAnalyzer,
    fetcher: FallbackFetcher,
}

impl ResilientScraper {
    pub fn new(analyzer: PageAnalyzer, fetcher: FallbackFetcher) -> Self {
        Self { analyzer, fetcher }
    }
}

#[async_trait]
impl SiteScraper for ResilientScraper {
    async fn scrape(&self, url: &str) -> ScrapeResult {
        let url = normalize_url(url);
        match self.analyzer.analyze(&url).await {
            Ok(result) => result,
            Err(e) => {
                ::log::warn!(
                    "Layout-aware analysis failed for {}: {}; falling back to plain fetch",
                    url,
                    e
                );
                self.fetcher.fetch_or_fallback(&url).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::testing::{MockLauncher, quick_config};
    use crate::config::FetchConfig;
    use crate::fetch::testing::serve;
    use crate::results::ScrapeMethod;
    use std::sync::Arc;

    fn scraper(launcher: Arc<MockLauncher>) -> ResilientScraper {
        ResilientScraper::new(
            PageAnalyzer::with_launcher(quick_config(), launcher),
            FallbackFetcher::new(&FetchConfig::default()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_bare_host_is_normalized_before_navigation() {
        let launcher = Arc::new(MockLauncher {
            html: "<html><head><title>Example Domain</title></head><body></body></html>".into(),
            ..MockLauncher::default()
        });

        let result = scraper(launcher.clone()).scrape("example.com").await;

        assert!(result.success);
        assert_eq!(result.method, ScrapeMethod::LayoutAware);
        assert_eq!(result.url, "https://example.com");
        assert_eq!(*launcher.visited.lock().unwrap(), vec!["https://example.com"]);
    }

    #[tokio::test]
    async fn test_launch_failure_falls_back_to_fetch() {
        let url = serve(200, "<html><body>fallback body</body></html>", 1);
        let launcher = Arc::new(MockLauncher {
            fail_launch: true,
            ..MockLauncher::default()
        });

        let result = scraper(launcher).scrape(&url).await;

        assert!(result.success);
        assert_eq!(result.method, ScrapeMethod::Fallback);
        assert!(result.html.contains("fallback body"));
    }

    #[tokio::test]
    async fn test_both_paths_failing_reports_failure() {
        let url = serve(500, "boom", 1);
        let launcher = Arc::new(MockLauncher {
            fail_goto: true,
            ..MockLauncher::default()
        });

        let result = scraper(launcher).scrape(&url).await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("HTTP status 500"));
    }
}
