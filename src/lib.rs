// Re-export modules
pub mod analyzer;
pub mod config;
pub mod error;
pub mod fetch;
pub mod generate;
pub mod jobs;
pub mod parsers;
pub mod pipeline;
pub mod results;
pub mod synth;
pub mod utils;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use results::ScrapeResult;
pub use synth::synthesize;

use analyzer::PageAnalyzer;
use config::ClonerConfig;
use fetch::FallbackFetcher;
use generate::{GeminiGenerator, Generator, Orchestrator, UnavailableGenerator};
use jobs::{CloneService, JobStore};
use pipeline::{ResilientScraper, SiteScraper};
use std::sync::Arc;

/// Main builder wiring scraper, generator and job layer from configuration
pub struct SiteCloner {
    config: ClonerConfig,
    generator: Option<Arc<dyn Generator>>,
    scraper: Option<Arc<dyn SiteScraper>>,
}

impl SiteCloner {
    /// Builder with default configuration and environment overrides applied
    pub fn new() -> Self {
        let mut config = ClonerConfig::default();
        config.apply_env();
        Self {
            config,
            generator: None,
            scraper: None,
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, mut config: ClonerConfig) -> Self {
        config.apply_env();
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(self, path: impl AsRef<std::path::Path>) -> Result<Self> {
        let config = ClonerConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a string
    pub fn with_config_str(self, config_str: &str) -> Result<Self> {
        let config = ClonerConfig::from_json(config_str)?;
        Ok(self.with_config(config))
    }

    /// Use a custom generation capability instead of the configured one
    pub fn with_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Use a custom scraper instead of browser analysis with fetch fallback
    pub fn with_scraper(mut self, scraper: Arc<dyn SiteScraper>) -> Self {
        self.scraper = Some(scraper);
        self
    }

    pub fn config(&self) -> &ClonerConfig {
        &self.config
    }

    /// Mutable access for command-line overrides
    pub fn config_mut(&mut self) -> &mut ClonerConfig {
        &mut self.config
    }

    pub fn build_scraper(&self) -> Result<Arc<dyn SiteScraper>> {
        if let Some(scraper) = &self.scraper {
            return Ok(Arc::clone(scraper));
        }
        let analyzer = PageAnalyzer::new(self.config.browser.clone());
        let fetcher = FallbackFetcher::new(&self.config.fetch)?;
        Ok(Arc::new(ResilientScraper::new(analyzer, fetcher)))
    }

    pub fn build_orchestrator(&self) -> Result<Orchestrator> {
        let generation = &self.config.generation;
        let generator: Arc<dyn Generator> = match &self.generator {
            Some(generator) => Arc::clone(generator),
            None if generation.disabled => Arc::new(UnavailableGenerator),
            None => Arc::new(GeminiGenerator::new(generation)?),
        };
        Ok(Orchestrator::new(generator, generation))
    }

    /// Job-tracking service backed by `store`
    pub fn into_service(self, store: Arc<dyn JobStore>) -> Result<CloneService> {
        let scraper = self.build_scraper()?;
        let orchestrator = Arc::new(self.build_orchestrator()?);
        Ok(CloneService::new(
            store,
            scraper,
            orchestrator,
            self.config.generation.min_html_len,
        ))
    }

    /// Scrape and render `url` in the current task, without the job layer
    ///
    /// Returns the scrape alongside the HTML. Fails only when every scrape
    /// path failed.
    pub async fn clone_url(&self, url: &str) -> Result<(ScrapeResult, String)> {
        let scraper = self.build_scraper()?;
        let orchestrator = self.build_orchestrator()?;

        let scrape = scraper.scrape(url).await;
        if !scrape.success {
            let error = scrape.error.unwrap_or_else(|| "Unknown scraping error".into());
            return Err(Error::Scrape(error));
        }

        let html = orchestrator.clone_site(&scrape, &scrape.url).await;
        Ok((scrape, html))
    }
}

impl Default for SiteCloner {
    fn default() -> Self {
        Self::new()
    }
}
