//! Layout-aware page analysis in a headless browser.

pub mod scripts;
pub mod session;

use crate::config::BrowserConfig;
use crate::error::{Error, Result};
use crate::parsers::selectors::chains_json;
use crate::parsers::views::{DesignProbe, NavProbe, order_sections};
use crate::parsers::{RenderedViews, parse_rendered};
use crate::results::{ContentSections, LayoutStructure, ScrapeMethod, ScrapeResult};
use crate::utils::normalize_url;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

pub use session::{BrowserSession, SessionLauncher, WebDriverLauncher, WebDriverSession};

/// Renders a page and computes its five structured views
pub struct PageAnalyzer {
    launcher: Arc<dyn SessionLauncher>,
    config: BrowserConfig,
}

impl PageAnalyzer {
    /// Analyzer backed by a WebDriver server
    pub fn new(config: BrowserConfig) -> Self {
        let launcher = Arc::new(WebDriverLauncher::new(config.clone()));
        Self { launcher, config }
    }

    /// Analyzer using a custom session launcher
    pub fn with_launcher(config: BrowserConfig, launcher: Arc<dyn SessionLauncher>) -> Self {
        Self { launcher, config }
    }

    /// Render `url` and return a layout-aware [`ScrapeResult`]
    ///
    /// The session is closed on every path, including failures.
    pub async fn analyze(&self, url: &str) -> Result<ScrapeResult> {
        let url = normalize_url(url);
        ::log::info!("Analyzing page layout: {}", url);

        let session = self.launcher.launch().await?;
        let result = self.analyze_with(session.as_ref(), &url).await;

        if let Err(e) = session.close().await {
            ::log::warn!("Failed to close browser session for {}: {}", url, e);
        }

        result
    }

    async fn analyze_with(&self, session: &dyn BrowserSession, url: &str) -> Result<ScrapeResult> {
        session.goto(url).await?;

        let settle = self.config.settle_delay();
        if !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }

        let chains = chains_json();
        let layout_structure: LayoutStructure =
            run_script(session, "layout", &scripts::layout_structure(), &chains).await?;
        let content_sections: ContentSections =
            run_script(session, "content", &scripts::content_sections(), &chains).await?;
        let design: DesignProbe =
            run_script(session, "design", &scripts::design_system(), &chains).await?;
        let nav_probe = nav_probe(session, &chains).await;

        let html = session.source().await?;
        let RenderedViews {
            structured_content,
            mut navigation,
        } = parse_rendered(&html, url);
        if let Some(probe) = nav_probe {
            navigation.nav_style = probe.nav_style();
        }

        let screenshot = if self.config.capture_screenshot {
            match session.screenshot_full_page().await {
                Ok(png) => STANDARD.encode(png),
                Err(e) => {
                    ::log::warn!("Screenshot failed for {}: {}", url, e);
                    String::new()
                }
            }
        } else {
            String::new()
        };

        ::log::info!(
            "Analysis complete for {}: {:?} layout, {} sections",
            url,
            layout_structure.page_type,
            content_sections.main_content.sections.len()
        );

        Ok(ScrapeResult {
            success: true,
            url: url.to_string(),
            method: ScrapeMethod::LayoutAware,
            screenshot,
            html,
            layout_structure,
            content_sections: order_sections(content_sections),
            design_system: design.into_design_system(),
            structured_content,
            navigation_analysis: navigation,
            error: None,
        })
    }
}

/// Execute a view script and decode its result; `null` is an error
async fn run_script<T: DeserializeOwned>(
    session: &dyn BrowserSession,
    name: &str,
    script: &str,
    chains: &Value,
) -> Result<T> {
    let value = session.execute(script, vec![chains.clone()]).await?;
    if value.is_null() {
        return Err(Error::Script(format!("{} script returned null", name)));
    }
    serde_json::from_value(value).map_err(|e| Error::Script(format!("{} script: {}", name, e)))
}

/// Computed nav display, `None` when the page has no navigation region
async fn nav_probe(session: &dyn BrowserSession, chains: &Value) -> Option<NavProbe> {
    match session.execute(&scripts::nav_style(), vec![chains.clone()]).await {
        Ok(Value::Null) => None,
        Ok(value) => serde_json::from_value(value).ok(),
        Err(e) => {
            ::log::debug!("Nav style probe failed: {}", e);
            None
        }
    }
}
