//! Browser sessions driven over WebDriver.

use super::scripts;
use crate::config::BrowserConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tokio::time::timeout;

/// Tallest window we will request for a full-page capture
const MAX_CAPTURE_HEIGHT: u32 = 16_384;

/// One exclusively-owned browser tab
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Navigate and wait until content is loaded
    async fn goto(&self, url: &str) -> Result<()>;

    /// Run a script body in the page and return its JSON result
    async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value>;

    /// Serialized current DOM
    async fn source(&self) -> Result<String>;

    /// PNG of the whole document
    async fn screenshot_full_page(&self) -> Result<Vec<u8>>;

    /// Release the tab and the browsing context
    async fn close(&self) -> Result<()>;
}

/// Opens fresh sessions, one per analysis
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}

/// Launches headless Chrome sessions through a WebDriver server
pub struct WebDriverLauncher {
    config: BrowserConfig,
}

impl WebDriverLauncher {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    fn capabilities(&self) -> Map<String, Value> {
        let cfg = &self.config;
        let page_load_ms = cfg.navigation_timeout().as_millis() as u64;
        let mut caps = Map::new();
        caps.insert("browserName".into(), json!("chrome"));
        // Return from navigation once DOMContentLoaded fires
        caps.insert("pageLoadStrategy".into(), json!("eager"));
        caps.insert(
            "timeouts".into(),
            json!({ "pageLoad": page_load_ms, "script": page_load_ms }),
        );
        caps.insert(
            "goog:chromeOptions".into(),
            json!({
                "args": [
                    "--headless=new",
                    "--no-sandbox",
                    "--disable-setuid-sandbox",
                    "--disable-dev-shm-usage",
                    "--disable-gpu",
                    "--no-first-run",
                    format!("--window-size={},{}", cfg.viewport_width, cfg.viewport_height),
                    format!("--user-agent={}", cfg.user_agent),
                ]
            }),
        );
        caps
    }

    async fn connect(&self, webdriver_url: &str) -> Result<Client> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());
        Ok(builder.connect(webdriver_url).await?)
    }
}

#[async_trait]
impl SessionLauncher for WebDriverLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let primary = self.config.webdriver_url.as_str();

        let client = match self.connect(primary).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", primary);
                Some(client)
            }
            Err(e) => {
                ::log::error!("Failed to connect to WebDriver at {}: {}", primary, e);
                None
            }
        };

        let client = match client {
            Some(client) => client,
            None => {
                // Common local WebDriver ports
                let fallback_urls = ["http://localhost:9515", "http://127.0.0.1:4444"];
                let mut found = None;
                for url in fallback_urls.iter().filter(|u| **u != primary) {
                    ::log::info!("Trying fallback WebDriver URL: {}", url);
                    if let Ok(client) = self.connect(url).await {
                        ::log::debug!("Connected to fallback WebDriver at {}", url);
                        found = Some(client);
                        break;
                    }
                }
                found.ok_or_else(|| {
                    Error::WebDriver(
                        "no WebDriver server reachable; set WEBDRIVER_URL or start chromedriver"
                            .into(),
                    )
                })?
            }
        };

        client
            .set_window_size(self.config.viewport_width, self.config.viewport_height)
            .await?;

        Ok(Box::new(WebDriverSession {
            client,
            config: self.config.clone(),
        }))
    }
}

/// A single WebDriver-controlled tab
pub struct WebDriverSession {
    client: Client,
    config: BrowserConfig,
}

#[derive(Debug, Deserialize)]
struct PageSize {
    width: f64,
    height: f64,
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn goto(&self, url: &str) -> Result<()> {
        let limit = self.config.navigation_timeout();
        match timeout(limit, self.client.goto(url)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(Error::Navigation(format!("{}: {}", url, e))),
            Err(_) => Err(Error::Timeout(limit.as_millis() as u64)),
        }
    }

    async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value> {
        self.client
            .execute(script, args)
            .await
            .map_err(|e| Error::Script(e.to_string()))
    }

    async fn source(&self) -> Result<String> {
        Ok(self.client.source().await?)
    }

    async fn screenshot_full_page(&self) -> Result<Vec<u8>> {
        let size = self.execute(&scripts::page_size(), Vec::new()).await?;
        let size: PageSize = serde_json::from_value(size)?;

        let width = (size.width.ceil() as u32).max(self.config.viewport_width);
        let height = (size.height.ceil() as u32).clamp(self.config.viewport_height, MAX_CAPTURE_HEIGHT);
        self.client.set_window_size(width, height).await?;

        Ok(self.client.screenshot().await?)
    }

    async fn close(&self) -> Result<()> {
        Ok(self.client.clone().close().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities() {
        let launcher = WebDriverLauncher::new(BrowserConfig {
            user_agent: "TestAgent/1.0".into(),
            ..BrowserConfig::default()
        });
        let caps = launcher.capabilities();
        assert_eq!(caps["pageLoadStrategy"], "eager");
        assert_eq!(caps["timeouts"]["pageLoad"], 15000);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.iter().any(|a| a == "--window-size=1280,720"));
        assert!(args.iter().any(|a| a == "--user-agent=TestAgent/1.0"));
    }
}
