use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Top-level configuration for a clone run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClonerConfig {
    /// Headless browser settings used by the page analyzer
    #[serde(default)]
    pub browser: BrowserConfig,

    /// Plain HTTP fallback settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Generation capability and quality gate settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Poll interval used by the CLI while waiting on a job
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Configuration for the WebDriver-backed browser session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Viewport width in CSS pixels
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    /// Viewport height in CSS pixels
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    /// User agent presented by the browser
    #[serde(default = "default_browser_user_agent")]
    pub user_agent: String,

    /// Upper bound on navigation until content loaded
    #[serde(default = "default_navigation_timeout_secs")]
    pub navigation_timeout_secs: u64,

    /// Fixed wait after navigation for late-rendering content
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Whether to capture a full-page screenshot
    #[serde(default = "default_true")]
    pub capture_screenshot: bool,
}

/// Configuration for the non-rendering HTTP fallback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_fetch_timeout_secs")]
    pub timeout_secs: u64,
}

/// Configuration for the generation capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Disable generation entirely and always synthesize
    #[serde(default)]
    pub disabled: bool,

    /// Model name passed to the generation endpoint
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the generation API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_top_k")]
    pub top_k: u32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Request timeout for a single generation call
    #[serde(default = "default_generation_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of structural checks a generated page must pass
    #[serde(default = "default_quality_threshold")]
    pub quality_threshold: usize,

    /// Below this many characters the final HTML is replaced by the emergency page
    #[serde(default = "default_min_html_len")]
    pub min_html_len: usize,
}

impl ClonerConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides (currently only `WEBDRIVER_URL`)
    pub fn apply_env(&mut self) {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.browser.webdriver_url = webdriver_url;
            }
        }
    }

    /// Reject values that would make the pipeline unusable
    pub fn validate(&self) -> Result<()> {
        if self.browser.viewport_width == 0 || self.browser.viewport_height == 0 {
            return Err(Error::Config("viewport dimensions must be positive".into()));
        }
        if self.browser.navigation_timeout_secs == 0 {
            return Err(Error::Config("navigation timeout must be positive".into()));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(Error::Config("fetch timeout must be positive".into()));
        }
        if self.generation.quality_threshold == 0 {
            return Err(Error::Config("quality threshold must be at least 1".into()));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl BrowserConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl GenerationConfig {
    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

impl Default for ClonerConfig {
    fn default() -> Self {
        Self {
            browser: BrowserConfig::default(),
            fetch: FetchConfig::default(),
            generation: GenerationConfig::default(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            user_agent: default_browser_user_agent(),
            navigation_timeout_secs: default_navigation_timeout_secs(),
            settle_delay_ms: default_settle_delay_ms(),
            capture_screenshot: true,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_fetch_user_agent(),
            timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            model: default_model(),
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_generation_timeout_secs(),
            quality_threshold: default_quality_threshold(),
            min_html_len: default_min_html_len(),
        }
    }
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_viewport_height() -> u32 {
    720
}

fn default_browser_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}

fn default_fetch_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_navigation_timeout_secs() -> u64 {
    15
}

/// Crude synchronization: no DOM-quiescence polling is attempted
fn default_settle_delay_ms() -> u64 {
    4000
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_top_p() -> f32 {
    0.9
}

fn default_top_k() -> u32 {
    40
}

fn default_max_output_tokens() -> u32 {
    16384
}

fn default_generation_timeout_secs() -> u64 {
    120
}

fn default_quality_threshold() -> usize {
    8
}

fn default_min_html_len() -> usize {
    100
}

fn default_poll_interval_ms() -> u64 {
    500
}
