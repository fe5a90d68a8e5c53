use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "site-cloner")]
#[command(about = "Renders a web page, extracts its structure and design, and writes a standalone HTML clone")]
#[command(version)]
pub struct Args {
    /// URL of the page to clone (scheme optional)
    pub url: String,

    /// Output file for the cloned HTML (defaults to a name derived from the URL)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL (overrides config and WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Wait after navigation before extracting, in milliseconds
    #[arg(long)]
    pub settle_delay_ms: Option<u64>,

    /// Skip generation and always use the synthesized page
    #[arg(long)]
    pub no_generate: bool,

    /// Also write the scrape result as JSON to this file
    #[arg(long)]
    pub dump_scrape: Option<PathBuf>,
}

/// Output path used when none is given
pub fn default_output(url: &str) -> PathBuf {
    let name = site_cloner::utils::sanitize_filename(url);
    let name = if name.is_empty() { "clone".to_string() } else { name };
    PathBuf::from(format!("{}.html", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = Args::parse_from([
            "site-cloner",
            "example.com",
            "--no-generate",
            "--settle-delay-ms",
            "250",
            "-o",
            "out.html",
        ]);
        assert_eq!(args.url, "example.com");
        assert!(args.no_generate);
        assert_eq!(args.settle_delay_ms, Some(250));
        assert_eq!(args.output, Some(PathBuf::from("out.html")));
        assert!(args.config.is_none());
    }

    #[test]
    fn test_default_output() {
        assert_eq!(
            default_output("https://example.com/about"),
            PathBuf::from("example.com_about.html")
        );
        assert_eq!(default_output(""), PathBuf::from("clone.html"));
    }
}
