use clap::Parser;
use site_cloner::SiteCloner;
use site_cloner::generate::HtmlSource;
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URL to clone
    url: String,

    /// Path to cloner configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the HTML
    #[arg(short, long, default_value = "clone.html")]
    output: PathBuf,
}

/// Clones one page in-process, without the job layer, and reports which
/// rendering path produced the HTML.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    let mut cloner = SiteCloner::new();
    if let Some(path) = &args.config {
        cloner = cloner.with_config_file(path)?;
    }

    let config = cloner.config();
    println!("Cloner configuration:");
    println!("  WebDriver URL: {}", config.browser.webdriver_url);
    println!("  Settle delay: {}ms", config.browser.settle_delay_ms);
    println!("  Generation model: {}", config.generation.model);
    println!("  Quality threshold: {}", config.generation.quality_threshold);

    let scraper = cloner.build_scraper()?;
    let orchestrator = cloner.build_orchestrator()?;

    let scrape = scraper.scrape(&args.url).await;
    if !scrape.success {
        return Err(format!(
            "scraping failed: {}",
            scrape.error.unwrap_or_default()
        )
        .into());
    }

    println!("Scraped {} via {:?}", scrape.url, scrape.method);
    println!("  Page type: {:?}", scrape.layout_structure.page_type);
    println!(
        "  Sections: {}",
        scrape.content_sections.main_content.sections.len()
    );
    println!(
        "  Navigation items: {}",
        scrape.navigation_analysis.primary_nav.len()
    );

    let output = orchestrator.run(&scrape, &scrape.url).await;
    match &output.source {
        HtmlSource::Generated => println!("Rendered with generation"),
        HtmlSource::Synthesized(reason) => println!("Rendered by synthesis ({})", reason),
    }

    std::fs::write(&args.output, &output.html)?;
    println!("Wrote {} bytes to {}", output.html.len(), args.output.display());

    Ok(())
}
