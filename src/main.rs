use clap::Parser;
use site_cloner::SiteCloner;
use site_cloner::jobs::{InMemoryJobStore, JobStatus};
use std::process::ExitCode;
use std::sync::Arc;

mod args;
use args::{Args, default_output};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before anything reads the environment
    dotenv::dotenv().ok();

    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            ::log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> site_cloner::Result<ExitCode> {
    let mut cloner = SiteCloner::new();
    if let Some(path) = &args.config {
        cloner = cloner.with_config_file(path)?;
    }

    // Command-line flags win over file and environment
    let config = cloner.config_mut();
    if let Some(url) = &args.webdriver_url {
        config.browser.webdriver_url = url.clone();
    }
    if let Some(delay) = args.settle_delay_ms {
        config.browser.settle_delay_ms = delay;
    }
    if args.no_generate {
        config.generation.disabled = true;
    }
    let poll = config.poll_interval();

    ::log::info!("Starting clone for URL: {}", args.url);
    ::log::info!(
        "Using WebDriver at {} (set WEBDRIVER_URL or --webdriver-url to change)",
        cloner.config().browser.webdriver_url
    );

    let service = cloner.into_service(Arc::new(InMemoryJobStore::new()))?;
    let start_time = std::time::Instant::now();

    let id = service.start_clone(&args.url).await?;
    let job = service.wait_until_terminal(&id, poll).await?;

    ::log::info!(
        "Job {} finished as {} in {:.2} seconds",
        id,
        job.status.as_str(),
        start_time.elapsed().as_secs_f64()
    );

    if let (Some(path), Some(scrape)) = (&args.dump_scrape, &job.scraped_data) {
        std::fs::write(path, serde_json::to_string_pretty(scrape)?)?;
        ::log::info!("Wrote scrape result to {}", path.display());
    }

    if job.status == JobStatus::Failed {
        eprintln!(
            "Clone failed: {}",
            job.error_message.as_deref().unwrap_or("unknown error")
        );
        return Ok(ExitCode::FAILURE);
    }

    if let Some(note) = &job.error_message {
        ::log::warn!("Clone completed with a fallback page: {}", note);
    }

    let output = args.output.unwrap_or_else(|| default_output(&args.url));
    let html = job.cloned_html.unwrap_or_default();
    std::fs::write(&output, &html)?;
    println!("Wrote {} bytes to {}", html.len(), output.display());

    Ok(ExitCode::SUCCESS)
}
