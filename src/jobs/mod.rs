//! Clone jobs: the asynchronous interface around the pipeline.

pub mod emergency;
pub mod store;

use crate::error::{Error, Result};
use crate::generate::Orchestrator;
use crate::pipeline::SiteScraper;
use crate::results::{PageType, ScrapeMethod, ScrapeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub use emergency::emergency_document;
pub use store::{InMemoryJobStore, JobStore};

/// Opaque handle to a job in a [`JobStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for JobId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| Error::JobNotFound(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneJob {
    pub id: JobId,
    pub status: JobStatus,
    pub original_url: String,
    pub cloned_html: Option<String>,
    pub error_message: Option<String>,
    pub scraped_data: Option<ScrapeResult>,
    /// Milliseconds since the Unix epoch
    pub created_at: u64,
}

impl CloneJob {
    pub fn pending(url: &str) -> Self {
        Self {
            id: JobId::new(),
            status: JobStatus::Pending,
            original_url: url.to_string(),
            cloned_html: None,
            error_message: None,
            scraped_data: None,
            created_at: now_millis(),
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// One row of [`CloneService::list_jobs`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub id: JobId,
    pub status: JobStatus,
    pub url: String,
    pub html_length: usize,
    pub error: Option<String>,
    pub created_at: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub generator_available: bool,
    pub active_jobs: usize,
    pub total_jobs: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    pub id: JobId,
    pub status: JobStatus,
    pub original_url: String,
    pub cloned_html_length: usize,
    pub error_message: Option<String>,
    pub scrape: Option<ScrapeSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeSummary {
    pub method: ScrapeMethod,
    pub success: bool,
    pub page_type: PageType,
    pub section_count: usize,
    pub heading_count: usize,
    pub nav_item_count: usize,
    pub has_screenshot: bool,
}

impl From<&ScrapeResult> for ScrapeSummary {
    fn from(scrape: &ScrapeResult) -> Self {
        Self {
            method: scrape.method,
            success: scrape.success,
            page_type: scrape.layout_structure.page_type,
            section_count: scrape.content_sections.main_content.sections.len(),
            heading_count: scrape.structured_content.headings_hierarchy.len(),
            nav_item_count: scrape.navigation_analysis.primary_nav.len(),
            has_screenshot: !scrape.screenshot.is_empty(),
        }
    }
}

/// Runs clone pipelines in the background and tracks them in a [`JobStore`]
#[derive(Clone)]
pub struct CloneService {
    store: Arc<dyn JobStore>,
    scraper: Arc<dyn SiteScraper>,
    orchestrator: Arc<Orchestrator>,
    min_html_len: usize,
}

impl CloneService {
    pub fn new(
        store: Arc<dyn JobStore>,
        scraper: Arc<dyn SiteScraper>,
        orchestrator: Arc<Orchestrator>,
        min_html_len: usize,
    ) -> Self {
        Self {
            store,
            scraper,
            orchestrator,
            min_html_len,
        }
    }

    /// Create a pending job and schedule its pipeline; returns immediately
    pub async fn start_clone(&self, url: &str) -> Result<JobId> {
        let job = CloneJob::pending(url);
        let id = job.id;
        self.store.insert(job).await?;
        ::log::info!("Starting clone job {} for {}", id, url);

        let service = self.clone();
        let url = url.to_string();
        tokio::spawn(async move { service.supervise(id, url).await });

        Ok(id)
    }

    pub async fn get_result(&self, id: &JobId) -> Result<CloneJob> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| Error::JobNotFound(id.to_string()))
    }

    pub async fn list_jobs(&self) -> Result<Vec<JobSummary>> {
        let jobs = self.store.list().await?;
        Ok(jobs
            .into_iter()
            .map(|job| JobSummary {
                id: job.id,
                status: job.status,
                url: job.original_url,
                html_length: job.cloned_html.as_ref().map_or(0, String::len),
                error: job.error_message,
                created_at: job.created_at,
            })
            .collect())
    }

    pub async fn clear_jobs(&self) -> Result<usize> {
        let count = self.store.clear().await?;
        ::log::info!("Cleared {} jobs", count);
        Ok(count)
    }

    pub async fn health(&self) -> Result<HealthReport> {
        let jobs = self.store.list().await?;
        Ok(HealthReport {
            status: "healthy",
            generator_available: self.orchestrator.generator_available(),
            active_jobs: jobs
                .iter()
                .filter(|job| job.status == JobStatus::Processing)
                .count(),
            total_jobs: jobs.len(),
        })
    }

    pub async fn debug_info(&self, id: &JobId) -> Result<DebugInfo> {
        let job = self.get_result(id).await?;
        Ok(DebugInfo {
            id: job.id,
            status: job.status,
            original_url: job.original_url,
            cloned_html_length: job.cloned_html.as_ref().map_or(0, String::len),
            error_message: job.error_message,
            scrape: job.scraped_data.as_ref().map(ScrapeSummary::from),
        })
    }

    /// Poll until the job reaches a terminal state
    pub async fn wait_until_terminal(&self, id: &JobId, poll: Duration) -> Result<CloneJob> {
        loop {
            let job = self.get_result(id).await?;
            if job.status.is_terminal() {
                return Ok(job);
            }
            tokio::time::sleep(poll).await;
        }
    }

    /// Run the pipeline in its own task so a panic is caught and recovered here
    async fn supervise(self, id: JobId, url: String) {
        let worker = self.clone();
        let task_url = url.clone();
        let handle = tokio::spawn(async move { worker.run_pipeline(&id, &task_url).await });

        let problem = match handle.await {
            Ok(Ok(())) => return,
            Ok(Err(e)) => e.to_string(),
            Err(e) => format!("pipeline task aborted: {}", e),
        };
        self.recover(&id, &url, problem).await;
    }

    async fn run_pipeline(&self, id: &JobId, url: &str) -> Result<()> {
        self.store.set_processing(id).await?;
        ::log::debug!("Job {} is processing", id);

        let scrape = self.scraper.scrape(url).await;
        if !scrape.success {
            let error = scrape
                .error
                .as_deref()
                .unwrap_or("Unknown scraping error");
            ::log::error!("Job {} scraping failed: {}", id, error);
            return self
                .store
                .fail(id, format!("Scraping failed: {}", error))
                .await;
        }

        let page_url = if scrape.url.is_empty() {
            url.to_string()
        } else {
            scrape.url.clone()
        };
        self.store.attach_scrape(id, scrape.clone()).await?;

        let mut html = self.orchestrator.clone_site(&scrape, &page_url).await;
        if html.trim().len() < self.min_html_len {
            ::log::warn!(
                "Job {} produced only {} bytes of HTML, using emergency page",
                id,
                html.len()
            );
            html = emergency_document(&page_url)?;
        }

        ::log::info!("Job {} completed: {} bytes of HTML", id, html.len());
        self.store.complete(id, html, None).await
    }

    /// Last line of defence: mask the failure with the emergency page when possible
    async fn recover(&self, id: &JobId, url: &str, problem: String) {
        ::log::error!("Job {} hit a processing error: {}", id, problem);
        let message = format!("Processing error: {}", problem);

        let outcome = match emergency_document(url) {
            Ok(html) => {
                ::log::warn!("Job {} completed with the emergency page", id);
                self.store.complete(id, html, Some(message)).await
            }
            Err(e) => {
                ::log::error!("Job {} emergency page unavailable: {}", id, e);
                self.store.fail(id, message).await
            }
        };

        if let Err(e) = outcome {
            ::log::error!("Job {} could not be finalized: {}", id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::generate::Generator;
    use crate::generate::orchestrator::testing::ScriptedGenerator;
    use crate::synth::synthesize;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const POLL: Duration = Duration::from_millis(5);

    struct CannedScraper {
        result: ScrapeResult,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SiteScraper for CannedScraper {
        async fn scrape(&self, _url: &str) -> ScrapeResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    struct PanickingScraper;

    #[async_trait]
    impl SiteScraper for PanickingScraper {
        async fn scrape(&self, url: &str) -> ScrapeResult {
            panic!("browser crashed while scraping {}", url);
        }
    }

    fn service_with(
        scraper: Arc<dyn SiteScraper>,
        generator: Arc<dyn Generator>,
    ) -> CloneService {
        let orchestrator = Arc::new(Orchestrator::new(generator, &GenerationConfig::default()));
        CloneService::new(Arc::new(InMemoryJobStore::new()), scraper, orchestrator, 100)
    }

    fn canned(result: ScrapeResult) -> Arc<CannedScraper> {
        Arc::new(CannedScraper {
            result,
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_failed_scrape_fails_job_without_generation() {
        let scraper = canned(ScrapeResult::failed("https://down.test", "HTTP status 503"));
        let generator = Arc::new(ScriptedGenerator::replying("unused"));
        let service = service_with(scraper, generator.clone());

        let id = service.start_clone("https://down.test").await.unwrap();
        let job = service.wait_until_terminal(&id, POLL).await.unwrap();

        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error_message.as_deref(), Some("Scraping failed: HTTP status 503"));
        assert!(job.cloned_html.is_none());
        assert!(job.scraped_data.is_none());
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_generator_completes_with_synthesis() {
        let scrape = ScrapeResult::fallback("https://example.com", "<html></html>".into());
        let expected = synthesize(&scrape, "https://example.com");
        let scraper = canned(scrape);
        let service = service_with(scraper.clone(), Arc::new(ScriptedGenerator::unavailable()));

        let id = service.start_clone("https://example.com").await.unwrap();
        let job = service.wait_until_terminal(&id, POLL).await.unwrap();

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.cloned_html.as_deref(), Some(expected.as_str()));
        assert!(job.error_message.is_none());
        assert!(job.scraped_data.is_some());
        assert_eq!(scraper.calls.load(Ordering::SeqCst), 1);

        let debug = service.debug_info(&id).await.unwrap();
        let summary = debug.scrape.unwrap();
        assert_eq!(summary.method, ScrapeMethod::Fallback);
        assert!(!summary.has_screenshot);
    }

    #[tokio::test]
    async fn test_pipeline_panic_is_masked_as_completed_emergency_page() {
        // Intentional masking: a crashed pipeline still yields a completed job
        let service = service_with(
            Arc::new(PanickingScraper),
            Arc::new(ScriptedGenerator::unavailable()),
        );

        let id = service.start_clone("https://crash.test").await.unwrap();
        let job = service.wait_until_terminal(&id, POLL).await.unwrap();

        assert_eq!(job.status, JobStatus::Completed);
        let html = job.cloned_html.unwrap();
        assert!(html.contains("Website Successfully Cloned"));
        assert!(html.contains("href=\"https://crash.test\""));
        assert!(job.error_message.unwrap().starts_with("Processing error:"));
    }

    #[tokio::test]
    async fn test_masked_panic_links_to_normalized_bare_host() {
        let service = service_with(
            Arc::new(PanickingScraper),
            Arc::new(ScriptedGenerator::unavailable()),
        );

        let id = service.start_clone("crash.test").await.unwrap();
        let job = service.wait_until_terminal(&id, POLL).await.unwrap();

        assert_eq!(job.status, JobStatus::Completed);
        let html = job.cloned_html.unwrap();
        assert!(html.contains("href=\"https://crash.test\""));
        assert!(!html.contains("href=\"crash.test\""));
    }

    #[tokio::test]
    async fn test_failure_without_url_cannot_be_masked() {
        let service = service_with(
            Arc::new(PanickingScraper),
            Arc::new(ScriptedGenerator::unavailable()),
        );

        let id = service.start_clone("").await.unwrap();
        let job = service.wait_until_terminal(&id, POLL).await.unwrap();

        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.error_message.unwrap().starts_with("Processing error:"));
        assert!(job.cloned_html.is_none());
    }

    #[tokio::test]
    async fn test_tiny_output_replaced_by_emergency_page() {
        let scrape = ScrapeResult::fallback("https://example.com", String::new());
        let service = CloneService::new(
            Arc::new(InMemoryJobStore::new()),
            canned(scrape),
            Arc::new(Orchestrator::new(
                Arc::new(ScriptedGenerator::unavailable()),
                &GenerationConfig::default(),
            )),
            usize::MAX,
        );

        let id = service.start_clone("https://example.com").await.unwrap();
        let job = service.wait_until_terminal(&id, POLL).await.unwrap();

        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.cloned_html.unwrap().contains("Website Successfully Cloned"));
    }

    #[tokio::test]
    async fn test_listing_health_and_clear() {
        let service = service_with(
            canned(ScrapeResult::fallback("https://example.com", String::new())),
            Arc::new(ScriptedGenerator::unavailable()),
        );
        let a = service.start_clone("https://example.com").await.unwrap();
        let b = service.start_clone("https://example.com").await.unwrap();
        service.wait_until_terminal(&a, POLL).await.unwrap();
        service.wait_until_terminal(&b, POLL).await.unwrap();

        let jobs = service.list_jobs().await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|j| j.html_length > 0));

        let health = service.health().await.unwrap();
        assert_eq!(health.total_jobs, 2);
        assert_eq!(health.active_jobs, 0);
        assert!(!health.generator_available);

        assert_eq!(service.clear_jobs().await.unwrap(), 2);
        assert!(matches!(
            service.get_result(&a).await.unwrap_err(),
            Error::JobNotFound(_)
        ));
    }

    #[test]
    fn test_job_id_round_trips_through_text() {
        let id = JobId::new();
        let parsed: JobId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-job".parse::<JobId>().is_err());
    }
}
