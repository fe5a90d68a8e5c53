use super::{CloneJob, JobId, JobStatus};
use crate::error::{Error, Result};
use crate::results::ScrapeResult;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Keyed storage for clone jobs
///
/// Each state transition is one write keyed by job id. Terminal jobs
/// (`completed`, `failed`) accept no further transitions.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert(&self, job: CloneJob) -> Result<()>;

    async fn get(&self, id: &JobId) -> Result<Option<CloneJob>>;

    async fn set_processing(&self, id: &JobId) -> Result<()>;

    async fn attach_scrape(&self, id: &JobId, scrape: ScrapeResult) -> Result<()>;

    /// Terminal success; `note` records a masked problem, if any
    async fn complete(&self, id: &JobId, html: String, note: Option<String>) -> Result<()>;

    /// Terminal failure
    async fn fail(&self, id: &JobId, message: String) -> Result<()>;

    /// All jobs, oldest first
    async fn list(&self) -> Result<Vec<CloneJob>>;

    /// Remove every job, returning how many were removed
    async fn clear(&self) -> Result<usize>;
}

/// Process-local store with no persistence
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<JobId, CloneJob>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn update<F>(&self, id: &JobId, apply: F) -> Result<()>
    where
        F: FnOnce(&mut CloneJob) + Send,
    {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| Error::JobNotFound(id.to_string()))?;
        if job.status.is_terminal() {
            return Err(Error::Store(format!(
                "job {} is already {}",
                id,
                job.status.as_str()
            )));
        }
        apply(job);
        Ok(())
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn insert(&self, job: CloneJob) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(Error::Store(format!("job {} already exists", job.id)));
        }
        jobs.insert(job.id, job);
        Ok(())
    }

    async fn get(&self, id: &JobId) -> Result<Option<CloneJob>> {
        Ok(self.jobs.read().await.get(id).cloned())
    }

    async fn set_processing(&self, id: &JobId) -> Result<()> {
        self.update(id, |job| job.status = JobStatus::Processing)
            .await
    }

    async fn attach_scrape(&self, id: &JobId, scrape: ScrapeResult) -> Result<()> {
        self.update(id, move |job| job.scraped_data = Some(scrape))
            .await
    }

    async fn complete(&self, id: &JobId, html: String, note: Option<String>) -> Result<()> {
        self.update(id, move |job| {
            job.status = JobStatus::Completed;
            job.cloned_html = Some(html);
            job.error_message = note;
        })
        .await
    }

    async fn fail(&self, id: &JobId, message: String) -> Result<()> {
        self.update(id, move |job| {
            job.status = JobStatus::Failed;
            job.error_message = Some(message);
        })
        .await
    }

    async fn list(&self) -> Result<Vec<CloneJob>> {
        let mut jobs: Vec<CloneJob> = self.jobs.read().await.values().cloned().collect();
        jobs.sort_by_key(|job| job.created_at);
        Ok(jobs)
    }

    async fn clear(&self) -> Result<usize> {
        let mut jobs = self.jobs.write().await;
        let count = jobs.len();
        jobs.clear();
        Ok(count)
    }
}
