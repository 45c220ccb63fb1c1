use crate::domain::job::{ChallengeAnswer, Job, JobReference, JobStatus};
use crate::domain::ports::{AccessCatalog, JobStore, StoreHandle};
use crate::error::{Result, ServerError};
use crate::infrastructure::sequence::IdSequence;
use std::sync::Arc;
use tracing::{debug, info};

/// Creates and advances access-linking jobs.
///
/// Every transition is computed synchronously from the answers available at
/// call time; a job never waits on anything outside the store.
#[derive(Clone)]
pub struct JobEngine {
    store: StoreHandle,
    ids: Arc<IdSequence>,
}

impl JobEngine {
    pub fn new(store: StoreHandle, ids: Arc<IdSequence>) -> Self {
        Self { store, ids }
    }

    /// Starts a job for `user_id` against `provider_id`.
    ///
    /// An unknown provider yields a job that is already finished with an
    /// `unknown_provider` error. Otherwise the supplied answers are applied
    /// before the job is first persisted, so it may finish within this call.
    pub async fn create(
        &self,
        user_id: &str,
        provider_id: &str,
        answers: Vec<ChallengeAnswer>,
    ) -> Result<JobReference> {
        let id = self.ids.next_id();
        let job = match self.store.lookup(provider_id).await {
            Ok(details) => {
                let mut job = Job::authenticating(id, user_id.to_string(), details);
                job.advance(answers);
                job
            }
            Err(ServerError::UnknownProvider(_)) => {
                debug!(provider_id, "job created against unknown provider");
                Job::unknown_provider(id, user_id.to_string(), provider_id.to_string())
            }
            Err(err) => return Err(err),
        };

        info!(job_id = %job.id, user_id, provider_id, stage = ?job.stage, "job created");
        let reference = JobReference { uri: job.uri() };
        self.persist(job).await?;
        Ok(reference)
    }

    /// Applies `answers` to job `job_id` and returns its new status.
    ///
    /// The store performs the load, the transition and the write under one
    /// lock, so concurrent submissions never overwrite each other's progress.
    pub async fn advance(&self, job_id: &str, answers: Vec<ChallengeAnswer>) -> Result<JobStatus> {
        let (job, linked) = self.store.advance_job(job_id, answers).await?;
        if linked {
            info!(job_id, user_id = %job.user_id, "access linked to user");
        }
        Ok(job.status())
    }

    pub fn status(&self, job: &Job) -> JobStatus {
        job.status()
    }

    async fn persist(&self, job: Job) -> Result<()> {
        let job_id = job.id.clone();
        let user_id = job.user_id.clone();
        if self.store.save_job(job).await? {
            info!(job_id = %job_id, user_id = %user_id, "access linked to user");
        }
        Ok(())
    }
}
