use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::client::EngineApi;
use crate::config::Config;
use crate::error::{MaskDriftError, Result};
use super::{ExecutionStatus, JobExecution, JobKind};

/// How the wait loop paces itself. The 9 second interval is the cadence the
/// engine operators tuned for; `max_wait` bounds a loop the legacy scripts
/// left unbounded.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_wait: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(crate::config::DEFAULT_POLL_INTERVAL_SECS),
            max_wait: Some(Duration::from_secs(crate::config::DEFAULT_POLL_TIMEOUT_SECS)),
        }
    }
}

impl PollPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: Duration::from_secs(config.poll_interval_secs),
            max_wait: (config.poll_timeout_secs > 0)
                .then(|| Duration::from_secs(config.poll_timeout_secs)),
        }
    }
}

/// Submits job executions and drives them to a terminal state.
pub struct JobRunner<'a, A: EngineApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: EngineApi + ?Sized> JobRunner<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    pub async fn submit(&self, job_id: i64, kind: JobKind) -> Result<i64> {
        let execution_id = self.api.submit_execution(job_id).await?;
        info!("{} job {} execution initiated!", kind, job_id);
        Ok(execution_id)
    }

    /// One status fetch; the wait loop owns repetition.
    pub async fn poll(&self, execution_id: i64) -> Result<JobExecution> {
        let detail = self.api.execution(execution_id).await?;
        Ok(JobExecution {
            execution_id: detail.execution_id,
            job_id: detail.job_id,
            status: detail.status,
        })
    }

    /// Poll until terminal, sleeping `interval` between polls. SUCCEEDED is
    /// the only state that lets the workflow continue; CANCELLED and FAILED
    /// need human intervention and abort the whole refresh.
    pub async fn wait(
        &self,
        execution_id: i64,
        job_id: i64,
        kind: JobKind,
        policy: &PollPolicy,
    ) -> Result<JobExecution> {
        let started = Instant::now();
        loop {
            let execution = self.poll(execution_id).await?;
            debug!(
                "{} job {} execution {} status: {}",
                kind,
                job_id,
                execution_id,
                execution.status.as_str()
            );

            match execution.status {
                ExecutionStatus::Succeeded => {
                    info!("{} job {} execution successful!", kind, job_id);
                    return Ok(execution);
                }
                ExecutionStatus::Cancelled => {
                    return Err(MaskDriftError::JobCancelled { job_id, kind });
                }
                ExecutionStatus::Failed => {
                    return Err(MaskDriftError::JobFailed { job_id, kind });
                }
                ExecutionStatus::Running => {}
            }

            if let Some(max_wait) = policy.max_wait {
                let waited = started.elapsed();
                if waited >= max_wait {
                    return Err(MaskDriftError::PollTimeout {
                        job_id,
                        kind,
                        waited_secs: waited.as_secs(),
                    });
                }
            }

            tokio::time::sleep(policy.interval).await;
        }
    }

    /// Submit, then drive to completion.
    pub async fn run_to_completion(
        &self,
        job_id: i64,
        kind: JobKind,
        policy: &PollPolicy,
    ) -> Result<JobExecution> {
        let execution_id = self.submit(job_id, kind).await?;
        self.wait(execution_id, job_id, kind, policy).await
    }
}
