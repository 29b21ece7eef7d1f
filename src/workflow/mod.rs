mod report;

pub use report::MismatchReport;

use std::path::PathBuf;

use chrono::Local;
use tracing::{info, warn};

use crate::client::EngineApi;
use crate::config::Config;
use crate::error::{MaskDriftError, Result};
use crate::inventory::{diff_snapshots, Finding, InventoryCollector};
use crate::jobs::{JobKind, JobRunner, PollPolicy};

/// Outcome of one profiling job: the inventory findings and, when any were
/// detected, the report file they were appended to.
#[derive(Debug)]
pub struct ProfilingRun {
    pub job_id: i64,
    pub findings: Vec<Finding>,
    pub report_path: Option<PathBuf>,
}

impl ProfilingRun {
    /// Mismatches block the refresh: convert them into the error the
    /// top-level handler maps to exit code 2.
    pub fn blocking_error(&self) -> Option<MaskDriftError> {
        if self.findings.is_empty() {
            return None;
        }
        Some(MaskDriftError::InventoryMismatch {
            report_path: self
                .report_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            findings: self.findings.len(),
        })
    }
}

/// Sequences snapshot -> run job -> poll -> snapshot -> diff -> report for
/// profiling jobs, and run -> poll for masking jobs. One engine session,
/// strictly sequential.
pub struct Workflow<'a, A: EngineApi + ?Sized> {
    api: &'a A,
    config: &'a Config,
}

impl<'a, A: EngineApi + ?Sized> Workflow<'a, A> {
    pub fn new(api: &'a A, config: &'a Config) -> Self {
        Self { api, config }
    }

    fn policy(&self) -> PollPolicy {
        PollPolicy::from_config(self.config)
    }

    /// Record the inventory, run the profiling job to completion, record the
    /// inventory again, and diff the two. Findings are appended to the
    /// mismatch report before returning.
    pub async fn run_profiling_job(&self, job_id: i64) -> Result<ProfilingRun> {
        let collector = InventoryCollector::new(self.api);
        let runner = JobRunner::new(self.api);

        let before = collector.snapshot(job_id).await?;
        runner
            .run_to_completion(job_id, JobKind::Profiling, &self.policy())
            .await?;
        let after = collector.snapshot(job_id).await?;

        let findings = diff_snapshots(&before, &after);
        if findings.is_empty() {
            info!("Inventory Profile Matches");
            return Ok(ProfilingRun {
                job_id,
                findings,
                report_path: None,
            });
        }

        warn!(
            "Profiling job {} detected {} inventory changes",
            job_id,
            findings.len()
        );
        let report = MismatchReport {
            host: self.api.host(),
            job_id,
            date: Local::now().date_naive(),
            findings: &findings,
        };
        let report_path = report.append_to(&self.config.report_dir)?;

        Ok(ProfilingRun {
            job_id,
            findings,
            report_path: Some(report_path),
        })
    }

    /// Masking has no inventory pass; submit and wait.
    pub async fn run_masking_job(&self, job_id: i64) -> Result<()> {
        let runner = JobRunner::new(self.api);
        runner
            .run_to_completion(job_id, JobKind::Masking, &self.policy())
            .await?;
        Ok(())
    }

    /// The refresh entry point: every profiling job, then every masking job
    /// from the config. The first profiling mismatch stops the refresh
    /// before any masking runs.
    pub async fn run_refresh(&self) -> Result<()> {
        for &job_id in &self.config.profiling_jobs {
            let run = self.run_profiling_job(job_id).await?;
            if let Some(err) = run.blocking_error() {
                return Err(err);
            }
        }
        for &job_id in &self.config.masking_jobs {
            self.run_masking_job(job_id).await?;
        }
        Ok(())
    }
}
