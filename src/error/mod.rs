use thiserror::Error;

use crate::jobs::JobKind;

#[derive(Error, Debug)]
pub enum MaskDriftError {
    #[error("Authentication against {host} failed: {reason}")]
    AuthenticationFailed { host: String, reason: String },

    #[error("Request in operation '{operation}' failed with status code {status}: {body}")]
    Api {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("{kind} job {job_id} execution interrupted! Please fix the issue with job and resume or restart refresh")]
    JobCancelled { job_id: i64, kind: JobKind },

    #[error("{kind} job {job_id} execution failed! Please check the job logs, fix issue and resume or restart this script")]
    JobFailed { job_id: i64, kind: JobKind },

    #[error("{kind} job {job_id} still running after {waited_secs}s, giving up")]
    PollTimeout {
        job_id: i64,
        kind: JobKind,
        waited_secs: u64,
    },

    #[error("Profiling changes encountered. Stopping Refresh. Check the profile changes report file: {report_path}")]
    InventoryMismatch {
        report_path: String,
        findings: usize,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MaskDriftError {
    /// Process exit code contract: 0 success, 1 engine/job failure,
    /// 2 profiling mismatches detected (refresh blocked).
    pub fn exit_code(&self) -> u8 {
        match self {
            MaskDriftError::InventoryMismatch { .. } => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, MaskDriftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_exits_with_code_2() {
        let err = MaskDriftError::InventoryMismatch {
            report_path: "/tmp/j1_D2024-01-01.txt".into(),
            findings: 3,
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_engine_failures_exit_with_code_1() {
        let errs = [
            MaskDriftError::AuthenticationFailed {
                host: "engine.local".into(),
                reason: "status 401".into(),
            },
            MaskDriftError::Api {
                operation: "extract table-metadata".into(),
                status: 500,
                body: "boom".into(),
            },
            MaskDriftError::JobCancelled {
                job_id: 12,
                kind: JobKind::Profiling,
            },
            MaskDriftError::JobFailed {
                job_id: 12,
                kind: JobKind::Masking,
            },
            MaskDriftError::PollTimeout {
                job_id: 12,
                kind: JobKind::Profiling,
                waited_secs: 7200,
            },
        ];
        for err in errs {
            assert_eq!(err.exit_code(), 1);
        }
    }

    #[test]
    fn test_api_error_display_carries_operation_and_status() {
        let err = MaskDriftError::Api {
            operation: "execute profiling".into(),
            status: 403,
            body: "forbidden".into(),
        };
        let display = err.to_string();
        assert!(display.contains("execute profiling"));
        assert!(display.contains("403"));
    }
}
