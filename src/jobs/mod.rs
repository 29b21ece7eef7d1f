mod runner;

pub use runner::{JobRunner, PollPolicy};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which kind of compliance-engine job is being driven. Profiling scans a
/// ruleset for PII candidates; masking applies the assigned algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Profiling,
    Masking,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Profiling => "profiling",
            JobKind::Masking => "masking",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExecutionStatus {
    Running,
    Succeeded,
    Cancelled,
    Failed,
}

impl ExecutionStatus {
    /// RUNNING is the only non-terminal state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExecutionStatus::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Running => "RUNNING",
            ExecutionStatus::Succeeded => "SUCCEEDED",
            ExecutionStatus::Cancelled => "CANCELLED",
            ExecutionStatus::Failed => "FAILED",
        }
    }
}

/// One poll result for a submitted execution.
#[derive(Debug, Clone)]
pub struct JobExecution {
    pub execution_id: i64,
    pub job_id: i64,
    pub status: ExecutionStatus,
}
