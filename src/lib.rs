pub mod client;
pub mod config;
pub mod error;
pub mod inventory;
pub mod jobs;
pub mod workflow;

pub use client::{EngineApi, EngineClient};
pub use config::Config;
pub use error::{MaskDriftError, Result};
pub use inventory::{
    diff, diff_snapshots, ChangeKind, ColumnRecord, ColumnRecords, ColumnSnapshot, Finding,
    InventoryCollector, InventorySnapshot, TableSnapshot,
};
pub use jobs::{ExecutionStatus, JobExecution, JobKind, JobRunner, PollPolicy};
pub use workflow::{MismatchReport, ProfilingRun, Workflow};
