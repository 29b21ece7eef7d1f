use tracing::{debug, info};

use crate::client::EngineApi;
use crate::error::Result;
use super::snapshot::{ColumnRecords, ColumnSnapshot, InventorySnapshot, TableSnapshot};

/// Single-page fetch; a ruleset is assumed to fit in one page.
pub const METADATA_PAGE_SIZE: u32 = 5000;

/// Fetches table and column metadata for a ruleset and flattens it into
/// comparable snapshots.
pub struct InventoryCollector<'a, A: EngineApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: EngineApi + ?Sized> InventoryCollector<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    pub async fn collect_tables(&self, ruleset_id: i64) -> Result<TableSnapshot> {
        let mut tables = TableSnapshot::new();
        for meta in self.api.table_metadata(ruleset_id, METADATA_PAGE_SIZE).await? {
            tables.insert(meta.table_metadata_id, meta.table_name);
        }
        debug!("Collected {} tables for ruleset {}", tables.len(), ruleset_id);
        Ok(tables)
    }

    pub async fn collect_columns(&self, table_metadata_id: i64) -> Result<ColumnRecords> {
        let mut columns = ColumnRecords::new();
        for meta in self
            .api
            .column_metadata(table_metadata_id, METADATA_PAGE_SIZE)
            .await?
        {
            let name = meta.column_name.clone();
            columns.insert(name, meta.into());
        }
        Ok(columns)
    }

    /// Record the full inventory of the ruleset behind a profiling job, then
    /// ask the engine to refresh the ruleset. The refresh fires on every
    /// call; snapshotting twice triggers two refreshes.
    pub async fn snapshot(&self, job_id: i64) -> Result<InventorySnapshot> {
        info!("Collect existing inventory for job {}", job_id);

        let job = self.api.profile_job(job_id).await?;
        let tables = self.collect_tables(job.ruleset_id).await?;

        let mut columns = ColumnSnapshot::new();
        for (&table_id, table_name) in tables.iter() {
            let records = self.collect_columns(table_id).await?;
            columns.insert(table_name.clone(), records);
        }

        self.api.refresh_ruleset(job.ruleset_id).await?;

        Ok(InventorySnapshot {
            ruleset_id: job.ruleset_id,
            tables,
            columns,
        })
    }
}
