mod collector;
mod differ;
mod snapshot;

pub use collector::{InventoryCollector, METADATA_PAGE_SIZE};
pub use differ::{diff, diff_snapshots, ChangeKind, Finding};
pub use snapshot::{
    ColumnRecord, ColumnRecords, ColumnSnapshot, InventorySnapshot, OrderedMap, TableSnapshot,
};
