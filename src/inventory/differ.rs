use std::fmt;

use super::snapshot::{ColumnSnapshot, InventorySnapshot, TableSnapshot};

/// What changed between profiling runs for one table or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    TableAdded,
    TableRenamed,
    ColumnAdded,
    /// The masking flag itself toggled. Most severe; suppresses the
    /// remaining column rules.
    PiiIndicatorChanged,
    AlgorithmChanged,
    DataTypeChanged,
    ColumnLengthChanged,
    /// The records differ but none of the masking rules apply, e.g. a
    /// profiler-writable flip or any change on an unmasked column. The
    /// legacy scripts dropped these silently.
    UnclassifiedChange,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::TableAdded => "new table",
            ChangeKind::TableRenamed => "table renamed",
            ChangeKind::ColumnAdded => "new column",
            ChangeKind::PiiIndicatorChanged => "PII indicator changed",
            ChangeKind::AlgorithmChanged => "algorithm changed",
            ChangeKind::DataTypeChanged => "data type changed",
            ChangeKind::ColumnLengthChanged => "column length changed",
            ChangeKind::UnclassifiedChange => "unclassified change",
        }
    }
}

/// One detected inventory change, rendered for the operator report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub change: ChangeKind,
    pub table: String,
    pub column: Option<String>,
}

impl Finding {
    fn table_level(change: ChangeKind, table: &str) -> Self {
        Self {
            change,
            table: table.to_string(),
            column: None,
        }
    }

    fn column_level(change: ChangeKind, table: &str, column: &str) -> Self {
        Self {
            change,
            table: table.to_string(),
            column: Some(column.to_string()),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let column = self.column.as_deref().unwrap_or_default();
        match self.change {
            ChangeKind::TableAdded => {
                write!(f, "New table added to the inventory. Table: {}", self.table)
            }
            ChangeKind::TableRenamed => {
                write!(f, "Table name changed. New Table name: {}", self.table)
            }
            ChangeKind::ColumnAdded => {
                write!(f, "New column added. Table: {} / Column: {}", self.table, column)
            }
            ChangeKind::PiiIndicatorChanged => write!(
                f,
                "Column PII indicator changed from no PII to PII or vice versa. Table: {} / Column: {}",
                self.table, column
            ),
            ChangeKind::AlgorithmChanged => write!(
                f,
                "Algorithm assignment changed. Table: {} / Column: {}",
                self.table, column
            ),
            ChangeKind::DataTypeChanged => write!(
                f,
                "Data type of PII column changed. Table: {} / Column: {}",
                self.table, column
            ),
            ChangeKind::ColumnLengthChanged => write!(
                f,
                "Column length of PII column changed. Table: {} / Column: {}",
                self.table, column
            ),
            ChangeKind::UnclassifiedChange => write!(
                f,
                "Column metadata changed outside masking rules. Table: {} / Column: {}",
                self.table, column
            ),
        }
    }
}

/// Compare two inventory snapshots taken around a profiling run. Pure over
/// its inputs; findings follow the iteration order of the new snapshot,
/// tables pass first.
///
/// Tables and columns present only in the old snapshot are deliberately
/// never reported, matching the refresh workflow this feeds.
pub fn diff(
    old_tables: &TableSnapshot,
    old_columns: &ColumnSnapshot,
    new_tables: &TableSnapshot,
    new_columns: &ColumnSnapshot,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (id, name) in new_tables.iter() {
        match old_tables.get(id) {
            None => findings.push(Finding::table_level(ChangeKind::TableAdded, name)),
            Some(old_name) if old_name != name => {
                findings.push(Finding::table_level(ChangeKind::TableRenamed, name));
            }
            Some(_) => {}
        }
    }

    for (table, columns) in new_columns.iter() {
        // Columns are only compared for tables known to both snapshots.
        let Some(old_records) = old_columns.get(table) else {
            continue;
        };

        for (column, record) in columns.iter() {
            let Some(old) = old_records.get(column) else {
                findings.push(Finding::column_level(ChangeKind::ColumnAdded, table, column));
                continue;
            };

            if old == record {
                continue;
            }

            // First matching rule wins; the rest are suppressed for this
            // column even if more fields changed.
            let change = if old.is_masked != record.is_masked {
                ChangeKind::PiiIndicatorChanged
            } else if old.is_masked && old.algorithm != record.algorithm {
                ChangeKind::AlgorithmChanged
            } else if old.is_masked && old.data_type != record.data_type {
                ChangeKind::DataTypeChanged
            } else if old.is_masked && old.column_length != record.column_length {
                ChangeKind::ColumnLengthChanged
            } else {
                ChangeKind::UnclassifiedChange
            };
            findings.push(Finding::column_level(change, table, column));
        }
    }

    findings
}

/// Convenience wrapper over [`diff`] for two full snapshots.
pub fn diff_snapshots(old: &InventorySnapshot, new: &InventorySnapshot) -> Vec<Finding> {
    diff(&old.tables, &old.columns, &new.tables, &new.columns)
}
