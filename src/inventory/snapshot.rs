use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::client::ColumnMetadata;

/// Map preserving insertion order. Findings are reported in the iteration
/// order of the new snapshot, so the engine's response order must survive
/// into the diff.
#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
    index: HashMap<K, usize>,
}

impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq + Hash + Clone, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash + Clone, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Table metadata id -> table name, for every table under one ruleset.
pub type TableSnapshot = OrderedMap<i64, String>;

/// Column name -> record, for one table.
pub type ColumnRecords = OrderedMap<String, ColumnRecord>;

/// Table name -> columns, for every table under one ruleset.
pub type ColumnSnapshot = OrderedMap<String, ColumnRecords>;

/// The comparable metadata of one column. The legacy scripts carried this as
/// the pipe-joined string `dataType|columnLength|isMasked|algorithm|writable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRecord {
    pub data_type: String,
    pub column_length: i64,
    /// PII indicator: the column is flagged as requiring masking.
    pub is_masked: bool,
    /// Empty until the profiler assigns a masking algorithm.
    pub algorithm: String,
    pub profiler_writable: bool,
}

impl ColumnRecord {
    /// Parse the legacy pipe-joined encoding, e.g. `varchar|50|true|SSN_MASK|true`.
    pub fn parse(encoded: &str) -> Option<Self> {
        let mut parts = encoded.split('|');
        let data_type = parts.next()?.to_string();
        let column_length = parts.next()?.parse().ok()?;
        let is_masked = parts.next()?.parse().ok()?;
        let algorithm = parts.next()?.to_string();
        let profiler_writable = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            data_type,
            column_length,
            is_masked,
            algorithm,
            profiler_writable,
        })
    }
}

impl fmt::Display for ColumnRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}",
            self.data_type, self.column_length, self.is_masked, self.algorithm, self.profiler_writable
        )
    }
}

impl From<ColumnMetadata> for ColumnRecord {
    fn from(meta: ColumnMetadata) -> Self {
        Self {
            data_type: meta.data_type,
            column_length: meta.column_length,
            is_masked: meta.is_masked,
            algorithm: meta.algorithm_name.unwrap_or_default(),
            profiler_writable: meta.is_profiler_writable,
        }
    }
}

/// Table and column metadata of one ruleset, taken in a single pass.
#[derive(Debug, Clone, PartialEq)]
pub struct InventorySnapshot {
    pub ruleset_id: i64,
    pub tables: TableSnapshot,
    pub columns: ColumnSnapshot,
}
