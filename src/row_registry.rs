use ahash::RandomState;
use csv::StringRecord;
use dashmap::DashMap;

/// The rows of one side whose identity key has not been matched against the
/// opposite side yet.
///
/// During the scan phase exactly one task writes this registry while the
/// sibling task removes from it, so every operation must be atomic on its
/// own; no broader lock is held across operations.
pub(crate) struct RowRegistry {
    rows: DashMap<String, StringRecord, RandomState>,
}

impl RowRegistry {
    pub fn new() -> Self {
        Self {
            rows: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// Stores `row` under `key`. The last-seen row per key wins; an earlier
    /// row with the same key on this side is superseded and will never be
    /// classified.
    pub fn put(&self, key: String, row: StringRecord) {
        self.rows.insert(key, row);
    }

    /// Atomic check-and-remove: returns the row stored under `key`, if any,
    /// removing it so the key can only ever be matched once.
    pub fn take(&self, key: &str) -> Option<StringRecord> {
        self.rows.remove(key).map(|(_, row)| row)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Drains the registry for reconciliation, once no concurrent access
    /// remains.
    pub fn into_entries(self) -> impl Iterator<Item = (String, StringRecord)> {
        self.rows.into_iter()
    }
}
