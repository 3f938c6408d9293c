use std::sync::{Mutex, MutexGuard, PoisonError};

use csv::StringRecord;

use crate::compare_options::CompareOptions;
use crate::visitor::{ComparisonVisitor, VisitorResult};

/// The built-in visitor that buckets every classified row. It is driven in
/// the same visitor list as caller-supplied visitors and turns into the
/// [`CompareResult`](CompareResult) once the comparison is over.
#[derive(Debug, Default)]
pub(crate) struct Collector {
    inner: Mutex<CollectorInner>,
}

#[derive(Debug, Default)]
struct CollectorInner {
    has_deleted: bool,
    has_inserted: bool,
    has_modified: bool,
    rows_kept: Vec<StringRecord>,
    rows_deleted: Vec<StringRecord>,
    rows_inserted: Vec<StringRecord>,
    rows_modified: Vec<StringRecord>,
}

impl Collector {
    fn locked(&self) -> MutexGuard<'_, CollectorInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn into_result(self) -> CompareResult {
        let inner = self
            .inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        CompareResult {
            has_deleted: inner.has_deleted,
            has_inserted: inner.has_inserted,
            has_modified: inner.has_modified,
            rows_kept: inner.rows_kept,
            rows_deleted: inner.rows_deleted,
            rows_inserted: inner.rows_inserted,
            rows_modified: inner.rows_modified,
        }
    }
}

impl ComparisonVisitor for Collector {
    fn row_kept(
        &self,
        row: &StringRecord,
        _headers: &StringRecord,
        _options: &CompareOptions,
    ) -> VisitorResult {
        self.locked().rows_kept.push(row.clone());
        Ok(())
    }

    fn row_deleted(
        &self,
        row: &StringRecord,
        _headers: &StringRecord,
        _options: &CompareOptions,
    ) -> VisitorResult {
        let mut inner = self.locked();
        inner.has_deleted = true;
        inner.rows_deleted.push(row.clone());
        Ok(())
    }

    fn row_inserted(
        &self,
        row: &StringRecord,
        _headers: &StringRecord,
        _options: &CompareOptions,
    ) -> VisitorResult {
        let mut inner = self.locked();
        inner.has_inserted = true;
        inner.rows_inserted.push(row.clone());
        Ok(())
    }

    fn row_modified(
        &self,
        row: &StringRecord,
        _headers: &StringRecord,
        _options: &CompareOptions,
    ) -> VisitorResult {
        let mut inner = self.locked();
        inner.has_modified = true;
        inner.rows_modified.push(row.clone());
        Ok(())
    }
}

/// The terminal, immutable snapshot of a comparison.
///
/// Each bucket holds full rows in discovery order: per side arrival order
/// for the scan phase, registry iteration order for rows classified during
/// reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareResult {
    has_deleted: bool,
    has_inserted: bool,
    has_modified: bool,
    rows_kept: Vec<StringRecord>,
    rows_deleted: Vec<StringRecord>,
    rows_inserted: Vec<StringRecord>,
    rows_modified: Vec<StringRecord>,
}

impl CompareResult {
    pub fn has_deleted(&self) -> bool {
        self.has_deleted
    }

    pub fn has_inserted(&self) -> bool {
        self.has_inserted
    }

    pub fn has_modified(&self) -> bool {
        self.has_modified
    }

    pub fn has_diff(&self) -> bool {
        self.has_deleted || self.has_inserted || self.has_modified
    }

    pub fn rows_kept(&self) -> &[StringRecord] {
        &self.rows_kept
    }

    pub fn rows_deleted(&self) -> &[StringRecord] {
        &self.rows_deleted
    }

    pub fn rows_inserted(&self) -> &[StringRecord] {
        &self.rows_inserted
    }

    pub fn rows_modified(&self) -> &[StringRecord] {
        &self.rows_modified
    }
}
