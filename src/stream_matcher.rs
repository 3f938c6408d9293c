use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};

use csv::StringRecord;
use log::debug;

use crate::compare_options::CompareOptions;
use crate::csv_compare::{CsvCompareError, Side};
use crate::row_key::RowKeyExt;
use crate::row_registry::RowRegistry;
use crate::visitor::{notify_all, ComparisonVisitor};

/// Consumes one side's row stream, resolving each row against the opposite
/// side's registry.
///
/// A row whose key is found in the opposite registry is classified
/// Kept/Modified right away; the check-and-remove is a single atomic step,
/// so the key can never be classified again. A row whose key is not found
/// is stored in this side's own registry for the sibling matcher, or
/// ultimately the reconciler, to resolve.
pub(crate) struct StreamMatcher<'a> {
    side: Side,
    own_registry: &'a RowRegistry,
    other_registry: &'a RowRegistry,
    visitors: &'a [&'a dyn ComparisonVisitor],
    headers: &'a StringRecord,
    options: &'a CompareOptions,
    abort: &'a AtomicBool,
}

impl<'a> StreamMatcher<'a> {
    pub fn new(
        side: Side,
        own_registry: &'a RowRegistry,
        other_registry: &'a RowRegistry,
        visitors: &'a [&'a dyn ComparisonVisitor],
        headers: &'a StringRecord,
        options: &'a CompareOptions,
        abort: &'a AtomicBool,
    ) -> Self {
        Self {
            side,
            own_registry,
            other_registry,
            visitors,
            headers,
            options,
            abort,
        }
    }

    /// Processes the side's records in arrival order. Returns early, without
    /// an error of its own, once the sibling task has flagged a failure.
    pub fn scan<R: Read>(&self, reader: &mut csv::Reader<R>) -> Result<(), CsvCompareError> {
        for record in reader.records() {
            if self.abort.load(Ordering::Relaxed) {
                debug!("{} scan stopped early, sibling scan failed", self.side);
                return Ok(());
            }
            let record = record.map_err(|source| CsvCompareError::Csv {
                side: self.side,
                source,
            })?;
            let key = record.identity_key(self.options.identity_columns());
            match self.other_registry.take(&key) {
                Some(other_row) => {
                    if self.options.rows_equal(&record, &other_row) {
                        notify_all(self.visitors, self.side.scan_stage(), |v| {
                            v.row_kept(&record, self.headers, self.options)
                        })?;
                    } else {
                        notify_all(self.visitors, self.side.scan_stage(), |v| {
                            v.row_modified(&record, self.headers, self.options)
                        })?;
                    }
                }
                None => self.own_registry.put(key, record),
            }
        }
        debug!(
            "{} scan drained, {} rows left for reconciliation",
            self.side,
            self.own_registry.len()
        );
        Ok(())
    }

    /// Flags the sibling scan to stop; checked once per record.
    pub fn request_abort(&self) {
        self.abort.store(true, Ordering::Relaxed);
    }
}
