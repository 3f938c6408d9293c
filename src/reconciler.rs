use csv::StringRecord;
use log::debug;

use crate::compare_options::CompareOptions;
use crate::csv_compare::{CsvCompareError, Stage};
use crate::row_registry::RowRegistry;
use crate::visitor::{notify_all, ComparisonVisitor};

/// Classifies every row left unmatched once both scans have joined.
///
/// The scan-phase lookup is a point-in-time check, not a standing
/// subscription: a key can land in one registry strictly after the opposite
/// matcher already finished scanning. Draining both registries behind the
/// barrier guarantees each remaining key is classified exactly once,
/// whatever the interleaving of the two scans was.
pub(crate) fn reconcile(
    expected_registry: RowRegistry,
    actual_registry: RowRegistry,
    visitors: &[&dyn ComparisonVisitor],
    headers: &StringRecord,
    options: &CompareOptions,
) -> Result<(), CsvCompareError> {
    debug!(
        "reconciling {} expected and {} actual leftover rows",
        expected_registry.len(),
        actual_registry.len()
    );

    for (key, expected_row) in expected_registry.into_entries() {
        match actual_registry.take(&key) {
            None => {
                notify_all(visitors, Stage::Reconcile, |v| {
                    v.row_deleted(&expected_row, headers, options)
                })?;
            }
            // both sides saw the key, but each arrived after the other's scan
            // had already checked for it
            Some(actual_row) => {
                if options.rows_equal(&expected_row, &actual_row) {
                    notify_all(visitors, Stage::Reconcile, |v| {
                        v.row_kept(&expected_row, headers, options)
                    })?;
                } else {
                    notify_all(visitors, Stage::Reconcile, |v| {
                        v.row_modified(&expected_row, headers, options)
                    })?;
                }
            }
        }
    }

    for (_key, actual_row) in actual_registry.into_entries() {
        notify_all(visitors, Stage::Reconcile, |v| {
            v.row_inserted(&actual_row, headers, options)
        })?;
    }

    Ok(())
}
