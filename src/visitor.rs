use csv::StringRecord;

use crate::compare_options::CompareOptions;
use crate::csv_compare::{CsvCompareError, Stage};

/// What a single visitor notification may return. An `Err` aborts the whole
/// comparison; no partial notification replay occurs.
pub type VisitorResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Descriptors of the two inputs being compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareSources {
    pub expected: String,
    pub actual: String,
}

/// Observer of every classified row.
///
/// All methods default to no-ops, so an implementation only overrides the
/// outcomes it cares about. `row_kept` and `row_modified` are invoked
/// concurrently from the two scan tasks (hence the `Sync` bound) and once
/// more, single-threaded, during reconciliation. `row_deleted` and
/// `row_inserted` only ever fire during reconciliation, strictly after all
/// scan-phase notifications. No ordering is guaranteed between the two
/// sides' notifications during the scan phase.
pub trait ComparisonVisitor: Sync {
    fn visit_started(&self, _sources: &CompareSources) -> VisitorResult {
        Ok(())
    }

    fn row_kept(
        &self,
        _row: &StringRecord,
        _headers: &StringRecord,
        _options: &CompareOptions,
    ) -> VisitorResult {
        Ok(())
    }

    fn row_deleted(
        &self,
        _row: &StringRecord,
        _headers: &StringRecord,
        _options: &CompareOptions,
    ) -> VisitorResult {
        Ok(())
    }

    fn row_inserted(
        &self,
        _row: &StringRecord,
        _headers: &StringRecord,
        _options: &CompareOptions,
    ) -> VisitorResult {
        Ok(())
    }

    fn row_modified(
        &self,
        _row: &StringRecord,
        _headers: &StringRecord,
        _options: &CompareOptions,
    ) -> VisitorResult {
        Ok(())
    }

    fn visit_ended(&self, _sources: &CompareSources) -> VisitorResult {
        Ok(())
    }
}

/// Drives one notification uniformly over all visitors, stopping at the
/// first failure.
pub(crate) fn notify_all<F>(
    visitors: &[&dyn ComparisonVisitor],
    stage: Stage,
    mut notify: F,
) -> Result<(), CsvCompareError>
where
    F: FnMut(&dyn ComparisonVisitor) -> VisitorResult,
{
    for visitor in visitors {
        notify(*visitor).map_err(|source| CsvCompareError::Visitor { stage, source })?;
    }
    Ok(())
}
