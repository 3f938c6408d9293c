use std::fmt;
use std::io::Read;
#[cfg(feature = "rayon-threads")]
use std::marker::PhantomData;
use std::sync::atomic::AtomicBool;

use csv::StringRecord;
use log::debug;
use thiserror::Error;

use crate::compare_options::CompareOptions;
use crate::compare_result::{Collector, CompareResult};
#[cfg(feature = "crossbeam-threads")]
use crate::compare_task_spawner::CompareTaskSpawnerCrossbeam;
#[cfg(feature = "rayon-threads")]
use crate::compare_task_spawner::{CompareTaskSpawnerBuilderRayon, CompareTaskSpawnerRayon};
use crate::compare_task_spawner::{CompareTaskSpawner, CompareTaskSpawnerBuilder, ScanTask};
use crate::csv::Csv;
use crate::reconciler::reconcile;
use crate::row_registry::RowRegistry;
use crate::stream_matcher::StreamMatcher;
use crate::visitor::{notify_all, CompareSources, ComparisonVisitor};

/// The dataset a row came from: the `expected` baseline or the `actual`
/// candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Expected,
    Actual,
}

impl Side {
    pub(crate) fn scan_stage(self) -> Stage {
        match self {
            Side::Expected => Stage::ExpectedScan,
            Side::Actual => Stage::ActualScan,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Expected => write!(f, "expected"),
            Side::Actual => write!(f, "actual"),
        }
    }
}

/// Where in a comparison a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    VisitStarted,
    ExpectedScan,
    ActualScan,
    Reconcile,
    VisitEnded,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::VisitStarted => write!(f, "start-of-visit notification"),
            Stage::ExpectedScan => write!(f, "expected-side scan"),
            Stage::ActualScan => write!(f, "actual-side scan"),
            Stage::Reconcile => write!(f, "reconciliation"),
            Stage::VisitEnded => write!(f, "end-of-visit notification"),
        }
    }
}

/// A comparison aborts on the first failure and never returns a partial
/// result.
#[derive(Debug, Error)]
pub enum CsvCompareError {
    #[error("failed to read the {side} CSV")]
    Csv {
        side: Side,
        #[source]
        source: csv::Error,
    },
    #[error("a visitor failed during the {stage}")]
    Visitor {
        stage: Stage,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[derive(Debug, Error)]
pub enum CsvCompareBuilderError {
    #[error("No identity columns have been specified. You need to provide at least one column index.")]
    NoIdentityColumns,
    #[cfg(feature = "rayon-threads")]
    #[error("An error occured when trying to build the rayon thread pool.")]
    ThreadPoolBuildError(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Debug, Error)]
#[cfg(feature = "rayon-threads")]
pub enum CsvCompareNewError {
    #[error("An error occured when trying to build the rayon thread pool.")]
    ThreadPoolBuildError(#[from] rayon::ThreadPoolBuildError),
}

/// Compare two [CSVs](https://en.wikipedia.org/wiki/Comma-separated_values)
/// key by key, classifying every row as kept, modified, deleted or inserted
/// relative to the expected baseline.
///
/// The two inputs are scanned by two concurrent tasks; `compare` blocks until
/// both scans and the final reconciliation pass have finished.
///
/// # Example: compare two CSVs with default values
#[cfg_attr(
    feature = "rayon-threads",
    doc = r##"
```
use csv_compare::{csv::Csv, csv_compare::CsvCompare};
# fn main() -> Result<(), Box<dyn std::error::Error>> {
// some csv data with a header, where the first column is a unique id
let csv_expected = "id,name\n\
                    1,Alice\n\
                    2,Bob\n\
                    3,Carol";
let csv_actual = "id,name\n\
                  1,Alice\n\
                  2,Bobby\n\
                  4,Dave";

let csv_compare = CsvCompare::new()?;

let result = csv_compare.compare(
    Csv::with_reader(csv_expected.as_bytes()),
    Csv::with_reader(csv_actual.as_bytes()),
)?;

assert!(result.has_diff());
assert_eq!(result.rows_kept().len(), 1);
assert_eq!(result.rows_modified().len(), 1);
assert_eq!(result.rows_deleted().len(), 1);
assert_eq!(result.rows_inserted().len(), 1);
Ok(())
# }
```
"##
)]
#[derive(Debug)]
pub struct CsvCompare<T: CompareTaskSpawner> {
    options: CompareOptions,
    task_spawner: T,
}

#[cfg(feature = "rayon-threads")]
impl CsvCompare<CompareTaskSpawnerRayon<'static>> {
    /// Constructs a `CsvCompare` with a default configuration: the first
    /// column of each CSV is the identity key and all fields participate in
    /// the comparison. A new
    /// [rayon thread-pool](https://docs.rs/rayon/1.5.0/rayon/struct.ThreadPool.html)
    /// is created for the scan tasks.
    ///
    /// For more control, use a [`CsvCompareBuilder`](CsvCompareBuilder)
    /// instead.
    pub fn new() -> Result<Self, CsvCompareNewError> {
        Ok(Self {
            options: CompareOptions::default(),
            task_spawner: CompareTaskSpawnerRayon::with_thread_pool_owned(
                rayon::ThreadPoolBuilder::new().build()?,
            ),
        })
    }
}

#[cfg(feature = "crossbeam-threads")]
impl CsvCompare<CompareTaskSpawnerCrossbeam> {
    pub fn new() -> Self {
        Self {
            options: CompareOptions::default(),
            task_spawner: CompareTaskSpawnerCrossbeam::new(),
        }
    }
}

impl<T> CsvCompare<T>
where
    T: CompareTaskSpawner,
{
    /// Compares `actual` against the `expected` baseline, driving only the
    /// built-in result collector.
    pub fn compare<R: Read + Send>(
        &self,
        expected: Csv<R>,
        actual: Csv<R>,
    ) -> Result<CompareResult, CsvCompareError> {
        self.compare_with(expected, actual, &[])
    }

    /// Compares `actual` against `expected`, notifying the given visitors in
    /// addition to the built-in result collector. Visitors are invoked
    /// concurrently from the two scan tasks, then single-threaded during
    /// reconciliation.
    pub fn compare_with<R: Read + Send>(
        &self,
        expected: Csv<R>,
        actual: Csv<R>,
        visitors: &[&dyn ComparisonVisitor],
    ) -> Result<CompareResult, CsvCompareError> {
        use crossbeam_channel::bounded;

        let sources = CompareSources {
            expected: expected.descriptor().to_owned(),
            actual: actual.descriptor().to_owned(),
        };
        debug!("comparing {} against {}", sources.actual, sources.expected);

        let headers_enabled = expected.has_headers();
        let mut expected_reader: csv::Reader<R> = expected.into();
        let actual_reader: csv::Reader<R> = actual.into();

        // one-time peek at the expected side; the reader holds the header
        // row back from the record iteration
        let headers = if headers_enabled {
            expected_reader
                .headers()
                .map_err(|source| CsvCompareError::Csv {
                    side: Side::Expected,
                    source,
                })?
                .clone()
        } else {
            StringRecord::new()
        };

        let collector = Collector::default();
        let mut all_visitors: Vec<&dyn ComparisonVisitor> = Vec::with_capacity(visitors.len() + 1);
        all_visitors.push(&collector);
        all_visitors.extend_from_slice(visitors);

        notify_all(&all_visitors, Stage::VisitStarted, |v| {
            v.visit_started(&sources)
        })?;

        let expected_registry = RowRegistry::new();
        let actual_registry = RowRegistry::new();
        let abort = AtomicBool::new(false);
        let (sender, receiver) = bounded(2);

        let expected_task = ScanTask::new(
            expected_reader,
            StreamMatcher::new(
                Side::Expected,
                &expected_registry,
                &actual_registry,
                &all_visitors,
                &headers,
                &self.options,
                &abort,
            ),
            sender.clone(),
        );
        let actual_task = ScanTask::new(
            actual_reader,
            StreamMatcher::new(
                Side::Actual,
                &actual_registry,
                &expected_registry,
                &all_visitors,
                &headers,
                &self.options,
                &abort,
            ),
            sender,
        );

        // both scans have joined once this returns
        self.task_spawner.spawn_scans(expected_task, actual_task);

        // the first failure received is the one propagated
        for scan_result in receiver.try_iter() {
            scan_result?;
        }

        reconcile(
            expected_registry,
            actual_registry,
            &all_visitors,
            &headers,
            &self.options,
        )?;

        notify_all(&all_visitors, Stage::VisitEnded, |v| v.visit_ended(&sources))?;

        drop(all_visitors);
        Ok(collector.into_result())
    }
}

/// Create a [`CsvCompare`](CsvCompare) with configuration options.
/// # Example: treat column 1 and column 3 as a compound identity key
#[cfg_attr(
    feature = "rayon-threads",
    doc = r##"
```
use csv_compare::{csv::Csv, csv_compare::CsvCompareBuilder};
# fn main() -> Result<(), Box<dyn std::error::Error>> {
// "id" and "commit_sha" together identify a record, so the second line is
// seen as deleted-and-inserted rather than modified
let csv_expected = "id,name,commit_sha\n\
                    1,lemon,efae52\n\
                    2,strawberry,a33411";
let csv_actual = "id,name,commit_sha\n\
                  1,lemon,efae52\n\
                  2,strawberry,ddef23";

let csv_compare = CsvCompareBuilder::new()
    .identity_columns(vec![0, 2])
    .build()?;

let result = csv_compare.compare(
    Csv::with_reader(csv_expected.as_bytes()),
    Csv::with_reader(csv_actual.as_bytes()),
)?;

assert_eq!(result.rows_kept().len(), 1);
assert_eq!(result.rows_deleted().len(), 1);
assert_eq!(result.rows_inserted().len(), 1);
assert!(result.rows_modified().is_empty());
Ok(())
# }
```
"##
)]
#[derive(Debug)]
pub struct CsvCompareBuilder<'tp, T: CompareTaskSpawner> {
    identity_columns: Vec<usize>,
    compared_columns: Option<Vec<usize>>,
    #[cfg(feature = "rayon-threads")]
    task_spawner: Option<CompareTaskSpawnerRayon<'tp>>,
    #[cfg(feature = "rayon-threads")]
    _phantom: PhantomData<T>,
    #[cfg(not(feature = "rayon-threads"))]
    _phantom: std::marker::PhantomData<&'tp T>,
    #[cfg(not(feature = "rayon-threads"))]
    task_spawner: T,
}

impl<'tp, T> CsvCompareBuilder<'tp, T>
where
    T: CompareTaskSpawner,
{
    #[cfg(not(feature = "rayon-threads"))]
    pub fn new<B>(task_spawner_builder: B) -> Self
    where
        B: CompareTaskSpawnerBuilder<T>,
    {
        Self {
            identity_columns: vec![0],
            compared_columns: None,
            task_spawner: task_spawner_builder.build(),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Column positions forming the identity key. Defaults to the first
    /// column.
    pub fn identity_columns(mut self, columns: impl IntoIterator<Item = usize>) -> Self {
        self.identity_columns = columns.into_iter().collect();
        self
    }

    /// Column positions participating in row comparison. Defaults to all
    /// columns.
    pub fn compared_columns(mut self, columns: impl IntoIterator<Item = usize>) -> Self {
        self.compared_columns = Some(columns.into_iter().collect());
        self
    }

    #[cfg(not(feature = "rayon-threads"))]
    pub fn build(self) -> Result<CsvCompare<T>, CsvCompareBuilderError> {
        if self.identity_columns.is_empty() {
            return Err(CsvCompareBuilderError::NoIdentityColumns);
        }
        Ok(CsvCompare {
            options: CompareOptions::new(self.identity_columns, self.compared_columns),
            task_spawner: self.task_spawner,
        })
    }
}

#[cfg(feature = "rayon-threads")]
impl<'tp> CsvCompareBuilder<'tp, CompareTaskSpawnerRayon<'tp>> {
    pub fn new() -> Self {
        Self {
            identity_columns: vec![0],
            compared_columns: None,
            task_spawner: None,
            _phantom: PhantomData,
        }
    }

    /// Runs the scan tasks on an existing
    /// [rayon thread-pool](https://docs.rs/rayon/1.5.0/rayon/struct.ThreadPool.html)
    /// instead of building a new one.
    pub fn rayon_thread_pool(mut self, thread_pool: &'tp rayon::ThreadPool) -> Self {
        self.task_spawner = Some(CompareTaskSpawnerBuilderRayon::new(thread_pool).build());
        self
    }

    pub fn build(
        self,
    ) -> Result<CsvCompare<CompareTaskSpawnerRayon<'tp>>, CsvCompareBuilderError> {
        if self.identity_columns.is_empty() {
            return Err(CsvCompareBuilderError::NoIdentityColumns);
        }
        Ok(CsvCompare {
            options: CompareOptions::new(self.identity_columns, self.compared_columns),
            task_spawner: match self.task_spawner {
                Some(task_spawner) => task_spawner,
                None => CompareTaskSpawnerRayon::with_thread_pool_owned(
                    rayon::ThreadPoolBuilder::new().build()?,
                ),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::CsvBuilder;
    use crate::visitor::VisitorResult;
    use pretty_assertions::assert_eq;
    use std::error::Error;
    use std::sync::Mutex;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[cfg(feature = "rayon-threads")]
    fn compare_strs(
        csv_expected: &str,
        csv_actual: &str,
    ) -> Result<CompareResult, Box<dyn Error>> {
        let csv_compare = CsvCompare::new()?;
        Ok(csv_compare.compare(
            Csv::with_reader(csv_expected.as_bytes()),
            Csv::with_reader(csv_actual.as_bytes()),
        )?)
    }

    #[cfg(feature = "rayon-threads")]
    #[test]
    fn compare_empty_no_diff() -> Result<(), Box<dyn Error>> {
        let result = compare_strs("", "")?;

        assert!(!result.has_diff());
        assert!(result.rows_kept().is_empty());
        Ok(())
    }

    #[cfg(feature = "rayon-threads")]
    #[test]
    fn compare_header_only_no_diff() -> Result<(), Box<dyn Error>> {
        let result = compare_strs("id,name", "id,name")?;

        assert!(!result.has_diff());
        assert!(result.rows_kept().is_empty());
        Ok(())
    }

    #[cfg(feature = "rayon-threads")]
    #[test]
    fn identical_datasets_keep_every_row() -> Result<(), Box<dyn Error>> {
        let data = "id,name\n1,Alice\n2,Bob\n3,Carol";
        let result = compare_strs(data, data)?;

        assert_eq!(result.rows_kept().len(), 3);
        assert!(!result.has_diff());
        assert!(!result.has_deleted());
        assert!(!result.has_inserted());
        assert!(!result.has_modified());
        Ok(())
    }

    #[cfg(feature = "rayon-threads")]
    #[test]
    fn missing_actual_rows_are_deleted() -> Result<(), Box<dyn Error>> {
        let result = compare_strs("id,name\n1,Alice\n2,Bob\n3,Carol", "id,name\n2,Bob")?;

        assert!(result.has_deleted());
        assert!(result.has_diff());
        assert_eq!(result.rows_kept().len(), 1);
        assert_eq!(result.rows_deleted().len(), 2);

        let mut deleted_keys: Vec<&str> = result
            .rows_deleted()
            .iter()
            .filter_map(|row| row.get(0))
            .collect();
        deleted_keys.sort_unstable();
        assert_eq!(deleted_keys, vec!["1", "3"]);
        Ok(())
    }

    #[cfg(feature = "rayon-threads")]
    #[test]
    fn new_actual_rows_are_inserted() -> Result<(), Box<dyn Error>> {
        let result = compare_strs(
            "id,name\n1,Alice\n2,Bob",
            "id,name\n1,Alice\n2,Bob\n4,Dave",
        )?;

        assert!(result.has_inserted());
        assert!(result.has_diff());
        assert_eq!(result.rows_kept().len(), 2);
        assert_eq!(result.rows_inserted(), &[record(&["4", "Dave"])]);
        Ok(())
    }

    #[cfg(feature = "rayon-threads")]
    #[test]
    fn changed_rows_are_modified_not_deleted_or_inserted() -> Result<(), Box<dyn Error>> {
        let result = compare_strs("id,name\n1,Alice\n2,Bob", "id,name\n1,Alice\n2,Bobby")?;

        assert!(result.has_modified());
        assert!(!result.has_deleted());
        assert!(!result.has_inserted());
        assert_eq!(result.rows_kept().len(), 1);
        assert_eq!(result.rows_modified().len(), 1);
        assert_eq!(result.rows_modified()[0].get(0), Some("2"));
        Ok(())
    }

    #[cfg(feature = "rayon-threads")]
    #[test]
    fn mixed_scenario_classifies_each_key_once() -> Result<(), Box<dyn Error>> {
        let result = compare_strs(
            "id,name\n1,Alice\n2,Bob\n3,Carol",
            "id,name\n1,Alice\n2,Bobby\n4,Dave",
        )?;

        assert_eq!(result.rows_kept(), &[record(&["1", "Alice"])]);
        assert_eq!(result.rows_deleted(), &[record(&["3", "Carol"])]);
        assert_eq!(result.rows_inserted(), &[record(&["4", "Dave"])]);
        // the triggering side is timing-dependent, the key is not
        assert_eq!(result.rows_modified().len(), 1);
        assert_eq!(result.rows_modified()[0].get(0), Some("2"));
        assert!(result.has_diff());
        Ok(())
    }

    #[cfg(feature = "rayon-threads")]
    #[test]
    fn no_headers_mode_compares_the_first_row_too() -> Result<(), Box<dyn Error>> {
        let csv_compare = CsvCompare::new()?;
        let result = csv_compare.compare(
            CsvBuilder::with_reader("1,Alice\n2,Bob".as_bytes())
                .headers(false)
                .build(),
            CsvBuilder::with_reader("1,Alice\n2,Bob".as_bytes())
                .headers(false)
                .build(),
        )?;

        assert_eq!(result.rows_kept().len(), 2);
        assert!(!result.has_diff());
        Ok(())
    }

    #[cfg(feature = "rayon-threads")]
    #[test]
    fn duplicate_key_on_one_side_keeps_the_last_row() -> Result<(), Box<dyn Error>> {
        // the earlier duplicate is superseded before any match is attempted
        let result = compare_strs("id,name\n1,a\n1,b", "id,name")?;

        assert_eq!(result.rows_deleted(), &[record(&["1", "b"])]);
        assert!(result.rows_kept().is_empty());
        Ok(())
    }

    #[cfg(feature = "rayon-threads")]
    #[test]
    fn compared_columns_restrict_modification_detection() -> Result<(), Box<dyn Error>> {
        let csv_expected = "id,name,updated_at\n1,Alice,2026-01-01\n2,Bob,2026-01-01";
        let csv_actual = "id,name,updated_at\n1,Alice,2026-02-01\n2,Bobby,2026-02-01";

        let csv_compare = CsvCompareBuilder::new()
            .compared_columns(vec![0, 1])
            .build()?;
        let result = csv_compare.compare(
            Csv::with_reader(csv_expected.as_bytes()),
            Csv::with_reader(csv_actual.as_bytes()),
        )?;

        // the timestamp column is not compared
        assert_eq!(result.rows_kept().len(), 1);
        assert_eq!(result.rows_modified().len(), 1);
        assert_eq!(result.rows_modified()[0].get(0), Some("2"));
        Ok(())
    }

    #[cfg(feature = "rayon-threads")]
    #[test]
    fn builder_rejects_empty_identity_columns() -> Result<(), Box<dyn Error>> {
        let built = CsvCompareBuilder::new()
            .identity_columns(std::iter::empty())
            .build();

        assert!(matches!(
            built,
            Err(CsvCompareBuilderError::NoIdentityColumns)
        ));
        Ok(())
    }

    #[cfg(feature = "rayon-threads")]
    #[test]
    fn builder_with_existing_thread_pool() -> Result<(), Box<dyn Error>> {
        let thread_pool = rayon::ThreadPoolBuilder::new().build()?;
        let csv_compare = CsvCompareBuilder::new()
            .rayon_thread_pool(&thread_pool)
            .build()?;

        let result = csv_compare.compare(
            Csv::with_reader("id\n1".as_bytes()),
            Csv::with_reader("id\n1".as_bytes()),
        )?;
        assert_eq!(result.rows_kept().len(), 1);
        Ok(())
    }

    #[cfg(feature = "rayon-threads")]
    #[test]
    fn malformed_actual_row_fails_the_whole_compare() -> Result<(), Box<dyn Error>> {
        let csv_compare = CsvCompare::new()?;
        let err = csv_compare
            .compare(
                Csv::with_reader("id,name\n1,Alice".as_bytes()),
                Csv::with_reader("id,name\n1,Alice\n2".as_bytes()),
            )
            .expect_err("width mismatch must abort");

        assert!(matches!(
            err,
            CsvCompareError::Csv {
                side: Side::Actual,
                ..
            }
        ));
        Ok(())
    }

    struct HeaderRecorder {
        seen: Mutex<Vec<StringRecord>>,
    }

    impl ComparisonVisitor for HeaderRecorder {
        fn row_kept(
            &self,
            _row: &StringRecord,
            headers: &StringRecord,
            _options: &CompareOptions,
        ) -> VisitorResult {
            self.seen.lock().unwrap().push(headers.clone());
            Ok(())
        }
    }

    #[cfg(feature = "rayon-threads")]
    #[test]
    fn visitors_receive_the_expected_side_headers() -> Result<(), Box<dyn Error>> {
        let recorder = HeaderRecorder {
            seen: Mutex::new(Vec::new()),
        };
        let csv_compare = CsvCompare::new()?;
        csv_compare.compare_with(
            Csv::with_reader("id,name\n1,Alice".as_bytes()),
            Csv::with_reader("id,name\n1,Alice".as_bytes()),
            &[&recorder],
        )?;

        let seen = recorder.seen.into_inner()?;
        assert_eq!(seen, vec![record(&["id", "name"])]);
        Ok(())
    }

    struct FailOnModified;

    impl ComparisonVisitor for FailOnModified {
        fn row_modified(
            &self,
            _row: &StringRecord,
            _headers: &StringRecord,
            _options: &CompareOptions,
        ) -> VisitorResult {
            Err("modified rows are unacceptable".into())
        }
    }

    #[cfg(feature = "rayon-threads")]
    #[test]
    fn failing_visitor_aborts_the_compare() -> Result<(), Box<dyn Error>> {
        let csv_compare = CsvCompare::new()?;
        let err = csv_compare
            .compare_with(
                Csv::with_reader("id,name\n1,Alice".as_bytes()),
                Csv::with_reader("id,name\n1,Malice".as_bytes()),
                &[&FailOnModified],
            )
            .expect_err("visitor failure must abort");

        assert!(matches!(err, CsvCompareError::Visitor { .. }));
        Ok(())
    }

    struct LifecycleRecorder {
        events: Mutex<Vec<String>>,
    }

    impl ComparisonVisitor for LifecycleRecorder {
        fn visit_started(&self, sources: &CompareSources) -> VisitorResult {
            self.events
                .lock()
                .unwrap()
                .push(format!("started {} vs {}", sources.expected, sources.actual));
            Ok(())
        }

        fn visit_ended(&self, sources: &CompareSources) -> VisitorResult {
            self.events
                .lock()
                .unwrap()
                .push(format!("ended {} vs {}", sources.expected, sources.actual));
            Ok(())
        }
    }

    #[cfg(feature = "rayon-threads")]
    #[test]
    fn visit_lifecycle_carries_the_source_descriptors() -> Result<(), Box<dyn Error>> {
        let recorder = LifecycleRecorder {
            events: Mutex::new(Vec::new()),
        };
        let csv_compare = CsvCompare::new()?;
        csv_compare.compare_with(
            CsvBuilder::with_reader("id\n1".as_bytes())
                .descriptor("baseline.csv")
                .build(),
            CsvBuilder::with_reader("id\n1".as_bytes())
                .descriptor("candidate.csv")
                .build(),
            &[&recorder],
        )?;

        let events = recorder.events.into_inner()?;
        assert_eq!(
            events,
            vec![
                "started baseline.csv vs candidate.csv".to_string(),
                "ended baseline.csv vs candidate.csv".to_string(),
            ]
        );
        Ok(())
    }

    #[cfg(feature = "rayon-threads")]
    #[test]
    fn every_key_is_classified_exactly_once_under_any_interleaving(
    ) -> Result<(), Box<dyn Error>> {
        let total_rows = 500usize;
        let mut csv_expected = String::from("id,name\n");
        let mut csv_actual = String::from("id,name\n");
        for i in 0..total_rows {
            csv_expected.push_str(&format!("{},row-{}\n", i, i));
            // drop 0..10, modify 10..20, keep the rest; add 10 new keys
            if i >= 10 && i < 20 {
                csv_actual.push_str(&format!("{},changed-{}\n", i, i));
            } else if i >= 10 {
                csv_actual.push_str(&format!("{},row-{}\n", i, i));
            }
        }
        for i in total_rows..total_rows + 10 {
            csv_actual.push_str(&format!("{},new-{}\n", i, i));
        }

        let csv_compare = CsvCompare::new()?;
        for _ in 0..30 {
            let result = csv_compare.compare(
                Csv::with_reader(csv_expected.as_bytes()),
                Csv::with_reader(csv_actual.as_bytes()),
            )?;

            assert_eq!(result.rows_kept().len(), total_rows - 20);
            assert_eq!(result.rows_deleted().len(), 10);
            assert_eq!(result.rows_modified().len(), 10);
            assert_eq!(result.rows_inserted().len(), 10);
        }
        Ok(())
    }
}
