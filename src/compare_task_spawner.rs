use std::io::Read;

use crossbeam_channel::Sender;
#[cfg(feature = "rayon-threads")]
use mown::Mown;

use crate::csv_compare::CsvCompareError;
use crate::stream_matcher::StreamMatcher;

/// One side's scan: the reader producing the rows, the matcher resolving
/// them, and the channel the scan outcome is reported on.
pub struct ScanTask<'a, R: Read> {
    reader: csv::Reader<R>,
    matcher: StreamMatcher<'a>,
    sender: Sender<Result<(), CsvCompareError>>,
}

impl<'a, R: Read> ScanTask<'a, R> {
    pub(crate) fn new(
        reader: csv::Reader<R>,
        matcher: StreamMatcher<'a>,
        sender: Sender<Result<(), CsvCompareError>>,
    ) -> Self {
        Self {
            reader,
            matcher,
            sender,
        }
    }

    /// Runs the scan to completion and reports its outcome. A failure flags
    /// the sibling scan to stop early.
    pub fn run(mut self) {
        let result = self.matcher.scan(&mut self.reader);
        if result.is_err() {
            self.matcher.request_abort();
        }
        // the receiver outlives both scans; send only fails on panic unwind
        let _ = self.sender.send(result);
    }
}

/// Spawns the two scan tasks of a comparison.
///
/// Implementations must join both tasks before returning:
/// `spawn_scans` returning is the synchronization barrier behind which
/// reconciliation runs, so every registry write must be flushed by then.
pub trait CompareTaskSpawner {
    fn spawn_scans<R: Read + Send>(&self, expected: ScanTask<'_, R>, actual: ScanTask<'_, R>);
}

/// Builds a [`CompareTaskSpawner`](CompareTaskSpawner) for
/// [`CsvCompareBuilder`](crate::csv_compare::CsvCompareBuilder).
pub trait CompareTaskSpawnerBuilder<T> {
    fn build(self) -> T;
}

#[derive(Debug)]
#[cfg(feature = "rayon-threads")]
pub struct CompareTaskSpawnerRayon<'tp> {
    thread_pool: Mown<'tp, rayon::ThreadPool>,
}

#[cfg(feature = "rayon-threads")]
impl<'tp> CompareTaskSpawnerRayon<'tp> {
    pub fn with_thread_pool_ref(thread_pool: &'tp rayon::ThreadPool) -> Self {
        Self {
            thread_pool: Mown::Borrowed(thread_pool),
        }
    }

    pub fn with_thread_pool_owned(thread_pool: rayon::ThreadPool) -> Self {
        Self {
            thread_pool: Mown::Owned(thread_pool),
        }
    }
}

#[cfg(feature = "rayon-threads")]
impl CompareTaskSpawner for CompareTaskSpawnerRayon<'_> {
    fn spawn_scans<R: Read + Send>(&self, expected: ScanTask<'_, R>, actual: ScanTask<'_, R>) {
        self.thread_pool.scope(move |s| {
            s.spawn(move |_| expected.run());
            s.spawn(move |_| actual.run());
        });
    }
}

#[cfg(feature = "rayon-threads")]
pub struct CompareTaskSpawnerBuilderRayon<'tp> {
    thread_pool: &'tp rayon::ThreadPool,
}

#[cfg(feature = "rayon-threads")]
impl<'tp> CompareTaskSpawnerBuilderRayon<'tp> {
    pub fn new(thread_pool: &'tp rayon::ThreadPool) -> Self {
        Self { thread_pool }
    }
}

#[cfg(feature = "rayon-threads")]
impl<'tp> CompareTaskSpawnerBuilder<CompareTaskSpawnerRayon<'tp>>
    for CompareTaskSpawnerBuilderRayon<'tp>
{
    fn build(self) -> CompareTaskSpawnerRayon<'tp> {
        CompareTaskSpawnerRayon::with_thread_pool_ref(self.thread_pool)
    }
}

#[derive(Debug, Default)]
#[cfg(feature = "crossbeam-threads")]
pub struct CompareTaskSpawnerCrossbeam;

#[cfg(feature = "crossbeam-threads")]
impl CompareTaskSpawnerCrossbeam {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "crossbeam-threads")]
impl CompareTaskSpawner for CompareTaskSpawnerCrossbeam {
    fn spawn_scans<R: Read + Send>(&self, expected: ScanTask<'_, R>, actual: ScanTask<'_, R>) {
        crossbeam_utils::thread::scope(move |s| {
            s.spawn(move |_| expected.run());
            s.spawn(move |_| actual.run());
        })
        .unwrap();
    }
}

#[cfg(feature = "crossbeam-threads")]
pub struct CompareTaskSpawnerBuilderCrossbeam;

#[cfg(feature = "crossbeam-threads")]
impl CompareTaskSpawnerBuilderCrossbeam {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "crossbeam-threads")]
impl CompareTaskSpawnerBuilder<CompareTaskSpawnerCrossbeam>
    for CompareTaskSpawnerBuilderCrossbeam
{
    fn build(self) -> CompareTaskSpawnerCrossbeam {
        CompareTaskSpawnerCrossbeam::new()
    }
}
