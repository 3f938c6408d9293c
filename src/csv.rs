use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// One side's [CSV](https://en.wikipedia.org/wiki/Comma-separated_values) input.
///
/// A thin wrapper around any [`Read`](std::io::Read) source with some
/// configuration options. The reader must yield UTF-8 text; wrap it in a
/// transcoding reader when the file is in another encoding.
pub struct Csv<R: Read> {
    reader: R,
    headers: bool,
    delimiter: u8,
    descriptor: String,
}

impl<R: Read> Csv<R> {
    /// Wraps `reader` with default settings: a header row is expected and
    /// fields are comma-separated.
    pub fn with_reader(reader: R) -> Self {
        CsvBuilder::with_reader(reader).build()
    }

    pub(crate) fn has_headers(&self) -> bool {
        self.headers
    }

    pub(crate) fn descriptor(&self) -> &str {
        &self.descriptor
    }
}

impl Csv<File> {
    /// Opens the file at `path` eagerly, so an unreadable input surfaces here
    /// and not in the middle of a scan.
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let descriptor = path.as_ref().display().to_string();
        let reader = File::open(path.as_ref())?;
        Ok(CsvBuilder::with_reader(reader).descriptor(descriptor).build())
    }
}

impl<R: Read> From<Csv<R>> for csv::Reader<R> {
    fn from(csv: Csv<R>) -> Self {
        csv::ReaderBuilder::new()
            .has_headers(csv.headers)
            .delimiter(csv.delimiter)
            .from_reader(csv.reader)
    }
}

/// Creates a [`Csv`](Csv) with configuration options.
pub struct CsvBuilder<R: Read> {
    reader: R,
    headers: bool,
    delimiter: u8,
    descriptor: String,
}

impl<R: Read> CsvBuilder<R> {
    pub fn with_reader(reader: R) -> Self {
        Self {
            reader,
            headers: true,
            delimiter: b',',
            descriptor: String::from("<reader>"),
        }
    }

    /// Whether the first row is a header row. Defaults to `true`.
    pub fn headers(self, yes: bool) -> Self {
        Self {
            headers: yes,
            ..self
        }
    }

    /// The field delimiter. Defaults to `b','`.
    pub fn delimiter(self, delimiter: u8) -> Self {
        Self { delimiter, ..self }
    }

    /// A human-readable name for this input, reported to visitors at the
    /// start and end of a comparison.
    pub fn descriptor(self, descriptor: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.into(),
            ..self
        }
    }

    pub fn build(self) -> Csv<R> {
        Csv {
            reader: self.reader,
            headers: self.headers,
            delimiter: self.delimiter,
            descriptor: self.descriptor,
        }
    }
}
