use csv::StringRecord;

/// The recognized comparison options, handed to every
/// [visitor](crate::visitor::ComparisonVisitor) notification.
///
/// Built through [`CsvCompareBuilder`](crate::csv_compare::CsvCompareBuilder);
/// the default treats the first column as the identity key and compares all
/// fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareOptions {
    identity_columns: Vec<usize>,
    compared_columns: Option<Vec<usize>>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            identity_columns: vec![0],
            compared_columns: None,
        }
    }
}

impl CompareOptions {
    pub(crate) fn new(
        mut identity_columns: Vec<usize>,
        compared_columns: Option<Vec<usize>>,
    ) -> Self {
        // sorted and deduplicated so the derived key is deterministic
        identity_columns.sort_unstable();
        identity_columns.dedup();
        let compared_columns = compared_columns.map(|mut columns| {
            columns.sort_unstable();
            columns.dedup();
            columns
        });
        Self {
            identity_columns,
            compared_columns,
        }
    }

    /// Column positions forming the identity key.
    pub fn identity_columns(&self) -> &[usize] {
        &self.identity_columns
    }

    /// Column positions participating in row comparison; `None` compares all
    /// fields.
    pub fn compared_columns(&self) -> Option<&[usize]> {
        self.compared_columns.as_deref()
    }

    /// Exact field-by-field equality over the participating columns.
    pub(crate) fn rows_equal(&self, left: &StringRecord, right: &StringRecord) -> bool {
        match &self.compared_columns {
            None => left == right,
            Some(columns) => columns
                .iter()
                .all(|&idx| left.get(idx) == right.get(idx)),
        }
    }
}
