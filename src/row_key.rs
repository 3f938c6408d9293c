use smallvec::SmallVec;

// Unit separator, so compound keys cannot collide with field text that
// happens to contain the CSV delimiter.
const KEY_FIELD_SEPARATOR: &str = "\u{1f}";

/// Derives the identity key correlating a record across the two sides.
pub(crate) trait RowKeyExt {
    fn identity_key(&self, identity_columns: &[usize]) -> String;
}

impl RowKeyExt for csv::StringRecord {
    /// Total for any record: indices beyond the record width are skipped
    /// (width mismatches are the tokenizer's to report). With no identity
    /// columns configured, the first field identifies the record.
    fn identity_key(&self, identity_columns: &[usize]) -> String {
        if identity_columns.is_empty() {
            return self.get(0).unwrap_or_default().to_owned();
        }
        let key_fields: SmallVec<[&str; 4]> = identity_columns
            .iter()
            .filter_map(|&idx| self.get(idx))
            .collect();
        key_fields.join(KEY_FIELD_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csv::StringRecord;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_identity_column() {
        let record = StringRecord::from(vec!["1", "Alice", "accounting"]);
        assert_eq!(record.identity_key(&[0]), "1");
        assert_eq!(record.identity_key(&[1]), "Alice");
    }

    #[test]
    fn no_identity_columns_defaults_to_first_field() {
        let record = StringRecord::from(vec!["42", "x"]);
        assert_eq!(record.identity_key(&[]), "42");
    }

    #[test]
    fn compound_key_joins_fields_in_configured_order() {
        let record = StringRecord::from(vec!["1", "Alice", "efae52"]);
        assert_eq!(record.identity_key(&[0, 2]), "1\u{1f}efae52");
    }

    #[test]
    fn compound_key_distinguishes_field_boundaries() {
        let left = StringRecord::from(vec!["ab", "c"]);
        let right = StringRecord::from(vec!["a", "bc"]);
        assert_ne!(left.identity_key(&[0, 1]), right.identity_key(&[0, 1]));
    }

    #[test]
    fn out_of_range_columns_are_skipped() {
        let record = StringRecord::from(vec!["1", "Alice"]);
        assert_eq!(record.identity_key(&[0, 7]), "1");
        assert_eq!(record.identity_key(&[7]), "");
    }

    #[test]
    fn empty_record_yields_empty_key() {
        let record = StringRecord::new();
        assert_eq!(record.identity_key(&[]), "");
    }
}
