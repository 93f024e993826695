//! Property-based tests for report records and version sanitizing.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::report::{parse_records, Reporter, DELIMITER};
    use crate::version::sanitize;
    use proptest::prelude::*;
    use tempfile::TempDir;

    /// Multiline values: any text without a line equal to the delimiter.
    fn multiline_value() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 :./'\"()_-]{0,12}(\n[a-zA-Z0-9 :./'\"()_-]{0,12}){0,6}"
            .prop_filter("delimiter line", |v| !v.split('\n').any(|l| l == DELIMITER))
    }

    // ============================================================================
    // Report record property tests
    // ============================================================================

    proptest! {
        /// Property: a single-line record reads back as exactly `key=value`
        #[test]
        fn single_line_record_round_trips(value in "[^\r\n]{0,40}") {
            let temp = TempDir::new().unwrap();
            let reporter = Reporter::new(temp.path().join("out"));
            reporter.report_single("branch", &value).unwrap();

            let content = std::fs::read_to_string(reporter.path()).unwrap();
            let first_line = content.split('\n').next().unwrap();
            prop_assert_eq!(first_line, format!("branch={}", value));
        }

        /// Property: the text between `key<<EOF` and `EOF` is the value
        #[test]
        fn multiline_record_round_trips(value in multiline_value()) {
            let temp = TempDir::new().unwrap();
            let reporter = Reporter::new(temp.path().join("out"));
            reporter.report_multiline("errormessage", &value).unwrap();

            let content = std::fs::read_to_string(reporter.path()).unwrap();
            let records = parse_records(&content).unwrap();
            prop_assert_eq!(records.len(), 1);
            prop_assert_eq!(&records[0].key, "errormessage");
            prop_assert_eq!(&records[0].value, &value);
        }

        /// Property: records appended in sequence are all read back in order
        #[test]
        fn appended_records_keep_order(values in prop::collection::vec(multiline_value(), 1..5)) {
            let temp = TempDir::new().unwrap();
            let reporter = Reporter::new(temp.path().join("out"));
            for value in &values {
                reporter.report_multiline("k", value).unwrap();
            }

            let records = parse_records(&std::fs::read_to_string(reporter.path()).unwrap()).unwrap();
            let read: Vec<String> = records.into_iter().map(|r| r.value).collect();
            prop_assert_eq!(read, values);
        }
    }

    // ============================================================================
    // sanitize property tests
    // ============================================================================

    proptest! {
        /// Property: sanitize never leaves a period
        #[test]
        fn sanitize_removes_all_periods(input in ".*") {
            prop_assert!(!sanitize(&input).contains('.'));
        }

        /// Property: sanitize only touches periods
        #[test]
        fn sanitize_preserves_length_and_other_chars(input in "[0-9a-z.+-]{0,20}") {
            let result = sanitize(&input);
            prop_assert_eq!(result.len(), input.len());
            for (a, b) in input.chars().zip(result.chars()) {
                if a == '.' {
                    prop_assert_eq!(b, '_');
                } else {
                    prop_assert_eq!(a, b);
                }
            }
        }
    }
}
