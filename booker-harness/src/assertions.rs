//! Soft assertions.
//!
//! A [`SoftAssertions`] batch runs every check of one response, records each
//! mismatch, and only at [`SoftAssertions::finish`] turns the collected
//! mismatches into a single [`AssertionFailure`]. A check whose actual value
//! cannot be extracted records that as one more failure and does not stop the
//! checks after it.

use booker_common::ReportSink;
use std::fmt::Display;
use thiserror::Error;

/// A failed validation: either one batch's aggregated mismatches or a single
/// hard-fail check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AssertionFailure {
    message: String,
    errors: Vec<String>,
}

impl AssertionFailure {
    /// Combine every error of a batch into one failure.
    #[must_use]
    pub fn aggregate(errors: Vec<String>) -> Self {
        Self {
            message: format!("Test failed due to assertion errors: [{}]", errors.join(", ")),
            errors,
        }
    }

    /// Failure of a single hard-fail check.
    #[must_use]
    pub fn single(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            errors: vec![message.clone()],
            message,
        }
    }

    /// Every error the failure was built from.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// The combined message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result of a validator.
pub type AssertionResult = Result<(), AssertionFailure>;

/// Accumulator for one batch of checks.
pub struct SoftAssertions<'a> {
    report: &'a dyn ReportSink,
    errors: Vec<String>,
    passed: usize,
}

impl<'a> SoftAssertions<'a> {
    /// Start an empty batch reporting to `report`.
    #[must_use]
    pub fn new(report: &'a dyn ReportSink) -> Self {
        Self {
            report,
            errors: Vec::new(),
            passed: 0,
        }
    }

    /// Check `expected == actual`. Returns whether the check held.
    pub fn check_eq<T>(&mut self, label: &str, expected: &T, actual: &T) -> bool
    where
        T: PartialEq + Display + ?Sized,
    {
        if expected == actual {
            self.pass(format!("PASS: {label} | Expected: {expected}, Actual: {actual}"));
            true
        } else {
            self.fail(format!("FAIL: {label} | expected: {expected} but was: {actual}"));
            false
        }
    }

    /// Check that `condition` holds. Returns whether it did.
    pub fn check_true(&mut self, label: &str, condition: bool) -> bool {
        if condition {
            self.pass(format!("PASS: {label} | Expected: true, Actual: {condition}"));
        } else {
            self.fail(format!("{label} ==> expected: true but was: {condition}"));
        }
        condition
    }

    /// Check an actual value that may have failed to extract.
    ///
    /// An extraction error becomes one failure entry for this check alone.
    pub fn check_field<T, E>(&mut self, label: &str, expected: &T, actual: Result<T, E>) -> bool
    where
        T: PartialEq + Display,
        E: Display,
    {
        match actual {
            Ok(actual) => self.check_eq(label, expected, &actual),
            Err(reason) => {
                self.record_exception(label, &reason);
                false
            }
        }
    }

    /// Record that a check could not be evaluated.
    pub fn record_exception(&mut self, label: &str, reason: &dyn Display) {
        self.report
            .log_fail(&format!("EXCEPTION: {label} could not be evaluated. Error: {reason}"));
        self.errors.push(format!("Exception occurred: {reason}"));
    }

    /// Record a passing note that is not itself a check.
    pub fn note_pass(&self, message: &str) {
        self.report.log_pass(message);
    }

    /// Checks that held so far.
    #[must_use]
    pub const fn passed(&self) -> usize {
        self.passed
    }

    /// Failure messages collected so far.
    #[must_use]
    pub fn failures(&self) -> &[String] {
        &self.errors
    }

    /// Whether no check has failed so far.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Close the batch.
    ///
    /// Each collected error is reported as an `ASSERTION FAILURE` entry
    /// before the single combined failure is returned.
    ///
    /// # Errors
    ///
    /// Returns one [`AssertionFailure`] listing every error, if any were
    /// collected.
    pub fn finish(self) -> AssertionResult {
        if self.errors.is_empty() {
            return Ok(());
        }
        for error in &self.errors {
            self.report.log_info(&format!("ASSERTION FAILURE: {error}"));
        }
        Err(AssertionFailure::aggregate(self.errors))
    }

    fn pass(&mut self, message: String) {
        self.report.log_pass(&message);
        self.passed += 1;
    }

    fn fail(&mut self, message: String) {
        self.report.log_fail(&message);
        self.errors.push(message);
    }
}

/// Mask a token for reports: the first and last four characters stay
/// visible. Tokens of eight characters or fewer are masked entirely.
#[must_use]
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars.iter().take(4).collect();
    let tail: String = chars.iter().skip(chars.len() - 4).collect();
    format!("{head}****{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use booker_common::{ReportEntry, ReportLevel};
    use proptest::prelude::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collecting(Mutex<Vec<ReportEntry>>);

    impl Collecting {
        fn levels(&self) -> Vec<ReportLevel> {
            self.0.lock().unwrap().iter().map(|e| e.level).collect()
        }
    }

    impl ReportSink for Collecting {
        fn record(&self, entry: ReportEntry) {
            self.0.lock().unwrap().push(entry);
        }
    }

    #[test]
    fn test_all_pass_is_silent() {
        let report = Collecting::default();
        let mut batch = SoftAssertions::new(&report);

        batch.check_eq("status", &200, &200);
        batch.check_eq("first name", "Jim", "Jim");
        batch.check_true("list not empty", true);

        assert_eq!(batch.passed(), 3);
        assert!(batch.finish().is_ok());
        assert_eq!(report.levels(), vec![ReportLevel::Pass; 3]);
    }

    #[test]
    fn test_mismatches_aggregate_into_one_failure() {
        let report = Collecting::default();
        let mut batch = SoftAssertions::new(&report);

        batch.check_eq("Validating First Name", "Jim", "Bob");
        batch.check_eq("Validating Total Price", &111, &111);
        batch.check_true("Validating bookingId list not empty", false);

        let failure = batch.finish().unwrap_err();
        assert_eq!(failure.errors().len(), 2);
        assert_eq!(
            failure.message(),
            "Test failed due to assertion errors: [FAIL: Validating First Name | expected: Jim but was: Bob, \
             Validating bookingId list not empty ==> expected: true but was: false]"
        );
        assert_eq!(
            report.levels(),
            vec![
                ReportLevel::Fail,
                ReportLevel::Pass,
                ReportLevel::Fail,
                ReportLevel::Info,
                ReportLevel::Info,
            ]
        );
    }

    #[test]
    fn test_extraction_error_does_not_stop_later_checks() {
        let report = Collecting::default();
        let mut batch = SoftAssertions::new(&report);

        let missing: Result<String, &str> = Err("booking missing from response");
        batch.check_field("Validating First Name", &"Jim".to_string(), missing);
        batch.check_field(
            "Validating Last Name",
            &"Brown".to_string(),
            Ok::<_, &str>("Brown".to_string()),
        );

        assert_eq!(batch.passed(), 1);
        assert_eq!(
            batch.failures(),
            ["Exception occurred: booking missing from response".to_string()]
        );
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("abc123def456ghi"), "abc1****6ghi");
        assert_eq!(mask_token("12345678"), "****");
        assert_eq!(mask_token(""), "****");
    }

    proptest! {
        #[test]
        fn prop_failure_iff_any_mismatch(
            pairs in prop::collection::vec((0u8..4, 0u8..4), 0..20)
        ) {
            let report = Collecting::default();
            let mut batch = SoftAssertions::new(&report);
            for (i, (expected, actual)) in pairs.iter().enumerate() {
                batch.check_eq(&format!("field {i}"), expected, actual);
            }
            let mismatches = pairs.iter().filter(|(e, a)| e != a).count();

            match batch.finish() {
                Ok(()) => prop_assert_eq!(mismatches, 0),
                Err(failure) => {
                    prop_assert_eq!(failure.errors().len(), mismatches);
                    for (i, _) in pairs.iter().enumerate().filter(|(_, (e, a))| e != a) {
                        let label = format!("field {i} |");
                        prop_assert!(failure.message().contains(&label));
                    }
                }
            }
        }

        #[test]
        fn prop_mask_hides_middle(token in "[A-Za-z0-9]{9,40}") {
            let masked = mask_token(&token);
            prop_assert!(masked.starts_with(&token[..4]));
            prop_assert!(masked.ends_with(&token[token.len() - 4..]));
            prop_assert_eq!(masked.len(), 12);
        }
    }
}
