//! Comparison pipeline: the pass/fail decision for one test.
//!
//! The default policy, evaluated in order and short-circuiting at the first
//! failure:
//!
//! 1. Abnormal termination (nonzero exit or signal) fails with a diagnosis
//!    from [`interpret_problem`]; outputs are not checked.
//! 2. If an expected-output fixture exists, the captured stdout and the
//!    fixture content are passed through the output filter and must compare
//!    equal.
//! 3. If an expected-error fixture exists, stderr is checked the same way
//!    through the error filter.
//! 4. Otherwise, non-empty stderr is itself a failure. This is deliberately
//!    strict: a program that emits stray warnings fails its tests unless an
//!    `.err` fixture records them.
//! 5. Otherwise the test passes.
//!
//! Filters are pure functions applied symmetrically to actual and expected
//! text; the identity filter is the default.

use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::exec::ExecutionResult;
use crate::fixtures::{contents, TestId};

/// The result of evaluating one test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail(String),
}

impl Outcome {
    pub fn fail(reason: impl Into<String>) -> Self {
        Outcome::Fail(reason.into())
    }

    pub fn passed(&self) -> bool {
        matches!(self, Outcome::Pass)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Pass => None,
            Outcome::Fail(reason) => Some(reason),
        }
    }
}

pub const OUTPUT_MISMATCH: &str = "Output does not match expected output.";
pub const ERROR_MISMATCH: &str = "Error output does not match expected output.";
pub const STDERR_NOT_EMPTY: &str = "Error output is not empty.";

/// A normalization step applied symmetrically to actual and expected text
/// before comparison. Must be deterministic.
pub type FilterFn<'a> = &'a dyn Fn(&TestId, &str) -> String;

/// What the default comparison checks one execution against.
pub struct Expectations<'a> {
    /// Recorded expected standard output, when that channel is checked.
    pub expected_output: Option<PathBuf>,
    /// Recorded expected standard error, when that channel is checked.
    pub expected_error: Option<PathBuf>,
    pub output_filter: FilterFn<'a>,
    pub error_filter: FilterFn<'a>,
}

/// The default comparison policy described in the module docs.
pub fn compare(id: &TestId, result: &ExecutionResult, expectations: &Expectations) -> Outcome {
    if !result.exited_normally() {
        return Outcome::fail(abnormal_reason(result));
    }
    if let Some(path) = &expectations.expected_output {
        let actual = (expectations.output_filter)(id, &result.stdout);
        let expected = (expectations.output_filter)(id, &contents(path));
        if actual != expected {
            return Outcome::fail(OUTPUT_MISMATCH);
        }
    }
    if let Some(path) = &expectations.expected_error {
        let actual = (expectations.error_filter)(id, &result.stderr);
        let expected = (expectations.error_filter)(id, &contents(path));
        if actual != expected {
            return Outcome::fail(ERROR_MISMATCH);
        }
    } else if !result.stderr.is_empty() {
        return Outcome::fail(STDERR_NOT_EMPTY);
    }
    Outcome::Pass
}

/// The failure reason reported for an abnormally terminated execution.
pub fn abnormal_reason(result: &ExecutionResult) -> String {
    format!(
        "Program exited abnormally: {}",
        interpret_problem(result.rc, &result.stderr)
    )
}

// ============================================================================
// ABNORMAL-TERMINATION DIAGNOSIS
// ============================================================================

const SIGKILL: i32 = 9;
const SIGTERM: i32 = 15;
const SIGXCPU: i32 = 24;
const SIGXFSZ: i32 = 25;

/// Known signal numbers and their names. Numbers follow the common Linux
/// numbering; an unlisted number is reported numerically.
const SIGNAL_NAMES: &[(i32, &str)] = &[
    (1, "HUP"),
    (2, "INT"),
    (3, "QUIT"),
    (4, "ILL"),
    (5, "TRAP"),
    (6, "ABRT"),
    (7, "BUS"),
    (8, "FPE"),
    (9, "KILL"),
    (10, "USR1"),
    (11, "SEGV"),
    (12, "USR2"),
    (13, "PIPE"),
    (14, "ALRM"),
    (15, "TERM"),
    (16, "STKFLT"),
    (17, "CHLD"),
    (18, "CONT"),
    (19, "STOP"),
    (20, "TSTP"),
    (21, "TTIN"),
    (22, "TTOU"),
    (23, "URG"),
    (24, "XCPU"),
    (25, "XFSZ"),
    (26, "VTALRM"),
    (27, "PROF"),
    (28, "WINCH"),
    (29, "IO"),
    (30, "PWR"),
    (31, "SYS"),
];

/// The name of a known signal number, without the `SIG` prefix.
pub fn signal_name(number: i32) -> Option<&'static str> {
    SIGNAL_NAMES
        .iter()
        .find(|(n, _)| *n == number)
        .map(|(_, name)| *name)
}

static EXCEPTION_TRACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^Exception in thread ".*" (.*)\s*(at .*)"#).unwrap()
});

/// Human-readable diagnosis of an abnormal termination status.
///
/// `rc` follows the raw status convention of [`ExecutionResult`]: a plain
/// exit code, or a negated signal number. An exit status of `128 + N`
/// (the shell's encoding for a child killed by signal N) is diagnosed as
/// that signal.
pub fn interpret_problem(rc: i32, error_output: &str) -> String {
    if rc == 1 {
        if let Some(caps) = EXCEPTION_TRACE.captures(error_output) {
            return format!("exception ({}) {}", caps[1].trim_end(), &caps[2]);
        }
    }
    let rc = if rc < 0 { 128 - rc } else { rc };
    if rc > 0 && rc < 128 {
        return format!("terminated with non-zero exit code ({})", rc);
    }
    let signal = rc - 128;
    match signal {
        SIGKILL => "terminated by kill signal".to_string(),
        SIGTERM => "terminated by interrupt".to_string(),
        SIGXCPU => "CPU time exceeded".to_string(),
        SIGXFSZ => "file size limit exceeded (too much data written)".to_string(),
        _ => match signal_name(signal) {
            Some(name) => format!("terminated on Unix signal SIG{}", name),
            None => format!("terminated on Unix signal {}", signal),
        },
    }
}

// ============================================================================
// RECORD COMPARISON
// ============================================================================

/// Compare two texts record-by-record instead of as flat strings.
///
/// `record` matches one bracket-delimited record (e.g. `(?ms)^B\[.*?\]` for
/// board dumps); it is applied to both texts, and leading `*` markers in
/// expected records are ignored. The outcome carries the index of the first
/// mismatching record, or a count mismatch when the totals differ.
pub fn compare_records(actual: &str, expected: &str, record: &Regex) -> Outcome {
    let actual_records: Vec<&str> = record.find_iter(actual).map(|m| m.as_str()).collect();
    let expected_records: Vec<&str> = record.find_iter(expected).map(|m| m.as_str()).collect();
    if actual_records.len() != expected_records.len() {
        return Outcome::fail(format!(
            "There are {} output records; expected {}.",
            actual_records.len(),
            expected_records.len()
        ));
    }
    for (count, (actual_record, expected_record)) in actual_records
        .iter()
        .zip(expected_records.iter())
        .enumerate()
    {
        if actual_record.trim_start_matches('*') != expected_record.trim_start_matches('*') {
            return Outcome::fail(format!("Record #{} does not match expected.", count + 1));
        }
    }
    Outcome::Pass
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn identity(_: &TestId, text: &str) -> String {
        text.to_string()
    }

    fn expectations<'a>(
        expected_output: Option<PathBuf>,
        expected_error: Option<PathBuf>,
        filter: FilterFn<'a>,
    ) -> Expectations<'a> {
        Expectations {
            expected_output,
            expected_error,
            output_filter: filter,
            error_filter: filter,
        }
    }

    fn result(stdout: &str, stderr: &str, rc: i32) -> ExecutionResult {
        ExecutionResult {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            rc,
        }
    }

    #[test]
    fn diagnosis_nonzero_exit() {
        assert_eq!(
            interpret_problem(2, ""),
            "terminated with non-zero exit code (2)"
        );
    }

    #[test]
    fn diagnosis_resource_signals() {
        assert_eq!(interpret_problem(128 + 24, ""), "CPU time exceeded");
        assert_eq!(
            interpret_problem(128 + 25, ""),
            "file size limit exceeded (too much data written)"
        );
        assert_eq!(interpret_problem(128 + 9, ""), "terminated by kill signal");
        assert_eq!(interpret_problem(128 + 15, ""), "terminated by interrupt");
    }

    #[test]
    fn diagnosis_negative_status_is_signal_encoded() {
        // -24 means "killed by SIGXCPU" in the raw status convention.
        assert_eq!(interpret_problem(-24, ""), "CPU time exceeded");
        assert_eq!(
            interpret_problem(-11, ""),
            "terminated on Unix signal SIGSEGV"
        );
    }

    #[test]
    fn diagnosis_unknown_signal_is_numeric() {
        assert_eq!(interpret_problem(128 + 42, ""), "terminated on Unix signal 42");
    }

    #[test]
    fn diagnosis_exception_trace() {
        let trace = "Exception in thread \"main\" java.lang.NullPointerException\n\
                     \tat Main.main(Main.java:5)\n";
        assert_eq!(
            interpret_problem(1, trace),
            "exception (java.lang.NullPointerException) at Main.main(Main.java:5)"
        );
    }

    #[test]
    fn diagnosis_exit_one_without_trace() {
        assert_eq!(
            interpret_problem(1, "plain error text\n"),
            "terminated with non-zero exit code (1)"
        );
    }

    #[test]
    fn abnormal_termination_wins_even_when_output_matches() {
        let dir = tempfile::tempdir().unwrap();
        let std_path = dir.path().join("t.std");
        fs::write(&std_path, "hello\n").unwrap();
        let id = TestId::new("t");
        let outcome = compare(
            &id,
            &result("hello\n", "", 2),
            &expectations(Some(std_path), None, &identity),
        );
        assert_eq!(
            outcome.reason(),
            Some("Program exited abnormally: terminated with non-zero exit code (2)")
        );
    }

    #[test]
    fn matching_output_passes() {
        let dir = tempfile::tempdir().unwrap();
        let std_path = dir.path().join("t.std");
        fs::write(&std_path, "hello\n").unwrap();
        let outcome = compare(
            &TestId::new("t"),
            &result("hello\n", "", 0),
            &expectations(Some(std_path), None, &identity),
        );
        assert!(outcome.passed());
    }

    #[test]
    fn mismatched_output_fails_with_generic_reason() {
        let dir = tempfile::tempdir().unwrap();
        let std_path = dir.path().join("t.std");
        fs::write(&std_path, "hello\n").unwrap();
        let outcome = compare(
            &TestId::new("t"),
            &result("goodbye\n", "", 0),
            &expectations(Some(std_path), None, &identity),
        );
        assert_eq!(outcome.reason(), Some(OUTPUT_MISMATCH));
    }

    #[test]
    fn filter_symmetry_masks_trailing_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let std_path = dir.path().join("t.std");
        fs::write(&std_path, "hello\n").unwrap();
        let strip = |_: &TestId, text: &str| crate::filters::strip_trailing_space(text);
        let outcome = compare(
            &TestId::new("t"),
            &result("hello   \n", "", 0),
            &expectations(Some(std_path), None, &strip),
        );
        assert!(outcome.passed());
    }

    #[test]
    fn unexpected_stderr_fails_without_error_fixture() {
        let outcome = compare(
            &TestId::new("t"),
            &result("", "warning: ...\n", 0),
            &expectations(None, None, &identity),
        );
        assert_eq!(outcome.reason(), Some(STDERR_NOT_EMPTY));
    }

    #[test]
    fn expected_stderr_is_checked_through_the_error_filter() {
        let dir = tempfile::tempdir().unwrap();
        let err_path = dir.path().join("t.err");
        fs::write(&err_path, "warning: low\n").unwrap();
        let outcome = compare(
            &TestId::new("t"),
            &result("", "warning: low\n", 0),
            &expectations(None, Some(err_path.clone()), &identity),
        );
        assert!(outcome.passed());

        let outcome = compare(
            &TestId::new("t"),
            &result("", "warning: high\n", 0),
            &expectations(None, Some(err_path), &identity),
        );
        assert_eq!(outcome.reason(), Some(ERROR_MISMATCH));
    }

    #[test]
    fn quiet_successful_run_passes_with_no_fixtures() {
        let outcome = compare(
            &TestId::new("t"),
            &result("anything\n", "", 0),
            &expectations(None, None, &identity),
        );
        assert!(outcome.passed());
    }

    #[test]
    fn record_comparison_reports_count_mismatch() {
        let pattern = Regex::new(r"(?ms)^B\[.*?\]").unwrap();
        let outcome = compare_records("B[x]\nB[y]\n", "B[x]\n", &pattern);
        assert_eq!(
            outcome.reason(),
            Some("There are 2 output records; expected 1.")
        );
    }

    #[test]
    fn record_comparison_reports_first_mismatching_index() {
        let pattern = Regex::new(r"(?ms)^\*?\*?B\[.*?\]").unwrap();
        let outcome = compare_records("B[x]\nB[y]\n", "B[x]\n**B[z]\n", &pattern);
        assert_eq!(outcome.reason(), Some("Record #2 does not match expected."));
    }

    #[test]
    fn record_comparison_ignores_expected_markers() {
        let pattern = Regex::new(r"(?ms)^\*?\*?B\[.*?\]").unwrap();
        let outcome = compare_records("B[x]\n", "**B[x]\n", &pattern);
        assert!(outcome.passed());
    }
}
