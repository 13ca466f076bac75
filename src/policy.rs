//! The overridable surface of the harness.
//!
//! [`TestPolicy`] bundles everything a project customizes about a test:
//! where fixtures live, what arguments the tested program gets, how text is
//! normalized, how pass/fail is decided, which files appear in a failure
//! report, and what cleanup runs after each test. Every method has a
//! documented default, so a policy only overrides what it needs — the
//! harness injects one policy at construction and never branches on its
//! concrete type.
//!
//! Two policies ship with the crate: [`DefaultPolicy`] compares the
//! captured standard output against the `.std` fixture, and
//! [`FileOutputPolicy`] compares output files the tested program writes
//! next to its inputs.

use std::fs;
use std::path::{Path, PathBuf};

use crate::compare::{self, Expectations, Outcome};
use crate::exec::ExecutionResult;
use crate::filters::{self, Filter};
use crate::fixtures::{contents, FixtureRef, TestId};

/// Label used for captured standard output in reports.
const STDOUT_LABEL: &str = "<standard output>";
/// Label used for captured standard error in reports.
const STDERR_LABEL: &str = "<standard error>";

pub trait TestPolicy {
    /// The input fixture for `id`, if present: `B.in` next to the test.
    fn input_file(&self, id: &TestId) -> Option<PathBuf> {
        id.existing_sibling("in")
    }

    /// The expected-output fixture for `id`, if present: `B.std`.
    fn expected_output_file(&self, id: &TestId) -> Option<PathBuf> {
        id.existing_sibling("std")
    }

    /// The expected-error fixture for `id`, if present: `B.err`.
    fn expected_error_file(&self, id: &TestId) -> Option<PathBuf> {
        id.existing_sibling("err")
    }

    /// Shell-syntax arguments appended to the tested program's invocation.
    /// The default redirects standard input from the input fixture.
    fn command_args(&self, id: &TestId) -> String {
        match self.input_file(id) {
            Some(path) => format!("< {}", path.display()),
            None => String::new(),
        }
    }

    /// Normalization applied to both captured and expected standard output
    /// before comparison. Identity by default.
    fn output_filter(&self, _id: &TestId, text: &str) -> String {
        text.to_string()
    }

    /// Normalization applied to both captured and expected standard error
    /// before comparison. Identity by default.
    fn error_filter(&self, _id: &TestId, text: &str) -> String {
        text.to_string()
    }

    /// Decide pass/fail for one execution. The default is the comparison
    /// pipeline of [`compare::compare`].
    fn compare(&self, id: &TestId, result: &ExecutionResult) -> Outcome {
        let output_filter = |id: &TestId, text: &str| self.output_filter(id, text);
        let error_filter = |id: &TestId, text: &str| self.error_filter(id, text);
        let expectations = Expectations {
            expected_output: self.expected_output_file(id),
            expected_error: self.expected_error_file(id),
            output_filter: &output_filter,
            error_filter: &error_filter,
        };
        compare::compare(id, result, &expectations)
    }

    /// Input fixtures shown in a failure report.
    fn input_files(&self, id: &TestId) -> Vec<FixtureRef> {
        self.input_file(id)
            .map(|path| vec![FixtureRef::from_path(file_label(&path), path)])
            .unwrap_or_default()
    }

    /// Program outputs shown in a failure report; the captured standard
    /// output by default.
    fn output_files(&self, _id: &TestId, result: &ExecutionResult) -> Vec<FixtureRef> {
        vec![FixtureRef::inline(STDOUT_LABEL, result.stdout.clone())]
    }

    /// Program error outputs shown in a failure report; the captured
    /// standard error by default.
    fn error_files(&self, _id: &TestId, result: &ExecutionResult) -> Vec<FixtureRef> {
        vec![FixtureRef::inline(STDERR_LABEL, result.stderr.clone())]
    }

    /// Expected outputs shown in a failure report.
    fn expected_output_files(&self, id: &TestId) -> Vec<FixtureRef> {
        self.expected_output_file(id)
            .map(|path| vec![FixtureRef::from_path(file_label(&path), path)])
            .unwrap_or_default()
    }

    /// Expected error outputs shown in a failure report.
    fn expected_error_files(&self, id: &TestId) -> Vec<FixtureRef> {
        self.expected_error_file(id)
            .map(|path| vec![FixtureRef::from_path(file_label(&path), path)])
            .unwrap_or_default()
    }

    /// Per-test cleanup, guaranteed to run after reporting on every path,
    /// pass or fail. No-op by default.
    fn cleanup(&self, _id: &TestId) {}
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Standard-output comparison with configurable filters.
#[derive(Default)]
pub struct DefaultPolicy {
    pub output_filters: Vec<Filter>,
    pub error_filters: Vec<Filter>,
}

impl TestPolicy for DefaultPolicy {
    fn output_filter(&self, _id: &TestId, text: &str) -> String {
        filters::apply_all(&self.output_filters, text)
    }

    fn error_filter(&self, _id: &TestId, text: &str) -> String {
        filters::apply_all(&self.error_filters, text)
    }
}

/// File-output comparison: the tested program receives its input file
/// path(s) as command-line arguments and writes `B.out` (and possibly
/// `B.err`) files next to them; each produced `.out` is compared against
/// the corresponding `.std` fixture through the output filter.
///
/// A test whose base name ends in `-1` with a sibling `-2.in` file is a
/// multi-input test: both inputs are passed, reported, and compared.
///
/// On nonzero exit the failure reason is the trimmed standard error text.
/// Cleanup deletes the produced files unless `keep` is set.
pub struct FileOutputPolicy {
    pub output_filters: Vec<Filter>,
    pub error_filters: Vec<Filter>,
    /// Retain files produced by the tested program.
    pub keep: bool,
}

impl FileOutputPolicy {
    /// All input files of the test: the `.in` fixture, plus the `-2.in`
    /// sibling of a `-1` test when present.
    fn inputs(&self, id: &TestId) -> Vec<PathBuf> {
        let mut inputs: Vec<PathBuf> = self.input_file(id).into_iter().collect();
        if let Some(companion) = id
            .base_name()
            .strip_suffix("-1")
            .map(|stem| id.base_dir().join(format!("{}-2.in", stem)))
            .filter(|path| path.exists())
        {
            inputs.push(companion);
        }
        inputs
    }

    /// The inputs with their extension swapped, e.g. `B.in` to `B.out`.
    fn produced(&self, id: &TestId, ext: &str) -> Vec<PathBuf> {
        self.inputs(id)
            .into_iter()
            .map(|path| path.with_extension(ext))
            .collect()
    }
}

impl TestPolicy for FileOutputPolicy {
    fn command_args(&self, id: &TestId) -> String {
        let inputs: Vec<String> = self
            .inputs(id)
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        inputs.join(" ")
    }

    fn output_filter(&self, _id: &TestId, text: &str) -> String {
        filters::apply_all(&self.output_filters, text)
    }

    fn error_filter(&self, _id: &TestId, text: &str) -> String {
        filters::apply_all(&self.error_filters, text)
    }

    fn compare(&self, id: &TestId, result: &ExecutionResult) -> Outcome {
        if !result.exited_normally() {
            let err = result.stderr.trim();
            return if err.is_empty() {
                Outcome::fail("unknown error")
            } else {
                Outcome::fail(err)
            };
        }
        for (produced, expected) in self.produced(id, "out").iter().zip(self.produced(id, "std"))
        {
            let actual = self.output_filter(id, &contents(produced));
            let wanted = self.output_filter(id, &contents(&expected));
            if actual != wanted {
                return Outcome::fail("Output(s) do not all match expected output(s).");
            }
        }
        Outcome::Pass
    }

    fn input_files(&self, id: &TestId) -> Vec<FixtureRef> {
        self.inputs(id)
            .into_iter()
            .map(|path| FixtureRef::from_path(file_label(&path), path))
            .collect()
    }

    fn output_files(&self, id: &TestId, _result: &ExecutionResult) -> Vec<FixtureRef> {
        self.produced(id, "out")
            .into_iter()
            .map(|path| FixtureRef::from_path(file_label(&path), path))
            .collect()
    }

    fn error_files(&self, id: &TestId, _result: &ExecutionResult) -> Vec<FixtureRef> {
        self.produced(id, "err")
            .into_iter()
            .map(|path| FixtureRef::from_path(file_label(&path), path))
            .collect()
    }

    fn expected_output_files(&self, id: &TestId) -> Vec<FixtureRef> {
        self.produced(id, "std")
            .into_iter()
            .map(|path| FixtureRef::from_path(file_label(&path), path))
            .collect()
    }

    fn expected_error_files(&self, _id: &TestId) -> Vec<FixtureRef> {
        Vec::new()
    }

    fn cleanup(&self, id: &TestId) {
        if self.keep {
            return;
        }
        for path in self
            .produced(id, "out")
            .into_iter()
            .chain(self.produced(id, "err"))
        {
            let _ = fs::remove_file(path);
        }
    }
}
