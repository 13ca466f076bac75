//! Test identifiers and fixture references.
//!
//! A test identifier is an opaque string naming one test case. From it the
//! harness derives a *base name* (the identifier with any directories and
//! extension stripped) and a *base directory*; the conventional fixture
//! family of a test lives next to it: `B.in`, `B.std`, `B.err`.
//!
//! A [`FixtureRef`] names one reportable piece of content, either a file on
//! disk (read lazily at report time, so deduplication can work by path
//! identity) or inline text such as captured program output.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Opaque name selecting one test case and its fixture family.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestId(String);

impl TestId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The root name of the test: the identifier with any parent directories
    /// and any extension stripped.
    pub fn base_name(&self) -> String {
        Path::new(&self.0)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The directory containing the test's fixture family.
    pub fn base_dir(&self) -> PathBuf {
        Path::new(&self.0)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    /// The conventional sibling fixture `<base_name>.<ext>` in the base
    /// directory, whether or not it exists.
    pub fn sibling(&self, ext: &str) -> PathBuf {
        self.base_dir().join(format!("{}.{}", self.base_name(), ext))
    }

    /// Like [`TestId::sibling`], but only if the file is actually present.
    /// Absence of a fixture is not an error; that channel is simply not
    /// checked.
    pub fn existing_sibling(&self, ext: &str) -> Option<PathBuf> {
        let path = self.sibling(ext);
        path.exists().then_some(path)
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TestId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Where a fixture's content comes from. Exactly one of the two forms is
/// meaningful per reference.
#[derive(Debug, Clone)]
pub enum FixtureSource {
    /// Content is read from this file when the report is printed.
    Path(PathBuf),
    /// Content is carried directly, e.g. captured standard output.
    Inline(String),
}

/// A labeled piece of reportable content.
#[derive(Debug, Clone)]
pub struct FixtureRef {
    /// Short name identifying the fixture in a report.
    pub label: String,
    pub source: FixtureSource,
}

impl FixtureRef {
    pub fn from_path(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            source: FixtureSource::Path(path.into()),
        }
    }

    pub fn inline(label: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            source: FixtureSource::Inline(content.into()),
        }
    }

    /// The backing path, if this reference points at a file.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            FixtureSource::Path(p) => Some(p),
            FixtureSource::Inline(_) => None,
        }
    }

    /// Resolve the content of this reference. An unreadable path yields the
    /// empty string; reporting must not abort on I/O failure.
    pub fn resolve(&self) -> String {
        match &self.source {
            FixtureSource::Path(p) => contents(p),
            FixtureSource::Inline(text) => text.clone(),
        }
    }
}

/// The contents of `path`, or the empty string if the file does not exist or
/// is unreadable.
pub fn contents(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}
