//! Harness configuration.
//!
//! [`HarnessConfig`] is an immutable record fixed at harness construction.
//! Each recognized option acts independently: the three resource limits
//! shape the bounded invocation of the tested program, `report_limit` bounds
//! how many failures get a full diagnostic block, and `report_char_limit`
//! bounds how much of each fixture is printed. A [`ConfigFile`] supplies the
//! same options (plus filter and mode selection) from a YAML file; CLI flags
//! take precedence over file values.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::HarnessError;

pub const DEFAULT_TIME_LIMIT: u64 = 10; // seconds
pub const DEFAULT_FILE_SIZE_LIMIT: u64 = 2000; // 512-byte blocks
pub const DEFAULT_HEAP_SIZE_LIMIT: u64 = 500_000; // KB
pub const DEFAULT_REPORT_CHAR_LIMIT: usize = 1000;

/// Immutable harness configuration with documented defaults.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Command string that invokes the tested program; per-test arguments
    /// are appended in shell syntax.
    pub tested_program: String,
    /// CPU time limit per test, in seconds.
    pub time_limit: u64,
    /// Limit on the total output the tested program may write, in 512-byte
    /// blocks.
    pub file_size_limit: u64,
    /// Limit on the data segment of the tested program, in kilobytes.
    pub heap_size_limit: u64,
    /// Number of failing tests reported in full detail; `None` means
    /// unbounded.
    pub report_limit: Option<usize>,
    /// Per-fixture character limit in detailed reports; `0` disables
    /// truncation.
    pub report_char_limit: usize,
    /// Colorize pass/fail lines. Defaults to whether stdout is a tty.
    pub use_colors: bool,
}

impl HarnessConfig {
    /// A configuration for `tested_program` with every other option at its
    /// default.
    pub fn new(tested_program: impl Into<String>) -> Self {
        Self {
            tested_program: tested_program.into(),
            time_limit: DEFAULT_TIME_LIMIT,
            file_size_limit: DEFAULT_FILE_SIZE_LIMIT,
            heap_size_limit: DEFAULT_HEAP_SIZE_LIMIT,
            report_limit: None,
            report_char_limit: DEFAULT_REPORT_CHAR_LIMIT,
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }

    /// Apply color formatting to text if colors are enabled.
    pub fn colorize(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{}{}{}", color, text, crate::report::RESET)
        } else {
            text.to_string()
        }
    }
}

/// Comparison mode selecting which shipped policy evaluates a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonMode {
    /// Compare the captured standard output against the `.std` fixture.
    Stdout,
    /// Compare output files written by the tested program against their
    /// `.std` fixtures.
    Files,
}

/// Declarative harness configuration loaded from a YAML file.
///
/// All keys are optional; unset keys fall back to CLI flags or defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub program: Option<String>,
    pub time_limit: Option<u64>,
    pub file_size_limit: Option<u64>,
    pub heap_size_limit: Option<u64>,
    pub report_limit: Option<usize>,
    pub report_char_limit: Option<usize>,
    /// Names of registered filters applied, in order, to output comparison.
    #[serde(default)]
    pub output_filters: Vec<String>,
    /// Names of registered filters applied, in order, to error comparison.
    #[serde(default)]
    pub error_filters: Vec<String>,
    pub mode: Option<ComparisonMode>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, HarnessError> {
        let text = fs::read_to_string(path).map_err(|source| HarnessError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|e| HarnessError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = HarnessConfig::new("cat");
        assert_eq!(config.tested_program, "cat");
        assert_eq!(config.time_limit, 10);
        assert_eq!(config.file_size_limit, 2000);
        assert_eq!(config.heap_size_limit, 500_000);
        assert_eq!(config.report_limit, None);
        assert_eq!(config.report_char_limit, 1000);
    }

    #[test]
    fn config_file_parses_partial_yaml() {
        let parsed: ConfigFile =
            serde_yaml::from_str("program: \"java -ea Main\"\nreport_limit: 5\nmode: files\n")
                .unwrap();
        assert_eq!(parsed.program.as_deref(), Some("java -ea Main"));
        assert_eq!(parsed.report_limit, Some(5));
        assert_eq!(parsed.mode, Some(ComparisonMode::Files));
        assert!(parsed.output_filters.is_empty());
    }

    #[test]
    fn config_file_rejects_unknown_keys() {
        let parsed = serde_yaml::from_str::<ConfigFile>("programm: cat\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn colorize_wraps_only_when_enabled() {
        let mut config = HarnessConfig::new("cat");
        config.use_colors = false;
        assert_eq!(config.colorize("PASSED", crate::report::GREEN), "PASSED");
        config.use_colors = true;
        assert_eq!(
            config.colorize("PASSED", crate::report::GREEN),
            "\x1b[32mPASSED\x1b[0m"
        );
    }
}
