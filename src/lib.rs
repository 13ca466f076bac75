//! Proctor: a black-box test harness.
//!
//! Given a tested external program and a set of test identifiers, the
//! harness runs the program once per test under OS resource limits,
//! captures its standard output, standard error, and exit status, compares
//! them against recorded fixtures through pluggable normalization filters,
//! and prints a pass/fail report with truncated, deduplicated diagnostics.
//!
//! ```no_run
//! use proctor::{Harness, HarnessConfig};
//!
//! let mut config = HarnessConfig::new("java -ea Main");
//! config.report_limit = Some(5);
//! let mut harness = Harness::new(config);
//! let all_passed = harness.test_all(&["tests/basic-01.in".to_string()]);
//! std::process::exit(if all_passed { 0 } else { 1 });
//! ```

pub use crate::compare::Outcome;
pub use crate::config::{ComparisonMode, ConfigFile, HarnessConfig};
pub use crate::error::HarnessError;
pub use crate::exec::{ExecutionResult, ResourceLimits};
pub use crate::fixtures::{FixtureRef, FixtureSource, TestId};
pub use crate::harness::{Harness, RunState};
pub use crate::policy::{DefaultPolicy, FileOutputPolicy, TestPolicy};

pub mod cli;
pub mod compare;
pub mod config;
pub mod discovery;
pub mod error;
pub mod exec;
pub mod filters;
pub mod fixtures;
pub mod harness;
pub mod policy;
pub mod report;
