//! The orchestrator: one strictly sequential loop over test identifiers.
//!
//! Each test goes through Execute → Compare → Report → Cleanup; tests are
//! independent except for the run counters and the shown-paths set, both
//! owned here and discarded when the run ends. A failing test never aborts
//! the loop; only configuration-time errors (handled before a [`Harness`]
//! exists) are fatal.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::compare::Outcome;
use crate::config::HarnessConfig;
use crate::exec::{self, ExecutionResult, ResourceLimits};
use crate::fixtures::TestId;
use crate::policy::{DefaultPolicy, TestPolicy};
use crate::report::{self, ReportGroup};

/// Mutable per-run accumulators. `0 <= passed <= count` throughout;
/// `files_shown` only grows.
#[derive(Debug, Default)]
pub struct RunState {
    pub count: usize,
    pub passed: usize,
    /// Fixture paths already rendered in full this run.
    pub files_shown: HashSet<PathBuf>,
}

impl RunState {
    pub fn failed(&self) -> usize {
        self.count - self.passed
    }
}

/// The test harness: a configuration, a policy, and the run state.
pub struct Harness {
    config: HarnessConfig,
    policy: Box<dyn TestPolicy>,
    state: RunState,
}

impl Harness {
    /// A harness with the default policy (stdout comparison, identity
    /// filters).
    pub fn new(config: HarnessConfig) -> Self {
        Self::with_policy(config, Box::new(DefaultPolicy::default()))
    }

    pub fn with_policy(config: HarnessConfig, policy: Box<dyn TestPolicy>) -> Self {
        Self {
            config,
            policy,
            state: RunState::default(),
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Run every test in order and print the end-of-run summary. Returns
    /// true iff all tests passed.
    pub fn test_all(&mut self, tests: &[String]) -> bool {
        self.state = RunState::default();
        for raw in tests {
            self.perform_test(&TestId::new(raw.clone()));
        }
        report::summary(&self.state);
        self.state.passed == self.state.count
    }

    fn perform_test(&mut self, id: &TestId) {
        self.state.count += 1;
        let result = self.execute(id);
        match self.policy.compare(id, &result) {
            Outcome::Pass => {
                self.state.passed += 1;
                report::pass_line(id, &self.config);
            }
            Outcome::Fail(reason) => {
                let groups = self.report_groups(id, &result);
                report::fail_report(id, &reason, &groups, &mut self.state, &self.config);
            }
        }
        // Cleanup runs on every path, pass or fail.
        self.policy.cleanup(id);
    }

    /// Build and run the resource-bounded invocation for one test.
    fn execute(&self, id: &TestId) -> ExecutionResult {
        let limits = ResourceLimits::from(&self.config);
        let command = exec::command_line(
            &self.config.tested_program,
            &self.policy.command_args(id),
            &limits,
        );
        exec::run_command(&command)
    }

    /// The five fixed report groups, in presentation order.
    fn report_groups(&self, id: &TestId, result: &ExecutionResult) -> Vec<ReportGroup> {
        vec![
            ReportGroup::new(report::INPUT_GROUP, self.policy.input_files(id)),
            ReportGroup::new(report::OUTPUT_GROUP, self.policy.output_files(id, result)),
            ReportGroup::new(
                report::EXPECTED_OUTPUT_GROUP,
                self.policy.expected_output_files(id),
            ),
            ReportGroup::new(report::ERROR_GROUP, self.policy.error_files(id, result)),
            ReportGroup::new(
                report::EXPECTED_ERROR_GROUP,
                self.policy.expected_error_files(id),
            ),
        ]
    }
}
