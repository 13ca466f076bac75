//! The proctor command-line interface.
//!
//! Merges CLI flags with an optional YAML config file into a
//! [`HarnessConfig`], selects and builds the comparison policy, runs the
//! harness over the requested tests, and translates the result into the
//! process exit status: 0 when every test passed, 1 otherwise. Malformed
//! invocations and configuration errors print a diagnostic to standard
//! error and also exit 1, before any test runs.

use std::env;

use clap::error::ErrorKind;
use clap::Parser;

use crate::cli::args::ProctorArgs;
use crate::config::{
    ComparisonMode, ConfigFile, HarnessConfig, DEFAULT_FILE_SIZE_LIMIT, DEFAULT_HEAP_SIZE_LIMIT,
    DEFAULT_REPORT_CHAR_LIMIT, DEFAULT_TIME_LIMIT,
};
use crate::discovery;
use crate::error::HarnessError;
use crate::filters::{self, Filter};
use crate::harness::Harness;
use crate::policy::{DefaultPolicy, FileOutputPolicy, TestPolicy};

pub mod args;

/// Environment variable overriding the interpreter that runs the tested
/// program.
pub const INTERPRETER_VAR: &str = "PROCTOR_INTERPRETER";

/// The main entry point for the CLI. Returns the process exit status.
pub fn run() -> i32 {
    let args = match ProctorArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{}", e);
            return 0;
        }
        Err(e) => {
            // clap renders the usage message; route it to stderr.
            eprint!("{}", e);
            return 1;
        }
    };

    match run_with_args(args) {
        Ok(all_passed) => {
            if all_passed {
                0
            } else {
                1
            }
        }
        Err(error) => {
            eprintln!("{:?}", miette::Report::new(error));
            1
        }
    }
}

fn run_with_args(args: ProctorArgs) -> Result<bool, HarnessError> {
    let file = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };

    let config = build_config(&args, &file)?;
    let policy = build_policy(&args, &file)?;
    let tests = discovery::expand_tests(&args.tests);

    let mut harness = Harness::with_policy(config, policy);
    Ok(harness.test_all(&tests))
}

/// Flags win over config-file values, which win over defaults.
fn build_config(args: &ProctorArgs, file: &ConfigFile) -> Result<HarnessConfig, HarnessError> {
    let program = args
        .program
        .clone()
        .or_else(|| file.program.clone())
        .ok_or(HarnessError::MissingProgram)?;
    let interpreter = args
        .interpreter
        .clone()
        .or_else(|| env::var(INTERPRETER_VAR).ok());
    let tested_program = match interpreter {
        Some(interpreter) => format!("{} {}", interpreter, program),
        None => program,
    };

    Ok(HarnessConfig {
        tested_program,
        time_limit: args
            .time_limit
            .or(file.time_limit)
            .unwrap_or(DEFAULT_TIME_LIMIT),
        file_size_limit: args
            .file_size_limit
            .or(file.file_size_limit)
            .unwrap_or(DEFAULT_FILE_SIZE_LIMIT),
        heap_size_limit: args
            .heap_limit
            .or(file.heap_size_limit)
            .unwrap_or(DEFAULT_HEAP_SIZE_LIMIT),
        report_limit: args.show.or(file.report_limit),
        report_char_limit: args
            .char_limit
            .or(file.report_char_limit)
            .unwrap_or(DEFAULT_REPORT_CHAR_LIMIT),
        use_colors: atty::is(atty::Stream::Stdout),
    })
}

fn build_policy(
    args: &ProctorArgs,
    file: &ConfigFile,
) -> Result<Box<dyn TestPolicy>, HarnessError> {
    let output_filters = resolve_filters(pick(&args.output_filters, &file.output_filters))?;
    let error_filters = resolve_filters(pick(&args.error_filters, &file.error_filters))?;

    let mode = if args.files {
        ComparisonMode::Files
    } else {
        file.mode.unwrap_or(ComparisonMode::Stdout)
    };
    Ok(match mode {
        ComparisonMode::Stdout => Box::new(DefaultPolicy {
            output_filters,
            error_filters,
        }),
        ComparisonMode::Files => Box::new(FileOutputPolicy {
            output_filters,
            error_filters,
            keep: args.keep,
        }),
    })
}

fn pick<'a>(from_flags: &'a [String], from_file: &'a [String]) -> &'a [String] {
    if from_flags.is_empty() {
        from_file
    } else {
        from_flags
    }
}

fn resolve_filters(names: &[String]) -> Result<Vec<Filter>, HarnessError> {
    names
        .iter()
        .map(|name| {
            filters::by_name(name).ok_or_else(|| HarnessError::UnknownFilter {
                name: name.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> ProctorArgs {
        ProctorArgs::try_parse_from(
            std::iter::once("proctor").chain(argv.iter().copied()),
        )
        .unwrap()
    }

    #[test]
    fn flags_override_config_file_values() {
        let file: ConfigFile =
            serde_yaml::from_str("program: cat\ntime_limit: 30\nreport_limit: 2\n").unwrap();
        let parsed = args(&["--time-limit", "5", "t.in"]);
        let config = build_config(&parsed, &file).unwrap();
        assert_eq!(config.tested_program, "cat");
        assert_eq!(config.time_limit, 5);
        assert_eq!(config.report_limit, Some(2));
        assert_eq!(config.file_size_limit, DEFAULT_FILE_SIZE_LIMIT);
    }

    #[test]
    fn missing_program_is_a_fatal_config_error() {
        let parsed = args(&["t.in"]);
        let result = build_config(&parsed, &ConfigFile::default());
        assert!(matches!(result, Err(HarnessError::MissingProgram)));
    }

    #[test]
    fn interpreter_flag_prefixes_the_program() {
        let parsed = args(&["--program", "driver.scm", "--interpreter", "guile", "t.in"]);
        let config = build_config(&parsed, &ConfigFile::default()).unwrap();
        assert_eq!(config.tested_program, "guile driver.scm");
    }

    #[test]
    fn unknown_filter_name_is_rejected() {
        let parsed = args(&["--program", "cat", "--output-filter", "no-such", "t.in"]);
        let result = build_policy(&parsed, &ConfigFile::default());
        assert!(matches!(
            result,
            Err(HarnessError::UnknownFilter { name }) if name == "no-such"
        ));
    }

    #[test]
    fn files_flag_selects_the_file_output_policy() {
        let parsed = args(&["--program", "cat", "--files", "t.in"]);
        assert!(build_policy(&parsed, &ConfigFile::default()).is_ok());
    }

    #[test]
    fn invocation_without_tests_is_malformed() {
        let result = ProctorArgs::try_parse_from(["proctor", "--program", "cat"]);
        assert!(result.is_err());
    }
}
