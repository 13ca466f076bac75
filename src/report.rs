//! Failure reporting: banners, truncation, deduplication, summaries.
//!
//! A passing test gets a one-line confirmation. A failing test gets a
//! one-line reason and, until the configured detail limit is exhausted, a
//! block per reportable fixture: content framed by banner lines, truncated
//! at a line boundary near the character limit, and never printed twice for
//! the same path within one run.

use std::io::Write;

use difference::{Changeset, Difference};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::compare;
use crate::config::HarnessConfig;
use crate::fixtures::{FixtureRef, TestId};
use crate::harness::RunState;

// Color constants for terminal output
pub const RESET: &str = "\x1b[0m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const INPUT_GROUP: &str = "**** INPUT FILES:";
pub const OUTPUT_GROUP: &str = "**** OUTPUTS FROM TEST PROGRAM:";
pub const EXPECTED_OUTPUT_GROUP: &str = "**** EXPECTED OUTPUTS:";
pub const ERROR_GROUP: &str = "**** ERROR OUTPUTS FROM TEST PROGRAM:";
pub const EXPECTED_ERROR_GROUP: &str = "**** EXPECTED ERROR OUTPUTS:";

const BANNER_WIDTH: usize = 65;

/// One titled group of reportable fixtures. A group with no entries prints
/// nothing, not even its title.
#[derive(Debug, Clone)]
pub struct ReportGroup {
    pub title: &'static str,
    pub entries: Vec<FixtureRef>,
}

impl ReportGroup {
    pub fn new(title: &'static str, entries: Vec<FixtureRef>) -> Self {
        Self { title, entries }
    }
}

/// One-line confirmation for a passing test.
pub fn pass_line(id: &TestId, config: &HarnessConfig) {
    println!(
        "** {} {}.",
        id.base_name(),
        config.colorize("PASSED", GREEN)
    );
}

/// Failure line plus, unless suppressed, the full diagnostic block.
pub fn fail_report(
    id: &TestId,
    reason: &str,
    groups: &[ReportGroup],
    state: &mut RunState,
    config: &HarnessConfig,
) {
    let base = id.base_name();
    println!(
        "** {} {} ({})",
        base,
        config.colorize("FAILED", RED),
        reason
    );

    let failed = state.failed();
    if let Some(limit) = config.report_limit {
        if failed > limit {
            if failed == limit + 1 {
                println!();
                println!(
                    "*** Encountered more than {} errors.  \
                     Further detailed reports suppressed. ***",
                    limit
                );
                println!();
            }
            return;
        }
    }

    for group in groups {
        print_group(group, state, config);
    }
    if reason == compare::OUTPUT_MISMATCH {
        print_mismatch_diff(groups, config);
    }
    println!("** End of {} error report **", base);
    println!();
}

/// End-of-run summary.
pub fn summary(state: &RunState) {
    println!();
    if state.passed == state.count {
        println!("Passed all {} tests.", state.count);
    } else {
        println!("Passed {} out of {} tests.", state.passed, state.count);
    }
}

fn print_group(group: &ReportGroup, state: &mut RunState, config: &HarnessConfig) {
    if group.entries.is_empty() {
        return;
    }
    println!();
    println!("{}", group.title);
    for entry in &group.entries {
        print_entry(entry, state, config);
    }
}

fn print_entry(fixture: &FixtureRef, state: &mut RunState, config: &HarnessConfig) {
    if let Some(path) = fixture.path() {
        // Insert returns false when the path was already shown this run.
        if !state.files_shown.insert(path.to_path_buf()) {
            println!("[{} shown previously]", fixture.label);
            return;
        }
    }
    let content = fixture.resolve();
    let (segment, omitted) = truncated_segment(&content, config.report_char_limit);
    println!("{}", banner(&fixture.label));
    print!("{}", segment);
    if omitted > 0 {
        println!("... + {} more characters [listing truncated]", omitted);
    }
    println!("{}", banner(""));
}

/// Bound `content` to `limit` characters, preferring the last line boundary
/// at or before the limit; without one, hard-cut at the limit and close the
/// line. Returns the printable segment and how many characters of `content`
/// were omitted. A limit of `0` disables truncation. Content that fits but
/// lacks a final newline gets an explicit marker so the discrepancy is
/// visible in the report.
pub fn truncated_segment(content: &str, limit: usize) -> (String, usize) {
    if limit == 0 || content.len() <= limit {
        let mut segment = content.to_string();
        if !segment.is_empty() && !segment.ends_with('\n') {
            segment.push_str("\n<does not end with newline>\n");
        }
        return (segment, 0);
    }
    let mut cut = limit;
    while !content.is_char_boundary(cut) {
        cut -= 1;
    }
    match content[..cut].rfind('\n') {
        Some(end) => {
            let printed = end + 1;
            (content[..printed].to_string(), content.len() - printed)
        }
        None => {
            let mut segment = content[..cut].to_string();
            let omitted = content.len() - cut;
            segment.push('\n');
            (segment, omitted)
        }
    }
}

/// A fixed-width banner line, labeled or plain.
pub fn banner(label: &str) -> String {
    if label.is_empty() {
        format!("+{}+", "-".repeat(BANNER_WIDTH))
    } else {
        format!(
            "+--- {} {}+",
            label,
            "-".repeat((BANNER_WIDTH - 5).saturating_sub(label.len()))
        )
    }
}

/// Line diff of the first actual output against the first expected output,
/// printed after the fixture blocks of an output-mismatch report.
fn print_mismatch_diff(groups: &[ReportGroup], config: &HarnessConfig) {
    let entry = |title: &str| {
        groups
            .iter()
            .find(|g| g.title == title)
            .and_then(|g| g.entries.first())
    };
    let (Some(actual), Some(expected)) = (entry(OUTPUT_GROUP), entry(EXPECTED_OUTPUT_GROUP))
    else {
        return;
    };
    let changeset = Changeset::new(&expected.resolve(), &actual.resolve(), "\n");

    println!();
    println!("**** DIFF (expected vs. actual):");
    let choice = if config.use_colors {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    for diff in &changeset.diffs {
        match diff {
            Difference::Same(text) => {
                let _ = stdout.reset();
                let _ = writeln!(stdout, " {}", text);
            }
            Difference::Add(text) => {
                let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
                let _ = writeln!(stdout, "+{}", text);
            }
            Difference::Rem(text) => {
                let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
                let _ = writeln!(stdout, "-{}", text);
            }
        }
    }
    let _ = stdout.reset();
}
