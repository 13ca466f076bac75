//! Fatal, configuration-time errors.
//!
//! Only problems that abort the run before any test executes live here:
//! malformed CLI usage, unreadable or malformed configuration, unknown
//! filter names. Per-test conditions (abnormal termination, comparison
//! mismatch, missing fixtures) never construct a [`HarnessError`]; they are
//! contained within that test's iteration and surface as failure reasons.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("no tested program configured")]
    #[diagnostic(
        code(proctor::config::missing_program),
        help("pass --program CMD, or set `program:` in the config file")
    )]
    MissingProgram,

    #[error("cannot read config file '{}'", path.display())]
    #[diagnostic(code(proctor::config::unreadable))]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config file '{}': {message}", path.display())]
    #[diagnostic(code(proctor::config::malformed))]
    ConfigParse { path: PathBuf, message: String },

    #[error("unknown filter '{name}'")]
    #[diagnostic(
        code(proctor::config::unknown_filter),
        help("known filters: strip-comments, strip-trailing-space, strip-carriage-returns, collapse-spaces, drop-blank-lines, rstrip")
    )]
    UnknownFilter { name: String },
}
