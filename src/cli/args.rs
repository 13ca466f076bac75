//! Defines the command-line arguments for the proctor binary.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::Parser;
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "proctor",
    version,
    about = "Run a tested program against recorded fixtures under resource limits."
)]
pub struct ProctorArgs {
    /// Test identifiers, or directories searched for `.in` files.
    #[arg(value_name = "TEST", required = true)]
    pub tests: Vec<String>,

    /// Command that invokes the tested program.
    #[arg(long, value_name = "CMD")]
    pub program: Option<String>,

    /// YAML configuration file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum number of failing tests reported in full detail.
    #[arg(long, value_name = "N")]
    pub show: Option<usize>,

    /// Interpreter command prefixed to the tested program. The
    /// PROCTOR_INTERPRETER environment variable supplies the same override;
    /// the flag wins.
    #[arg(long, value_name = "CMD")]
    pub interpreter: Option<String>,

    /// Keep files produced by the tested program.
    #[arg(long)]
    pub keep: bool,

    /// CPU time limit per test, in seconds.
    #[arg(long, value_name = "SECS")]
    pub time_limit: Option<u64>,

    /// Output size limit per test, in 512-byte blocks.
    #[arg(long, value_name = "BLOCKS")]
    pub file_size_limit: Option<u64>,

    /// Data-segment size limit per test, in kilobytes.
    #[arg(long, value_name = "KB")]
    pub heap_limit: Option<u64>,

    /// Per-fixture character limit in detailed reports (0 = unlimited).
    #[arg(long, value_name = "N")]
    pub char_limit: Option<usize>,

    /// Compare files written by the tested program instead of its stdout.
    #[arg(long)]
    pub files: bool,

    /// Normalization filter for output comparison (repeatable, applied in
    /// order).
    #[arg(long = "output-filter", value_name = "NAME")]
    pub output_filters: Vec<String>,

    /// Normalization filter for error comparison (repeatable, applied in
    /// order).
    #[arg(long = "error-filter", value_name = "NAME")]
    pub error_filters: Vec<String>,
}
