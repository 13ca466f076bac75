//! Resource-bounded execution of the tested program.
//!
//! Each test spawns exactly one child: the configured program invocation
//! plus the policy's per-test arguments, run as a single shell command. On
//! Linux-like POSIX platforms the command is prefixed with `ulimit`
//! directives that independently cap CPU time, the total file size the
//! child may write, and its data-segment size; exceeding a cap makes the
//! OS deliver the corresponding signal, which the comparison pipeline later
//! classifies. On Windows and macOS (`ulimit -d` is unreliable there) the
//! bare command runs and the limits are simply not enforced.
//!
//! The harness never kills the child itself; the only blocking point is
//! waiting for the spawned process to terminate.

use std::process::{Command, ExitStatus, Stdio};

use crate::config::HarnessConfig;

/// Captured observable outputs of one run of the tested program. Owned by
/// the current test's execution and overwritten on each new test.
#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    /// Raw termination status: the exit code when the process exited, or
    /// the negated signal number when it was killed by a signal.
    pub rc: i32,
}

impl ExecutionResult {
    pub fn exited_normally(&self) -> bool {
        self.rc == 0
    }
}

/// Three independent caps on the tested program.
#[derive(Debug, Clone, Copy)]
pub struct ResourceLimits {
    /// CPU time, in seconds.
    pub cpu_seconds: u64,
    /// Maximum file size the child may write, in 512-byte blocks.
    pub file_blocks: u64,
    /// Maximum data-segment size, in kilobytes.
    pub heap_kbytes: u64,
}

impl From<&HarnessConfig> for ResourceLimits {
    fn from(config: &HarnessConfig) -> Self {
        Self {
            cpu_seconds: config.time_limit,
            file_blocks: config.file_size_limit,
            heap_kbytes: config.heap_size_limit,
        }
    }
}

impl ResourceLimits {
    /// The shell prelude that installs the caps, or the empty string on
    /// platforms where the limits are not enforced.
    pub fn shell_prelude(&self) -> String {
        if cfg!(all(unix, not(target_os = "macos"))) {
            format!(
                "ulimit -St {}; ulimit -f {}; ulimit -d {}; ",
                self.cpu_seconds, self.file_blocks, self.heap_kbytes
            )
        } else {
            String::new()
        }
    }
}

/// The full shell command that runs one test: limit prelude, program
/// invocation, per-test arguments.
pub fn command_line(program: &str, args: &str, limits: &ResourceLimits) -> String {
    format!("{}{} {}", limits.shell_prelude(), program, args)
}

/// Run `command` through `sh -c` with an empty input stream and capture its
/// standard output, standard error, and termination status.
///
/// Display-related environment variables are cleared so the tested program
/// runs headless. A failure to spawn is not a host crash: it yields a
/// result with `rc = 127` and the error text on stderr, which the
/// comparison pipeline classifies as abnormal termination.
pub fn run_command(command: &str) -> ExecutionResult {
    let child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .env_remove("DISPLAY")
        .env_remove("WAYLAND_DISPLAY")
        .spawn();

    let mut child = match child {
        Ok(child) => child,
        Err(e) => return spawn_failure(&format!("failed to run tested program: {}", e)),
    };
    // Closing the piped handle feeds the child an empty input stream.
    drop(child.stdin.take());

    match child.wait_with_output() {
        Ok(output) => ExecutionResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            rc: raw_status(&output.status),
        },
        Err(e) => spawn_failure(&format!("failed to collect program output: {}", e)),
    }
}

fn spawn_failure(message: &str) -> ExecutionResult {
    ExecutionResult {
        stdout: String::new(),
        stderr: format!("{}\n", message),
        rc: 127,
    }
}

/// Collapse an [`ExitStatus`] to the raw status convention: exit code when
/// the process exited, negated signal number when it was signaled.
fn raw_status(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}
