//! Command runner for external process execution.
//!
//! Probe and remux calls block the interactive loop. The runner polls the
//! child instead of waiting on it, so a caller can abort it (abort check)
//! or bound it (timeout). Output pipes are drained on helper threads that
//! are joined before `run` returns.

use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;

/// Callback polled while a child runs; returning `true` kills the child.
pub type AbortCheck<'a> = &'a dyn Fn() -> bool;

/// Abort check that never aborts.
pub fn never_abort() -> bool {
    false
}

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Errors from running an external command.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Failed to start {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("{tool} was cancelled")]
    Cancelled { tool: String },

    #[error("{tool} timed out after {secs}s")]
    TimedOut { tool: String, secs: u64 },

    #[error("I/O error while running {tool}: {source}")]
    Io {
        tool: String,
        #[source]
        source: io::Error,
    },
}

/// Captured output of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    /// Exit code, `-1` when killed by a signal.
    pub exit_code: i32,
}

/// Runs external tools with an optional timeout.
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    timeout: Option<Duration>,
}

impl CommandRunner {
    /// Runner that waits for the child indefinitely.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner that kills the child after `secs` seconds; `0` disables it.
    pub fn with_timeout_secs(secs: u64) -> Self {
        Self {
            timeout: (secs > 0).then(|| Duration::from_secs(secs)),
        }
    }

    /// Run `program` with `args` and capture its output.
    ///
    /// A non-zero exit is not an error here; check `CommandOutput::success`.
    pub fn run(
        &self,
        program: &str,
        args: &[String],
        abort: AbortCheck<'_>,
    ) -> Result<CommandOutput, RunError> {
        tracing::debug!("Running: {} {}", program, args.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RunError::Spawn {
                tool: program.to_string(),
                source,
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.wait(&mut child, program, abort) {
            Ok(status) => status,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = join(stdout);
                let _ = join(stderr);
                return Err(e);
            }
        };

        let io_err = |source| RunError::Io {
            tool: program.to_string(),
            source,
        };
        let stdout = join(stdout).map_err(io_err)?;
        let stderr = join(stderr).map_err(io_err)?;

        Ok(CommandOutput {
            stdout,
            stderr,
            success: status.success(),
            exit_code: status.code().unwrap_or(-1),
        })
    }

    fn wait(
        &self,
        child: &mut Child,
        program: &str,
        abort: AbortCheck<'_>,
    ) -> Result<std::process::ExitStatus, RunError> {
        let started = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {}
                Err(source) => {
                    return Err(RunError::Io {
                        tool: program.to_string(),
                        source,
                    })
                }
            }

            if abort() {
                tracing::info!("{} cancelled by user", program);
                return Err(RunError::Cancelled {
                    tool: program.to_string(),
                });
            }

            if let Some(limit) = self.timeout {
                if started.elapsed() >= limit {
                    tracing::warn!("{} exceeded {}s timeout", program, limit.as_secs());
                    return Err(RunError::TimedOut {
                        tool: program.to_string(),
                        secs: limit.as_secs(),
                    });
                }
            }

            thread::sleep(POLL_INTERVAL);
        }
    }
}

type Drain = Option<JoinHandle<io::Result<String>>>;

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Drain {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            pipe.read_to_end(&mut buf)?;
            Ok(String::from_utf8_lossy(&buf).into_owned())
        })
    })
}

fn join(handle: Drain) -> io::Result<String> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "output reader panicked"))?,
        None => Ok(String::new()),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn captures_stdout_and_status() {
        let out = CommandRunner::new()
            .run("sh", &args(&["-c", "echo hello; echo oops >&2"]), &never_abort)
            .unwrap();
        assert!(out.success);
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.stdout.trim(), "hello");
        assert_eq!(out.stderr.trim(), "oops");
    }

    #[test]
    fn non_zero_exit_is_not_an_error() {
        let out = CommandRunner::new()
            .run("sh", &args(&["-c", "exit 3"]), &never_abort)
            .unwrap();
        assert!(!out.success);
        assert_eq!(out.exit_code, 3);
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let err = CommandRunner::new()
            .run("rmx-definitely-not-a-tool", &[], &never_abort)
            .unwrap_err();
        assert!(matches!(err, RunError::Spawn { .. }));
    }

    #[test]
    fn abort_check_kills_child() {
        let polls = Cell::new(0);
        let abort = || {
            polls.set(polls.get() + 1);
            polls.get() > 2
        };
        let err = CommandRunner::new()
            .run("sleep", &args(&["5"]), &abort)
            .unwrap_err();
        assert!(matches!(err, RunError::Cancelled { .. }));
    }

    #[test]
    fn timeout_kills_child() {
        let err = CommandRunner::with_timeout_secs(1)
            .run("sleep", &args(&["5"]), &never_abort)
            .unwrap_err();
        assert!(matches!(err, RunError::TimedOut { secs: 1, .. }));
    }
}
