//! Subprocess invocation with a hard timeout
//!
//! Both dispatch paths run the same external tool; the only difference is
//! the budget. The timeout is enforced here: once it fires the child is
//! killed and the call returns, there is no cooperative cancellation of
//! whatever analysis the tool was doing.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::InvokeError;

/// Interval between `try_wait` polls on a running child.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Invocation seam the dispatcher runs queries through.
///
/// Production code uses [`SubprocessInvoker`]; dispatch tests substitute a
/// recorder that captures the argv and budget.
pub(crate) trait Invoke {
    fn invoke(&self, argv: &[String], budget: Duration) -> Result<String, InvokeError>;
}

/// Runs the tldr tool as a child process.
pub struct SubprocessInvoker {
    tool: PathBuf,
}

impl SubprocessInvoker {
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }

    /// Run the tool with `argv`, killing it if `budget` elapses first.
    ///
    /// Exit 0 yields the verbatim stdout. Any other outcome is an
    /// [`InvokeError`]: spawn failure, non-zero exit (stderr carried in
    /// the message), timeout, or an I/O fault while waiting.
    pub fn invoke(&self, argv: &[String], budget: Duration) -> Result<String, InvokeError> {
        let tool = self.tool.display().to_string();
        debug!(%tool, ?argv, budget_ms = budget.as_millis() as u64, "invoking tool");

        let mut child = Command::new(&self.tool)
            .args(argv)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| InvokeError::Spawn {
                tool: tool.clone(),
                source,
            })?;

        // Drain both pipes on their own threads so a chatty child cannot
        // block on a full pipe while this thread polls for exit.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + budget;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(InvokeError::Timeout { tool, budget });
                    }
                    thread::sleep(WAIT_POLL_INTERVAL);
                }
                Err(source) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(InvokeError::Io { tool, source });
                }
            }
        };

        let stdout = join(stdout);
        let stderr = join(stderr);

        if status.success() {
            Ok(stdout)
        } else {
            Err(InvokeError::NonZeroExit {
                tool,
                status,
                stderr: stderr.trim().to_string(),
            })
        }
    }
}

impl Invoke for SubprocessInvoker {
    fn invoke(&self, argv: &[String], budget: Duration) -> Result<String, InvokeError> {
        SubprocessInvoker::invoke(self, argv, budget)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = pipe.read_to_string(&mut buf);
            buf
        })
    })
}

fn join(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}
