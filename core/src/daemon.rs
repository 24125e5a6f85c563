//! Daemon liveness and auto-start
//!
//! The tldr daemon is an external process this adapter never manages
//! beyond starting it: it keeps its own indexes hot and shuts itself down
//! on idle. The adapter only needs to answer "is it reachable right now"
//! and, if not, give it one chance to come up before falling back to a
//! cold invocation.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::socket::socket_path;

/// How long a handshake connect may block before the daemon counts as dead.
#[cfg(unix)]
const HANDSHAKE_TIMEOUT: Duration = Duration::from_millis(250);

/// Total time the launcher waits for a freshly started daemon.
pub const LAUNCH_DEADLINE: Duration = Duration::from_secs(3);

/// Interval between liveness polls while waiting for a launch.
pub const LAUNCH_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Liveness and launch operations the dispatcher depends on.
///
/// Production code uses [`DaemonHandle`]; dispatch tests substitute a fake
/// that records whether a launch was attempted.
pub(crate) trait Supervisor {
    fn is_live(&self) -> bool;
    fn ensure_live(&self) -> bool;
}

/// Handle to the (possibly absent) daemon for one project directory.
pub struct DaemonHandle {
    tool: PathBuf,
    socket: PathBuf,
    launch_deadline: Duration,
    poll_interval: Duration,
}

impl DaemonHandle {
    /// Handle addressing the daemon for `project_dir` via the default
    /// temp-dir rendezvous path.
    pub fn new(tool: impl Into<PathBuf>, project_dir: &Path) -> Self {
        Self::with_socket(tool, socket_path(project_dir))
    }

    /// Handle with an explicit socket path (tests point this at a scratch
    /// directory via [`crate::socket::socket_path_in`]).
    pub fn with_socket(tool: impl Into<PathBuf>, socket: PathBuf) -> Self {
        Self {
            tool: tool.into(),
            socket,
            launch_deadline: LAUNCH_DEADLINE,
            poll_interval: LAUNCH_POLL_INTERVAL,
        }
    }

    /// Shrink the launch wait, for tests that exercise the not-live path.
    pub fn with_launch_deadline(mut self, deadline: Duration) -> Self {
        self.launch_deadline = deadline;
        self
    }

    pub fn socket(&self) -> &Path {
        &self.socket
    }

    /// Whether the daemon is reachable right now.
    ///
    /// Existence of the rendezvous file plus a bounded connect handshake;
    /// a stale file left by a dead daemon refuses the connection and
    /// counts as not live. The dispatcher's invocation timeout remains the
    /// backstop for a daemon that dies between this check and the query.
    pub fn is_live(&self) -> bool {
        probe_socket(&self.socket)
    }

    /// Start the daemon if it is not already live and wait for it to come
    /// up, polling until the launch deadline.
    ///
    /// Single attempt: one spawn, one bounded wait. A spawn failure
    /// (tldr not on PATH) is reported as not-live, never as an error; the
    /// caller is expected to fall back to a cold invocation.
    pub fn ensure_live(&self) -> bool {
        if self.is_live() {
            return true;
        }

        let spawned = Command::new(&self.tool)
            .args(["daemon", "start"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            // The child detaches and outlives us; it is never reaped here.
            Ok(_child) => {}
            Err(err) => {
                debug!(tool = %self.tool.display(), error = %err, "daemon launch failed");
                return false;
            }
        }

        let deadline = Instant::now() + self.launch_deadline;
        loop {
            if self.is_live() {
                debug!(socket = %self.socket.display(), "daemon became live");
                return true;
            }
            if Instant::now() >= deadline {
                debug!(socket = %self.socket.display(), "daemon did not come up in time");
                return false;
            }
            thread::sleep(self.poll_interval);
        }
    }
}

impl Supervisor for DaemonHandle {
    fn is_live(&self) -> bool {
        DaemonHandle::is_live(self)
    }

    fn ensure_live(&self) -> bool {
        DaemonHandle::ensure_live(self)
    }
}

#[cfg(unix)]
fn probe_socket(socket: &Path) -> bool {
    use std::os::unix::net::UnixStream;

    if !socket.exists() {
        return false;
    }
    match UnixStream::connect(socket) {
        Ok(stream) => {
            // Connected; bound the handshake so a wedged daemon cannot
            // hold the hook open.
            let _ = stream.set_read_timeout(Some(HANDSHAKE_TIMEOUT));
            let _ = stream.set_write_timeout(Some(HANDSHAKE_TIMEOUT));
            true
        }
        Err(err) => {
            debug!(socket = %socket.display(), error = %err, "stale or unreachable socket");
            false
        }
    }
}

#[cfg(not(unix))]
fn probe_socket(socket: &Path) -> bool {
    // No connect handshake off unix; fall back to the existence signal.
    socket.exists()
}
