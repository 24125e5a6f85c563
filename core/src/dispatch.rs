//! Query dispatch: daemon path vs. fallback path
//!
//! One dispatch is one probe, at most one launch attempt, and exactly one
//! tool invocation. A live daemon gets a short budget because its indexes
//! are hot; a cold direct invocation gets a long one because the tool
//! re-analyzes from scratch. The two paths are alternatives chosen by
//! liveness, never a retry chain: a failure on the daemon path is
//! returned, not retried cold.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::daemon::{DaemonHandle, Supervisor};
use crate::invoke::{Invoke, SubprocessInvoker};
use crate::socket::{socket_path, socket_path_in};
use crate::types::{Query, QueryResult};

/// Budget for a query against a live, pre-warmed daemon.
pub const DAEMON_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Budget for a cold, non-daemonized analysis run.
pub const FALLBACK_TIMEOUT: Duration = Duration::from_millis(60_000);

/// Name of the analysis tool binary, resolved via PATH.
pub const DEFAULT_TOOL: &str = "tldr";

/// Dispatches queries to the tldr tool, preferring the daemon path.
pub struct QueryDispatcher {
    tool: PathBuf,
    daemon_timeout: Duration,
    fallback_timeout: Duration,
    socket_base: Option<PathBuf>,
}

impl Default for QueryDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryDispatcher {
    pub fn new() -> Self {
        Self::with_tool(DEFAULT_TOOL)
    }

    /// Dispatcher driving a specific tool binary.
    pub fn with_tool(tool: impl Into<PathBuf>) -> Self {
        Self {
            tool: tool.into(),
            daemon_timeout: DAEMON_TIMEOUT,
            fallback_timeout: FALLBACK_TIMEOUT,
            socket_base: None,
        }
    }

    /// Override the rendezvous base directory (tests use a scratch dir
    /// instead of the system temp dir).
    pub fn with_socket_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.socket_base = Some(base.into());
        self
    }

    /// Run one query for `project_dir` and normalize the outcome.
    ///
    /// Never panics and never returns an error: every failure, including
    /// an unreachable daemon, ends up as `QueryResult{success: false}`
    /// for the hook layer to degrade on.
    pub fn dispatch(&self, project_dir: &Path, query: &Query) -> QueryResult {
        let socket = match &self.socket_base {
            Some(base) => socket_path_in(base, project_dir),
            None => socket_path(project_dir),
        };
        let daemon = DaemonHandle::with_socket(&self.tool, socket);
        let invoker = SubprocessInvoker::new(&self.tool);
        self.dispatch_with(&daemon, &invoker, project_dir, query)
    }

    fn dispatch_with(
        &self,
        daemon: &dyn Supervisor,
        invoker: &dyn Invoke,
        project_dir: &Path,
        query: &Query,
    ) -> QueryResult {
        let budget = if daemon.is_live() {
            debug!(command = query.command.as_str(), "daemon live, fast path");
            self.daemon_timeout
        } else if daemon.ensure_live() {
            debug!(command = query.command.as_str(), "daemon started, fast path");
            self.daemon_timeout
        } else {
            // Launch failure is not an error by itself; the same query
            // runs cold with the long budget.
            debug!(command = query.command.as_str(), "daemon unavailable, cold fallback");
            self.fallback_timeout
        };

        let argv = query.to_argv(project_dir);
        match invoker.invoke(&argv, budget) {
            Ok(output) => QueryResult::ok(output),
            Err(err) => QueryResult::failed(err.kind(), err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::io;

    use super::*;
    use crate::error::{ErrorKind, InvokeError};
    use crate::types::QueryCommand;

    struct FakeDaemon {
        live: bool,
        launch_succeeds: bool,
        launches: Cell<u32>,
    }

    impl FakeDaemon {
        fn live() -> Self {
            Self {
                live: true,
                launch_succeeds: false,
                launches: Cell::new(0),
            }
        }

        fn dead(launch_succeeds: bool) -> Self {
            Self {
                live: false,
                launch_succeeds,
                launches: Cell::new(0),
            }
        }
    }

    impl Supervisor for FakeDaemon {
        fn is_live(&self) -> bool {
            self.live
        }

        fn ensure_live(&self) -> bool {
            self.launches.set(self.launches.get() + 1);
            self.launch_succeeds
        }
    }

    struct RecordingInvoker {
        calls: RefCell<Vec<(Vec<String>, Duration)>>,
        response: fn() -> Result<String, InvokeError>,
    }

    impl RecordingInvoker {
        fn ok() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                response: || Ok("line one\nline two".to_string()),
            }
        }

        fn timing_out() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                response: || {
                    Err(InvokeError::Timeout {
                        tool: "tldr".to_string(),
                        budget: DAEMON_TIMEOUT,
                    })
                },
            }
        }

        fn spawn_failing() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                response: || {
                    Err(InvokeError::Spawn {
                        tool: "tldr".to_string(),
                        source: io::Error::from(io::ErrorKind::NotFound),
                    })
                },
            }
        }
    }

    impl Invoke for RecordingInvoker {
        fn invoke(&self, argv: &[String], budget: Duration) -> Result<String, InvokeError> {
            self.calls.borrow_mut().push((argv.to_vec(), budget));
            (self.response)()
        }
    }

    fn impact_query() -> Query {
        Query::new(QueryCommand::Impact).arg("parseConfig")
    }

    #[test]
    fn live_daemon_gets_short_budget_and_no_launch() {
        let dispatcher = QueryDispatcher::new();
        let daemon = FakeDaemon::live();
        let invoker = RecordingInvoker::ok();

        let result =
            dispatcher.dispatch_with(&daemon, &invoker, Path::new("/p"), &impact_query());

        assert!(result.success);
        assert_eq!(daemon.launches.get(), 0);
        let calls = invoker.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, DAEMON_TIMEOUT);
    }

    #[test]
    fn successful_launch_also_takes_the_fast_path() {
        let dispatcher = QueryDispatcher::new();
        let daemon = FakeDaemon::dead(true);
        let invoker = RecordingInvoker::ok();

        dispatcher.dispatch_with(&daemon, &invoker, Path::new("/p"), &impact_query());

        assert_eq!(daemon.launches.get(), 1);
        assert_eq!(invoker.calls.borrow()[0].1, DAEMON_TIMEOUT);
    }

    #[test]
    fn dead_daemon_falls_back_with_long_budget_and_same_argv() {
        let dispatcher = QueryDispatcher::new();
        let daemon = FakeDaemon::dead(false);
        let invoker = RecordingInvoker::ok();

        let result =
            dispatcher.dispatch_with(&daemon, &invoker, Path::new("/p"), &impact_query());

        assert!(result.success);
        assert_eq!(daemon.launches.get(), 1);
        let calls = invoker.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, FALLBACK_TIMEOUT);
        assert_eq!(
            calls[0].0,
            vec!["impact", "parseConfig", "--project", "/p"]
        );
    }

    #[test]
    fn daemon_path_failure_does_not_retry_cold() {
        let dispatcher = QueryDispatcher::new();
        let daemon = FakeDaemon::live();
        let invoker = RecordingInvoker::timing_out();

        let result =
            dispatcher.dispatch_with(&daemon, &invoker, Path::new("/p"), &impact_query());

        assert!(!result.success);
        assert_eq!(result.error_kind, Some(ErrorKind::Timeout));
        // Exactly one invocation: no silent fallback after a fast-path
        // failure.
        assert_eq!(invoker.calls.borrow().len(), 1);
    }

    #[test]
    fn failure_shape_holds_for_spawn_errors() {
        let dispatcher = QueryDispatcher::new();
        let daemon = FakeDaemon::dead(false);
        let invoker = RecordingInvoker::spawn_failing();

        let result =
            dispatcher.dispatch_with(&daemon, &invoker, Path::new("/p"), &impact_query());

        assert!(!result.success);
        assert!(result.output.is_empty());
        assert!(result.summary.is_none());
        assert!(!result.error.as_deref().unwrap_or("").is_empty());
        assert_eq!(result.error_kind, Some(ErrorKind::Spawn));
    }

    #[test]
    fn success_result_summarizes_output() {
        let dispatcher = QueryDispatcher::new();
        let daemon = FakeDaemon::live();
        let invoker = RecordingInvoker::ok();

        let result =
            dispatcher.dispatch_with(&daemon, &invoker, Path::new("/p"), &impact_query());

        assert_eq!(result.output, "line one\nline two");
        assert_eq!(result.summary.as_deref(), Some("line one\nline two"));
        assert!(result.error.is_none());
    }
}
