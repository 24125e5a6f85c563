//! Error types for the tldr adapter

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure raised while invoking the external `tldr` tool.
///
/// Every variant is caught at the invocation site and folded into a
/// `QueryResult{success: false}`; nothing here escapes to the hook host.
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("failed to spawn `{tool}`: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{tool}` exited with {status}: {stderr}")]
    NonZeroExit {
        tool: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("`{tool}` timed out after {}ms", .budget.as_millis())]
    Timeout { tool: String, budget: Duration },

    #[error("failed to read `{tool}` output: {source}")]
    Io {
        tool: String,
        #[source]
        source: std::io::Error,
    },
}

impl InvokeError {
    /// Classify this failure for callers that branch on kind rather than
    /// parsing message text.
    pub fn kind(&self) -> ErrorKind {
        match self {
            InvokeError::Spawn { .. } => ErrorKind::Spawn,
            InvokeError::NonZeroExit { .. } => ErrorKind::Exit,
            InvokeError::Timeout { .. } => ErrorKind::Timeout,
            InvokeError::Io { .. } => ErrorKind::Io,
        }
    }
}

/// Machine-readable failure class carried on failed results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Tool or daemon binary could not be started at all.
    Spawn,
    /// Tool ran but reported failure via a non-zero exit code.
    Exit,
    /// Tool exceeded the active timeout budget and was killed.
    Timeout,
    /// Tool output could not be collected.
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Spawn => "spawn",
            ErrorKind::Exit => "exit",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Io => "io",
        }
    }
}
