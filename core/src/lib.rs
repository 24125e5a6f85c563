//! tldr-hooks core - daemon-client adapter for the tldr analysis tool
//!
//! This crate provides:
//! - Query and result types shared by the hook and CLI
//! - Socket-path derivation for the per-project daemon
//! - Daemon liveness probing and detached auto-start
//! - Dual-path query dispatch (warm daemon vs. cold fallback) with hard
//!   timeouts
//! - Deterministic summarization of tool output

pub mod client;
pub mod daemon;
pub mod dispatch;
pub mod error;
pub mod invoke;
pub mod socket;
pub mod summary;
pub mod types;

pub use client::{detect_dead_code, get_context, get_impact, semantic_search, warm};
pub use daemon::DaemonHandle;
pub use dispatch::{QueryDispatcher, DAEMON_TIMEOUT, DEFAULT_TOOL, FALLBACK_TIMEOUT};
pub use error::{ErrorKind, InvokeError};
pub use invoke::SubprocessInvoker;
pub use socket::{socket_path, socket_path_in};
pub use summary::summarize;
pub use types::{Query, QueryCommand, QueryResult};

/// Re-export commonly used items
pub mod prelude {
    pub use crate::dispatch::QueryDispatcher;
    pub use crate::error::{ErrorKind, InvokeError};
    pub use crate::socket::socket_path;
    pub use crate::types::{Query, QueryCommand, QueryResult};
}
