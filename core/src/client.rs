//! Convenience query surface for hook collaborators
//!
//! Thin mappings from the operations hooks actually perform to `Query`
//! values, dispatched with the default configuration. Each call is
//! self-contained; nothing is cached between invocations.

use std::path::Path;

use crate::dispatch::QueryDispatcher;
use crate::types::{Query, QueryCommand, QueryResult};

impl QueryDispatcher {
    /// Prime the daemon's indexes for a project.
    pub fn warm(&self, project_dir: &Path) -> QueryResult {
        self.dispatch(project_dir, &Query::new(QueryCommand::Warm))
    }

    /// Structured context for a symbol.
    pub fn get_context(&self, project_dir: &Path, symbol: &str) -> QueryResult {
        self.dispatch(project_dir, &Query::new(QueryCommand::Context).arg(symbol))
    }

    /// Semantic search over the indexed codebase.
    pub fn semantic_search(&self, project_dir: &Path, query_text: &str) -> QueryResult {
        self.dispatch(
            project_dir,
            &Query::new(QueryCommand::Semantic).arg(query_text),
        )
    }

    /// Dead-code detection across the project.
    pub fn detect_dead_code(&self, project_dir: &Path) -> QueryResult {
        self.dispatch(project_dir, &Query::new(QueryCommand::Dead))
    }

    /// Change-impact analysis for a symbol.
    pub fn get_impact(&self, project_dir: &Path, symbol: &str) -> QueryResult {
        self.dispatch(project_dir, &Query::new(QueryCommand::Impact).arg(symbol))
    }
}

/// Prime the daemon for a project with the default dispatcher.
pub fn warm(project_dir: &Path) -> QueryResult {
    QueryDispatcher::new().warm(project_dir)
}

/// Fetch symbol context with the default dispatcher.
pub fn get_context(project_dir: &Path, symbol: &str) -> QueryResult {
    QueryDispatcher::new().get_context(project_dir, symbol)
}

/// Run a semantic search with the default dispatcher.
pub fn semantic_search(project_dir: &Path, query_text: &str) -> QueryResult {
    QueryDispatcher::new().semantic_search(project_dir, query_text)
}

/// Detect dead code with the default dispatcher.
pub fn detect_dead_code(project_dir: &Path) -> QueryResult {
    QueryDispatcher::new().detect_dead_code(project_dir)
}

/// Fetch impact analysis with the default dispatcher.
pub fn get_impact(project_dir: &Path, symbol: &str) -> QueryResult {
    QueryDispatcher::new().get_impact(project_dir, symbol)
}
