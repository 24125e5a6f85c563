//! Core data types for the tldr adapter
//!
//! These types are shared between the hook, the CLI, and any other caller
//! of the adapter. A `Query` is built once, dispatched once, and the
//! caller consumes the returned `QueryResult`; nothing here is cached.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::summary::summarize;

/// Analysis operations the tldr tool supports.
///
/// A closed enumeration rather than a free string, so the call sites that
/// build queries get exhaustiveness checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryCommand {
    /// Prime the daemon's indexes for a project.
    Warm,
    /// Structured context for a symbol (signature, callers, callees).
    Context,
    /// Semantic search over the indexed codebase.
    Semantic,
    /// Change-impact analysis for a symbol.
    Impact,
    /// Program slice for a variable or expression.
    Slice,
    /// Control-flow graph for a function.
    Cfg,
    /// Dead-code detection across the project.
    Dead,
}

impl QueryCommand {
    /// Return the subcommand token passed to the tool.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryCommand::Warm => "warm",
            QueryCommand::Context => "context",
            QueryCommand::Semantic => "semantic",
            QueryCommand::Impact => "impact",
            QueryCommand::Slice => "slice",
            QueryCommand::Cfg => "cfg",
            QueryCommand::Dead => "dead",
        }
    }
}

/// A single analysis query, immutable once built.
///
/// # Fields
/// - `command`: Analysis operation to run.
/// - `args`: Positional arguments, order-significant.
/// - `language`: Optional language filter passed as `--language`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    pub command: QueryCommand,
    pub args: Vec<String>,
    pub language: Option<String>,
}

impl Query {
    /// Create a query with no positional arguments.
    pub fn new(command: QueryCommand) -> Self {
        Self {
            command,
            args: Vec::new(),
            language: None,
        }
    }

    /// Append a positional argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set the language filter.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Build the argument vector for a tool invocation:
    /// `[command, ...args, (--language <l>)?, --project <dir>]`.
    ///
    /// The same vector is used on the daemon path and the fallback path;
    /// only the timeout budget differs.
    pub fn to_argv(&self, project_dir: &Path) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 5);
        argv.push(self.command.as_str().to_string());
        argv.extend(self.args.iter().cloned());
        if let Some(language) = &self.language {
            argv.push("--language".to_string());
            argv.push(language.clone());
        }
        argv.push("--project".to_string());
        argv.push(project_dir.display().to_string());
        argv
    }
}

/// Outcome of one dispatched query.
///
/// Shape invariant, enforced by the two constructors:
/// - `success == true` implies `error` and `error_kind` are absent and
///   `output` is the verbatim tool stdout (possibly empty).
/// - `success == false` implies `output` is empty and `error` is a
///   non-empty human-readable diagnostic.
/// - `summary` is present only on success and is a pure function of
///   `output`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub success: bool,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl QueryResult {
    /// Successful result carrying the verbatim tool output.
    pub fn ok(output: String) -> Self {
        let summary = summarize(&output);
        Self {
            success: true,
            output,
            summary: Some(summary),
            error: None,
            error_kind: None,
        }
    }

    /// Failed result. The message text is carried verbatim; the kind lets
    /// callers branch without parsing it.
    pub fn failed(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        debug_assert!(!message.is_empty());
        Self {
            success: false,
            output: String::new(),
            summary: None,
            error: Some(message),
            error_kind: Some(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn impact_argv_without_language() {
        let query = Query::new(QueryCommand::Impact).arg("parseConfig");
        let argv = query.to_argv(Path::new("/work/proj"));
        assert_eq!(argv, vec!["impact", "parseConfig", "--project", "/work/proj"]);
    }

    #[test]
    fn language_token_sits_between_args_and_project() {
        let query = Query::new(QueryCommand::Context)
            .arg("main")
            .language("rust");
        let argv = query.to_argv(Path::new("/work/proj"));
        assert_eq!(
            argv,
            vec!["context", "main", "--language", "rust", "--project", "/work/proj"]
        );
    }

    #[test]
    fn positional_args_keep_caller_order() {
        let query = Query::new(QueryCommand::Slice).arg("foo.rs:42").arg("x");
        let argv = query.to_argv(Path::new("/p"));
        assert_eq!(argv, vec!["slice", "foo.rs:42", "x", "--project", "/p"]);
    }

    #[test]
    fn ok_result_carries_summary_and_no_error() {
        let result = QueryResult::ok("hello".to_string());
        assert!(result.success);
        assert_eq!(result.output, "hello");
        assert_eq!(result.summary.as_deref(), Some("hello"));
        assert!(result.error.is_none());
        assert!(result.error_kind.is_none());
    }

    #[test]
    fn failed_result_has_empty_output_and_nonempty_error() {
        let result = QueryResult::failed(ErrorKind::Timeout, "tldr timed out");
        assert!(!result.success);
        assert!(result.output.is_empty());
        assert!(result.summary.is_none());
        assert_eq!(result.error.as_deref(), Some("tldr timed out"));
        assert_eq!(result.error_kind, Some(ErrorKind::Timeout));
    }

    #[test]
    fn error_kind_serializes_lowercase() {
        let result = QueryResult::failed(ErrorKind::Spawn, "no such binary");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error_kind"], "spawn");
        assert_eq!(json["success"], false);
        assert!(json.get("summary").is_none());
    }
}
