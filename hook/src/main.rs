//! tldr hook - context injection for hook hosts
//!
//! One binary serves the three hook events the host fires:
//! 1. Session start: warm the daemon so later queries hit hot indexes
//! 2. Prompt submit: semantic search over the prompt, inject the summary
//! 3. Post-edit: impact analysis for the edited file, inject the summary
//!
//! Failure policy: any `success:false` result means "no context
//! available" and the hook exits 0 with no output. The host operation is
//! never aborted from here.

use std::env;
use std::io::{self, Read};
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{json, Value};

use tldr_hooks_core::{QueryDispatcher, QueryResult};

// ============================================================================
// HOOK INPUT PARSING
// ============================================================================

/// Only the fields the adapter touches; everything else in the host's
/// payload is ignored.
#[derive(Debug, Deserialize)]
struct HookInput {
    hook_event_name: Option<String>,
    prompt: Option<String>,
    tool_name: Option<String>,
    tool_input: Option<Value>,
    cwd: Option<String>,
}

impl HookInput {
    fn edited_file(&self) -> Option<String> {
        self.tool_input
            .as_ref()?
            .get("file_path")?
            .as_str()
            .map(|s| s.to_string())
    }
}

// ============================================================================
// PROJECT ROOT DETECTION
// ============================================================================

fn find_project_root(start_path: Option<PathBuf>) -> Option<PathBuf> {
    let mut current = start_path.or_else(|| env::current_dir().ok())?;

    loop {
        if current.join(".git").exists() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

// ============================================================================
// CONTEXT OUTPUT
// ============================================================================

/// Print the host's context-injection payload for a successful result.
fn emit_context(event_name: &str, result: &QueryResult) {
    let context = result.summary.as_deref().unwrap_or(&result.output);
    if context.is_empty() {
        return;
    }
    let payload = json!({
        "hookSpecificOutput": {
            "hookEventName": event_name,
            "additionalContext": context,
        }
    });
    println!("{payload}");
}

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    let mut input = String::new();
    if io::stdin().read_to_string(&mut input).is_err() {
        std::process::exit(0);
    }
    if input.trim().is_empty() {
        std::process::exit(0);
    }

    let hook: HookInput = match serde_json::from_str(&input) {
        Ok(h) => h,
        Err(_) => std::process::exit(0),
    };

    let start_path = hook.cwd.as_ref().map(PathBuf::from);
    let project_root = match find_project_root(start_path) {
        Some(p) => p,
        None => std::process::exit(0), // Not inside a project
    };

    let dispatcher = QueryDispatcher::new();
    let event_name = hook.hook_event_name.as_deref().unwrap_or("");

    match event_name {
        "SessionStart" => {
            // Prime the indexes; nothing to inject yet.
            let _ = dispatcher.warm(&project_root);
        }
        "UserPromptSubmit" => {
            let prompt = hook.prompt.as_deref().unwrap_or("").trim();
            if prompt.is_empty() {
                std::process::exit(0);
            }
            let result = dispatcher.semantic_search(&project_root, prompt);
            if result.success {
                emit_context(event_name, &result);
            }
        }
        "PostToolUse" => {
            // Only edits carry a file worth analyzing.
            let is_edit = matches!(hook.tool_name.as_deref(), Some("Edit") | Some("Write"));
            let file = match (is_edit, hook.edited_file()) {
                (true, Some(file)) => file,
                _ => std::process::exit(0),
            };
            let result = dispatcher.get_impact(&project_root, &file);
            if result.success {
                emit_context(event_name, &result);
            }
        }
        _ => {}
    }

    std::process::exit(0);
}
