//! End-to-end dispatch against a scripted stand-in for the tldr tool.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};

use tldr_hooks_core::{socket_path_in, Query, QueryCommand, QueryDispatcher};

/// Write an executable script that echoes its argv and eats the
/// `daemon start` subcommand.
fn fake_tool(dir: &Path) -> PathBuf {
    let path = dir.join("fake-tldr");
    fs::write(
        &path,
        "#!/bin/sh\n\
         if [ \"$1\" = \"daemon\" ]; then exit 0; fi\n\
         echo \"ran: $*\"\n",
    )
    .unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

#[test]
fn cold_fallback_runs_the_tool_once_with_full_argv() {
    let dir = tempfile::tempdir().unwrap();
    let tool = fake_tool(dir.path());

    // No daemon ever comes up: the launch subcommand exits without
    // binding the socket, so dispatch takes the cold path.
    let dispatcher = QueryDispatcher::with_tool(&tool).with_socket_base(dir.path());
    let query = Query::new(QueryCommand::Context).arg("main");
    let result = dispatcher.dispatch(Path::new("/work/proj"), &query);

    assert!(result.success, "error: {:?}", result.error);
    assert_eq!(result.output, "ran: context main --project /work/proj\n");
    assert_eq!(
        result.summary.as_deref(),
        Some("ran: context main --project /work/proj")
    );
}

#[test]
fn live_daemon_path_succeeds_without_a_launch() {
    let dir = tempfile::tempdir().unwrap();
    let tool = fake_tool(dir.path());

    let project = Path::new("/work/proj");
    let _listener = UnixListener::bind(socket_path_in(dir.path(), project)).unwrap();

    let dispatcher = QueryDispatcher::with_tool(&tool).with_socket_base(dir.path());
    let result = dispatcher.dispatch(project, &Query::new(QueryCommand::Dead));

    assert!(result.success);
    assert_eq!(result.output, "ran: dead --project /work/proj\n");
}
