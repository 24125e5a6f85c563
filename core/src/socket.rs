//! Socket-path derivation for the tldr daemon
//!
//! Each project directory gets its own daemon, addressed through a
//! rendezvous file under the system temp directory. The path is derived
//! from a content hash of the directory string, so every process that
//! names the same project reaches the same daemon, across restarts.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Hex characters of the project hash kept in the socket name.
const HASH_PREFIX_LEN: usize = 8;

/// Resolve the daemon socket path for a project directory.
///
/// Deterministic: equal directory strings always yield an equal path,
/// with no dependence on time or per-process state. Distinct directories
/// colliding on the 8-char prefix is accepted as negligible for a local
/// temp-namespace convention.
pub fn socket_path(project_dir: &Path) -> PathBuf {
    socket_path_in(&std::env::temp_dir(), project_dir)
}

/// Resolve the socket path under an explicit base directory.
///
/// The production resolver uses the system temp dir; tests point this at
/// a scratch directory instead.
pub fn socket_path_in(base: &Path, project_dir: &Path) -> PathBuf {
    let digest = Sha256::digest(project_dir.display().to_string().as_bytes());
    let hash = hex::encode(&digest[..]);
    base.join(format!("tldr-daemon-{}.sock", &hash[..HASH_PREFIX_LEN]))
}
