//! Calls to the system `git` command.
//!
//! Everything git-sort needs from a repository is answered by the commit
//! index, except turning a user supplied revision into a commit id and
//! staging rewritten patches after a merge.

use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use crate::error::{Error, Result};

fn full_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9a-fA-F]{40}$").expect("valid regex"))
}

/// Whether `rev` already is a full commit id.
pub fn is_full_commit_id(rev: &str) -> bool {
    full_id_regex().is_match(rev)
}

/// Resolve `rev` to a full commit id in the repository at `git_dir`.
///
/// Full commit ids are returned as-is (lower-cased) without running git.
pub fn resolve_revision(git_dir: &Path, rev: &str) -> Result<String> {
    if is_full_commit_id(rev) {
        return Ok(rev.to_ascii_lowercase());
    }

    let spec = format!("{}^{{commit}}", rev);
    debug!("Resolving {} in {}", spec, git_dir.display());
    let output = Command::new("git")
        .arg("--git-dir")
        .arg(git_dir)
        .args(["rev-parse", "--verify", "--quiet", &spec])
        .output()
        .map_err(|e| Error::GitCommand {
            command: format!("git rev-parse --verify {}", spec),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::Revision {
            rev: rev.to_string(),
            message: format!("not found in \"{}\"", git_dir.display()),
        });
    }

    let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !is_full_commit_id(&id) {
        return Err(Error::Revision {
            rev: rev.to_string(),
            message: format!("git returned \"{}\"", id),
        });
    }
    Ok(id)
}

/// Stage `paths` with `git add`, run from the current directory.
pub fn stage<P: AsRef<Path>>(paths: &[P]) -> Result<()> {
    if paths.is_empty() {
        return Ok(());
    }

    let output = Command::new("git")
        .arg("add")
        .arg("--")
        .args(paths.iter().map(|p| p.as_ref().as_os_str()))
        .output()
        .map_err(|e| Error::GitCommand {
            command: "git add".to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command: "git add".to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}
