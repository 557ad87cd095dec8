//! Git merge driver for `series.conf`.
//!
//! Registered as a git mergetool:
//!
//! ```text
//! [mergetool "git-sort"]
//! 	cmd = git-sort merge-tool $LOCAL $BASE $REMOTE $MERGED
//! 	trustExitCode = true
//! ```
//!
//! The reconciled snapshots are written out and `merge` (from RCS) is run
//! on them, so that conflicts outside the sorted section still get conflict
//! markers.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use crate::config::Remotes;
use crate::error::{Error, Result};
use crate::index::CommitIndex;
use crate::series::lines_of;

use super::{reconcile, Reconciled};

/// Three-way merge tool invoked on the spliced snapshots.
pub const MERGE_COMMAND: &str = "merge";

/// The files git hands to a mergetool.
#[derive(Debug, Clone)]
pub struct MergePaths {
    pub local: PathBuf,
    pub base: PathBuf,
    pub remote: PathBuf,
    pub merged: PathBuf,
}

/// Result of running the merge driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    Clean,
    /// `merge` left conflict markers; a copy of the merged file was kept.
    Conflicts { kept: PathBuf },
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    Ok(lines_of(&fs::read_to_string(path)?))
}

fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    fs::write(path, lines.concat())?;
    Ok(())
}

/// Run `merge MERGED BASE REMOTE`. Returns whether it merged cleanly.
pub fn run_merge(merged: &Path, base: &Path, remote: &Path) -> Result<bool> {
    debug!(
        "Running {} {} {} {}",
        MERGE_COMMAND,
        merged.display(),
        base.display(),
        remote.display()
    );
    let status = Command::new(MERGE_COMMAND)
        .arg(merged)
        .arg(base)
        .arg(remote)
        .status()
        .map_err(|e| Error::MergeTool {
            command: MERGE_COMMAND.to_string(),
            message: if e.kind() == ErrorKind::NotFound {
                format!(
                    "could not run `{}`. Please make sure it is installed (from the \"rcs\" package).",
                    MERGE_COMMAND
                )
            } else {
                e.to_string()
            },
        })?;
    Ok(status.success())
}

/// Reconcile the sorted sections, write the three spliced snapshots and
/// merge the rest of the file.
///
/// Returns the reconciliation, so that the caller can update patch tags,
/// together with the outcome of the textual merge.
pub fn merge_series(
    index: &dyn CommitIndex,
    remotes: &Remotes,
    paths: &MergePaths,
    patch_dir: &Path,
) -> Result<(Reconciled, MergeOutcome)> {
    let reconciled = reconcile(
        index,
        remotes,
        &read_lines(&paths.local)?,
        &read_lines(&paths.base)?,
        &read_lines(&paths.remote)?,
        patch_dir,
    )?;

    write_lines(&paths.merged, &reconciled.local)?;
    write_lines(&paths.base, &reconciled.base)?;
    write_lines(&paths.remote, &reconciled.remote)?;

    if run_merge(&paths.merged, &paths.base, &paths.remote)? {
        return Ok((reconciled, MergeOutcome::Clean));
    }

    let mut kept = paths.merged.clone().into_os_string();
    kept.push(format!(".merged{}", std::process::id()));
    let kept = PathBuf::from(kept);
    debug!("Keeping conflicted result in {}", kept.display());
    fs::copy(&paths.merged, &kept)?;
    Ok((reconciled, MergeOutcome::Conflicts { kept }))
}
