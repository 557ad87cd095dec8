//! Locating where a new upstream commit belongs in a sorted series.
//!
//! Used to expand a patch queue up to the right position before importing a
//! backport, e.g. with `sequence-patch.sh $(git-sort insert <commit>)`.

use std::path::Path;

use crate::classify::{parse_inside, InputEntry};
use crate::config::Remotes;
use crate::error::{Error, Result};
use crate::head::Head;
use crate::index::CommitIndex;
use crate::patch::PatchTags;
use crate::series::{patch_names, split};
use crate::sort::series_sort;

const MARKER: &str = "# new commit";

/// Where a new commit goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    /// The patch the commit goes after; empty when it goes first.
    pub name: String,
    /// Signed distance from the top applied patch to the insertion point.
    /// With nothing applied, the distance is counted from before the first
    /// patch.
    pub delta: i64,
}

/// Find where `commit`, a full commit id, belongs in `series`.
///
/// `top` is the topmost applied patch, `None` when nothing is applied. The
/// series must already be sorted.
pub fn locate(
    series: &[String],
    commit: &str,
    top: Option<&str>,
    index: &dyn CommitIndex,
    remotes: &Remotes,
    patch_dir: &Path,
) -> Result<Insertion> {
    if index.lookup(commit).is_none() {
        return Err(Error::structural(format!(
            "Commit {} not found in git-sort index. If it is from a repository and branch \
             pair which is not listed in the remotes list, please add it.",
            commit
        )));
    }
    let new_entry = InputEntry::from_tags(
        MARKER,
        &PatchTags::upstream(commit),
        &Head::OutOfTree,
        index,
        remotes,
        true,
    )?;

    let parts = split(series).map_err(|e| e.into_structural())?;
    let before = patch_names(&parts.before);
    let after = patch_names(&parts.after);
    let current: Vec<String> = before
        .iter()
        .chain(patch_names(&parts.inside).iter())
        .chain(after.iter())
        .cloned()
        .collect();

    // Nothing applied sits just before the first patch.
    let top_pos: i64 = match top {
        None => -1,
        Some(top) => current.iter().position(|n| n == top).ok_or_else(|| {
            Error::structural(format!("Patch \"{}\" is not in the series.", top))
        })? as i64,
    };

    let mut entries = parse_inside(index, remotes, &parts.inside, patch_dir, false)?;
    entries.push(new_entry);
    let sorted = series_sort(index, remotes, entries)?;

    let mut new_order: Vec<String> = before
        .into_iter()
        .chain(sorted.names())
        .chain(after)
        .collect();
    let commit_pos = new_order
        .iter()
        .position(|n| n == MARKER)
        .ok_or_else(|| Error::structural("The new commit was lost while sorting."))?;
    let name = match commit_pos {
        0 => String::new(),
        pos => new_order[pos - 1].clone(),
    };
    new_order.remove(commit_pos);

    if new_order != current {
        return Err(Error::structural(
            "Subseries is not sorted. Please run `git-sort sort` first.",
        ));
    }

    Ok(Insertion {
        name,
        delta: commit_pos as i64 - top_pos,
    })
}
