//! Rewriting of `Git-repo` and `Patch-mainline` tags after a patch moved
//! to another head.

use std::path::Path;

use log::{debug, info};

use crate::classify::InputEntry;
use crate::config::Remotes;
use crate::error::{Error, Result};
use crate::index::CommitIndex;
use crate::patch::{PatchFile, TagStore, GIT_REPO, PATCH_MAINLINE};

/// Whether the tags of `entry` have to be rewritten.
pub fn tag_needs_update(entry: &InputEntry) -> bool {
    entry.needs_tag_update()
}

/// Apply the destination of `entry` to the tags in `store`.
///
/// A patch moved to mainline gets a `Patch-mainline` tag naming the release
/// that contains its commit and loses its `Git-repo` tag; any other head is
/// recorded in `Git-repo`.
pub fn retag(
    store: &mut impl TagStore,
    entry: &InputEntry,
    index: &dyn CommitIndex,
    remotes: &Remotes,
) -> Result<()> {
    let class = &entry.class;
    if class.dest_head == *remotes.mainline() {
        let ordinal = class.ordinal.ok_or_else(|| {
            Error::structural(format!(
                "Patch \"{}\" moved to mainline without a commit position.",
                entry.name
            ))
        })?;
        let release = index.describe(ordinal)?;
        debug!("{}: {} -> {}", entry.name, PATCH_MAINLINE, release);
        store.change(PATCH_MAINLINE, &release).map_err(|e| missing(e, entry, PATCH_MAINLINE))?;
        store.remove(GIT_REPO);
    } else if let Some(url) = &class.new_url {
        debug!("{}: {} -> {}", entry.name, GIT_REPO, url.full());
        store.change(GIT_REPO, url.full()).map_err(|e| missing(e, entry, GIT_REPO))?;
    }
    Ok(())
}

fn missing(err: Error, entry: &InputEntry, tag: &str) -> Error {
    if err.is_not_found() {
        Error::structural(format!(
            "Failed to update tag \"{}\" in patch \"{}\". This tag is not found.",
            tag, entry.name
        ))
    } else {
        err
    }
}

/// Rewrite the tags of every entry that needs it.
///
/// All entries are attempted; failures are reported together afterward.
/// Patches already rewritten stay rewritten. Returns the names of the
/// patches that were changed.
pub fn update_tags(
    index: &dyn CommitIndex,
    remotes: &Remotes,
    entries: &[InputEntry],
    patch_dir: &Path,
) -> Result<Vec<String>> {
    let mut updated = Vec::new();
    let mut failures = Vec::new();

    for entry in entries.iter().filter(|e| tag_needs_update(e)) {
        let result = PatchFile::open(patch_dir.join(&entry.name)).and_then(|mut patch| {
            retag(&mut patch, entry, index, remotes)?;
            patch.save()
        });
        match result {
            Ok(()) => updated.push(entry.name.clone()),
            Err(e) => failures.push(e.to_string()),
        }
    }

    if !updated.is_empty() {
        info!("Updated tags of {} patches.", updated.len());
    }
    if failures.is_empty() {
        Ok(updated)
    } else {
        Err(Error::TagUpdate { failures })
    }
}
