//! # Three-Way Reconciliation of Series Files
//!
//! When two branches both changed `series.conf`, textual merging of the
//! sorted section conflicts constantly even though the result is fully
//! determined: the union of the changes, sorted. [`reconcile`] computes that
//! result from the local, base and remote snapshots:
//!
//! - patches added from base to remote are classified and sorted into the
//!   local series;
//! - patches removed from base to remote are dropped from it;
//! - patches that changed section from base to remote are reclassified.
//!
//! The rendered interior is then spliced into all three snapshots so that a
//! regular line-based merge (see [`driver`]) only has to deal with the lines
//! outside the sorted section.

pub mod driver;

use std::path::Path;

use log::{info, warn};

use crate::classify::{parse_inside, InputEntry};
use crate::config::Remotes;
use crate::error::Result;
use crate::head::Head;
use crate::index::CommitIndex;
use crate::ordered_set::OrderedSet;
use crate::series::{
    first_word, is_patch_line, list_moved_patches, series_footer, series_header, split,
    SplitSeries,
};
use crate::sort::{series_format, series_sort};

/// A series snapshot split around its sortable interior, with the set of
/// patch names of the interior.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub split: SplitSeries,
    pub names: OrderedSet,
}

impl Snapshot {
    /// Split `lines` at the sorted section markers.
    pub fn new(lines: &[String]) -> Result<Self> {
        let split = split(lines).map_err(|e| e.into_structural())?;
        let names = split
            .inside
            .iter()
            .filter(|l| is_patch_line(l))
            .filter_map(|l| first_word(l))
            .collect();
        Ok(Self { split, names })
    }

    /// The snapshot with its interior replaced by `inside`, keeping the
    /// interior's own header and footer lines.
    pub fn splice(&self, inside: &[String], remotes: &Remotes) -> Result<Vec<String>> {
        let mut out = self.split.before.clone();
        out.extend(series_header(&self.split.inside, remotes)?);
        out.extend_from_slice(inside);
        out.extend(series_footer(&self.split.inside, remotes)?);
        out.extend_from_slice(&self.split.after);
        Ok(out)
    }
}

/// Outcome of a three-way reconciliation.
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub local: Vec<String>,
    pub base: Vec<String>,
    pub remote: Vec<String>,
    /// Entries of the merged interior; used to update tags afterward.
    pub entries: Vec<InputEntry>,
}

/// Merge the sorted sections of three series snapshots.
pub fn reconcile(
    index: &dyn CommitIndex,
    remotes: &Remotes,
    local: &[String],
    base: &[String],
    remote: &[String],
    patch_dir: &Path,
) -> Result<Reconciled> {
    let local = Snapshot::new(local)?;
    let base = Snapshot::new(base)?;
    let remote = Snapshot::new(remote)?;

    let added = remote.names.difference(&base.names);
    let removed = base.names.difference(&remote.names);
    let moved: OrderedSet =
        list_moved_patches(&base.split.inside, &remote.split.inside, remotes)?
            .into_iter()
            .collect();

    if !added.is_empty() || !removed.is_empty() {
        info!(
            "{} commits added, {} commits removed from base to remote.",
            added.len(),
            removed.len()
        );
    }
    if !moved.is_empty() {
        info!("{} commits changed section from base to remote.", moved.len());
    }

    let dup_added = local.names.intersection(&added).len();
    let dup_removed = removed.len() - local.names.intersection(&removed).len();
    if dup_added > 0 {
        warn!(
            "{} commits added in remote and already present in local, ignoring.",
            dup_added
        );
    }
    if dup_removed > 0 {
        warn!(
            "{} commits removed in remote but not present in local, ignoring.",
            dup_removed
        );
    }

    let dropped = removed.union(&moved);
    let inside: Vec<String> = local
        .split
        .inside
        .iter()
        .filter(|l| !first_word(l).is_some_and(|name| dropped.contains(name)))
        .cloned()
        .collect();

    let mut entries = parse_inside(index, remotes, &inside, patch_dir, false)?;
    for name in added.difference(&local.names).union(&moved).iter() {
        entries.push(InputEntry::from_patch(
            name,
            patch_dir,
            &Head::OutOfTree,
            index,
            remotes,
            true,
        )?);
    }

    let sorted = series_sort(index, remotes, entries)?;
    let output = series_format(&sorted, remotes);
    let entries = sorted.entries().cloned().collect();

    Ok(Reconciled {
        local: local.splice(&output, remotes)?,
        base: base.splice(&output, remotes)?,
        remote: remote.splice(&output, remotes)?,
        entries,
    })
}
