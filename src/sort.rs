//! # Section Grouping, Sorting and Rendering
//!
//! Classified entries are grouped into one section per head. Sections of
//! indexed heads are sorted by ordinal; the others keep the order the
//! entries came in, since nothing is known about their upstream position.

use std::path::Path;

use crate::classify::{parse_inside, InputEntry};
use crate::config::Remotes;
use crate::error::{Error, Result};
use crate::head::Head;
use crate::index::CommitIndex;
use crate::series::{series_footer, series_header};

/// Entries grouped by destination head, in head order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortedSeries {
    pub sections: Vec<(Head, Vec<InputEntry>)>,
}

impl SortedSeries {
    /// Entries of all sections, in output order.
    pub fn entries(&self) -> impl Iterator<Item = &InputEntry> {
        self.sections.iter().flat_map(|(_, entries)| entries.iter())
    }

    /// Patch names of all sections, in output order.
    pub fn names(&self) -> Vec<String> {
        self.entries().map(|e| e.name.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Group `entries` by destination head and sort each indexed section.
pub fn series_sort(
    index: &dyn CommitIndex,
    remotes: &Remotes,
    entries: Vec<InputEntry>,
) -> Result<SortedSeries> {
    let repo_heads = index.repo_heads();
    let mainline = remotes.mainline();
    if !repo_heads.contains(mainline) {
        return Err(Error::MissingMainline {
            head: mainline.to_string(),
            source_path: index.source(),
        });
    }

    let mut sections: Vec<(Head, Vec<InputEntry>)> =
        remotes.all_heads().map(|h| (h, Vec::new())).collect();
    for entry in entries {
        let section = sections
            .iter_mut()
            .find(|(h, _)| *h == entry.class.dest_head)
            .ok_or_else(|| {
                Error::structural(format!(
                    "Patch \"{}\" belongs to \"{}\" which is not in the remotes list.",
                    entry.name, entry.class.dest_head
                ))
            })?;
        section.1.push(entry);
    }

    for (head, entries) in sections.iter_mut() {
        if repo_heads.contains(head) {
            entries.sort_by_key(|e| e.class.ordinal);
        }
    }
    sections.retain(|(_, entries)| !entries.is_empty());

    Ok(SortedSeries { sections })
}

/// Render sorted sections as series lines.
///
/// Mainline entries come without a header; every other section is
/// introduced by a blank line (unless it is the first output) and a
/// `# <head>` comment.
pub fn series_format(series: &SortedSeries, remotes: &Remotes) -> Vec<String> {
    let mut result = Vec::new();

    for (head, entries) in &series.sections {
        if head != remotes.mainline() {
            if !result.is_empty() {
                result.push("\n".to_string());
            }
            result.push(format!("\t# {}\n", head));
        }
        result.extend(entries.iter().map(|e| e.value.clone()));
    }

    result
}

/// A re-sorted interior.
#[derive(Debug, Clone)]
pub struct SortedInterior {
    /// The new interior lines, header and footer included.
    pub lines: Vec<String>,
    /// The classified entries, in output order.
    pub entries: Vec<InputEntry>,
}

/// Classify, sort and render a sortable interior. The leading and trailing
/// lines of `inside` that are not part of any section stay where they are.
pub fn sort_inside(
    index: &dyn CommitIndex,
    remotes: &Remotes,
    inside: &[String],
    patch_dir: &Path,
    allow_move: bool,
) -> Result<SortedInterior> {
    let entries = parse_inside(index, remotes, inside, patch_dir, allow_move)?;
    let sorted = series_sort(index, remotes, entries)?;

    let mut lines = series_header(inside, remotes)?;
    lines.extend(series_format(&sorted, remotes));
    lines.extend(series_footer(inside, remotes)?);

    Ok(SortedInterior {
        lines,
        entries: sorted.entries().cloned().collect(),
    })
}
