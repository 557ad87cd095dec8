//! # Series File Model
//!
//! A series file (`series.conf`) is an ordered list of lines. The part that
//! git-sort maintains, the sortable interior, is delimited by two marker
//! comments:
//!
//! ```text
//! 	########################################################
//! 	# sorted patches
//! 	########################################################
//! 	patches.suse/first.patch
//!
//! 	# davem/net-next
//! 	patches.suse/second.patch
//! 	########################################################
//! 	# end of sorted patches
//! 	########################################################
//! ```
//!
//! Inside the interior, a comment naming a head (`# davem/net-next`) starts
//! the section of that head; patches before the first section header belong
//! to mainline. Lines are kept with their line terminators so that a series
//! can be written back byte for byte.

use crate::config::Remotes;
use crate::error::{Error, Result};
use crate::head::{Head, OUT_OF_TREE_TEXT};

/// Text of the comment opening the sortable interior.
pub const START_TEXT: &str = "sorted patches";

/// Text of the comment closing the sortable interior.
pub const END_TEXT: &str = "end of sorted patches";

/// A series split around its sortable interior.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitSeries {
    /// Lines up to and including the start marker
    pub before: Vec<String>,
    /// The sortable interior
    pub inside: Vec<String>,
    /// Lines from the end marker on
    pub after: Vec<String>,
}

/// Split text into lines, keeping line terminators.
pub fn lines_of(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

fn normalized_comment(line: &str) -> String {
    line.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Split a series at its `sorted patches` markers.
///
/// Returns `Error::NotFound` when either marker is missing.
pub fn split(lines: &[String]) -> Result<SplitSeries> {
    let start = format!("# {}", START_TEXT);
    let end = format!("# {}", END_TEXT);

    let start_pos = lines
        .iter()
        .position(|l| normalized_comment(l) == start)
        .ok_or_else(|| Error::not_found("Sorted subseries not found."))?;
    let end_pos = lines[start_pos + 1..]
        .iter()
        .position(|l| normalized_comment(l) == end)
        .map(|p| p + start_pos + 1)
        .ok_or_else(|| Error::not_found("End of sorted subseries not found."))?;

    Ok(SplitSeries {
        before: lines[..=start_pos].to_vec(),
        inside: lines[start_pos + 1..end_pos].to_vec(),
        after: lines[end_pos..].to_vec(),
    })
}

/// Whether `line` references a patch (not blank, not a comment).
pub fn is_patch_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}

/// The first whitespace-delimited word of `line`.
pub fn first_word(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// The patch names referenced by `lines`, in order.
pub fn patch_names(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter(|l| is_patch_line(l))
        .filter_map(|l| first_word(l).map(str::to_string))
        .collect()
}

/// Parse a line that may be a section header comment.
///
/// Returns the head the section belongs to, `Error::NotFound` when the
/// line is not a section header at all, and a structural error when it
/// looks like one but does not name a listed head.
pub fn parse_section_header(line: &str, remotes: &Remotes) -> Result<Head> {
    let line = line.trim();
    let text = line
        .strip_prefix("# ")
        .ok_or_else(|| Error::not_found("Not a section header"))?;

    if text == OUT_OF_TREE_TEXT {
        return Ok(Head::OutOfTree);
    } else if text.to_lowercase() == START_TEXT {
        return Err(Error::not_found("Not a section header"));
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > 2 {
        return Err(Error::structural(format!(
            "Section comment \"{}\" in series.conf could not be parsed. series.conf is invalid.",
            text
        )));
    }

    remotes.find_text(text).cloned().ok_or_else(|| {
        Error::structural(format!(
            "Section comment \"{}\" in series.conf does not match any Head in the remotes \
             list. series.conf is invalid.",
            text
        ))
    })
}

fn is_header_line(line: &str, remotes: &Remotes) -> Result<bool> {
    if is_patch_line(line) {
        return Ok(false);
    }
    match parse_section_header(line, remotes) {
        Ok(_) => Ok(false),
        Err(e) if e.is_not_found() => Ok(true),
        Err(e) => Err(e),
    }
}

/// The lines at the top of `lines` that are neither patch entries nor
/// section headers. They are kept in place when the interior is rewritten.
pub fn series_header(lines: &[String], remotes: &Remotes) -> Result<Vec<String>> {
    let mut header = Vec::new();
    for line in lines {
        if !is_header_line(line, remotes)? {
            break;
        }
        header.push(line.clone());
    }
    Ok(header)
}

/// The lines at the bottom of `lines` that are neither patch entries nor
/// section headers.
pub fn series_footer(lines: &[String], remotes: &Remotes) -> Result<Vec<String>> {
    if series_header(lines, remotes)?.len() == lines.len() {
        return Ok(Vec::new());
    }
    let mut footer = Vec::new();
    for line in lines.iter().rev() {
        if !is_header_line(line, remotes)? {
            break;
        }
        footer.push(line.clone());
    }
    footer.reverse();
    Ok(footer)
}

/// Patch names of the interior grouped by the section they sit in.
///
/// Sections follow head order; sections without patches are omitted.
pub fn patches_per_section(inside: &[String], remotes: &Remotes) -> Result<Vec<(Head, Vec<String>)>> {
    let mut sections: Vec<(Head, Vec<String>)> =
        remotes.all_heads().map(|h| (h, Vec::new())).collect();

    let mut current = 0;
    for line in inside {
        match parse_section_header(line, remotes) {
            Ok(head) => {
                current = sections
                    .iter()
                    .position(|(h, _)| *h == head)
                    .ok_or_else(|| Error::structural(format!("Unknown section \"{}\"", head)))?;
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        if !is_patch_line(line) {
            continue;
        }
        if let Some(name) = first_word(line) {
            sections[current].1.push(name.to_string());
        }
    }

    sections.retain(|(_, names)| !names.is_empty());
    Ok(sections)
}

/// Names of the patches that sit in a different section in `remote` than in
/// `base`.
pub fn list_moved_patches(base: &[String], remote: &[String], remotes: &Remotes) -> Result<Vec<String>> {
    let mut base_heads = std::collections::HashMap::new();
    for (head, names) in patches_per_section(base, remotes)? {
        for name in names {
            base_heads.insert(name, head.clone());
        }
    }

    let mut moved = Vec::new();
    for (head, names) in patches_per_section(remote, remotes)? {
        for name in names {
            if base_heads.get(&name).is_some_and(|h| *h != head) {
                moved.push(name);
            }
        }
    }
    Ok(moved)
}
