//! # Entry Classification
//!
//! Every patch line of the sortable interior becomes an [`InputEntry`]:
//! its text, its patch name and a [`Classification`] saying which section
//! the patch belongs to and at which ordinal it sorts there.
//!
//! The patch's tags are compared with three facts: where the index finds
//! its commit (if anywhere) relative to the section the patch currently
//! sits in, whether that section's head is fetched locally, and whether
//! the `Git-repo` tag designates that head. The combination is resolved by
//! [`decide`], a pure function over [`Facts`], so that the whole table can
//! be tested without touching the filesystem.

use std::cmp::Ordering;
use std::path::Path;
use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use crate::config::Remotes;
use crate::error::{Error, Result};
use crate::head::{Head, RepoUrl};
use crate::index::{CommitIndex, IndexedCommit};
use crate::patch::{PatchTags, GIT_COMMIT, GIT_REPO, PATCH_MAINLINE};
use crate::series::{first_word, is_patch_line, parse_section_header};

fn commit_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9a-f]{40}").expect("valid regex"))
}

fn upstream_status_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(v[1-9]|Queued)").expect("valid regex"))
}

fn pending_status_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(Submitted|Not yet)").expect("valid regex"))
}

/// Where the head a commit was found in sits relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Found in a less authoritative head.
    Downstream,
    /// Found in the current head.
    Same,
    /// Found in a more authoritative head.
    Upstream,
}

impl Direction {
    fn between(found: &Head, current: &Head) -> Self {
        match found.cmp(current) {
            Ordering::Less => Direction::Upstream,
            Ordering::Equal => Direction::Same,
            Ordering::Greater => Direction::Downstream,
        }
    }
}

/// The inputs of a placement decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Facts {
    /// Direction of the head the index found the commit in, if it did.
    pub found: Option<Direction>,
    /// Whether the current head is indexed.
    pub available: bool,
    /// Whether the `Git-repo` tag designates the current head's repository.
    pub tag_matches_current: bool,
    /// Whether a patch may move to a more authoritative head.
    pub allow_move: bool,
}

/// Outcome of a placement decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The patch stays in its current section. With `keep_ordinal` it sorts
    /// at the ordinal the index found; otherwise it keeps its input order.
    Stay { keep_ordinal: bool },
    /// The patch goes to the head the commit was found in.
    FoundHead,
    AmbiguousTag,
    NotIndexed,
    WrongSection { remote_order: bool },
    UnexpectedMatch,
}

/// Resolve the placement of a patch.
pub fn decide(facts: Facts) -> Verdict {
    use Direction::*;

    match (
        facts.found,
        facts.available,
        facts.tag_matches_current,
        facts.allow_move,
    ) {
        (None, false, true, _) => Verdict::Stay {
            keep_ordinal: false,
        },
        (None, false, false, _) => Verdict::AmbiguousTag,
        (None, true, true, _) => Verdict::NotIndexed,
        (None, true, false, _) => Verdict::WrongSection {
            remote_order: false,
        },

        (Some(Upstream), _, _, true) => Verdict::FoundHead,

        (Some(Downstream), false, true, _) => Verdict::Stay {
            keep_ordinal: false,
        },
        (Some(Downstream), false, false, _) => Verdict::AmbiguousTag,
        (Some(Same), false, _, _) => Verdict::UnexpectedMatch,
        (Some(Upstream), false, true, false) => Verdict::Stay {
            keep_ordinal: false,
        },
        (Some(Upstream), false, false, false) => Verdict::AmbiguousTag,

        (Some(Downstream), true, tag_matches, _) => Verdict::WrongSection {
            remote_order: tag_matches,
        },
        (Some(Same), true, _, _) => Verdict::FoundHead,
        (Some(Upstream), true, true, false) => Verdict::Stay { keep_ordinal: true },
        (Some(Upstream), true, false, false) => Verdict::AmbiguousTag,
    }
}

/// Where a patch goes in the sorted series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Section the patch belongs to.
    pub dest_head: Head,
    /// Sort key within an indexed section.
    pub ordinal: Option<u64>,
    /// Validated `Git-commit` values.
    pub revs: Vec<String>,
    /// Repository the `Git-repo` tag should be changed to, if it is wrong.
    pub new_url: Option<RepoUrl>,
}

impl Classification {
    fn out_of_tree() -> Self {
        Self {
            dest_head: Head::OutOfTree,
            ordinal: None,
            revs: Vec::new(),
            new_url: None,
        }
    }
}

fn check_no_commit_status(name: &str, tags: &PatchTags) -> Result<()> {
    let status = tags.mainline.first().ok_or_else(|| Error::MissingTag {
        name: name.to_string(),
        tag: PATCH_MAINLINE.to_string(),
    })?;

    if upstream_status_regex().is_match(status) {
        Err(Error::CommitRequired {
            name: name.to_string(),
            status: status.clone(),
        })
    } else if pending_status_regex().is_match(status) {
        Ok(())
    } else {
        Err(Error::UnsupportedStatus {
            name: name.to_string(),
            status: status.clone(),
        })
    }
}

fn commit_id(name: &str, value: &str) -> Result<String> {
    match first_word(value) {
        Some(rev) if commit_regex().is_match(rev) => Ok(rev.to_string()),
        _ => Err(Error::TagFormat {
            name: name.to_string(),
            tag: GIT_COMMIT.to_string(),
            value: value.to_string(),
        }),
    }
}

fn head_repo_text(head: &Head) -> String {
    head.repo()
        .map(|r| r.full().to_string())
        .unwrap_or_else(|| head.to_string())
}

/// Decide the section and ordinal of the patch `name`, which currently sits
/// in the section of `current`.
pub fn classify(
    name: &str,
    tags: &PatchTags,
    current: &Head,
    index: &dyn CommitIndex,
    remotes: &Remotes,
    allow_move: bool,
) -> Result<Classification> {
    if tags.repos.len() > 1 {
        return Err(Error::MultipleTags {
            name: name.to_string(),
            tag: GIT_REPO.to_string(),
        });
    }

    if tags.commits.is_empty() {
        check_no_commit_status(name, tags)?;
        return Ok(Classification::out_of_tree());
    }

    let revs = tags
        .commits
        .iter()
        .map(|value| commit_id(name, value))
        .collect::<Result<Vec<_>>>()?;
    let rev = revs[0].clone();

    let repo = match tags.repos.first() {
        Some(url) => RepoUrl::new(url),
        None => remotes
            .mainline()
            .repo()
            .cloned()
            .ok_or_else(|| Error::structural("The first remote has no repository."))?,
    };

    let found = index.lookup(&rev);
    let facts = Facts {
        found: found.as_ref().map(|ic| Direction::between(&ic.head, current)),
        available: index.is_available(current),
        tag_matches_current: current.has_repo(&repo),
        allow_move,
    };
    let verdict = decide(facts);
    debug!("{}: {:?} -> {:?}", name, facts, verdict);

    let found_text = found.as_ref().map(|ic| ic.head.to_string());
    match (verdict, found) {
        (Verdict::Stay { keep_ordinal }, found) => Ok(Classification {
            dest_head: current.clone(),
            ordinal: found.filter(|_| keep_ordinal).map(|ic| ic.ordinal),
            revs,
            new_url: None,
        }),
        (Verdict::FoundHead, Some(IndexedCommit { head, ordinal })) => {
            let new_url = if head.has_repo(&repo) {
                None
            } else {
                head.repo().cloned()
            };
            Ok(Classification {
                dest_head: head,
                ordinal: Some(ordinal),
                revs,
                new_url,
            })
        }
        (Verdict::FoundHead, None) => Err(Error::structural(format!(
            "Commit \"{}\" of patch \"{}\" vanished from the index.",
            rev, name
        ))),
        (Verdict::AmbiguousTag, _) => Err(Error::AmbiguousTag {
            name: name.to_string(),
            repo: repo.full().to_string(),
            current: current.to_string(),
            found: found_text,
        }),
        (Verdict::NotIndexed, _) => Err(Error::CommitNotIndexed {
            name: name.to_string(),
            rev,
            repo: head_repo_text(current),
        }),
        (Verdict::WrongSection { remote_order }, _) => Err(Error::WrongSection {
            name: name.to_string(),
            repo: head_repo_text(current),
            current: current.to_string(),
            found: found_text,
            remote_order,
        }),
        (Verdict::UnexpectedMatch, _) => Err(Error::Consistency {
            name: name.to_string(),
            rev,
            head: current.to_string(),
        }),
    }
}

/// One patch line of the interior, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEntry {
    /// The series line written for this patch.
    pub value: String,
    /// The patch name, as referenced from the series.
    pub name: String,
    pub class: Classification,
}

impl InputEntry {
    /// Classify a patch from its tags.
    pub fn from_tags(
        name: &str,
        tags: &PatchTags,
        current: &Head,
        index: &dyn CommitIndex,
        remotes: &Remotes,
        allow_move: bool,
    ) -> Result<Self> {
        Ok(Self {
            value: format!("\t{}\n", name),
            name: name.to_string(),
            class: classify(name, tags, current, index, remotes, allow_move)?,
        })
    }

    /// Classify the patch `name` found under `patch_dir`.
    pub fn from_patch(
        name: &str,
        patch_dir: &Path,
        current: &Head,
        index: &dyn CommitIndex,
        remotes: &Remotes,
        allow_move: bool,
    ) -> Result<Self> {
        let path = patch_dir.join(name);
        if !path.is_file() {
            return Err(Error::MissingPatch {
                name: name.to_string(),
            });
        }
        let tags = PatchTags::read(&path)?;
        Self::from_tags(name, &tags, current, index, remotes, allow_move)
    }

    /// Whether the patch's `Git-repo` tag has to be rewritten.
    pub fn needs_tag_update(&self) -> bool {
        !self.class.dest_head.is_out_of_tree() && self.class.new_url.is_some()
    }
}

/// Classify every patch line of a sortable interior.
///
/// Lines before the first section header belong to mainline. Comments and
/// blank lines are dropped.
pub fn parse_inside(
    index: &dyn CommitIndex,
    remotes: &Remotes,
    inside: &[String],
    patch_dir: &Path,
    allow_move: bool,
) -> Result<Vec<InputEntry>> {
    let mut current = remotes.mainline().clone();
    let mut entries = Vec::new();

    for line in inside {
        match parse_section_header(line, remotes) {
            Ok(head) => {
                current = head;
                continue;
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        if !is_patch_line(line) {
            continue;
        }
        if let Some(name) = first_word(line) {
            entries.push(InputEntry::from_patch(
                name, patch_dir, &current, index, remotes, allow_move,
            )?);
        }
    }

    Ok(entries)
}
