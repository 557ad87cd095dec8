//! # Commit Order Index
//!
//! The index answers the one question the sorter needs about upstream
//! history: in which head does a commit live, and at which position
//! (ordinal) of that head's history. Ordinals increase from older to newer
//! commits and are only meaningful between commits of the same head.
//!
//! Building the index means walking several upstream histories, which is
//! left to an external tool. This module consumes the result through the
//! [`CommitIndex`] trait. [`SortIndex`] is the implementation used by the
//! CLI; it is loaded from a JSON file:
//!
//! ```json
//! {
//!   "heads": [
//!     { "head": "torvalds/linux", "commits": ["<oldest>", "...", "<newest>"] }
//!   ],
//!   "releases": [ { "tag": "v4.15", "commit": "<commit id>" } ]
//! }
//! ```
//!
//! A head is "available" when it appears in the index, meaning the local
//! repository fetches from it and its contents can be trusted.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::Remotes;
use crate::error::{Error, Result};
use crate::head::Head;

/// Where a commit lives in upstream history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedCommit {
    pub head: Head,
    pub ordinal: u64,
}

/// Lookup capability over the upstream histories.
pub trait CommitIndex {
    /// Find the head and ordinal of `commit`, a full commit id.
    fn lookup(&self, commit: &str) -> Option<IndexedCommit>;

    /// Describe a mainline ordinal as the release that contains it.
    fn describe(&self, ordinal: u64) -> Result<String>;

    /// Whether `head` is indexed (fetched locally).
    fn is_available(&self, head: &Head) -> bool;

    /// The indexed heads, in head order.
    fn repo_heads(&self) -> Vec<Head>;

    /// A human readable description of where the index comes from.
    fn source(&self) -> String {
        "<memory>".to_string()
    }
}

/// One head of the index file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexFileHead {
    /// Textual form of the head, `"<url> [ref]"`
    pub head: String,
    /// Commit ids, oldest first
    pub commits: Vec<String>,
}

/// A mainline release tag of the index file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexFileRelease {
    pub tag: String,
    pub commit: String,
}

/// On-disk form of the index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexFile {
    pub heads: Vec<IndexFileHead>,
    #[serde(default)]
    pub releases: Vec<IndexFileRelease>,
}

/// In-memory commit order index.
#[derive(Debug, Clone, Default)]
pub struct SortIndex {
    heads: Vec<Head>,
    commits: HashMap<String, IndexedCommit>,
    /// (ordinal, tag), sorted by ordinal
    releases: Vec<(u64, String)>,
    source: String,
}

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"v([0-9]+)\.([0-9]+)(|-rc([0-9]+))$").expect("valid regex"))
}

impl SortIndex {
    /// Create an empty index; `source` is used in diagnostics.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    /// Record `commit` at `ordinal` of `head`.
    ///
    /// A commit already recorded in a more authoritative head keeps that
    /// placement.
    pub fn insert(&mut self, commit: &str, head: &Head, ordinal: u64) {
        if !self.heads.contains(head) {
            self.heads.push(head.clone());
            self.heads.sort();
        }
        let commit = commit.to_ascii_lowercase();
        if let Some(existing) = self.commits.get(&commit) {
            if existing.head <= *head {
                return;
            }
        }
        self.commits.insert(
            commit,
            IndexedCommit {
                head: head.clone(),
                ordinal,
            },
        );
    }

    /// Record the history of `head`, oldest commit first.
    pub fn add_head<I, S>(&mut self, head: &Head, commits: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self.heads.contains(head) {
            self.heads.push(head.clone());
            self.heads.sort();
        }
        for (ordinal, commit) in commits.into_iter().enumerate() {
            self.insert(commit.as_ref(), head, ordinal as u64);
        }
    }

    /// Record a mainline release tag at `ordinal`.
    pub fn add_release(&mut self, tag: impl Into<String>, ordinal: u64) {
        let pos = self.releases.partition_point(|(o, _)| *o <= ordinal);
        self.releases.insert(pos, (ordinal, tag.into()));
    }

    /// Number of indexed commits.
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Build an index from its on-disk form.
    pub fn from_index_file(file: &IndexFile, remotes: &Remotes, source: &str) -> Result<Self> {
        let mut index = SortIndex::new(source);

        for entry in &file.heads {
            let head = remotes.find_text(&entry.head).ok_or_else(|| Error::Index {
                message: format!(
                    "Head \"{}\" of index \"{}\" is not in the remotes list",
                    entry.head, source
                ),
            })?;
            index.add_head(head, &entry.commits);
        }

        let mainline = remotes.mainline();
        for release in &file.releases {
            match index.lookup(&release.commit) {
                Some(ic) if &ic.head == mainline => index.add_release(&release.tag, ic.ordinal),
                _ => {
                    return Err(Error::Index {
                        message: format!(
                            "Release \"{}\" points to commit \"{}\" which is not in mainline \
                             history ({})",
                            release.tag, release.commit, mainline
                        ),
                    })
                }
            }
        }

        debug!(
            "Loaded git-sort index from {}: {} heads, {} commits, {} releases",
            source,
            index.heads.len(),
            index.commits.len(),
            index.releases.len()
        );
        Ok(index)
    }

    /// Parse an index from JSON text.
    pub fn from_json(json: &str, remotes: &Remotes, source: &str) -> Result<Self> {
        let file: IndexFile = serde_json::from_str(json)?;
        Self::from_index_file(&file, remotes, source)
    }

    /// Load the index file at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P, remotes: &Remotes) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::Index {
            message: format!("Could not read index \"{}\": {}", path.display(), e),
        })?;
        Self::from_json(&content, remotes, &path.display().to_string())
    }
}

impl CommitIndex for SortIndex {
    fn lookup(&self, commit: &str) -> Option<IndexedCommit> {
        self.commits.get(&commit.to_ascii_lowercase()).cloned()
    }

    fn describe(&self, ordinal: u64) -> Result<String> {
        let last = self.releases.last().ok_or_else(|| Error::Index {
            message: "Cannot describe commit, did not find any mainline release tags in the index."
                .to_string(),
        })?;

        let i = self.releases.partition_point(|(o, _)| *o < ordinal);
        if let Some((_, tag)) = self.releases.get(i) {
            return Ok(tag.clone());
        }

        // Not part of a tagged release yet.
        let caps = version_regex()
            .captures(&last.1)
            .ok_or_else(|| Error::Index {
                message: format!(
                    "Cannot describe commit, last release tag \"{}\" is not a version.",
                    last.1
                ),
            })?;
        let major = &caps[1];
        let minor: u64 = caps[2].parse().map_err(|_| Error::Index {
            message: format!("Invalid release tag \"{}\"", last.1),
        })?;
        match caps.get(4) {
            None => Ok(format!("v{}.{}-rc1", major, minor + 1)),
            Some(rc) => {
                let rc: u64 = rc.as_str().parse().map_err(|_| Error::Index {
                    message: format!("Invalid release tag \"{}\"", last.1),
                })?;
                Ok(format!(
                    "v{}.{} or v{}.{}-rc{} (next release)",
                    major,
                    minor,
                    major,
                    minor,
                    rc + 1
                ))
            }
        }
    }

    fn is_available(&self, head: &Head) -> bool {
        self.heads.contains(head)
    }

    fn repo_heads(&self) -> Vec<Head> {
        self.heads.clone()
    }

    fn source(&self) -> String {
        self.source.clone()
    }
}
