//! # Patch Metadata
//!
//! SUSE-style patches start with a header of `Name: value` tags:
//!
//! ```text
//! From: Jane Doe <jane@example.com>
//! Date: Mon, 4 Dec 2017 10:00:00 +0100
//! Subject: net: fix something
//! Git-commit: 0123456789abcdef0123456789abcdef01234567
//! Patch-mainline: v4.15-rc3
//! References: bsc#1234567
//!
//! <description>
//! ---
//! <diff>
//! ```
//!
//! The header ends at the first blank line (or at a `---`, `diff ` or
//! `Index:` line for patches without a description). Header lines are kept
//! as raw bytes and only the lines whose tag is changed are rewritten; the
//! rest of the file is carried through untouched.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::bytes::Regex;

use crate::error::{Error, Result};

/// Upstream commit the patch backports.
pub const GIT_COMMIT: &str = "Git-commit";
/// Repository the commit comes from, when it is not mainline.
pub const GIT_REPO: &str = "Git-repo";
/// Upstream status of the patch.
pub const PATCH_MAINLINE: &str = "Patch-mainline";

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Byte-oriented so that header lines in legacy encodings still match.
    RE.get_or_init(|| {
        Regex::new(r"(?-u)^([A-Za-z][A-Za-z0-9-]*):[ \t]*(.*?)\s*$").expect("valid regex")
    })
}

/// Read/write access to the tags of one patch.
pub trait TagStore {
    /// All values of `tag`, in file order. Tag names are case-insensitive.
    fn get(&self, tag: &str) -> Vec<String>;

    /// Rewrite the first occurrence of `tag`. Fails with `Error::NotFound`
    /// when the patch does not carry the tag.
    fn change(&mut self, tag: &str, value: &str) -> Result<()>;

    /// Delete every occurrence of `tag`.
    fn remove(&mut self, tag: &str);
}

/// A patch file loaded in memory.
#[derive(Debug, Clone)]
pub struct PatchFile {
    path: PathBuf,
    /// Raw header lines, terminators included
    header: Vec<Vec<u8>>,
    body: Vec<u8>,
}

fn ends_header(line: &[u8]) -> bool {
    let trimmed = line.strip_suffix(b"\n").unwrap_or(line);
    let trimmed = trimmed.strip_suffix(b"\r").unwrap_or(trimmed);
    trimmed.iter().all(|b| b.is_ascii_whitespace())
        || trimmed == b"---"
        || line.starts_with(b"diff ")
        || line.starts_with(b"Index:")
}

impl PatchFile {
    /// Parse patch content; `path` is where [`PatchFile::save`] writes.
    pub fn parse(path: impl Into<PathBuf>, content: &[u8]) -> Self {
        let mut header = Vec::new();
        let mut offset = 0;
        for line in content.split_inclusive(|b| *b == b'\n') {
            if ends_header(line) {
                break;
            }
            header.push(line.to_vec());
            offset += line.len();
        }
        Self {
            path: path.into(),
            header,
            body: content[offset..].to_vec(),
        }
    }

    /// Load the patch at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read(path)?;
        Ok(Self::parse(path, &content))
    }

    /// Write the patch back to where it was loaded from.
    pub fn save(&self) -> Result<()> {
        fs::write(&self.path, self.to_bytes())?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.header.concat();
        out.extend_from_slice(&self.body);
        out
    }

    /// Tag name and value of a header line. The name is ASCII; the value
    /// is decoded lossily and only ever read.
    fn tag_of(line: &[u8]) -> Option<(String, String)> {
        tag_regex().captures(line).map(|c| {
            (
                String::from_utf8_lossy(&c[1]).into_owned(),
                String::from_utf8_lossy(&c[2]).into_owned(),
            )
        })
    }

    fn is_tag(line: &[u8], tag: &str) -> bool {
        tag_regex()
            .captures(line)
            .is_some_and(|c| c[1].eq_ignore_ascii_case(tag.as_bytes()))
    }
}

impl TagStore for PatchFile {
    fn get(&self, tag: &str) -> Vec<String> {
        self.header
            .iter()
            .filter_map(|l| Self::tag_of(l))
            .filter(|(name, _)| name.eq_ignore_ascii_case(tag))
            .map(|(_, value)| value)
            .collect()
    }

    fn change(&mut self, tag: &str, value: &str) -> Result<()> {
        let pos = self
            .header
            .iter()
            .position(|l| Self::is_tag(l, tag))
            .ok_or_else(|| Error::not_found(format!("Tag \"{}\" not found", tag)))?;

        let line = &self.header[pos];
        let name = Self::tag_of(line).map(|(n, _)| n).unwrap_or_else(|| tag.to_string());
        let eol: &[u8] = if line.ends_with(b"\r\n") {
            b"\r\n"
        } else if line.ends_with(b"\n") {
            b"\n"
        } else {
            b""
        };
        let mut rewritten = format!("{}: {}", name, value).into_bytes();
        rewritten.extend_from_slice(eol);
        self.header[pos] = rewritten;
        Ok(())
    }

    fn remove(&mut self, tag: &str) {
        self.header
            .retain(|l| !Self::is_tag(l, tag));
    }
}

/// The placement-relevant tags of a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchTags {
    pub commits: Vec<String>,
    pub repos: Vec<String>,
    pub mainline: Vec<String>,
}

impl PatchTags {
    pub fn from_store(store: &impl TagStore) -> Self {
        Self {
            commits: store.get(GIT_COMMIT),
            repos: store.get(GIT_REPO),
            mainline: store.get(PATCH_MAINLINE),
        }
    }

    /// Read the tags of the patch at `path`.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_store(&PatchFile::open(path)?))
    }

    /// Tags of an upstream commit backport.
    pub fn upstream(commit: &str) -> Self {
        Self {
            commits: vec![commit.to_string()],
            ..Default::default()
        }
    }
}
