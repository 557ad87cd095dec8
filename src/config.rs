//! # Remotes Configuration
//!
//! The remotes list is the fixed priority list of upstream heads that
//! defines the section order of a sorted series. The first entry is the
//! mainline head; each following entry is less authoritative than the one
//! before it. The virtual out-of-tree head is always appended last and is
//! not part of the configuration.
//!
//! The list is built in (see [`crate::defaults::DEFAULT_REMOTES`]) and can
//! be replaced by a YAML file:
//!
//! ```yaml
//! remotes:
//!   - url: torvalds/linux
//!   - url: rdma/rdma
//!     ref: for-next
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::head::{Head, RepoUrl, DEFAULT_REV};

/// One entry of the remotes file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteSpec {
    /// Repository URL, short kernel.org form accepted
    pub url: String,
    /// Branch or ref name, `master` when omitted
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
}

/// Top-level structure of the remotes file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemotesFile {
    pub remotes: Vec<RemoteSpec>,
}

/// The ordered list of upstream heads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remotes {
    heads: Vec<Head>,
}

impl Remotes {
    /// Build the list from `(url, ref)` pairs, most authoritative first.
    pub fn from_specs(specs: &[RemoteSpec]) -> Result<Self> {
        if specs.is_empty() {
            return Err(Error::Config {
                message: "The remotes list is empty".to_string(),
                hint: Some("List at least the mainline repository".to_string()),
            });
        }

        let mut heads: Vec<Head> = Vec::with_capacity(specs.len());
        for (rank, spec) in specs.iter().enumerate() {
            let repo = RepoUrl::new(&spec.url);
            let rev = spec.rev.as_deref().unwrap_or(DEFAULT_REV);
            if let Some(existing) = heads.iter().find(|h| h.matches(&repo, rev)) {
                return Err(Error::Config {
                    message: format!("Duplicate remote \"{}\" in the remotes list", existing),
                    hint: Some("Each repository and ref pair may only be listed once".to_string()),
                });
            }
            heads.push(Head::remote(repo, Some(rev), rank));
        }

        Ok(Self { heads })
    }

    /// The built-in list of kernel remotes.
    pub fn builtin() -> Self {
        let specs: Vec<RemoteSpec> = crate::defaults::DEFAULT_REMOTES
            .iter()
            .map(|(url, rev)| RemoteSpec {
                url: url.to_string(),
                rev: rev.map(str::to_string),
            })
            .collect();
        Self::from_specs(&specs).expect("built-in remotes list is valid")
    }

    /// Parse a remotes file from YAML text.
    pub fn parse(yaml_content: &str) -> Result<Self> {
        let file: RemotesFile = serde_yaml::from_str(yaml_content)?;
        Self::from_specs(&file.remotes)
    }

    /// Load the remotes file at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        Self::parse(&content)
    }

    /// Load `path` if given, otherwise use the built-in list.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::builtin()),
        }
    }

    /// The mainline (most authoritative) head.
    pub fn mainline(&self) -> &Head {
        &self.heads[0]
    }

    /// The remote heads, most authoritative first.
    pub fn heads(&self) -> &[Head] {
        &self.heads
    }

    /// All heads in section order, the out-of-tree head last.
    pub fn all_heads(&self) -> impl Iterator<Item = Head> + '_ {
        self.heads
            .iter()
            .cloned()
            .chain(std::iter::once(Head::OutOfTree))
    }

    /// Find the listed head for a repository and ref.
    pub fn find(&self, repo: &RepoUrl, rev: Option<&str>) -> Option<&Head> {
        let rev = rev.unwrap_or(DEFAULT_REV);
        self.heads.iter().find(|h| h.matches(repo, rev))
    }

    /// Find the listed head for its textual form `"<url> [ref]"`.
    pub fn find_text(&self, text: &str) -> Option<&Head> {
        let mut words = text.split_whitespace();
        let url = words.next()?;
        let rev = words.next();
        if words.next().is_some() {
            return None;
        }
        self.find(&RepoUrl::new(url), rev)
    }

    pub fn len(&self) -> usize {
        self.heads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heads.is_empty()
    }
}

impl Default for Remotes {
    fn default() -> Self {
        Self::builtin()
    }
}
