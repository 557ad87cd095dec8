//! # Upstream Heads
//!
//! A [`Head`] identifies one upstream branch that patches are backported
//! from: a repository ([`RepoUrl`]) plus a ref name. Heads are totally
//! ordered by authority. The order comes from the remotes list (see
//! [`crate::config::Remotes`]), most authoritative first, and ends with the
//! virtual [`Head::OutOfTree`] head that collects patches which are not
//! upstream at all.
//!
//! Repository URLs are normalized so that the different spellings used in
//! `Git-repo` tags and in section headers compare equal. kernel.org
//! repositories may be written in a short form (`torvalds/linux`).

use std::cmp::Ordering;
use std::fmt;

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Canonical prefix of repositories hosted on kernel.org.
pub const KERNEL_ORG_PREFIX: &str = "git://git.kernel.org/pub/scm/linux/kernel/git/";

/// Other spellings of the kernel.org prefix, rewritten to the canonical one.
const KERNEL_ORG_ALIASES: &[&str] = &[
    "http://git.kernel.org/pub/scm/linux/kernel/git/",
    "https://git.kernel.org/pub/scm/linux/kernel/git/",
    "https://kernel.googlesource.com/pub/scm/linux/kernel/git/",
    "git://git.kernel.org/pub/scm/linux/kernel/git/",
];

const GIT_EXT: &str = ".git";

/// Ref name assumed when a head does not name one.
pub const DEFAULT_REV: &str = "master";

/// Text of the section header of the virtual out-of-tree head.
pub const OUT_OF_TREE_TEXT: &str = "out-of-tree patches";

fn proto_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(git|https?)://").expect("valid regex"))
}

/// A normalized repository URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepoUrl {
    url: String,
}

impl RepoUrl {
    /// Normalize `raw` into a repository URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use git_sort::head::RepoUrl;
    ///
    /// let short = RepoUrl::new("torvalds/linux");
    /// let long = RepoUrl::new("https://git.kernel.org/pub/scm/linux/kernel/git/torvalds/linux.git/");
    /// assert_eq!(short, long);
    /// assert_eq!(short.to_string(), "torvalds/linux");
    /// ```
    pub fn new(raw: &str) -> Self {
        let mut url = raw.trim().trim_end_matches('/').to_string();

        for prefix in KERNEL_ORG_ALIASES {
            if url
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
            {
                url = format!("{}{}", KERNEL_ORG_PREFIX, &url[prefix.len()..]);
                break;
            }
        }

        if proto_regex().is_match(&url.to_ascii_lowercase()) {
            // Url lower-cases the scheme and host; keep the path as written.
            if let Ok(parsed) = Url::parse(&url) {
                url = parsed.as_str().trim_end_matches('/').to_string();
            }
        } else {
            url = format!("{}{}", KERNEL_ORG_PREFIX, url);
        }

        if !url.ends_with(GIT_EXT) {
            url.push_str(GIT_EXT);
        }

        Self { url }
    }

    /// The full normalized URL, as written in `Git-repo` tags.
    pub fn full(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for RepoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self
            .url
            .strip_prefix(KERNEL_ORG_PREFIX)
            .and_then(|rest| rest.strip_suffix(GIT_EXT))
        {
            Some(short) => f.write_str(short),
            None => f.write_str(&self.url),
        }
    }
}

/// An upstream branch, or the virtual head of patches that are not upstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Head {
    /// A branch of an upstream repository. `rank` is its position in the
    /// remotes list, 0 being the most authoritative (mainline).
    Remote {
        repo: RepoUrl,
        rev: String,
        rank: usize,
    },
    /// Patches that are not (yet) in any listed upstream head.
    OutOfTree,
}

impl Head {
    /// Create a remote head at position `rank` of the remotes list.
    pub fn remote(repo: RepoUrl, rev: Option<&str>, rank: usize) -> Self {
        Head::Remote {
            repo,
            rev: rev.unwrap_or(DEFAULT_REV).to_string(),
            rank,
        }
    }

    /// The repository of a remote head.
    pub fn repo(&self) -> Option<&RepoUrl> {
        match self {
            Head::Remote { repo, .. } => Some(repo),
            Head::OutOfTree => None,
        }
    }

    /// The ref name of a remote head.
    pub fn rev(&self) -> Option<&str> {
        match self {
            Head::Remote { rev, .. } => Some(rev),
            Head::OutOfTree => None,
        }
    }

    /// Whether this head designates the repository and ref given.
    pub fn matches(&self, repo: &RepoUrl, rev: &str) -> bool {
        match self {
            Head::Remote {
                repo: own, rev: r, ..
            } => own == repo && r == rev,
            Head::OutOfTree => false,
        }
    }

    /// Whether `repo` is this head's repository. Never true for the
    /// out-of-tree head.
    pub fn has_repo(&self, repo: &RepoUrl) -> bool {
        self.repo() == Some(repo)
    }

    pub fn is_out_of_tree(&self) -> bool {
        matches!(self, Head::OutOfTree)
    }
}

impl Ord for Head {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Head::OutOfTree, Head::OutOfTree) => Ordering::Equal,
            (Head::OutOfTree, Head::Remote { .. }) => Ordering::Greater,
            (Head::Remote { .. }, Head::OutOfTree) => Ordering::Less,
            (
                Head::Remote {
                    repo: a_repo,
                    rev: a_rev,
                    rank: a_rank,
                },
                Head::Remote {
                    repo: b_repo,
                    rev: b_rev,
                    rank: b_rank,
                },
            ) => a_rank
                .cmp(b_rank)
                .then_with(|| a_repo.cmp(b_repo))
                .then_with(|| a_rev.cmp(b_rev)),
        }
    }
}

impl PartialOrd for Head {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Head {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Head::Remote { repo, rev, .. } if rev == DEFAULT_REV => write!(f, "{}", repo),
            Head::Remote { repo, rev, .. } => write!(f, "{} {}", repo, rev),
            Head::OutOfTree => f.write_str(OUT_OF_TREE_TEXT),
        }
    }
}
