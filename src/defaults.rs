//! Default values for git-sort configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Built-in remotes list, most authoritative first.
///
/// Each entry is a repository (kernel.org short form or full URL) and an
/// optional ref, `master` when absent.
pub const DEFAULT_REMOTES: &[(&str, Option<&str>)] = &[
    ("torvalds/linux", None),
    ("davem/net", None),
    ("davem/net-next", None),
    ("rdma/rdma", Some("for-rc")),
    ("rdma/rdma", Some("for-next")),
    ("jejb/scsi", Some("for-next")),
    ("bp/bp", Some("for-next")),
    ("tiwai/sound", None),
    ("git://linuxtv.org/media_tree.git", None),
    ("powerpc/linux", Some("fixes")),
    ("powerpc/linux", Some("next")),
    ("tip/tip", None),
    ("shli/md", Some("for-next")),
    ("tytso/ext4", Some("dev")),
    ("s390/linux", Some("for-linus")),
    ("tj/libata", Some("for-next")),
    ("https://github.com/kdave/btrfs-devel.git", Some("misc-next")),
    ("gregkh/tty", Some("tty-next")),
    ("pablo/nf", None),
    ("pablo/nf-next", None),
    ("klassert/ipsec", None),
    ("klassert/ipsec-next", None),
];

/// Name of the series file looked up when none is given.
pub const SERIES_FILE: &str = "series.conf";

/// Returns the default location of the git-sort index.
///
/// Uses the platform-appropriate cache directory:
/// - Linux: `~/.cache/git-sort/index.json` (XDG Base Directory)
/// - macOS: `~/Library/Caches/git-sort/index.json`
/// - Windows: `{FOLDERID_LocalAppData}\git-sort\index.json`
///
/// Falls back to `.git-sort-cache` in the current directory if the
/// platform cache directory cannot be determined.
///
/// This can be overridden by the `--index` CLI flag or the
/// `GIT_SORT_INDEX` environment variable.
pub fn default_index_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".git-sort-cache"))
        .join("git-sort")
        .join("index.json")
}
