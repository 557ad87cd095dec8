//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures, helper functions, and macros
//! to reduce duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new()
//!         .with_patch("patches.suse/a.patch", &patches::upstream(&sha(1), None));
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::patches;
    #[allow(unused_imports)]
    pub use super::{series_text, sha};
    pub use super::TestFixture;
}

/// Remotes list used by every fixture.
pub const REMOTES: &str = r#"
remotes:
  - url: torvalds/linux
  - url: davem/net-next
  - url: rdma/rdma
    ref: for-next
"#;

/// A deterministic full commit id.
pub fn sha(n: u32) -> String {
    format!("{:040x}", n)
}

/// A series.conf with `inside` as its sorted section.
pub fn series_text(inside: &str) -> String {
    format!(
        "# Kernel patches configuration file\n\
         \n\
         \tpatches.kernel.org/patch-4.14.1\n\
         \n\
         \t########################################################\n\
         \t# sorted patches\n\
         \t########################################################\n\
         {}\
         \t########################################################\n\
         \t# end of sorted patches\n\
         \t########################################################\n\
         \n\
         \tpatches.suse/manual.patch\n",
        inside
    )
}

/// Patch file contents.
#[allow(dead_code)]
pub mod patches {
    /// A backport of `commit`, optionally tagged with a repository.
    pub fn upstream(commit: &str, repo: Option<&str>) -> String {
        let mut text = format!(
            "From: Jane Doe <jane@example.com>\nSubject: fix something\nGit-commit: {}\n",
            commit
        );
        if let Some(repo) = repo {
            text.push_str(&format!("Git-repo: {}\n", repo));
        }
        text.push_str("Patch-mainline: Queued in subsystem maintainer repository\n");
        text.push_str("References: bsc#1\n\nDescription.\n---\n");
        text
    }

    /// A patch without an upstream commit.
    pub fn not_upstream(status: &str) -> String {
        format!(
            "From: Jane Doe <jane@example.com>\nSubject: local fix\nPatch-mainline: {}\nReferences: bsc#2\n\n---\n",
            status
        )
    }
}

/// A test fixture that provides a temporary kernel-source like directory:
/// a remotes list, a commit index, patches and a `series.conf`.
///
/// The index knows mainline commits `sha(0)..sha(10)` (release `v4.14` at
/// `sha(3)`) and net-next commits `sha(100)..sha(105)`. rdma is not
/// indexed.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new().with_series("\tpatches.suse/a.patch\n");
///
/// fixture.command()
///     .arg("sort")
///     .arg("--check")
///     .arg("series.conf")
///     .assert()
///     .success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new fixture with the remotes list and the index.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("remotes.yaml")
            .write_str(REMOTES)
            .expect("Failed to write remotes");

        let mainline: Vec<String> = (0..10).map(sha).collect();
        let net_next: Vec<String> = (100..105).map(sha).collect();
        let index = serde_json::json!({
            "heads": [
                { "head": "torvalds/linux", "commits": mainline },
                { "head": "davem/net-next", "commits": net_next },
            ],
            "releases": [ { "tag": "v4.14", "commit": sha(3) } ],
        });
        temp_dir
            .child("index.json")
            .write_str(&index.to_string())
            .expect("Failed to write index");

        Self { temp_dir }
    }

    /// Add a `series.conf` whose sorted section is `inside`.
    pub fn with_series(self, inside: &str) -> Self {
        self.with_file("series.conf", &series_text(inside))
    }

    /// Add a patch file.
    pub fn with_patch(self, name: &str, content: &str) -> Self {
        self.with_file(name, content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Read a file of the fixture.
    #[allow(dead_code)]
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path)).expect("Failed to read file")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory, with
    /// the fixture's index and remotes.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("git-sort");
        cmd.current_dir(self.path())
            .env("GIT_SORT_INDEX", self.path().join("index.json"))
            .env("GIT_SORT_REMOTES", self.path().join("remotes.yaml"))
            .env("NO_COLOR", "1")
            .env_remove("LINUX_GIT");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_writes_sources() {
        let fixture = TestFixture::new();
        assert!(fixture.path().join("index.json").exists());
        assert!(fixture.path().join("remotes.yaml").exists());
    }

    #[test]
    fn test_fixture_with_series() {
        let fixture = TestFixture::new().with_series("\ta.patch\n");
        assert!(fixture.read("series.conf").contains("\ta.patch\n\t####"));
    }
}
