//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `git-sort` command-line tool. Each subcommand is defined in its own file.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic, returning the process exit status.
//!
//! The options locating the remotes list, the commit index and the patches
//! are shared through [`SourceArgs`].

pub mod insert;
pub mod merge_tool;
pub mod sort;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use log::debug;

use git_sort::config::Remotes;
use git_sort::defaults::default_index_path;
use git_sort::index::SortIndex;

/// Where to find the remotes list, the commit index and the patches.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Commit index file.
    ///
    /// Defaults to `git-sort/index.json` in the system cache directory
    /// (`~/.cache` on Linux).
    #[arg(long, value_name = "FILE", env = "GIT_SORT_INDEX")]
    pub index: Option<PathBuf>,

    /// YAML file listing the upstream remotes, most authoritative first.
    ///
    /// Defaults to the built-in list of kernel remotes.
    #[arg(long, value_name = "FILE", env = "GIT_SORT_REMOTES")]
    pub remotes: Option<PathBuf>,

    /// Search for patches in this directory.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub prefix: PathBuf,
}

impl SourceArgs {
    /// Load the remotes list and the commit index.
    pub fn load(&self) -> Result<(Remotes, SortIndex)> {
        let remotes = Remotes::load(self.remotes.as_deref()).with_context(|| {
            format!(
                "Failed to load remotes from {}",
                self.remotes
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "the built-in list".to_string())
            )
        })?;

        let index_path = self.index.clone().unwrap_or_else(default_index_path);
        debug!("Loading commit index from {}", index_path.display());
        let index = SortIndex::from_file(&index_path, &remotes)?;
        debug!("{} commits indexed", index.len());

        Ok((remotes, index))
    }
}
