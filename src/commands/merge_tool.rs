//! # Merge Tool Command Implementation
//!
//! A git mergetool for `series.conf`. Depends on `merge` from RCS. Add a
//! section like this to the git configuration:
//!
//! ```text
//! [mergetool "git-sort"]
//! 	cmd = git-sort merge-tool $LOCAL $BASE $REMOTE $MERGED
//! 	trustExitCode = true
//! ```
//!
//! Then call `git mergetool --tool=git-sort series.conf`.
//!
//! The exit status is 0 when everything merged, 1 when conflicts remain
//! outside of the sorted section or tags could not be updated.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use log::info;

use git_sort::git::stage;
use git_sort::merge::driver::{merge_series, MergeOutcome, MergePaths};
use git_sort::output::{OutputConfig, Severity};
use git_sort::tags::update_tags;

use super::SourceArgs;

/// Merge series.conf as a git mergetool
#[derive(Args, Debug)]
pub struct MergeToolArgs {
    /// Our version of the file ($LOCAL).
    pub local: PathBuf,

    /// The common ancestor ($BASE).
    pub base: PathBuf,

    /// Their version of the file ($REMOTE).
    pub remote: PathBuf,

    /// Where to write the merge result ($MERGED).
    pub merged: PathBuf,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Execute the `merge-tool` command.
pub fn execute(args: MergeToolArgs, output: &OutputConfig) -> Result<ExitCode> {
    let (remotes, index) = args.source.load()?;
    let paths = MergePaths {
        local: args.local,
        base: args.base,
        remote: args.remote,
        merged: args.merged,
    };

    let (reconciled, outcome) = merge_series(&index, &remotes, &paths, &args.source.prefix)?;

    let mut result = ExitCode::SUCCESS;
    if let MergeOutcome::Conflicts { kept } = &outcome {
        eprintln!(
            "{}",
            output.message(
                Severity::Warning,
                format!(
                    "conflicts outside of sorted section, leaving merged result in {}",
                    kept.display()
                )
            )
        );
        result = ExitCode::FAILURE;
    }

    match update_tags(&index, &remotes, &reconciled.entries, &args.source.prefix) {
        Ok(updated) => {
            let paths: Vec<PathBuf> = updated
                .iter()
                .map(|name| args.source.prefix.join(name))
                .collect();
            stage(&paths)?;
            if !paths.is_empty() {
                info!("Staged {} retagged patches.", paths.len());
            }
        }
        Err(e) => {
            eprintln!("{}", output.message(Severity::Error, e));
            result = ExitCode::FAILURE;
        }
    }

    Ok(result)
}
