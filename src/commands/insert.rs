//! # Insert Command Implementation
//!
//! Prints the name of the patch over which an upstream commit should be
//! imported, so that the patch queue can be expanded up to that point:
//!
//! ```text
//! kernel-source$ ./scripts/sequence-patch.sh $(git-sort insert 5c8227d0d3b1)
//! ```
//!
//! With `--delta` it prints how far the insertion point is from the top
//! applied patch (`--top`) instead.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use log::debug;

use git_sort::defaults::SERIES_FILE;
use git_sort::git::resolve_revision;
use git_sort::insert::locate;
use git_sort::series::lines_of;

use super::SourceArgs;

/// Print the name of the patch over which a commit should be imported
#[derive(Args, Debug)]
pub struct InsertArgs {
    /// Upstream commit id.
    #[arg(value_name = "REV")]
    pub rev: String,

    /// series.conf file to look into.
    #[arg(short, long, value_name = "FILE", default_value = SERIES_FILE)]
    pub series: PathBuf,

    /// The topmost applied patch; the printed distance is counted from it.
    #[arg(short, long, value_name = "PATCH")]
    pub top: Option<String>,

    /// Print the signed distance from the top applied patch to the insertion
    /// point instead of a patch name (negative: patches to pop).
    #[arg(short, long)]
    pub delta: bool,

    /// Linux repository used to resolve abbreviated revisions.
    #[arg(long, value_name = "DIR", env = "LINUX_GIT", default_value = ".git")]
    pub git_dir: PathBuf,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Execute the `insert` command.
pub fn execute(args: InsertArgs) -> Result<ExitCode> {
    let commit = resolve_revision(&args.git_dir, &args.rev)?;
    debug!("{} resolved to {}", args.rev, commit);

    let text = fs::read_to_string(&args.series)
        .with_context(|| format!("Failed to read {}", args.series.display()))?;
    let (remotes, index) = args.source.load()?;

    let insertion = locate(
        &lines_of(&text),
        &commit,
        args.top.as_deref(),
        &index,
        &remotes,
        &args.source.prefix,
    )?;
    debug!(
        "Insert after \"{}\", {} from the top applied patch",
        insertion.name, insertion.delta
    );

    if args.delta {
        println!("{}", insertion.delta);
    } else {
        println!("{}", insertion.name);
    }
    Ok(ExitCode::SUCCESS)
}
