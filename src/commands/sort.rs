//! # Sort Command Implementation
//!
//! Sorts the sorted section of `series.conf` according to the upstream
//! order of the commits the patches backport.
//!
//! The series is read from the file given on the command line. Without a
//! file, it is read from stdin when stdin is not a terminal (filter mode,
//! e.g. `:'<,'>! git-sort sort` in vim) and from `series.conf` otherwise.
//! In filter mode, input without section markers is sorted as a whole.
//!
//! With `--check` nothing is written; the exit status is 2 when the series
//! is not sorted or tags are outdated.

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use log::{debug, info};

use git_sort::defaults::SERIES_FILE;
use git_sort::series::{lines_of, split, SplitSeries};
use git_sort::sort::sort_inside;
use git_sort::tags::{tag_needs_update, update_tags};

use super::SourceArgs;

/// Exit status of `--check` when the series needs work.
const CHECK_FAILED: u8 = 2;

/// Sort series.conf lines according to the upstream order of commits
#[derive(Args, Debug)]
pub struct SortArgs {
    /// series.conf file which will be modified in place.
    ///
    /// Default: if stdin is a terminal, "series.conf"; otherwise, read input
    /// from stdin and write the result to stdout.
    #[arg(value_name = "SERIES")]
    pub series: Option<PathBuf>,

    /// Report via exit status 2 if the series is not sorted.
    #[arg(short, long)]
    pub check: bool,

    /// Move patches upstream between subsystem sections as appropriate.
    #[arg(short, long)]
    pub upstream: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Execute the `sort` command.
pub fn execute(args: SortArgs) -> Result<ExitCode> {
    let path = match &args.series {
        Some(path) => Some(path.clone()),
        None if io::stdin().is_terminal() => Some(PathBuf::from(SERIES_FILE)),
        None => None,
    };

    let text = match &path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        }
    };
    let lines = lines_of(&text);

    let parts = match split(&lines) {
        Ok(parts) => parts,
        Err(e) if e.is_not_found() => {
            if path.is_none() {
                debug!("No sorted section markers, sorting the whole input");
                SplitSeries {
                    inside: lines.clone(),
                    ..Default::default()
                }
            } else if args.check {
                debug!("No sorted section, nothing to check");
                return Ok(ExitCode::SUCCESS);
            } else {
                return Err(e.into_structural().into());
            }
        }
        Err(e) => return Err(e.into()),
    };

    let (remotes, index) = args.source.load()?;
    let sorted = sort_inside(&index, &remotes, &parts.inside, &args.source.prefix, args.upstream)?;

    if args.check {
        let mut result = ExitCode::SUCCESS;
        if parts.inside != sorted.lines {
            println!("Input is not sorted.");
            result = ExitCode::from(CHECK_FAILED);
        }
        if sorted.entries.iter().any(tag_needs_update) {
            println!("Git-repo tags are outdated.");
            result = ExitCode::from(CHECK_FAILED);
        }
        return Ok(result);
    }

    let mut new_lines = parts.before;
    new_lines.extend(sorted.lines);
    new_lines.extend(parts.after);
    let new_text = new_lines.concat();

    match &path {
        Some(path) => {
            if new_text != text {
                fs::write(path, &new_text)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("Sorted {}", path.display());
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(new_text.as_bytes())?;
            stdout.flush()?;
        }
    }

    update_tags(&index, &remotes, &sorted.entries, &args.source.prefix)?;
    Ok(ExitCode::SUCCESS)
}
