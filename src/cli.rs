//! CLI argument parsing and command dispatch

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use git_sort::output::OutputConfig;

use crate::commands;

/// git-sort - Keep a kernel patch series in upstream commit order
#[derive(Parser, Debug)]
#[command(name = "git-sort")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sort series.conf lines according to the upstream order of commits
    Sort(commands::sort::SortArgs),

    /// Print the name of the patch over which a commit should be imported
    Insert(commands::insert::InsertArgs),

    /// Merge series.conf as a git mergetool
    MergeTool(commands::merge_tool::MergeToolArgs),
}

impl Cli {
    fn init_logging(&self, output: &OutputConfig) {
        let style = if output.use_color {
            env_logger::WriteStyle::Always
        } else {
            env_logger::WriteStyle::Never
        };
        // A logger may already be installed when running under a test harness.
        let _ = env_logger::Builder::new()
            .parse_filters(&self.log_level)
            .format_timestamp(None)
            .format_target(false)
            .write_style(style)
            .try_init();
    }

    /// Execute the CLI command
    pub fn execute(self) -> Result<ExitCode> {
        let output = OutputConfig::from_env_and_flag(&self.color);
        self.init_logging(&output);

        match self.command {
            Commands::Sort(args) => commands::sort::execute(args),
            Commands::Insert(args) => commands::insert::execute(args),
            Commands::MergeTool(args) => commands::merge_tool::execute(args, &output),
        }
    }
}
