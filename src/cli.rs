//! Code related to the CLI

use crate::console_utils::ColorOutputPolicy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Minimal edit-script diffs between two documents, split into lines, words or graphemes.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Option<Command>,

    /// The first file to compare against
    #[arg(required = true)]
    pub old: Option<PathBuf>,

    /// The file that the old file is compared against
    #[arg(required = true)]
    pub new: Option<PathBuf>,

    /// The diff algorithm to use.
    ///
    /// This overrides the algorithm set in the config. See `seqdiff list` for the options.
    #[arg(short, long)]
    pub algorithm: Option<String>,

    /// Specify which renderer tag to use.
    ///
    /// If this isn't set, the default renderer from the config is used.
    #[arg(short, long)]
    pub renderer: Option<String>,

    /// Use the config file at the given path.
    ///
    /// If this isn't set the config is read from the default location.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Ignore any config files and use the default config
    #[arg(short, long)]
    pub no_config: bool,

    /// Print debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Set the color output policy. Valid values are: "auto", "on", "off".
    ///
    /// "auto" will automatically detect whether colors should be applied by trying to determine
    /// whether the process is outputting to a TTY. "on" will enable output and "off" will
    /// disable color output regardless of whether the process detects a TTY.
    #[arg(long = "color-output", default_value_t)]
    pub color_output: ColorOutputPolicy,

    /// Replay the diff against both documents before rendering it.
    ///
    /// The command fails if either document can't be rebuilt from the other.
    #[arg(long)]
    pub check: bool,
}

/// Commands that don't run a diff
#[derive(Debug, Eq, PartialEq, Clone, Copy, Subcommand)]
pub enum Command {
    /// List the diff algorithms and renderers available in this build
    List,

    /// Dump the default config to stdout
    DumpDefaultConfig,

    /// Generate shell completion scripts for seqdiff
    GenCompletion {
        /// The shell to generate completion scripts for.
        ///
        /// This will print the shell completion script to stdout. bash, zsh, fish, elvish, and
        /// powershell are currently supported.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
