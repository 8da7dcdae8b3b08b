use clap::{Args, Parser, Subcommand, ValueEnum};
use seqdiff_core::Strategy;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "seqdiff",
    about = "Token-level diffs and unified patches",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Tokenization granularity
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    Chars,
    Words,
    WordsWithSpace,
    #[default]
    Lines,
    Css,
}

impl Mode {
    pub fn strategy(self) -> Strategy {
        match self {
            Mode::Chars => Strategy::Char,
            Mode::Words => Strategy::WORDS,
            Mode::WordsWithSpace => Strategy::WORDS_WITH_SPACE,
            Mode::Lines => Strategy::Line,
            Mode::Css => Strategy::Css,
        }
    }
}

/// How `diff` prints its edit script
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Plain,
    Html,
    Tuples,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the edit script between two files
    Diff(DiffArgs),
    /// Print a unified diff between two files
    Patch(PatchArgs),
    /// Apply a unified diff to a file
    Apply(ApplyArgs),
    /// Count inserted and deleted lines
    Stat(StatArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    /// Original file (`-` for stdin)
    pub old: PathBuf,
    /// Modified file (`-` for stdin)
    pub new: PathBuf,
    #[arg(short, long)]
    pub mode: Option<Mode>,
    #[arg(short, long)]
    pub format: Option<OutputFormat>,
}

#[derive(Args)]
pub struct PatchArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    /// File name written into the patch header (defaults to NEW)
    #[arg(long)]
    pub label: Option<String>,
    #[arg(long)]
    pub old_header: Option<String>,
    #[arg(long)]
    pub new_header: Option<String>,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// File the patch is applied to
    pub base: PathBuf,
    /// Unified diff (`-` for stdin)
    pub patch: PathBuf,
}

#[derive(Args)]
pub struct StatArgs {
    pub old: PathBuf,
    pub new: PathBuf,
}
