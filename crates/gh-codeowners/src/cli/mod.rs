//! CLI module for gh-codeowners.
//!
//! This module provides command-line argument parsing using Clap with
//! environment variable support matching the GitHub CLI's conventions.

pub mod commands;
pub mod config;
pub mod git;
pub mod github;
pub mod output;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use codeowners_annotate_core::remote::DEFAULT_HOST;

use config::Rgb;

/// GitHub CLI extension to check your CODEOWNERS file.
///
/// Fetches the errors GitHub reports for your CODEOWNERS file and lists them,
/// or renders the file with unknown owners highlighted.
#[derive(Parser, Debug)]
#[command(name = "gh-codeowners")]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Select another repository using the [HOST/]OWNER/REPO format.
    #[arg(long, short = 'R', env = "GH_REPO", global = true)]
    pub repo: Option<String>,

    /// GitHub host for repositories given without one.
    #[arg(long, env = "GH_HOST", default_value = DEFAULT_HOST, global = true)]
    pub hostname: String,

    /// GitHub token. Falls back to GITHUB_TOKEN or GH_ENTERPRISE_TOKEN, then
    /// to the token stored by `gh auth login`.
    #[arg(long, env = "GH_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Color for comments as #RRGGBB.
    #[arg(long, global = true)]
    pub color_comment: Option<Rgb>,

    /// Color for unknown owners as #RRGGBB.
    #[arg(long, global = true)]
    pub color_error: Option<Rgb>,

    /// Disable colored output. Also disabled when NO_COLOR is set.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase verbosity level (-v for info, -vv for debug, -vvv for trace).
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Checks CODEOWNERS for errors as determined by GitHub.
    Lint(LintArgs),

    /// Views the CODEOWNERS file with errors highlighted.
    ///
    /// Errors are fetched for the current branch.
    View,

    /// Views the owners for each file in a pull request.
    ///
    /// You must be in a repository to find the CODEOWNERS file.
    Pr(PrArgs),
}

/// Arguments for `lint`.
#[derive(ClapArgs, Debug, Clone, Default, PartialEq, Eq)]
pub struct LintArgs {
    /// Show owners only for the given filter.
    #[arg(long, short = 'f', value_enum, conflicts_with = "json")]
    pub filter: Option<Filter>,

    /// Output errors as JSON.
    #[arg(long, short = 'j')]
    pub json: bool,

    /// Branch or ref to check instead of the default branch.
    #[arg(long = "ref")]
    pub ref_name: Option<String>,
}

/// Arguments for `pr`.
#[derive(ClapArgs, Debug, Clone, PartialEq, Eq)]
pub struct PrArgs {
    /// Pull request number, optionally prefixed with '#'.
    #[arg(value_parser = parse_pr_number)]
    pub number: u64,
}

/// Filters for `lint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Filter {
    /// Owners GitHub could not resolve.
    Unknown,
}

/// Parses a pull request number such as `1234` or `#1234`.
pub fn parse_pr_number(number: &str) -> Result<u64, String> {
    let number = number.strip_prefix('#').unwrap_or(number);
    match number.parse::<u64>() {
        Ok(0) => Err("pull request numbers start at 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("parse pull request number: {}", e)),
    }
}

impl Args {
    /// Returns true if JSON goes to stdout, so logs must stay quiet.
    pub fn json_output(&self) -> bool {
        match &self.command {
            Command::Lint(lint) => lint.json,
            Command::Pr(_) => true,
            Command::View => false,
        }
    }
}
