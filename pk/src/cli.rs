//! CLI argument parsing for pypackage

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::tasks::DEFAULT_BUILDER;

#[derive(Parser, Debug)]
#[command(name = "pk")]
#[command(author, version, about = "Python package lifecycle task runner", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Project directory to work in (default: current directory)
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run tasks in the given order (default tasks if none are named)
    Run {
        /// Task names
        tasks: Vec<String>,

        /// Sphinx builder used by the docs task
        #[arg(short, long, default_value = DEFAULT_BUILDER)]
        builder: String,

        /// Print the actions without running them
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Override runner verbosity (0, 1, 2)
        #[arg(short, long)]
        verbosity: Option<u8>,
    },

    /// List available tasks
    List,

    /// Create files and directories (paths are literal, never expanded)
    Create {
        /// Paths to create; a trailing '/' creates only the directory
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Remove files and directories matching glob patterns
    Remove {
        /// Glob patterns to remove
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Let '**' match across directory levels
        #[arg(short, long)]
        recursive: bool,
    },

    /// Write a pypackage.yml with the project metadata
    Install {
        /// Author's name
        #[arg(short, long, default_value = "")]
        author: String,

        /// Python package name
        #[arg(short, long, default_value = "")]
        project: String,

        /// GitHub repository name
        #[arg(short = 'g', long = "github-repo", default_value = "")]
        github_repo: String,

        /// Overwrite an existing pypackage.yml
        #[arg(short, long)]
        force: bool,
    },
}
