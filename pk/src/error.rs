//! Error types for batch file operations and task execution

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a batch create/remove call
#[derive(Debug, Error)]
pub enum FsOpsError {
    #[error("Invalid glob pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create file {path}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove {path}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path} while expanding '{pattern}'")]
    Expand {
        pattern: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while running a task's actions
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Task '{task}' has an empty command")]
    EmptyCommand { task: String },

    #[error("Task '{task}': failed to spawn `{command}`")]
    Spawn {
        task: String,
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Task '{task}': `{command}` exited with code {code}{output}")]
    CommandFailed {
        task: String,
        command: String,
        code: i32,
        output: String,
    },

    #[error("Task '{task}': {callback} failed")]
    CallbackFailed {
        task: String,
        callback: String,
        #[source]
        source: FsOpsError,
    },
}
