//! Sequential task executor

use colored::*;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::ExecError;
use crate::task::{Action, Task};

/// Captured output longer than this is cut from the front when reported
const MAX_REPORTED_OUTPUT: usize = 30_000;

/// Options controlling how actions run
#[derive(Debug, Clone)]
pub struct ExecutorOptions {
    /// Working directory for commands and batch operations
    pub workdir: PathBuf,
    /// 0: capture output, 1: also echo commands, 2: inherit stdio
    pub verbosity: u8,
    /// Print actions instead of running them
    pub dry_run: bool,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from("."),
            verbosity: 0,
            dry_run: false,
        }
    }
}

/// Runs task actions one after another, stopping at the first failure
pub struct Executor {
    options: ExecutorOptions,
}

impl Executor {
    pub fn new(options: ExecutorOptions) -> Self {
        Self { options }
    }

    pub fn workdir(&self) -> &Path {
        &self.options.workdir
    }

    /// Run tasks in order, stopping at the first failing task
    pub fn run_all<'a, I>(&self, tasks: I) -> Result<(), ExecError>
    where
        I: IntoIterator<Item = &'a Task>,
    {
        for task in tasks {
            self.run(task)?;
        }
        Ok(())
    }

    /// Run every action of `task` in order
    pub fn run(&self, task: &Task) -> Result<(), ExecError> {
        info!("Running task {} ({} action(s))", task.name(), task.actions.len());
        if self.options.verbosity > 0 || self.options.dry_run {
            println!("{} {}", ".".cyan(), task.name().bold());
        }

        for action in &task.actions {
            if self.options.dry_run {
                println!("    {}", action.to_string().dimmed());
                continue;
            }
            match action {
                Action::Command(argv) => self.run_command(task.name(), argv)?,
                Action::Callback(callback) => {
                    debug!("Executor::run: calling {}", callback);
                    callback
                        .call(&self.options.workdir)
                        .map_err(|source| ExecError::CallbackFailed {
                            task: task.name().to_string(),
                            callback: callback.to_string(),
                            source,
                        })?;
                }
            }
        }
        Ok(())
    }

    fn run_command(&self, task: &str, argv: &[String]) -> Result<(), ExecError> {
        let Some((program, args)) = argv.split_first() else {
            return Err(ExecError::EmptyCommand { task: task.to_string() });
        };
        let command_line = argv.join(" ");
        debug!("Executor::run_command: {} in {}", command_line, self.options.workdir.display());

        if self.options.verbosity >= 1 {
            println!("    {}", command_line.dimmed());
        }

        let mut command = Command::new(program);
        command.args(args).current_dir(&self.options.workdir).stdin(Stdio::null());

        let spawn_error = |source| ExecError::Spawn {
            task: task.to_string(),
            command: command_line.clone(),
            source,
        };

        let (status, output) = if self.options.verbosity >= 2 {
            let status = command.status().map_err(spawn_error)?;
            (status, String::new())
        } else {
            let output = command.output().map_err(spawn_error)?;
            (output.status, combine_output(&output.stdout, &output.stderr))
        };

        if status.success() {
            debug!("Executor::run_command: {} succeeded", command_line);
            return Ok(());
        }

        let output = if output.is_empty() {
            output
        } else {
            format!("\n{}", truncate_front(&output, MAX_REPORTED_OUTPUT))
        };
        Err(ExecError::CommandFailed {
            task: task.to_string(),
            command: command_line,
            code: status.code().unwrap_or(-1),
            output,
        })
    }
}

fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    let stderr = String::from_utf8_lossy(stderr);
    if stdout.is_empty() {
        stderr.into_owned()
    } else if stderr.is_empty() {
        stdout.into_owned()
    } else {
        format!("{}\n\nSTDERR:\n{}", stdout, stderr)
    }
}

/// Keep the last `max` bytes, where failures usually report
fn truncate_front(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut start = text.len() - max;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    format!("[truncated, {} chars total]...\n{}", text.len(), &text[start..])
}
