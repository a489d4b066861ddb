//! pypackage - Python package lifecycle task runner
//!
//! Scaffolds boilerplate files, cleans build artifacts, drives sphinx, runs
//! tests and builds distributions. Tasks are plain values holding an ordered
//! list of actions; an action is either an external command or a batch file
//! operation.
//!
//! # Example
//!
//! ```ignore
//! use pypackage::{Executor, ExecutorOptions, TaskRegistry, config::Config, tasks};
//!
//! let config = Config::load(None)?;
//! let registry = TaskRegistry::from_config(&config, tasks::DEFAULT_BUILDER);
//! let executor = Executor::new(ExecutorOptions::default());
//! executor.run_all(registry.resolve(&["clean", "test"])?)?;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod fsops;
pub mod task;
pub mod tasks;

pub use error::{ExecError, FsOpsError};
pub use executor::{Executor, ExecutorOptions};
pub use fsops::{PathBatch, create_files, remove_files, remove_files_recursive};
pub use task::{Action, Callback, Task, combine};
pub use tasks::TaskRegistry;
