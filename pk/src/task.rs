//! Task records and the actions they carry

use std::fmt;
use std::path::Path;

use crate::error::FsOpsError;
use crate::fsops::PathBatch;

/// Signature of an in-process action: working directory plus argument list
pub type CallbackFn = fn(&Path, &[String]) -> Result<(), FsOpsError>;

/// A function reference paired with the arguments it is called with
#[derive(Clone)]
pub struct Callback {
    name: &'static str,
    func: CallbackFn,
    args: Vec<String>,
}

impl Callback {
    pub fn new<I, S>(name: &'static str, func: CallbackFn, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name,
            func,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `create_files` with the given literal paths
    pub fn create_files<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("create_files", create_files_in, paths)
    }

    /// `remove_files` with the given patterns, `**` acting as `*`
    pub fn remove_files<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("remove_files", remove_files_in, patterns)
    }

    /// `remove_files` with the given patterns, `**` crossing directories
    pub fn remove_files_recursive<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("remove_files_recursive", remove_files_recursive_in, patterns)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn call(&self, workdir: &Path) -> Result<(), FsOpsError> {
        (self.func)(workdir, &self.args)
    }
}

// Function pointers don't compare reliably; a callback is identified by name and arguments.
impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.args == other.args
    }
}

impl Eq for Callback {}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish()
    }
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.args.join(", "))
    }
}

fn create_files_in(workdir: &Path, args: &[String]) -> Result<(), FsOpsError> {
    PathBatch::new(workdir).create(args)
}

fn remove_files_in(workdir: &Path, args: &[String]) -> Result<(), FsOpsError> {
    PathBatch::new(workdir).remove(args, false)
}

fn remove_files_recursive_in(workdir: &Path, args: &[String]) -> Result<(), FsOpsError> {
    PathBatch::new(workdir).remove(args, true)
}

/// One unit of work within a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// External program and its arguments, run without a shell
    Command(Vec<String>),
    /// In-process function call
    Callback(Callback),
}

impl Action {
    pub fn command<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Action::Command(argv.into_iter().map(Into::into).collect())
    }
}

impl From<Callback> for Action {
    fn from(callback: Callback) -> Self {
        Action::Callback(callback)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Command(argv) => write!(f, "{}", argv.join(" ")),
            Action::Callback(callback) => write!(f, "{}", callback),
        }
    }
}

/// A named bundle of actions, run in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Task {
    pub basename: Option<String>,
    pub doc: Option<String>,
    pub actions: Vec<Action>,
}

impl Task {
    pub fn new(actions: Vec<Action>) -> Self {
        Self {
            actions,
            ..Default::default()
        }
    }

    pub fn named(basename: impl Into<String>, doc: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            basename: Some(basename.into()),
            doc: Some(doc.into()),
            actions,
        }
    }

    pub fn with_basename(mut self, basename: impl Into<String>) -> Self {
        self.basename = Some(basename.into());
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Task name, or `"<anonymous>"` when no basename is set
    pub fn name(&self) -> &str {
        self.basename.as_deref().unwrap_or("<anonymous>")
    }
}

/// Concatenate the actions of `tasks`, in order, into a new unnamed task
pub fn combine<'a, I>(tasks: I) -> Task
where
    I: IntoIterator<Item = &'a Task>,
{
    Task::new(tasks.into_iter().flat_map(|t| t.actions.iter().cloned()).collect())
}
