//! Python package lifecycle tasks
//!
//! Every task is a plain value built by a constructor function. The
//! [`TaskRegistry`] collects them for the runner; nothing registers itself.

use eyre::{Result, eyre};
use log::debug;

use crate::config::Config;
use crate::task::{Action, Callback, Task, combine};

/// Default sphinx builder
pub const DEFAULT_BUILDER: &str = "html";

pub fn setup_project() -> Task {
    Task::named(
        "setup_project",
        "Create basic project file structure",
        vec![Callback::create_files(["README.rst", "LICENSE.txt", "requirements.txt", "requirements-dev.txt"]).into()],
    )
}

pub fn setup_git() -> Task {
    Task::named("setup_git", "Initialize a git repository", vec![Action::command(["git", "init"])])
}

pub fn setup_coverage() -> Task {
    Task::named(
        "setup_coverage",
        "Create coverage configuration",
        vec![Callback::create_files([".coveragerc"]).into()],
    )
}

pub fn setup_pytest() -> Task {
    Task::named(
        "setup_pytest",
        "Create pytest configuration",
        vec![Callback::create_files(["pytest.ini", "conftest.py"]).into()],
    )
}

pub fn setup_tox() -> Task {
    Task::named(
        "setup_tox",
        "Create tox configuration",
        vec![Callback::create_files(["tox.ini"]).into()],
    )
}

pub fn setup_travis() -> Task {
    Task::named(
        "setup_travis",
        "Create Travis CI configuration",
        vec![Callback::create_files([".travis.yml"]).into()],
    )
}

pub fn setup_appveyor() -> Task {
    Task::named(
        "setup_appveyor",
        "Create AppVeyor configuration",
        vec![Callback::create_files(["appveyor.yml"]).into()],
    )
}

pub fn clean_build() -> Task {
    Task::named(
        "clean_build",
        "Clean build artifacts",
        vec![Callback::remove_files(["build/", "dist/", ".eggs/", "*.egg-info", "*.egg"]).into()],
    )
}

pub fn clean_pyc() -> Task {
    Task::named(
        "clean_pyc",
        "Clean python file artifacts",
        vec![Callback::remove_files_recursive(["**/*.pyc", "**/*.pyo", "**/*~", "**/__pycache__"]).into()],
    )
}

pub fn clean_test() -> Task {
    Task::named(
        "clean_test",
        "Clean test and coverage artifacts",
        vec![Callback::remove_files([".tox/", ".coverage", "htmlcov/"]).into()],
    )
}

pub fn clean() -> Task {
    combine([&clean_build(), &clean_pyc(), &clean_test()])
        .with_basename("clean")
        .with_doc("Clean build, python and test artifacts")
}

pub fn init_docs(config: &Config) -> Task {
    let project = &config.project;
    let sphinx = &config.sphinx;
    let argv = vec![
        sphinx.quickstart.clone(),
        sphinx.source_dir.to_string_lossy().into_owned(),
        "-p".to_string(),
        project.package.clone(),
        "-a".to_string(),
        project.author.clone(),
        "-v".to_string(),
        "0.1".to_string(),
        "-l".to_string(),
        "en".to_string(),
        "--makefile".to_string(),
        "--batchfile".to_string(),
        "--quiet".to_string(),
    ];
    Task::named(
        "init_docs",
        "Create a sphinx documentation skeleton",
        vec![Action::Command(argv)],
    )
}

pub fn clean_docs(config: &Config) -> Task {
    let build_path = config.sphinx.build_path();
    Task::named(
        "clean_docs",
        "Clean documentation build output",
        vec![Callback::remove_files([build_path.to_string_lossy()]).into()],
    )
}

pub fn apidocs(config: &Config) -> Task {
    let sphinx = &config.sphinx;
    let argv = vec![
        sphinx.apidoc.clone(),
        config.project.package.clone(),
        "-o".to_string(),
        sphinx.apidocs_path().to_string_lossy().into_owned(),
        "-E".to_string(),
        "--no-toc".to_string(),
        "--force".to_string(),
    ];
    Task::named("apidocs", "Generate API documentation sources", vec![Action::Command(argv)])
}

/// Build the documentation with `builder` into `<build-dir>/<builder>`
pub fn docs(config: &Config, builder: &str) -> Task {
    let sphinx = &config.sphinx;
    let mut argv = vec![
        sphinx.build.clone(),
        "-b".to_string(),
        builder.to_string(),
        sphinx.source_dir.to_string_lossy().into_owned(),
        sphinx.build_path().join(builder).to_string_lossy().into_owned(),
    ];
    argv.extend(sphinx.opts.split_whitespace().map(str::to_string));
    Task::named("docs", format!("Build docs with the '{}' builder", builder), vec![Action::Command(argv)])
}

/// Clean old docs, generate apidocs, build html and import it into the gh-pages branch
pub fn release_docs(config: &Config) -> Task {
    let html_dir = config.sphinx.build_path().join(DEFAULT_BUILDER);
    let ghp_import = Task::new(vec![Action::command([
        "ghp-import".to_string(),
        html_dir.to_string_lossy().into_owned(),
    ])]);
    combine([
        &clean_docs(config),
        &apidocs(config),
        &docs(config, DEFAULT_BUILDER),
        &ghp_import,
    ])
    .with_basename("release_docs")
    .with_doc("Rebuild the html docs and import them into the gh-pages branch")
}

pub fn coverage() -> Task {
    Task::named(
        "coverage",
        "Run the test suite under coverage",
        vec![Action::command(["coverage", "run", "-m", "pytest"])],
    )
}

pub fn test() -> Task {
    Task::named("test", "Run tests", vec![Action::command(["py.test"])])
}

pub fn dist() -> Task {
    Task::named(
        "dist",
        "Build Python distribution",
        vec![Action::command(["python", "setup.py", "sdist", "bdist_wheel"])],
    )
}

/// Ordered, caller-owned collection of tasks plus the names run by default
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
    default_tasks: Vec<String>,
}

impl TaskRegistry {
    pub fn new(default_tasks: Vec<String>) -> Self {
        Self {
            tasks: Vec::new(),
            default_tasks,
        }
    }

    /// All lifecycle tasks, with `builder` used for the `docs` task
    pub fn from_config(config: &Config, builder: &str) -> Self {
        let mut registry = Self::new(config.runner.default_tasks.clone());
        for task in [
            setup_project(),
            setup_git(),
            setup_coverage(),
            setup_pytest(),
            setup_tox(),
            setup_travis(),
            setup_appveyor(),
            clean_build(),
            clean_pyc(),
            clean_test(),
            clean(),
            init_docs(config),
            clean_docs(config),
            apidocs(config),
            docs(config, builder),
            release_docs(config),
            coverage(),
            test(),
            dist(),
        ] {
            registry.insert(task);
        }
        registry
    }

    /// Add a task, replacing any task with the same name in place
    pub fn insert(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.basename == task.basename) {
            Some(existing) => {
                debug!("TaskRegistry::insert: replacing {}", task.name());
                *existing = task;
            }
            None => self.tasks.push(task),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.basename.as_deref() == Some(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(Task::name)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn default_tasks(&self) -> &[String] {
        &self.default_tasks
    }

    pub fn is_default(&self, name: &str) -> bool {
        self.default_tasks.iter().any(|d| d == name)
    }

    /// Look up `names` in order; no names means the default tasks
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&Task>> {
        let wanted: Vec<&str> = if names.is_empty() {
            if self.default_tasks.is_empty() {
                return Err(eyre!("No tasks given and no default-tasks configured"));
            }
            self.default_tasks.iter().map(String::as_str).collect()
        } else {
            names.iter().map(AsRef::as_ref).collect()
        };

        wanted
            .into_iter()
            .map(|name| {
                self.get(name)
                    .ok_or_else(|| eyre!("Unknown task '{}' (see `pk list`)", name))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn commands(task: &Task) -> Vec<Vec<String>> {
        task.actions
            .iter()
            .filter_map(|a| match a {
                Action::Command(argv) => Some(argv.clone()),
                Action::Callback(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_clean_combines_in_order() {
        let clean = clean();
        let expected: Vec<Action> = [clean_build(), clean_pyc(), clean_test()]
            .into_iter()
            .flat_map(|t| t.actions)
            .collect();

        assert_eq!(clean.basename.as_deref(), Some("clean"));
        assert_eq!(clean.actions, expected);
    }

    #[test]
    fn test_docs_uses_builder_and_opts() {
        let mut config = Config::default();
        config.sphinx.opts = "-W  -q".to_string();

        let task = docs(&config, "latex");

        assert_eq!(
            commands(&task),
            vec![vec!["sphinx-build", "-b", "latex", "docs", "docs/_build/latex", "-W", "-q"]]
        );
    }

    #[test]
    fn test_init_docs_passes_metadata_through() {
        let mut config = Config::default();
        config.project.author = "Ada Lovelace".to_string();
        config.project.package = "engine".to_string();

        let argv = &commands(&init_docs(&config))[0];

        assert_eq!(argv[0], "sphinx-quickstart");
        assert!(argv.windows(2).any(|w| w == ["-a", "Ada Lovelace"]));
        assert!(argv.windows(2).any(|w| w == ["-p", "engine"]));
    }

    #[test]
    fn test_release_docs_order() {
        let config = Config::default();
        let task = release_docs(&config);

        let rendered: Vec<String> = task.actions.iter().map(ToString::to_string).collect();
        assert_eq!(rendered.len(), 4);
        assert_eq!(rendered[0], "remove_files(docs/_build)");
        assert!(rendered[1].starts_with("sphinx-apidoc"));
        assert!(rendered[2].starts_with("sphinx-build -b html"));
        assert_eq!(rendered[3], "ghp-import docs/_build/html");
    }

    #[test]
    fn test_setup_project_scaffolds_files() {
        let temp = TempDir::new().unwrap();

        for action in &setup_project().actions {
            if let Action::Callback(callback) = action {
                callback.call(temp.path()).unwrap();
            }
        }

        for file in ["README.rst", "LICENSE.txt", "requirements.txt", "requirements-dev.txt"] {
            assert!(temp.path().join(file).is_file(), "{} missing", file);
        }
    }

    #[test]
    fn test_registry_names_are_unique() {
        let registry = TaskRegistry::from_config(&Config::default(), DEFAULT_BUILDER);
        let mut names: Vec<&str> = registry.names().collect();
        let total = names.len();
        names.sort();
        names.dedup();

        assert_eq!(names.len(), total);
        assert!(registry.get("release_docs").is_some());
    }

    #[test]
    fn test_registry_insert_replaces() {
        let mut registry = TaskRegistry::new(Vec::new());
        registry.insert(test());
        registry.insert(Task::named("test", "Run tox", vec![Action::command(["tox"])]));

        assert_eq!(registry.tasks().len(), 1);
        assert_eq!(registry.get("test").and_then(|t| t.doc.as_deref()), Some("Run tox"));
    }

    #[test]
    fn test_resolve_named_in_order() {
        let registry = TaskRegistry::from_config(&Config::default(), DEFAULT_BUILDER);

        let tasks = registry.resolve(&["dist", "clean_build"]).unwrap();

        let names: Vec<&str> = tasks.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["dist", "clean_build"]);
    }

    #[test]
    fn test_resolve_defaults_and_errors() {
        let mut config = Config::default();
        let registry = TaskRegistry::from_config(&config, DEFAULT_BUILDER);
        let none: [&str; 0] = [];

        assert!(registry.resolve(&none).is_err());
        assert!(registry.resolve(&["nope"]).is_err());

        config.runner.default_tasks = vec!["clean".to_string(), "test".to_string()];
        let registry = TaskRegistry::from_config(&config, DEFAULT_BUILDER);
        let names: Vec<&str> = registry.resolve(&none).unwrap().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["clean", "test"]);
        assert!(registry.is_default("clean"));
    }
}
