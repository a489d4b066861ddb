use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail};
use log::{LevelFilter, info};
use std::path::Path;

use pypackage::cli::{Cli, Command};
use pypackage::config::{CONFIG_FILE, Config};
use pypackage::{Executor, ExecutorOptions, PathBatch, TaskRegistry};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > RUST_LOG > warn
    let mut builder = match cli_log_level.or(config_log_level) {
        Some(s) => {
            let level = s.parse::<LevelFilter>().unwrap_or_else(|_| {
                eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", s);
                LevelFilter::Warn
            });
            let mut builder = env_logger::Builder::new();
            builder.filter_level(level);
            builder
        }
        None => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")),
    };
    builder.try_init().context("Failed to initialize logger")?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir).context(format!("Failed to enter {}", dir.display()))?;
    }

    // Log level first so warnings from the full config load are not lost
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("pypackage starting");

    match cli.command {
        Command::Run {
            tasks,
            builder,
            dry_run,
            verbosity,
        } => {
            let registry = TaskRegistry::from_config(&config, &builder);
            let selected = registry.resolve(&tasks)?;
            let executor = Executor::new(ExecutorOptions {
                verbosity: verbosity.unwrap_or(config.runner.verbosity),
                dry_run,
                ..Default::default()
            });
            executor.run_all(selected.iter().copied())?;
            if !dry_run {
                let names: Vec<&str> = selected.iter().map(|t| t.name()).collect();
                println!("{} Ran: {}", "✓".green(), names.join(", ").cyan());
            }
        }
        Command::List => {
            let registry = TaskRegistry::from_config(&config, pypackage::tasks::DEFAULT_BUILDER);
            for task in registry.tasks() {
                let marker = if registry.is_default(task.name()) { "*" } else { " " };
                println!(
                    "{} {:<16} {}",
                    marker.yellow(),
                    task.name().cyan(),
                    task.doc.as_deref().unwrap_or("").dimmed()
                );
            }
        }
        Command::Create { paths } => {
            PathBatch::current().create(&paths)?;
            println!("{} Ensured {} path(s)", "✓".green(), paths.len());
        }
        Command::Remove { patterns, recursive } => {
            PathBatch::current().remove(&patterns, recursive)?;
            println!("{} Removed matches for {} pattern(s)", "✓".green(), patterns.len());
        }
        Command::Install {
            author,
            project,
            github_repo,
            force,
        } => {
            let path = Path::new(CONFIG_FILE);
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", CONFIG_FILE);
            }
            let mut config = config;
            config.project.author = author;
            config.project.package = project;
            config.project.github_repo = github_repo;
            config.save(path)?;
            println!("{} Wrote {}", "✓".green(), CONFIG_FILE.cyan());
        }
    }

    Ok(())
}
