//! commitree - Terminal UI for browsing a repository's history as trees
//!
//! Shows commits, stashes, remotes and worktrees of a local git
//! repository as expandable trees, with commands that shell out to git
//! (diff, revert, stash and worktree management).
//!
//! # Usage
//!
//! ```bash
//! commitree                    # Run in current directory
//! commitree /path/to/repo      # Run in specified repository
//! commitree --tree -n 100      # Group changes into folders, load 100 commits
//! ```

mod app;
mod avatar;
mod clipboard;
mod config;
mod git;
mod providers;
mod time;
mod tree;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use flexi_logger::{FileSpec, Logger, LoggerHandle};

use config::{Config, Overrides};

/// Terminal UI for browsing git commits, stashes, remotes and worktrees
#[derive(Parser, Debug)]
#[command(name = "commitree")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the repository (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Number of commits to load
    #[arg(short = 'n', long)]
    max_commits: Option<usize>,

    /// Show changed files grouped into folders
    #[arg(short, long)]
    tree: bool,

    /// Do not refresh when the repository changes
    #[arg(long)]
    no_watch: bool,

    /// Config file (defaults to config.yaml in the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level for the log file (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

/// Log to a file in the data directory, the terminal belongs to the UI
fn init_logging(level: &str) -> Result<Option<LoggerHandle>> {
    let Some(dirs) = Config::project_dirs() else {
        return Ok(None);
    };

    let handle = Logger::try_with_env_or_str(level)
        .context("Invalid log level")?
        .log_to_file(
            FileSpec::default()
                .directory(dirs.data_dir())
                .basename("commitree")
                .suppress_timestamp(),
        )
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .context("Failed to start logging")?;

    Ok(Some(handle))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    config.apply(&Overrides {
        max_commits: args.max_commits,
        view_as_tree: args.tree,
        no_watch: args.no_watch,
        log_level: args.log_level,
    });

    let _logger = init_logging(&config.log_level)?;
    log::info!("starting with {:?}", config);

    // Resolve the repository path
    let repo_path = args.path.canonicalize().unwrap_or_else(|_| args.path.clone());

    let mut app = app::App::new(&repo_path, config)?;
    app.run()?;

    Ok(())
}
