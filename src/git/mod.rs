//! Git operations module
//!
//! Provides functionality for interacting with git repositories:
//! - Commit log parsing and change listing
//! - Running git and the repository-level operations built on it
//! - Worktree and remote discovery
//! - Watching the repository for state changes

mod changes;
mod command;
mod commits;
mod error;
mod manager;
mod remote;
mod watch;
mod worktree;

pub use changes::{ChangeEntry, ChangeStatus};
pub use commits::CommitRecord;
pub use error::Error;
pub use manager::GitManager;
pub use remote::{primary_remote, Remote};
pub use watch::{HeadTracker, RepoWatcher};
pub use worktree::Worktree;
