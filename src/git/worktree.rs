//! Git worktree discovery
//!
//! Lists the main and linked worktrees of a repository together with
//! their checked out branch, HEAD commit and lock state.

use std::path::{Path, PathBuf};

use git2::{Repository, WorktreeLockStatus};

use super::Error;

/// Represents a git worktree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worktree {
    /// Absolute path to the worktree directory
    pub path: PathBuf,
    /// Branch name (if not detached)
    pub branch: Option<String>,
    /// Full hash of the checked out commit (None on an unborn branch)
    pub head: Option<String>,
    /// Whether `git worktree lock` was applied
    pub is_locked: bool,
    /// Whether this is the repository's main worktree
    pub is_main: bool,
    /// Whether this is the worktree the app is looking at
    pub is_current: bool,
}

impl Worktree {
    /// Last path segment, used as the display name
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    /// Abbreviated HEAD hash
    pub fn short_head(&self) -> &str {
        self.head
            .as_deref()
            .map(|h| h.get(..7).unwrap_or(h))
            .unwrap_or("")
    }
}

/// List all worktrees for the repository
///
/// Returns a vector of worktrees including the main worktree
/// and any linked worktrees.
pub fn list_worktrees(repo_path: &Path) -> Result<Vec<Worktree>, Error> {
    let repo = Repository::discover(repo_path)?;

    // Linked worktrees discover as themselves; start from the shared main repo
    let repo = if repo.is_worktree() {
        Repository::open(repo.commondir())?
    } else {
        repo
    };

    let mut worktrees = Vec::new();

    // Add the main worktree
    if let Some(workdir) = repo.workdir() {
        worktrees.push(Worktree {
            path: normalize(workdir),
            branch: current_branch(&repo),
            head: head_hash(&repo),
            is_locked: false,
            is_main: true,
            is_current: false,
        });
    }

    // Add linked worktrees
    let names = repo.worktrees()?;
    for name in names.iter().flatten() {
        let wt = match repo.find_worktree(name) {
            Ok(wt) => wt,
            Err(e) => {
                log::warn!("skipping worktree {}: {}", name, e);
                continue;
            }
        };

        let is_locked = matches!(wt.is_locked(), Ok(WorktreeLockStatus::Locked(_)));
        let (branch, head) = match Repository::open_from_worktree(&wt) {
            Ok(wt_repo) => (current_branch(&wt_repo), head_hash(&wt_repo)),
            // Pruned or moved worktrees still show up, just without state
            Err(_) => (None, None),
        };

        worktrees.push(Worktree {
            path: normalize(wt.path()),
            branch,
            head,
            is_locked,
            is_main: false,
            is_current: false,
        });
    }

    Ok(worktrees)
}

/// Find which worktree contains the given path
///
/// Returns the index of the matching worktree in the list,
/// using the longest matching path prefix.
pub fn find_current_worktree(worktrees: &mut [Worktree], current_path: &Path) -> Option<usize> {
    let canonical = current_path
        .canonicalize()
        .unwrap_or_else(|_| current_path.to_path_buf());

    let mut best_match: Option<(usize, usize)> = None; // (index, path_len)

    for (i, wt) in worktrees.iter().enumerate() {
        let wt_canonical = wt.path.canonicalize().unwrap_or_else(|_| wt.path.clone());
        if canonical.starts_with(&wt_canonical) {
            let len = wt_canonical.as_os_str().len();
            if best_match.map_or(true, |(_, best_len)| len > best_len) {
                best_match = Some((i, len));
            }
        }
    }

    for wt in worktrees.iter_mut() {
        wt.is_current = false;
    }

    let (idx, _) = best_match?;
    worktrees[idx].is_current = true;
    Some(idx)
}

/// Get the current branch name from a repository
pub(crate) fn current_branch(repo: &Repository) -> Option<String> {
    repo.head().ok().and_then(|head| {
        if head.is_branch() {
            head.shorthand().map(|s| s.to_string())
        } else {
            // Detached HEAD
            None
        }
    })
}

/// Full hash HEAD points at, if any
pub(crate) fn head_hash(repo: &Repository) -> Option<String> {
    repo.head()
        .ok()
        .and_then(|head| head.target())
        .map(|oid| oid.to_string())
}

/// git2 reports workdirs with a trailing separator
fn normalize(path: &Path) -> PathBuf {
    path.components().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worktree(path: &str) -> Worktree {
        Worktree {
            path: PathBuf::from(path),
            branch: Some("main".to_string()),
            head: Some("0123456789abcdef0123456789abcdef01234567".to_string()),
            is_locked: false,
            is_main: false,
            is_current: false,
        }
    }

    #[test]
    fn test_find_current_worktree_prefers_longest_prefix() {
        let mut worktrees = vec![
            worktree("/repo"),
            worktree("/repo/.worktrees/feature"),
        ];

        let idx = find_current_worktree(&mut worktrees, Path::new("/repo/.worktrees/feature/src"));

        assert_eq!(idx, Some(1));
        assert!(!worktrees[0].is_current);
        assert!(worktrees[1].is_current);
    }

    #[test]
    fn test_find_current_worktree_without_match() {
        let mut worktrees = vec![worktree("/repo")];
        worktrees[0].is_current = true;

        assert_eq!(find_current_worktree(&mut worktrees, Path::new("/elsewhere")), None);
        assert!(!worktrees[0].is_current);
    }

    #[test]
    fn test_display_helpers() {
        let wt = worktree("/repo/.worktrees/feature");
        assert_eq!(wt.name(), "feature");
        assert_eq!(wt.short_head(), "0123456");
    }

    #[test]
    fn test_normalize_strips_trailing_separator() {
        assert_eq!(normalize(Path::new("/repo/")), PathBuf::from("/repo"));
    }
}
