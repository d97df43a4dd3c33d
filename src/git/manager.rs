//! Repository operations
//!
//! [`GitManager`] is bound to a single repository and exposes the queries
//! the views need (commits, stashes, changes, remotes, worktrees) and the
//! mutations the commands run (revert, stash and worktree operations).
//!
//! Queries treat a failing `git` invocation as "no data": an empty
//! repository has no log, a repository without stashes has no stash list.

use std::path::{Path, PathBuf};

use git2::Repository;

use super::changes::{parse_name_status, ChangeEntry, ChangeStatus};
use super::command::{self, CommandOutput};
use super::commits::{parse_commit_log, CommitRecord, LOG_FORMAT};
use super::remote::{list_remotes, Remote};
use super::worktree::{current_branch, find_current_worktree, head_hash, list_worktrees, Worktree};
use super::Error;

/// Object id of the empty tree, present in every repository
pub const EMPTY_TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Treat file arguments as names, not globs or pathspec magic
const LITERAL_PATHSPECS: &str = "--literal-pathspecs";

/// Runs git against one repository
#[derive(Debug, Clone)]
pub struct GitManager {
    /// Root of the working tree
    root: PathBuf,
    /// The repository's git dir (`.git`, or `.git/worktrees/<name>`)
    git_dir: PathBuf,
    /// git executable
    git: String,
}

impl GitManager {
    /// Open the repository containing `path`
    pub fn open(path: &Path, git: impl Into<String>) -> Result<Self, Error> {
        let repo = Repository::discover(path)?;
        let root = repo
            .workdir()
            .ok_or_else(|| Error::NotFound(format!("working tree for {}", path.display())))?;

        Ok(Self {
            root: root.components().collect(),
            git_dir: repo.path().components().collect(),
            git: git.into(),
        })
    }

    /// Root of the working tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The repository's git dir
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Root as a `/` separated string, the prefix of every change path
    pub fn root_str(&self) -> String {
        self.root.to_string_lossy().replace('\\', "/")
    }

    /// Current HEAD commit, `None` for an unborn branch
    pub fn head_commit(&self) -> Option<String> {
        Repository::open(&self.root).ok().and_then(|repo| head_hash(&repo))
    }

    /// Checked out branch, `None` when HEAD is detached
    pub fn current_branch(&self) -> Option<String> {
        Repository::open(&self.root).ok().and_then(|repo| current_branch(&repo))
    }

    /// Directory name of the working tree
    pub fn name(&self) -> String {
        self.root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root_str())
    }

    /// Most recent `max` commits reachable from HEAD
    pub async fn fetch_commits(&self, max: usize) -> Vec<CommitRecord> {
        let format = format!("--format={}", LOG_FORMAT);
        let count = format!("-n{}", max);
        self.query_log(&["log", count.as_str(), format.as_str()]).await
    }

    /// Stash entries, `index` is the stash number
    pub async fn fetch_stashes(&self) -> Vec<CommitRecord> {
        let format = format!("--format={}", LOG_FORMAT);
        self.query_log(&["stash", "list", format.as_str()]).await
    }

    /// Commits brought in by a merge commit (empty for other commits)
    pub async fn fetch_merge_commits(&self, commit: &CommitRecord) -> Vec<CommitRecord> {
        if !commit.is_merge() {
            return Vec::new();
        }

        let format = format!("--format={}", LOG_FORMAT);
        let range = format!("{}..{}^2", commit.parent_hash(), commit.hash);
        self.query_log(&["log", format.as_str(), range.as_str()]).await
    }

    /// Files touched by `commit`, compared with its first parent
    pub async fn fetch_commit_changes(&self, commit: &CommitRecord) -> Vec<ChangeEntry> {
        let base = diff_base(commit);
        let args = ["diff", "--name-status", "-z", "-M", base, commit.hash.as_str()];

        match self.git(&args).await {
            Ok(output) if output.success() => parse_name_status(&output.stdout, &self.root, commit),
            Ok(output) => {
                log::warn!("cannot list changes of {}: {}", commit.short_hash(), output.stderr.trim());
                Vec::new()
            }
            Err(e) => {
                log::warn!("cannot list changes of {}: {}", commit.short_hash(), e);
                Vec::new()
            }
        }
    }

    /// Patch of a single change against the commit's parent
    pub async fn diff_change(&self, change: &ChangeEntry) -> Result<String, Error> {
        let base = if change.parent_hash == change.commit_hash {
            EMPTY_TREE
        } else {
            change.parent_hash.as_str()
        };

        let mut args = vec![LITERAL_PATHSPECS, "diff", "-M", base, change.commit_hash.as_str(), "--"];
        if change.is_rename() {
            args.push(change.original_rel_path.as_str());
        }
        args.push(change.rel_path.as_str());

        Ok(self.git(&args).await?.into_result()?.stdout)
    }

    /// Configured remotes
    pub fn fetch_remotes(&self) -> Vec<Remote> {
        list_remotes(&self.root).unwrap_or_else(|e| {
            log::warn!("cannot list remotes: {}", e);
            Vec::new()
        })
    }

    /// Worktrees of the repository, with the one at `root` marked current
    pub fn fetch_worktrees(&self) -> Vec<Worktree> {
        let mut worktrees = list_worktrees(&self.root).unwrap_or_else(|e| {
            log::warn!("cannot list worktrees: {}", e);
            Vec::new()
        });
        find_current_worktree(&mut worktrees, &self.root);
        worktrees
    }

    /// Undo `change` in the working tree by restoring the parent's version
    pub async fn revert_change(&self, change: &ChangeEntry) -> Result<(), Error> {
        log::info!("reverting {} from {}", change.rel_path, change.commit_hash);

        let output = match change.status {
            ChangeStatus::Added => {
                self.git(&[LITERAL_PATHSPECS, "rm", "-f", "--", change.rel_path.as_str()]).await?
            }
            ChangeStatus::Modified | ChangeStatus::Deleted | ChangeStatus::Renamed => {
                self.git(&[
                    LITERAL_PATHSPECS,
                    "checkout",
                    change.parent_hash.as_str(),
                    "--",
                    change.original_rel_path.as_str(),
                ])
                .await?
            }
        };

        output.into_result().map(|_| ())
    }

    /// `git stash apply stash@{index}`
    pub async fn stash_apply(&self, index: usize) -> Result<(), Error> {
        self.stash("apply", index).await
    }

    /// `git stash pop stash@{index}`
    pub async fn stash_pop(&self, index: usize) -> Result<(), Error> {
        self.stash("pop", index).await
    }

    /// `git stash drop stash@{index}`
    pub async fn stash_drop(&self, index: usize) -> Result<(), Error> {
        self.stash("drop", index).await
    }

    /// Create a worktree at `path`, on a new branch when `branch` is given
    pub async fn add_worktree(&self, path: &Path, branch: Option<&str>) -> Result<(), Error> {
        let path = path.to_string_lossy().into_owned();
        let mut args = vec!["worktree", "add"];
        if let Some(branch) = branch.filter(|b| !b.is_empty()) {
            args.push("-b");
            args.push(branch);
        }
        args.push(path.as_str());

        log::info!("adding worktree {}", path);
        self.git(&args).await?.into_result().map(|_| ())
    }

    /// `git worktree remove <path>`
    pub async fn remove_worktree(&self, path: &Path) -> Result<(), Error> {
        self.worktree("remove", path).await
    }

    /// `git worktree lock <path>`
    pub async fn lock_worktree(&self, path: &Path) -> Result<(), Error> {
        self.worktree("lock", path).await
    }

    /// `git worktree unlock <path>`
    pub async fn unlock_worktree(&self, path: &Path) -> Result<(), Error> {
        self.worktree("unlock", path).await
    }

    async fn stash(&self, op: &str, index: usize) -> Result<(), Error> {
        let reference = format!("stash@{{{}}}", index);
        log::info!("stash {} {}", op, reference);
        self.git(&["stash", op, reference.as_str()]).await?.into_result().map(|_| ())
    }

    async fn worktree(&self, op: &str, path: &Path) -> Result<(), Error> {
        let path = path.to_string_lossy().into_owned();
        log::info!("worktree {} {}", op, path);
        self.git(&["worktree", op, path.as_str()]).await?.into_result().map(|_| ())
    }

    /// Run a log-style query and parse its output, empty on failure
    async fn query_log(&self, args: &[&str]) -> Vec<CommitRecord> {
        match self.git(args).await {
            Ok(output) if output.success() => parse_commit_log(&output.stdout),
            Ok(output) => {
                // An empty repository has no log
                log::warn!("git {} failed: {}", args[0], output.stderr.trim());
                Vec::new()
            }
            Err(e) => {
                log::warn!("git {} failed: {}", args[0], e);
                Vec::new()
            }
        }
    }

    async fn git(&self, args: &[&str]) -> Result<CommandOutput, Error> {
        command::run(&self.git, args, &self.root).await
    }
}

/// What a commit's changes are compared against
fn diff_base(commit: &CommitRecord) -> &str {
    if commit.is_root() {
        EMPTY_TREE
    } else {
        commit.parent_hash()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::process::Command;
    use tempfile::TempDir;

    fn git_available() -> bool {
        Command::new("git").arg("--version").output().is_ok()
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(["-c", "user.name=Test User", "-c", "user.email=test@example.com"])
            .args(["-c", "commit.gpgsign=false", "-c", "init.defaultBranch=main"])
            .args(args)
            .current_dir(dir)
            .output()
            .expect("failed to run git");
        assert!(status.status.success(), "git {:?}: {}", args, String::from_utf8_lossy(&status.stderr));
    }

    fn write(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    /// Repository with three commits: add, modify + add nested, rename + delete
    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        git(root, &["init", "-q"]);
        write(root, "a.txt", "one\n");
        write(root, "gone.txt", "bye\n");
        git(root, &["add", "."]);
        git(root, &["commit", "-q", "-m", "initial"]);

        write(root, "a.txt", "one\ntwo\n");
        write(root, "dir/sub/c.txt", "nested\n");
        git(root, &["add", "."]);
        git(root, &["commit", "-q", "-m", "second\n\nwith a body"]);

        git(root, &["mv", "a.txt", "dir/a.txt"]);
        git(root, &["rm", "-q", "gone.txt"]);
        git(root, &["commit", "-q", "-m", "third"]);

        dir
    }

    fn manager(dir: &TempDir) -> GitManager {
        GitManager::open(dir.path(), "git").unwrap()
    }

    #[tokio::test]
    async fn test_fetch_commits() {
        if !git_available() {
            return;
        }
        let dir = fixture();
        let manager = manager(&dir);

        let commits = manager.fetch_commits(30).await;
        let messages: Vec<&str> = commits.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["third", "second\n\nwith a body", "initial"]);
        assert_eq!(commits[0].author_name, "Test User");
        assert_eq!(commits[0].parent_hashes, vec![commits[1].hash.clone()]);
        assert!(commits[2].is_root());
        assert_eq!(manager.head_commit().as_deref(), Some(commits[0].hash.as_str()));
        assert_eq!(manager.current_branch().as_deref(), Some("main"));
        assert_eq!(manager.name(), dir.path().file_name().unwrap().to_string_lossy());

        assert_eq!(manager.fetch_commits(1).await.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_repository_has_no_commits() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        git(dir.path(), &["init", "-q"]);
        let manager = manager(&dir);

        assert!(manager.fetch_commits(30).await.is_empty());
        assert!(manager.fetch_stashes().await.is_empty());
        assert!(manager.head_commit().is_none());
    }

    #[tokio::test]
    async fn test_fetch_commit_changes() {
        if !git_available() {
            return;
        }
        let dir = fixture();
        let manager = manager(&dir);
        let commits = manager.fetch_commits(30).await;

        let third = manager.fetch_commit_changes(&commits[0]).await;
        let renamed = third.iter().find(|c| c.status == ChangeStatus::Renamed).unwrap();
        assert_eq!(renamed.rel_path, "dir/a.txt");
        assert_eq!(renamed.original_rel_path, "a.txt");
        assert!(third.iter().any(|c| c.status == ChangeStatus::Deleted && c.rel_path == "gone.txt"));

        // Root commits are compared with the empty tree
        let initial = manager.fetch_commit_changes(&commits[2]).await;
        assert_eq!(initial.len(), 2);
        assert!(initial.iter().all(|c| c.status == ChangeStatus::Added));
        assert!(initial[0].path.starts_with(&manager.root_str()));
    }

    #[tokio::test]
    async fn test_diff_and_revert_change() {
        if !git_available() {
            return;
        }
        let dir = fixture();
        let manager = manager(&dir);
        let commits = manager.fetch_commits(30).await;

        let second = manager.fetch_commit_changes(&commits[1]).await;
        let modified = second.iter().find(|c| c.rel_path == "a.txt").unwrap();
        let patch = manager.diff_change(modified).await.unwrap();
        assert!(patch.contains("+two"));

        let added = second.iter().find(|c| c.rel_path == "dir/sub/c.txt").unwrap();
        manager.revert_change(added).await.unwrap();
        assert!(!dir.path().join("dir/sub/c.txt").exists());

        let third = manager.fetch_commit_changes(&commits[0]).await;
        let deleted = third.iter().find(|c| c.rel_path == "gone.txt").unwrap();
        manager.revert_change(deleted).await.unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("gone.txt")).unwrap(), "bye\n");
    }

    #[tokio::test]
    async fn test_unusual_file_names() {
        if !git_available() {
            return;
        }
        let dir = fixture();
        let root = dir.path();
        write(root, "\u{e4}nderung.txt", "neu\n");
        write(root, "notes/with space [1].md", "first\n");
        git(root, &["add", "."]);
        git(root, &["commit", "-q", "-m", "unusual names"]);

        write(root, "notes/with space [1].md", "first\nsecond\n");
        git(root, &["add", "."]);
        git(root, &["commit", "-q", "-m", "edit notes"]);

        let manager = manager(&dir);
        let commits = manager.fetch_commits(30).await;

        let added = manager.fetch_commit_changes(&commits[1]).await;
        let umlaut = added.iter().find(|c| c.rel_path == "\u{e4}nderung.txt").unwrap();
        assert_eq!(umlaut.path, format!("{}/\u{e4}nderung.txt", manager.root_str()));
        assert!(manager.diff_change(umlaut).await.unwrap().contains("+neu"));

        let edited = manager.fetch_commit_changes(&commits[0]).await;
        assert_eq!(edited.len(), 1);
        assert_eq!(edited[0].rel_path, "notes/with space [1].md");
        assert_eq!(edited[0].dir_name(), "notes");
        assert!(manager.diff_change(&edited[0]).await.unwrap().contains("+second"));

        manager.revert_change(&edited[0]).await.unwrap();
        assert_eq!(fs::read_to_string(root.join("notes/with space [1].md")).unwrap(), "first\n");

        manager.revert_change(umlaut).await.unwrap();
        assert!(!root.join("\u{e4}nderung.txt").exists());
    }

    #[tokio::test]
    async fn test_stash_operations() {
        if !git_available() {
            return;
        }
        let dir = fixture();
        let manager = manager(&dir);

        write(dir.path(), "dir/a.txt", "stashed\n");
        git(dir.path(), &["stash", "push", "-q", "-m", "first stash"]);
        write(dir.path(), "dir/a.txt", "again\n");
        git(dir.path(), &["stash", "push", "-q", "-m", "second stash"]);

        let stashes = manager.fetch_stashes().await;
        assert_eq!(stashes.len(), 2);
        assert_eq!(stashes[0].index, 0);
        assert!(stashes[0].message.contains("second stash"));

        manager.stash_drop(0).await.unwrap();
        let stashes = manager.fetch_stashes().await;
        assert_eq!(stashes.len(), 1);
        assert!(stashes[0].message.contains("first stash"));

        manager.stash_pop(0).await.unwrap();
        assert!(manager.fetch_stashes().await.is_empty());
        assert_eq!(fs::read_to_string(dir.path().join("dir/a.txt")).unwrap(), "stashed\n");

        assert!(matches!(manager.stash_apply(5).await, Err(Error::CommandFailed { .. })));
    }

    #[tokio::test]
    async fn test_worktree_lifecycle() {
        if !git_available() {
            return;
        }
        let dir = fixture();
        let manager = manager(&dir);
        let other = TempDir::new().unwrap();
        let wt_path = other.path().join("feature");

        manager.add_worktree(&wt_path, Some("feature")).await.unwrap();
        let worktrees = manager.fetch_worktrees();
        assert_eq!(worktrees.len(), 2);
        assert!(worktrees[0].is_main && worktrees[0].is_current);
        let linked = &worktrees[1];
        assert_eq!(linked.branch.as_deref(), Some("feature"));
        assert!(!linked.is_locked);

        manager.lock_worktree(&wt_path).await.unwrap();
        assert!(manager.fetch_worktrees()[1].is_locked);
        manager.unlock_worktree(&wt_path).await.unwrap();

        manager.remove_worktree(&wt_path).await.unwrap();
        assert_eq!(manager.fetch_worktrees().len(), 1);
    }

    #[tokio::test]
    async fn test_merge_commits() {
        if !git_available() {
            return;
        }
        let dir = fixture();
        let root = dir.path();
        git(root, &["checkout", "-q", "-b", "topic"]);
        write(root, "topic.txt", "topic\n");
        git(root, &["add", "."]);
        git(root, &["commit", "-q", "-m", "topic work"]);
        git(root, &["checkout", "-q", "-"]);
        write(root, "main.txt", "main\n");
        git(root, &["add", "."]);
        git(root, &["commit", "-q", "-m", "main work"]);
        git(root, &["merge", "-q", "--no-ff", "-m", "merge topic", "topic"]);

        let manager = manager(&dir);
        let commits = manager.fetch_commits(30).await;
        assert!(commits[0].is_merge());

        let merged = manager.fetch_merge_commits(&commits[0]).await;
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].message, "topic work");

        assert!(manager.fetch_merge_commits(&merged[0]).await.is_empty());
    }

    #[test]
    fn test_open_outside_repository() {
        let dir = TempDir::new().unwrap();
        assert!(GitManager::open(dir.path(), "git").is_err());
    }
}
