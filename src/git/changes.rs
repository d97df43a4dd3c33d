//! Changed files of a commit
//!
//! Parses `git diff --name-status -z` output into change entries that carry
//! enough context (commit and parent hash, absolute paths) to be diffed or
//! reverted on their own.

use std::fmt;
use std::path::Path;

use super::commits::CommitRecord;
use crate::tree::Leaf;

/// How a file was touched by a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl ChangeStatus {
    /// Map a `--name-status` status code (`A`, `M`, `R100`, ...) to a status
    pub fn from_code(code: &str) -> Self {
        match code.chars().next() {
            Some('A') => ChangeStatus::Added,
            Some('M') | Some('T') => ChangeStatus::Modified,
            Some('D') => ChangeStatus::Deleted,
            _ => ChangeStatus::Renamed,
        }
    }

    /// Single letter badge
    pub fn letter(self) -> char {
        match self {
            ChangeStatus::Added => 'A',
            ChangeStatus::Modified => 'M',
            ChangeStatus::Deleted => 'D',
            ChangeStatus::Renamed => 'R',
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeStatus::Added => "Added",
            ChangeStatus::Modified => "Modified",
            ChangeStatus::Deleted => "Deleted",
            ChangeStatus::Renamed => "Renamed",
        };
        f.write_str(name)
    }
}

/// One file touched by a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    /// Absolute path, `/` separated
    pub path: String,
    /// Absolute path before a rename (same as `path` otherwise)
    pub original_path: String,
    /// Path relative to the repository root
    pub rel_path: String,
    /// Relative path before a rename
    pub original_rel_path: String,
    /// Kind of change
    pub status: ChangeStatus,
    /// Commit the change belongs to
    pub commit_hash: String,
    /// Commit the change is compared against
    pub parent_hash: String,
}

impl ChangeEntry {
    /// File name of the changed path
    pub fn file_name(&self) -> &str {
        self.rel_path.rsplit('/').next().unwrap_or(&self.rel_path)
    }

    /// Directory part of the relative path (empty at the root)
    pub fn dir_name(&self) -> &str {
        self.rel_path
            .rsplit_once('/')
            .map(|(dir, _)| dir)
            .unwrap_or("")
    }

    /// Whether the file moved
    pub fn is_rename(&self) -> bool {
        self.original_rel_path != self.rel_path
    }
}

impl Leaf for ChangeEntry {
    fn leaf_path(&self) -> Option<&str> {
        Some(&self.path)
    }
}

/// Parse `git diff --name-status -z` output for `commit`
///
/// Fields are NUL separated and paths are never quoted: `M\0path\0` for
/// most changes, `R087\0old\0new\0` for renames and copies. A truncated
/// trailing record is ignored.
pub fn parse_name_status(output: &str, root: &Path, commit: &CommitRecord) -> Vec<ChangeEntry> {
    let root = root.to_string_lossy().replace('\\', "/");
    let root = root.trim_end_matches('/');

    let mut fields = output.split('\0');
    let mut changes = Vec::new();

    while let Some(code) = fields.next() {
        let code = code.trim_start_matches('\n');
        if code.is_empty() {
            continue;
        }

        let Some(first) = fields.next() else {
            break;
        };

        // Renames and copies list the old path first
        let (original_rel_path, rel_path) = if code.starts_with(['R', 'C']) {
            match fields.next() {
                Some(new_path) => (first, new_path),
                None => break,
            }
        } else {
            (first, first)
        };

        changes.push(ChangeEntry {
            path: format!("{root}/{rel_path}"),
            original_path: format!("{root}/{original_rel_path}"),
            rel_path: rel_path.to_string(),
            original_rel_path: original_rel_path.to_string(),
            status: ChangeStatus::from_code(code),
            commit_hash: commit.hash.clone(),
            parent_hash: commit.parent_hash().to_string(),
        });
    }

    changes
}
