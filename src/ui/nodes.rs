//! View tree model
//!
//! Every view renders a forest of [`ViewNode`]s. A node carries its display
//! text (label, description, tooltip) computed when it is built, the git
//! object it stands for, and its children once they have been loaded.

use chrono::{DateTime, Utc};

use crate::git::{ChangeEntry, CommitRecord, Remote, Worktree};
use crate::time::{absolute_time, relative_time};
use crate::tree::{child_id, TreeNode};

/// What a node stands for
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A commit, or a stash entry when `stash` is set
    Commit { commit: CommitRecord, stash: bool },
    /// A directory grouping changes
    Folder,
    /// A file touched by a commit
    Change(ChangeEntry),
    Remote(Remote),
    Worktree(Worktree),
    /// Informational line, e.g. an empty view
    Text,
}

/// A row of a view tree
#[derive(Debug, Clone, PartialEq)]
pub struct ViewNode {
    /// Stable identity, unique within a view
    pub id: String,
    pub label: String,
    pub description: String,
    pub tooltip: String,
    pub kind: NodeKind,
    /// `None` until loaded
    pub children: Option<Vec<ViewNode>>,
    pub expanded: bool,
}

impl ViewNode {
    /// Commit node, `avatar_url` is shown in the tooltip
    pub fn commit(
        commit: CommitRecord,
        parent_id: Option<&str>,
        stash: bool,
        now: DateTime<Utc>,
        avatar_url: Option<&str>,
    ) -> Self {
        let relative = relative_time(commit.author_timestamp, now);

        let mut tooltip = vec![
            format!("{} ({}) -- {}", commit.author_name, commit.author_email, commit.short_hash()),
            String::new(),
            relative.clone(),
            absolute_time(commit.author_timestamp),
            String::new(),
            commit.message.clone(),
        ];
        if !commit.is_root() {
            tooltip.insert(4, format!("Parent: {}", commit.parent_short_hash()));
        }
        if let Some(url) = avatar_url {
            tooltip.push(String::new());
            tooltip.push(format!("Avatar: {}", url));
        }

        let label = if stash {
            format!("stash@{{{}}}: {}", commit.index, commit.summary())
        } else {
            commit.summary().to_string()
        };

        Self {
            id: child_id(parent_id, &commit.hash),
            label,
            description: relative,
            tooltip: tooltip.join("\n"),
            kind: NodeKind::Commit { commit, stash },
            children: None,
            expanded: false,
        }
    }

    /// Change node under the node `parent_id`
    pub fn change(change: ChangeEntry, parent_id: &str) -> Self {
        Self {
            id: child_id(Some(parent_id), &change.rel_path),
            label: change.file_name().to_string(),
            description: change.dir_name().to_string(),
            tooltip: format!("{} • {}", change.rel_path, change.status),
            kind: NodeKind::Change(change),
            children: None,
            expanded: false,
        }
    }

    /// Collapsed folder with its children already loaded
    pub fn folder(id: String, name: String, children: Vec<ViewNode>) -> Self {
        Self {
            id,
            tooltip: name.clone(),
            label: name,
            description: String::new(),
            kind: NodeKind::Folder,
            children: Some(children),
            expanded: false,
        }
    }

    pub fn remote(remote: Remote) -> Self {
        let fetch_url = remote.fetch_url.clone().unwrap_or_default();

        let mut tooltip = vec![format!("Name: {}", remote.name), format!("FetchUrl: {}", fetch_url)];
        if let Some(push_url) = remote.distinct_push_url() {
            tooltip.push(format!("PushUrl: {}", push_url));
        }

        Self {
            id: child_id(None, &remote.name),
            label: remote.name.clone(),
            description: fetch_url,
            tooltip: tooltip.join("\n"),
            kind: NodeKind::Remote(remote),
            children: None,
            expanded: false,
        }
    }

    pub fn worktree(worktree: Worktree) -> Self {
        let branch = worktree.branch.as_deref().unwrap_or("(detached)");
        let path = worktree.path.to_string_lossy().into_owned();

        Self {
            id: child_id(None, &path),
            label: worktree.name(),
            description: format!("{} ({})", branch, worktree.short_head()),
            tooltip: [
                format!("Path: {}", path),
                format!("Branch: {}", branch),
                format!("Hash: {}", worktree.head.as_deref().unwrap_or("")),
            ]
            .join("\n"),
            kind: NodeKind::Worktree(worktree),
            children: None,
            expanded: false,
        }
    }

    pub fn text(text: &str) -> Self {
        Self {
            id: child_id(None, text),
            label: text.to_string(),
            description: String::new(),
            tooltip: String::new(),
            kind: NodeKind::Text,
            children: None,
            expanded: false,
        }
    }

    /// Whether the node can have children
    pub fn is_expandable(&self) -> bool {
        matches!(self.kind, NodeKind::Commit { .. } | NodeKind::Folder)
    }

    /// The commit this node belongs to, for copy-hash commands
    pub fn commit_hash(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Commit { commit, .. } => Some(&commit.hash),
            NodeKind::Change(change) => Some(&change.commit_hash),
            NodeKind::Worktree(worktree) => worktree.head.as_deref(),
            _ => None,
        }
    }
}

/// Convert a built change tree into folder and change nodes
///
/// Folder ids come from the tree; files hang off their folder, or off
/// `parent_id` at the top level.
pub fn from_change_tree(tree: Vec<TreeNode<ChangeEntry>>, parent_id: &str) -> Vec<ViewNode> {
    tree.into_iter()
        .map(|node| match node {
            TreeNode::File(change) => ViewNode::change(change, parent_id),
            TreeNode::Folder(folder) => {
                let children = from_change_tree(folder.children, &folder.id);
                ViewNode::folder(folder.id, folder.name, children)
            }
        })
        .collect()
}

/// A visible row: the node, its depth and its index path from the roots
#[derive(Debug)]
pub struct FlatNode<'a> {
    pub node: &'a ViewNode,
    pub depth: usize,
    pub path: Vec<usize>,
}

/// Flatten the expanded part of a forest into rows
pub fn flatten(nodes: &[ViewNode]) -> Vec<FlatNode<'_>> {
    let mut rows = Vec::new();
    flatten_into(nodes, 0, &mut Vec::new(), &mut rows);
    rows
}

fn flatten_into<'a>(nodes: &'a [ViewNode], depth: usize, path: &mut Vec<usize>, rows: &mut Vec<FlatNode<'a>>) {
    for (i, node) in nodes.iter().enumerate() {
        path.push(i);
        rows.push(FlatNode {
            node,
            depth,
            path: path.clone(),
        });

        if node.expanded {
            if let Some(children) = &node.children {
                flatten_into(children, depth + 1, path, rows);
            }
        }
        path.pop();
    }
}

/// Node at an index path
pub fn node_at<'a>(nodes: &'a [ViewNode], path: &[usize]) -> Option<&'a ViewNode> {
    let (first, rest) = path.split_first()?;
    let node = nodes.get(*first)?;
    if rest.is_empty() {
        Some(node)
    } else {
        node_at(node.children.as_deref()?, rest)
    }
}

/// Mutable node at an index path
pub fn node_at_mut<'a>(nodes: &'a mut [ViewNode], path: &[usize]) -> Option<&'a mut ViewNode> {
    let (first, rest) = path.split_first()?;
    let node = nodes.get_mut(*first)?;
    if rest.is_empty() {
        Some(node)
    } else {
        node_at_mut(node.children.as_deref_mut()?, rest)
    }
}

/// Ids of every expanded node
pub fn expanded_ids(nodes: &[ViewNode]) -> Vec<String> {
    let mut ids = Vec::new();
    for node in nodes {
        if node.expanded {
            ids.push(node.id.clone());
        }
        if let Some(children) = &node.children {
            ids.extend(expanded_ids(children));
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::ChangeStatus;
    use crate::tree::build_change_tree_under;
    use std::path::PathBuf;

    fn commit(hash: char, message: &str) -> CommitRecord {
        CommitRecord {
            hash: hash.to_string().repeat(40),
            parent_hashes: vec!["0".repeat(40)],
            author_name: "Jane Doe".to_string(),
            author_email: "jane@example.com".to_string(),
            author_timestamp: 1_700_000_000,
            commit_timestamp: 1_700_000_000,
            message: message.to_string(),
            index: 2,
        }
    }

    fn change(rel_path: &str, status: ChangeStatus) -> ChangeEntry {
        ChangeEntry {
            path: format!("/repo/{}", rel_path),
            original_path: format!("/repo/{}", rel_path),
            rel_path: rel_path.to_string(),
            original_rel_path: rel_path.to_string(),
            status,
            commit_hash: "a".repeat(40),
            parent_hash: "0".repeat(40),
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + 3 * 3600, 0).unwrap()
    }

    #[test]
    fn test_commit_node() {
        let node = ViewNode::commit(commit('a', "Fix it\n\nDetails"), None, false, now(), Some("https://avatar"));

        assert_eq!(node.id, format!("->{}", "a".repeat(40)));
        assert_eq!(node.label, "Fix it");
        assert_eq!(node.description, "3 hours ago");
        assert!(node.tooltip.starts_with("Jane Doe (jane@example.com) -- aaaaaaa\n\n3 hours ago\n"));
        assert!(node.tooltip.contains("\nParent: 0000000\n"));
        assert!(node.tooltip.contains("Fix it\n\nDetails"));
        assert!(node.tooltip.ends_with("Avatar: https://avatar"));
        assert!(node.is_expandable());
        assert!(node.children.is_none());
    }

    #[test]
    fn test_stash_node_label_and_nested_id() {
        let node = ViewNode::commit(commit('b', "WIP on main"), Some("->parent"), true, now(), None);
        assert_eq!(node.label, "stash@{2}: WIP on main");
        assert_eq!(node.id, format!("->parent->{}", "b".repeat(40)));
        assert!(!node.tooltip.contains("Avatar"));
    }

    #[test]
    fn test_change_node() {
        let node = ViewNode::change(change("src/ui/app.rs", ChangeStatus::Modified), "->abc");
        assert_eq!(node.id, "->abc->src/ui/app.rs");
        assert_eq!(node.label, "app.rs");
        assert_eq!(node.description, "src/ui");
        assert_eq!(node.tooltip, "src/ui/app.rs • Modified");
        assert!(!node.is_expandable());
        assert_eq!(node.commit_hash(), Some("a".repeat(40).as_str()));
    }

    #[test]
    fn test_remote_node_push_url() {
        let remote = Remote {
            name: "origin".to_string(),
            fetch_url: Some("https://github.com/a/b".to_string()),
            push_url: Some("git@github.com:a/b".to_string()),
        };
        let node = ViewNode::remote(remote);
        assert_eq!(node.description, "https://github.com/a/b");
        assert_eq!(node.tooltip, "Name: origin\nFetchUrl: https://github.com/a/b\nPushUrl: git@github.com:a/b");
    }

    #[test]
    fn test_worktree_node() {
        let worktree = Worktree {
            path: PathBuf::from("/work/feature"),
            branch: Some("feature".to_string()),
            head: Some("c".repeat(40)),
            is_locked: true,
            is_main: false,
            is_current: false,
        };
        let node = ViewNode::worktree(worktree);
        assert_eq!(node.label, "feature");
        assert_eq!(node.description, "feature (ccccccc)");
        assert!(node.tooltip.contains("Path: /work/feature"));
    }

    #[test]
    fn test_from_change_tree() {
        let changes = vec![
            change("README.md", ChangeStatus::Added),
            change("src/lib.rs", ChangeStatus::Modified),
            change("src/git/mod.rs", ChangeStatus::Deleted),
        ];
        let tree = build_change_tree_under(changes, "/repo", Some("->abc"));
        let nodes = from_change_tree(tree, "->abc");

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].id, "->abc->README.md");
        let src = &nodes[1];
        assert_eq!(src.kind, NodeKind::Folder);
        assert_eq!(src.id, "->abc->src");
        assert!(!src.expanded);

        let children = src.children.as_ref().unwrap();
        assert_eq!(children[0].id, "->abc->src->src/lib.rs");
        assert_eq!(children[1].id, "->abc->src->git");
    }

    #[test]
    fn test_flatten_follows_expansion() {
        let mut nodes = vec![
            ViewNode::folder(
                "->src".to_string(),
                "src".to_string(),
                vec![ViewNode::change(change("src/a.rs", ChangeStatus::Added), "->src")],
            ),
            ViewNode::text("tail"),
        ];

        assert_eq!(flatten(&nodes).len(), 2);

        node_at_mut(&mut nodes, &[0]).unwrap().expanded = true;
        let rows = flatten(&nodes);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].depth, 1);
        assert_eq!(rows[1].path, vec![0, 0]);
        assert_eq!(rows[1].node.label, "a.rs");
        assert_eq!(rows[2].path, vec![1]);

        assert_eq!(node_at(&nodes, &[0, 0]).map(|n| n.label.as_str()), Some("a.rs"));
        assert!(node_at(&nodes, &[1, 0]).is_none());
        assert_eq!(expanded_ids(&nodes), vec!["->src".to_string()]);
    }
}
