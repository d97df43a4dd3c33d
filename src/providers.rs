//! View contents
//!
//! Loads the root nodes of each view and the children of expandable
//! nodes from a [`GitManager`]. Commit children are loaded lazily the
//! first time a commit is expanded.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::avatar::{AvatarCache, AvatarSource};
use crate::config::Config;
use crate::git::{CommitRecord, GitManager};
use crate::tree::build_change_tree_under;
use crate::ui::nodes::{self, from_change_tree, NodeKind, ViewNode};

/// The views the application can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Commits,
    Stashes,
    Remotes,
    Worktrees,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [ViewKind::Commits, ViewKind::Stashes, ViewKind::Remotes, ViewKind::Worktrees];

    pub fn title(self) -> &'static str {
        match self {
            ViewKind::Commits => "Commits",
            ViewKind::Stashes => "Stashes",
            ViewKind::Remotes => "Remotes",
            ViewKind::Worktrees => "Worktrees",
        }
    }

    /// Text shown when the view has nothing to list
    pub fn empty_message(self) -> &'static str {
        match self {
            ViewKind::Commits => "No commits could be found.",
            ViewKind::Stashes => "No stashes could be found.",
            ViewKind::Remotes => "No remotes could be found.",
            ViewKind::Worktrees => "No worktrees could be found.",
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|kind| *kind == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Whether a repository change should reload this view
    ///
    /// The commit list only moves with HEAD; the other views read state
    /// that any ref or index update can touch.
    pub fn refreshes_on_change(self, head_changed: bool) -> bool {
        match self {
            ViewKind::Commits => head_changed,
            ViewKind::Stashes | ViewKind::Remotes | ViewKind::Worktrees => true,
        }
    }
}

/// Everything needed to build nodes for one repository
pub struct LoadContext<'a> {
    pub git: &'a GitManager,
    pub config: &'a Config,
    pub avatars: &'a mut AvatarCache,
    pub avatar_source: AvatarSource,
    pub now: DateTime<Utc>,
}

impl LoadContext<'_> {
    fn commit_node(&mut self, commit: CommitRecord, parent_id: Option<&str>, stash: bool) -> ViewNode {
        let avatar = if commit.author_email.is_empty() {
            None
        } else {
            Some(self.avatars.url(&commit.author_email, self.avatar_source).to_string())
        };
        ViewNode::commit(commit, parent_id, stash, self.now, avatar.as_deref())
    }
}

/// Root nodes of a view, or a single text node when it is empty
pub async fn load_roots(kind: ViewKind, ctx: &mut LoadContext<'_>) -> Vec<ViewNode> {
    let roots: Vec<ViewNode> = match kind {
        ViewKind::Commits => {
            let commits = ctx.git.fetch_commits(ctx.config.max_commits).await;
            commits.into_iter().map(|c| ctx.commit_node(c, None, false)).collect()
        }
        ViewKind::Stashes => {
            let stashes = ctx.git.fetch_stashes().await;
            stashes.into_iter().map(|c| ctx.commit_node(c, None, true)).collect()
        }
        ViewKind::Remotes => ctx.git.fetch_remotes().into_iter().map(ViewNode::remote).collect(),
        ViewKind::Worktrees => ctx.git.fetch_worktrees().into_iter().map(ViewNode::worktree).collect(),
    };

    log::debug!("loaded {} {} nodes", roots.len(), kind.title());

    if roots.is_empty() {
        vec![ViewNode::text(kind.empty_message())]
    } else {
        roots
    }
}

/// Children of an expandable node
///
/// A merge commit lists the commits it brought in (unless disabled or the
/// node is a stash); other commits list their changed files, flat or as a
/// folder tree.
pub async fn load_children(node: &ViewNode, ctx: &mut LoadContext<'_>) -> Vec<ViewNode> {
    let (commit, stash) = match &node.kind {
        NodeKind::Commit { commit, stash } => (commit, *stash),
        NodeKind::Folder => return node.children.clone().unwrap_or_default(),
        _ => return Vec::new(),
    };

    if !stash && ctx.config.show_merge_children && commit.is_merge() {
        let merged = ctx.git.fetch_merge_commits(commit).await;
        return merged
            .into_iter()
            .map(|c| ctx.commit_node(c, Some(&node.id), false))
            .collect();
    }

    let changes = ctx.git.fetch_commit_changes(commit).await;
    if ctx.config.view_as_tree {
        let tree = build_change_tree_under(changes, &ctx.git.root_str(), Some(&node.id));
        from_change_tree(tree, &node.id)
    } else {
        changes.into_iter().map(|change| ViewNode::change(change, &node.id)).collect()
    }
}

/// Expand the node at `path`, loading its children first if needed
pub async fn expand(roots: &mut [ViewNode], path: &[usize], ctx: &mut LoadContext<'_>) {
    let Some(node) = nodes::node_at_mut(roots, path) else {
        return;
    };
    if !node.is_expandable() {
        return;
    }

    if node.children.is_none() {
        let children = load_children(node, ctx).await;
        node.children = Some(children);
    }
    node.expanded = true;
}

/// Re-expand nodes whose ids were expanded before a reload
pub async fn restore_expanded(roots: &mut [ViewNode], expanded: &HashSet<String>, ctx: &mut LoadContext<'_>) {
    // Each pass expands one node, so this ends once nothing is pending
    loop {
        let pending = nodes::flatten(roots)
            .into_iter()
            .find(|row| !row.node.expanded && row.node.is_expandable() && expanded.contains(&row.node.id))
            .map(|row| row.path);

        match pending {
            Some(path) => expand(roots, &path, ctx).await,
            None => break,
        }
    }
}
