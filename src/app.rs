//! Main application struct and event loop
//!
//! Contains the App struct with all application state,
//! and the main event loop for handling input and rendering.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseEvent, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::runtime::Runtime;

use crate::avatar::{AvatarCache, AvatarSource};
use crate::clipboard::copy_to_clipboard;
use crate::config::Config;
use crate::git::{primary_remote, ChangeEntry, GitManager, HeadTracker, RepoWatcher};
use crate::providers::{self, LoadContext, ViewKind};
use crate::ui::{
    nodes::{self, node_at, FlatNode},
    render_confirm_popup, render_detail, render_footer, render_header, render_help_popup, render_input_popup,
    render_tree_view,
    tree_view::{visible_rows, TREE_WIDTH_PERCENT},
    Detail, NodeKind, StatusMessage, Styles, ViewNode,
};

const MOUSE_SCROLL_LINES: usize = 3;

/// Command waiting for confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Revert(ChangeEntry),
    DropStash(usize),
    RemoveWorktree(PathBuf),
}

/// Stage of the new-worktree prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputStage {
    WorktreePath,
    WorktreeBranch { path: String },
}

/// View mode for the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMode {
    /// Main tree view
    Browse,
    /// Help overlay
    Help,
    /// Yes/no prompt for a destructive command
    Confirm { question: String, action: PendingAction },
    /// Text prompt
    Input { stage: InputStage, buffer: String },
}

/// Per-view tree and cursor
#[derive(Debug, Default)]
struct ViewState {
    roots: Vec<ViewNode>,
    cursor: usize,
    scroll: usize,
    /// Needs a reload before it is shown again
    stale: bool,
}

/// Main application state
pub struct App {
    // Window dimensions
    width: u16,
    height: u16,

    // Repository
    git: GitManager,
    branch: Option<String>,
    head: HeadTracker,
    watcher: Option<(RepoWatcher, Receiver<()>)>,

    // Loading
    runtime: Runtime,
    config: Config,
    avatars: AvatarCache,
    avatar_source: AvatarSource,

    // Views
    view: ViewKind,
    views: HashMap<ViewKind, ViewState>,

    // Detail pane
    patch: Option<Detail>,
    detail_scroll: usize,

    // Interaction
    mode: ViewMode,
    message: Option<StatusMessage>,

    styles: Styles,
}

impl App {
    /// Create a new App instance for the repository containing `path`
    pub fn new(path: &Path, config: Config) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;
        let git = GitManager::open(path, config.git.as_str())
            .with_context(|| format!("{} is not inside a git repository", path.display()))?;

        let mut app = Self {
            width: 0,
            height: 0,
            branch: None,
            head: HeadTracker::default(),
            watcher: None,
            git,
            runtime,
            config,
            avatars: AvatarCache::new(),
            avatar_source: AvatarSource::default(),
            view: ViewKind::Commits,
            views: HashMap::new(),
            patch: None,
            detail_scroll: 0,
            mode: ViewMode::Browse,
            message: None,
            styles: Styles::new(),
        };

        app.attach_repository();
        Ok(app)
    }

    /// (Re)initialize everything derived from the current repository
    fn attach_repository(&mut self) {
        log::info!("opening repository {}", self.git.root().display());

        self.branch = self.git.current_branch();
        self.head = HeadTracker::new(self.git.head_commit());

        let remotes = self.git.fetch_remotes();
        let host = primary_remote(&remotes).and_then(|remote| remote.host());
        self.avatar_source = AvatarSource::for_host(host, self.config.avatar_source);

        self.watcher = None;
        if self.config.watch {
            match RepoWatcher::new(self.git.root(), self.git.git_dir()) {
                Ok(watcher) => self.watcher = Some(watcher),
                Err(e) => log::warn!("cannot watch repository: {}", e),
            }
        }

        self.views.clear();
        self.patch = None;
        self.detail_scroll = 0;
        self.reload_view(self.view);
    }

    /// Reload a view, keeping expanded nodes and the cursor where possible
    fn reload_view(&mut self, kind: ViewKind) {
        let state = self.views.entry(kind).or_default();
        let expanded: HashSet<String> = nodes::expanded_ids(&state.roots).into_iter().collect();
        let selected = nodes::flatten(&state.roots)
            .get(state.cursor)
            .map(|row| row.node.id.clone());

        let mut ctx = LoadContext {
            git: &self.git,
            config: &self.config,
            avatars: &mut self.avatars,
            avatar_source: self.avatar_source,
            now: Utc::now(),
        };
        let roots = self.runtime.block_on(async {
            let mut roots = providers::load_roots(kind, &mut ctx).await;
            providers::restore_expanded(&mut roots, &expanded, &mut ctx).await;
            roots
        });

        state.roots = roots;
        state.stale = false;
        let rows = nodes::flatten(&state.roots);
        state.cursor = selected
            .and_then(|id| rows.iter().position(|row| row.node.id == id))
            .unwrap_or(state.cursor)
            .min(rows.len().saturating_sub(1));
        self.ensure_cursor_visible();
    }

    /// React to debounced repository changes
    fn poll_repository_changes(&mut self) {
        let Some((_, signals)) = &self.watcher else {
            return;
        };

        let mut changed = false;
        while signals.try_recv().is_ok() {
            changed = true;
        }
        if !changed {
            return;
        }

        let head_changed = self.head.update(self.git.head_commit());
        self.branch = self.git.current_branch();
        log::debug!("repository changed, head moved: {}", head_changed);

        for kind in ViewKind::ALL {
            if !kind.refreshes_on_change(head_changed) {
                continue;
            }
            if kind == self.view {
                self.reload_view(kind);
            } else if let Some(state) = self.views.get_mut(&kind) {
                state.stale = true;
            }
        }
    }

    fn state(&self) -> Option<&ViewState> {
        self.views.get(&self.view)
    }

    fn state_mut(&mut self) -> &mut ViewState {
        self.views.entry(self.view).or_default()
    }

    /// Path and node under the cursor
    fn selected(&self) -> Option<(Vec<usize>, &ViewNode)> {
        let state = self.state()?;
        let rows = nodes::flatten(&state.roots);
        let path = rows.get(state.cursor)?.path.clone();
        node_at(&state.roots, &path).map(|node| (path, node))
    }

    fn row_count(&self) -> usize {
        self.state().map_or(0, |state| nodes::flatten(&state.roots).len())
    }

    /// Run the application
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|frame| {
                self.width = frame.area().width;
                self.height = frame.area().height;
                self.render(frame);
            })?;

            if event::poll(Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key) {
                            return Ok(());
                        }
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Resize(w, h) => {
                        self.width = w;
                        self.height = h;
                        self.ensure_cursor_visible();
                    }
                    _ => {}
                }
            }

            self.poll_repository_changes();
        }
    }

    /// Render the application
    fn render(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();

        // Layout: header (1) + content + footer (1)
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
            .split(area);
        let (header_area, content_area, footer_area) = (chunks[0], chunks[1], chunks[2]);

        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(TREE_WIDTH_PERCENT), Constraint::Min(0)])
            .split(content_area);
        let (tree_area, detail_area) = (content_chunks[0], content_chunks[1]);

        let repo = self.git.name();
        render_header(frame.buffer_mut(), header_area, self.view, &repo, self.branch.as_deref(), &self.styles);

        let empty = ViewState::default();
        let state = self.views.get(&self.view).unwrap_or(&empty);
        let rows: Vec<FlatNode<'_>> = nodes::flatten(&state.roots);
        let patch_open = self.patch.is_some();

        render_tree_view(
            frame.buffer_mut(),
            tree_area,
            &rows,
            state.cursor,
            state.scroll,
            self.view.title(),
            !patch_open,
            &self.styles,
        );

        let info;
        let detail = match &self.patch {
            Some(patch) => patch,
            None => {
                info = Detail::Info(rows.get(state.cursor).map(|row| row.node.tooltip.clone()).unwrap_or_default());
                &info
            }
        };
        render_detail(frame.buffer_mut(), detail_area, detail, self.detail_scroll, patch_open, &self.styles);

        render_footer(frame.buffer_mut(), footer_area, self.view, self.message.as_ref(), &self.styles);

        match &self.mode {
            ViewMode::Browse => {}
            ViewMode::Help => render_help_popup(frame.buffer_mut(), area, &self.styles),
            ViewMode::Confirm { question, .. } => render_confirm_popup(frame.buffer_mut(), area, question, &self.styles),
            ViewMode::Input { stage, buffer } => {
                let prompt = match stage {
                    InputStage::WorktreePath => "Path of the new worktree".to_string(),
                    InputStage::WorktreeBranch { path } => {
                        format!("New branch for {} (empty to check out the path name)", path)
                    }
                };
                render_input_popup(frame.buffer_mut(), area, "New worktree", &prompt, buffer, &self.styles);
            }
        }
    }

    /// Handle keyboard input. Returns true if app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.mode {
            ViewMode::Browse => self.handle_browse_key(key),
            ViewMode::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
                    self.mode = ViewMode::Browse;
                }
                false
            }
            ViewMode::Confirm { .. } => {
                self.handle_confirm_key(key);
                false
            }
            ViewMode::Input { .. } => {
                self.handle_input_key(key);
                false
            }
        }
    }

    /// Handle keys in the tree view
    fn handle_browse_key(&mut self, key: KeyEvent) -> bool {
        self.message = None;

        match key.code {
            // Quit, or close an open patch first
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if self.patch.is_none() {
                    return true;
                }
                self.close_patch();
            }

            // Views
            KeyCode::Tab => self.switch_view(self.view.next()),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.switch_view(ViewKind::ALL[index]);
            }

            // Navigation
            KeyCode::Char('j') | KeyCode::Down => self.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-1),
            KeyCode::Char('g') | KeyCode::Home => self.set_cursor(0),
            KeyCode::Char('G') | KeyCode::End => self.set_cursor(usize::MAX),
            KeyCode::Char('J') | KeyCode::PageDown => self.scroll_detail(1),
            KeyCode::Char('K') | KeyCode::PageUp => self.scroll_detail(-1),
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => self.activate(key.code == KeyCode::Enter),
            KeyCode::Char('h') | KeyCode::Left => self.collapse(),

            // Commands
            KeyCode::Char('t') => self.toggle_view_as_tree(),
            KeyCode::Char('y') => self.copy_hash(false),
            KeyCode::Char('Y') => self.copy_hash(true),
            KeyCode::Char('r') => self.confirm_revert(),
            KeyCode::Char('a') => self.stash_command(StashOp::Apply),
            KeyCode::Char('p') => self.stash_command(StashOp::Pop),
            KeyCode::Char('d') => match self.view {
                ViewKind::Stashes => self.stash_command(StashOp::Drop),
                ViewKind::Worktrees => self.confirm_remove_worktree(),
                ViewKind::Commits | ViewKind::Remotes => {}
            },
            KeyCode::Char('n') if self.view == ViewKind::Worktrees => {
                self.mode = ViewMode::Input {
                    stage: InputStage::WorktreePath,
                    buffer: String::new(),
                };
            }
            KeyCode::Char('L') => self.toggle_worktree_lock(),
            KeyCode::Char('R') => {
                self.reload_view(self.view);
                self.message = Some(StatusMessage::Info(format!("{} refreshed", self.view.title())));
            }
            KeyCode::Char('?') => self.mode = ViewMode::Help,

            _ => {}
        }

        false
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                let mode = std::mem::replace(&mut self.mode, ViewMode::Browse);
                if let ViewMode::Confirm { action, .. } = mode {
                    self.run_action(action);
                }
            }
            KeyCode::Char('n') | KeyCode::Char('q') | KeyCode::Esc => self.mode = ViewMode::Browse,
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        let ViewMode::Input { stage, buffer } = &mut self.mode else {
            return;
        };

        match key.code {
            KeyCode::Esc => self.mode = ViewMode::Browse,
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Enter => match stage {
                InputStage::WorktreePath => {
                    let path = buffer.trim().to_string();
                    if path.is_empty() {
                        self.mode = ViewMode::Browse;
                    } else {
                        self.mode = ViewMode::Input {
                            stage: InputStage::WorktreeBranch { path },
                            buffer: String::new(),
                        };
                    }
                }
                InputStage::WorktreeBranch { path } => {
                    let input = path.clone();
                    let branch = buffer.trim().to_string();
                    self.mode = ViewMode::Browse;

                    let path = self.resolve_input_path(&input);
                    self.add_worktree(&path, &branch);
                }
            },
            _ => {}
        }
    }

    /// Relative paths are taken from the repository root
    fn resolve_input_path(&self, input: &str) -> PathBuf {
        let path = PathBuf::from(input);
        if path.is_absolute() {
            path
        } else {
            self.git.root().join(path)
        }
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let in_tree = (mouse.column as u32) < (self.width as u32 * TREE_WIDTH_PERCENT as u32 / 100);
        match mouse.kind {
            MouseEventKind::ScrollDown if in_tree => self.move_cursor(MOUSE_SCROLL_LINES as i32),
            MouseEventKind::ScrollUp if in_tree => self.move_cursor(-(MOUSE_SCROLL_LINES as i32)),
            MouseEventKind::ScrollDown => self.scroll_detail(MOUSE_SCROLL_LINES as i32),
            MouseEventKind::ScrollUp => self.scroll_detail(-(MOUSE_SCROLL_LINES as i32)),
            _ => {}
        }
    }

    fn switch_view(&mut self, kind: ViewKind) {
        self.view = kind;
        self.close_patch();
        let needs_load = self.views.get(&kind).is_none_or(|state| state.stale);
        if needs_load {
            self.reload_view(kind);
        }
    }

    fn close_patch(&mut self) {
        self.patch = None;
        self.detail_scroll = 0;
    }

    fn tree_height(&self) -> usize {
        // Header and footer take a row each
        visible_rows(self.height.saturating_sub(2))
    }

    fn move_cursor(&mut self, delta: i32) {
        let cursor = self.state().map_or(0, |state| state.cursor);
        let target = if delta >= 0 {
            cursor.saturating_add(delta as usize)
        } else {
            cursor.saturating_sub(delta.unsigned_abs() as usize)
        };
        self.set_cursor(target);
    }

    fn set_cursor(&mut self, index: usize) {
        let total = self.row_count();
        let state = self.state_mut();
        state.cursor = index.min(total.saturating_sub(1));
        self.close_patch();
        self.ensure_cursor_visible();
    }

    fn ensure_cursor_visible(&mut self) {
        let visible = self.tree_height();
        let total = self.row_count();
        let state = self.state_mut();
        if visible == 0 {
            return;
        }

        if state.cursor < state.scroll {
            state.scroll = state.cursor;
        } else if state.cursor >= state.scroll + visible {
            state.scroll = state.cursor + 1 - visible;
        }
        state.scroll = state.scroll.min(total.saturating_sub(visible));
    }

    fn scroll_detail(&mut self, delta: i32) {
        let height = self.tree_height();
        let max = match &self.patch {
            Some(patch) => patch.max_scroll(height),
            None => self
                .selected()
                .map_or(0, |(_, node)| Detail::Info(node.tooltip.clone()).max_scroll(height)),
        };

        let target = if delta >= 0 {
            self.detail_scroll.saturating_add(delta as usize)
        } else {
            self.detail_scroll.saturating_sub(delta.unsigned_abs() as usize)
        };
        self.detail_scroll = target.min(max);
    }

    /// Expand/collapse a node, open a change's patch, or switch to a worktree
    fn activate(&mut self, toggle: bool) {
        let Some((path, node)) = self.selected() else {
            return;
        };

        match &node.kind {
            NodeKind::Change(change) => {
                let change = change.clone();
                self.open_patch(&change);
            }
            NodeKind::Worktree(worktree) => {
                if worktree.is_current {
                    self.message = Some(StatusMessage::Info("Already in this worktree".to_string()));
                    return;
                }
                let target = worktree.path.clone();
                self.switch_repository(&target);
            }
            NodeKind::Commit { .. } | NodeKind::Folder => {
                if node.expanded {
                    if toggle {
                        self.set_expanded(&path, false);
                    }
                } else {
                    self.expand(&path);
                }
            }
            NodeKind::Remote(_) | NodeKind::Text => {}
        }
    }

    fn expand(&mut self, path: &[usize]) {
        let Some(state) = self.views.get_mut(&self.view) else {
            return;
        };

        let mut ctx = LoadContext {
            git: &self.git,
            config: &self.config,
            avatars: &mut self.avatars,
            avatar_source: self.avatar_source,
            now: Utc::now(),
        };
        self.runtime.block_on(providers::expand(&mut state.roots, path, &mut ctx));
    }

    fn set_expanded(&mut self, path: &[usize], expanded: bool) {
        if let Some(node) = nodes::node_at_mut(&mut self.state_mut().roots, path) {
            node.expanded = expanded;
        }
    }

    /// Collapse the selected node, or jump to its parent
    fn collapse(&mut self) {
        let Some((path, node)) = self.selected() else {
            return;
        };

        if node.expanded {
            self.set_expanded(&path, false);
            return;
        }

        if path.len() > 1 {
            let parent = &path[..path.len() - 1];
            let parent_row = self
                .state()
                .and_then(|state| nodes::flatten(&state.roots).iter().position(|row| row.path == parent));
            if let Some(index) = parent_row {
                self.set_cursor(index);
            }
        }
    }

    fn open_patch(&mut self, change: &ChangeEntry) {
        match self.runtime.block_on(self.git.diff_change(change)) {
            Ok(text) => {
                let text = if text.trim().is_empty() {
                    "No textual changes".to_string()
                } else {
                    text
                };
                let title = format!("{} @ {}", change.rel_path, &change.commit_hash[..7.min(change.commit_hash.len())]);
                self.patch = Some(Detail::Patch { title, text });
                self.detail_scroll = 0;
            }
            Err(e) => {
                log::error!("diff of {} failed: {}", change.rel_path, e);
                self.message = Some(StatusMessage::Error(format!("Cannot show diff: {}", e)));
            }
        }
    }

    fn switch_repository(&mut self, path: &Path) {
        match GitManager::open(path, self.config.git.as_str()) {
            Ok(git) => {
                self.git = git;
                self.attach_repository();
                self.message = Some(StatusMessage::Info(format!("Switched to {}", path.display())));
            }
            Err(e) => {
                log::error!("cannot open {}: {}", path.display(), e);
                self.message = Some(StatusMessage::Error(format!("Cannot open {}: {}", path.display(), e)));
            }
        }
    }

    fn toggle_view_as_tree(&mut self) {
        if self.view != ViewKind::Commits && self.view != ViewKind::Stashes {
            return;
        }
        self.config.view_as_tree = !self.config.view_as_tree;

        // Loaded children were built for the other layout
        for kind in [ViewKind::Commits, ViewKind::Stashes] {
            if let Some(state) = self.views.get_mut(&kind) {
                state.stale = true;
            }
        }
        self.reload_view(self.view);

        let layout = if self.config.view_as_tree { "tree" } else { "list" };
        self.message = Some(StatusMessage::Info(format!("Showing changes as a {}", layout)));
    }

    fn copy_hash(&mut self, short: bool) {
        let Some(hash) = self.selected().and_then(|(_, node)| node.commit_hash().map(str::to_string)) else {
            return;
        };
        let text = if short { hash.get(..7).unwrap_or(&hash) } else { hash.as_str() };

        self.message = Some(match copy_to_clipboard(text) {
            Ok(()) => StatusMessage::Info(format!("Copied {}", text)),
            Err(e) => {
                log::warn!("clipboard: {:#}", e);
                StatusMessage::Error(format!("{:#}", e))
            }
        });
    }

    fn confirm_revert(&mut self) {
        let Some((_, node)) = self.selected() else {
            return;
        };
        let NodeKind::Change(change) = &node.kind else {
            return;
        };

        self.mode = ViewMode::Confirm {
            question: format!("Revert {} to {}?", change.rel_path, &change.parent_hash[..7.min(change.parent_hash.len())]),
            action: PendingAction::Revert(change.clone()),
        };
    }

    /// Stash number of the selected stash, or of the stash a selected change belongs to
    fn selected_stash(&self) -> Option<usize> {
        let (path, _) = self.selected()?;
        let root = self.state()?.roots.get(*path.first()?)?;
        match &root.kind {
            NodeKind::Commit { commit, stash: true } => Some(commit.index),
            _ => None,
        }
    }

    fn stash_command(&mut self, op: StashOp) {
        if self.view != ViewKind::Stashes {
            return;
        }
        let Some(index) = self.selected_stash() else {
            return;
        };

        match op {
            StashOp::Drop => {
                self.mode = ViewMode::Confirm {
                    question: format!("Drop stash@{{{}}}?", index),
                    action: PendingAction::DropStash(index),
                };
            }
            StashOp::Apply | StashOp::Pop => {
                let result = if op == StashOp::Apply {
                    self.runtime.block_on(self.git.stash_apply(index))
                } else {
                    self.runtime.block_on(self.git.stash_pop(index))
                };
                let verb = if op == StashOp::Apply { "Applied" } else { "Popped" };
                self.report(result.map(|_| format!("{} stash@{{{}}}", verb, index)));
                self.reload_view(ViewKind::Stashes);
            }
        }
    }

    fn selected_worktree(&self) -> Option<crate::git::Worktree> {
        match &self.selected()?.1.kind {
            NodeKind::Worktree(worktree) => Some(worktree.clone()),
            _ => None,
        }
    }

    fn confirm_remove_worktree(&mut self) {
        let Some(worktree) = self.selected_worktree() else {
            return;
        };
        if worktree.is_main {
            self.message = Some(StatusMessage::Error("The main worktree cannot be removed".to_string()));
            return;
        }

        self.mode = ViewMode::Confirm {
            question: format!("Remove worktree {}?", worktree.path.display()),
            action: PendingAction::RemoveWorktree(worktree.path),
        };
    }

    fn toggle_worktree_lock(&mut self) {
        if self.view != ViewKind::Worktrees {
            return;
        }
        let Some(worktree) = self.selected_worktree() else {
            return;
        };

        let result = if worktree.is_locked {
            self.runtime
                .block_on(self.git.unlock_worktree(&worktree.path))
                .map(|_| format!("Unlocked {}", worktree.name()))
        } else {
            self.runtime
                .block_on(self.git.lock_worktree(&worktree.path))
                .map(|_| format!("Locked {}", worktree.name()))
        };
        self.report(result);
        self.reload_view(ViewKind::Worktrees);
    }

    fn add_worktree(&mut self, path: &Path, branch: &str) {
        let branch = if branch.is_empty() { None } else { Some(branch) };
        let result = self
            .runtime
            .block_on(self.git.add_worktree(path, branch))
            .map(|_| format!("Created worktree {}", path.display()));
        self.report(result);
        self.reload_view(ViewKind::Worktrees);
    }

    fn run_action(&mut self, action: PendingAction) {
        match action {
            PendingAction::Revert(change) => {
                let result = self
                    .runtime
                    .block_on(self.git.revert_change(&change))
                    .map(|_| format!("Reverted {}", change.rel_path));
                self.report(result);
            }
            PendingAction::DropStash(index) => {
                let result = self
                    .runtime
                    .block_on(self.git.stash_drop(index))
                    .map(|_| format!("Dropped stash@{{{}}}", index));
                self.report(result);
                self.reload_view(ViewKind::Stashes);
            }
            PendingAction::RemoveWorktree(path) => {
                let result = self
                    .runtime
                    .block_on(self.git.remove_worktree(&path))
                    .map(|_| format!("Removed worktree {}", path.display()));
                self.report(result);
                self.reload_view(ViewKind::Worktrees);
            }
        }
    }

    /// Show the outcome of a command in the footer
    fn report(&mut self, result: Result<String, crate::git::Error>) {
        self.message = Some(match result {
            Ok(text) => {
                log::info!("{}", text);
                StatusMessage::Info(text)
            }
            Err(e) => {
                log::error!("command failed: {}", e);
                StatusMessage::Error(e.to_string())
            }
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StashOp {
    Apply,
    Pop,
    Drop,
}
