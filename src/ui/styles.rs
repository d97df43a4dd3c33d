//! UI styles
//!
//! Defines consistent styling for the entire application.
//! Patches use a delta-like palette; change badges follow the usual
//! git status colours.

use ratatui::style::{Color, Modifier, Style};

use crate::git::ChangeStatus;

/// Color palette
pub mod colors {
    use ratatui::style::Color;

    // Base colors
    pub const FG: Color = Color::White;
    pub const DIM: Color = Color::DarkGray;

    // Patch colors (delta-like palette)
    pub const ADDED_BG: Color = Color::Rgb(35, 60, 35);
    pub const ADDED_FG: Color = Color::Rgb(120, 200, 120);
    pub const REMOVED_BG: Color = Color::Rgb(60, 35, 35);
    pub const REMOVED_FG: Color = Color::Rgb(200, 120, 120);

    // Change status badges
    pub const STATUS_ADDED: Color = Color::Green;
    pub const STATUS_MODIFIED: Color = Color::Yellow;
    pub const STATUS_DELETED: Color = Color::Red;
    pub const STATUS_RENAMED: Color = Color::Blue;

    // UI elements
    pub const HEADER_BG: Color = Color::Rgb(40, 44, 52);
    pub const HEADER_FG: Color = Color::White;
    pub const FOOTER_BG: Color = Color::Rgb(40, 44, 52);
    pub const FOOTER_FG: Color = Color::DarkGray;

    // Selection
    pub const CURSOR_BG: Color = Color::Rgb(80, 80, 100);

    // File headers
    pub const FILE_HEADER_BG: Color = Color::Rgb(50, 55, 65);
    pub const FILE_HEADER_FG: Color = Color::Cyan;

    // Hunk headers
    pub const HUNK_HEADER_FG: Color = Color::Magenta;

    // Borders
    pub const BORDER: Color = Color::DarkGray;
    pub const BORDER_FOCUS: Color = Color::Cyan;

    // Popup
    pub const POPUP_BG: Color = Color::Rgb(30, 34, 42);
    pub const POPUP_BORDER: Color = Color::Cyan;

    // Worktree
    pub const WORKTREE_CURRENT: Color = Color::Green;
    pub const WORKTREE_LOCKED: Color = Color::Yellow;

    // Status messages
    pub const MESSAGE_OK: Color = Color::Green;
    pub const MESSAGE_ERROR: Color = Color::Red;
}

/// Collection of styles used throughout the UI
#[derive(Clone)]
pub struct Styles {
    // Header/Footer
    pub header: Style,
    pub header_tab: Style,
    pub header_tab_active: Style,
    pub footer: Style,
    pub footer_key: Style,
    pub message_ok: Style,
    pub message_error: Style,

    // Patch content
    pub line_added: Style,
    pub line_removed: Style,
    pub line_context: Style,
    pub file_header: Style,
    pub hunk_header: Style,

    // Tree
    pub tree_normal: Style,
    pub tree_cursor: Style,
    pub tree_description: Style,
    pub tree_message: Style,
    pub folder_icon: Style,

    // Borders
    pub border: Style,
    pub border_focus: Style,

    // Popup
    pub popup: Style,
    pub popup_title: Style,

    // Worktree
    pub worktree_current: Style,
    pub worktree_locked: Style,

    // Help
    pub help_key: Style,
    pub help_desc: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self::new()
    }
}

impl Styles {
    /// Create a new Styles instance with default values
    pub fn new() -> Self {
        Self {
            // Header/Footer
            header: Style::default()
                .bg(colors::HEADER_BG)
                .fg(colors::HEADER_FG),
            header_tab: Style::default()
                .bg(colors::HEADER_BG)
                .fg(colors::DIM),
            header_tab_active: Style::default()
                .bg(colors::HEADER_BG)
                .fg(colors::BORDER_FOCUS)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            footer: Style::default()
                .bg(colors::FOOTER_BG)
                .fg(colors::FOOTER_FG),
            footer_key: Style::default()
                .fg(colors::HEADER_FG)
                .add_modifier(Modifier::BOLD),
            message_ok: Style::default()
                .bg(colors::FOOTER_BG)
                .fg(colors::MESSAGE_OK),
            message_error: Style::default()
                .bg(colors::FOOTER_BG)
                .fg(colors::MESSAGE_ERROR)
                .add_modifier(Modifier::BOLD),

            // Patch content
            line_added: Style::default()
                .bg(colors::ADDED_BG)
                .fg(colors::ADDED_FG),
            line_removed: Style::default()
                .bg(colors::REMOVED_BG)
                .fg(colors::REMOVED_FG),
            line_context: Style::default().fg(colors::FG),
            file_header: Style::default()
                .bg(colors::FILE_HEADER_BG)
                .fg(colors::FILE_HEADER_FG)
                .add_modifier(Modifier::BOLD),
            hunk_header: Style::default()
                .fg(colors::HUNK_HEADER_FG)
                .add_modifier(Modifier::ITALIC),

            // Tree
            tree_normal: Style::default().fg(colors::FG),
            tree_cursor: Style::default()
                .bg(colors::CURSOR_BG)
                .fg(colors::FG)
                .add_modifier(Modifier::BOLD),
            tree_description: Style::default().fg(colors::DIM),
            tree_message: Style::default()
                .fg(colors::DIM)
                .add_modifier(Modifier::ITALIC),
            folder_icon: Style::default().fg(colors::DIM),

            // Borders
            border: Style::default().fg(colors::BORDER),
            border_focus: Style::default().fg(colors::BORDER_FOCUS),

            // Popup
            popup: Style::default().bg(colors::POPUP_BG).fg(colors::FG),
            popup_title: Style::default()
                .fg(colors::POPUP_BORDER)
                .add_modifier(Modifier::BOLD),

            // Worktree
            worktree_current: Style::default()
                .fg(colors::WORKTREE_CURRENT)
                .add_modifier(Modifier::BOLD),
            worktree_locked: Style::default().fg(colors::WORKTREE_LOCKED),

            // Help
            help_key: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            help_desc: Style::default().fg(colors::DIM),
        }
    }

    /// Badge style for a change status
    pub fn status(&self, status: ChangeStatus) -> Style {
        let color = match status {
            ChangeStatus::Added => colors::STATUS_ADDED,
            ChangeStatus::Modified => colors::STATUS_MODIFIED,
            ChangeStatus::Deleted => colors::STATUS_DELETED,
            ChangeStatus::Renamed => colors::STATUS_RENAMED,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Style for one line of `git diff` output
    pub fn patch_line(&self, line: &str) -> Style {
        if line.starts_with("+++") || line.starts_with("---") || line.starts_with("diff --git") {
            self.file_header
        } else if line.starts_with("@@") {
            self.hunk_header
        } else if line.starts_with('+') {
            self.line_added
        } else if line.starts_with('-') {
            self.line_removed
        } else {
            self.line_context
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_line_styles() {
        let styles = Styles::new();
        assert_eq!(styles.patch_line("diff --git a/x b/x"), styles.file_header);
        assert_eq!(styles.patch_line("--- a/x"), styles.file_header);
        assert_eq!(styles.patch_line("@@ -1,2 +1,3 @@"), styles.hunk_header);
        assert_eq!(styles.patch_line("+added"), styles.line_added);
        assert_eq!(styles.patch_line("-removed"), styles.line_removed);
        assert_eq!(styles.patch_line(" context"), styles.line_context);
    }

    #[test]
    fn test_status_colors_differ() {
        let styles = Styles::new();
        assert_ne!(styles.status(ChangeStatus::Added), styles.status(ChangeStatus::Deleted));
        assert_eq!(styles.status(ChangeStatus::Renamed).fg, Some(colors::STATUS_RENAMED));
    }
}
