//! Tree view rendering
//!
//! Displays the flattened rows of the active view with expanders,
//! status badges and dimmed descriptions.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::nodes::{FlatNode, NodeKind};
use super::Styles;

/// Share of the content width given to the tree, in percent
pub const TREE_WIDTH_PERCENT: u16 = 55;
/// Maximum visual indentation depth (to prevent deep files from being invisible)
const MAX_VISUAL_INDENT: usize = 6;

/// Tree widget for the active view
pub struct TreeView<'a> {
    /// Visible rows
    pub rows: &'a [FlatNode<'a>],
    /// Current cursor position
    pub cursor: usize,
    /// Scroll offset
    pub scroll: usize,
    /// View title shown in the border
    pub title: &'a str,
    /// Whether the tree has focus
    pub focused: bool,
    /// Styles
    pub styles: &'a Styles,
}

impl Widget for TreeView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.styles.border_focus
        } else {
            self.styles.border
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Span::styled(format!(" {} ", self.title), self.styles.popup_title));

        let inner = block.inner(area);
        block.render(area, buf);

        let visible_height = inner.height as usize;
        let width = inner.width as usize;

        for (i, row) in self.rows.iter().skip(self.scroll).take(visible_height).enumerate() {
            let y = inner.y + i as u16;
            let is_cursor = i + self.scroll == self.cursor;
            let style = if is_cursor {
                self.styles.tree_cursor
            } else {
                self.styles.tree_normal
            };

            let node = row.node;
            let mut spans = Vec::new();

            let visual_depth = row.depth.min(MAX_VISUAL_INDENT);
            spans.push(Span::styled("  ".repeat(visual_depth), style));
            if row.depth > MAX_VISUAL_INDENT {
                spans.push(Span::styled(
                    format!("{}·", row.depth - MAX_VISUAL_INDENT),
                    self.styles.tree_description,
                ));
            }

            if node.is_expandable() {
                let icon = if node.expanded { "▼ " } else { "▶ " };
                spans.push(Span::styled(icon, self.styles.folder_icon));
            } else {
                spans.push(Span::styled("  ", style));
            }

            // Leading badge
            match &node.kind {
                NodeKind::Change(change) => {
                    spans.push(Span::styled(
                        format!("{} ", change.status.letter()),
                        self.styles.status(change.status),
                    ));
                }
                NodeKind::Worktree(worktree) if worktree.is_current => {
                    spans.push(Span::styled("* ", self.styles.worktree_current));
                }
                _ => {}
            }

            // Trailing badge
            let trailing = match &node.kind {
                NodeKind::Worktree(worktree) if worktree.is_locked => Some(" [locked]"),
                _ => None,
            };

            let used: usize = spans.iter().map(|s| s.content.width()).sum();
            let trailing_width = trailing.map_or(0, |t| t.width());
            let available = width.saturating_sub(used + trailing_width);

            let label_style = if node.kind == NodeKind::Text {
                self.styles.tree_message
            } else {
                style
            };
            let label = smart_truncate(&node.label, available);
            let label_width = label.width();
            spans.push(Span::styled(label, label_style));

            let remaining = available.saturating_sub(label_width);
            if !node.description.is_empty() && remaining > 2 {
                let description = smart_truncate(&node.description, remaining - 1);
                spans.push(Span::styled(format!(" {}", description), self.styles.tree_description));
            }

            if let Some(trailing) = trailing {
                let used: usize = spans.iter().map(|s| s.content.width()).sum();
                let padding = width.saturating_sub(used + trailing_width);
                spans.push(Span::styled(" ".repeat(padding), style));
                spans.push(Span::styled(trailing, self.styles.worktree_locked));
            }

            let line = Line::from(spans);
            buf.set_line(inner.x, y, &line, inner.width);

            // Fill background for cursor line
            if is_cursor {
                for x in inner.x..inner.x + inner.width {
                    buf[(x, y)].set_bg(self.styles.tree_cursor.bg.unwrap_or_default());
                }
            }
        }
    }
}

/// Smart truncate: shows beginning…end for better context
///
/// For "very_long_filename.tsx" with max 12 this keeps the extension:
/// "very_lo….tsx".
pub fn smart_truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    if max_width < 5 {
        return s.chars().take(max_width).collect();
    }

    let available = max_width - 1;
    // More room for the beginning, where the unique part usually is
    let prefix_len = (available * 2) / 3;
    let suffix_len = available - prefix_len;

    let prefix: String = s.chars().take(prefix_len).collect();
    let suffix: String = s.chars().rev().take(suffix_len).collect::<Vec<_>>().into_iter().rev().collect();

    format!("{}…{}", prefix, suffix)
}

/// Rows that fit inside a tree view of `area_height`
pub fn visible_rows(area_height: u16) -> usize {
    area_height.saturating_sub(2) as usize
}

/// Render the tree view
pub fn render_tree_view(
    buf: &mut Buffer,
    area: Rect,
    rows: &[FlatNode<'_>],
    cursor: usize,
    scroll: usize,
    title: &str,
    focused: bool,
    styles: &Styles,
) {
    let view = TreeView {
        rows,
        cursor,
        scroll,
        title,
        focused,
        styles,
    };
    view.render(area, buf);
}
