//! Detail pane rendering
//!
//! Shows the tooltip of the selected node, or the patch of a change
//! that was opened, coloured by line prefix.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use super::Styles;

/// What the detail pane shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    /// Plain text describing the selected node
    Info(String),
    /// `git diff` output for one change
    Patch { title: String, text: String },
}

impl Detail {
    pub fn title(&self) -> &str {
        match self {
            Detail::Info(_) => "Details",
            Detail::Patch { title, .. } => title,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Detail::Info(text) => text,
            Detail::Patch { text, .. } => text,
        }
    }

    pub fn is_patch(&self) -> bool {
        matches!(self, Detail::Patch { .. })
    }

    /// Largest scroll offset that still fills `height` rows
    pub fn max_scroll(&self, height: usize) -> usize {
        self.text().lines().count().saturating_sub(height)
    }
}

/// Detail pane widget
pub struct DetailPane<'a> {
    pub detail: &'a Detail,
    pub scroll: usize,
    pub focused: bool,
    pub styles: &'a Styles,
}

impl Widget for DetailPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.styles.border_focus
        } else {
            self.styles.border
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Span::styled(format!(" {} ", self.detail.title()), self.styles.popup_title));

        let inner = block.inner(area);
        block.render(area, buf);

        let is_patch = self.detail.is_patch();
        for (i, text) in self.detail.text().lines().skip(self.scroll).take(inner.height as usize).enumerate() {
            let style = if is_patch {
                self.styles.patch_line(text)
            } else {
                self.styles.line_context
            };
            // Tabs would desync cell positions
            let text = text.replace('\t', "    ");
            buf.set_line(inner.x, inner.y + i as u16, &Line::styled(text, style), inner.width);
        }
    }
}

/// Render the detail pane
pub fn render_detail(buf: &mut Buffer, area: Rect, detail: &Detail, scroll: usize, focused: bool, styles: &Styles) {
    DetailPane {
        detail,
        scroll,
        focused,
        styles,
    }
    .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_scroll() {
        let detail = Detail::Info("a\nb\nc\nd".to_string());
        assert_eq!(detail.max_scroll(2), 2);
        assert_eq!(detail.max_scroll(10), 0);
        assert_eq!(detail.title(), "Details");
    }

    #[test]
    fn test_patch_lines_are_coloured() {
        let styles = Styles::new();
        let detail = Detail::Patch {
            title: "src/main.rs".to_string(),
            text: "@@ -1 +1 @@\n-old\n+new".to_string(),
        };

        let area = Rect::new(0, 0, 30, 5);
        let mut buf = Buffer::empty(area);
        render_detail(&mut buf, area, &detail, 0, false, &styles);

        assert_eq!(buf[(1, 2)].symbol(), "-");
        assert_eq!(buf[(1, 2)].fg, styles.line_removed.fg.unwrap());
        assert_eq!(buf[(1, 3)].symbol(), "+");
        assert_eq!(buf[(1, 3)].bg, styles.line_added.bg.unwrap());
    }
}
