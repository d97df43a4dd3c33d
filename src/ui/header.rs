//! Header rendering
//!
//! Displays the view tabs, and the repository and branch on the right.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use super::Styles;
use crate::providers::ViewKind;

/// Header widget showing tabs and repository info
pub struct Header<'a> {
    /// Active view
    pub active: ViewKind,
    /// Repository directory name
    pub repo: &'a str,
    /// Current branch, `None` when detached
    pub branch: Option<&'a str>,
    /// Styles
    pub styles: &'a Styles,
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        // Clear the header area
        for x in area.x..area.x + area.width {
            buf[(x, area.y)]
                .set_char(' ')
                .set_style(self.styles.header);
        }

        let mut spans = vec![Span::styled(" ", self.styles.header)];

        for (i, kind) in ViewKind::ALL.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", self.styles.footer));
            }
            let style = if *kind == self.active {
                self.styles.header_tab_active
            } else {
                self.styles.header_tab
            };
            spans.push(Span::styled(format!("{} {}", i + 1, kind.title()), style));
        }

        // Repository info (right-aligned)
        let info = format!(" {} @ {} ", self.repo, self.branch.unwrap_or("(detached)"));
        let left_width: usize = spans.iter().map(|s| s.content.width()).sum();
        let info_width = info.width();

        if left_width + info_width < area.width as usize {
            let padding = area.width as usize - left_width - info_width;
            spans.push(Span::styled(" ".repeat(padding), self.styles.header));
            spans.push(Span::styled(info, self.styles.header));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

/// Render the header bar
pub fn render_header(
    buf: &mut Buffer,
    area: Rect,
    active: ViewKind,
    repo: &str,
    branch: Option<&str>,
    styles: &Styles,
) {
    let header = Header {
        active,
        repo,
        branch,
        styles,
    };
    header.render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_shows_tabs_and_branch() {
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        render_header(&mut buf, area, ViewKind::Stashes, "project", Some("main"), &Styles::new());

        let text: String = (0..area.width).map(|x| buf[(x, 0)].symbol()).collect();
        assert!(text.contains("1 Commits"));
        assert!(text.contains("4 Worktrees"));
        assert!(text.trim_end().ends_with("project @ main"));
    }
}
