//! Footer rendering
//!
//! Displays keybinding hints for the active view, or the outcome of the
//! last command.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use super::Styles;
use crate::providers::ViewKind;

/// Result of the last command, shown until the next key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

/// Footer widget showing keybinding hints
pub struct Footer<'a> {
    /// Active view
    pub view: ViewKind,
    /// Message replacing the hints
    pub message: Option<&'a StatusMessage>,
    /// Styles
    pub styles: &'a Styles,
}

/// Hints for the keys specific to a view
fn view_hints(view: ViewKind) -> &'static [(&'static str, &'static str)] {
    match view {
        ViewKind::Commits => &[("t", "tree"), ("y/Y", "copy hash"), ("r", "revert")],
        ViewKind::Stashes => &[("a", "apply"), ("p", "pop"), ("d", "drop"), ("r", "revert")],
        ViewKind::Remotes => &[],
        ViewKind::Worktrees => &[("n", "new"), ("d", "remove"), ("L", "lock"), ("y", "copy hash")],
    }
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        // Clear the footer area
        for x in area.x..area.x + area.width {
            buf[(x, area.y)]
                .set_char(' ')
                .set_style(self.styles.footer);
        }

        let mut spans = vec![Span::styled(" ", self.styles.footer)];

        match self.message {
            Some(StatusMessage::Info(text)) => spans.push(Span::styled(text.as_str(), self.styles.message_ok)),
            Some(StatusMessage::Error(text)) => spans.push(Span::styled(text.as_str(), self.styles.message_error)),
            None => {
                let common = [("j/k", "move"), ("enter", "open"), ("tab", "view")];
                let trailing = [("R", "refresh"), ("?", "help"), ("q", "quit")];
                let hints = common.iter().chain(view_hints(self.view)).chain(trailing.iter());

                for (i, (key, desc)) in hints.enumerate() {
                    if i > 0 {
                        spans.push(Span::styled(" │ ", self.styles.footer));
                    }
                    spans.push(Span::styled(*key, self.styles.footer_key));
                    spans.push(Span::styled(format!(" {}", desc), self.styles.footer));
                }
            }
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

/// Render the footer bar
pub fn render_footer(buf: &mut Buffer, area: Rect, view: ViewKind, message: Option<&StatusMessage>, styles: &Styles) {
    let footer = Footer { view, message, styles };
    footer.render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(view: ViewKind, message: Option<&StatusMessage>) -> String {
        let area = Rect::new(0, 0, 120, 1);
        let mut buf = Buffer::empty(area);
        render_footer(&mut buf, area, view, message, &Styles::new());
        (0..area.width).map(|x| buf[(x, 0)].symbol()).collect()
    }

    #[test]
    fn test_hints_follow_view() {
        assert!(rendered(ViewKind::Stashes, None).contains("p pop"));
        assert!(!rendered(ViewKind::Commits, None).contains("pop"));
        assert!(rendered(ViewKind::Worktrees, None).contains("L lock"));
    }

    #[test]
    fn test_message_replaces_hints() {
        let message = StatusMessage::Error("git exited with code 1".to_string());
        let text = rendered(ViewKind::Commits, Some(&message));
        assert!(text.contains("git exited with code 1"));
        assert!(!text.contains("quit"));
    }
}
