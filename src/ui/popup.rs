//! Popup overlays
//!
//! Confirmation prompt, text input prompt, and help overlay.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use super::Styles;

/// Render a centered popup overlay
fn render_centered_popup(buf: &mut Buffer, area: Rect, width: u16, height: u16, title: &str, styles: &Styles) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    // Calculate centered position
    let popup_x = area.x + (area.width - width) / 2;
    let popup_y = area.y + (area.height - height) / 2;
    let popup_area = Rect::new(popup_x, popup_y, width, height);

    // Clear the popup area
    Clear.render(popup_area, buf);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles.border_focus)
        .title(Span::styled(format!(" {} ", title), styles.popup_title))
        .style(styles.popup);

    let inner = block.inner(popup_area);
    block.render(popup_area, buf);

    inner
}

/// Render a yes/no confirmation
pub fn render_confirm_popup(buf: &mut Buffer, area: Rect, question: &str, styles: &Styles) {
    let width = (question.chars().count() as u16 + 6).max(30);
    let inner = render_centered_popup(buf, area, width, 5, "Confirm", styles);
    if inner.height < 2 {
        return;
    }

    buf.set_line(inner.x + 1, inner.y, &Line::styled(question, styles.popup), inner.width.saturating_sub(1));
    let keys = Line::from(vec![
        Span::styled(" y", styles.help_key),
        Span::styled(" confirm  ", styles.help_desc),
        Span::styled("n/Esc", styles.help_key),
        Span::styled(" cancel", styles.help_desc),
    ]);
    buf.set_line(inner.x, inner.y + inner.height - 1, &keys, inner.width);
}

/// Render a single-line text prompt
pub fn render_input_popup(buf: &mut Buffer, area: Rect, title: &str, prompt: &str, input: &str, styles: &Styles) {
    let width = area.width.saturating_sub(8).min(70);
    let inner = render_centered_popup(buf, area, width, 6, title, styles);
    if inner.height < 3 {
        return;
    }

    buf.set_line(inner.x + 1, inner.y, &Line::styled(prompt, styles.help_desc), inner.width.saturating_sub(1));

    // Keep the end of long input visible
    let room = inner.width.saturating_sub(4) as usize;
    let skip = input.chars().count().saturating_sub(room);
    let visible: String = input.chars().skip(skip).collect();
    buf.set_line(
        inner.x + 1,
        inner.y + 1,
        &Line::styled(format!("> {}█", visible), styles.popup_title),
        inner.width.saturating_sub(1),
    );

    let keys = Line::from(vec![
        Span::styled(" Enter", styles.help_key),
        Span::styled(" accept  ", styles.help_desc),
        Span::styled("Esc", styles.help_key),
        Span::styled(" cancel", styles.help_desc),
    ]);
    buf.set_line(inner.x, inner.y + inner.height - 1, &keys, inner.width);
}

/// Render help overlay
pub fn render_help_popup(buf: &mut Buffer, area: Rect, styles: &Styles) {
    let help_items = [
        ("Navigation", ""),
        ("j/k", "Move down/up"),
        ("g/G", "Go to top/bottom"),
        ("Enter/l", "Expand, open diff or worktree"),
        ("h", "Collapse"),
        ("1-4/Tab", "Switch view"),
        ("J/K", "Scroll details"),
        ("", ""),
        ("Commits", ""),
        ("t", "Toggle view as tree"),
        ("y/Y", "Copy full/short hash"),
        ("r", "Revert file change"),
        ("", ""),
        ("Stashes", ""),
        ("a/p/d", "Apply/pop/drop stash"),
        ("", ""),
        ("Worktrees", ""),
        ("n", "New worktree"),
        ("d", "Remove worktree"),
        ("L", "Lock/unlock worktree"),
        ("", ""),
        ("R", "Refresh"),
        ("?", "Toggle this help"),
        ("q", "Quit"),
    ];

    let inner = render_centered_popup(buf, area, 50, help_items.len() as u16 + 2, "Help", styles);

    for (i, (key, desc)) in help_items.iter().enumerate() {
        let y = inner.y + i as u16;
        if y >= inner.y + inner.height {
            break;
        }

        if key.is_empty() && desc.is_empty() {
            continue;
        }

        if desc.is_empty() {
            // Section header
            buf.set_line(
                inner.x,
                y,
                &Line::styled(format!(" {}", key), styles.popup_title),
                inner.width,
            );
        } else {
            let line = Line::from(vec![
                Span::styled(format!("  {:>12} ", key), styles.help_key),
                Span::styled(*desc, styles.help_desc),
            ]);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(buf: &Buffer, area: Rect) -> String {
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_confirm_popup() {
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        render_confirm_popup(&mut buf, area, "Drop stash@{0}?", &Styles::new());

        let text = text(&buf, area);
        assert!(text.contains("Confirm"));
        assert!(text.contains("Drop stash@{0}?"));
    }

    #[test]
    fn test_input_popup_shows_tail_of_input() {
        let area = Rect::new(0, 0, 30, 10);
        let mut buf = Buffer::empty(area);
        let input = "/a/very/long/path/to/some/new/worktree";
        render_input_popup(&mut buf, area, "New worktree", "Path", input, &Styles::new());

        let text = text(&buf, area);
        assert!(text.contains("new/worktree"));
        assert!(!text.contains("/a/very"));
    }

    #[test]
    fn test_popups_fit_tiny_areas() {
        let area = Rect::new(0, 0, 8, 3);
        let mut buf = Buffer::empty(area);
        render_help_popup(&mut buf, area, &Styles::new());
        render_confirm_popup(&mut buf, area, "Remove?", &Styles::new());
        render_input_popup(&mut buf, area, "t", "p", "x", &Styles::new());
    }
}
