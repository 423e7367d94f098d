//! Help popup widget - displays keyboard shortcuts

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Width and height of the help popup
const POPUP_WIDTH: u16 = 42;
const POPUP_HEIGHT: u16 = 18;

/// Help popup widget showing keyboard shortcuts
pub struct HelpPopup {
    theme: Theme,
}

impl HelpPopup {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Calculate centered popup area
    pub fn centered_area(area: Rect) -> Rect {
        let x = area.x + (area.width.saturating_sub(POPUP_WIDTH)) / 2;
        let y = area.y + (area.height.saturating_sub(POPUP_HEIGHT)) / 2;
        Rect {
            x,
            y,
            width: POPUP_WIDTH.min(area.width),
            height: POPUP_HEIGHT.min(area.height),
        }
    }

    fn section_header(&self, title: &'static str) -> Line<'static> {
        Line::from(vec![Span::styled(
            title,
            Style::default()
                .fg(self.theme.date())
                .add_modifier(Modifier::BOLD),
        )])
    }
}

impl Default for HelpPopup {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl Widget for HelpPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Clear the area first (for overlay effect)
        Clear.render(area, buf);

        let title = format!(" calheat v{} ", VERSION);
        let block = Block::default()
            .title(title)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::vertical([
            Constraint::Length(1), // [0] Padding
            Constraint::Length(1), // [1] Cursor header
            Constraint::Length(1), // [2] Separator
            Constraint::Length(1), // [3] Arrows / hjkl
            Constraint::Length(1), // [4] Enter
            Constraint::Length(1), // [5] Padding
            Constraint::Length(1), // [6] Layout header
            Constraint::Length(1), // [7] Separator
            Constraint::Length(1), // [8] o
            Constraint::Length(1), // [9] m
            Constraint::Length(1), // [10] p
            Constraint::Length(1), // [11] t
            Constraint::Length(1), // [12] Padding
            Constraint::Length(1), // [13] q / ?
            Constraint::Length(1), // [14] Close hint
            Constraint::Min(0),
        ])
        .split(inner);

        let sep = "─".repeat(inner.width as usize);
        let sep_style = Style::default().fg(self.theme.muted());

        Paragraph::new(self.section_header("Cursor")).render(chunks[1], buf);
        buf.set_string(chunks[2].x, chunks[2].y, &sep, sep_style);
        render_keybinding(chunks[3], buf, "Arrows or h/j/k/l", "Move", self.theme);
        render_keybinding(chunks[4], buf, "Enter", "Click day", self.theme);

        Paragraph::new(self.section_header("Layout")).render(chunks[6], buf);
        buf.set_string(chunks[7].x, chunks[7].y, &sep, sep_style);
        render_keybinding(chunks[8], buf, "o", "Toggle orientation", self.theme);
        render_keybinding(chunks[9], buf, "m", "Toggle month labels", self.theme);
        render_keybinding(chunks[10], buf, "p", "Toggle padding days", self.theme);
        render_keybinding(chunks[11], buf, "t", "Toggle tooltip", self.theme);

        render_keybinding(chunks[13], buf, "q / Esc", "Quit", self.theme);

        let hint = Line::from(vec![Span::styled(
            "Press ? to close",
            Style::default().fg(self.theme.muted()),
        )]);
        Paragraph::new(hint)
            .alignment(Alignment::Center)
            .render(chunks[14], buf);
    }
}

/// Render a single keybinding line
fn render_keybinding(area: Rect, buf: &mut Buffer, key: &str, desc: &str, theme: Theme) {
    let line = Line::from(vec![
        Span::styled(
            format!("  {:<19}", key),
            Style::default().fg(theme.accent()),
        ),
        Span::styled(desc, Style::default().fg(theme.text())),
    ]);
    Paragraph::new(line)
        .alignment(Alignment::Left)
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_popup_centered_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup_area = HelpPopup::centered_area(area);

        assert_eq!(popup_area.width, POPUP_WIDTH);
        assert_eq!(popup_area.height, POPUP_HEIGHT);
        assert_eq!(popup_area.x, (100 - POPUP_WIDTH) / 2);
        assert_eq!(popup_area.y, (50 - POPUP_HEIGHT) / 2);
    }

    #[test]
    fn test_help_popup_small_terminal() {
        // Terminal smaller than popup
        let area = Rect::new(0, 0, 30, 10);
        let popup_area = HelpPopup::centered_area(area);

        assert_eq!(popup_area.width, 30);
        assert_eq!(popup_area.height, 10);
    }

    #[test]
    fn test_help_popup_lists_toggles() {
        let area = Rect::new(0, 0, POPUP_WIDTH, POPUP_HEIGHT);
        let mut buf = Buffer::empty(area);
        HelpPopup::default().render(area, &mut buf);

        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|pos| buf.cell(pos).unwrap().symbol().to_string())
            .collect();
        assert!(text.contains("Toggle orientation"));
        assert!(text.contains("Click day"));
    }
}
