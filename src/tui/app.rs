//! Application state and event loop

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    DefaultTerminal, Frame,
};

use crate::services::date_range::DAYS_IN_WEEK;
use crate::services::{CalendarHeatmap, CellKey};
use crate::types::{HeatmapOptions, Orientation, ValueRecord};

use super::theme::Theme;
use super::widgets::{heatmap::HeatmapView, help::HelpPopup};

const FOOTER_HINT: &str = "←↓↑→ move · Enter click · o/m/p/t toggle · ? help · q quit";

/// Last message written by the click callback or a failed option change
type StatusLine = Rc<RefCell<Option<String>>>;

/// Main application
pub struct App {
    heatmap: CalendarHeatmap,
    cursor: Option<CellKey>,
    theme: Theme,
    show_help: bool,
    should_quit: bool,
    status: StatusLine,
}

impl App {
    /// Wrap a heatmap, routing its clicks to the status line
    pub fn new(mut heatmap: CalendarHeatmap, theme: Theme) -> anyhow::Result<Self> {
        let status: StatusLine = Rc::default();
        let sink = Rc::clone(&status);
        let previous = heatmap.options().on_click.clone();
        heatmap.update_options(move |o| {
            o.on_click = Some(Rc::new(move |value: Option<&ValueRecord>| {
                if let Some(previous) = &previous {
                    previous(value);
                }
                *sink.borrow_mut() = Some(describe_click(value));
            }));
        })?;

        let mut app = Self {
            heatmap,
            cursor: None,
            theme,
            show_help: false,
            should_quit: false,
            status,
        };
        // Start on the most recent day
        let last = app.heatmap.rendered_keys().last();
        if let Some(key) = last {
            app.set_cursor(key);
        }
        Ok(app)
    }

    pub fn heatmap(&self) -> &CalendarHeatmap {
        &self.heatmap
    }

    pub fn cursor(&self) -> Option<CellKey> {
        self.cursor
    }

    pub fn status(&self) -> Option<String> {
        self.status.borrow().clone()
    }

    fn set_cursor(&mut self, key: CellKey) {
        self.cursor = Some(key);
        self.heatmap.hover_enter(key);
    }

    /// Move by whole weeks and days; moves onto unrendered cells are ignored
    fn move_cursor(&mut self, weeks: i64, days: i64) {
        let Some(current) = self.cursor else {
            return;
        };
        let target = current as i64 + weeks * DAYS_IN_WEEK as i64 + days;
        if let Ok(key) = CellKey::try_from(target) {
            if self.heatmap.is_rendered(key) {
                self.set_cursor(key);
            }
        }
    }

    /// Arrow keys follow the screen: along weeks on one axis, weekdays on the other
    fn move_screen(&mut self, dx: i64, dy: i64) {
        match self.heatmap.options().orientation {
            Orientation::Horizontal => self.move_cursor(dx, dy),
            Orientation::Vertical => self.move_cursor(dy, dx),
        }
    }

    /// Apply an option edit, then restore hover on the nearest rendered cell
    fn toggle(&mut self, edit: impl FnOnce(&mut HeatmapOptions)) {
        if let Err(err) = self.heatmap.update_options(edit) {
            *self.status.borrow_mut() = Some(format!("error: {err}"));
            return;
        }
        let nearest = self.cursor.and_then(|cursor| {
            self.heatmap
                .rendered_keys()
                .min_by_key(|&key| key.abs_diff(cursor))
        });
        self.cursor = None;
        if let Some(key) = nearest {
            self.set_cursor(key);
        }
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.show_help = !self.show_help;
            }
            KeyCode::Left | KeyCode::Char('h') => self.move_screen(-1, 0),
            KeyCode::Right | KeyCode::Char('l') => self.move_screen(1, 0),
            KeyCode::Up | KeyCode::Char('k') => self.move_screen(0, -1),
            KeyCode::Down | KeyCode::Char('j') => self.move_screen(0, 1),
            KeyCode::Enter => {
                if let Some(key) = self.cursor {
                    self.heatmap.click(key);
                }
            }
            KeyCode::Char('o') => self.toggle(|o| o.orientation = o.orientation.toggled()),
            KeyCode::Char('m') => self.toggle(|o| o.show_month_labels = !o.show_month_labels),
            KeyCode::Char('p') => {
                self.toggle(|o| o.show_out_of_range_days = !o.show_out_of_range_days)
            }
            KeyCode::Char('t') => self.toggle(|o| o.tooltip_enabled = !o.tooltip_enabled),
            _ => {}
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }

    fn cursor_summary(&self) -> String {
        let Some(key) = self.cursor else {
            return "no days in range".into();
        };
        let date = self.heatmap.range().date_for_offset(key);
        match self.heatmap.index().value_for(key) {
            Some(value) => format!("{} · {}", date.format("%a %Y-%m-%d"), value.count_label()),
            None => format!("{} · no data", date.format("%a %Y-%m-%d")),
        }
    }
}

fn describe_click(value: Option<&ValueRecord>) -> String {
    match value {
        Some(value) => format!("clicked {} ({})", value.date, value.count_label()),
        None => "clicked an empty day".into(),
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [grid_area, summary_area, footer_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let scene = self.heatmap.scene();
        HeatmapView::new(&scene, self.theme)
            .with_cursor(self.cursor)
            .render(grid_area, buf);

        let mut spans = vec![Span::styled(
            self.cursor_summary(),
            Style::default().fg(self.theme.date()),
        )];
        if let Some(status) = self.status() {
            let color = if status.starts_with("error") {
                self.theme.error()
            } else {
                self.theme.text()
            };
            spans.push(Span::raw("  "));
            spans.push(Span::styled(status, Style::default().fg(color)));
        }
        Paragraph::new(Line::from(spans)).render(summary_area, buf);

        Paragraph::new(Line::styled(
            FOOTER_HINT,
            Style::default().fg(self.theme.muted()),
        ))
        .render(footer_area, buf);

        if self.show_help {
            let popup_area = HelpPopup::centered_area(area);
            HelpPopup::new(self.theme).render(popup_area, buf);
        }
    }
}

/// Run the TUI application
pub fn run(heatmap: CalendarHeatmap) -> anyhow::Result<()> {
    // Detect before raw mode
    let theme = Theme::detect();
    let app = App::new(heatmap, theme)?;

    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, app);
    ratatui::restore();
    result
}

fn run_app(terminal: &mut DefaultTerminal, mut app: App) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::TooltipState;
    use chrono::NaiveDate;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_app() -> App {
        // 2020-12-24 .. 2021-01-06, Sunday weeks: keys 4..=17
        let options = HeatmapOptions::new(ymd(2021, 1, 6))
            .with_num_days(14)
            .with_tooltip(true);
        let values = vec![
            ValueRecord::new(ymd(2021, 1, 6), 5.0),
            ValueRecord::new(ymd(2020, 12, 30), 2.0),
        ];
        App::new(CalendarHeatmap::new(values, options).unwrap(), Theme::Dark).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn screen(app: &App, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_app_starts_on_last_day() {
        let app = make_app();
        assert_eq!(app.cursor(), Some(17));
        assert!(matches!(app.heatmap().tooltip_state(), TooltipState::Visible(_)));
        assert!(!app.should_quit());
    }

    #[test]
    fn test_app_quit_on_q() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_app_quit_on_esc() {
        let mut app = make_app();
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit());
    }

    #[test]
    fn test_horizontal_arrows() {
        let mut app = make_app();
        press(&mut app, KeyCode::Left);
        assert_eq!(app.cursor(), Some(10));
        press(&mut app, KeyCode::Up);
        assert_eq!(app.cursor(), Some(9));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.cursor(), Some(10));
    }

    #[test]
    fn test_moves_onto_hidden_cells_ignored() {
        let mut app = make_app();
        // Key 18 is trailing padding
        press(&mut app, KeyCode::Down);
        assert_eq!(app.cursor(), Some(17));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.cursor(), Some(17));
    }

    #[test]
    fn test_vertical_arrows_swap_axes() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char('o'));
        assert_eq!(app.heatmap().options().orientation, Orientation::Vertical);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.cursor(), Some(10));
        press(&mut app, KeyCode::Left);
        assert_eq!(app.cursor(), Some(9));
    }

    #[test]
    fn test_enter_clicks_into_status() {
        let mut app = make_app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.status().as_deref(), Some("clicked 2021-01-06 (5)"));

        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.status().as_deref(), Some("clicked an empty day"));
    }

    #[test]
    fn test_toggles_keep_cursor() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char('p'));
        assert!(app.heatmap().options().show_out_of_range_days);
        assert_eq!(app.cursor(), Some(17));

        // Move onto padding, then hide it again: cursor snaps back into range
        press(&mut app, KeyCode::Down);
        assert_eq!(app.cursor(), Some(18));
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.cursor(), Some(17));
    }

    #[test]
    fn test_tooltip_toggle() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char('t'));
        assert!(!app.heatmap().options().tooltip_enabled);
        assert_eq!(app.heatmap().tooltip_state(), &TooltipState::Hidden);
        press(&mut app, KeyCode::Char('t'));
        assert!(matches!(app.heatmap().tooltip_state(), TooltipState::Visible(_)));
    }

    #[test]
    fn test_month_label_toggle() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char('m'));
        assert!(!app.heatmap().options().show_month_labels);
        assert!(!screen(&app, 40, 12).contains("Jan"));
    }

    #[test]
    fn test_help_toggle() {
        let mut app = make_app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('?'));
        assert!(!app.show_help);
    }

    #[test]
    fn test_render_summary_and_grid() {
        let app = make_app();
        let text = screen(&app, 70, 12);
        assert!(text.contains("Jan"));
        assert!(text.contains("Wed 2021-01-06 · 5"));
        assert!(text.contains("q quit"));
    }

    #[test]
    fn test_single_day_window() {
        let options = HeatmapOptions::new(ymd(2021, 1, 6)).with_num_days(1);
        let heatmap = CalendarHeatmap::new(vec![], options).unwrap();
        let app = App::new(heatmap, Theme::Dark).unwrap();
        assert_eq!(app.cursor(), Some(3));
        assert!(screen(&app, 40, 12).contains("no data"));
    }
}
