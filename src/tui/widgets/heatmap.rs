//! Terminal heatmap: paints a scene one character cell per day square

use chrono::Datelike;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::services::{CellKey, RectDescriptor, Scene};
use crate::tui::theme::Theme;
use crate::types::Orientation;

/// 2 chars content + 1 gap
const CELL_WIDTH: u16 = 3;
/// "Mon " prefix in horizontal mode
const LABEL_WIDTH: u16 = 4;

const SQUARE: &str = "██";
const PADDING_SQUARE: &str = "░░";
const CURSOR_SQUARE: &str = "▓▓";

const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Heatmap widget for ratatui
pub struct HeatmapView<'a> {
    scene: &'a Scene,
    cursor: Option<CellKey>,
    theme: Theme,
}

impl<'a> HeatmapView<'a> {
    pub fn new(scene: &'a Scene, theme: Theme) -> Self {
        Self {
            scene,
            cursor: None,
            theme,
        }
    }

    pub fn with_cursor(mut self, cursor: Option<CellKey>) -> Self {
        self.cursor = cursor;
        self
    }

    fn is_horizontal(&self) -> bool {
        self.scene.orientation == Orientation::Horizontal
    }

    /// Rows taken by month labels above a horizontal grid or the weekday header of a vertical one
    fn header_rows(&self) -> u16 {
        if self.is_horizontal() && self.scene.labels.is_empty() {
            0
        } else {
            1
        }
    }

    /// How many weeks fit in `area`
    pub fn visible_weeks(&self, area: Rect) -> u32 {
        let weeks = if self.is_horizontal() {
            area.width.saturating_sub(LABEL_WIDTH) / CELL_WIDTH
        } else {
            area.height.saturating_sub(self.header_rows())
        };
        weeks.max(1) as u32
    }

    /// First week shown: the latest window that still contains the cursor
    fn first_week(&self, visible: u32) -> u32 {
        let last_start = self.scene.num_weeks.saturating_sub(visible);
        match self.cursor {
            // Scroll back only as far as the cursor's week
            Some(key) => last_start.min(key / 7),
            None => last_start,
        }
    }

    /// Terminal position of a week/day pair relative to the window start
    fn position(&self, area: Rect, week: u32, day: u32) -> Option<(u16, u16)> {
        let week = u16::try_from(week).ok()?;
        let day = day as u16;
        let (x, y) = if self.is_horizontal() {
            (
                area.x + LABEL_WIDTH + week * CELL_WIDTH,
                area.y + self.header_rows() + day,
            )
        } else {
            (
                area.x + day * CELL_WIDTH,
                area.y + self.header_rows() + week,
            )
        };
        let fits = x + 2 <= area.x + area.width && y < area.y + area.height;
        fits.then_some((x, y))
    }

    fn cell_symbol_and_style(&self, cell: &RectDescriptor) -> (&'static str, Style) {
        if self.cursor == Some(cell.key) {
            let style = Style::default()
                .fg(self.theme.accent())
                .add_modifier(Modifier::BOLD);
            (CURSOR_SQUARE, style)
        } else if !cell.in_range {
            (PADDING_SQUARE, Style::default().fg(self.theme.muted()))
        } else {
            (SQUARE, Style::default().fg(self.theme.cell_color(&cell.class_name)))
        }
    }

    fn render_weekday_labels(&self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(self.theme.muted());
        // Any cell of a row tells which weekday the row is
        let mut names: [Option<&str>; 7] = [None; 7];
        for cell in &self.scene.cells {
            let slot = &mut names[cell.day_index as usize % 7];
            if slot.is_none() {
                *slot = Some(WEEKDAY_NAMES[cell.date.weekday().num_days_from_monday() as usize]);
            }
        }

        for (day, name) in names.iter().enumerate() {
            let Some(name) = name else { continue };
            if self.is_horizontal() {
                let y = area.y + self.header_rows() + day as u16;
                if y < area.y + area.height {
                    buf.set_string(area.x, y, name, style);
                }
            } else {
                let x = area.x + day as u16 * CELL_WIDTH;
                if x + 2 <= area.x + area.width {
                    buf.set_string(x, area.y, &name[..2], style);
                }
            }
        }
    }

    fn render_month_labels(&self, area: Rect, buf: &mut Buffer, first: u32, visible: u32) {
        let style = Style::default().fg(self.theme.muted());
        for label in &self.scene.labels {
            if label.week_index < first || label.week_index >= first + visible {
                continue;
            }
            let week = (label.week_index - first) as u16;
            let (x, y) = if self.is_horizontal() {
                (area.x + LABEL_WIDTH + week * CELL_WIDTH, area.y)
            } else {
                (
                    area.x + 7 * CELL_WIDTH + 1,
                    area.y + self.header_rows() + week,
                )
            };
            if x + 3 <= area.x + area.width && y < area.y + area.height {
                buf.set_string(x, y, &label.text, style);
            }
        }
    }

    fn render_tooltip(&self, area: Rect, buf: &mut Buffer, first: u32) {
        let (Some(tooltip), Some(key)) = (&self.scene.tooltip, self.cursor) else {
            return;
        };
        let Some(cell) = self.scene.cell(key) else {
            return;
        };
        let Some((cx, cy)) = self.position(area, cell.week_index.saturating_sub(first), cell.day_index)
        else {
            return;
        };

        // Directly below the square, centered on it
        let text = format!(" {} ", tooltip.text);
        let width = text.chars().count() as u16;
        let y = cy + 1;
        if y >= area.y + area.height {
            return;
        }
        let x = (cx + 1)
            .saturating_sub(width / 2)
            .max(area.x)
            .min((area.x + area.width).saturating_sub(width));
        let style = Style::default()
            .fg(self.theme.tooltip_fg())
            .bg(self.theme.tooltip_bg());
        buf.set_string(x, y, &text, style);
    }
}

impl Widget for HeatmapView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let visible = self.visible_weeks(area);
        let first = self.first_week(visible);

        self.render_weekday_labels(area, buf);
        self.render_month_labels(area, buf, first, visible);

        for cell in &self.scene.cells {
            if cell.week_index < first || cell.week_index >= first + visible {
                continue;
            }
            if let Some((x, y)) = self.position(area, cell.week_index - first, cell.day_index) {
                let (symbol, style) = self.cell_symbol_and_style(cell);
                buf.set_string(x, y, symbol, style);
            }
        }

        self.render_tooltip(area, buf, first);
    }
}
