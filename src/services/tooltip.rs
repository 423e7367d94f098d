//! Hover tooltip state machine

use serde::Serialize;

use crate::services::geometry::{GridGeometry, Point, SQUARE_SIZE};
use crate::types::{format_count, ValueRecord};

/// Estimated width of one tooltip glyph
pub const TOOLTIP_GLYPH_WIDTH: f64 = 8.0;
pub const TOOLTIP_HEIGHT: f64 = 15.0;
pub const TOOLTIP_CORNER_RADIUS: f64 = 3.0;
/// Text baseline below the top of the tooltip background
const TOOLTIP_BASELINE: f64 = 11.0;

/// The cell under the pointer, in its week's local frame
#[derive(Debug, Clone, PartialEq)]
pub struct HoverTarget {
    pub x: f64,
    pub y: f64,
    pub week_index: u32,
    pub day_offset: u32,
    pub value: Option<ValueRecord>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum TooltipState {
    #[default]
    Hidden,
    Visible(HoverTarget),
}

/// Tooltip background and text in document coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipDescriptor {
    pub x: f64,
    pub y: f64,
    pub background_width: f64,
    pub background_height: f64,
    pub corner_radius: f64,
    /// Center of the text run
    pub text_x: f64,
    /// Baseline of the text run
    pub text_y: f64,
    pub text: String,
}

/// Tracks at most one hovered cell. Inert while disabled.
#[derive(Debug, Clone, Default)]
pub struct TooltipController {
    enabled: bool,
    state: TooltipState,
}

impl TooltipController {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            state: TooltipState::Hidden,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> &TooltipState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, TooltipState::Visible(_))
    }

    /// Show the tooltip for `target`, replacing any current one
    pub fn enter(&mut self, target: HoverTarget) {
        if self.enabled {
            self.state = TooltipState::Visible(target);
        }
    }

    pub fn leave(&mut self) {
        self.state = TooltipState::Hidden;
    }

    /// Drop hover state after the data or layout it points into changed
    pub fn reset(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.state = TooltipState::Hidden;
    }

    pub fn descriptor(&self, geometry: &GridGeometry, prefix: &str) -> Option<TooltipDescriptor> {
        match &self.state {
            TooltipState::Hidden => None,
            TooltipState::Visible(target) => Some(layout_tooltip(target, geometry, prefix)),
        }
    }
}

pub fn tooltip_text(prefix: &str, value: Option<&ValueRecord>) -> String {
    let count = format_count(value.and_then(|v| v.count));
    if prefix.is_empty() {
        count
    } else {
        format!("{prefix} {count}")
    }
}

fn layout_tooltip(target: &HoverTarget, geometry: &GridGeometry, prefix: &str) -> TooltipDescriptor {
    let half_square = SQUARE_SIZE * 0.5;
    let text = tooltip_text(prefix, target.value.as_ref());
    let width = text.chars().count() as f64 * TOOLTIP_GLYPH_WIDTH;
    let offset = width * 0.5 - half_square;

    // Same frame as the hovered cell: weeks origin plus the week's own transform
    let frame = geometry
        .weeks_origin()
        .translate(geometry.week_transform(target.week_index));
    let background = Point::new(target.x - offset, target.y + SQUARE_SIZE).translate(frame);
    let text_at = Point::new(target.x + half_square, target.y + SQUARE_SIZE + TOOLTIP_BASELINE)
        .translate(frame);

    TooltipDescriptor {
        x: background.x,
        y: background.y,
        background_width: width,
        background_height: TOOLTIP_HEIGHT,
        corner_radius: TOOLTIP_CORNER_RADIUS,
        text_x: text_at.x,
        text_y: text_at.y,
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Orientation;
    use chrono::NaiveDate;

    fn target(count: Option<f64>) -> HoverTarget {
        let date = NaiveDate::from_ymd_opt(2021, 1, 2).unwrap();
        HoverTarget {
            x: 0.0,
            y: 22.0,
            week_index: 3,
            day_offset: 23,
            value: count.map(|c| ValueRecord::new(date, c)),
        }
    }

    #[test]
    fn test_starts_hidden() {
        let tooltip = TooltipController::new(true);
        assert_eq!(tooltip.state(), &TooltipState::Hidden);
        assert!(!tooltip.is_visible());
    }

    #[test]
    fn test_enter_and_leave() {
        let mut tooltip = TooltipController::new(true);
        tooltip.enter(target(Some(4.0)));
        assert!(tooltip.is_visible());
        tooltip.leave();
        assert_eq!(tooltip.state(), &TooltipState::Hidden);
    }

    #[test]
    fn test_retarget_replaces_directly() {
        let mut tooltip = TooltipController::new(true);
        tooltip.enter(target(Some(4.0)));
        let mut next = target(Some(9.0));
        next.day_offset = 24;
        tooltip.enter(next.clone());
        assert_eq!(tooltip.state(), &TooltipState::Visible(next));
    }

    #[test]
    fn test_disabled_is_inert() {
        let mut tooltip = TooltipController::new(false);
        tooltip.enter(target(Some(4.0)));
        assert_eq!(tooltip.state(), &TooltipState::Hidden);
        let geometry = GridGeometry::new(Orientation::Horizontal, 1.0, true);
        assert!(tooltip.descriptor(&geometry, "").is_none());
    }

    #[test]
    fn test_reset_hides() {
        let mut tooltip = TooltipController::new(true);
        tooltip.enter(target(Some(4.0)));
        tooltip.reset(true);
        assert!(!tooltip.is_visible());
        assert!(tooltip.is_enabled());
    }

    #[test]
    fn test_text() {
        let record = ValueRecord::new(NaiveDate::from_ymd_opt(2021, 1, 2).unwrap(), 12.0);
        assert_eq!(tooltip_text("", Some(&record)), "12");
        assert_eq!(tooltip_text("commits:", Some(&record)), "commits: 12");
        assert_eq!(tooltip_text("commits:", None), "commits: 0");
    }

    #[test]
    fn test_descriptor_geometry_horizontal() {
        let geometry = GridGeometry::new(Orientation::Horizontal, 1.0, true);
        let mut tooltip = TooltipController::new(true);
        tooltip.enter(target(Some(12.0)));

        let d = tooltip.descriptor(&geometry, "n").unwrap();
        // "n 12" is 4 glyphs wide
        assert_eq!(d.text, "n 12");
        assert_eq!(d.background_width, 32.0);
        // Centered over the square: offset = 16 - 5 = 11; week 3 shifts by 33
        assert_eq!(d.x, 33.0 - 11.0);
        // Directly below the square; weeks origin is 14 below the top
        assert_eq!(d.y, 14.0 + 22.0 + 10.0);
        assert_eq!(d.text_x, 33.0 + 5.0);
        assert_eq!(d.text_y, d.y + 11.0);
        assert_eq!(d.x + d.background_width / 2.0, d.text_x);
    }

    #[test]
    fn test_descriptor_uses_week_frame_vertical() {
        let geometry = GridGeometry::new(Orientation::Vertical, 1.0, true);
        let mut tooltip = TooltipController::new(true);
        let mut t = target(Some(1.0));
        t.x = 22.0;
        t.y = 0.0;
        tooltip.enter(t);

        let d = tooltip.descriptor(&geometry, "").unwrap();
        assert_eq!(d.background_width, 8.0);
        assert_eq!(d.x, 22.0 - (4.0 - 5.0));
        assert_eq!(d.y, 33.0 + 10.0);
    }
}
