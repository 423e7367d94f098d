//! Orientation-aware pixel geometry for the heatmap grid

use chrono::Datelike;
use serde::Serialize;

use crate::services::date_range::{DateRange, DAYS_IN_WEEK};
use crate::types::{HeatmapOptions, Orientation};

/// Edge length of one day square
pub const SQUARE_SIZE: f64 = 10.0;
/// Space between the month labels and the grid
pub const MONTH_LABEL_GUTTER_SIZE: f64 = 4.0;
/// Nudges vertical-mode labels up so they sit on their week row
const VERTICAL_LABEL_OFFSET: f64 = -2.0;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(self, by: Point) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }
}

/// `min_x min_y width height` of the rendered document
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl std::fmt::Display for ViewBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} {}", self.min_x, self.min_y, self.width, self.height)
    }
}

/// A month name placed at a week boundary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelDescriptor {
    pub week_index: u32,
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// Stateless layout math for one orientation and gutter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub orientation: Orientation,
    pub square_size: f64,
    pub gutter_size: f64,
    pub show_month_labels: bool,
}

impl GridGeometry {
    pub fn new(orientation: Orientation, gutter_size: f64, show_month_labels: bool) -> Self {
        Self {
            orientation,
            square_size: SQUARE_SIZE,
            gutter_size,
            show_month_labels,
        }
    }

    pub fn from_options(options: &HeatmapOptions) -> Self {
        Self::new(
            options.orientation,
            options.gutter_size,
            options.show_month_labels,
        )
    }

    fn is_horizontal(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }

    /// Square size plus gutter: the repeating unit of the grid
    pub fn cell_pitch(&self) -> f64 {
        self.square_size + self.gutter_size
    }

    /// Room reserved for month labels (two lines deep when vertical)
    pub fn month_label_size(&self) -> f64 {
        if !self.show_month_labels {
            0.0
        } else if self.is_horizontal() {
            self.square_size + MONTH_LABEL_GUTTER_SIZE
        } else {
            2.0 * (self.square_size + MONTH_LABEL_GUTTER_SIZE)
        }
    }

    /// Extent of one week along the secondary axis
    pub fn week_width(&self) -> f64 {
        DAYS_IN_WEEK as f64 * self.cell_pitch()
    }

    /// Square position within its week group
    pub fn square_coordinates(&self, day_index: u32) -> Point {
        let along = day_index as f64 * self.cell_pitch();
        if self.is_horizontal() {
            Point::new(0.0, along)
        } else {
            Point::new(along, 0.0)
        }
    }

    /// Offset of a week group from the grid origin
    pub fn week_transform(&self, week_index: u32) -> Point {
        let along = week_index as f64 * self.cell_pitch();
        if self.is_horizontal() {
            Point::new(along, 0.0)
        } else {
            Point::new(0.0, along)
        }
    }

    /// Cell position relative to the grid origin
    pub fn cell_position(&self, week_index: u32, day_index: u32) -> Point {
        self.week_transform(week_index)
            .translate(self.square_coordinates(day_index))
    }

    /// Where the grid of weeks starts within the document
    pub fn weeks_origin(&self) -> Point {
        if self.is_horizontal() {
            Point::new(0.0, self.month_label_size())
        } else {
            Point::ORIGIN
        }
    }

    /// Where the month labels start within the document
    pub fn labels_origin(&self) -> Point {
        if self.is_horizontal() {
            Point::ORIGIN
        } else {
            Point::new(self.week_width() + MONTH_LABEL_GUTTER_SIZE, 0.0)
        }
    }

    /// Extent along the week axis
    pub fn width(&self, num_weeks: u32) -> f64 {
        num_weeks as f64 * self.cell_pitch() - self.gutter_size
    }

    /// Extent along the weekday axis, month labels included
    pub fn height(&self) -> f64 {
        self.week_width() + (self.month_label_size() - self.gutter_size)
    }

    pub fn view_box(&self, num_weeks: u32) -> ViewBox {
        let (width, height) = if self.is_horizontal() {
            (self.width(num_weeks), self.height())
        } else {
            (self.height(), self.width(num_weeks))
        };
        ViewBox {
            min_x: 0.0,
            min_y: 0.0,
            width,
            height,
        }
    }

    /// Label anchor relative to `labels_origin`
    pub fn month_label_coordinates(&self, week_index: u32) -> Point {
        if self.is_horizontal() {
            Point::new(
                week_index as f64 * self.cell_pitch(),
                self.month_label_size() - MONTH_LABEL_GUTTER_SIZE,
            )
        } else {
            Point::new(
                0.0,
                (week_index + 1) as f64 * self.cell_pitch() + VERTICAL_LABEL_OFFSET,
            )
        }
    }

    /// Month labels in document coordinates.
    ///
    /// A week gets a label when the day seven days after its start falls in the
    /// first week of a month. The last week never gets one since it would be
    /// clipped at the grid edge.
    pub fn month_labels(&self, range: &DateRange) -> Vec<LabelDescriptor> {
        if !self.show_month_labels {
            return Vec::new();
        }
        let origin = self.labels_origin();

        (0..range.num_weeks.saturating_sub(1))
            .filter_map(|week_index| {
                let end_of_week = range.date_for_offset((week_index + 1) * DAYS_IN_WEEK);
                if !(1..=DAYS_IN_WEEK).contains(&end_of_week.day()) {
                    return None;
                }
                let at = self.month_label_coordinates(week_index).translate(origin);
                Some(LabelDescriptor {
                    week_index,
                    x: at.x,
                    y: at.y,
                    text: MONTH_LABELS[end_of_week.month0() as usize].to_string(),
                })
            })
            .collect()
    }
}
