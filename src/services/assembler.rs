//! Heatmap component: derived layout, hover state and scene assembly

use chrono::NaiveDate;
use serde::Serialize;

use crate::services::date_range::{DateRange, DAYS_IN_WEEK};
use crate::services::geometry::{GridGeometry, LabelDescriptor, ViewBox};
use crate::services::indexer::ValueIndex;
use crate::services::tooltip::{HoverTarget, TooltipController, TooltipDescriptor, TooltipState};
use crate::types::{DataAttrs, HeatmapError, HeatmapOptions, Orientation, Result, ValueRecord};

/// Handle a renderer passes back on click/hover: the cell's day offset
pub type CellKey = u32;

/// One day square ready for painting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RectDescriptor {
    pub key: CellKey,
    pub week_index: u32,
    pub day_index: u32,
    pub date: NaiveDate,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub class_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "DataAttrs::is_empty")]
    pub data_attrs: DataAttrs,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<f64>,
    /// False for padding days outside `[start_date, end_date]`
    pub in_range: bool,
}

/// Everything a renderer needs for one pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub view_box: ViewBox,
    pub orientation: Orientation,
    pub cell_pitch: f64,
    pub square_size: f64,
    pub num_weeks: u32,
    pub cells: Vec<RectDescriptor>,
    pub labels: Vec<LabelDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<TooltipDescriptor>,
}

impl Scene {
    pub fn cell(&self, key: CellKey) -> Option<&RectDescriptor> {
        self.cells.iter().find(|cell| cell.key == key)
    }
}

/// State derived from options + values; replaced as a unit
#[derive(Debug, Clone)]
struct Layout {
    range: DateRange,
    index: ValueIndex,
    geometry: GridGeometry,
}

impl Layout {
    fn build(values: &[ValueRecord], options: &HeatmapOptions) -> Result<Self> {
        if !(options.gutter_size.is_finite() && options.gutter_size >= 0.0) {
            return Err(HeatmapError::Config(format!(
                "gutterSize must be a non-negative number, got {}",
                options.gutter_size
            )));
        }
        let range = DateRange::resolve(&options.end_date, options.num_days, options.week_start)?;
        let index = ValueIndex::build(values, &range, options)?;
        let geometry = GridGeometry::from_options(options);
        tracing::debug!(
            start = %range.start_date,
            end = %range.end_date,
            weeks = range.num_weeks,
            "heatmap layout computed"
        );
        Ok(Self {
            range,
            index,
            geometry,
        })
    }
}

/// One heatmap instance. Owns its values, options and hover state.
pub struct CalendarHeatmap {
    options: HeatmapOptions,
    values: Vec<ValueRecord>,
    layout: Layout,
    tooltip: TooltipController,
}

impl CalendarHeatmap {
    pub fn new(values: Vec<ValueRecord>, options: HeatmapOptions) -> Result<Self> {
        let layout = Layout::build(&values, &options)?;
        let tooltip = TooltipController::new(options.tooltip_enabled);
        Ok(Self {
            options,
            values,
            layout,
            tooltip,
        })
    }

    /// Replace the value list. On error the previous state is kept.
    pub fn set_values(&mut self, values: Vec<ValueRecord>) -> Result<()> {
        let layout = Layout::build(&values, &self.options)?;
        self.values = values;
        self.layout = layout;
        self.tooltip.reset(self.options.tooltip_enabled);
        Ok(())
    }

    /// Replace the options. On error the previous state is kept.
    pub fn set_options(&mut self, options: HeatmapOptions) -> Result<()> {
        let layout = Layout::build(&self.values, &options)?;
        self.tooltip.reset(options.tooltip_enabled);
        self.options = options;
        self.layout = layout;
        Ok(())
    }

    /// Edit a copy of the current options and apply it as one change
    pub fn update_options(&mut self, edit: impl FnOnce(&mut HeatmapOptions)) -> Result<()> {
        let mut candidate = self.options.clone();
        edit(&mut candidate);
        self.set_options(candidate)
    }

    pub fn options(&self) -> &HeatmapOptions {
        &self.options
    }

    pub fn values(&self) -> &[ValueRecord] {
        &self.values
    }

    pub fn range(&self) -> &DateRange {
        &self.layout.range
    }

    pub fn index(&self) -> &ValueIndex {
        &self.layout.index
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.layout.geometry
    }

    pub fn tooltip_state(&self) -> &TooltipState {
        self.tooltip.state()
    }

    /// Whether the cell for `key` appears in the scene
    pub fn is_rendered(&self, key: CellKey) -> bool {
        key < self.layout.range.total_cells()
            && (self.options.show_out_of_range_days || self.layout.range.is_in_range(key))
    }

    /// Keys of rendered cells in scene order
    pub fn rendered_keys(&self) -> impl Iterator<Item = CellKey> + '_ {
        (0..self.layout.range.total_cells()).filter(|&key| self.is_rendered(key))
    }

    fn rect_for(&self, key: CellKey) -> RectDescriptor {
        let Layout {
            range,
            index,
            geometry,
        } = &self.layout;
        let week_index = key / DAYS_IN_WEEK;
        let day_index = key % DAYS_IN_WEEK;
        let at = geometry
            .cell_position(week_index, day_index)
            .translate(geometry.weeks_origin());

        RectDescriptor {
            key,
            week_index,
            day_index,
            date: range.date_for_offset(key),
            x: at.x,
            y: at.y,
            width: geometry.square_size,
            height: geometry.square_size,
            class_name: index.class_name_for(key, &self.options),
            title: index.title_for(key, &self.options),
            data_attrs: index.data_attrs_for(key, &self.options),
            count: index.value_for(key).and_then(|v| v.count),
            in_range: range.is_in_range(key),
        }
    }

    /// Assemble the renderer-ready description of the current state
    pub fn scene(&self) -> Scene {
        let Layout {
            range, geometry, ..
        } = &self.layout;

        Scene {
            view_box: geometry.view_box(range.num_weeks),
            orientation: geometry.orientation,
            cell_pitch: geometry.cell_pitch(),
            square_size: geometry.square_size,
            num_weeks: range.num_weeks,
            cells: self.rendered_keys().map(|key| self.rect_for(key)).collect(),
            labels: geometry.month_labels(range),
            tooltip: self
                .tooltip
                .descriptor(geometry, &self.options.tooltip_prefix),
        }
    }

    /// Forward a click on `key` to the configured callback
    pub fn click(&self, key: CellKey) {
        if !self.is_rendered(key) {
            return;
        }
        if let Some(on_click) = &self.options.on_click {
            on_click(self.layout.index.value_for(key));
        }
    }

    pub fn hover_enter(&mut self, key: CellKey) {
        if !self.tooltip.is_enabled() || !self.is_rendered(key) {
            return;
        }
        let geometry = &self.layout.geometry;
        let square = geometry.square_coordinates(key % DAYS_IN_WEEK);
        self.tooltip.enter(HoverTarget {
            x: square.x,
            y: square.y,
            week_index: key / DAYS_IN_WEEK,
            day_offset: key,
            value: self.layout.index.value_for(key).cloned(),
        });
    }

    pub fn hover_leave(&mut self) {
        self.tooltip.leave();
    }
}
