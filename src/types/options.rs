//! Heatmap configuration

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use super::value::{DateLike, ValueRecord};

/// Extra per-cell attributes handed to the renderer (e.g. `data-toggle`)
pub type DataAttrs = BTreeMap<String, String>;

// Shared so options can be cloned and edited without losing the callbacks
pub type ClassFn = Rc<dyn Fn(Option<&ValueRecord>) -> String>;
pub type TitleFn = Rc<dyn Fn(Option<&ValueRecord>) -> String>;
pub type AttrsFn = Rc<dyn Fn(Option<&ValueRecord>) -> DataAttrs>;
pub type ClickFn = Rc<dyn Fn(Option<&ValueRecord>)>;

pub const DEFAULT_NUM_DAYS: i64 = 200;
pub const DEFAULT_GUTTER_SIZE: f64 = 1.0;

/// Class used for days backed by a record
pub const CLASS_FILLED: &str = "color-filled";
/// Class used for days with no record
pub const CLASS_EMPTY: &str = "color-empty";

/// Grid orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Weeks run left to right, weekdays top to bottom
    #[default]
    Horizontal,
    /// Weeks run top to bottom, weekdays left to right
    Vertical,
}

impl Orientation {
    pub fn from_horizontal(horizontal: bool) -> Self {
        if horizontal {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// Per-cell renderer attributes: one fixed map, or computed from each value
#[derive(Clone)]
pub enum TooltipDataAttrs {
    Static(DataAttrs),
    Dynamic(AttrsFn),
}

impl TooltipDataAttrs {
    pub fn resolve(&self, value: Option<&ValueRecord>) -> DataAttrs {
        match self {
            Self::Static(attrs) => attrs.clone(),
            Self::Dynamic(f) => f(value),
        }
    }
}

impl fmt::Debug for TooltipDataAttrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(attrs) => f.debug_tuple("Static").field(attrs).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

/// Default class mapping: filled when a record exists, empty otherwise
pub fn presence_class(value: Option<&ValueRecord>) -> String {
    if value.is_some() {
        CLASS_FILLED.to_string()
    } else {
        CLASS_EMPTY.to_string()
    }
}

/// Everything that shapes a heatmap apart from the values themselves
#[derive(Clone)]
pub struct HeatmapOptions {
    /// Inclusive number of days ending at `end_date`
    pub num_days: i64,
    /// Last day of the window; callers resolve "now" themselves
    pub end_date: DateLike,
    pub gutter_size: f64,
    pub orientation: Orientation,
    pub show_month_labels: bool,
    /// Render the padding days before the start and after the end
    pub show_out_of_range_days: bool,
    pub tooltip_data_attrs: Option<TooltipDataAttrs>,
    pub title_for_value: Option<TitleFn>,
    pub class_for_value: ClassFn,
    pub on_click: Option<ClickFn>,
    pub tooltip_enabled: bool,
    pub tooltip_prefix: String,
    /// Day shown in the first row/column of every week
    pub week_start: Weekday,
}

impl HeatmapOptions {
    pub fn new(end_date: impl Into<DateLike>) -> Self {
        Self {
            num_days: DEFAULT_NUM_DAYS,
            end_date: end_date.into(),
            gutter_size: DEFAULT_GUTTER_SIZE,
            orientation: Orientation::Horizontal,
            show_month_labels: true,
            show_out_of_range_days: false,
            tooltip_data_attrs: None,
            title_for_value: None,
            class_for_value: Rc::new(presence_class),
            on_click: None,
            tooltip_enabled: false,
            tooltip_prefix: String::new(),
            week_start: Weekday::Sun,
        }
    }

    pub fn with_num_days(mut self, num_days: i64) -> Self {
        self.num_days = num_days;
        self
    }

    pub fn with_end_date(mut self, end_date: impl Into<DateLike>) -> Self {
        self.end_date = end_date.into();
        self
    }

    pub fn with_gutter_size(mut self, gutter_size: f64) -> Self {
        self.gutter_size = gutter_size;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_month_labels(mut self, show: bool) -> Self {
        self.show_month_labels = show;
        self
    }

    pub fn with_out_of_range_days(mut self, show: bool) -> Self {
        self.show_out_of_range_days = show;
        self
    }

    pub fn with_tooltip_data_attrs(mut self, attrs: TooltipDataAttrs) -> Self {
        self.tooltip_data_attrs = Some(attrs);
        self
    }

    pub fn with_title_for_value(
        mut self,
        f: impl Fn(Option<&ValueRecord>) -> String + 'static,
    ) -> Self {
        self.title_for_value = Some(Rc::new(f));
        self
    }

    pub fn with_class_for_value(
        mut self,
        f: impl Fn(Option<&ValueRecord>) -> String + 'static,
    ) -> Self {
        self.class_for_value = Rc::new(f);
        self
    }

    pub fn with_on_click(mut self, f: impl Fn(Option<&ValueRecord>) + 'static) -> Self {
        self.on_click = Some(Rc::new(f));
        self
    }

    pub fn with_tooltip(mut self, enabled: bool) -> Self {
        self.tooltip_enabled = enabled;
        self
    }

    pub fn with_tooltip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tooltip_prefix = prefix.into();
        self
    }

    pub fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn class_for(&self, value: Option<&ValueRecord>) -> String {
        (self.class_for_value)(value)
    }

    pub fn title_for(&self, value: Option<&ValueRecord>) -> Option<String> {
        self.title_for_value.as_ref().map(|f| f(value))
    }

    pub fn data_attrs_for(&self, value: Option<&ValueRecord>) -> DataAttrs {
        self.tooltip_data_attrs
            .as_ref()
            .map(|attrs| attrs.resolve(value))
            .unwrap_or_default()
    }
}

impl fmt::Debug for HeatmapOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeatmapOptions")
            .field("num_days", &self.num_days)
            .field("end_date", &self.end_date)
            .field("gutter_size", &self.gutter_size)
            .field("orientation", &self.orientation)
            .field("show_month_labels", &self.show_month_labels)
            .field("show_out_of_range_days", &self.show_out_of_range_days)
            .field("tooltip_data_attrs", &self.tooltip_data_attrs)
            .field("title_for_value", &self.title_for_value.is_some())
            .field("on_click", &self.on_click.is_some())
            .field("tooltip_enabled", &self.tooltip_enabled)
            .field("tooltip_prefix", &self.tooltip_prefix)
            .field("week_start", &self.week_start)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, 2).unwrap()
    }

    #[test]
    fn test_defaults() {
        let options = HeatmapOptions::new(end());
        assert_eq!(options.num_days, 200);
        assert_eq!(options.gutter_size, 1.0);
        assert_eq!(options.orientation, Orientation::Horizontal);
        assert!(options.show_month_labels);
        assert!(!options.show_out_of_range_days);
        assert!(!options.tooltip_enabled);
        assert_eq!(options.tooltip_prefix, "");
        assert_eq!(options.week_start, Weekday::Sun);
        assert!(options.title_for_value.is_none());
    }

    #[test]
    fn test_default_class_by_presence() {
        let options = HeatmapOptions::new(end());
        let record = ValueRecord::new(end(), 1.0);
        assert_eq!(options.class_for(Some(&record)), "color-filled");
        assert_eq!(options.class_for(None), "color-empty");
    }

    #[test]
    fn test_title_absent_without_function() {
        let options = HeatmapOptions::new(end());
        assert_eq!(options.title_for(None), None);

        let options = options.with_title_for_value(|v| match v {
            Some(v) => format!("{} items", v.count_label()),
            None => "nothing".into(),
        });
        assert_eq!(options.title_for(None).as_deref(), Some("nothing"));
    }

    #[test]
    fn test_static_data_attrs() {
        let mut attrs = DataAttrs::new();
        attrs.insert("data-toggle".into(), "tooltip".into());
        let options = HeatmapOptions::new(end()).with_tooltip_data_attrs(TooltipDataAttrs::Static(attrs));
        assert_eq!(
            options.data_attrs_for(None).get("data-toggle").map(String::as_str),
            Some("tooltip")
        );
    }

    #[test]
    fn test_dynamic_data_attrs() {
        let options = HeatmapOptions::new(end()).with_tooltip_data_attrs(TooltipDataAttrs::Dynamic(
            Rc::new(|v| {
                let mut attrs = DataAttrs::new();
                attrs.insert(
                    "data-tip".into(),
                    v.map(|v| v.count_label()).unwrap_or_else(|| "none".into()),
                );
                attrs
            }),
        ));
        let record = ValueRecord::new(end(), 7.0);
        assert_eq!(options.data_attrs_for(Some(&record))["data-tip"], "7");
        assert_eq!(options.data_attrs_for(None)["data-tip"], "none");
    }

    #[test]
    fn test_no_data_attrs_is_empty() {
        assert!(HeatmapOptions::new(end()).data_attrs_for(None).is_empty());
    }

    #[test]
    fn test_orientation_helpers() {
        assert_eq!(Orientation::from_horizontal(false), Orientation::Vertical);
        assert_eq!(Orientation::Vertical.toggled(), Orientation::Horizontal);
    }
}
