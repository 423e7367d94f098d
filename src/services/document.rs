//! JSON heatmap documents: a value list plus optional layout settings

use chrono::{NaiveDate, Weekday};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use crate::services::assembler::CalendarHeatmap;
use crate::services::scale::ClassScale;
use crate::types::{
    DataAttrs, DateLike, HeatmapError, HeatmapOptions, Orientation, Result, TooltipDataAttrs,
    ValueRecord,
};

/// End date sentinel resolved to the caller's "today"
pub const NOW: &str = "now";

/// Layout settings as written in a document. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSettings {
    pub num_days: Option<i64>,
    pub end_date: Option<DateLike>,
    pub gutter_size: Option<f64>,
    pub horizontal: Option<bool>,
    pub show_month_labels: Option<bool>,
    pub show_out_of_range_days: Option<bool>,
    pub tooltip_enabled: Option<bool>,
    pub tooltip_prefix: Option<String>,
    pub tooltip_data_attrs: Option<BTreeMap<String, Value>>,
    pub week_start: Option<String>,
    pub class_scale: Option<String>,
    /// `{date}` and `{count}` are substituted per record
    pub title_template: Option<String>,
}

/// A parsed document, not yet laid out
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapDocument {
    pub values: Vec<ValueRecord>,
    pub settings: DocumentSettings,
}

impl HeatmapDocument {
    /// Parse a document object, or a bare array of records
    pub fn parse(text: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(text)? {
            Value::Array(records) => Ok(Self {
                values: parse_values(records)?,
                settings: DocumentSettings::default(),
            }),
            Value::Object(mut fields) => {
                let values = match fields.remove("values") {
                    Some(Value::Array(records)) => parse_values(records)?,
                    Some(Value::Null) | None => {
                        return Err(HeatmapError::Config("values is required".into()))
                    }
                    Some(_) => return Err(HeatmapError::Config("values must be a list".into())),
                };
                let settings = serde_json::from_value(Value::Object(fields))?;
                Ok(Self { values, settings })
            }
            _ => Err(HeatmapError::Config(
                "document must be an object or a list of values".into(),
            )),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let document = Self::parse(&content)?;
        tracing::debug!(
            path = %path.display(),
            values = document.values.len(),
            "document loaded"
        );
        Ok(document)
    }

    /// Resolve settings into options. A missing or `"now"` end date becomes `today`.
    pub fn options(&self, today: NaiveDate) -> Result<HeatmapOptions> {
        let s = &self.settings;

        let end_date = match &s.end_date {
            None => DateLike::Date(today),
            Some(DateLike::Text(text)) if text.trim().eq_ignore_ascii_case(NOW) => {
                DateLike::Date(today)
            }
            Some(other) => other.clone(),
        };

        let mut options = HeatmapOptions::new(end_date);
        if let Some(num_days) = s.num_days {
            options.num_days = num_days;
        }
        if let Some(gutter_size) = s.gutter_size {
            options.gutter_size = gutter_size;
        }
        if let Some(horizontal) = s.horizontal {
            options.orientation = Orientation::from_horizontal(horizontal);
        }
        if let Some(show) = s.show_month_labels {
            options.show_month_labels = show;
        }
        if let Some(show) = s.show_out_of_range_days {
            options.show_out_of_range_days = show;
        }
        if let Some(enabled) = s.tooltip_enabled {
            options.tooltip_enabled = enabled;
        }
        if let Some(prefix) = &s.tooltip_prefix {
            options.tooltip_prefix = prefix.clone();
        }
        if let Some(attrs) = &s.tooltip_data_attrs {
            options.tooltip_data_attrs = Some(TooltipDataAttrs::Static(stringify_attrs(attrs)));
        }
        if let Some(week_start) = &s.week_start {
            options.week_start = parse_week_start(week_start)?;
        }

        let scale = match &s.class_scale {
            Some(name) => name.parse::<ClassScale>()?,
            None => ClassScale::default(),
        };
        options.class_for_value = scale.class_fn(&self.values);

        if let Some(template) = &s.title_template {
            let template = template.clone();
            options.title_for_value = Some(Rc::new(move |value: Option<&ValueRecord>| {
                value
                    .map(|v| render_title(&template, v))
                    .unwrap_or_default()
            }));
        }

        Ok(options)
    }

    /// Lay out the document as a heatmap instance
    pub fn into_heatmap(self, today: NaiveDate) -> Result<CalendarHeatmap> {
        let options = self.options(today)?;
        CalendarHeatmap::new(self.values, options)
    }
}

fn parse_values(records: Vec<Value>) -> Result<Vec<ValueRecord>> {
    records
        .into_iter()
        .enumerate()
        .map(|(i, raw)| parse_record(i, raw))
        .collect()
}

fn parse_record(index: usize, raw: Value) -> Result<ValueRecord> {
    let Value::Object(fields) = raw else {
        return Err(HeatmapError::Config(format!(
            "values[{index}] must be an object"
        )));
    };
    match fields.get("date") {
        Some(Value::String(_)) | Some(Value::Number(_)) => {}
        Some(other) => {
            return Err(HeatmapError::InvalidDate {
                index: Some(index),
                input: other.to_string(),
            })
        }
        None => {
            return Err(HeatmapError::InvalidDate {
                index: Some(index),
                input: "null".into(),
            })
        }
    }
    Ok(serde_json::from_value(Value::Object(fields))?)
}

fn parse_week_start(text: &str) -> Result<Weekday> {
    text.trim()
        .parse::<Weekday>()
        .map_err(|_| HeatmapError::Config(format!("unknown weekStart {text:?}")))
}

fn stringify_attrs(attrs: &BTreeMap<String, Value>) -> DataAttrs {
    attrs
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), value)
        })
        .collect()
}

fn render_title(template: &str, value: &ValueRecord) -> String {
    let date = value
        .date
        .to_local_date()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| value.date.to_string());
    template
        .replace("{date}", &date)
        .replace("{count}", &value.count_label())
}
