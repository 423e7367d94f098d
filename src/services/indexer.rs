//! Sparse value list → day-offset index

use std::collections::BTreeMap;

use crate::services::date_range::DateRange;
use crate::types::{DataAttrs, HeatmapError, HeatmapOptions, Result, ValueRecord};

/// A grid cell backed by a record, with its derived presentation fields
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedCell {
    pub day_offset: u32,
    pub value: ValueRecord,
    pub class_name: String,
    pub title: Option<String>,
    pub data_attrs: DataAttrs,
}

/// Day offset → cell mapping for one value list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueIndex {
    cells: BTreeMap<u32, IndexedCell>,
    collisions: usize,
    skipped: usize,
}

impl ValueIndex {
    /// Build a fresh index. Any unreadable date rejects the whole batch.
    pub fn build(
        values: &[ValueRecord],
        range: &DateRange,
        options: &HeatmapOptions,
    ) -> Result<Self> {
        // Resolve every date before deriving anything so a bad record fails fast
        let mut offsets = Vec::with_capacity(values.len());
        for (i, value) in values.iter().enumerate() {
            let date = value
                .date
                .to_local_date()
                .ok_or_else(|| HeatmapError::InvalidDate {
                    index: Some(i),
                    input: value.date.to_string(),
                })?;
            offsets.push(range.offset_of(date));
        }

        let total_cells = range.total_cells() as i64;
        let mut index = Self::default();

        for (value, offset) in values.iter().zip(offsets) {
            if offset < 0 || offset >= total_cells {
                index.skipped += 1;
                continue;
            }
            let day_offset = offset as u32;
            let cell = IndexedCell {
                day_offset,
                value: value.clone(),
                class_name: options.class_for(Some(value)),
                title: options.title_for(Some(value)),
                data_attrs: options.data_attrs_for(Some(value)),
            };
            // Later records replace earlier ones on the same day
            if index.cells.insert(day_offset, cell).is_some() {
                index.collisions += 1;
            }
        }

        if index.collisions > 0 {
            tracing::warn!(
                collisions = index.collisions,
                "multiple values fell on the same day; the last one wins"
            );
        }
        tracing::debug!(
            cells = index.cells.len(),
            skipped = index.skipped,
            "value index rebuilt"
        );

        Ok(index)
    }

    pub fn get(&self, offset: u32) -> Option<&IndexedCell> {
        self.cells.get(&offset)
    }

    pub fn value_for(&self, offset: u32) -> Option<&ValueRecord> {
        self.get(offset).map(|cell| &cell.value)
    }

    pub fn class_name_for(&self, offset: u32, options: &HeatmapOptions) -> String {
        match self.get(offset) {
            Some(cell) => cell.class_name.clone(),
            None => options.class_for(None),
        }
    }

    pub fn title_for(&self, offset: u32, options: &HeatmapOptions) -> Option<String> {
        match self.get(offset) {
            Some(cell) => cell.title.clone(),
            None => options.title_for(None),
        }
    }

    pub fn data_attrs_for(&self, offset: u32, options: &HeatmapOptions) -> DataAttrs {
        match self.get(offset) {
            Some(cell) => cell.data_attrs.clone(),
            None => options.data_attrs_for(None),
        }
    }

    /// Occupied offsets in ascending order
    pub fn offsets(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Records that overwrote an earlier record on the same day
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    /// Records outside the grid
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DateLike, TooltipDataAttrs};
    use chrono::{NaiveDate, Weekday};
    use std::rc::Rc;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(end: NaiveDate, num_days: i64) -> DateRange {
        DateRange::compute(end, num_days, Weekday::Sun).unwrap()
    }

    #[test]
    fn test_single_record_lands_at_offset() {
        let r = range(ymd(2021, 1, 2), 1);
        let options = HeatmapOptions::new(ymd(2021, 1, 2)).with_num_days(1);
        let values = vec![ValueRecord::new("2021-01-02", 1.0)];

        let index = ValueIndex::build(&values, &r, &options).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.offsets().collect::<Vec<_>>(), vec![6]);
        assert_eq!(index.get(6).unwrap().class_name, "color-filled");
    }

    #[test]
    fn test_time_of_day_is_truncated() {
        let r = range(ymd(2021, 1, 2), 7);
        let options = HeatmapOptions::new(ymd(2021, 1, 2));
        let values = vec![ValueRecord::new("2021-01-01T23:59:00", 2.0)];

        let index = ValueIndex::build(&values, &r, &options).unwrap();
        assert!(index.get(r.offset_of(ymd(2021, 1, 1)) as u32).is_some());
    }

    #[test]
    fn test_fallbacks_for_empty_offsets() {
        let r = range(ymd(2021, 1, 2), 14);
        let options = HeatmapOptions::new(ymd(2021, 1, 2))
            .with_title_for_value(|v| match v {
                Some(v) => format!("{}: {}", v.date, v.count_label()),
                None => "No data".into(),
            });
        let values = vec![ValueRecord::new(ymd(2021, 1, 1), 3.0)];
        let index = ValueIndex::build(&values, &r, &options).unwrap();

        let filled = r.offset_of(ymd(2021, 1, 1)) as u32;
        for offset in 0..r.total_cells() {
            if offset == filled {
                assert_eq!(index.class_name_for(offset, &options), "color-filled");
                assert_eq!(
                    index.title_for(offset, &options).as_deref(),
                    Some("2021-01-01: 3")
                );
            } else {
                assert_eq!(index.class_name_for(offset, &options), options.class_for(None));
                assert_eq!(index.title_for(offset, &options), options.title_for(None));
            }
        }
    }

    #[test]
    fn test_title_absent_without_function() {
        let r = range(ymd(2021, 1, 2), 7);
        let options = HeatmapOptions::new(ymd(2021, 1, 2));
        let values = vec![ValueRecord::new(ymd(2021, 1, 2), 1.0)];
        let index = ValueIndex::build(&values, &r, &options).unwrap();
        assert_eq!(index.title_for(6, &options), None);
        assert_eq!(index.title_for(0, &options), None);
    }

    #[test]
    fn test_data_attrs_resolved_per_cell() {
        let r = range(ymd(2021, 1, 2), 7);
        let options = HeatmapOptions::new(ymd(2021, 1, 2)).with_tooltip_data_attrs(
            TooltipDataAttrs::Dynamic(Rc::new(|v| {
                let mut attrs = DataAttrs::new();
                if let Some(v) = v {
                    attrs.insert("data-count".into(), v.count_label());
                }
                attrs
            })),
        );
        let values = vec![ValueRecord::new(ymd(2021, 1, 2), 9.0)];
        let index = ValueIndex::build(&values, &r, &options).unwrap();
        assert_eq!(index.data_attrs_for(6, &options)["data-count"], "9");
        assert!(index.data_attrs_for(5, &options).is_empty());
    }

    #[test]
    fn test_last_record_wins_on_collision() {
        let r = range(ymd(2021, 1, 2), 7);
        let options = HeatmapOptions::new(ymd(2021, 1, 2));
        let values = vec![
            ValueRecord::new("2021-01-02", 1.0),
            ValueRecord::new("2021-01-02T12:00:00", 5.0),
        ];
        let index = ValueIndex::build(&values, &r, &options).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.collisions(), 1);
        assert_eq!(index.value_for(6).unwrap().count, Some(5.0));
    }

    #[test]
    fn test_records_outside_grid_are_skipped() {
        let r = range(ymd(2021, 1, 2), 7);
        let options = HeatmapOptions::new(ymd(2021, 1, 2));
        let values = vec![
            ValueRecord::new(ymd(2020, 1, 1), 1.0),
            ValueRecord::new(ymd(2021, 1, 2), 1.0),
            ValueRecord::new(ymd(2022, 1, 1), 1.0),
        ];
        let index = ValueIndex::build(&values, &r, &options).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.skipped(), 2);
    }

    #[test]
    fn test_bad_date_rejects_batch() {
        let r = range(ymd(2021, 1, 2), 7);
        let options = HeatmapOptions::new(ymd(2021, 1, 2));
        let values = vec![
            ValueRecord::new("2021-01-01", 1.0),
            ValueRecord::marker(DateLike::Text("yesterday".into())),
        ];
        let err = ValueIndex::build(&values, &r, &options).unwrap_err();
        match err {
            HeatmapError::InvalidDate { index, input } => {
                assert_eq!(index, Some(1));
                assert_eq!(input, "yesterday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let r = range(ymd(2021, 3, 31), 90);
        let options = HeatmapOptions::new(ymd(2021, 3, 31))
            .with_title_for_value(|v| v.map(|v| v.count_label()).unwrap_or_default());
        let values: Vec<_> = (0..90)
            .step_by(3)
            .map(|i| ValueRecord::new(ymd(2021, 1, 1) + chrono::Duration::days(i), i as f64))
            .collect();

        let first = ValueIndex::build(&values, &r, &options).unwrap();
        let second = ValueIndex::build(&values, &r, &options).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 30);
    }

    #[test]
    fn test_empty_values() {
        let r = range(ymd(2021, 1, 2), 30);
        let options = HeatmapOptions::new(ymd(2021, 1, 2));
        let index = ValueIndex::build(&[], &r, &options).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.class_name_for(0, &options), "color-empty");
    }
}
