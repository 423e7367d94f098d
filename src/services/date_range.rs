//! Week-aligned date window derived from an end date and a day count

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

use crate::types::{DateLike, HeatmapError, Result};

pub const DAYS_IN_WEEK: u32 = 7;

/// Position of `date` within a week beginning on `week_start` (0..=6)
pub fn day_of_week(date: NaiveDate, week_start: Weekday) -> u32 {
    let from_monday = date.weekday().num_days_from_monday();
    (from_monday + DAYS_IN_WEEK - week_start.num_days_from_monday()) % DAYS_IN_WEEK
}

/// The padded grid window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start_date: NaiveDate,
    /// First cell of the grid; always day-of-week 0
    pub start_date_with_padding: NaiveDate,
    pub end_date: NaiveDate,
    pub num_days: u32,
    pub num_weeks: u32,
    pub empty_days_at_start: u32,
    pub empty_days_at_end: u32,
    #[serde(skip)]
    pub week_start: Weekday,
}

impl DateRange {
    /// Compute the window ending at `end_date` (inclusive) spanning `num_days`
    pub fn compute(end_date: NaiveDate, num_days: i64, week_start: Weekday) -> Result<Self> {
        if num_days <= 0 || num_days > u32::MAX as i64 {
            return Err(HeatmapError::InvalidRange(num_days));
        }

        let start_date = end_date
            .checked_sub_signed(Duration::days(num_days - 1))
            .ok_or(HeatmapError::InvalidRange(num_days))?;

        let empty_days_at_start = day_of_week(start_date, week_start);
        let empty_days_at_end = DAYS_IN_WEEK - 1 - day_of_week(end_date, week_start);

        let start_date_with_padding = start_date
            .checked_sub_signed(Duration::days(empty_days_at_start as i64))
            .ok_or(HeatmapError::InvalidRange(num_days))?;
        // The trailing padding must also fit in the calendar
        end_date
            .checked_add_signed(Duration::days(empty_days_at_end as i64))
            .ok_or(HeatmapError::InvalidRange(num_days))?;

        let num_days = num_days as u32;
        let padded = num_days as u64 + empty_days_at_start as u64 + empty_days_at_end as u64;
        let num_weeks = padded.div_ceil(DAYS_IN_WEEK as u64) as u32;

        Ok(Self {
            start_date,
            start_date_with_padding,
            end_date,
            num_days,
            num_weeks,
            empty_days_at_start,
            empty_days_at_end,
            week_start,
        })
    }

    /// Truncate a date-like end to its calendar day, then compute
    pub fn resolve(end_date: &DateLike, num_days: i64, week_start: Weekday) -> Result<Self> {
        let end = end_date
            .to_local_date()
            .ok_or_else(|| HeatmapError::InvalidDate {
                index: None,
                input: end_date.to_string(),
            })?;
        Self::compute(end, num_days, week_start)
    }

    /// Number of cells in the grid, padding included
    pub fn total_cells(&self) -> u32 {
        self.num_weeks * DAYS_IN_WEEK
    }

    /// Whole days between the padded grid start and `date` (negative before the grid)
    pub fn offset_of(&self, date: NaiveDate) -> i64 {
        (date - self.start_date_with_padding).num_days()
    }

    /// Date of a grid cell. Offsets past the end of the calendar saturate at `NaiveDate::MAX`.
    pub fn date_for_offset(&self, offset: u32) -> NaiveDate {
        self.start_date_with_padding
            .checked_add_signed(Duration::days(offset as i64))
            .unwrap_or(NaiveDate::MAX)
    }

    /// True for offsets inside `[start_date, end_date]`; false for padding days
    pub fn is_in_range(&self, offset: u32) -> bool {
        offset >= self.empty_days_at_start && offset < self.empty_days_at_start + self.num_days
    }
}
