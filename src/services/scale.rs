//! Class scales: map a value to a style class name

use std::str::FromStr;

use crate::types::{presence_class, ClassFn, HeatmapError, ValueRecord, CLASS_EMPTY};
use std::rc::Rc;

/// Intensity level based on count quartiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Intensity {
    /// No record, or a zero count
    None,
    /// Up to the 25th percentile
    Low,
    /// 25th-50th percentile
    Medium,
    /// 50th-75th percentile
    High,
    /// Above the 75th percentile
    Max,
}

impl Intensity {
    pub const ALL: [Intensity; 5] = [
        Self::None,
        Self::Low,
        Self::Medium,
        Self::High,
        Self::Max,
    ];

    pub fn class_name(self) -> &'static str {
        match self {
            Self::None => CLASS_EMPTY,
            Self::Low => "color-scale-1",
            Self::Medium => "color-scale-2",
            Self::High => "color-scale-3",
            Self::Max => "color-scale-4",
        }
    }

    pub fn from_class_name(class_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.class_name() == class_name)
    }
}

/// Quartile thresholds over the positive counts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percentiles {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
}

impl Percentiles {
    pub fn intensity(self, count: f64) -> Intensity {
        if count <= 0.0 {
            Intensity::None
        } else if count <= self.p25 {
            Intensity::Low
        } else if count <= self.p50 {
            Intensity::Medium
        } else if count <= self.p75 {
            Intensity::High
        } else {
            Intensity::Max
        }
    }
}

/// Nearest-rank quartiles of the positive counts; `None` when there are none
pub fn calculate_percentiles(counts: &[f64]) -> Option<Percentiles> {
    let mut positive: Vec<f64> = counts.iter().copied().filter(|&c| c > 0.0).collect();
    if positive.is_empty() {
        return None;
    }

    positive.sort_unstable_by(f64::total_cmp);
    let len = positive.len();
    let rank = |p: f64| ((len as f64 * p).ceil() as usize).saturating_sub(1).min(len - 1);

    Some(Percentiles {
        p25: positive[rank(0.25)],
        p50: positive[rank(0.50)],
        p75: positive[rank(0.75)],
    })
}

/// Built-in `classForValue` strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassScale {
    /// `color-filled` when a record exists, `color-empty` otherwise
    #[default]
    Presence,
    /// `color-scale-1..4` by count quartile
    Quartile,
}

impl FromStr for ClassScale {
    type Err = HeatmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "presence" => Ok(Self::Presence),
            "quartile" | "quartiles" => Ok(Self::Quartile),
            other => Err(HeatmapError::Config(format!(
                "unknown class scale {other:?} (expected presence or quartile)"
            ))),
        }
    }
}

impl ClassScale {
    /// Build the class function for this scale over `values`
    pub fn class_fn(self, values: &[ValueRecord]) -> ClassFn {
        match self {
            Self::Presence => Rc::new(presence_class),
            Self::Quartile => {
                let counts: Vec<f64> = values.iter().filter_map(|v| v.count).collect();
                let percentiles = calculate_percentiles(&counts);
                Rc::new(move |value: Option<&ValueRecord>| {
                    let count = value.and_then(|v| v.count).unwrap_or(0.0);
                    percentiles
                        .map(|p| p.intensity(count))
                        .unwrap_or(Intensity::None)
                        .class_name()
                        .to_string()
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(count: f64) -> ValueRecord {
        ValueRecord::new(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(), count)
    }

    #[test]
    fn test_calculate_percentiles_empty() {
        assert!(calculate_percentiles(&[]).is_none());
        assert!(calculate_percentiles(&[0.0, 0.0]).is_none());
    }

    #[test]
    fn test_calculate_percentiles_single_value() {
        let p = calculate_percentiles(&[100.0]).unwrap();
        assert_eq!((p.p25, p.p50, p.p75), (100.0, 100.0, 100.0));
    }

    #[test]
    fn test_calculate_percentiles_four_values() {
        let p = calculate_percentiles(&[40.0, 10.0, 30.0, 20.0]).unwrap();
        assert_eq!(p.p25, 10.0);
        assert_eq!(p.p50, 20.0);
        assert_eq!(p.p75, 30.0);
    }

    #[test]
    fn test_calculate_percentiles_ignores_zeros() {
        let p = calculate_percentiles(&[0.0, 100.0, 0.0, 200.0, 300.0, 400.0]).unwrap();
        assert_eq!((p.p25, p.p50, p.p75), (100.0, 200.0, 300.0));
    }

    #[test]
    fn test_intensity_mapping() {
        let p = Percentiles {
            p25: 100.0,
            p50: 200.0,
            p75: 300.0,
        };
        assert_eq!(p.intensity(0.0), Intensity::None);
        assert_eq!(p.intensity(50.0), Intensity::Low);
        assert_eq!(p.intensity(100.0), Intensity::Low);
        assert_eq!(p.intensity(150.0), Intensity::Medium);
        assert_eq!(p.intensity(250.0), Intensity::High);
        assert_eq!(p.intensity(400.0), Intensity::Max);
    }

    #[test]
    fn test_class_names_round_trip() {
        for intensity in Intensity::ALL {
            assert_eq!(Intensity::from_class_name(intensity.class_name()), Some(intensity));
        }
        assert_eq!(Intensity::from_class_name("color-filled"), None);
    }

    #[test]
    fn test_quartile_class_fn() {
        let values = vec![record(10.0), record(20.0), record(30.0), record(40.0)];
        let class_for = ClassScale::Quartile.class_fn(&values);
        assert_eq!(class_for(None), "color-empty");
        assert_eq!(class_for(Some(&record(10.0))), "color-scale-1");
        assert_eq!(class_for(Some(&record(40.0))), "color-scale-4");
    }

    #[test]
    fn test_presence_class_fn() {
        let class_for = ClassScale::Presence.class_fn(&[]);
        assert_eq!(class_for(Some(&record(0.0))), "color-filled");
        assert_eq!(class_for(None), "color-empty");
    }

    #[test]
    fn test_parse_scale() {
        assert_eq!("Quartile".parse::<ClassScale>().unwrap(), ClassScale::Quartile);
        assert_eq!("presence".parse::<ClassScale>().unwrap(), ClassScale::Presence);
        assert!("rainbow".parse::<ClassScale>().is_err());
    }
}
