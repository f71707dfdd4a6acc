//! Weight series analysis
//!
//! Turns an irregular, possibly several-per-day list of weigh-ins into
//! dashboard statistics and a chart-ready daily series.
//!
//! Every averaging step first collapses same-date observations to their mean
//! (daily reduction), so a day with three weigh-ins carries the same weight in
//! a moving average as a day with one.

use crate::models::WeightObservation;
use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Short statistics window, in days back from today
pub const SHORT_WINDOW_DAYS: u32 = 7;
/// Window the short average is compared against for the trend
pub const COMPARISON_WINDOW_DAYS: u32 = 14;
/// Long statistics window, in days back from today
pub const LONG_WINDOW_DAYS: u32 = 30;
/// Distinct dates in the chart's trailing moving average
pub const CHART_WINDOW_POINTS: usize = 7;
/// Short-minus-comparison difference tolerated before a trend is reported
pub const TREND_DEAD_ZONE: f64 = 0.3;
/// Days of history shown on the dashboard chart card
pub const DASHBOARD_CHART_DAYS: u64 = 30;

/// Tunable analysis constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightAnalysisConfig {
    pub short_window_days: u32,
    pub comparison_window_days: u32,
    pub long_window_days: u32,
    pub chart_window_points: usize,
    pub trend_dead_zone: f64,
}

impl Default for WeightAnalysisConfig {
    fn default() -> Self {
        Self {
            short_window_days: SHORT_WINDOW_DAYS,
            comparison_window_days: COMPARISON_WINDOW_DAYS,
            long_window_days: LONG_WINDOW_DAYS,
            chart_window_points: CHART_WINDOW_POINTS,
            trend_dead_zone: TREND_DEAD_ZONE,
        }
    }
}

impl WeightAnalysisConfig {
    /// Check the constants are usable
    pub fn validate(&self) -> Result<(), String> {
        if self.short_window_days == 0
            || self.comparison_window_days == 0
            || self.long_window_days == 0
        {
            return Err("Analysis windows must be at least one day".to_string());
        }
        if self.chart_window_points == 0 {
            return Err("Chart window must cover at least one point".to_string());
        }
        if !self.trend_dead_zone.is_finite() || self.trend_dead_zone < 0.0 {
            return Err("Trend dead-zone must be a non-negative number".to_string());
        }
        Ok(())
    }
}

/// Direction of recent weight movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Down,
    Up,
    #[default]
    Stable,
}

/// Dashboard statistics, recomputed from the full observation set on demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WeightStatistics {
    pub current_weight: Option<f64>,
    pub start_weight: Option<f64>,
    pub total_change: Option<f64>,
    pub avg_7_day: Option<f64>,
    pub avg_30_day: Option<f64>,
    pub trend: Trend,
    pub last_entry_date: Option<NaiveDate>,
}

/// One chart point per distinct date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    /// Mean of that date's weigh-ins
    pub weight: Option<f64>,
    /// Trailing moving average over full windows only; absent, never partial
    #[serde(rename = "avg7")]
    pub moving_average: Option<f64>,
}

/// Round to one decimal place, halves away from zero
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Collapse observations to one mean value per date, ascending by date
pub fn daily_averages(observations: &[WeightObservation]) -> BTreeMap<NaiveDate, f64> {
    let mut by_day: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
    for obs in observations {
        let entry = by_day.entry(obs.date).or_insert((0.0, 0));
        entry.0 += obs.weight;
        entry.1 += 1;
    }

    by_day
        .into_iter()
        .map(|(date, (sum, count))| (date, sum / f64::from(count)))
        .collect()
}

/// Mean of the daily values in the inclusive window `[today - days, today]`
///
/// Rounded to one decimal; `None` when no date falls inside the window.
pub fn window_average(daily: &BTreeMap<NaiveDate, f64>, today: NaiveDate, days: u32) -> Option<f64> {
    let start = today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN);

    let (sum, count) = daily
        .range(start..=today)
        .fold((0.0, 0usize), |(sum, count), (_, value)| (sum + value, count + 1));

    if count == 0 {
        None
    } else {
        Some(round_to_tenth(sum / count as f64))
    }
}

/// Most recent observation by date, then by creation time
pub fn most_recent(observations: &[WeightObservation]) -> Option<&WeightObservation> {
    observations
        .iter()
        .max_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)))
}

/// Classify the short average against the comparison average
pub fn classify_trend(short: Option<f64>, comparison: Option<f64>, dead_zone: f64) -> Trend {
    match (short, comparison) {
        (Some(short), Some(comparison)) => {
            // Both inputs are tenths already; rounding the gap strips float noise
            // so a gap equal to the dead-zone stays inside it.
            let diff = round_to_tenth(short - comparison);
            if diff < -dead_zone {
                Trend::Down
            } else if diff > dead_zone {
                Trend::Up
            } else {
                Trend::Stable
            }
        }
        _ => Trend::Stable,
    }
}

/// Dashboard statistics with the default constants
///
/// `today` is the user's local calendar date; input order does not matter.
pub fn compute_statistics(
    observations: &[WeightObservation],
    start_weight: Option<f64>,
    today: NaiveDate,
) -> WeightStatistics {
    compute_statistics_with(observations, start_weight, today, &WeightAnalysisConfig::default())
}

/// Dashboard statistics with explicit constants
pub fn compute_statistics_with(
    observations: &[WeightObservation],
    start_weight: Option<f64>,
    today: NaiveDate,
    config: &WeightAnalysisConfig,
) -> WeightStatistics {
    let Some(latest) = most_recent(observations) else {
        return WeightStatistics {
            start_weight,
            ..WeightStatistics::default()
        };
    };

    let daily = daily_averages(observations);
    let avg_7_day = window_average(&daily, today, config.short_window_days);
    let avg_30_day = window_average(&daily, today, config.long_window_days);
    let comparison = window_average(&daily, today, config.comparison_window_days);

    let total_change = start_weight
        .map(|start| round_to_tenth(round_to_tenth(latest.weight) - round_to_tenth(start)));

    WeightStatistics {
        current_weight: Some(latest.weight),
        start_weight,
        total_change,
        avg_7_day,
        avg_30_day,
        trend: classify_trend(avg_7_day, comparison, config.trend_dead_zone),
        last_entry_date: Some(latest.date),
    }
}

/// Chart series with the default window
pub fn build_chart_series(observations: &[WeightObservation]) -> Vec<ChartPoint> {
    build_chart_series_with(observations, &WeightAnalysisConfig::default())
}

/// Chart series, ascending by date, one point per distinct date
///
/// The moving average at index `i` is the mean of the `chart_window_points`
/// daily values ending at `i`, and is absent until that many dates exist.
/// Gaps between dates are never interpolated.
pub fn build_chart_series_with(
    observations: &[WeightObservation],
    config: &WeightAnalysisConfig,
) -> Vec<ChartPoint> {
    let window = config.chart_window_points.max(1);
    let daily: Vec<(NaiveDate, f64)> = daily_averages(observations).into_iter().collect();

    daily
        .iter()
        .enumerate()
        .map(|(i, &(date, weight))| {
            let moving_average = (i + 1 >= window).then(|| {
                let sum: f64 = daily[i + 1 - window..=i].iter().map(|(_, w)| w).sum();
                round_to_tenth(sum / window as f64)
            });

            ChartPoint {
                date,
                weight: Some(weight),
                moving_average,
            }
        })
        .collect()
}

/// Chart zoom levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ChartRange {
    #[serde(rename = "1W")]
    OneWeek,
    #[default]
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "ALL")]
    All,
}

impl ChartRange {
    /// First date shown for this range, `None` for everything
    ///
    /// Month ranges clamp to the end of a shorter month (Mar 31 minus one
    /// month is Feb 29 in a leap year).
    pub fn cutoff(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            ChartRange::OneWeek => today.checked_sub_days(Days::new(7)),
            ChartRange::OneMonth => today.checked_sub_months(Months::new(1)),
            ChartRange::ThreeMonths => today.checked_sub_months(Months::new(3)),
            ChartRange::All => None,
        }
    }
}

impl std::str::FromStr for ChartRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "1W" => Ok(ChartRange::OneWeek),
            "1M" => Ok(ChartRange::OneMonth),
            "3M" => Ok(ChartRange::ThreeMonths),
            "ALL" => Ok(ChartRange::All),
            _ => Err(format!("Unknown chart range: {}", s)),
        }
    }
}

/// Keep points on or after `cutoff`
pub fn filter_chart_since(mut points: Vec<ChartPoint>, cutoff: NaiveDate) -> Vec<ChartPoint> {
    points.retain(|p| p.date >= cutoff);
    points
}

/// Apply a zoom range to a series built from the full history
pub fn filter_chart_range(points: Vec<ChartPoint>, range: ChartRange, today: NaiveDate) -> Vec<ChartPoint> {
    match range.cutoff(today) {
        Some(cutoff) => filter_chart_since(points, cutoff),
        None => points,
    }
}
