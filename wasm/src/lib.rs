//! Metabolic RW WASM Module
//!
//! Browser bindings for the training calendar and weight chart, so the
//! client shows the same training date and averages as the API.
//!
//! Structured values cross the boundary as JSON strings.

use chrono::{DateTime, NaiveDate, Utc};
use metabolic_shared::{
    build_chart_series, compute_statistics, parse_loose_date, training_date, WeighInStatus,
    WeightObservation,
};
use serde::Deserialize;
use uuid::Uuid;
use wasm_bindgen::prelude::*;

/// Weigh-in as the client holds it
#[derive(Debug, Deserialize)]
struct ClientWeighIn {
    date: NaiveDate,
    weight: f64,
    #[serde(default)]
    status: WeighInStatus,
}

fn observations_from_json(json: &str) -> Option<Vec<WeightObservation>> {
    let weigh_ins: Vec<ClientWeighIn> = serde_json::from_str(json).ok()?;

    // Input order stands in for creation order
    Some(
        weigh_ins
            .into_iter()
            .enumerate()
            .map(|(i, w)| WeightObservation {
                id: Uuid::nil(),
                date: w.date,
                weight: w.weight,
                body_fat_percent: None,
                status: w.status,
                notes: None,
                created_at: DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::seconds(i as i64),
            })
            .collect(),
    )
}

/// Training date (`YYYY-MM-DD`) for a JS timestamp in an IANA zone
///
/// Returns `undefined` for an unknown zone or a NaN, infinite or
/// out-of-range timestamp.
#[wasm_bindgen]
pub fn training_date_for(timestamp_ms: f64, timezone: &str) -> Option<String> {
    if !timestamp_ms.is_finite() {
        return None;
    }
    let timestamp = DateTime::<Utc>::from_timestamp_millis(timestamp_ms as i64)?;
    training_date(timestamp, timezone)
        .ok()
        .map(|date| date.to_string())
}

/// Normalize a `M/D/YYYY` spreadsheet date to `YYYY-MM-DD`
#[wasm_bindgen]
pub fn parse_import_date(text: &str) -> Option<String> {
    parse_loose_date(text).ok().map(|date| date.to_string())
}

/// Chart series for `[{date, weight, status?}]`, `[]` on malformed input
#[wasm_bindgen]
pub fn build_chart_series_json(weigh_ins_json: &str) -> String {
    observations_from_json(weigh_ins_json)
        .and_then(|obs| serde_json::to_string(&build_chart_series(&obs)).ok())
        .unwrap_or_else(|| "[]".to_string())
}

/// Dashboard statistics as of `today` (`YYYY-MM-DD`)
///
/// Returns `undefined` when either input is malformed.
#[wasm_bindgen]
pub fn weight_statistics_json(
    weigh_ins_json: &str,
    start_weight: Option<f64>,
    today: &str,
) -> Option<String> {
    let obs = observations_from_json(weigh_ins_json)?;
    let today: NaiveDate = today.parse().ok()?;
    serde_json::to_string(&compute_statistics(&obs, start_weight, today)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    // 2024-03-05T06:30:00Z, 01:30 EST
    const EARLY_TUESDAY_MS: f64 = 1_709_620_200_000.0;

    #[test]
    fn test_training_date_before_noon() {
        assert_eq!(
            training_date_for(EARLY_TUESDAY_MS, "America/New_York").as_deref(),
            Some("2024-03-04")
        );
        // 06:30 in London is still before noon
        assert_eq!(
            training_date_for(EARLY_TUESDAY_MS, "Europe/London").as_deref(),
            Some("2024-03-04")
        );
        // 15:30 in Tokyo
        assert_eq!(
            training_date_for(EARLY_TUESDAY_MS, "Asia/Tokyo").as_deref(),
            Some("2024-03-05")
        );
    }

    #[test]
    fn test_training_date_unknown_zone() {
        assert_eq!(training_date_for(EARLY_TUESDAY_MS, "Not/AZone"), None);
    }

    #[test]
    fn test_training_date_rejects_invalid_timestamps() {
        // `new Date("garbage").getTime()` is NaN
        assert_eq!(training_date_for(f64::NAN, "America/New_York"), None);
        assert_eq!(training_date_for(f64::INFINITY, "America/New_York"), None);
        assert_eq!(training_date_for(f64::NEG_INFINITY, "UTC"), None);
        assert_eq!(training_date_for(1e300, "UTC"), None);
    }

    #[test]
    fn test_parse_import_date() {
        assert_eq!(parse_import_date("3/5/2024").as_deref(), Some("2024-03-05"));
        assert_eq!(parse_import_date("2024-03-05"), None);
    }

    #[test]
    fn test_chart_series_json() {
        let json = r#"[
            {"date": "2024-03-02", "weight": 200.0},
            {"date": "2024-03-01", "weight": 202.0},
            {"date": "2024-03-02", "weight": 201.0, "status": "FASTING"}
        ]"#;
        let series: Value = serde_json::from_str(&build_chart_series_json(json)).unwrap();
        let points = series.as_array().unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0]["date"], "2024-03-01");
        assert_eq!(points[1]["weight"], 200.5);
        // Two days never fill a seven-day window
        assert!(points[1]["avg7"].is_null());
    }

    #[test]
    fn test_chart_series_json_malformed() {
        assert_eq!(build_chart_series_json("not json"), "[]");
        assert_eq!(build_chart_series_json(r#"[{"weight": 200}]"#), "[]");
    }

    #[test]
    fn test_weight_statistics_json() {
        let json = r#"[{"date": "2024-03-01", "weight": 200.0}]"#;
        let stats: Value =
            serde_json::from_str(&weight_statistics_json(json, Some(210.0), "2024-03-01").unwrap())
                .unwrap();

        assert_eq!(stats["current_weight"], 200.0);
        assert_eq!(stats["start_weight"], 210.0);

        assert_eq!(weight_statistics_json(json, None, "03/01/2024"), None);
    }
}
