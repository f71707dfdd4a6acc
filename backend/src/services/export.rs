//! Weight CSV export
//!
//! Writes the same spreadsheet layout the importer reads, so an export can be
//! edited and imported back.

use crate::error::ApiError;
use crate::repositories::WeightEntryRepository;
use metabolic_shared::WeightObservation;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Column headers of the spreadsheet layout
pub const EXPORT_HEADER: [&str; 4] = ["Status", "Date", "Weight (Scale)", "Body Fat % (Scale)"];

/// One exported row, serialized in header order
#[derive(Debug, Serialize)]
struct WeightCsvRow {
    status: &'static str,
    /// M/D/YYYY without zero padding
    date: String,
    weight: String,
    body_fat: String,
}

impl From<&WeightObservation> for WeightCsvRow {
    fn from(obs: &WeightObservation) -> Self {
        Self {
            status: obs.status.label(),
            date: obs.date.format("%-m/%-d/%Y").to_string(),
            weight: obs.weight.to_string(),
            body_fat: obs.body_fat_percent.map(|bf| bf.to_string()).unwrap_or_default(),
        }
    }
}

/// Export service for business logic
pub struct ExportService;

impl ExportService {
    /// Export a user's weigh-ins as CSV, oldest first
    pub async fn export_weight_csv(pool: &PgPool, user_id: Uuid) -> Result<String, ApiError> {
        let observations: Vec<WeightObservation> = WeightEntryRepository::list_for_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(|r| r.into_observation())
            .collect();

        Self::render_weight_csv(&observations)
    }

    /// Render observations in the spreadsheet layout, ascending by date
    pub fn render_weight_csv(observations: &[WeightObservation]) -> Result<String, ApiError> {
        let mut sorted: Vec<&WeightObservation> = observations.iter().collect();
        sorted.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));

        let rows: Vec<WeightCsvRow> = sorted.into_iter().map(WeightCsvRow::from).collect();
        Self::to_csv(&EXPORT_HEADER, &rows)
    }

    /// Convert data to CSV string under an explicit header
    fn to_csv<T: Serialize>(header: &[&str], data: &[T]) -> Result<String, ApiError> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(vec![]);
        wtr.write_record(header)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV header error: {}", e)))?;
        for record in data {
            wtr.serialize(record)
                .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV flush error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV encoding error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ImportService;
    use chrono::{DateTime, Utc};
    use metabolic_shared::{parse_import_rows, WeighInStatus};

    fn obs(date: &str, weight: f64, bf: Option<f64>, status: WeighInStatus) -> WeightObservation {
        WeightObservation {
            id: Uuid::new_v4(),
            date: date.parse().unwrap(),
            weight,
            body_fat_percent: bf,
            status,
            notes: None,
            created_at: "2024-03-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap(),
        }
    }

    #[test]
    fn test_export_layout() {
        let csv = ExportService::render_weight_csv(&[
            obs("2024-03-05", 200.0, None, WeighInStatus::Normal),
            obs("2024-01-02", 210.4, Some(33.1), WeighInStatus::Baseline),
        ])
        .unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Status,Date,Weight (Scale),Body Fat % (Scale)",
                "Baseline,1/2/2024,210.4,33.1",
                "Normal,3/5/2024,200,",
            ]
        );
    }

    #[test]
    fn test_empty_export_still_has_header() {
        let csv = ExportService::render_weight_csv(&[]).unwrap();
        assert_eq!(csv.trim_end(), "Status,Date,Weight (Scale),Body Fat % (Scale)");
    }

    #[test]
    fn test_export_imports_back() {
        let original = vec![
            obs("2024-02-10", 205.3, Some(32.0), WeighInStatus::Fasting),
            obs("2024-02-11", 204.9, None, WeighInStatus::Normal),
        ];
        let csv = ExportService::render_weight_csv(&original).unwrap();
        let (headers, rows) = ImportService::frame_csv(&csv).unwrap();
        let report = parse_import_rows(&headers, &rows).unwrap();

        assert!(report.errors.is_empty());
        let imported: Vec<_> = report
            .entries
            .iter()
            .map(|e| (e.date, e.weight, e.body_fat_percent, e.status))
            .collect();
        let expected: Vec<_> = original
            .iter()
            .map(|o| (o.date, o.weight, o.body_fat_percent, o.status))
            .collect();
        assert_eq!(imported, expected);
    }
}
