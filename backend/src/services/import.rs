//! Bulk weight import
//!
//! Frames uploaded spreadsheet CSV into a header and data rows, applies the
//! shared row contract, and stores every valid row in a single transaction.

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::repositories::WeightEntryRepository;
use crate::services::ProfileService;
use metabolic_shared::import::parse_import_rows;
use metabolic_shared::types::ImportWeightResponse;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

/// Header row plus data rows
pub type CsvTable = (Vec<String>, Vec<Vec<String>>);

/// Import service for business logic
pub struct ImportService;

impl ImportService {
    /// Split CSV text into a header row and data rows
    ///
    /// Framed one line at a time so that data row `i` is spreadsheet line
    /// `i + 2`; a blank line stays in place as an empty row. Quoted fields may
    /// contain commas and doubled quotes; cells are trimmed and rows may have
    /// differing lengths.
    pub fn frame_csv(text: &str) -> Result<CsvTable, ApiError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ApiError::BadRequest("No CSV data".to_string()));
        }

        let mut rows = text
            .lines()
            .map(Self::frame_line)
            .collect::<Result<Vec<_>, _>>()?
            .into_iter();

        let headers = rows.next().unwrap_or_default();
        Ok((headers, rows.collect()))
    }

    fn frame_line(line: &str) -> Result<Vec<String>, ApiError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(line.as_bytes());

        match reader.records().next() {
            Some(record) => {
                let record = record
                    .map_err(|e| ApiError::BadRequest(format!("Malformed CSV: {}", e)))?;
                Ok(record.iter().map(str::to_string).collect())
            }
            None => Ok(Vec::new()),
        }
    }

    /// Import CSV text for a user
    ///
    /// Succeeds when at least one row is valid; skipped rows are reported
    /// either way.
    pub async fn import_csv(
        pool: &PgPool,
        config: &AppConfig,
        user_id: Uuid,
        text: &str,
    ) -> Result<ImportWeightResponse, ApiError> {
        let (headers, rows) = Self::frame_csv(text)?;
        let report = parse_import_rows(&headers, &rows)
            .map_err(|e| ApiError::validation(e.to_string()))?;

        metrics::counter!("weight_import_rows_total", "outcome" => "skipped")
            .increment(report.skipped() as u64);

        if report.entries.is_empty() {
            warn!(user_id = %user_id, skipped = report.skipped(), "Import had no valid rows");
            return Err(ApiError::NoValidEntries(report.messages()));
        }

        ProfileService::ensure_settings(pool, config, user_id).await?;

        let mut tx = pool.begin().await?;
        WeightEntryRepository::create_many(&mut tx, user_id, &report.entries)
            .await
            .map_err(ApiError::Internal)?;
        tx.commit().await?;

        metrics::counter!("weight_import_rows_total", "outcome" => "imported")
            .increment(report.imported() as u64);
        info!(
            user_id = %user_id,
            imported = report.imported(),
            skipped = report.skipped(),
            "Weight CSV imported"
        );

        Ok(ImportWeightResponse {
            imported: report.imported(),
            skipped: report.skipped(),
            errors: report.messages(),
        })
    }
}
