//! Bulk weight import row contract
//!
//! Spreadsheet exports do not guarantee column order, so columns are found by
//! case-insensitive substring match on the header. Bad rows are skipped and
//! reported; they never abort the batch.

use crate::errors::{DateParseError, ImportError};
use crate::models::{NewWeightObservation, WeighInStatus};
use crate::validation::{is_valid_observed_body_fat, is_valid_observed_weight};
use crate::weight::round_to_tenth;
use chrono::{Days, NaiveDate};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Data rows are reported 1-indexed, after the header line
pub const HEADER_ROW_OFFSET: usize = 2;

/// Parse a spreadsheet `M/D/YYYY` date
///
/// Month must be 1-12 and day 1-31. The day is not checked against the month:
/// a day past the end of the month rolls into the next one (`2/30/2024` is
/// 2024-03-01), matching what the exporting spreadsheet tolerates.
pub fn parse_loose_date(text: &str) -> Result<NaiveDate, DateParseError> {
    let trimmed = text.trim();
    let parts: Vec<&str> = trimmed.split('/').collect();
    let [month, day, year] = parts.as_slice() else {
        return Err(DateParseError::WrongShape(trimmed.to_string()));
    };

    let not_numeric = |_| DateParseError::NotNumeric(trimmed.to_string());
    let month: u32 = month.trim().parse().map_err(not_numeric)?;
    let day: u32 = day.trim().parse().map_err(not_numeric)?;
    let year: i32 = year.trim().parse().map_err(not_numeric)?;

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(DateParseError::OutOfRange(trimmed.to_string()));
    }

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_days(Days::new(u64::from(day - 1))))
        .ok_or_else(|| DateParseError::Unrepresentable(trimmed.to_string()))
}

fn leading_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")
            .expect("leading number pattern is valid")
    })
}

/// Read the numeric prefix of a cell, so `"203.4 lbs"` reads as 203.4
pub fn parse_leading_number(text: &str) -> Option<f64> {
    leading_number_pattern()
        .find(text.trim())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Column indices located in a header row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnMap {
    pub status: Option<usize>,
    pub date: Option<usize>,
    pub weight: Option<usize>,
    pub body_fat: Option<usize>,
}

impl ColumnMap {
    /// First header containing each keyword wins
    pub fn sniff<S: AsRef<str>>(headers: &[S]) -> Self {
        let lowered: Vec<String> = headers.iter().map(|h| h.as_ref().to_lowercase()).collect();
        let find = |keyword: &str| lowered.iter().position(|h| h.contains(keyword));

        Self {
            status: find("status"),
            date: find("date"),
            weight: find("weight"),
            body_fat: find("body fat"),
        }
    }
}

/// A skipped row and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub row: usize,
    pub reason: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row, self.reason)
    }
}

/// Outcome of parsing an import batch
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportReport {
    pub entries: Vec<NewWeightObservation>,
    pub errors: Vec<RowError>,
}

impl ImportReport {
    pub fn imported(&self) -> usize {
        self.entries.len()
    }

    pub fn skipped(&self) -> usize {
        self.errors.len()
    }

    /// Human-readable error lines, `Row N: reason`
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

fn cell<S: AsRef<str>>(row: &[S], index: usize) -> &str {
    row.get(index).map(|c| c.as_ref().trim()).unwrap_or("")
}

/// Parse data rows against a header row
///
/// Fails only when the header has no date or no weight column.
pub fn parse_import_rows<S: AsRef<str>>(
    headers: &[S],
    rows: &[Vec<S>],
) -> Result<ImportReport, ImportError> {
    let columns = ColumnMap::sniff(headers);
    let (Some(date_col), Some(weight_col)) = (columns.date, columns.weight) else {
        return Err(ImportError::MissingColumns);
    };

    let mut report = ImportReport::default();

    for (i, row) in rows.iter().enumerate() {
        let row_number = i + HEADER_ROW_OFFSET;
        match parse_row(row, &columns, date_col, weight_col) {
            Ok(entry) => report.entries.push(entry),
            Err(reason) => report.errors.push(RowError {
                row: row_number,
                reason,
            }),
        }
    }

    Ok(report)
}

fn parse_row<S: AsRef<str>>(
    row: &[S],
    columns: &ColumnMap,
    date_col: usize,
    weight_col: usize,
) -> Result<NewWeightObservation, String> {
    let raw_date = cell(row, date_col);
    if raw_date.is_empty() {
        return Err("Missing date".to_string());
    }
    let date = parse_loose_date(raw_date).map_err(|_| format!("Invalid date \"{}\"", raw_date))?;

    let raw_weight = cell(row, weight_col);
    let weight = parse_leading_number(raw_weight)
        .filter(|w| is_valid_observed_weight(*w))
        .ok_or_else(|| format!("Invalid weight \"{}\"", raw_weight))?;

    // Unknown status labels fall back to NORMAL rather than failing the row
    let status = columns
        .status
        .and_then(|col| cell(row, col).parse::<WeighInStatus>().ok())
        .unwrap_or_default();

    let body_fat_percent = columns
        .body_fat
        .and_then(|col| parse_leading_number(cell(row, col)))
        .filter(|bf| is_valid_observed_body_fat(*bf));

    Ok(NewWeightObservation {
        date,
        weight: round_to_tenth(weight),
        body_fat_percent,
        status,
        notes: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    const HEADERS: [&str; 4] = ["Status", "Date", "Weight (Scale)", "Body Fat % (Scale)"];

    #[rstest]
    #[case("3/5/2024", "2024-03-05")]
    #[case("03/05/2024", "2024-03-05")]
    #[case("12/31/1999", "1999-12-31")]
    #[case(" 1/1/2025 ", "2025-01-01")]
    // day is only range-checked, overflow rolls forward
    #[case("2/30/2024", "2024-03-01")]
    #[case("2/31/2023", "2023-03-03")]
    fn test_parse_loose_date_accepts(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(parse_loose_date(input).unwrap(), date(expected));
    }

    #[rstest]
    #[case("13/40/2024")]
    #[case("0/5/2024")]
    #[case("3/0/2024")]
    #[case("3/32/2024")]
    fn test_parse_loose_date_range_errors(#[case] input: &str) {
        assert!(matches!(parse_loose_date(input), Err(DateParseError::OutOfRange(_))));
    }

    #[rstest]
    #[case("not-a-date")]
    #[case("2024-03-05")]
    #[case("3/5")]
    #[case("3/5/2024/1")]
    #[case("")]
    fn test_parse_loose_date_shape_errors(#[case] input: &str) {
        assert!(matches!(parse_loose_date(input), Err(DateParseError::WrongShape(_))));
    }

    #[test]
    fn test_parse_loose_date_non_numeric() {
        assert!(matches!(parse_loose_date("March/5/2024"), Err(DateParseError::NotNumeric(_))));
        assert!(matches!(parse_loose_date("3/5/"), Err(DateParseError::NotNumeric(_))));
    }

    #[rstest]
    #[case("203.4", Some(203.4))]
    #[case("203.4 lbs", Some(203.4))]
    #[case("  199", Some(199.0))]
    #[case(".5", Some(0.5))]
    #[case("-4", Some(-4.0))]
    #[case("abc", None)]
    #[case("", None)]
    fn test_parse_leading_number(#[case] input: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_leading_number(input), expected);
    }

    #[test]
    fn test_column_sniffing_ignores_order_and_case() {
        let headers = ["BODY FAT %", "weight (scale)", "Entry DATE", "status"];
        let columns = ColumnMap::sniff(&headers);
        assert_eq!(columns.body_fat, Some(0));
        assert_eq!(columns.weight, Some(1));
        assert_eq!(columns.date, Some(2));
        assert_eq!(columns.status, Some(3));
    }

    #[test]
    fn test_column_sniffing_first_match_wins() {
        let headers = ["Date", "Weight (Scale)", "Weight (Manual)", "Updated Date"];
        let columns = ColumnMap::sniff(&headers);
        assert_eq!(columns.date, Some(0));
        assert_eq!(columns.weight, Some(1));
        assert_eq!(columns.status, None);
        assert_eq!(columns.body_fat, None);
    }

    #[test]
    fn test_missing_required_columns() {
        let rows: Vec<Vec<&str>> = vec![];
        assert_eq!(
            parse_import_rows(&["Status", "Weight"], &rows),
            Err(ImportError::MissingColumns)
        );
        assert_eq!(
            parse_import_rows(&["Date", "Notes"], &rows),
            Err(ImportError::MissingColumns)
        );
    }

    #[test]
    fn test_bad_weight_row_skipped_with_header_offset() {
        let rows = vec![
            vec!["Normal", "3/1/2024", "201.2", ""],
            vec!["Normal", "3/2/2024", "200.8", ""],
            vec!["Normal", "3/3/2024", "200.6", ""],
            vec!["Normal", "3/4/2024", "abc", ""],
            vec!["Normal", "3/5/2024", "199.9", ""],
        ];
        let report = parse_import_rows(&HEADERS, &rows).unwrap();

        assert_eq!(report.imported(), 4);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.errors[0].row, 5);
        assert_eq!(report.messages(), vec!["Row 5: Invalid weight \"abc\"".to_string()]);
    }

    #[test]
    fn test_row_level_reasons() {
        let rows = vec![
            vec!["Normal", "", "201.2", ""],
            vec!["Normal", "13/40/2024", "201.2", ""],
            vec!["Normal", "3/3/2024", "0", ""],
            vec!["Normal", "3/4/2024", "1200", ""],
            vec!["Normal"],
        ];
        let report = parse_import_rows(&HEADERS, &rows).unwrap();

        assert_eq!(report.imported(), 0);
        assert_eq!(
            report.messages(),
            vec![
                "Row 2: Missing date".to_string(),
                "Row 3: Invalid date \"13/40/2024\"".to_string(),
                "Row 4: Invalid weight \"0\"".to_string(),
                "Row 5: Invalid weight \"1200\"".to_string(),
                "Row 6: Missing date".to_string(),
            ]
        );
    }

    #[test]
    fn test_row_fields_parsed() {
        let rows = vec![
            vec!["fasting", "3/5/2024", "203.46 lbs", "31.2"],
            vec!["whenever", "3/6/2024", "203.0", "150"],
            vec!["BASELINE", "3/7/2024", "202.9", ""],
        ];
        let report = parse_import_rows(&HEADERS, &rows).unwrap();
        assert_eq!(report.imported(), 3);

        let first = &report.entries[0];
        assert_eq!(first.date, date("2024-03-05"));
        assert_eq!(first.weight, 203.5);
        assert_eq!(first.status, WeighInStatus::Fasting);
        assert_eq!(first.body_fat_percent, Some(31.2));

        let second = &report.entries[1];
        assert_eq!(second.status, WeighInStatus::Normal);
        assert_eq!(second.body_fat_percent, None);

        assert_eq!(report.entries[2].status, WeighInStatus::Baseline);
    }

    #[test]
    fn test_import_without_optional_columns() {
        let rows = vec![vec!["201.0", "3/5/2024"]];
        let report = parse_import_rows(&["Weight", "Date"], &rows).unwrap();
        assert_eq!(report.imported(), 1);
        assert_eq!(report.entries[0].status, WeighInStatus::Normal);
        assert_eq!(report.entries[0].body_fat_percent, None);
    }
}
