#![warn(missing_docs)]
//! # grc-risk-export
//!
//! ## Purpose
//! Serializes the current register view to CSV text.
//!
//! ## Responsibilities
//! - Render the fixed header and one row per record, in view order.
//! - Name export files by calendar date.
//!
//! ## Data flow
//! View rows -> [`to_csv`] -> caller writes the text to a file named by
//! [`export_file_name`].
//!
//! ## Error model
//! CSV building is infallible.
//!
//! ## Security and privacy notes
//! Asset and threat text is wrapped in double quotes verbatim. Embedded quotes,
//! commas, and newlines are not escaped, so hostile input can break column
//! alignment in spreadsheet tools.

use grc_risk_core::RiskRecord;
use time::Date;

/// Fixed CSV header row.
pub const CSV_HEADER: &str = "ID,Asset,Threat,Likelihood,Impact,Score,Level";

/// Renders records as CSV text.
///
/// Rows are joined with `\n` and the output has no trailing newline. An empty
/// input yields just the header.
pub fn to_csv(records: &[RiskRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADER.to_string());
    lines.extend(records.iter().map(csv_row));
    lines.join("\n")
}

/// Renders one record as a CSV data row.
pub fn csv_row(record: &RiskRecord) -> String {
    format!(
        "{},\"{}\",\"{}\",{},{},{},{}",
        record.id(),
        record.asset(),
        record.threat(),
        record.likelihood(),
        record.impact(),
        record.score(),
        record.level()
    )
}

/// Returns `risk_assessment_<YYYY-MM-DD>.csv` for `date`.
pub fn export_file_name(date: Date) -> String {
    format!(
        "risk_assessment_{:04}-{:02}-{:02}.csv",
        date.year(),
        date.month() as u8,
        date.day()
    )
}

#[cfg(test)]
mod tests {
    //! Unit tests for CSV row layout.

    use grc_risk_core::RiskRecord;

    use super::*;

    #[test]
    fn empty_input_renders_header_only() {
        assert_eq!(to_csv(&[]), CSV_HEADER);
    }

    #[test]
    fn text_id_is_rendered_unquoted() {
        let record = RiskRecord::from_parts("ext-9", "VPN", "Brute force", 2, 3);
        assert_eq!(csv_row(&record), "ext-9,\"VPN\",\"Brute force\",2,3,6,Medium");
    }
}
