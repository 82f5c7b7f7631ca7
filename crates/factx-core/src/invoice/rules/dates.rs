//! Date reformatting.

use chrono::NaiveDate;
use tracing::debug;

/// Format of dates printed on the documents.
pub const INPUT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Format of dates in the extraction record.
pub const OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Rewrite a `DD/MM/YYYY` date as `YYYY-MM-DD`.
///
/// Anything that is not a valid calendar date in that form is returned
/// unchanged.
pub fn reformat_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw, INPUT_DATE_FORMAT) {
        Ok(date) => date.format(OUTPUT_DATE_FORMAT).to_string(),
        Err(e) => {
            if !raw.is_empty() {
                debug!("Keeping unparsed date {:?}: {}", raw, e);
            }
            raw.to_string()
        }
    }
}
