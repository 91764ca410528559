/// Utility functions
use crate::domain::ApodSelector;
use crate::errors::{ApiError, ApiResult};
use chrono::{Days, NaiveDate};

/// Days in the trailing gallery window
pub const GALLERY_DAYS: u64 = 7;

/// Parse a `YYYY-MM-DD` query value
pub fn parse_date(field: &str, raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::InvalidInput(format!("{field} must be YYYY-MM-DD, got {raw:?}")))
}

/// Inclusive window ending yesterday and spanning `GALLERY_DAYS` days
pub fn recent_window(today: NaiveDate) -> ApodSelector {
    let end = today - Days::new(1);
    let start = end - Days::new(GALLERY_DAYS - 1);
    ApodSelector::Range { start, end }
}

/// Build a selector from the optional `date`/`start_date`/`end_date` values.
/// `date` wins; a half-specified range is ignored.
pub fn selector_from_query(
    date: Option<&str>,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> ApiResult<ApodSelector> {
    if let Some(date) = date.filter(|d| !d.is_empty()) {
        return Ok(ApodSelector::OnDate(parse_date("date", date)?));
    }

    match (start_date, end_date) {
        (Some(s), Some(e)) if !s.is_empty() && !e.is_empty() => {
            let start = parse_date("start_date", s)?;
            let end = parse_date("end_date", e)?;
            if start > end {
                return Err(ApiError::InvalidInput(format!(
                    "start_date {start} is after end_date {end}"
                )));
            }
            Ok(ApodSelector::Range { start, end })
        }
        _ => Ok(ApodSelector::Today),
    }
}
