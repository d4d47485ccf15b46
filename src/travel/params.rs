//! # Trip request parameters.
//!
//! [`TripParams`] is the explicit, per-request value every travel provider
//! reads. It is parsed from raw query pairs once, at the boundary.
//!
//! ## Parsing rules
//! - `city`, `start-date`, `end-date` are required and non-empty
//! - dates must be `YYYY-MM-DD`
//! - `min-budget` / `max-budget` are integers; missing, unparsable or zero
//!   values fall back to 100 / 1000

use std::collections::HashMap;

use chrono::NaiveDate;
use thiserror::Error;

/// Fallback for a missing or zero `min-budget`.
pub const DEFAULT_MIN_BUDGET: i64 = 100;
/// Fallback for a missing or zero `max-budget`.
pub const DEFAULT_MAX_BUDGET: i64 = 1000;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors produced while parsing request parameters.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    /// One of the required parameters is absent or empty.
    #[error("Missing required parameters: city, start-date, end-date")]
    Missing,

    /// A date parameter is not `YYYY-MM-DD`.
    #[error("Invalid {field} format, expected YYYY-MM-DD")]
    InvalidDate {
        /// Query parameter name (`start-date` or `end-date`).
        field: &'static str,
    },
}

impl ParamsError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ParamsError::Missing => "params_missing",
            ParamsError::InvalidDate { .. } => "params_invalid_date",
        }
    }
}

/// Parameters of one trip-planning request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripParams {
    pub city: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub min_budget: i64,
    pub max_budget: i64,
}

impl TripParams {
    /// Creates params with the default budget range.
    pub fn new(city: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            city: city.into(),
            start_date,
            end_date,
            min_budget: DEFAULT_MIN_BUDGET,
            max_budget: DEFAULT_MAX_BUDGET,
        }
    }

    /// Sets the budget range.
    pub fn with_budget(mut self, min_budget: i64, max_budget: i64) -> Self {
        self.min_budget = min_budget;
        self.max_budget = max_budget;
        self
    }

    /// Parses raw query pairs (`city`, `start-date`, `end-date`, `min-budget`, `max-budget`).
    ///
    /// # Example
    /// ```
    /// use std::collections::HashMap;
    /// use fanvisor::travel::TripParams;
    ///
    /// let query: HashMap<String, String> = [
    ///     ("city", "Paris"),
    ///     ("start-date", "2025-06-01"),
    ///     ("end-date", "2025-06-07"),
    /// ]
    /// .into_iter()
    /// .map(|(k, v)| (k.to_string(), v.to_string()))
    /// .collect();
    ///
    /// let params = TripParams::from_query(&query).unwrap();
    /// assert_eq!(params.city, "Paris");
    /// assert_eq!((params.min_budget, params.max_budget), (100, 1000));
    /// ```
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, ParamsError> {
        let get = |key: &str| query.get(key).map(String::as_str).filter(|v| !v.is_empty());

        let (Some(city), Some(start), Some(end)) =
            (get("city"), get("start-date"), get("end-date"))
        else {
            return Err(ParamsError::Missing);
        };

        let start_date = parse_date(start, "start-date")?;
        let end_date = parse_date(end, "end-date")?;

        Ok(Self {
            city: city.to_string(),
            start_date,
            end_date,
            min_budget: parse_budget(get("min-budget"), DEFAULT_MIN_BUDGET),
            max_budget: parse_budget(get("max-budget"), DEFAULT_MAX_BUDGET),
        })
    }
}

fn parse_date(raw: &str, field: &'static str) -> Result<NaiveDate, ParamsError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ParamsError::InvalidDate { field })
}

fn parse_budget(raw: Option<&str>, fallback: i64) -> i64 {
    match raw.and_then(|v| v.trim().parse::<i64>().ok()) {
        None | Some(0) => fallback,
        Some(n) => n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_full_query() {
        let params = TripParams::from_query(&query(&[
            ("city", "Lisbon"),
            ("start-date", "2025-03-10"),
            ("end-date", "2025-03-14"),
            ("min-budget", "250"),
            ("max-budget", "900"),
        ]))
        .unwrap();

        assert_eq!(params.city, "Lisbon");
        assert_eq!(params.start_date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(params.end_date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert_eq!((params.min_budget, params.max_budget), (250, 900));
    }

    #[test]
    fn missing_or_empty_required_params() {
        let err = TripParams::from_query(&query(&[("city", "Lisbon")])).unwrap_err();
        assert_eq!(err, ParamsError::Missing);

        let err = TripParams::from_query(&query(&[
            ("city", ""),
            ("start-date", "2025-03-10"),
            ("end-date", "2025-03-14"),
        ]))
        .unwrap_err();
        assert_eq!(err, ParamsError::Missing);
    }

    #[test]
    fn rejects_malformed_dates() {
        let err = TripParams::from_query(&query(&[
            ("city", "Lisbon"),
            ("start-date", "10/03/2025"),
            ("end-date", "2025-03-14"),
        ]))
        .unwrap_err();
        assert_eq!(err, ParamsError::InvalidDate { field: "start-date" });
        assert_eq!(err.to_string(), "Invalid start-date format, expected YYYY-MM-DD");

        let err = TripParams::from_query(&query(&[
            ("city", "Lisbon"),
            ("start-date", "2025-03-10"),
            ("end-date", "2025-02-30"),
        ]))
        .unwrap_err();
        assert_eq!(err, ParamsError::InvalidDate { field: "end-date" });
    }

    #[test]
    fn unparsable_or_zero_budgets_fall_back() {
        let params = TripParams::from_query(&query(&[
            ("city", "Lisbon"),
            ("start-date", "2025-03-10"),
            ("end-date", "2025-03-14"),
            ("min-budget", "cheap"),
            ("max-budget", "0"),
        ]))
        .unwrap();
        assert_eq!(params.min_budget, DEFAULT_MIN_BUDGET);
        assert_eq!(params.max_budget, DEFAULT_MAX_BUDGET);
    }
}
