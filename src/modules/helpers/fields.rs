use chrono::{Datelike, NaiveDate};

/// First championship season; years before it can never match any data.
pub const FIRST_SEASON: i32 = 1950;

pub struct Fields {}

impl Fields {
    /// Decodes an optional dataset value. The dataset marks absent scalars
    /// with `\N`; an empty string counts as absent too. Never collapses an
    /// absent value into a zero-ish default.
    pub fn optional(raw: &str) -> Option<String> {
        if raw == r"\N" || raw.is_empty() {
            None
        } else {
            Some(raw.to_string())
        }
    }

    pub fn parse_i32(raw: &str, what: &str) -> Result<i32, String> {
        raw.trim()
            .parse::<i32>()
            .map_err(|_| format!("{what}: not an integer: '{raw}'"))
    }

    pub fn parse_f32(raw: &str, what: &str) -> Result<f32, String> {
        raw.trim()
            .parse::<f32>()
            .map_err(|_| format!("{what}: not a number: '{raw}'"))
    }

    pub fn optional_i32(raw: &str, what: &str) -> Result<Option<i32>, String> {
        match Fields::optional(raw) {
            Some(value) => Fields::parse_i32(&value, what).map(Some),
            None => Ok(None),
        }
    }

    pub fn optional_i64(raw: &str, what: &str) -> Result<Option<i64>, String> {
        match Fields::optional(raw) {
            Some(value) => value
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| format!("{what}: not an integer: '{value}'")),
            None => Ok(None),
        }
    }

    pub fn parse_date(raw: &str, what: &str) -> Result<NaiveDate, String> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| format!("{what}: not a date: '{raw}'"))
    }

    /// Birth dates and similar: absent or unparseable becomes `None` instead
    /// of failing the row.
    pub fn lenient_date(raw: &str) -> Option<NaiveDate> {
        let value = Fields::optional(raw)?;
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
    }

    /// Validates a user-entered season year the way the original catalog did:
    /// an integer between 1950 and ten years past today.
    pub fn season_year(raw: &str) -> Result<i32, String> {
        let upper = chrono::Local::now().year() + 10;
        match raw.trim().parse::<i32>() {
            Ok(year) if (FIRST_SEASON..=upper).contains(&year) => Ok(year),
            _ => Err(format!(
                "Invalid season year. Must be a number between {FIRST_SEASON} and {upper}."
            )),
        }
    }
}
