//! Shared utility functions for RRD crates.

/// Date utility functions
pub mod dates {
    use crate::error::DateError;
    use chrono::{Months, NaiveDate, NaiveDateTime};

    /// Display format used by the prediction files: "DD-MM-YYYY"
    pub const DISPLAY_FORMAT: &str = "%d-%m-%Y";

    /// Parse a date string laid out as day-month-year separated by `-`.
    ///
    /// Each component is read as its leading integer, so "1-3-2024",
    /// "01-03-2024" and "01-03-2024 08:00" are the same calendar date.
    /// Combinations that do not exist on the calendar (e.g. "31-02-2024")
    /// are rejected.
    pub fn parse_display_date(s: &str) -> Result<NaiveDate, DateError> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 3 {
            return Err(DateError(format!("expected DD-MM-YYYY, got {:?}", s)));
        }
        let day = leading_int(parts[0])
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| DateError(format!("bad day in {:?}", s)))?;
        let month = leading_int(parts[1])
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| DateError(format!("bad month in {:?}", s)))?;
        let year = leading_int(parts[2])
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| DateError(format!("bad year in {:?}", s)))?;
        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| DateError(format!("{:?} is not a calendar date", s)))
    }

    /// Optional sign followed by the leading run of digits; the rest is ignored.
    fn leading_int(s: &str) -> Option<i64> {
        let s = s.trim_start();
        let bytes = s.as_bytes();
        let mut end = 0;
        if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
            end = 1;
        }
        let digits_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end == digits_start {
            return None;
        }
        s[..end].parse().ok()
    }

    /// Format a NaiveDate as "DD-MM-YYYY"
    pub fn format_display_date(date: &NaiveDate) -> String {
        date.format(DISPLAY_FORMAT).to_string()
    }

    /// Subtract whole calendar months from an instant.
    ///
    /// The day of month is clamped to the last day of the target month
    /// (31 March minus one month is 29 February in a leap year). Returns
    /// `None` only when the result falls outside chrono's supported range.
    pub fn months_before(instant: NaiveDateTime, months: u32) -> Option<NaiveDateTime> {
        instant.checked_sub_months(Months::new(months))
    }

    /// Turn a display date into a file-name-safe token ("01-03-2024" -> "01_03_2024").
    ///
    /// Every character outside `[0-9A-Za-z_]` becomes `_`, so the token can
    /// never name a path separator or a parent directory.
    pub fn file_token(display: &str) -> String {
        display
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }

}

/// Locale-tolerant decimal parsing
pub mod decimal {
    /// Parse a decimal written with either `,` or `.` as the separator.
    ///
    /// Only the first comma is replaced, then the longest numeric prefix is
    /// read: "15,5 mm" is 15.5 and "1.234,5" is 1.234. Non-finite results
    /// are rejected.
    pub fn parse_decimal(s: &str) -> Option<f64> {
        let normalized = s.trim().replacen(',', ".", 1);
        let prefix = numeric_prefix(&normalized);
        if prefix.is_empty() {
            return None;
        }
        prefix.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// `[+-]digits[.digits][(e|E)[+-]digits]`, at least one mantissa digit.
    fn numeric_prefix(s: &str) -> &str {
        let b = s.as_bytes();
        let digits_from = |mut i: usize| {
            while i < b.len() && b[i].is_ascii_digit() {
                i += 1;
            }
            i
        };

        let mut i = 0;
        if matches!(b.first(), Some(b'+') | Some(b'-')) {
            i = 1;
        }
        let int_end = digits_from(i);
        let mut mantissa_digits = int_end - i;
        i = int_end;
        if i < b.len() && b[i] == b'.' {
            let frac_end = digits_from(i + 1);
            if mantissa_digits > 0 || frac_end > i + 1 {
                mantissa_digits += frac_end - (i + 1);
                i = frac_end;
            }
        }
        if mantissa_digits == 0 {
            return "";
        }
        if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
            let mut j = i + 1;
            if j < b.len() && (b[j] == b'+' || b[j] == b'-') {
                j += 1;
            }
            let exp_end = digits_from(j);
            if exp_end > j {
                i = exp_end;
            }
        }
        &s[..i]
    }

}

/// Error types
pub mod error {
    use std::fmt;

    #[derive(Debug, Clone, PartialEq)]
    pub struct DateError(pub String);

    impl fmt::Display for DateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Date error: {}", self.0)
        }
    }

    impl std::error::Error for DateError {}
}
