//! Flexible parsing for textual birthdate input.
//!
//! Participants type birthdays by hand ("15/04/1990", "15-4-1990", ...), so
//! input is accepted under a day-first grammar in addition to ISO. Storage
//! and wire formats are always ISO `yyyy-mm-dd`.

use chrono::NaiveDate;

/// Day-first formats accepted for hand-typed dates, tried in order.
/// `%y` must come before `%Y`: `%Y` would read "15/04/90" as year 90,
/// while `%y` rejects four-digit years on trailing input.
const DAY_FIRST_FORMATS: &[&str] = &["%d/%m/%y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Parse a hand-typed date. Returns `None` when the input matches no
/// accepted format; the empty string is treated as "no date".
pub fn parse_flexible(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    // ISO first so "1990-04-15" is never read day-first
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    DAY_FIRST_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_iso_format() {
        assert_eq!(parse_flexible("1990-04-15"), Some(date(1990, 4, 15)));
    }

    #[test]
    fn test_day_first_slashes() {
        assert_eq!(parse_flexible("15/04/1990"), Some(date(1990, 4, 15)));
    }

    #[test]
    fn test_ambiguous_day_month_is_day_first() {
        // 03/04 must read as April 3rd, not March 4th
        assert_eq!(parse_flexible("03/04/1990"), Some(date(1990, 4, 3)));
    }

    #[test]
    fn test_dashes_and_dots() {
        assert_eq!(parse_flexible("15-04-1990"), Some(date(1990, 4, 15)));
        assert_eq!(parse_flexible("15.04.1990"), Some(date(1990, 4, 15)));
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(parse_flexible("15/04/90"), Some(date(1990, 4, 15)));
    }

    #[test]
    fn test_leap_day() {
        assert_eq!(parse_flexible("29/02/1992"), Some(date(1992, 2, 29)));
        assert_eq!(parse_flexible("29/02/1993"), None);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(parse_flexible("  15/04/1990  "), Some(date(1990, 4, 15)));
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(parse_flexible(""), None);
        assert_eq!(parse_flexible("   "), None);
        assert_eq!(parse_flexible("not a date"), None);
        assert_eq!(parse_flexible("32/01/1990"), None);
    }
}
