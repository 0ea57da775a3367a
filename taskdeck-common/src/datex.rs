//! Due-date expression parsing for the CLI
//!
//! `--due` accepts three forms:
//! - `+Nd` — N days from today
//! - `+Nw` — N weeks from today
//! - `YYYY-MM-DD` — an absolute date
//!
//! An empty expression means "today". Parsing is pure: the caller
//! supplies today's date.

use crate::{Error, Result};
use chrono::{Days, NaiveDate};

/// Parse a due-date expression relative to `today`
pub fn parse(expr: &str, today: NaiveDate) -> Result<NaiveDate> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Ok(today);
    }

    if let Some(offset) = parse_offset(expr) {
        return today
            .checked_add_days(Days::new(offset))
            .ok_or_else(|| Error::InvalidDate(expr.to_string()));
    }

    NaiveDate::parse_from_str(expr, "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(expr.to_string()))
}

/// Extract the day offset from a `+Nd` / `+Nw` expression
fn parse_offset(expr: &str) -> Option<u64> {
    let body = expr.strip_prefix('+')?;
    if let Some(days) = body.strip_suffix('d') {
        return days.parse::<u64>().ok();
    }
    if let Some(weeks) = body.strip_suffix('w') {
        return weeks.parse::<u64>().ok().map(|w| w * 7);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    #[test]
    fn empty_expression_is_today() {
        assert_eq!(parse("", today()).unwrap(), today());
        assert_eq!(parse("  ", today()).unwrap(), today());
    }

    #[test]
    fn relative_days() {
        let date = parse("+3d", today()).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 9, 2).unwrap());
    }

    #[test]
    fn relative_weeks() {
        let date = parse("+2w", today()).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 9, 13).unwrap());
    }

    #[test]
    fn absolute_date() {
        let date = parse("2026-12-24", today()).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 12, 24).unwrap());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(parse("next tuesday", today()), Err(Error::InvalidDate(_))));
        assert!(matches!(parse("+d", today()), Err(Error::InvalidDate(_))));
        assert!(matches!(parse("+3x", today()), Err(Error::InvalidDate(_))));
        assert!(matches!(parse("2026-13-40", today()), Err(Error::InvalidDate(_))));
    }
}
