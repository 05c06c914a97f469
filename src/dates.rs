//! Due date parsing and formatting.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{BoardError, Result};

/// Parse human-readable due date input relative to `today`.
///
/// Supports:
/// - "today"/"hoje", "tomorrow"/"amanha"/"amanhã"
/// - "in 3d", "in 2w"
/// - weekday names ("friday", "next monday")
/// - "YYYY-MM-DD" and "DD/MM/YYYY"
pub fn parse_due_input(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = s.trim().to_lowercase();
    let invalid = || BoardError::InvalidDate {
        input: s.trim().to_string(),
    };

    match input.as_str() {
        "" => return Err(invalid()),
        "today" | "hoje" => return Ok(today),
        "tomorrow" | "amanha" | "amanhã" => return today.succ_opt().ok_or_else(invalid),
        _ => {}
    }

    if let Some(rest) = input.strip_prefix("in ") {
        let offset = if let Some(nd) = rest.strip_suffix('d') {
            nd.trim().parse::<i64>().ok().and_then(Duration::try_days)
        } else if let Some(nw) = rest.strip_suffix('w') {
            nw.trim().parse::<i64>().ok().and_then(Duration::try_weeks)
        } else {
            None
        };
        // out-of-range offsets are invalid input, not a panic
        return offset
            .and_then(|d| today.checked_add_signed(d))
            .ok_or_else(invalid);
    }

    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
    ];
    let (next_week, day) = match input.strip_prefix("next ") {
        Some(day) => (true, day),
        None => (false, input.as_str()),
    };
    if let Some(&(_, target)) = weekdays.iter().find(|(name, _)| *name == day) {
        let current = today.weekday().num_days_from_monday() as i64;
        let ahead = (target + 7 - current) % 7;
        let ahead = if next_week { ahead + 7 } else { ahead };
        return today
            .checked_add_signed(Duration::days(ahead))
            .ok_or_else(invalid);
    }

    NaiveDate::parse_from_str(&input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&input, "%d/%m/%Y"))
        .map_err(|_| invalid())
}

/// Brazilian day-first format used on cards and in the detail view.
pub fn format_date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Format a due date relative to today ("hoje", "amanhã", "em 3d", "2d atrasada").
pub fn format_due_relative(due: NaiveDate, today: NaiveDate) -> String {
    let delta = (due - today).num_days();
    match delta {
        0 => "hoje".into(),
        1 => "amanhã".into(),
        d if d > 1 => format!("em {}d", d),
        d => format!("{}d atrasada", -d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_absolute_formats() {
        let today = date(2025, 1, 1);
        assert_eq!(parse_due_input("2025-03-04", today).unwrap(), date(2025, 3, 4));
        assert_eq!(parse_due_input(" 04/03/2025 ", today).unwrap(), date(2025, 3, 4));
        assert!(parse_due_input("31/02/2025", today).is_err());
        assert!(parse_due_input("", today).is_err());
        assert!(parse_due_input("someday", today).is_err());
    }

    #[test]
    fn test_parse_relative_formats() {
        // 2025-01-01 is a Wednesday
        let today = date(2025, 1, 1);
        assert_eq!(parse_due_input("hoje", today).unwrap(), today);
        assert_eq!(parse_due_input("Tomorrow", today).unwrap(), date(2025, 1, 2));
        assert_eq!(parse_due_input("in 10d", today).unwrap(), date(2025, 1, 11));
        assert_eq!(parse_due_input("in 2w", today).unwrap(), date(2025, 1, 15));
        assert_eq!(parse_due_input("friday", today).unwrap(), date(2025, 1, 3));
        assert_eq!(parse_due_input("wednesday", today).unwrap(), today);
        assert_eq!(parse_due_input("next monday", today).unwrap(), date(2025, 1, 13));
        assert!(parse_due_input("in xd", today).is_err());
    }

    #[test]
    fn test_huge_offsets_are_invalid() {
        let today = date(2025, 1, 1);
        assert!(matches!(
            parse_due_input("in 99999999d", today),
            Err(BoardError::InvalidDate { .. })
        ));
        assert!(matches!(
            parse_due_input("in 9999999999999w", today),
            Err(BoardError::InvalidDate { .. })
        ));
        assert!(parse_due_input("amanha", NaiveDate::MAX).is_err());
        assert!(parse_due_input("next monday", NaiveDate::MAX).is_err());
    }

    #[test]
    fn test_formatting() {
        let today = date(2025, 1, 10);
        assert_eq!(format_date_br(date(2025, 1, 2)), "02/01/2025");
        assert_eq!(format_due_relative(today, today), "hoje");
        assert_eq!(format_due_relative(date(2025, 1, 11), today), "amanhã");
        assert_eq!(format_due_relative(date(2025, 1, 13), today), "em 3d");
        assert_eq!(format_due_relative(date(2025, 1, 8), today), "2d atrasada");
    }
}
